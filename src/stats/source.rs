//! The upstream statistics provider boundary.
//!
//! [`StatsSource`] is synchronous: real provider clients block on network I/O.
//! [`Upstream`] moves every call onto Tokio's blocking pool so the async
//! executor never waits on one.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::category::Category;
use super::error::SourceError;

/// One result row in the provider's column order.
pub type Row = Vec<Value>;

/// An entry of the provider's static player index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerIndexEntry {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
}

/// Synchronous access to the statistics provider.
pub trait StatsSource: Send + Sync {
    /// Every player currently on a roster.
    fn active_players(&self) -> Result<Vec<PlayerIndexEntry>, SourceError>;

    /// Players, active or not, whose full name contains `keyword`, ignoring case.
    fn find_players_by_full_name(&self, keyword: &str)
        -> Result<Vec<PlayerIndexEntry>, SourceError>;

    /// Common player info rows. No rows means the player is unknown.
    fn player_info(&self, player_id: i64) -> Result<Vec<Row>, SourceError>;

    fn team_roster(&self, team_id: i64) -> Result<Vec<Row>, SourceError>;

    /// Per-game league leaders, already ranked.
    fn league_leaders(&self, category: Category) -> Result<Vec<Row>, SourceError>;

    /// Per-game regular season lines, one per season and team.
    fn career_averages(&self, player_id: i64) -> Result<Vec<Row>, SourceError>;
}

/// Async handle over a shared [`StatsSource`].
#[derive(Clone)]
pub struct Upstream {
    source: Arc<dyn StatsSource>,
}

impl Upstream {
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self { source }
    }

    async fn run<T, F>(&self, call: F) -> Result<T, SourceError>
    where
        F: FnOnce(&dyn StatsSource) -> Result<T, SourceError> + Send + 'static,
        T: Send + 'static,
    {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || call(source.as_ref()))
            .await
            .map_err(|e| SourceError::Unavailable(format!("upstream call did not complete: {e}")))?
    }

    pub async fn active_players(&self) -> Result<Vec<PlayerIndexEntry>, SourceError> {
        self.run(|s| s.active_players()).await
    }

    pub async fn find_players_by_full_name(
        &self,
        keyword: &str,
    ) -> Result<Vec<PlayerIndexEntry>, SourceError> {
        let keyword = keyword.to_owned();
        self.run(move |s| s.find_players_by_full_name(&keyword)).await
    }

    pub async fn player_info(&self, player_id: i64) -> Result<Vec<Row>, SourceError> {
        self.run(move |s| s.player_info(player_id)).await
    }

    pub async fn team_roster(&self, team_id: i64) -> Result<Vec<Row>, SourceError> {
        self.run(move |s| s.team_roster(team_id)).await
    }

    pub async fn league_leaders(&self, category: Category) -> Result<Vec<Row>, SourceError> {
        self.run(move |s| s.league_leaders(category)).await
    }

    pub async fn career_averages(&self, player_id: i64) -> Result<Vec<Row>, SourceError> {
        self.run(move |s| s.career_averages(player_id)).await
    }
}

/// Provider data captured to a JSON file.
///
/// ```json
/// {
///   "players": [{"id": 2544, "full_name": "LeBron James", "is_active": true}],
///   "player_info": {"2544": [[2544, "LeBron", "James", "..."]]},
///   "rosters": {"1610612747": [[1610612747, "2024-25", "23", "LeBron James", "..."]]},
///   "leaders": {"PTS": [[203507, 1, "Giannis Antetokounmpo", "..."]]},
///   "career": {"2544": [[2544, "2003-04", "00", "..."]]}
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub players: Vec<PlayerIndexEntry>,
    pub player_info: HashMap<i64, Vec<Row>>,
    pub rosters: HashMap<i64, Vec<Row>>,
    pub leaders: HashMap<String, Vec<Row>>,
    pub career: HashMap<i64, Vec<Row>>,
}

/// A [`StatsSource`] answering from a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

impl StatsSource for SnapshotSource {
    fn active_players(&self) -> Result<Vec<PlayerIndexEntry>, SourceError> {
        Ok(self
            .snapshot
            .players
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    fn find_players_by_full_name(
        &self,
        keyword: &str,
    ) -> Result<Vec<PlayerIndexEntry>, SourceError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .snapshot
            .players
            .iter()
            .filter(|p| p.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn player_info(&self, player_id: i64) -> Result<Vec<Row>, SourceError> {
        Ok(self
            .snapshot
            .player_info
            .get(&player_id)
            .cloned()
            .unwrap_or_default())
    }

    fn team_roster(&self, team_id: i64) -> Result<Vec<Row>, SourceError> {
        Ok(self.snapshot.rosters.get(&team_id).cloned().unwrap_or_default())
    }

    fn league_leaders(&self, category: Category) -> Result<Vec<Row>, SourceError> {
        Ok(self
            .snapshot
            .leaders
            .get(category.abbreviation())
            .cloned()
            .unwrap_or_default())
    }

    fn career_averages(&self, player_id: i64) -> Result<Vec<Row>, SourceError> {
        Ok(self.snapshot.career.get(&player_id).cloned().unwrap_or_default())
    }
}
