//! Player and team services over the upstream source.

use std::time::Duration;

use futures::future::try_join_all;
use tokio::time::timeout;
use tracing::debug;

use super::category::Category;
use super::error::StatsError;
use super::pagination::Pagination;
use super::records::{PlayerAverages, PlayerCategoryLeader, PlayerPage, PlayerSummary, Team};
use super::source::Upstream;
use super::teams::{FRANCHISES, find_franchise};

const PLAYER_TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_LEADERS: usize = 5;
const MAX_LEADERS: usize = 10;

/// Leaders-board size: non-positive means 5, anything above 10 means 10.
pub fn clamp_leaders(number_of_players: i64) -> usize {
    match usize::try_from(number_of_players) {
        Ok(0) | Err(_) => DEFAULT_LEADERS,
        Ok(n) => n.min(MAX_LEADERS),
    }
}

#[derive(Clone)]
pub struct StatsService {
    upstream: Upstream,
}

impl StatsService {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    pub async fn player(&self, player_id: i64) -> Result<PlayerSummary, StatsError> {
        timeout(PLAYER_TIMEOUT, self.player_info(player_id))
            .await
            .map_err(|_| StatsError::Timeout("Failed to retrieve player details within timeout period"))?
    }

    async fn player_info(&self, player_id: i64) -> Result<PlayerSummary, StatsError> {
        let rows = self.upstream.player_info(player_id).await?;
        let row = rows.first().ok_or(StatsError::PlayerNotFound(player_id))?;
        PlayerSummary::from_info_row(row)
    }

    /// One page of active players, looked up concurrently.
    pub async fn player_page(&self, page: i64, per_page: i64) -> Result<PlayerPage, StatsError> {
        let roster = timeout(PLAYER_TIMEOUT, self.upstream.active_players())
            .await
            .map_err(|_| StatsError::Timeout("Failed to retrieve player IDs within timeout period"))??;

        let pagination = Pagination::new(roster.len(), page, per_page);
        let lookups = roster[pagination.window()]
            .iter()
            .map(|entry| self.player_info(entry.id));
        let players = timeout(PAGE_TIMEOUT, try_join_all(lookups))
            .await
            .map_err(|_| StatsError::Timeout("Failed to retrieve player details within timeout period"))??;

        Ok(PlayerPage {
            players,
            current_page: pagination.page(),
            next_page: pagination.next_page(),
            previous_page: pagination.previous_page(),
            is_last_page: pagination.is_last_page(),
            total_players: pagination.total(),
        })
    }

    /// Active players whose full name matches `keyword`.
    ///
    /// Matches without player info are skipped.
    pub async fn search(&self, keyword: &str) -> Result<Vec<PlayerSummary>, StatsError> {
        let matches = self.upstream.find_players_by_full_name(keyword).await?;

        let mut players = Vec::new();
        for entry in matches.iter().filter(|entry| entry.is_active) {
            match self.player_info(entry.id).await {
                Ok(player) => players.push(player),
                Err(StatsError::PlayerNotFound(id)) => {
                    debug!(player_id = id, "search match has no player info, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(players)
    }

    pub async fn career_averages(&self, player_id: i64) -> Result<Vec<PlayerAverages>, StatsError> {
        self.upstream
            .career_averages(player_id)
            .await?
            .iter()
            .map(|row| PlayerAverages::from_career_row(row))
            .collect()
    }

    pub async fn category_leaders(
        &self,
        number_of_players: i64,
        category: Category,
    ) -> Result<Vec<PlayerCategoryLeader>, StatsError> {
        let count = clamp_leaders(number_of_players);
        self.upstream
            .league_leaders(category)
            .await?
            .iter()
            .take(count)
            .map(|row| PlayerCategoryLeader::from_leader_row(row))
            .collect()
    }

    pub fn teams(&self) -> Vec<Team> {
        FRANCHISES.iter().map(Team::from).collect()
    }

    pub async fn team_players(&self, team_id: i64) -> Result<Vec<PlayerSummary>, StatsError> {
        let team = find_franchise(team_id).ok_or(StatsError::TeamNotFound(team_id))?;
        self.upstream
            .team_roster(team_id)
            .await?
            .iter()
            .map(|row| PlayerSummary::from_roster_row(row, team))
            .collect()
    }
}
