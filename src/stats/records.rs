//! Domain records and the row mappings that build them.
//!
//! Rows arrive as JSON arrays in the provider's column order. Every mapper
//! reads by column index through [`RowReader`], so a short or mistyped row
//! surfaces as [`StatsError::InvalidRow`] naming the record and column.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::StatsError;
use super::teams::{Franchise, conference_of, division_of};
use crate::cache::Record;

const HEADSHOT_BASE: &str = "https://cdn.nba.com/headshots/nba/latest/1040x760";
const LOGO_BASE: &str = "https://cdn.nba.com/logos/nba";
const LEAGUE_LOGO: &str = "https://cdn.worldvectorlogo.com/logos/nba-6.svg";

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn player_image_url(player_id: i64) -> String {
    format!("{HEADSHOT_BASE}/{player_id}.png")
}

/// Team logo, or the league logo for a player without a team.
pub fn team_image_url(team_id: i64) -> String {
    if team_id == 0 {
        LEAGUE_LOGO.to_owned()
    } else {
        format!("{LOGO_BASE}/{team_id}/global/L/logo.svg")
    }
}

fn insert_team_fields(fields: &mut Map<String, Value>, team_id: i64) {
    fields.insert("conference".into(), conference_of(team_id).into());
    fields.insert("division".into(), division_of(team_id).into());
    fields.insert("team_image_url".into(), team_image_url(team_id).into());
}

fn struct_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected a field map, found {other}"
        ))),
    }
}

struct RowReader<'a> {
    record: &'static str,
    row: &'a [Value],
}

impl<'a> RowReader<'a> {
    fn new(record: &'static str, row: &'a [Value]) -> Self {
        Self { record, row }
    }

    fn invalid(&self, column: usize, reason: impl Into<String>) -> StatsError {
        StatsError::InvalidRow {
            record: self.record,
            column,
            reason: reason.into(),
        }
    }

    fn value(&self, column: usize) -> Result<&'a Value, StatsError> {
        self.row
            .get(column)
            .ok_or_else(|| self.invalid(column, format!("row has only {} columns", self.row.len())))
    }

    fn text(&self, column: usize) -> Result<Option<String>, StatsError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(self.invalid(column, format!("expected text, found {other}"))),
        }
    }

    fn int(&self, column: usize) -> Result<i64, StatsError> {
        match self.value(column)? {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| self.invalid(column, format!("expected an integer, found {n}"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(column, format!("expected an integer, found {s:?}"))),
            other => Err(self.invalid(column, format!("expected an integer, found {other}"))),
        }
    }

    fn float(&self, column: usize) -> Result<f64, StatsError> {
        match self.value(column)? {
            Value::Null => Ok(0.0),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| self.invalid(column, format!("expected a number, found {n}"))),
            other => Err(self.invalid(column, format!("expected a number, found {other}"))),
        }
    }

    // Rookies are listed with "R" instead of a season count.
    fn experience(&self, column: usize) -> Result<i64, StatsError> {
        match self.value(column)? {
            Value::String(s) if s == "R" => Ok(0),
            _ => self.int(column),
        }
    }

    fn birth_date(&self, column: usize) -> Result<Option<String>, StatsError> {
        let Some(raw) = self.text(column)? else {
            return Ok(None);
        };
        normalize_birth_date(&raw)
            .map(Some)
            .ok_or_else(|| self.invalid(column, format!("unrecognised date {raw:?}")))
    }
}

/// Normalises the provider's date spellings to `YYYY-MM-DDTHH:MM:SS`.
pub fn normalize_birth_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, BIRTH_DATE_FORMAT) {
        return Some(stamp.format(BIRTH_DATE_FORMAT).to_string());
    }
    ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|stamp| stamp.format(BIRTH_DATE_FORMAT).to_string())
}

/// A player's biographical summary and current team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub season_exp: i64,
    pub jersey: Option<String>,
    pub position: Option<String>,
    pub team_id: i64,
    pub team_city: Option<String>,
    pub team_name: Option<String>,
}

impl PlayerSummary {
    /// Maps a common-player-info row.
    pub fn from_info_row(row: &[Value]) -> Result<Self, StatsError> {
        let r = RowReader::new("player info", row);
        Ok(Self {
            player_id: r.int(0)?,
            first_name: r.text(1)?,
            last_name: r.text(2)?,
            birth_date: r.text(7)?,
            height: r.text(11)?,
            weight: r.text(12)?,
            season_exp: r.int(13)?,
            jersey: r.text(14)?,
            position: r.text(15)?,
            team_id: r.int(18)?,
            team_name: r.text(19)?,
            team_city: r.text(22)?,
        })
    }

    /// Maps a team roster row. The roster carries one full name, split on the
    /// first space.
    pub fn from_roster_row(row: &[Value], team: &Franchise) -> Result<Self, StatsError> {
        let r = RowReader::new("roster", row);
        let full_name = r.text(3)?.unwrap_or_default();
        let (first_name, last_name) = match full_name.split_once(' ') {
            Some((first, last)) => (first.to_owned(), last.to_owned()),
            None => (full_name.clone(), String::new()),
        };
        Ok(Self {
            player_id: r.int(14)?,
            first_name: Some(first_name),
            last_name: Some(last_name),
            birth_date: r.birth_date(10)?,
            height: r.text(8)?,
            weight: r.text(9)?,
            season_exp: r.experience(12)?,
            jersey: r.text(2)?,
            position: r.text(7)?,
            team_id: r.int(0)?,
            team_city: Some(team.city.to_owned()),
            team_name: Some(team.nickname.to_owned()),
        })
    }
}

impl Record for PlayerSummary {
    fn canonical_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = struct_fields(self)?;
        insert_team_fields(&mut fields, self.team_id);
        fields.insert("player_image_url".into(), player_image_url(self.player_id).into());
        Ok(fields)
    }
}

/// One per-game season line from a player's career profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerAverages {
    pub player_id: i64,
    pub season_id: Option<String>,
    pub team_id: i64,
    pub team_abbreviation: Option<String>,
    pub player_age: i64,
    pub gp: i64,
    pub gs: i64,
    pub minutes: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg_pct: f64,
    pub fg3m: f64,
    pub fg3a: f64,
    pub fg3_pct: f64,
    pub ftm: f64,
    pub fta: f64,
    pub ft_pct: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub pts: f64,
}

impl PlayerAverages {
    pub fn from_career_row(row: &[Value]) -> Result<Self, StatsError> {
        let r = RowReader::new("career", row);
        Ok(Self {
            player_id: r.int(0)?,
            season_id: r.text(1)?,
            team_id: r.int(3)?,
            team_abbreviation: r.text(4)?,
            player_age: r.float(5)? as i64,
            gp: r.int(6)?,
            gs: r.int(7)?,
            minutes: r.float(8)?,
            fgm: r.float(9)?,
            fga: r.float(10)?,
            fg_pct: r.float(11)?,
            fg3m: r.float(12)?,
            fg3a: r.float(13)?,
            fg3_pct: r.float(14)?,
            ftm: r.float(15)?,
            fta: r.float(16)?,
            ft_pct: r.float(17)?,
            oreb: r.float(18)?,
            dreb: r.float(19)?,
            reb: r.float(20)?,
            ast: r.float(21)?,
            stl: r.float(22)?,
            blk: r.float(23)?,
            tov: r.float(24)?,
            pf: r.float(25)?,
            pts: r.float(26)?,
        })
    }
}

impl Record for PlayerAverages {}

/// A row of a per-game league-leaders board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerCategoryLeader {
    pub player_id: i64,
    pub player_name: Option<String>,
    pub rank: i64,
    pub team_id: i64,
    pub games_played: i64,
    pub minutes_played: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fgpct: f64,
    pub fg3m: f64,
    pub fg3a: f64,
    pub fg3_pct: f64,
    pub ftm: f64,
    pub fta: f64,
    pub ftpct: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pts: f64,
    pub eff: f64,
}

impl PlayerCategoryLeader {
    pub fn from_leader_row(row: &[Value]) -> Result<Self, StatsError> {
        let r = RowReader::new("league leaders", row);
        Ok(Self {
            player_id: r.int(0)?,
            rank: r.int(1)?,
            player_name: r.text(2)?,
            team_id: r.int(3)?,
            games_played: r.int(5)?,
            minutes_played: r.float(6)?,
            fgm: r.float(7)?,
            fga: r.float(8)?,
            fgpct: r.float(9)?,
            fg3m: r.float(10)?,
            fg3a: r.float(11)?,
            fg3_pct: r.float(12)?,
            ftm: r.float(13)?,
            fta: r.float(14)?,
            ftpct: r.float(15)?,
            oreb: r.float(16)?,
            dreb: r.float(17)?,
            reb: r.float(18)?,
            ast: r.float(19)?,
            stl: r.float(20)?,
            blk: r.float(21)?,
            tov: r.float(22)?,
            pts: r.float(23)?,
            eff: r.float(24)?,
        })
    }
}

impl Record for PlayerCategoryLeader {
    fn canonical_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = struct_fields(self)?;
        insert_team_fields(&mut fields, self.team_id);
        fields.insert("player_image_url".into(), player_image_url(self.player_id).into());
        Ok(fields)
    }
}

/// A franchise as listed by `/teams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub team_id: i64,
    pub full_name: String,
    pub abbreviation: String,
    pub nickname: String,
    pub city: String,
}

impl From<&Franchise> for Team {
    fn from(f: &Franchise) -> Self {
        Self {
            team_id: f.id,
            full_name: f.full_name.to_owned(),
            abbreviation: f.abbreviation.to_owned(),
            nickname: f.nickname.to_owned(),
            city: f.city.to_owned(),
        }
    }
}

impl Record for Team {
    fn canonical_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = struct_fields(self)?;
        insert_team_fields(&mut fields, self.team_id);
        Ok(fields)
    }
}

/// One page of the active-player listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerPage {
    pub players: Vec<PlayerSummary>,
    pub current_page: usize,
    pub next_page: Option<usize>,
    pub previous_page: Option<usize>,
    pub is_last_page: bool,
    pub total_players: usize,
}

impl Record for PlayerPage {
    fn canonical_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = struct_fields(self)?;
        let players = self
            .players
            .iter()
            .map(|p| p.canonical_fields().map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        fields.insert("players".into(), Value::Array(players));
        Ok(fields)
    }
}

crate::cacheable_record!(PlayerSummary, PlayerAverages, PlayerCategoryLeader, Team, PlayerPage);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::Cacheable;
    use crate::stats::teams::find_franchise;

    fn info_row() -> Vec<Value> {
        let mut row = vec![Value::Null; 23];
        row[0] = json!(2544);
        row[1] = json!("LeBron");
        row[2] = json!("James");
        row[7] = json!("1984-12-30T00:00:00");
        row[11] = json!("6-9");
        row[12] = json!("250");
        row[13] = json!(21);
        row[14] = json!("23");
        row[15] = json!("Forward");
        row[18] = json!(1610612747);
        row[19] = json!("Lakers");
        row[22] = json!("Los Angeles");
        row
    }

    fn roster_row(name: &str, exp: Value, birth: &str) -> Vec<Value> {
        let mut row = vec![Value::Null; 15];
        row[0] = json!(1610612738);
        row[2] = json!("0");
        row[3] = json!(name);
        row[7] = json!("F-G");
        row[8] = json!("6-8");
        row[9] = json!("210");
        row[10] = json!(birth);
        row[12] = exp;
        row[14] = json!(1628369);
        row
    }

    #[test]
    fn info_row_mapping() {
        let player = PlayerSummary::from_info_row(&info_row()).unwrap();
        assert_eq!(player.player_id, 2544);
        assert_eq!(player.first_name.as_deref(), Some("LeBron"));
        assert_eq!(player.season_exp, 21);
        assert_eq!(player.team_name.as_deref(), Some("Lakers"));
        assert_eq!(player.team_city.as_deref(), Some("Los Angeles"));
    }

    #[test]
    fn summary_includes_computed_fields() {
        let player = PlayerSummary::from_info_row(&info_row()).unwrap();
        let json = player.to_json().unwrap();
        assert_eq!(json["conference"], "West");
        assert_eq!(json["division"], "Pacific");
        assert_eq!(
            json["player_image_url"],
            "https://cdn.nba.com/headshots/nba/latest/1040x760/2544.png"
        );
        assert_eq!(
            json["team_image_url"],
            "https://cdn.nba.com/logos/nba/1610612747/global/L/logo.svg"
        );
    }

    #[test]
    fn free_agent_gets_league_logo() {
        let player = PlayerSummary::default();
        let json = player.to_json().unwrap();
        assert_eq!(json["team_image_url"], LEAGUE_LOGO);
        assert_eq!(json["conference"], "N/A");
    }

    #[test]
    fn short_row_is_invalid() {
        let err = PlayerSummary::from_info_row(&[json!(1), json!("A")]).unwrap_err();
        assert!(matches!(err, StatsError::InvalidRow { record: "player info", column: 2, .. }));
    }

    #[test]
    fn roster_row_mapping() {
        let celtics = find_franchise(1610612738).unwrap();
        let row = roster_row("Jayson Tatum", json!("7"), "MAR 03, 1998");
        let player = PlayerSummary::from_roster_row(&row, celtics).unwrap();
        assert_eq!(player.first_name.as_deref(), Some("Jayson"));
        assert_eq!(player.last_name.as_deref(), Some("Tatum"));
        assert_eq!(player.season_exp, 7);
        assert_eq!(player.birth_date.as_deref(), Some("1998-03-03T00:00:00"));
        assert_eq!(player.team_city.as_deref(), Some("Boston"));
        assert_eq!(player.team_name.as_deref(), Some("Celtics"));
    }

    #[test]
    fn roster_rookie_and_single_name() {
        let celtics = find_franchise(1610612738).unwrap();
        let row = roster_row("Nene Hilario Jr.", json!("R"), "1982-09-13");
        let player = PlayerSummary::from_roster_row(&row, celtics).unwrap();
        assert_eq!(player.season_exp, 0);
        assert_eq!(player.last_name.as_deref(), Some("Hilario Jr."));

        let row = roster_row("Nene", json!(3), "SEP 13, 1982");
        let player = PlayerSummary::from_roster_row(&row, celtics).unwrap();
        assert_eq!(player.first_name.as_deref(), Some("Nene"));
        assert_eq!(player.last_name.as_deref(), Some(""));
    }

    #[test]
    fn birth_date_spellings() {
        assert_eq!(
            normalize_birth_date("DEC 30, 1984").as_deref(),
            Some("1984-12-30T00:00:00")
        );
        assert_eq!(
            normalize_birth_date("1984-12-30T00:00:00").as_deref(),
            Some("1984-12-30T00:00:00")
        );
        assert_eq!(normalize_birth_date("someday"), None);
    }

    #[test]
    fn leader_row_mapping() {
        let mut row: Vec<Value> = (0..25).map(|i| json!(i as f64 + 0.5)).collect();
        row[0] = json!(203507);
        row[1] = json!(1);
        row[2] = json!("Giannis Antetokounmpo");
        row[3] = json!(1610612749);
        row[4] = json!("MIL");
        row[5] = json!(73);
        let leader = PlayerCategoryLeader::from_leader_row(&row).unwrap();
        assert_eq!(leader.rank, 1);
        assert_eq!(leader.games_played, 73);
        assert_eq!(leader.pts, 23.5);
        assert_eq!(leader.eff, 24.5);
        let json = leader.to_json().unwrap();
        assert_eq!(json["division"], "Central");
    }

    #[test]
    fn career_row_mapping() {
        let mut row: Vec<Value> = (0..27).map(|i| json!(i as f64)).collect();
        row[0] = json!(2544);
        row[1] = json!("2003-04");
        row[2] = json!("00");
        row[3] = json!(1610612739);
        row[4] = json!("CLE");
        row[5] = json!(19.0);
        row[6] = json!(79);
        row[7] = json!(79);
        let line = PlayerAverages::from_career_row(&row).unwrap();
        assert_eq!(line.season_id.as_deref(), Some("2003-04"));
        assert_eq!(line.player_age, 19);
        assert_eq!(line.pts, 26.0);
        assert_eq!(line.to_json().unwrap()["team_abbreviation"], "CLE");
    }

    #[test]
    fn page_encodes_nested_computed_fields() {
        let page = PlayerPage {
            players: vec![PlayerSummary::from_info_row(&info_row()).unwrap()],
            current_page: 1,
            next_page: None,
            previous_page: None,
            is_last_page: true,
            total_players: 1,
        };
        let json = page.to_json().unwrap();
        assert_eq!(json["players"][0]["conference"], "West");
        assert_eq!(json["next_page"], Value::Null);
        assert_eq!(json["is_last_page"], true);
    }

    #[test]
    fn team_record() {
        let team = Team::from(find_franchise(1610612766).unwrap());
        let json = team.to_json().unwrap();
        assert_eq!(json["full_name"], "Charlotte Hornets");
        assert_eq!(json["conference"], "East");
        assert_eq!(json["division"], "Southeast");
    }
}
