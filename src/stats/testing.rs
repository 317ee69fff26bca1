//! Provider fixtures shared by the stats and api tests.

use serde_json::{Value, json};

use super::source::{PlayerIndexEntry, Row, Snapshot};

pub(crate) const LAKERS: i64 = 1610612747;
pub(crate) const WARRIORS: i64 = 1610612744;
pub(crate) const SUNS: i64 = 1610612756;

fn entry(id: i64, full_name: &str, is_active: bool) -> PlayerIndexEntry {
    let (first_name, last_name) = full_name.split_once(' ').unwrap_or((full_name, ""));
    PlayerIndexEntry {
        id,
        full_name: full_name.to_owned(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        is_active,
    }
}

/// A common-player-info row with the mapped columns filled in.
pub(crate) fn info_row(id: i64, first: &str, last: &str, team_id: i64) -> Row {
    let mut row = vec![Value::Null; 23];
    row[0] = json!(id);
    row[1] = json!(first);
    row[2] = json!(last);
    row[7] = json!("1984-12-30T00:00:00");
    row[11] = json!("6-9");
    row[12] = json!("250");
    row[13] = json!(10);
    row[14] = json!("23");
    row[15] = json!("Forward");
    row[18] = json!(team_id);
    row[19] = json!("Team");
    row[22] = json!("City");
    row
}

fn leader_row(rank: i64) -> Row {
    let mut row: Row = (0..25).map(|column| json!(column as f64)).collect();
    row[0] = json!(1000 + rank);
    row[1] = json!(rank);
    row[2] = json!(format!("Leader {rank}"));
    row[3] = json!(LAKERS);
    row[4] = json!("LAL");
    row[5] = json!(70);
    row
}

fn career_row(player_id: i64) -> Row {
    let mut row: Row = (0..27).map(|column| json!(column as f64)).collect();
    row[0] = json!(player_id);
    row[1] = json!("2003-04");
    row[2] = json!("00");
    row[3] = json!(1610612739);
    row[4] = json!("CLE");
    row[6] = json!(79);
    row[7] = json!(79);
    row
}

fn roster_row() -> Row {
    let mut row = vec![Value::Null; 15];
    row[0] = json!(LAKERS);
    row[2] = json!("23");
    row[3] = json!("LeBron James");
    row[7] = json!("F");
    row[8] = json!("6-9");
    row[9] = json!("250");
    row[10] = json!("DEC 30, 1984");
    row[12] = json!("21");
    row[14] = json!(2544);
    row
}

/// Three active players, one retired, a Lakers roster, a points board of
/// twelve and one career line.
pub(crate) fn sample_snapshot() -> Snapshot {
    let mut snapshot = Snapshot {
        players: vec![
            entry(2544, "LeBron James", true),
            entry(1460, "James Worthy", false),
            entry(201939, "Stephen Curry", true),
            entry(201142, "Kevin Durant", true),
        ],
        ..Snapshot::default()
    };
    snapshot
        .player_info
        .insert(2544, vec![info_row(2544, "LeBron", "James", LAKERS)]);
    snapshot
        .player_info
        .insert(201939, vec![info_row(201939, "Stephen", "Curry", WARRIORS)]);
    snapshot
        .player_info
        .insert(201142, vec![info_row(201142, "Kevin", "Durant", SUNS)]);
    snapshot.rosters.insert(LAKERS, vec![roster_row()]);
    snapshot
        .leaders
        .insert("PTS".into(), (1..=12).map(leader_row).collect());
    snapshot.career.insert(2544, vec![career_row(2544)]);
    snapshot
}
