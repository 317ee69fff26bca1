//! Static franchise table and conference/division grouping.

/// Conference and division reported for teams outside the table.
pub const UNKNOWN_GROUP: &str = "N/A";

/// One franchise as the statistics provider identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Franchise {
    pub id: i64,
    pub full_name: &'static str,
    pub abbreviation: &'static str,
    pub nickname: &'static str,
    pub city: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
}

const fn franchise(
    id: i64,
    abbreviation: &'static str,
    full_name: &'static str,
    nickname: &'static str,
    city: &'static str,
    conference: &'static str,
    division: &'static str,
) -> Franchise {
    Franchise {
        id,
        full_name,
        abbreviation,
        nickname,
        city,
        conference,
        division,
    }
}

const EAST: &str = "East";
const WEST: &str = "West";

pub static FRANCHISES: [Franchise; 30] = [
    franchise(1610612737, "ATL", "Atlanta Hawks", "Hawks", "Atlanta", EAST, "Southeast"),
    franchise(1610612738, "BOS", "Boston Celtics", "Celtics", "Boston", EAST, "Atlantic"),
    franchise(1610612739, "CLE", "Cleveland Cavaliers", "Cavaliers", "Cleveland", EAST, "Central"),
    franchise(1610612740, "NOP", "New Orleans Pelicans", "Pelicans", "New Orleans", WEST, "Southwest"),
    franchise(1610612741, "CHI", "Chicago Bulls", "Bulls", "Chicago", EAST, "Central"),
    franchise(1610612742, "DAL", "Dallas Mavericks", "Mavericks", "Dallas", WEST, "Southwest"),
    franchise(1610612743, "DEN", "Denver Nuggets", "Nuggets", "Denver", WEST, "Northwest"),
    franchise(1610612744, "GSW", "Golden State Warriors", "Warriors", "Golden State", WEST, "Pacific"),
    franchise(1610612745, "HOU", "Houston Rockets", "Rockets", "Houston", WEST, "Southwest"),
    franchise(1610612746, "LAC", "Los Angeles Clippers", "Clippers", "Los Angeles", WEST, "Pacific"),
    franchise(1610612747, "LAL", "Los Angeles Lakers", "Lakers", "Los Angeles", WEST, "Pacific"),
    franchise(1610612748, "MIA", "Miami Heat", "Heat", "Miami", EAST, "Southeast"),
    franchise(1610612749, "MIL", "Milwaukee Bucks", "Bucks", "Milwaukee", EAST, "Central"),
    franchise(1610612750, "MIN", "Minnesota Timberwolves", "Timberwolves", "Minnesota", WEST, "Northwest"),
    franchise(1610612751, "BKN", "Brooklyn Nets", "Nets", "Brooklyn", EAST, "Atlantic"),
    franchise(1610612752, "NYK", "New York Knicks", "Knicks", "New York", EAST, "Atlantic"),
    franchise(1610612753, "ORL", "Orlando Magic", "Magic", "Orlando", EAST, "Southeast"),
    franchise(1610612754, "IND", "Indiana Pacers", "Pacers", "Indiana", EAST, "Central"),
    franchise(1610612755, "PHI", "Philadelphia 76ers", "76ers", "Philadelphia", EAST, "Atlantic"),
    franchise(1610612756, "PHX", "Phoenix Suns", "Suns", "Phoenix", WEST, "Pacific"),
    franchise(1610612757, "POR", "Portland Trail Blazers", "Trail Blazers", "Portland", WEST, "Northwest"),
    franchise(1610612758, "SAC", "Sacramento Kings", "Kings", "Sacramento", WEST, "Pacific"),
    franchise(1610612759, "SAS", "San Antonio Spurs", "Spurs", "San Antonio", WEST, "Southwest"),
    franchise(1610612760, "OKC", "Oklahoma City Thunder", "Thunder", "Oklahoma City", WEST, "Northwest"),
    franchise(1610612761, "TOR", "Toronto Raptors", "Raptors", "Toronto", EAST, "Atlantic"),
    franchise(1610612762, "UTA", "Utah Jazz", "Jazz", "Utah", WEST, "Northwest"),
    franchise(1610612763, "MEM", "Memphis Grizzlies", "Grizzlies", "Memphis", WEST, "Southwest"),
    franchise(1610612764, "WAS", "Washington Wizards", "Wizards", "Washington", EAST, "Southeast"),
    franchise(1610612765, "DET", "Detroit Pistons", "Pistons", "Detroit", EAST, "Central"),
    franchise(1610612766, "CHA", "Charlotte Hornets", "Hornets", "Charlotte", EAST, "Southeast"),
];

pub fn find_franchise(team_id: i64) -> Option<&'static Franchise> {
    FRANCHISES.iter().find(|f| f.id == team_id)
}

/// Conference of `team_id`, or `"N/A"`.
pub fn conference_of(team_id: i64) -> &'static str {
    find_franchise(team_id).map_or(UNKNOWN_GROUP, |f| f.conference)
}

/// Division of `team_id`, or `"N/A"`.
pub fn division_of(team_id: i64) -> &'static str {
    find_franchise(team_id).map_or(UNKNOWN_GROUP, |f| f.division)
}
