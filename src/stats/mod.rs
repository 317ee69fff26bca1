//! Statistics layer: the upstream provider boundary, domain records and the
//! player/team services the API memoizes.

mod category;
mod error;
mod pagination;
mod records;
mod service;
mod source;
mod teams;

#[cfg(test)]
pub(crate) mod testing;

pub use category::{Category, UnknownCategory};
pub use error::{SourceError, StatsError};
pub use pagination::Pagination;
pub use records::{
    PlayerAverages, PlayerCategoryLeader, PlayerPage, PlayerSummary, Team, normalize_birth_date,
    player_image_url, team_image_url,
};
pub use service::{StatsService, clamp_leaders};
pub use source::{PlayerIndexEntry, Row, Snapshot, SnapshotSource, StatsSource, Upstream};
pub use teams::{FRANCHISES, Franchise, UNKNOWN_GROUP, conference_of, division_of, find_franchise};
