use thiserror::Error;

use crate::{Response, StatusCode};

/// Failure of the upstream statistics source itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("statistics source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed statistics data: {0}")]
    Malformed(String),
}

/// Failure of a statistics service call, mapped onto an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Player with ID {0} not found")]
    PlayerNotFound(i64),

    #[error("The ID {0} is not a valid team ID")]
    TeamNotFound(i64),

    #[error("{0}")]
    Timeout(&'static str),

    #[error("invalid {record} row at column {column}: {reason}")]
    InvalidRow {
        record: &'static str,
        column: usize,
        reason: String,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl StatsError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PlayerNotFound(_) | Self::TeamNotFound(_) => StatusCode::NotFound,
            Self::Timeout(_) => StatusCode::GatewayTimeout,
            Self::InvalidRow { .. } => StatusCode::InternalServerError,
            Self::Source(_) => StatusCode::BadGateway,
        }
    }
}

impl From<StatsError> for Response {
    fn from(err: StatsError) -> Self {
        Response::detail(err.status(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(StatsError::PlayerNotFound(1).status(), StatusCode::NotFound);
        assert_eq!(StatsError::TeamNotFound(1).status(), StatusCode::NotFound);
        assert_eq!(StatsError::Timeout("slow").status(), StatusCode::GatewayTimeout);
        assert_eq!(
            StatsError::from(SourceError::Unavailable("down".into())).status(),
            StatusCode::BadGateway
        );
    }

    #[test]
    fn detail_messages() {
        assert_eq!(
            StatsError::PlayerNotFound(2544).to_string(),
            "Player with ID 2544 not found"
        );
        assert_eq!(
            StatsError::TeamNotFound(7).to_string(),
            "The ID 7 is not a valid team ID"
        );
    }
}
