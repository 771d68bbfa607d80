// src/error.rs
use thiserror::Error;

/// Failures from required upstream calls (GitHub profile/events, completion API).
///
/// Only the conditions the service cannot repair locally travel through this
/// type; generation and extraction failures are absorbed by the fallback path
/// and never reach callers.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream identity not found")]
    NotFound,

    #[error("upstream rejected credentials")]
    AuthInvalid,

    #[error("upstream rate limit or quota exhausted")]
    RateLimited,

    #[error("upstream returned non-success status {status}")]
    Unavailable { status: u16 },

    #[error("upstream call exceeded its timeout budget")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    /// Map a non-success HTTP status to the taxonomy. 403 is folded into
    /// `RateLimited` because GitHub signals quota exhaustion with it.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            404 => Self::NotFound,
            401 => Self::AuthInvalid,
            403 | 429 => Self::RateLimited,
            s => Self::Unavailable { status: s },
        }
    }

    /// Normalize reqwest timeouts into the `Timeout` variant so callers can
    /// treat them uniformly with any other transport failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert!(matches!(
            UpstreamError::from_status(StatusCode::NOT_FOUND),
            UpstreamError::NotFound
        ));
        assert!(matches!(
            UpstreamError::from_status(StatusCode::UNAUTHORIZED),
            UpstreamError::AuthInvalid
        ));
        assert!(matches!(
            UpstreamError::from_status(StatusCode::FORBIDDEN),
            UpstreamError::RateLimited
        ));
        assert!(matches!(
            UpstreamError::from_status(StatusCode::TOO_MANY_REQUESTS),
            UpstreamError::RateLimited
        ));
        assert!(matches!(
            UpstreamError::from_status(StatusCode::BAD_GATEWAY),
            UpstreamError::Unavailable { status: 502 }
        ));
    }
}
