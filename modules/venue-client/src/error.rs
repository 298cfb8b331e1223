use thiserror::Error;

pub type Result<T> = std::result::Result<T, VenueError>;

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (code {code}): {error_type}: {error_detail}")]
    Api {
        code: u16,
        error_type: String,
        error_detail: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response has no `{0}` resource")]
    MissingResource(String),
}

impl From<reqwest::Error> for VenueError {
    fn from(err: reqwest::Error) -> Self {
        VenueError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for VenueError {
    fn from(err: serde_json::Error) -> Self {
        VenueError::Parse(err.to_string())
    }
}
