use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaceMapError>;

/// Message shown when the provider could not be reached at all.
pub const UNAVAILABLE_MESSAGE: &str = "Can not retrieve places. Please reload the page.";

/// Message shown when the provider answered but refused the request.
pub const REJECTED_MESSAGE: &str = "Can not retrieve all the places. Please reload the page.";

#[derive(Error, Debug)]
pub enum PlaceMapError {
    /// Network or transport failure talking to the venue provider.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered with a non-success status.
    #[error("Provider rejected request (code {code}): {error_type}: {detail}")]
    ProviderRejected {
        code: u16,
        error_type: String,
        detail: String,
    },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl PlaceMapError {
    /// The single message surfaced to the user when a session aborts.
    pub fn user_message(&self) -> String {
        match self {
            PlaceMapError::ProviderUnavailable(_) => UNAVAILABLE_MESSAGE.to_string(),
            PlaceMapError::ProviderRejected { .. } => REJECTED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
