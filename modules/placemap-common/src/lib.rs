pub mod config;
pub mod display;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{PlaceMapError, Result};
pub use types::*;
