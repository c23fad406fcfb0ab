pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod scoring;
pub mod search;

pub use config::Config;
pub use error::{ErrorBody, HttpError, SearchError};
pub use search::{CriteriaSearchOutcome, MessageSearchOutcome, SearchListingsUseCase};
