pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{FilePageSource, HttpPageSource};
pub use config::toml_config::ScoutConfig;
pub use crate::core::{fetcher::TransferFetcher, parser::ParseRules};
pub use domain::model::{Group, GroupReport, Listing, TransferReport};
pub use utils::error::{Result, ScoutError};
