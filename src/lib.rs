pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::SplitConfig;
pub use crate::core::split::{filter_by_city, load, write_if_nonempty};
pub use crate::core::{etl::EtlEngine, pipeline::CitySplitPipeline};
pub use utils::error::{Result, SplitError};
