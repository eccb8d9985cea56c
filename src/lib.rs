pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use app::runner::SampleRunner;
#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command, OutputFormat};

pub use adapters::{analysis::AnalysisClient, pubsub::PubsubClient};
pub use config::{toml_config::TomlConfig, Settings};
pub use utils::error::{Result, SampleError};
