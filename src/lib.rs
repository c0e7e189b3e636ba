pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::migration_pipeline::MigrationPipeline;
pub use config::{cli::LocalStorage, toml_config::MigrationConfig};
pub use crate::core::{
    etl::MigrationEngine,
    poster::{Credentials, CurlPoster, HttpPoster},
};
pub use utils::error::{MigrateError, Result};
