pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::toml_config::AppConfig;
pub use config::{cli::LocalStorage, CliConfig};
pub use core::{engine::LookupEngine, pipeline::LookupPipeline, session::Session};
pub use utils::error::{LookupError, Result};
