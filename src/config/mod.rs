pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "tsdr-lookup")]
#[command(about = "Batch lookup of USPTO TSDR trademark status records")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Application serial numbers, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub serials: Vec<String>,

    /// Login username
    #[arg(long)]
    pub username: String,

    /// Login password
    #[arg(long)]
    pub password: String,

    /// Override the configured output directory
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Serial numbers with surrounding whitespace stripped and empty
    /// tokens dropped.
    pub fn serial_numbers(&self) -> Vec<String> {
        self.serials
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("username", &self.username)?;
        validate_non_empty_string("password", &self.password)?;

        if self.serial_numbers().is_empty() {
            return Err(crate::utils::error::LookupError::ValidationError {
                message: "no serial numbers given (use --serials 97439760,77434372)".to_string(),
            });
        }

        Ok(())
    }
}
