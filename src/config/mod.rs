pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::BatchConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_one_of, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

/// Command line of the `qr-batch` binary. Flags override the TOML file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "qr-batch")]
#[command(about = "Generate QR code images from per-division link lists")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Root directory holding one subdirectory per division [default: PR-DIV]
    #[arg(long)]
    pub root: Option<String>,

    /// Marker subdirectory inside each division [default: TAK]
    #[arg(long)]
    pub marker: Option<String>,

    /// Link-list file name, or `*.ext` for every matching file [default: beacons.txt]
    #[arg(long)]
    pub link_list: Option<String>,

    /// Pixels per QR module [default: 10]
    #[arg(long)]
    pub module_size: Option<u32>,

    /// Quiet-zone width in modules [default: 4]
    #[arg(long)]
    pub quiet_zone: Option<u32>,

    /// Error-correction level: L, M, Q or H [default: M]
    #[arg(long)]
    pub ec_level: Option<String>,

    /// Fail instead of finishing quietly when the root directory is missing
    #[arg(long)]
    pub require_root: bool,

    /// Discover link lists and print planned files without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Log format: compact or json
    #[arg(long, default_value = "compact")]
    pub log_format: String,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merge defaults, the optional config file and command-line overrides.
    pub fn resolve(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_file(path)?,
            None => BatchConfig::default(),
        };

        if let Some(root) = &self.root {
            config.batch.root_dir = root.clone();
        }
        if let Some(marker) = &self.marker {
            config.batch.marker_dir = marker.clone();
        }
        if let Some(link_list) = &self.link_list {
            config.batch.link_list = link_list.clone();
        }
        if self.require_root {
            config.batch.require_root = true;
        }
        if let Some(module_size) = self.module_size {
            config.render.module_size = module_size;
        }
        if let Some(quiet_zone) = self.quiet_zone {
            config.render.quiet_zone = quiet_zone;
        }
        if let Some(ec_level) = &self.ec_level {
            config.render.ec_level = ec_level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_one_of("log_format", &self.log_format, &LOG_FORMATS)
    }
}
