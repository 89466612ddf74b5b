pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::{ascope_pipeline::AscopePipeline, municipality_pipeline::MunicipalityPipeline};
pub use config::{cli::LocalStorage, toml_config::BatchConfig};
pub use core::{etl::EtlEngine, pipeline::QrBatchPipeline};
pub use domain::model::BatchReport;
pub use utils::error::{Result, ToolError};
