pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use app::pipelines::course_pipeline::CoursePipeline;
pub use core::etl::EtlEngine;
pub use domain::model::{RunSummary, ScheduledMeeting, ScrapeTarget, Section};
pub use domain::services::{parse_html, parse_sections};
pub use utils::error::{EtlError, Result};
