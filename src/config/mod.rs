pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::http::DEFAULT_BASE_URL;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::ScrapeTarget;
#[cfg(feature = "cli")]
use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "course-etl")]
#[command(about = "Scrapes university course listing pages into section records")]
pub struct CliConfig {
    /// Listing page, without query string
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Campus codes (1 = main, 3 = off campus, 7 = online, ...)
    #[arg(long = "campus", value_delimiter = ',', default_value = "1")]
    pub campuses: Vec<String>,

    /// Term ids: year + 01 spring / 02 summer / 03 fall
    #[arg(long = "term", value_delimiter = ',', default_value = "202101")]
    pub terms: Vec<String>,

    /// Subject codes, e.g. CSCI,ECE
    #[arg(long = "subject", value_delimiter = ',', default_value = "CSCI")]
    pub subjects: Vec<String>,

    /// Parse a saved listing page instead of fetching
    #[arg(long)]
    pub html_file: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_values_t = [String::from("json"), String::from("csv")])]
    pub output_formats: Vec<String>,

    /// Pack the bundle files into one zip archive
    #[arg(long)]
    pub compress: bool,

    /// Skip the per-section documents under terms/
    #[arg(long)]
    pub no_documents: bool,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn targets(&self) -> Vec<ScrapeTarget> {
        ScrapeTarget::expand(&self.campuses, &self.terms, &self.subjects)
    }

    fn html_file(&self) -> Option<&str> {
        self.html_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress(&self) -> bool {
        self.compress
    }

    fn write_documents(&self) -> bool {
        !self.no_documents
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_codes("campus", &self.campuses)?;
        validation::validate_codes("term", &self.terms)?;
        validation::validate_codes("subject", &self.subjects)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validation::validate_range("request_timeout", self.request_timeout, 1, 300)?;

        if let Some(file) = &self.html_file {
            validation::validate_file_extensions(
                "html_file",
                std::slice::from_ref(file),
                &["html", "htm"],
            )?;
            if self.targets().len() != 1 {
                return Err(EtlError::ConfigValidationError {
                    field: "html_file".to_string(),
                    message: "a local page needs exactly one campus, term and subject".to_string(),
                });
            }
        }

        Ok(())
    }
}
