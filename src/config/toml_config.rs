use crate::adapters::http::DEFAULT_BASE_URL;
use crate::core::ConfigProvider;
use crate::domain::model::ScrapeTarget;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub targets: TargetsConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    pub campuses: Vec<String>,
    pub terms: Vec<String>,
    pub subjects: Vec<String>,
    /// 離線模式：解析已存檔的頁面
    pub html_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    /// 是否輸出每個 section 的文件 (預設 true)
    pub documents: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TERM_ID})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn targets(&self) -> Vec<ScrapeTarget> {
        ScrapeTarget::expand(
            &self.targets.campuses,
            &self.targets.terms,
            &self.targets.subjects,
        )
    }

    fn html_file(&self) -> Option<&str> {
        self.targets.html_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.load.compression.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    fn write_documents(&self) -> bool {
        self.load.documents.unwrap_or(true)
    }

    fn concurrent_requests(&self) -> usize {
        self.extract.concurrent_requests.unwrap_or(5)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_range("source.timeout_seconds", self.request_timeout_secs(), 1, 300)?;

        validation::validate_codes("targets.campuses", &self.targets.campuses)?;
        validation::validate_codes("targets.terms", &self.targets.terms)?;
        validation::validate_codes("targets.subjects", &self.targets.subjects)?;

        if let Some(file) = &self.targets.html_file {
            validation::validate_file_extensions(
                "targets.html_file",
                std::slice::from_ref(file),
                &["html", "htm"],
            )?;
            if self.targets().len() != 1 {
                return Err(EtlError::ConfigValidationError {
                    field: "targets.html_file".to_string(),
                    message: "a local page needs exactly one campus, term and subject".to_string(),
                });
            }
        }

        validation::validate_positive_number(
            "extract.concurrent_requests",
            self.concurrent_requests(),
            1,
        )?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        Ok(())
    }
}
