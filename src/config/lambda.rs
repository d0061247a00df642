use crate::adapters::http::DEFAULT_BASE_URL;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::ScrapeTarget;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use aws_sdk_s3::Client as S3Client;
use std::env;

const DEFAULT_OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub base_url: String,
    pub campuses: Vec<String>,
    pub terms: Vec<String>,
    pub subjects: Vec<String>,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub concurrent_requests: usize,
    pub output_formats: Vec<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            campuses: list_from_env("CAMPUSES", "1"),
            terms: list_from_env("TERMS", "202101"),
            subjects: list_from_env("SUBJECTS", "CSCI"),
            s3_bucket: env::var("S3_BUCKET").map_err(|_| EtlError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "course-etl".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            concurrent_requests: env::var("CONCURRENT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            output_formats: DEFAULT_OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
        })
    }
}

/// 逗號分隔的環境變數，例如 SUBJECTS=CSCI,ECE
fn list_from_env(name: &str, default: &str) -> Vec<String> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    split_list(&raw)
}

pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ConfigProvider for LambdaConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn targets(&self) -> Vec<ScrapeTarget> {
        ScrapeTarget::expand(&self.campuses, &self.terms, &self.subjects)
    }

    fn output_path(&self) -> &str {
        &self.s3_prefix
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress(&self) -> bool {
        false
    }

    fn write_documents(&self) -> bool {
        true
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout_secs(&self) -> u64 {
        30
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_codes("campuses", &self.campuses)?;
        validation::validate_codes("terms", &self.terms)?;
        validation::validate_codes("subjects", &self.subjects)?;

        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;
        validation::validate_non_empty_string("s3_prefix", &self.s3_prefix)?;
        validate_aws_region("s3_region", &self.s3_region)?;

        validation::validate_range("concurrent_requests", self.concurrent_requests, 1, 100)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Objects land under `{prefix}/` in the bucket.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn key(&self, path: &str) -> String {
        object_key(&self.prefix, path)
    }
}

fn object_key(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!(
                    "Failed to write s3://{}/{}: {}",
                    self.bucket,
                    key,
                    e.into_service_error()
                ),
            })?;

        tracing::debug!("Wrote s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LambdaConfig {
        LambdaConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            campuses: vec!["1".to_string()],
            terms: vec!["202101".to_string()],
            subjects: vec!["CSCI".to_string(), "ECE".to_string()],
            s3_bucket: "course-listings".to_string(),
            s3_prefix: "course-etl".to_string(),
            s3_region: "us-east-1".to_string(),
            concurrent_requests: 5,
            output_formats: vec!["json".to_string()],
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("CSCI, ECE,,MAE "), vec!["CSCI", "ECE", "MAE"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("course-etl/", "run.json"), "course-etl/run.json");
        assert_eq!(object_key("", "run.json"), "run.json");
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());
        assert_eq!(config().targets().len(), 2);

        let mut bad = config();
        bad.s3_bucket = "Bad_Bucket".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.s3_region = "US East".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.subjects.clear();
        assert!(matches!(
            bad.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
