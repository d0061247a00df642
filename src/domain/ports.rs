use crate::domain::model::{ScrapeTarget, SourcePage, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Write-only sink for load output; `path` is relative to the storage root.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Listing page without query string.
    fn base_url(&self) -> &str;
    fn targets(&self) -> Vec<ScrapeTarget>;
    /// Local page to parse instead of fetching `base_url`.
    fn html_file(&self) -> Option<&str> {
        None
    }
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
    fn write_documents(&self) -> bool;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout_secs(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourcePage>>;
    async fn transform(&self, pages: Vec<SourcePage>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
