use crate::domain::model::ScrapeTarget;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default listing page ("print" view, one table per section).
pub const DEFAULT_BASE_URL: &str = "https://my.gwu.edu/mod/pws/print.cfm";

/// Downloads listing pages. No retries: a failed page fails the run.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: String,
}

impl PageFetcher {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// `{base}?campId=..&termId=..&subjId=..`
    pub fn listing_url(&self, target: &ScrapeTarget) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| EtlError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        url.query_pairs_mut()
            .append_pair("campId", &target.campus)
            .append_pair("termId", &target.term)
            .append_pair("subjId", &target.subject);

        Ok(url)
    }

    /// Page HTML for one target, plus the URL it came from.
    pub async fn fetch(&self, target: &ScrapeTarget) -> Result<(String, String)> {
        let url = self.listing_url(target)?;
        tracing::debug!("Fetching listing page: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Listing response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::FetchError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        Ok((url.to_string(), html))
    }
}
