//! Client for the relay's `/api/startup-info` endpoint.

use dossier_core::{CanonicalDossier, DomainString, FetchError};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    endpoint: Url,
}

impl BackendClient {
    /// Fails when `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = Url::parse(&format!("{}/api/startup-info", base_url))
            .map_err(|e| FetchError::BackendUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(FetchError::BackendUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            endpoint,
        })
    }

    /// `DOSSIER_BACKEND_URL`, falling back to the local relay.
    pub fn from_env() -> Result<Self, FetchError> {
        let base = std::env::var("DOSSIER_BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self::new(base.trim())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL with the domain percent-encoded.
    pub fn startup_info_url(&self, domain: &DomainString) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("domain", domain.as_str());
        url
    }

    pub async fn fetch_dossier(&self, domain: &DomainString) -> Result<CanonicalDossier, FetchError> {
        let url = self.startup_info_url(domain);
        let res = self.client.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "backend answered with an error");
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = res.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
