use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use showcase_logging::{showcase_info, showcase_warn};

use crate::http::{read_capped, BodyError};
use crate::AnalysisError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const ANALYZE_PATH: &str = "/api/analyze";
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Asks the analysis backend to analyse one repository.
#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, repo_url: &str) -> Result<Value, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    settings: BackendSettings,
}

impl ReqwestAnalysisClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, AnalysisError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| AnalysisError::Network(err.to_string()))
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn analyze(&self, repo_url: &str) -> Result<Value, AnalysisError> {
        let client = self.build_client()?;
        let payload = serde_json::json!({ "repo_url": repo_url });
        let endpoint = self.endpoint();

        showcase_info!("Requesting analysis repo_url={} endpoint={}", repo_url, endpoint);
        let response = client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|err| AnalysisError::Network(err.to_string()))?;

        let status = response.status();
        let body = read_capped(response, self.settings.max_body_bytes)
            .await
            .map_err(|err| match err {
                BodyError::TooLarge { max_bytes, .. } => AnalysisError::TooLarge { max_bytes },
                BodyError::Transport(err) => AnalysisError::Network(err.to_string()),
            })?;
        let json: Value = serde_json::from_slice(&body)
            .map_err(|err| AnalysisError::Malformed(err.to_string()))?;

        if !status.is_success() {
            let message = json
                .get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            showcase_warn!("Analysis rejected status={} error={}", status, message);
            return Err(AnalysisError::Rejected(message));
        }

        Ok(json)
    }
}
