use std::time::Duration;

use serde_json::Value;
use showcase_logging::showcase_debug;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::http::{read_capped, BodyError};
use crate::{FailureKind, LookupError, PreviewMetadata};

pub const DEFAULT_METADATA_ENDPOINT: &str = "https://api.microlink.io/";

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// `None` lets a slow lookup stay pending for as long as the service takes.
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Looks up preview metadata for one link. One call, no retries.
#[async_trait::async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<PreviewMetadata, LookupError>;
}

/// Races a lookup against `token`; a cancelled lookup reports `FailureKind::Cancelled`.
pub async fn resolve_cancellable(
    resolver: &dyn MetadataResolver,
    url: &str,
    token: &CancellationToken,
) -> Result<PreviewMetadata, LookupError> {
    tokio::select! {
        _ = token.cancelled() => Err(LookupError::new(FailureKind::Cancelled, "lookup cancelled")),
        result = resolver.resolve(url) => result,
    }
}

/// Resolver backed by a Microlink-compatible metadata API.
#[derive(Debug, Clone)]
pub struct MicrolinkResolver {
    settings: ResolverSettings,
}

impl MicrolinkResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, LookupError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| LookupError::new(FailureKind::Network, err.to_string()))
    }

    fn lookup_url(&self, url: &str) -> Result<Url, LookupError> {
        let mut endpoint = Url::parse(&self.settings.endpoint)
            .map_err(|err| LookupError::new(FailureKind::InvalidUrl, err.to_string()))?;
        endpoint.query_pairs_mut().append_pair("url", url);
        Ok(endpoint)
    }
}

#[async_trait::async_trait]
impl MetadataResolver for MicrolinkResolver {
    async fn resolve(&self, url: &str) -> Result<PreviewMetadata, LookupError> {
        let lookup_url = self.lookup_url(url)?;
        let client = self.build_client()?;

        showcase_debug!("Metadata lookup start url={}", url);
        let response = client
            .get(lookup_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = read_capped(response, self.settings.max_body_bytes)
            .await
            .map_err(|err| match err {
                BodyError::TooLarge { max_bytes, actual } => LookupError::new(
                    FailureKind::TooLarge { max_bytes, actual },
                    "response too large",
                ),
                BodyError::Transport(err) => map_reqwest_error(err),
            })?;

        parse_metadata(url, &body)
    }
}

/// Interprets a metadata response without trusting its shape.
///
/// Only `status == "success"` with a non-empty `data.image.url` yields metadata;
/// a missing or empty title falls back to the looked-up link.
pub fn parse_metadata(url: &str, body: &[u8]) -> Result<PreviewMetadata, LookupError> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|err| LookupError::new(FailureKind::Malformed, err.to_string()))?;

    let status = json.get("status").and_then(Value::as_str).unwrap_or_default();
    if status != "success" {
        return Err(LookupError::new(
            FailureKind::ServiceStatus(status.to_string()),
            "metadata service did not report success",
        ));
    }

    let image_url = json
        .pointer("/data/image/url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|image| !image.is_empty())
        .ok_or_else(|| LookupError::new(FailureKind::NoImage, "response carries no image"))?;

    let title = json
        .pointer("/data/title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(url);

    Ok(PreviewMetadata {
        image_url: image_url.to_string(),
        title: title.to_string(),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::new(FailureKind::Timeout, err.to_string());
    }
    LookupError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_metadata, FailureKind};

    #[test]
    fn success_with_image_and_title() {
        let body = br#"{"status":"success","data":{"title":"Demo","image":{"url":"https://img/a.png"}}}"#;
        let meta = parse_metadata("https://a.io/x", body).unwrap();
        assert_eq!(meta.image_url, "https://img/a.png");
        assert_eq!(meta.title, "Demo");
    }

    #[test]
    fn missing_title_defaults_to_link() {
        let body = br#"{"status":"success","data":{"title":null,"image":{"url":"https://img/a.png"}}}"#;
        let meta = parse_metadata("https://a.io/x", body).unwrap();
        assert_eq!(meta.title, "https://a.io/x");
    }

    #[test]
    fn non_success_status_is_rejected() {
        let body = br#"{"status":"fail","data":{"image":{"url":"https://img/a.png"}}}"#;
        let err = parse_metadata("https://a.io/x", body).unwrap_err();
        assert_eq!(err.kind, FailureKind::ServiceStatus("fail".to_string()));
    }

    #[test]
    fn missing_or_empty_image_is_rejected() {
        for body in [
            &br#"{"status":"success","data":{"image":null}}"#[..],
            &br#"{"status":"success","data":{"image":{"url":""}}}"#[..],
            &br#"{"status":"success","data":{"image":"https://img/a.png"}}"#[..],
            &br#"{"status":"success"}"#[..],
        ] {
            let err = parse_metadata("https://a.io/x", body).unwrap_err();
            assert_eq!(err.kind, FailureKind::NoImage);
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_metadata("https://a.io/x", b"<html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Malformed);
    }
}
