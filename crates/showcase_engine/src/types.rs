use std::fmt;

/// Groups lookups that are cancelled together.
pub type ScopeId = u64;
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupId {
    pub scope: ScopeId,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMetadata {
    pub image_url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    LookupCompleted {
        id: LookupId,
        result: Result<PreviewMetadata, LookupError>,
    },
    AnalysisCompleted {
        request_id: RequestId,
        result: Result<serde_json::Value, AnalysisError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct LookupError {
    pub kind: FailureKind,
    pub message: String,
}

impl LookupError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    /// The service answered with a status other than `success`.
    ServiceStatus(String),
    NoImage,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::ServiceStatus(status) => write!(f, "service status {status}"),
            FailureKind::NoImage => write!(f, "no preview image"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure of the backend analysis request. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The backend refused the request and said why.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
}

/// The IO thread is gone; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine thread stopped")]
pub struct EngineStopped;
