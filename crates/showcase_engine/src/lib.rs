//! Showcase engine: metadata lookups, backend requests and effect execution.
mod analyze;
mod engine;
mod http;
mod resolver;
mod types;

pub use analyze::{AnalysisClient, BackendSettings, ReqwestAnalysisClient, DEFAULT_BACKEND_URL};
pub use engine::EngineHandle;
pub use resolver::{
    parse_metadata, resolve_cancellable, MetadataResolver, MicrolinkResolver, ResolverSettings,
    DEFAULT_METADATA_ENDPOINT,
};
pub use types::{
    AnalysisError, EngineEvent, EngineStopped, FailureKind, LookupError, LookupId,
    PreviewMetadata, RequestId, ScopeId,
};
