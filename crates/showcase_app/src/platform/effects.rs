use std::sync::Arc;
use std::time::Duration;

use showcase_core::{AnalysisResult, Effect, MountEpoch, Msg, PreviewOutcome, PreviewTicket};
use showcase_engine::{
    AnalysisError, EngineEvent, EngineHandle, EngineStopped, LookupError, LookupId,
    MicrolinkResolver, PreviewMetadata, ReqwestAnalysisClient,
};
use showcase_logging::{showcase_debug, showcase_info, showcase_warn};

use super::config::AppConfig;

/// Runs core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig) -> Self {
        let resolver = Arc::new(MicrolinkResolver::new(config.resolver_settings()));
        let analyzer = Arc::new(ReqwestAnalysisClient::new(config.backend_settings()));
        Self {
            engine: EngineHandle::new(resolver, analyzer),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestAnalysis {
                    request_id,
                    repo_url,
                } => {
                    showcase_info!("RequestAnalysis request_id={} repo_url={}", request_id, repo_url);
                    self.engine.analyze(request_id, repo_url);
                }
                Effect::ResolvePreview { ticket, url } => {
                    showcase_debug!(
                        "ResolvePreview epoch={} slot={} url={}",
                        ticket.epoch.0,
                        ticket.slot,
                        url
                    );
                    self.engine.resolve(lookup_id(ticket), url);
                }
                Effect::CancelEpoch(epoch) => {
                    showcase_debug!("CancelEpoch epoch={}", epoch.0);
                    self.engine.cancel_scope(epoch.0);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(event_to_msg))
    }
}

fn lookup_id(ticket: PreviewTicket) -> LookupId {
    LookupId {
        scope: ticket.epoch.0,
        slot: ticket.slot,
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::LookupCompleted { id, result } => Msg::PreviewSettled {
            ticket: PreviewTicket {
                epoch: MountEpoch(id.scope),
                slot: id.slot,
            },
            outcome: map_lookup(result),
        },
        EngineEvent::AnalysisCompleted { request_id, result } => Msg::AnalysisCompleted {
            request_id,
            result: map_analysis(result),
        },
    }
}

/// Every lookup failure collapses into `Unavailable`; the reason only reaches the log.
fn map_lookup(result: Result<PreviewMetadata, LookupError>) -> PreviewOutcome {
    match result {
        Ok(meta) => PreviewOutcome::Resolved {
            image_url: meta.image_url,
            title: meta.title,
        },
        Err(_) => PreviewOutcome::Unavailable,
    }
}

fn map_analysis(result: Result<serde_json::Value, AnalysisError>) -> Result<AnalysisResult, String> {
    let value = result.map_err(|err| {
        showcase_warn!("Analysis failed: {}", err);
        err.to_string()
    })?;
    AnalysisResult::from_value(value).map_err(|err| {
        showcase_warn!("Analysis payload rejected: {}", err);
        format!("unexpected analysis result: {err}")
    })
}
