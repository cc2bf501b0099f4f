use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use showcase_logging::{showcase_debug, showcase_trace};
use tokio_util::sync::CancellationToken;

use crate::analyze::AnalysisClient;
use crate::resolver::{resolve_cancellable, MetadataResolver};
use crate::{EngineEvent, EngineStopped, FailureKind, LookupId, RequestId, ScopeId};

enum EngineCommand {
    Resolve { id: LookupId, url: String },
    CancelScope(ScopeId),
    Analyze { request_id: RequestId, repo_url: String },
}

/// Front door to the IO thread. Commands are processed in send order; results
/// come back as `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(resolver: Arc<dyn MetadataResolver>, analyzer: Arc<dyn AnalysisClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut scopes = ScopeTokens::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Resolve { id, url } => {
                        let Some(token) = scopes.child(id.scope) else {
                            showcase_debug!("Dropping lookup {:?} for retired scope", id);
                            continue;
                        };
                        let resolver = resolver.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_lookup(resolver.as_ref(), id, url, token, event_tx).await;
                        });
                    }
                    EngineCommand::CancelScope(scope) => scopes.cancel(scope),
                    EngineCommand::Analyze {
                        request_id,
                        repo_url,
                    } => {
                        let analyzer = analyzer.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = analyzer.analyze(&repo_url).await;
                            let _ = event_tx.send(EngineEvent::AnalysisCompleted { request_id, result });
                        });
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn resolve(&self, id: LookupId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Resolve {
            id,
            url: url.into(),
        });
    }

    /// Abandons every lookup started under `scope`, in flight or not yet started.
    pub fn cancel_scope(&self, scope: ScopeId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelScope(scope));
    }

    pub fn analyze(&self, request_id: RequestId, repo_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Analyze {
            request_id,
            repo_url: repo_url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        recv_event(&self.event_rx, timeout)
    }
}

fn recv_event(
    event_rx: &mpsc::Receiver<EngineEvent>,
    timeout: Duration,
) -> Result<Option<EngineEvent>, EngineStopped> {
    match event_rx.recv_timeout(timeout) {
        Ok(event) => Ok(Some(event)),
        Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
    }
}

/// One parent token per scope; every lookup runs under a child of it so a
/// single cancel reaches all of them.
///
/// Scopes are mount epochs and only grow, so cancelling a scope retires it and
/// every scope below it.
#[derive(Default)]
struct ScopeTokens {
    live: HashMap<ScopeId, CancellationToken>,
    retired_through: Option<ScopeId>,
}

impl ScopeTokens {
    fn is_retired(&self, scope: ScopeId) -> bool {
        self.retired_through.is_some_and(|through| scope <= through)
    }

    fn child(&mut self, scope: ScopeId) -> Option<CancellationToken> {
        if self.is_retired(scope) {
            return None;
        }
        Some(self.live.entry(scope).or_insert_with(CancellationToken::new).child_token())
    }

    fn cancel(&mut self, scope: ScopeId) {
        if !self.is_retired(scope) {
            self.retired_through = Some(scope);
        }
        self.live.retain(|&live_scope, token| {
            if live_scope > scope {
                return true;
            }
            showcase_debug!("Cancelling lookups for scope {}", live_scope);
            token.cancel();
            false
        });
    }
}

async fn run_lookup(
    resolver: &dyn MetadataResolver,
    id: LookupId,
    url: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = resolve_cancellable(resolver, &url, &token).await;
    match &result {
        Err(err) if err.kind == FailureKind::Cancelled => {
            showcase_trace!("Lookup {:?} cancelled url={}", id, url);
            return;
        }
        Err(err) => showcase_debug!("Lookup {:?} unavailable url={} reason={}", id, url, err),
        Ok(meta) => showcase_debug!("Lookup {:?} resolved url={} image={}", id, url, meta.image_url),
    }
    if token.is_cancelled() {
        return;
    }
    let _ = event_tx.send(EngineEvent::LookupCompleted { id, result });
}
