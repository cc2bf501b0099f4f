use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use showcase_engine::{
    AnalysisClient, AnalysisError, EngineEvent, EngineHandle, FailureKind, LookupError, LookupId,
    MetadataResolver, PreviewMetadata,
};

/// Resolves after `delay`; links containing "broken" fail.
struct DelayedResolver {
    delay: Duration,
}

#[async_trait::async_trait]
impl MetadataResolver for DelayedResolver {
    async fn resolve(&self, url: &str) -> Result<PreviewMetadata, LookupError> {
        tokio::time::sleep(self.delay).await;
        if url.contains("broken") {
            return Err(LookupError {
                kind: FailureKind::NoImage,
                message: "no image".to_string(),
            });
        }
        Ok(PreviewMetadata {
            image_url: format!("{url}/preview.png"),
            title: url.to_string(),
        })
    }
}

struct EchoAnalyzer;

#[async_trait::async_trait]
impl AnalysisClient for EchoAnalyzer {
    async fn analyze(&self, repo_url: &str) -> Result<serde_json::Value, AnalysisError> {
        if repo_url.is_empty() {
            return Err(AnalysisError::Rejected("empty".to_string()));
        }
        Ok(serde_json::json!({ "name": repo_url }))
    }
}

fn engine(delay: Duration) -> EngineHandle {
    EngineHandle::new(Arc::new(DelayedResolver { delay }), Arc::new(EchoAnalyzer))
}

fn id(scope: u64, slot: usize) -> LookupId {
    LookupId { scope, slot }
}

fn drain(engine: &EngineHandle, wait: Duration) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = engine.recv_timeout(wait) {
        events.push(event);
    }
    events
}

#[test]
fn lookups_complete_independently() {
    let engine = engine(Duration::from_millis(10));
    engine.resolve(id(1, 0), "https://a.io");
    engine.resolve(id(1, 1), "https://broken.io");

    let mut events = drain(&engine, Duration::from_millis(500));
    events.sort_by_key(|event| match event {
        EngineEvent::LookupCompleted { id, .. } => id.slot,
        EngineEvent::AnalysisCompleted { .. } => usize::MAX,
    });

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        EngineEvent::LookupCompleted {
            id: id(1, 0),
            result: Ok(PreviewMetadata {
                image_url: "https://a.io/preview.png".to_string(),
                title: "https://a.io".to_string(),
            }),
        }
    );
    assert!(matches!(
        &events[1],
        EngineEvent::LookupCompleted { id: lookup, result: Err(err) }
            if *lookup == id(1, 1) && err.kind == FailureKind::NoImage
    ));
}

#[test]
fn cancelled_scope_produces_no_events() {
    let engine = engine(Duration::from_millis(100));
    engine.resolve(id(1, 0), "https://a.io");
    engine.resolve(id(1, 1), "https://b.io");
    engine.resolve(id(2, 0), "https://c.io");
    engine.cancel_scope(1);

    let events = drain(&engine, Duration::from_millis(500));
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::LookupCompleted { id: lookup, result: Ok(_) } if *lookup == id(2, 0)
    ));
}

#[test]
fn lookup_for_retired_scope_is_dropped() {
    let engine = engine(Duration::from_millis(1));
    engine.cancel_scope(5);
    engine.resolve(id(5, 0), "https://a.io");

    assert!(drain(&engine, Duration::from_millis(200)).is_empty());
}

#[test]
fn analysis_result_is_delivered() {
    let engine = engine(Duration::from_millis(1));
    engine.analyze(9, "https://github.com/u/r");

    let events = drain(&engine, Duration::from_millis(500));
    assert_eq!(
        events,
        vec![EngineEvent::AnalysisCompleted {
            request_id: 9,
            result: Ok(serde_json::json!({ "name": "https://github.com/u/r" })),
        }]
    );
}
