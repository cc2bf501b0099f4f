use crate::{AppState, Effect, Msg, RequestState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RepoUrlChanged(url) => {
            state.set_repo_url(url);
            Vec::new()
        }
        Msg::AnalyzeSubmitted => {
            let repo_url = state.repo_url().trim().to_string();
            // The submit control is disabled while a request runs.
            if repo_url.is_empty() || *state.request() == RequestState::Loading {
                return (state, Vec::new());
            }
            let (request_id, cancel) = state.begin_request();
            let mut effects = Vec::with_capacity(2);
            effects.extend(cancel);
            effects.push(Effect::RequestAnalysis {
                request_id,
                repo_url,
            });
            effects
        }
        Msg::AnalysisCompleted { request_id, result } => {
            if !state.is_current_request(request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(analysis) => state.install_analysis(analysis),
                Err(message) => {
                    state.fail_request(message);
                    Vec::new()
                }
            }
        }
        Msg::AnalysisLoaded(analysis) => state.install_analysis(analysis),
        Msg::PreviewSettled { ticket, outcome } => {
            state.apply_preview(ticket, outcome);
            Vec::new()
        }
        Msg::RemountRequested => state.remount(),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
