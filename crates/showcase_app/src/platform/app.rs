use std::fs;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use showcase_core::{update, AnalysisResult, AppState, Msg};
use showcase_engine::EngineStopped;
use showcase_logging::{showcase_debug, showcase_error, showcase_info, showcase_warn};

use super::cli::{Cli, Source};
use super::effects::EffectRunner;
use super::{config, logging, ui};

/// Upper bound on one wait for engine events; a `Tick` is dispatched when it elapses.
const TICK_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::initialize(config.log_destination, config.log_level);

    let Some(source) = cli.source() else {
        anyhow::bail!("either --analysis or --repo is required");
    };
    let initial = match source {
        Source::AnalysisFile(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading analysis from {}", path.display()))?;
            let analysis = AnalysisResult::from_json(&text)
                .with_context(|| format!("decoding analysis {}", path.display()))?;
            vec![Msg::AnalysisLoaded(analysis)]
        }
        Source::Repository(repo_url) => vec![Msg::RepoUrlChanged(repo_url), Msg::AnalyzeSubmitted],
    };

    let runner = EffectRunner::new(&config);
    let mut event_loop = EventLoop::new(runner);
    for msg in initial {
        event_loop.dispatch(msg);
    }
    event_loop.run_until_quiescent(config.wait());

    let view = event_loop.state.view();
    for line in ui::render::render(&view) {
        println!("{line}");
    }
    if let Some(error) = view.error {
        anyhow::bail!("analysis failed: {error}");
    }
    Ok(())
}

/// Single-threaded owner of `AppState`: every message is applied here, in arrival order.
struct EventLoop {
    state: AppState,
    runner: EffectRunner,
}

impl EventLoop {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            if let Some(board) = state.board() {
                showcase_debug!(
                    "Board epoch={} links={} previewed={} pending={}",
                    board.epoch().0,
                    board.links().len(),
                    board.previewed().len(),
                    board.pending_count()
                );
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Pumps engine events until nothing is pending or `budget` runs out.
    /// Lookups still pending at the deadline stay pending in the printed view.
    fn run_until_quiescent(&mut self, budget: Duration) {
        let deadline = Instant::now() + budget;
        while !self.state.is_quiescent() {
            let now = Instant::now();
            if now >= deadline {
                let pending = self.state.board().map_or(0, |board| board.pending_count());
                showcase_warn!("Wait budget exhausted with {} lookups pending", pending);
                return;
            }
            let wait = (deadline - now).min(TICK_INTERVAL);
            if !self.handle_next(self.runner.next_msg(wait)) {
                return;
            }
        }
        showcase_info!("All work settled");
    }

    /// Applies one poll result. Returns `false` once the engine can deliver nothing more.
    fn handle_next(&mut self, next: Result<Option<Msg>, EngineStopped>) -> bool {
        match next {
            Ok(Some(msg)) => self.dispatch(msg),
            Ok(None) => self.dispatch(Msg::Tick),
            Err(err) => {
                showcase_error!("Stopped waiting for results: {}", err);
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use showcase_core::{AnalysisResult, Msg};
    use showcase_engine::EngineStopped;

    use super::EventLoop;
    use crate::platform::config::AppConfig;
    use crate::platform::effects::EffectRunner;

    fn event_loop() -> EventLoop {
        EventLoop::new(EffectRunner::new(&AppConfig::default()))
    }

    #[test]
    fn stopped_engine_ends_the_wait() {
        let mut event_loop = event_loop();
        assert!(event_loop.handle_next(Ok(None)));
        assert!(!event_loop.handle_next(Err(EngineStopped)));
    }

    #[test]
    fn settled_state_returns_without_waiting() {
        let mut event_loop = event_loop();
        let analysis = AnalysisResult::from_json(r#"{"name": "repo"}"#).unwrap();
        event_loop.dispatch(Msg::AnalysisLoaded(analysis));

        let started = Instant::now();
        event_loop.run_until_quiescent(Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
