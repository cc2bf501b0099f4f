use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use super::config::AppConfig;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "showcase",
    version,
    about = "Render a repository analysis with link previews for its demo links"
)]
#[command(group(ArgGroup::new("source").required(true).args(["analysis", "repo"])))]
pub struct Cli {
    /// RON configuration file (defaults to ./showcase.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Analysis result JSON to render instead of asking the backend.
    #[arg(long)]
    pub analysis: Option<PathBuf>,
    /// Repository URL to send to the analysis backend.
    #[arg(long)]
    pub repo: Option<String>,
    /// Analysis backend base URL.
    #[arg(long)]
    pub backend: Option<String>,
    /// How long to wait for previews before printing, in milliseconds.
    #[arg(long)]
    pub wait_ms: Option<u64>,
}

pub enum Source {
    AnalysisFile(PathBuf),
    Repository(String),
}

impl Cli {
    pub fn source(&self) -> Option<Source> {
        match (&self.analysis, &self.repo) {
            (Some(path), _) => Some(Source::AnalysisFile(path.clone())),
            (None, Some(repo)) => Some(Source::Repository(repo.clone())),
            (None, None) => None,
        }
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(backend) = &self.backend {
            config.backend_url = backend.clone();
        }
        if let Some(wait_ms) = self.wait_ms {
            config.wait_ms = wait_ms;
        }
    }
}
