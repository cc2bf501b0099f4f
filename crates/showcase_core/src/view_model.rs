use crate::board::LinkBoard;
use crate::links::display_label;
use crate::{AnalysisResult, PreviewRecord, RequestState};

/// Size of the neutral tile shown while a preview is pending.
pub const PLACEHOLDER_WIDTH: u32 = 320;
pub const PLACEHOLDER_HEIGHT: u32 = 180;
/// Commit days shown in the history card, earliest dates first.
pub const COMMIT_HISTORY_LIMIT: usize = 50;
pub const NO_LINKS_MESSAGE: &str = "No demo/tutorial/explanation links found in README.";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub repo_url: String,
    pub loading: bool,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub dashboard: Option<DashboardView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub title: TitleCardView,
    pub commit_history: Vec<CommitDayView>,
    pub description: DescriptionCardView,
    pub metrics: MetricsView,
    pub demo_links: DemoLinksView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCardView {
    pub name: String,
    pub main_image: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDayView {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionCardView {
    pub heading: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsView {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub contributors: usize,
    pub license: String,
    pub languages: String,
    /// Raw timestamp; the front end formats it in local time.
    pub last_updated: Option<String>,
    pub open_prs: u64,
    pub commits_last_week: u64,
    pub commits_last_month: u64,
    pub topics: String,
    pub top_contributors: Vec<ContributorView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorView {
    pub login: String,
    pub html_url: String,
    pub avatar_url: String,
    pub contributions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoLinksView {
    NoMatches,
    Rows {
        preview_row: Vec<PreviewTileView>,
        fallback_row: Vec<FallbackChipView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTileView {
    pub url: String,
    pub tile: TileView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileView {
    Placeholder { width: u32, height: u32 },
    Image { image_url: String, alt: String },
    /// Lookup found nothing; the tile collapses.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChipView {
    pub url: String,
    pub label: String,
}

pub(crate) fn build(
    repo_url: &str,
    request: &RequestState,
    analysis: Option<&AnalysisResult>,
    board: Option<&LinkBoard>,
    dirty: bool,
) -> AppViewModel {
    let loading = *request == RequestState::Loading;
    let error = match request {
        RequestState::Failed(message) => Some(message.clone()),
        RequestState::Idle | RequestState::Loading => None,
    };
    AppViewModel {
        repo_url: repo_url.to_string(),
        loading,
        submit_enabled: !loading,
        error,
        dashboard: analysis.map(|analysis| dashboard(analysis, board)),
        dirty,
    }
}

fn dashboard(analysis: &AnalysisResult, board: Option<&LinkBoard>) -> DashboardView {
    let main_image = analysis
        .readme_analysis
        .as_ref()
        .and_then(|readme| readme.main_image.clone())
        .filter(|image| !image.is_empty());

    DashboardView {
        title: TitleCardView {
            name: analysis.name.clone(),
            main_image,
            description: analysis.description.clone(),
        },
        commit_history: analysis
            .commit_frequency
            .iter()
            .take(COMMIT_HISTORY_LIMIT)
            .map(|(date, count)| CommitDayView {
                date: date.clone(),
                count: *count,
            })
            .collect(),
        description: match &analysis.best_section {
            Some(section) => DescriptionCardView {
                heading: capitalize_first(&section.title),
                body: section.content.clone(),
            },
            None => DescriptionCardView {
                heading: None,
                body: analysis.description.clone(),
            },
        },
        metrics: metrics(analysis),
        demo_links: board.map_or(DemoLinksView::NoMatches, demo_links),
    }
}

fn metrics(analysis: &AnalysisResult) -> MetricsView {
    let languages = if analysis.languages.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        analysis
            .languages
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let topics = if analysis.topics.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        analysis.topics.join(", ")
    };

    MetricsView {
        stars: analysis.stars,
        forks: analysis.forks,
        open_issues: analysis.open_issues,
        contributors: analysis.contributors.len(),
        license: analysis
            .license
            .clone()
            .filter(|license| !license.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        languages,
        last_updated: analysis.last_updated.clone(),
        open_prs: analysis.open_prs,
        commits_last_week: analysis.commits_last_week,
        commits_last_month: analysis.commits_last_month,
        topics,
        top_contributors: analysis
            .top_contributors
            .iter()
            .map(|c| ContributorView {
                login: c.login.clone(),
                html_url: c.html_url.clone(),
                avatar_url: c.avatar_url.clone(),
                contributions: c.contributions,
            })
            .collect(),
    }
}

/// Preview row holds every link; the fallback row holds the ones not yet previewed.
/// A pending link therefore shows up in both rows until it resolves.
fn demo_links(board: &LinkBoard) -> DemoLinksView {
    let preview_row = board
        .cells()
        .iter()
        .map(|cell| PreviewTileView {
            url: cell.link().to_string(),
            tile: match cell.record() {
                PreviewRecord::Pending => TileView::Placeholder {
                    width: PLACEHOLDER_WIDTH,
                    height: PLACEHOLDER_HEIGHT,
                },
                PreviewRecord::Resolved { image_url, title } => TileView::Image {
                    image_url: image_url.clone(),
                    alt: title.clone(),
                },
                PreviewRecord::Unavailable => TileView::Hidden,
            },
        })
        .collect();

    let fallback_row = board
        .links()
        .iter()
        .filter(|link| !board.is_previewed(link))
        .map(|link| FallbackChipView {
            url: link.to_string(),
            label: display_label(link),
        })
        .collect();

    DemoLinksView::Rows {
        preview_row,
        fallback_row,
    }
}

fn capitalize_first(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
