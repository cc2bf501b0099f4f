use chrono::{DateTime, Local};
use showcase_core::{
    AppViewModel, DashboardView, DemoLinksView, MetricsView, TileView, NOT_AVAILABLE,
    NO_LINKS_MESSAGE,
};

use super::constants::*;

/// Lays the view model out as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.loading {
        lines.push(LABEL_LOADING.to_string());
    }
    if let Some(error) = &view.error {
        lines.push(format!("{LABEL_ERROR_PREFIX}{error}"));
    }
    if let Some(dashboard) = &view.dashboard {
        render_dashboard(dashboard, &mut lines);
    }

    lines
}

fn render_dashboard(dashboard: &DashboardView, lines: &mut Vec<String>) {
    lines.push(format!("== {} ==", dashboard.title.name));
    if let Some(image) = &dashboard.title.main_image {
        lines.push(format!("[image] {image}"));
    }
    lines.push(dashboard.title.description.clone());

    section(CARD_COMMIT_HISTORY, lines);
    for day in &dashboard.commit_history {
        lines.push(format!("{}: {} commit(s)", day.date, day.count));
    }

    section(CARD_DESCRIPTION, lines);
    if let Some(heading) = &dashboard.description.heading {
        lines.push(heading.clone());
    }
    lines.extend(dashboard.description.body.lines().map(str::to_string));

    section(CARD_METRICS, lines);
    render_metrics(&dashboard.metrics, lines);

    section(CARD_DEMO, lines);
    render_demo_links(&dashboard.demo_links, lines);
}

fn render_metrics(metrics: &MetricsView, lines: &mut Vec<String>) {
    lines.push(format!("⭐ Stars: {}", metrics.stars));
    lines.push(format!("🍴 Forks: {}", metrics.forks));
    lines.push(format!("🐞 Open Issues: {}", metrics.open_issues));
    lines.push(format!("👥 Contributors: {}", metrics.contributors));
    lines.push(format!("License: {}", metrics.license));
    lines.push(format!("Languages: {}", metrics.languages));
    lines.push(format!(
        "Last Updated: {}",
        format_timestamp(metrics.last_updated.as_deref())
    ));
    lines.push(format!("Open PRs: {}", metrics.open_prs));
    lines.push(format!("Commits (last week): {}", metrics.commits_last_week));
    lines.push(format!("Commits (last month): {}", metrics.commits_last_month));
    lines.push(format!("Topics: {}", metrics.topics));

    if !metrics.top_contributors.is_empty() {
        lines.push("Top Contributors:".to_string());
        for contributor in &metrics.top_contributors {
            lines.push(format!(
                "{INDENT}{} ({}) {}",
                contributor.login, contributor.contributions, contributor.html_url
            ));
        }
    }
}

fn render_demo_links(demo: &DemoLinksView, lines: &mut Vec<String>) {
    let (preview_row, fallback_row) = match demo {
        DemoLinksView::NoMatches => {
            lines.push(NO_LINKS_MESSAGE.to_string());
            return;
        }
        DemoLinksView::Rows {
            preview_row,
            fallback_row,
        } => (preview_row, fallback_row),
    };

    lines.push(format!("{ROW_PREVIEWS}:"));
    for tile in preview_row {
        match &tile.tile {
            TileView::Placeholder { width, height } => {
                lines.push(format!("{INDENT}[{width}x{height} loading] {}", tile.url));
            }
            TileView::Image { image_url, alt } => {
                lines.push(format!("{INDENT}[{alt}] {image_url} -> {}", tile.url));
            }
            TileView::Hidden => {}
        }
    }

    lines.push(format!("{ROW_LINKS}:"));
    for chip in fallback_row {
        lines.push(format!("{INDENT}{} <{}>", chip.label, chip.url));
    }
}

fn section(title: &str, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push(format!("-- {title} --"));
}

fn format_timestamp(raw: Option<&str>) -> String {
    raw.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use showcase_core::{update, AnalysisResult, AppState, Msg};

    use super::{format_timestamp, render};

    fn rendered(json: &str) -> Vec<String> {
        let analysis = AnalysisResult::from_json(json).unwrap();
        let (state, _) = update(AppState::new(), Msg::AnalysisLoaded(analysis));
        render(&state.view())
    }

    #[test]
    fn pending_links_render_in_both_rows() {
        let lines = rendered(
            r#"{"name": "repo", "readme_analysis": {"matches": [{"urls": ["https://www.example.com/demo"]}]}}"#,
        );
        let previews = lines.iter().position(|l| l == "Previews:").unwrap();
        let links = lines.iter().position(|l| l == "Links:").unwrap();
        assert_eq!(lines[previews + 1], "  [320x180 loading] https://www.example.com/demo");
        assert_eq!(lines[links + 1], "  example.com <https://www.example.com/demo>");
    }

    #[test]
    fn missing_matches_render_message() {
        let lines = rendered(r#"{"name": "repo"}"#);
        assert!(lines.iter().any(|l| l == "No demo/tutorial/explanation links found in README."));
        assert!(lines.iter().any(|l| l == "Last Updated: N/A"));
        assert!(lines.iter().any(|l| l == "License: N/A"));
    }

    #[test]
    fn error_and_loading_lines() {
        let (state, _) = update(AppState::new(), Msg::RepoUrlChanged("https://github.com/u/r".into()));
        let (state, _) = update(state, Msg::AnalyzeSubmitted);
        assert_eq!(render(&state.view()), vec!["Analyzing repository...".to_string()]);

        let (state, _) = update(
            state,
            Msg::AnalysisCompleted {
                request_id: 1,
                result: Err("Failed to fetch repository metadata.".to_string()),
            },
        );
        assert_eq!(
            render(&state.view()),
            vec!["Error: Failed to fetch repository metadata.".to_string()]
        );
    }

    #[test]
    fn unparseable_timestamp_is_not_available() {
        assert_eq!(format_timestamp(Some("yesterday")), "N/A");
        assert_eq!(format_timestamp(None), "N/A");
        assert_ne!(format_timestamp(Some("2024-05-01T10:00:00Z")), "N/A");
    }
}
