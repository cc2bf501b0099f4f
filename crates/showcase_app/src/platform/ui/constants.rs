pub const LABEL_LOADING: &str = "Analyzing repository...";
pub const LABEL_ERROR_PREFIX: &str = "Error: ";

pub const CARD_COMMIT_HISTORY: &str = "Recent Commit History";
pub const CARD_DESCRIPTION: &str = "Repository Description";
pub const CARD_METRICS: &str = "Repository Metrics";
pub const CARD_DEMO: &str = "Demo Video";

pub const ROW_PREVIEWS: &str = "Previews";
pub const ROW_LINKS: &str = "Links";
pub const INDENT: &str = "  ";
