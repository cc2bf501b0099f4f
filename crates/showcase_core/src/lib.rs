//! Showcase core: pure state machine for the repository dashboard and its
//! link preview board.
mod analysis;
mod board;
mod effect;
mod links;
mod msg;
mod partition;
mod preview;
mod state;
mod update;
mod view_model;

pub use analysis::{AnalysisResult, BestSection, Contributor, LinkMatch, ReadmeAnalysis};
pub use board::{BoardUpdate, LinkBoard, LookupRequest};
pub use effect::Effect;
pub use links::{display_label, LinkSet};
pub use msg::Msg;
pub use partition::PreviewedSet;
pub use preview::{MountEpoch, PreviewCell, PreviewOutcome, PreviewRecord, PreviewTicket, Settle};
pub use state::{AppState, RequestId, RequestState};
pub use update::update;
pub use view_model::{
    AppViewModel, CommitDayView, ContributorView, DashboardView, DemoLinksView,
    DescriptionCardView, FallbackChipView, MetricsView, PreviewTileView, TileView, TitleCardView,
    COMMIT_HISTORY_LIMIT, NOT_AVAILABLE, NO_LINKS_MESSAGE, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH,
};
