use crate::{AnalysisResult, PreviewOutcome, PreviewTicket, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the repository URL input.
    RepoUrlChanged(String),
    /// User submitted the current repository URL for analysis.
    AnalyzeSubmitted,
    /// Backend answered an analysis request.
    AnalysisCompleted {
        request_id: RequestId,
        result: Result<AnalysisResult, String>,
    },
    /// An analysis result was supplied directly, bypassing the backend.
    AnalysisLoaded(AnalysisResult),
    /// A metadata lookup finished for the given ticket.
    PreviewSettled {
        ticket: PreviewTicket,
        outcome: PreviewOutcome,
    },
    /// Mount the current link set again with fresh cells and an empty previewed set.
    RemountRequested,
    /// Render tick used to coalesce redraws.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
