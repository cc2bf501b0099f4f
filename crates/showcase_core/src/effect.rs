use crate::{MountEpoch, PreviewTicket, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestAnalysis { request_id: RequestId, repo_url: String },
    ResolvePreview { ticket: PreviewTicket, url: String },
    /// Every lookup started under this epoch is abandoned.
    CancelEpoch(MountEpoch),
}
