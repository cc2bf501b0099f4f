use crate::board::LinkBoard;
use crate::links::LinkSet;
use crate::view_model::{self, AppViewModel};
use crate::{AnalysisResult, BoardUpdate, Effect, MountEpoch, PreviewOutcome, PreviewTicket};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    repo_url: String,
    request: RequestState,
    request_id: RequestId,
    analysis: Option<AnalysisResult>,
    board: Option<LinkBoard>,
    last_epoch: MountEpoch,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(
            &self.repo_url,
            &self.request,
            self.analysis.as_ref(),
            self.board.as_ref(),
            self.dirty,
        )
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn board(&self) -> Option<&LinkBoard> {
        self.board.as_ref()
    }

    /// True once no analysis request is in flight and every preview cell has settled.
    pub fn is_quiescent(&self) -> bool {
        self.request != RequestState::Loading
            && self.board.as_ref().map_or(true, LinkBoard::is_settled)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_repo_url(&mut self, url: String) {
        if self.repo_url != url {
            self.repo_url = url;
            self.mark_dirty();
        }
    }

    /// Clears the previous result and returns the id of the new request.
    pub(crate) fn begin_request(&mut self) -> (RequestId, Option<Effect>) {
        self.request_id += 1;
        self.request = RequestState::Loading;
        self.analysis = None;
        let cancel = self.unmount_board();
        self.mark_dirty();
        (self.request_id, cancel)
    }

    pub(crate) fn is_current_request(&self, request_id: RequestId) -> bool {
        self.request == RequestState::Loading && self.request_id == request_id
    }

    pub(crate) fn fail_request(&mut self, message: String) {
        self.request = RequestState::Failed(message);
        self.mark_dirty();
    }

    /// Installs a finished analysis and mounts its link board under a fresh epoch.
    ///
    /// Any request still in flight is superseded.
    pub(crate) fn install_analysis(&mut self, analysis: AnalysisResult) -> Vec<Effect> {
        self.request_id += 1;
        self.request = RequestState::Idle;

        let mut effects = Vec::new();
        effects.extend(self.unmount_board());

        let has_matches = !analysis.link_groups().is_empty();
        if has_matches {
            let links = LinkSet::from_groups(analysis.link_groups());
            effects.extend(self.mount_board(links));
        }
        self.analysis = Some(analysis);
        self.mark_dirty();
        effects
    }

    /// Re-mounts the current link set; previously previewed links start over.
    pub(crate) fn remount(&mut self) -> Vec<Effect> {
        let Some(links) = self.board.as_ref().map(|board| board.links().clone()) else {
            return Vec::new();
        };
        let mut effects = Vec::new();
        effects.extend(self.unmount_board());
        effects.extend(self.mount_board(links));
        self.mark_dirty();
        effects
    }

    pub(crate) fn apply_preview(&mut self, ticket: PreviewTicket, outcome: PreviewOutcome) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        match board.settle(ticket, outcome) {
            BoardUpdate::Previewed | BoardUpdate::Unavailable => self.mark_dirty(),
            BoardUpdate::Ignored => {}
        }
    }

    fn mount_board(&mut self, links: LinkSet) -> Vec<Effect> {
        self.last_epoch = self.last_epoch.next();
        let (board, requests) = LinkBoard::mount(self.last_epoch, links);
        self.board = Some(board);
        requests
            .into_iter()
            .map(|request| Effect::ResolvePreview {
                ticket: request.ticket,
                url: request.url,
            })
            .collect()
    }

    fn unmount_board(&mut self) -> Option<Effect> {
        self.board
            .take()
            .map(|board| Effect::CancelEpoch(board.epoch()))
    }
}
