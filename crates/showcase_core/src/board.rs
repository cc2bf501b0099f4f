use crate::links::LinkSet;
use crate::partition::PreviewedSet;
use crate::preview::{MountEpoch, PreviewCell, PreviewOutcome, PreviewTicket, Settle};

/// One lookup the board wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub ticket: PreviewTicket,
    pub url: String,
}

/// Result of feeding a lookup outcome into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardUpdate {
    /// The cell settled and the link joined the previewed set.
    Previewed,
    /// The cell settled without a preview.
    Unavailable,
    /// The outcome belonged to another epoch, an unknown slot, or an already settled cell.
    Ignored,
}

/// The demo-links section for one mount epoch: link set, one preview cell per
/// link, and the previewed set they report into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBoard {
    epoch: MountEpoch,
    links: LinkSet,
    cells: Vec<PreviewCell>,
    previewed: PreviewedSet,
}

impl LinkBoard {
    /// Creates every cell in `Pending` and returns the lookups to start.
    pub fn mount(epoch: MountEpoch, links: LinkSet) -> (Self, Vec<LookupRequest>) {
        let cells: Vec<PreviewCell> = links
            .iter()
            .enumerate()
            .map(|(slot, link)| PreviewCell::new(link, PreviewTicket { epoch, slot }))
            .collect();
        let requests = cells
            .iter()
            .map(|cell| LookupRequest {
                ticket: cell.ticket(),
                url: cell.link().to_string(),
            })
            .collect();
        let board = Self {
            epoch,
            links,
            cells,
            previewed: PreviewedSet::new(epoch),
        };
        (board, requests)
    }

    pub fn epoch(&self) -> MountEpoch {
        self.epoch
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    pub fn cells(&self) -> &[PreviewCell] {
        &self.cells
    }

    pub fn previewed(&self) -> &PreviewedSet {
        &self.previewed
    }

    pub fn is_previewed(&self, link: &str) -> bool {
        self.previewed.is_previewed(link)
    }

    pub fn pending_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.record().is_pending())
            .count()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }

    /// Applies a lookup outcome. Reports from another epoch never touch the previewed set.
    pub fn settle(&mut self, ticket: PreviewTicket, outcome: PreviewOutcome) -> BoardUpdate {
        if ticket.epoch != self.epoch {
            return BoardUpdate::Ignored;
        }
        let Some(cell) = self.cells.get_mut(ticket.slot) else {
            return BoardUpdate::Ignored;
        };
        let resolved = matches!(outcome, PreviewOutcome::Resolved { .. });
        match cell.settle(ticket, outcome) {
            Settle::Applied if resolved => {
                self.previewed.mark_previewed(cell.link());
                BoardUpdate::Previewed
            }
            Settle::Applied => BoardUpdate::Unavailable,
            Settle::Stale | Settle::AlreadySettled => BoardUpdate::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreviewRecord;

    fn resolved(image: &str) -> PreviewOutcome {
        PreviewOutcome::Resolved {
            image_url: image.to_string(),
            title: image.to_string(),
        }
    }

    fn board(links: &[&str]) -> (LinkBoard, Vec<LookupRequest>) {
        LinkBoard::mount(MountEpoch(4), LinkSet::from_groups([links]))
    }

    #[test]
    fn mount_starts_one_lookup_per_link() {
        let (board, requests) = board(&["https://a.io/x", "https://a.io/x", "https://b.io/y"]);
        assert_eq!(board.cells().len(), 2);
        assert_eq!(
            requests,
            vec![
                LookupRequest {
                    ticket: PreviewTicket {
                        epoch: MountEpoch(4),
                        slot: 0
                    },
                    url: "https://a.io/x".to_string(),
                },
                LookupRequest {
                    ticket: PreviewTicket {
                        epoch: MountEpoch(4),
                        slot: 1
                    },
                    url: "https://b.io/y".to_string(),
                },
            ]
        );
        assert_eq!(board.pending_count(), 2);
        assert!(board.previewed().is_empty());
    }

    #[test]
    fn resolved_outcome_marks_link_previewed() {
        let (mut board, requests) = board(&["https://a.io/x", "https://b.io/y"]);
        let update = board.settle(requests[0].ticket, resolved("https://img/a.png"));
        assert_eq!(update, BoardUpdate::Previewed);
        assert!(board.is_previewed("https://a.io/x"));
        assert!(!board.is_previewed("https://b.io/y"));

        let update = board.settle(requests[1].ticket, PreviewOutcome::Unavailable);
        assert_eq!(update, BoardUpdate::Unavailable);
        assert_eq!(board.cells()[1].record(), &PreviewRecord::Unavailable);
        assert!(board.is_settled());
    }

    #[test]
    fn outcome_from_previous_epoch_is_ignored() {
        let (mut board, _) = board(&["https://a.io/x"]);
        let stale = PreviewTicket {
            epoch: MountEpoch(3),
            slot: 0,
        };
        assert_eq!(board.settle(stale, resolved("https://img/a.png")), BoardUpdate::Ignored);
        assert!(!board.is_previewed("https://a.io/x"));
        assert_eq!(board.pending_count(), 1);
    }

    #[test]
    fn outcome_for_unknown_slot_is_ignored() {
        let (mut board, _) = board(&["https://a.io/x"]);
        let ticket = PreviewTicket {
            epoch: MountEpoch(4),
            slot: 9,
        };
        assert_eq!(board.settle(ticket, resolved("https://img/x.png")), BoardUpdate::Ignored);
    }

    #[test]
    fn previewed_link_is_never_demoted() {
        let (mut board, requests) = board(&["https://a.io/x"]);
        board.settle(requests[0].ticket, resolved("https://img/a.png"));
        assert_eq!(
            board.settle(requests[0].ticket, PreviewOutcome::Unavailable),
            BoardUpdate::Ignored
        );
        assert!(board.is_previewed("https://a.io/x"));
    }
}
