/// Identity of one link set mount. A new analysis result or a remount gets a new epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MountEpoch(pub u64);

impl MountEpoch {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Names one metadata lookup: the epoch it belongs to and the slot of the cell that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewTicket {
    pub epoch: MountEpoch,
    pub slot: usize,
}

/// What the resolver reported for a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Resolved { image_url: String, title: String },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewRecord {
    #[default]
    Pending,
    Resolved {
        image_url: String,
        title: String,
    },
    Unavailable,
}

impl PreviewRecord {
    pub fn is_pending(&self) -> bool {
        matches!(self, PreviewRecord::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// The outcome moved the cell out of `Pending`.
    Applied,
    /// The ticket does not match the cell's current lookup.
    Stale,
    /// The cell already reached a terminal state for this ticket.
    AlreadySettled,
}

/// Per-link lifecycle for one preview tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCell {
    link: String,
    ticket: PreviewTicket,
    record: PreviewRecord,
}

impl PreviewCell {
    /// A fresh cell starts `Pending`; the caller is responsible for starting the lookup.
    pub fn new(link: impl Into<String>, ticket: PreviewTicket) -> Self {
        Self {
            link: link.into(),
            ticket,
            record: PreviewRecord::Pending,
        }
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn ticket(&self) -> PreviewTicket {
        self.ticket
    }

    pub fn record(&self) -> &PreviewRecord {
        &self.record
    }

    /// Applies a lookup outcome if it belongs to the cell's current lookup.
    pub fn settle(&mut self, ticket: PreviewTicket, outcome: PreviewOutcome) -> Settle {
        if ticket != self.ticket {
            return Settle::Stale;
        }
        if !self.record.is_pending() {
            return Settle::AlreadySettled;
        }
        self.record = match outcome {
            PreviewOutcome::Resolved { image_url, title } => PreviewRecord::Resolved { image_url, title },
            PreviewOutcome::Unavailable => PreviewRecord::Unavailable,
        };
        Settle::Applied
    }
}
