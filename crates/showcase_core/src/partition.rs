use std::collections::HashSet;

use crate::MountEpoch;

/// Links that reached a resolved preview during one mount epoch.
///
/// The set only grows. A new link set gets a new `PreviewedSet`; nothing is
/// ever removed from an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewedSet {
    epoch: MountEpoch,
    links: HashSet<String>,
}

impl PreviewedSet {
    pub fn new(epoch: MountEpoch) -> Self {
        Self {
            epoch,
            links: HashSet::new(),
        }
    }

    pub fn epoch(&self) -> MountEpoch {
        self.epoch
    }

    /// Records `link` as previewed. Returns `true` only on the first call for a link.
    pub fn mark_previewed(&mut self, link: &str) -> bool {
        if self.links.contains(link) {
            return false;
        }
        self.links.insert(link.to_owned())
    }

    pub fn is_previewed(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
