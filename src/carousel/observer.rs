//! Viewport Observer.
//!
//! Follows which slide the user has scrolled to by hand and reports it to
//! the [`Navigation`] controller as an observed request. The host delivers
//! visibility changes in batches of [`IntersectionEntry`]; entries for
//! slides that are at least `threshold` visible select that slide.

use super::Navigation;
use crate::dom::{Document, DomError, NodeId};

/// One visibility change of one slide, relative to the slide list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    /// Visible share of the slide, `0.0..=1.0`.
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn satisfies(&self, threshold: f64) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

#[derive(Debug, Clone)]
pub struct ViewportObserver {
    root: NodeId,
    threshold: f64,
    targets: Vec<NodeId>,
    connected: bool,
}

impl ViewportObserver {
    /// Observe nothing yet; `root` is the scrolling slide list.
    pub fn new(root: NodeId, threshold: f64) -> Self {
        Self {
            root,
            threshold,
            targets: Vec::new(),
            connected: true,
        }
    }

    /// Start observing `slide`. Its position in observation order is its index.
    pub fn observe(&mut self, slide: NodeId) {
        if !self.targets.contains(&slide) {
            self.targets.push(slide);
        }
    }

    /// Stop delivering. Later batches are ignored.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.targets.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Slide indices of the qualifying entries, in delivery order.
    ///
    /// Entries for unknown targets are skipped.
    pub fn qualifying(&self, entries: &[IntersectionEntry]) -> Vec<usize> {
        if !self.connected {
            return Vec::new();
        }
        entries
            .iter()
            .filter(|entry| entry.satisfies(self.threshold))
            .filter_map(|entry| self.targets.iter().position(|&t| t == entry.target))
            .collect()
    }

    /// Feed a batch to `navigation`. Each qualifying entry is applied in
    /// order, so the last one wins. Returns the index adopted, if any.
    pub fn deliver(
        &self,
        doc: &mut Document,
        navigation: &mut Navigation,
        entries: &[IntersectionEntry],
    ) -> Result<Option<usize>, DomError> {
        let mut adopted = None;
        for index in self.qualifying(entries) {
            adopted = Some(navigation.observe_index(doc, index)?);
        }
        if let Some(index) = adopted {
            tracing::trace!(index, entries = entries.len(), "observed slide");
        }
        Ok(adopted)
    }
}
