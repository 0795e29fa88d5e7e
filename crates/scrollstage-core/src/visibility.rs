//! # Visibility
//!
//! Host-agnostic "is this element on screen" capability. The host pushes
//! visibility ratios through a [`VisibilityReporter`]; consumers observe and
//! unobserve elements and poll for changes once per frame.

use crate::types::ElementId;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;

/// Fraction of an element's area currently inside the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibilityChange {
    pub element: ElementId,
    pub ratio: f32,
}

/// A source of visibility changes for observed elements.
pub trait ObservesVisibility {
    fn observe(&mut self, element: ElementId);
    /// Stops delivering changes for `element`. Irreversible for one-shot consumers.
    fn unobserve(&mut self, element: ElementId);
    fn is_observed(&self, element: ElementId) -> bool;
    /// Drains pending changes for observed elements, oldest first.
    fn poll(&mut self) -> Vec<VisibilityChange>;
}

/// Sending half handed to the host's viewport code.
#[derive(Clone, Debug)]
pub struct VisibilityReporter {
    sender: Sender<VisibilityChange>,
}

impl VisibilityReporter {
    /// Reports the visible fraction of `element`. Returns false once the
    /// receiving side is gone.
    pub fn report(&self, element: ElementId, ratio: f32) -> bool {
        self.sender
            .send(VisibilityChange { element, ratio })
            .is_ok()
    }
}

/// [`ObservesVisibility`] backed by an unbounded channel.
#[derive(Debug)]
pub struct ChannelVisibility {
    receiver: Receiver<VisibilityChange>,
    observed: HashSet<ElementId>,
}

impl ChannelVisibility {
    pub fn new() -> (Self, VisibilityReporter) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (
            Self {
                receiver,
                observed: HashSet::new(),
            },
            VisibilityReporter { sender },
        )
    }
}

impl ObservesVisibility for ChannelVisibility {
    fn observe(&mut self, element: ElementId) {
        self.observed.insert(element);
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observed.remove(&element);
    }

    fn is_observed(&self, element: ElementId) -> bool {
        self.observed.contains(&element)
    }

    fn poll(&mut self) -> Vec<VisibilityChange> {
        self.receiver
            .try_iter()
            .filter(|change| self.observed.contains(&change.element))
            .collect()
    }
}
