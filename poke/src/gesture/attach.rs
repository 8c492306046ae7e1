//! Activation lifecycle: connect a detector to a tracking source.
//!
//! `attach` resets the detector to idle and subscribes it to the source.
//! The returned `Attachment` owns the source handle; dropping it (or
//! calling `detach`) unsubscribes and releases the source. Detaching
//! mid-gesture does not emit `Ended`.
//!
//! Gesture listeners run after the detector borrow is released, so they
//! may read the detector or detach it. A detach that happens while the
//! source is publishing mutes the subscription at once and the source
//! drops it when the callback returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{info, warn};

use super::detector::PokeDetector;
use crate::hand::{
    Hand, JointLookup, SubscriptionId, TrackingSource, UpdateCallback, UpdateFlags, UpdateKind,
};

/// Tracking source shared between its provider and attached detectors.
pub type SharedSource = Rc<RefCell<dyn TrackingSource>>;

/// Detector shared between its owner and the source callback.
pub type SharedDetector = Rc<RefCell<PokeDetector>>;

/// Live connection between a detector and a tracking source.
pub struct Attachment {
    source: SharedSource,
    subscription: Option<SubscriptionId>,
    /// Cleared on detach. A subscription that could not be removed stops
    /// forwarding ticks and asks the source to drop it.
    live: Rc<Cell<bool>>,
    hand: Hand,
}

/// Activate `detector` against `source`.
///
/// Returns `None` and leaves the detector inactive when no source is
/// available or either side is currently borrowed.
pub fn attach(detector: &SharedDetector, source: Option<SharedSource>) -> Option<Attachment> {
    let Some(source) = source else {
        warn!("Poke: no hand tracking source available, detector stays inactive");
        return None;
    };

    let hand = match detector.try_borrow_mut() {
        Ok(mut d) => {
            d.reset();
            d.handedness()
        }
        Err(_) => {
            warn!("Poke: detector busy, cannot attach");
            return None;
        }
    };

    let live = Rc::new(Cell::new(true));
    let callback = forward_ticks(Rc::downgrade(detector), live.clone());

    let subscription = match source.try_borrow_mut() {
        Ok(mut s) => s.subscribe(callback),
        Err(_) => {
            warn!("Poke: tracking source busy, cannot attach");
            return None;
        }
    };

    info!("Poke detector attached ({} hand)", hand.as_str());
    Some(Attachment {
        source,
        subscription: Some(subscription),
        live,
        hand,
    })
}

/// Build the source callback that drives one detector.
///
/// Returns false, dropping the subscription, once the attachment is
/// released or the detector is gone.
fn forward_ticks(
    detector: Weak<RefCell<PokeDetector>>,
    live: Rc<Cell<bool>>,
) -> UpdateCallback {
    Box::new(move |flags: UpdateFlags, _kind: UpdateKind, joints: &dyn JointLookup| {
        if !live.get() {
            return false;
        }
        let Some(detector) = detector.upgrade() else {
            return false;
        };
        let delivery = match detector.try_borrow_mut() {
            Ok(mut d) => d
                .detect_edge(flags, joints)
                .map(|edge| d.listeners_for(edge)),
            Err(_) => {
                warn!("Poke: re-entrant tick dropped");
                return true;
            }
        };
        if let Some(delivery) = delivery {
            delivery.run();
        }
        live.get()
    })
}

impl Attachment {
    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Deactivate: unsubscribe and release the source.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.live.set(false);
        let Some(id) = self.subscription.take() else {
            return;
        };
        match self.source.try_borrow_mut() {
            Ok(mut s) => {
                s.unsubscribe(id);
                info!("Poke detector detached ({} hand)", self.hand.as_str());
            }
            Err(_) => warn!(
                "Poke: tracking source busy during detach, subscription {:?} muted until dropped",
                id
            ),
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.release();
    }
}

// ── Tests ──────────────────────────────────────────────────
