//! Edge-triggered poke detection for one hand.
//!
//! Each update tick classifies the configured hand and compares the
//! result with the previous tick. `Started` fires on a false→true edge,
//! `Ended` on true→false; steady state fires nothing.

use tracing::debug;

use super::classifier::{classify_hand, FingerReport};
use super::notify::{Delivery, ListenerId, Notifier};
use crate::hand::{Hand, JointLookup, UpdateFlags};

/// Transition reported by [`PokeDetector::on_hand_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEdge {
    Started,
    Ended,
}

impl GestureEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Configuration for a poke detector.
#[derive(Debug, Clone)]
pub struct PokeConfig {
    /// Enable detection. A disabled detector ignores every tick.
    pub enabled: bool,
    /// Hand this detector watches.
    pub handedness: Hand,
}

impl Default for PokeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            handedness: Hand::Right,
        }
    }
}

/// Running counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PokeStats {
    /// Ticks delivered to the detector.
    pub ticks_seen: u64,
    /// Ticks dropped by the enable switch or the hand filter.
    pub ticks_ignored: u64,
    pub starts: u64,
    pub ends: u64,
}

// ── State ──────────────────────────────────────────────────

/// Poke gesture state machine for a single hand.
pub struct PokeDetector {
    config: PokeConfig,
    /// Result of the previous classified tick.
    is_gesturing: bool,
    last_report: FingerReport,
    stats: PokeStats,
    started: Notifier,
    ended: Notifier,
}

impl PokeDetector {
    /// Create an idle detector for `handedness`.
    pub fn new(handedness: Hand) -> Self {
        Self::with_config(PokeConfig {
            handedness,
            ..PokeConfig::default()
        })
    }

    pub fn with_config(config: PokeConfig) -> Self {
        Self {
            config,
            is_gesturing: false,
            last_report: FingerReport::default(),
            stats: PokeStats::default(),
            started: Notifier::new("gesture-started"),
            ended: Notifier::new("gesture-ended"),
        }
    }

    pub fn handedness(&self) -> Hand {
        self.config.handedness
    }

    pub fn is_gesturing(&self) -> bool {
        self.is_gesturing
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Finger predicates from the last classified tick.
    pub fn last_report(&self) -> FingerReport {
        self.last_report
    }

    pub fn stats(&self) -> PokeStats {
        self.stats
    }

    /// Register a listener for false→true edges.
    pub fn on_gesture_started(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        self.started.add(listener)
    }

    /// Register a listener for true→false edges.
    pub fn on_gesture_ended(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        self.ended.add(listener)
    }

    pub fn remove_started_listener(&mut self, id: ListenerId) -> bool {
        self.started.remove(id)
    }

    pub fn remove_ended_listener(&mut self, id: ListenerId) -> bool {
        self.ended.remove(id)
    }

    /// Process one update tick.
    ///
    /// Ticks whose flags lack the configured hand's joint group leave the
    /// state untouched. Listeners run before this returns.
    pub fn on_hand_update(
        &mut self,
        flags: UpdateFlags,
        joints: &dyn JointLookup,
    ) -> Option<GestureEdge> {
        let edge = self.detect_edge(flags, joints)?;
        self.listeners_for(edge).run();
        Some(edge)
    }

    /// Classify one tick and advance the state machine without running
    /// any listener. Pair with [`PokeDetector::listeners_for`] when the
    /// detector sits behind a shared handle that listeners may read.
    pub fn detect_edge(
        &mut self,
        flags: UpdateFlags,
        joints: &dyn JointLookup,
    ) -> Option<GestureEdge> {
        self.stats.ticks_seen += 1;

        if !self.config.enabled {
            self.stats.ticks_ignored += 1;
            return None;
        }

        let hand = self.config.handedness;
        if !flags.contains(UpdateFlags::joints_for(hand)) {
            self.stats.ticks_ignored += 1;
            debug!(
                "Poke: ignoring tick without {} joints (flags={:#06b})",
                hand.as_str(),
                flags.bits(),
            );
            return None;
        }

        let report = classify_hand(joints, hand);
        self.last_report = report;
        let now = report.is_poking();

        let edge = match (self.is_gesturing, now) {
            (false, true) => GestureEdge::Started,
            (true, false) => GestureEdge::Ended,
            _ => return None,
        };

        self.is_gesturing = now;
        debug!("Poke {} on {} hand", edge.as_str(), hand.as_str());
        match edge {
            GestureEdge::Started => self.stats.starts += 1,
            GestureEdge::Ended => self.stats.ends += 1,
        }
        Some(edge)
    }

    /// Listeners registered for `edge`, captured for delivery.
    pub fn listeners_for(&self, edge: GestureEdge) -> Delivery {
        match edge {
            GestureEdge::Started => self.started.delivery(),
            GestureEdge::Ended => self.ended.delivery(),
        }
    }

    /// Return to idle without notifying. Listeners and counters are kept.
    pub fn reset(&mut self) {
        self.is_gesturing = false;
        self.last_report = FingerReport::default();
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:enabled {} :hand {} :gesturing {} :fingers {} :ticks {} :ignored {} :starts {} :ends {} :listeners (:started {} :ended {}))",
            if self.config.enabled { "t" } else { "nil" },
            self.config.handedness.as_str(),
            if self.is_gesturing { "t" } else { "nil" },
            self.last_report.sexp(),
            self.stats.ticks_seen,
            self.stats.ticks_ignored,
            self.stats.starts,
            self.stats.ends,
            self.started.len(),
            self.ended.len(),
        )
    }

    /// Generate s-expression for config output.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:enabled {} :hand {})",
            if self.config.enabled { "t" } else { "nil" },
            self.config.handedness.as_str(),
        )
    }
}

impl std::fmt::Debug for PokeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeDetector")
            .field("config", &self.config)
            .field("is_gesturing", &self.is_gesturing)
            .field("stats", &self.stats)
            .finish()
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Wrist at the origin, every finger along +Y with the tip beyond the
/// proximal joint.
#[cfg(test)]
pub(crate) fn poking_hand(hand: Hand) -> crate::hand::HandSnapshot {
    use crate::hand::{Finger, HandJoint, HandSnapshot};

    let mut snap = HandSnapshot::new(hand);
    snap.set_joint(HandJoint::Wrist, [0.0, 0.0, 0.0]);
    for finger in Finger::ALL {
        snap.set_joint(finger.proximal(), [0.0, 1.0, 0.0]);
        snap.set_joint(finger.tip(), [0.0, 2.0, 0.0]);
    }
    snap
}

/// Same as `poking_hand` but with the thumb tip pulled back toward the wrist.
#[cfg(test)]
pub(crate) fn relaxed_hand(hand: Hand) -> crate::hand::HandSnapshot {
    let mut snap = poking_hand(hand);
    snap.set_joint(crate::hand::HandJoint::ThumbTip, [0.0, 0.5, 0.0]);
    snap
}

// ── Tests ──────────────────────────────────────────────────
