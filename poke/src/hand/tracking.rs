//! Hand tracking source: per-tick joint snapshots and update fan-out.
//!
//! `TrackingSource` is the seam the gesture detector is attached to.
//! `HandTrackingState` is the in-memory implementation used by the
//! headless backend and the tests: a provider writes joint positions
//! with `update_hand`, then calls `publish` with the flags describing
//! which hands refreshed.

use std::ops::BitOr;

use tracing::debug;

use super::joints::{Hand, HandJoint, ALL_JOINTS, JOINT_COUNT};

/// Position in meters (x, y, z).
pub type Vec3 = [f32; 3];

// ── Update flags ───────────────────────────────────────────

/// Which joint groups refreshed during one update tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UpdateFlags(u8);

impl UpdateFlags {
    pub const NONE: UpdateFlags = UpdateFlags(0);
    pub const LEFT_ROOT_POSE: UpdateFlags = UpdateFlags(1 << 0);
    pub const LEFT_JOINTS: UpdateFlags = UpdateFlags(1 << 1);
    pub const RIGHT_ROOT_POSE: UpdateFlags = UpdateFlags(1 << 2);
    pub const RIGHT_JOINTS: UpdateFlags = UpdateFlags(1 << 3);
    pub const ALL: UpdateFlags = UpdateFlags(0b1111);

    /// Joint group flag for the given hand.
    pub fn joints_for(hand: Hand) -> UpdateFlags {
        match hand {
            Hand::Left => Self::LEFT_JOINTS,
            Hand::Right => Self::RIGHT_JOINTS,
        }
    }

    /// Root pose flag for the given hand.
    pub fn root_pose_for(hand: Hand) -> UpdateFlags {
        match hand {
            Hand::Left => Self::LEFT_ROOT_POSE,
            Hand::Right => Self::RIGHT_ROOT_POSE,
        }
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(&self, other: UpdateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for UpdateFlags {
    type Output = UpdateFlags;

    fn bitor(self, rhs: UpdateFlags) -> UpdateFlags {
        UpdateFlags(self.0 | rhs.0)
    }
}

/// Point in the frame at which an update was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Regular per-frame update.
    Dynamic,
    /// Late update just before rendering.
    BeforeRender,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::BeforeRender => "before-render",
        }
    }
}

// ── Joint samples ──────────────────────────────────────────

/// One joint's position at one tick. `None` when the joint was not tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    pub joint: HandJoint,
    pub position: Option<Vec3>,
}

/// Random access to the latest joint positions.
pub trait JointLookup {
    fn joint_position(&self, hand: Hand, joint: HandJoint) -> Option<Vec3>;
}

/// Every joint of one hand at one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSnapshot {
    /// Which hand this snapshot represents.
    pub hand: Hand,
    /// Joint positions indexed by `HandJoint`.
    pub joints: [Option<Vec3>; JOINT_COUNT],
    /// Whether the joint group refreshed on the last update.
    pub joints_valid: bool,
    /// Timestamp of last update in nanoseconds.
    pub timestamp_ns: u64,
}

impl HandSnapshot {
    /// Create an empty snapshot with no tracked joints.
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            joints: [None; JOINT_COUNT],
            joints_valid: false,
            timestamp_ns: 0,
        }
    }

    pub fn sample(&self, joint: HandJoint) -> JointSample {
        JointSample {
            joint,
            position: self.joints[joint.index()],
        }
    }

    /// All joint samples in index order.
    pub fn samples(&self) -> impl Iterator<Item = JointSample> + '_ {
        ALL_JOINTS.iter().map(move |j| self.sample(*j))
    }

    pub fn set_joint(&mut self, joint: HandJoint, position: Vec3) {
        self.joints[joint.index()] = Some(position);
    }

    pub fn clear_joint(&mut self, joint: HandJoint) {
        self.joints[joint.index()] = None;
    }

    /// Number of joints with a position this tick.
    pub fn tracked_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// Reset all joint data to defaults.
    pub fn reset(&mut self) {
        self.joints = [None; JOINT_COUNT];
        self.joints_valid = false;
        self.timestamp_ns = 0;
    }
}

impl JointLookup for HandSnapshot {
    fn joint_position(&self, hand: Hand, joint: HandJoint) -> Option<Vec3> {
        if hand != self.hand {
            return None;
        }
        self.joints[joint.index()]
    }
}

// ── Source trait ───────────────────────────────────────────

/// Handle returned by [`TrackingSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Invoked once per update tick with the refresh flags, the update kind,
/// and read access to the joints. Returning false drops the subscription.
pub type UpdateCallback = Box<dyn FnMut(UpdateFlags, UpdateKind, &dyn JointLookup) -> bool>;

/// A hand tracking provider that delivers update ticks to subscribers.
pub trait TrackingSource: JointLookup {
    fn subscribe(&mut self, callback: UpdateCallback) -> SubscriptionId;

    /// Returns true if the subscription existed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

// ── State ──────────────────────────────────────────────────

/// In-memory tracking source holding the latest snapshot of each hand.
pub struct HandTrackingState {
    /// Left hand joints.
    pub left: HandSnapshot,
    /// Right hand joints.
    pub right: HandSnapshot,
    subscribers: Vec<(SubscriptionId, UpdateCallback)>,
    next_subscription: u64,
    /// Number of ticks published so far.
    ticks_published: u64,
}

impl Default for HandTrackingState {
    fn default() -> Self {
        Self::new()
    }
}

impl HandTrackingState {
    pub fn new() -> Self {
        Self {
            left: HandSnapshot::new(Hand::Left),
            right: HandSnapshot::new(Hand::Right),
            subscribers: Vec::new(),
            next_subscription: 1,
            ticks_published: 0,
        }
    }

    /// Get the snapshot for a given hand.
    pub fn snapshot(&self, hand: Hand) -> &HandSnapshot {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn snapshot_mut(&mut self, hand: Hand) -> &mut HandSnapshot {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Replace a hand's joints with fresh data.
    pub fn update_hand(
        &mut self,
        hand: Hand,
        joints: [Option<Vec3>; JOINT_COUNT],
        timestamp_ns: u64,
    ) {
        let snap = self.snapshot_mut(hand);
        snap.joints = joints;
        snap.joints_valid = true;
        snap.timestamp_ns = timestamp_ns;
    }

    /// Mark a hand as lost: all joints become unavailable.
    pub fn clear_hand(&mut self, hand: Hand) {
        self.snapshot_mut(hand).reset();
    }

    /// Deliver one update tick to every subscriber, in subscription order.
    ///
    /// Subscribers whose callback returns false are removed before this
    /// returns.
    pub fn publish(&mut self, flags: UpdateFlags, kind: UpdateKind) {
        self.ticks_published += 1;
        debug!(
            "Hand tracking tick {}: flags={:#06b} kind={}",
            self.ticks_published,
            flags.bits(),
            kind.as_str(),
        );

        let mut subscribers = std::mem::take(&mut self.subscribers);
        let joints: &dyn JointLookup = &*self;
        subscribers.retain_mut(|(id, callback)| {
            let keep = callback(flags, kind, joints);
            if !keep {
                debug!("Hand tracking: subscription {} dropped by callback", id.0);
            }
            keep
        });
        self.subscribers = subscribers;
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn ticks_published(&self) -> u64 {
        self.ticks_published
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:subscribers {} :ticks {} :left (:valid {} :joints {} :timestamp {}) :right (:valid {} :joints {} :timestamp {}))",
            self.subscribers.len(),
            self.ticks_published,
            if self.left.joints_valid { "t" } else { "nil" },
            self.left.tracked_count(),
            self.left.timestamp_ns,
            if self.right.joints_valid { "t" } else { "nil" },
            self.right.tracked_count(),
            self.right.timestamp_ns,
        )
    }
}

impl JointLookup for HandTrackingState {
    fn joint_position(&self, hand: Hand, joint: HandJoint) -> Option<Vec3> {
        self.snapshot(hand).joints[joint.index()]
    }
}

impl TrackingSource for HandTrackingState {
    fn subscribe(&mut self, callback: UpdateCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, callback));
        debug!("Hand tracking: subscription {} added", id.0);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        let removed = self.subscribers.len() < before;
        if removed {
            debug!("Hand tracking: subscription {} removed", id.0);
        }
        removed
    }
}

/// Create a full joint array with every joint at the origin.
#[cfg(test)]
fn test_joints_at_origin() -> [Option<Vec3>; JOINT_COUNT] {
    [Some([0.0, 0.0, 0.0]); JOINT_COUNT]
}

// ── Tests ──────────────────────────────────────────────────
