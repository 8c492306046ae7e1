//! Scripted hand for headless runs.
//!
//! The watched hand holds every finger straight while the thumb tip
//! sweeps between tucked against the palm and fully out, on a triangle
//! wave. The poke predicate flips whenever the thumb tip crosses the
//! thumb proximal joint's distance from the wrist.

use crate::hand::{Finger, Hand, HandJoint, UpdateFlags, Vec3, JOINT_COUNT};

/// Wrist position of the right hand in meters; the left hand mirrors X.
const WRIST: Vec3 = [0.18, 1.10, -0.35];

/// Thumb tip distance from the wrist at the two ends of the sweep.
const THUMB_TUCKED_M: f32 = 0.02;
const THUMB_OUT_M: f32 = 0.09;
const THUMB_PROXIMAL_M: f32 = 0.05;

const FINGER_PROXIMAL_M: f32 = 0.09;
const FINGER_TIP_M: f32 = 0.17;

/// Configuration for the synthetic source.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Time between ticks in milliseconds.
    pub tick_interval_ms: u64,
    /// Ticks for one half of the thumb sweep.
    pub phase_ticks: u32,
    /// Drop `dropout_joint` on every Nth tick.
    pub dropout_every: Option<u32>,
    /// Joint removed on dropout ticks.
    pub dropout_joint: HandJoint,
    /// Refresh only the other hand on every Nth tick.
    pub other_hand_every: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 11,
            phase_ticks: 45,
            dropout_every: None,
            dropout_joint: HandJoint::ThumbTip,
            other_hand_every: None,
        }
    }
}

/// One generated tick.
#[derive(Debug, Clone)]
pub struct SimFrame {
    /// Hand whose joints refreshed.
    pub hand: Hand,
    pub joints: [Option<Vec3>; JOINT_COUNT],
    pub flags: UpdateFlags,
    pub timestamp_ns: u64,
}

/// Deterministic hand animation.
#[derive(Debug, Clone)]
pub struct SyntheticHand {
    hand: Hand,
    config: SimConfig,
    tick: u64,
}

impl SyntheticHand {
    pub fn new(hand: Hand, config: SimConfig) -> Self {
        Self {
            hand,
            config,
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick and produce its frame.
    pub fn step(&mut self) -> SimFrame {
        self.tick += 1;
        let timestamp_ns = self
            .tick
            .saturating_mul(self.config.tick_interval_ms)
            .saturating_mul(1_000_000);

        if every(self.config.other_hand_every, self.tick) {
            let other = self.hand.other();
            return SimFrame {
                hand: other,
                joints: pose(other, 1.0),
                flags: UpdateFlags::root_pose_for(other) | UpdateFlags::joints_for(other),
                timestamp_ns,
            };
        }

        let mut joints = pose(self.hand, self.sweep());
        if every(self.config.dropout_every, self.tick) {
            joints[self.config.dropout_joint.index()] = None;
        }

        SimFrame {
            hand: self.hand,
            joints,
            flags: UpdateFlags::root_pose_for(self.hand) | UpdateFlags::joints_for(self.hand),
            timestamp_ns,
        }
    }

    /// Thumb sweep position in [0, 1] for the current tick.
    fn sweep(&self) -> f32 {
        let half = u64::from(self.config.phase_ticks.max(1));
        let pos = self.tick % (2 * half);
        let t = if pos <= half { pos } else { 2 * half - pos };
        t as f32 / half as f32
    }
}

fn every(period: Option<u32>, tick: u64) -> bool {
    match period {
        Some(n) if n > 0 => tick % u64::from(n) == 0,
        _ => false,
    }
}

/// Joint positions with the thumb at sweep position `t`.
fn pose(hand: Hand, t: f32) -> [Option<Vec3>; JOINT_COUNT] {
    let sx = match hand {
        Hand::Left => -1.0,
        Hand::Right => 1.0,
    };
    let wrist = [WRIST[0] * sx, WRIST[1], WRIST[2]];

    let mut joints = [None; JOINT_COUNT];
    joints[HandJoint::Wrist.index()] = Some(wrist);

    for finger in Finger::ALL {
        let dir = direction(finger, sx);
        let (proximal, tip) = match finger {
            Finger::Thumb => (
                THUMB_PROXIMAL_M,
                THUMB_TUCKED_M + (THUMB_OUT_M - THUMB_TUCKED_M) * t,
            ),
            _ => (FINGER_PROXIMAL_M, FINGER_TIP_M),
        };
        joints[finger.proximal().index()] = Some(offset(wrist, dir, proximal));
        joints[finger.tip().index()] = Some(offset(wrist, dir, tip));
    }
    joints
}

/// Approximate unit direction of each finger in the hand's plane.
fn direction(finger: Finger, sx: f32) -> Vec3 {
    match finger {
        Finger::Thumb => [0.8 * sx, 0.6, 0.0],
        Finger::Index => [0.24 * sx, 0.97, 0.0],
        Finger::Middle => [0.0, 1.0, 0.0],
        Finger::Ring => [-0.2 * sx, 0.98, 0.0],
        Finger::Little => [-0.4 * sx, 0.92, 0.0],
    }
}

fn offset(origin: Vec3, dir: Vec3, dist: f32) -> Vec3 {
    [
        origin[0] + dir[0] * dist,
        origin[1] + dir[1] * dist,
        origin[2] + dir[2] * dist,
    ]
}

#[cfg(test)]
fn snapshot_of(frame: &SimFrame) -> crate::hand::HandSnapshot {
    let mut snap = crate::hand::HandSnapshot::new(frame.hand);
    snap.joints = frame.joints;
    snap
}

// ── Tests ──────────────────────────────────────────────────
