//! Finger extension heuristics from wrist-relative joint distances.
//!
//! A finger counts as extended when its tip is at least as far from the
//! wrist as its proximal joint. Missing joints never extend a finger.

use crate::hand::{Finger, Hand, HandJoint, JointLookup, Vec3};

/// Whether a finger is extended, given its wrist, proximal and tip positions.
///
/// Returns `false` when any of the three joints is unavailable. Compares
/// squared distances, so no square root is taken.
pub fn is_finger_extended(wrist: Option<Vec3>, proximal: Option<Vec3>, tip: Option<Vec3>) -> bool {
    let (Some(wrist), Some(proximal), Some(tip)) = (wrist, proximal, tip) else {
        return false;
    };
    squared_distance(&wrist, &tip) >= squared_distance(&wrist, &proximal)
}

/// Evaluate [`is_finger_extended`] for one finger of one hand.
pub fn finger_extended(joints: &dyn JointLookup, hand: Hand, finger: Finger) -> bool {
    is_finger_extended(
        joints.joint_position(hand, HandJoint::Wrist),
        joints.joint_position(hand, finger.proximal()),
        joints.joint_position(hand, finger.tip()),
    )
}

/// Per-finger results of one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerReport {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub little: bool,
}

impl FingerReport {
    /// Thumb extended and the four remaining finger predicates all hold.
    ///
    /// The index, middle, ring and little predicates use the same
    /// extension test as the thumb and are combined without negation.
    pub fn is_poking(&self) -> bool {
        self.thumb && self.index && self.middle && self.ring && self.little
    }

    pub fn get(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Little => self.little,
        }
    }

    /// Generate s-expression for status output.
    pub fn sexp(&self) -> String {
        let flag = |b: bool| if b { "t" } else { "nil" };
        format!(
            "(:thumb {} :index {} :middle {} :ring {} :little {})",
            flag(self.thumb),
            flag(self.index),
            flag(self.middle),
            flag(self.ring),
            flag(self.little),
        )
    }
}

/// Classify all five fingers of `hand`.
pub fn classify_hand(joints: &dyn JointLookup, hand: Hand) -> FingerReport {
    FingerReport {
        thumb: finger_extended(joints, hand, Finger::Thumb),
        index: finger_extended(joints, hand, Finger::Index),
        middle: finger_extended(joints, hand, Finger::Middle),
        ring: finger_extended(joints, hand, Finger::Ring),
        little: finger_extended(joints, hand, Finger::Little),
    }
}

/// Squared Euclidean distance between two 3D points.
fn squared_distance(a: &Vec3, b: &Vec3) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    dx * dx + dy * dy + dz * dz
}

// ── Test helpers ───────────────────────────────────────────

/// Snapshot with the wrist at the origin and every finger laid along +Y,
/// proximal at 1.0 and tip at 2.0.
#[cfg(test)]
fn extended_hand(hand: Hand) -> crate::hand::HandSnapshot {
    let mut snap = crate::hand::HandSnapshot::new(hand);
    snap.set_joint(HandJoint::Wrist, [0.0, 0.0, 0.0]);
    for (i, finger) in Finger::ALL.iter().enumerate() {
        let x = i as f32 * 0.1;
        snap.set_joint(finger.proximal(), [x, 1.0, 0.0]);
        snap.set_joint(finger.tip(), [x, 2.0, 0.0]);
    }
    snap
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumb_extended_along_axis() {
        assert!(is_finger_extended(
            Some([0.0, 0.0, 0.0]),
            Some([0.0, 1.0, 0.0]),
            Some([0.0, 2.0, 0.0]),
        ));
    }

    #[test]
    fn test_tip_closer_than_proximal() {
        assert!(!is_finger_extended(
            Some([0.0, 0.0, 0.0]),
            Some([0.0, 1.0, 0.0]),
            Some([0.0, 0.5, 0.0]),
        ));
    }

    #[test]
    fn test_equal_distance_counts_as_extended() {
        // Tip on the same sphere around the wrist as the proximal joint.
        assert!(is_finger_extended(
            Some([0.0, 0.0, 0.0]),
            Some([0.0, 1.0, 0.0]),
            Some([1.0, 0.0, 0.0]),
        ));
    }

    #[test]
    fn test_missing_joint_is_not_extended() {
        let w = Some([0.0, 0.0, 0.0]);
        let p = Some([0.0, 1.0, 0.0]);
        let t = Some([0.0, 2.0, 0.0]);
        assert!(!is_finger_extended(None, p, t));
        assert!(!is_finger_extended(w, None, t));
        assert!(!is_finger_extended(w, p, None));
        assert!(!is_finger_extended(None, None, None));
    }

    #[test]
    fn test_direction_independent() {
        // Only distances matter, not which way the finger points.
        let wrist = Some([1.0, 1.0, 1.0]);
        assert!(is_finger_extended(wrist, Some([1.0, 1.0, 0.5]), Some([1.0, 1.0, -1.0])));
        assert!(!is_finger_extended(wrist, Some([3.0, 1.0, 1.0]), Some([1.0, 2.0, 1.0])));
    }

    #[test]
    fn test_sweep_matches_distance_comparison() {
        let wrist = [0.0, 0.0, 0.0];
        let proximal = [0.0, 0.04, 0.02];
        let prox_d2 = squared_distance(&wrist, &proximal);
        for step in 0..40 {
            let tip = [0.01, step as f32 * 0.0025, -0.01];
            let expected = squared_distance(&wrist, &tip) >= prox_d2;
            assert_eq!(
                is_finger_extended(Some(wrist), Some(proximal), Some(tip)),
                expected,
                "tip {:?}",
                tip,
            );
        }
    }

    #[test]
    fn test_squared_distance() {
        assert!((squared_distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]) - 25.0).abs() < 1e-6);
        assert_eq!(squared_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_classify_extended_hand() {
        let snap = extended_hand(Hand::Right);
        let report = classify_hand(&snap, Hand::Right);
        for finger in Finger::ALL {
            assert!(report.get(finger), "{} should be extended", finger.as_str());
        }
        assert!(report.is_poking());
    }

    #[test]
    fn test_classify_other_hand_sees_nothing() {
        let snap = extended_hand(Hand::Right);
        let report = classify_hand(&snap, Hand::Left);
        assert_eq!(report, FingerReport::default());
        assert!(!report.is_poking());
    }

    #[test]
    fn test_curled_index_breaks_poke() {
        let mut snap = extended_hand(Hand::Left);
        snap.set_joint(HandJoint::IndexTip, [0.0, 0.5, 0.0]);
        let report = classify_hand(&snap, Hand::Left);
        assert!(report.thumb);
        assert!(!report.index);
        assert!(!report.is_poking());
    }

    #[test]
    fn test_missing_wrist_fails_every_finger() {
        let mut snap = extended_hand(Hand::Left);
        snap.clear_joint(HandJoint::Wrist);
        assert_eq!(classify_hand(&snap, Hand::Left), FingerReport::default());
    }

    #[test]
    fn test_report_sexp() {
        let report = FingerReport {
            thumb: true,
            ..Default::default()
        };
        let sexp = report.sexp();
        assert_eq!(sexp, "(:thumb t :index nil :middle nil :ring nil :little nil)");
        assert!(lexpr::from_str(&sexp).is_ok());
    }
}
