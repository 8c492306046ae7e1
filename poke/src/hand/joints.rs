//! Hand, joint and finger identifiers.
//!
//! Only the joints the poke classifier reads are modelled: the wrist plus
//! the proximal and tip joint of each finger.

// ── Joint definitions ──────────────────────────────────────

/// Skeletal joints consumed by gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbProximal,
    ThumbTip,
    IndexProximal,
    IndexTip,
    MiddleProximal,
    MiddleTip,
    RingProximal,
    RingTip,
    LittleProximal,
    LittleTip,
}

/// Total number of joints per hand.
pub const JOINT_COUNT: usize = 11;

/// All joints in index order.
pub const ALL_JOINTS: [HandJoint; JOINT_COUNT] = [
    HandJoint::Wrist,
    HandJoint::ThumbProximal,
    HandJoint::ThumbTip,
    HandJoint::IndexProximal,
    HandJoint::IndexTip,
    HandJoint::MiddleProximal,
    HandJoint::MiddleTip,
    HandJoint::RingProximal,
    HandJoint::RingTip,
    HandJoint::LittleProximal,
    HandJoint::LittleTip,
];

impl HandJoint {
    /// Convert joint enum to array index (0-10).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbProximal => "thumb-proximal",
            Self::ThumbTip => "thumb-tip",
            Self::IndexProximal => "index-proximal",
            Self::IndexTip => "index-tip",
            Self::MiddleProximal => "middle-proximal",
            Self::MiddleTip => "middle-tip",
            Self::RingProximal => "ring-proximal",
            Self::RingTip => "ring-tip",
            Self::LittleProximal => "little-proximal",
            Self::LittleTip => "little-tip",
        }
    }

    /// Parse a joint name produced by [`HandJoint::as_str`].
    pub fn parse(s: &str) -> Option<HandJoint> {
        ALL_JOINTS.iter().copied().find(|j| j.as_str() == s)
    }
}

// ── Fingers ────────────────────────────────────────────────

/// The five digits, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    /// Evaluation order used by the classifier.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    /// Proximal joint of this finger.
    pub fn proximal(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbProximal,
            Self::Index => HandJoint::IndexProximal,
            Self::Middle => HandJoint::MiddleProximal,
            Self::Ring => HandJoint::RingProximal,
            Self::Little => HandJoint::LittleProximal,
        }
    }

    /// Tip joint of this finger.
    pub fn tip(&self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbTip,
            Self::Index => HandJoint::IndexTip,
            Self::Middle => HandJoint::MiddleTip,
            Self::Ring => HandJoint::RingTip,
            Self::Little => HandJoint::LittleTip,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Little => "little",
        }
    }
}

// ── Hand enum ──────────────────────────────────────────────

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse hand string ("left" or "right").
    pub fn parse(s: &str) -> Option<Hand> {
        match s {
            "left" => Some(Hand::Left),
            "right" => Some(Hand::Right),
            _ => None,
        }
    }

    /// The opposite hand.
    pub fn other(&self) -> Hand {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_count() {
        assert_eq!(HandJoint::Wrist.index(), 0);
        assert_eq!(HandJoint::LittleTip.index(), JOINT_COUNT - 1);
        for (i, joint) in ALL_JOINTS.iter().enumerate() {
            assert_eq!(joint.index(), i, "{} out of order", joint.as_str());
        }
    }

    #[test]
    fn test_joint_parse_matches_as_str() {
        for joint in ALL_JOINTS {
            assert_eq!(HandJoint::parse(joint.as_str()), Some(joint));
        }
        assert_eq!(HandJoint::parse("palm"), None);
    }

    #[test]
    fn test_finger_joints() {
        assert_eq!(Finger::Thumb.proximal(), HandJoint::ThumbProximal);
        assert_eq!(Finger::Thumb.tip(), HandJoint::ThumbTip);
        assert_eq!(Finger::Little.proximal(), HandJoint::LittleProximal);
        assert_eq!(Finger::Little.tip(), HandJoint::LittleTip);
        assert_eq!(Finger::ALL[0], Finger::Thumb);
    }

    #[test]
    fn test_hand_as_str() {
        assert_eq!(Hand::Left.as_str(), "left");
        assert_eq!(Hand::Right.as_str(), "right");
    }

    #[test]
    fn test_hand_parse() {
        assert_eq!(Hand::parse("left"), Some(Hand::Left));
        assert_eq!(Hand::parse("right"), Some(Hand::Right));
        assert_eq!(Hand::parse("both"), None);
        assert_eq!(Hand::Left.other(), Hand::Right);
    }
}
