//! Hand tracking data model and the tracking source seam.

pub mod joints;
pub mod tracking;

pub use joints::{Finger, Hand, HandJoint, ALL_JOINTS, JOINT_COUNT};
pub use tracking::{
    HandSnapshot, HandTrackingState, JointLookup, JointSample, SubscriptionId, TrackingSource,
    UpdateCallback, UpdateFlags, UpdateKind, Vec3,
};
