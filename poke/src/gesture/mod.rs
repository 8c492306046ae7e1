//! Poke gesture recognition.
//!
//! Provides:
//! - `classifier`: per-finger extension heuristics
//! - `detector`: edge-triggered poke state machine with start/end listeners
//! - `notify`: multi-listener notification channel
//! - `attach`: activation lifecycle against a tracking source

pub mod attach;
pub mod classifier;
pub mod detector;
pub mod notify;

pub use attach::{attach, Attachment, SharedDetector, SharedSource};
pub use classifier::{classify_hand, finger_extended, is_finger_extended, FingerReport};
pub use detector::{GestureEdge, PokeConfig, PokeDetector, PokeStats};
pub use notify::{Delivery, ListenerId, Notifier};
