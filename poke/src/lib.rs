//! Poke gesture detection from hand tracking joint data.
//!
//! A `PokeDetector` watches one hand. Attached to a `TrackingSource`, it
//! classifies every relevant update tick and notifies listeners when the
//! poke starts and ends.

pub mod backend;
pub mod gesture;
pub mod hand;
