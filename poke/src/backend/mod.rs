//! Headless backend: a scripted tracking source driving a poke detector.

pub mod headless;
pub mod synthetic;

pub use headless::{run, HeadlessRunner, RunSummary};
pub use synthetic::{SimConfig, SimFrame, SyntheticHand};
