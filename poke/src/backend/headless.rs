//! Headless run loop driving a detector from the synthetic source.
//!
//! Supports a tick bound for CI, graceful signal handling, and periodic
//! status logging.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::{debug, info};

use super::synthetic::{SimConfig, SyntheticHand};
use crate::gesture::{attach, Attachment, PokeDetector, SharedDetector, SharedSource};
use crate::hand::{Hand, HandTrackingState, UpdateKind};

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub starts: u64,
    pub ends: u64,
    pub gesturing_at_exit: bool,
}

/// Tracking source, detector and script wired together.
pub struct HeadlessRunner {
    state: Rc<RefCell<HandTrackingState>>,
    detector: SharedDetector,
    synth: SyntheticHand,
    attachment: Option<Attachment>,
    /// Current tick, read by the logging listeners.
    tick: Rc<Cell<u64>>,
}

impl HeadlessRunner {
    /// Build the pipeline and attach a detector for `hand`.
    pub fn new(hand: Hand, sim: SimConfig) -> anyhow::Result<Self> {
        let state = Rc::new(RefCell::new(HandTrackingState::new()));
        let detector: SharedDetector = Rc::new(RefCell::new(PokeDetector::new(hand)));
        let synth = SyntheticHand::new(hand, sim);

        let tick = Rc::new(Cell::new(0u64));
        {
            let mut d = detector.borrow_mut();
            let t = tick.clone();
            d.on_gesture_started(move || {
                info!("Poke started ({} hand, tick {})", hand.as_str(), t.get());
            });
            let t = tick.clone();
            d.on_gesture_ended(move || {
                info!("Poke ended ({} hand, tick {})", hand.as_str(), t.get());
            });
        }

        let source: SharedSource = state.clone();
        let attachment = attach(&detector, Some(source))
            .ok_or_else(|| anyhow!("failed to attach poke detector to hand tracking source"))?;

        Ok(Self {
            state,
            detector,
            synth,
            attachment: Some(attachment),
            tick,
        })
    }

    /// Generate and publish one tick.
    pub fn step(&mut self) {
        let frame = self.synth.step();
        self.tick.set(self.synth.tick());
        let mut state = self.state.borrow_mut();
        state.update_hand(frame.hand, frame.joints, frame.timestamp_ns);

        let missing: Vec<&str> = state
            .snapshot(frame.hand)
            .samples()
            .filter(|s| s.position.is_none())
            .map(|s| s.joint.as_str())
            .collect();
        if !missing.is_empty() {
            debug!(
                "Tick {}: {} hand missing {}",
                self.synth.tick(),
                frame.hand.as_str(),
                missing.join(", ")
            );
        }

        state.publish(frame.flags, UpdateKind::Dynamic);
    }

    pub fn summary(&self) -> RunSummary {
        let detector = self.detector.borrow();
        let stats = detector.stats();
        RunSummary {
            ticks: self.synth.tick(),
            starts: stats.starts,
            ends: stats.ends,
            gesturing_at_exit: detector.is_gesturing(),
        }
    }

    /// Combined detector and source status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:detector {} :source {})",
            self.detector.borrow().status_sexp(),
            self.state.borrow().status_sexp(),
        )
    }

    /// Detach the detector and report the final counters.
    pub fn shutdown(mut self) -> RunSummary {
        if let Some(attachment) = self.attachment.take() {
            attachment.detach();
        }
        self.summary()
    }
}

/// Run the synthetic source in real time until `max_ticks` or a signal.
pub fn run(
    hand: Hand,
    max_ticks: Option<u64>,
    sim: SimConfig,
    print_status: bool,
) -> anyhow::Result<RunSummary> {
    let tick_interval = Duration::from_millis(sim.tick_interval_ms.max(1));
    let mut runner = HeadlessRunner::new(hand, sim)?;

    install_signal_handlers();

    let mut last_status_log = Instant::now();
    let status_interval = Duration::from_secs(10);

    info!(
        "Headless poke run ({} hand, tick interval {}ms), entering loop",
        hand.as_str(),
        tick_interval.as_millis()
    );

    loop {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            break;
        }

        if let Some(limit) = max_ticks {
            if runner.summary().ticks >= limit {
                info!("Tick limit {} reached", limit);
                break;
            }
        }

        if last_status_log.elapsed() >= status_interval {
            let s = runner.summary();
            info!(
                "Headless status: {} tick(s), {} start(s), {} end(s)",
                s.ticks, s.starts, s.ends
            );
            last_status_log = Instant::now();
        }

        runner.step();
        std::thread::sleep(tick_interval);
    }

    if print_status {
        println!("{}", runner.status_sexp());
    }

    let summary = runner.shutdown();
    info!(
        "Headless poke run finished ({} tick(s), {} start(s), {} end(s))",
        summary.ticks, summary.starts, summary.ends
    );
    Ok(summary)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_cycles_poke() {
        let mut runner = HeadlessRunner::new(
            Hand::Right,
            SimConfig {
                phase_ticks: 6,
                ..SimConfig::default()
            },
        )
        .expect("runner");

        // Two full sweeps.
        for _ in 0..24 {
            runner.step();
        }
        let summary = runner.summary();
        assert_eq!(summary.ticks, 24);
        assert_eq!(summary.starts, 2);
        assert_eq!(summary.ends, 2);
        assert!(!summary.gesturing_at_exit);
    }

    #[test]
    fn test_other_hand_ticks_do_not_count() {
        let mut runner = HeadlessRunner::new(
            Hand::Left,
            SimConfig {
                phase_ticks: 6,
                other_hand_every: Some(5),
                ..SimConfig::default()
            },
        )
        .expect("runner");
        for _ in 0..24 {
            runner.step();
        }
        let detector = runner.detector.borrow();
        assert_eq!(detector.stats().ticks_seen, 24);
        assert_eq!(detector.stats().ticks_ignored, 4);
    }

    #[test]
    fn test_edges_alternate_with_dropouts() {
        let mut runner = HeadlessRunner::new(
            Hand::Right,
            SimConfig {
                phase_ticks: 5,
                dropout_every: Some(3),
                other_hand_every: Some(7),
                ..SimConfig::default()
            },
        )
        .expect("runner");
        for _ in 0..200 {
            runner.step();
            let s = runner.summary();
            assert!(s.starts >= s.ends);
            assert!(s.starts - s.ends <= 1);
            assert_eq!(s.starts - s.ends == 1, s.gesturing_at_exit);
        }
    }

    #[test]
    fn test_shutdown_detaches() {
        let mut runner = HeadlessRunner::new(Hand::Right, SimConfig::default()).expect("runner");
        runner.step();
        let state = runner.state.clone();
        assert_eq!(state.borrow().subscriber_count(), 1);

        let summary = runner.shutdown();
        assert_eq!(summary.ticks, 1);
        assert_eq!(state.borrow().subscriber_count(), 0);
    }

    #[test]
    fn test_status_sexp() {
        let mut runner = HeadlessRunner::new(Hand::Left, SimConfig::default()).expect("runner");
        runner.step();
        let sexp = runner.status_sexp();
        assert!(sexp.starts_with("(:detector (:enabled t :hand left"));
        assert!(sexp.contains(":source (:subscribers 1 :ticks 1"));
        assert!(lexpr::from_str(&sexp).is_ok());
    }
}
