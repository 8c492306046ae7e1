//! poke-gesture - headless poke detection demo
//!
//! Drives a poke detector from a scripted hand and logs every start/end.

use anyhow::anyhow;
use clap::Parser;
use tracing::info;

use poke_gesture::backend::{self, SimConfig};
use poke_gesture::hand::{Hand, HandJoint};

#[derive(Parser, Debug)]
#[command(name = "poke-gesture", about = "Headless poke gesture detector")]
struct Cli {
    /// Hand to watch: left or right
    #[arg(long, default_value = "right")]
    hand: String,

    /// Exit after N ticks (default: run until interrupted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Milliseconds between tracking ticks
    #[arg(long, default_value_t = 11)]
    tick_ms: u64,

    /// Ticks for the thumb to sweep from tucked to fully out
    #[arg(long, default_value_t = 45)]
    phase_ticks: u32,

    /// Drop one joint on every Nth tick
    #[arg(long)]
    dropout_every: Option<u32>,

    /// Joint removed on dropout ticks (e.g. thumb-tip, index-proximal)
    #[arg(long, default_value = "thumb-tip")]
    dropout_joint: String,

    /// Refresh only the other hand on every Nth tick
    #[arg(long)]
    other_hand_every: Option<u32>,

    /// Print detector and source status as an s-expression on exit
    #[arg(long)]
    status: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("poke-gesture {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poke_gesture=info".into()),
        )
        .init();

    let hand = Hand::parse(&cli.hand)
        .ok_or_else(|| anyhow!("unknown hand: {}. Use: left or right", cli.hand))?;

    let dropout_joint = HandJoint::parse(&cli.dropout_joint)
        .ok_or_else(|| anyhow!("unknown joint: {}", cli.dropout_joint))?;

    info!("poke-gesture v{} starting", env!("CARGO_PKG_VERSION"));

    let sim = SimConfig {
        tick_interval_ms: cli.tick_ms,
        phase_ticks: cli.phase_ticks,
        dropout_every: cli.dropout_every,
        dropout_joint,
        other_hand_every: cli.other_hand_every,
    };

    let summary = backend::run(hand, cli.ticks, sim, cli.status)?;
    if summary.gesturing_at_exit {
        info!("Exited mid-poke; no end notification was sent");
    }
    Ok(())
}
