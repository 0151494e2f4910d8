use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{info, warn};

use playloop_core::phase::{self, FramePhase, SCRIPT_RUN_FIXED_UPDATE};
use playloop_core::{
    editor, handler, ExitSignal, FixedRateOverride, LoopConfig, NodeId, PlayerLoop, UpdateNode,
};
use playloop_modules_logging::{init_console_logger, ConsoleLoggerConfig};

const FRAME_COUNTER: &str = "Demo.FrameCounter";
const FIXED_TICK_LOG: &str = "Demo.FixedTickLog";

/// Switches the custom update period back and forth on a timer.
struct PeriodToggle {
    period: f32,
    every_sec: f32,
    last: Instant,
}

impl PeriodToggle {
    fn new(period: f32, every_sec: f32) -> Self {
        Self {
            period,
            every_sec: every_sec.max(0.1),
            last: Instant::now(),
        }
    }

    fn update(&mut self, pl: &PlayerLoop) {
        if self.last.elapsed().as_secs_f32() < self.every_sec {
            return;
        }
        self.last = Instant::now();

        self.period = if self.period == 0.5 { 1.5 } else { 0.5 };
        pl.set_update_period(self.period);
        info!("custom update period set to: {} seconds", self.period);
    }
}

fn env_f32(key: &str) -> Option<f32> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<f32>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={raw}: not a number");
            None
        }
    }
}

fn load_config() -> anyhow::Result<LoopConfig> {
    match std::env::var("PLAYLOOP_CONFIG") {
        Ok(path) => LoopConfig::load_toml(&path).with_context(|| format!("loading {path}")),
        Err(_) => {
            let mut cfg = LoopConfig::default();
            cfg.rate_override.period_sec = 0.5;
            Ok(cfg)
        }
    }
}

fn build_tree(fixed_steps: Arc<AtomicU64>) -> UpdateNode {
    let mut tree = phase::default_tree();
    let scripts = UpdateNode::leaf(SCRIPT_RUN_FIXED_UPDATE, move |_| {
        fixed_steps.fetch_add(1, Ordering::Relaxed);
    });
    if editor::replace(&mut tree, SCRIPT_RUN_FIXED_UPDATE, scripts).is_none() {
        warn!("default tree has no fixed script runner");
    }
    tree
}

/// Adds the frame counter and the fixed tick logger. Returns how many made it into the tree.
fn install_demo_systems(pl: &mut PlayerLoop, frames: Arc<AtomicU64>) -> usize {
    let counted = pl.insert_system_before(
        NodeId::new(FRAME_COUNTER),
        handler(move |_| {
            frames.fetch_add(1, Ordering::Relaxed);
        }),
        FramePhase::Update.id(),
    );
    if !counted {
        warn!("frame counter not installed; frame totals will read 0");
    }

    // The rate override takes the fixed script runner's place when it installs there.
    let fixed_anchor = if editor::contains(pl.tree(), SCRIPT_RUN_FIXED_UPDATE) {
        SCRIPT_RUN_FIXED_UPDATE
    } else {
        FixedRateOverride::node_id()
    };
    let logged = pl.insert_system_after(
        NodeId::new(FIXED_TICK_LOG),
        handler(|t| {
            if t.fixed_tick_index % 300 == 0 {
                info!("fixed tick {}", t.fixed_tick_index);
            }
        }),
        fixed_anchor,
    );
    if !logged {
        warn!("fixed tick logger not installed; no periodic fixed tick lines");
    }

    usize::from(counted) + usize::from(logged)
}

fn main() -> anyhow::Result<()> {
    init_console_logger(&ConsoleLoggerConfig::from_env())?;

    let cfg = load_config()?;
    let fixed_steps = Arc::new(AtomicU64::new(0));
    let mut pl = PlayerLoop::new(&cfg, build_tree(fixed_steps.clone()));

    let frames = Arc::new(AtomicU64::new(0));
    install_demo_systems(&mut pl, frames.clone());

    let exit = ExitSignal::new();
    exit.install_ctrlc_handler()?;

    let run_for = env_f32("PLAYLOOP_RUN_SECS");
    let mut toggle = PeriodToggle::new(
        cfg.rate_override.period_sec,
        env_f32("PLAYLOOP_TOGGLE_SECS").unwrap_or(5.0),
    );
    let started = Instant::now();

    pl.run(&exit, |pl, _frame| {
        toggle.update(pl);
        if run_for.is_some_and(|secs| started.elapsed().as_secs_f32() >= secs) {
            exit.request_exit();
        }
    })?;

    info!(
        "done: {} frame(s), {} fixed step(s), {} custom tick(s)",
        frames.load(Ordering::Relaxed),
        fixed_steps.load(Ordering::Relaxed),
        pl.rate_override().fired()
    );
    Ok(())
}
