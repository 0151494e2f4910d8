//! Decoupled-rate override for one node of the update tree.
//!
//! The overridden node keeps ticking at the host's cadence; on every tick the override
//! accumulates the tick's delta and fires once per whole `period` contained in the
//! accumulated time, then forwards to the handler it displaced.

use crate::editor;
use crate::host::LoopHost;
use crate::identity::NodeId;
use crate::node::{Handler, UpdateNode};
use crate::time::Time;

use log::{debug, info, warn};
use parking_lot::Mutex;

use std::sync::Arc;

pub const MIN_PERIOD_SEC: f32 = 0.01;
pub const DEFAULT_PERIOD_SEC: f32 = 1.0;

/// Upper bound on period callbacks run by a single tick. Further elapsed periods are counted
/// in [`FixedRateOverride::fired`] but not reported.
pub const MAX_CALLBACKS_PER_TICK: u64 = 1024;

const STEPWISE_LIMIT: f32 = 4096.0;

/// Emitted once per elapsed period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodElapsed {
    pub period_sec: f32,
    /// Total firings since creation, this one included.
    pub fired_total: u64,
    pub fixed_tick_index: u64,
}

pub type PeriodCallback = Arc<dyn Fn(&PeriodElapsed) + Send + Sync>;

struct RateOverrideState {
    period: f32,
    accumulator: f32,
    original: Option<Handler>,
    fired: u64,
    installed: bool,
    on_period: PeriodCallback,
}

/// Shared handle to the override state.
///
/// Cheap to clone; clones may live on other threads (e.g. a UI changing the period).
#[derive(Clone)]
pub struct FixedRateOverride {
    state: Arc<Mutex<RateOverrideState>>,
}

impl FixedRateOverride {
    /// Override whose period side effect is an info log line.
    pub fn new(period_sec: f32) -> Self {
        Self::with_callback(period_sec, |ev: &PeriodElapsed| {
            info!("custom update tick (period {:.2}s, #{})", ev.period_sec, ev.fired_total);
        })
    }

    pub fn with_callback<F>(period_sec: f32, on_period: F) -> Self
    where
        F: Fn(&PeriodElapsed) + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(RateOverrideState {
                period: clamp_period(period_sec),
                accumulator: 0.0,
                original: None,
                fired: 0,
                installed: false,
                on_period: Arc::new(on_period),
            })),
        }
    }

    /// Identity of the node the override installs in place of its target.
    #[inline]
    pub fn node_id() -> NodeId {
        NodeId::of::<FixedRateOverride>()
    }

    /// Clamps to [`MIN_PERIOD_SEC`]. Applies from the next tick; the accumulator is kept.
    #[inline]
    pub fn set_period(&self, period_sec: f32) {
        self.state.lock().period = clamp_period(period_sec);
    }

    #[inline]
    pub fn period(&self) -> f32 {
        self.state.lock().period
    }

    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.state.lock().accumulator
    }

    #[inline]
    pub fn fired(&self) -> u64 {
        self.state.lock().fired
    }

    #[inline]
    pub fn is_installed(&self) -> bool {
        self.state.lock().installed
    }

    pub fn set_on_period<F>(&self, on_period: F)
    where
        F: Fn(&PeriodElapsed) + Send + Sync + 'static,
    {
        self.state.lock().on_period = Arc::new(on_period);
    }

    /// Swaps the handler of `target` in the host tree for this override.
    ///
    /// When `target` is absent the tree is left alone and the override stays inert.
    pub fn install<H: LoopHost + ?Sized>(&self, host: &mut H, target: NodeId) -> bool {
        if self.is_installed() {
            warn!("fixed-rate override already installed; ignoring install on '{target}'");
            return false;
        }

        let this = self.clone();
        let node = UpdateNode::leaf(Self::node_id(), move |time| this.tick(time));

        let mut tree = host.current_tree();
        let Some(displaced) = editor::replace(&mut tree, target, node) else {
            warn!("fixed-rate override: '{target}' not found in update tree; custom cadence disabled");
            return false;
        };

        if displaced.handler.is_none() {
            debug!("fixed-rate override: '{target}' had no handler to forward to");
        }

        {
            let mut s = self.state.lock();
            s.original = displaced.handler;
            s.installed = true;
        }

        host.set_tree(tree);
        info!("fixed-rate override installed on '{target}' (period {:.2}s)", self.period());
        true
    }

    /// One underlying tick of the overridden node.
    pub fn tick(&self, time: &Time) {
        let (fires, on_period, original) = {
            let mut s = self.state.lock();
            s.accumulator += time.delta_sec();

            if !s.accumulator.is_finite() {
                warn!("fixed-rate override: accumulator diverged, resetting");
                s.accumulator = 0.0;
            }

            let period = s.period;
            let elapsed = drain_periods(&mut s.accumulator, period);
            let emitted = elapsed.min(MAX_CALLBACKS_PER_TICK);
            if emitted < elapsed {
                warn!(
                    "fixed-rate override: {} period(s) elapsed in one tick, {} callback(s) skipped",
                    elapsed,
                    elapsed - emitted
                );
            }

            let first = s.fired;
            s.fired = s.fired.saturating_add(elapsed);
            let fires: Vec<PeriodElapsed> = (1..=emitted)
                .map(|i| PeriodElapsed {
                    period_sec: period,
                    fired_total: first.saturating_add(i),
                    fixed_tick_index: time.fixed_tick_index,
                })
                .collect();

            (fires, s.on_period.clone(), s.original.clone())
        };

        // Lock released: callbacks may call back into set_period.
        for ev in fires.iter() {
            on_period(ev);
        }

        if let Some(h) = original {
            h(time);
        }
    }
}

#[inline]
fn clamp_period(period_sec: f32) -> f32 {
    period_sec.max(MIN_PERIOD_SEC)
}

/// Removes every whole `period` strictly contained in `acc`; returns how many.
///
/// Leaves `acc` in `[0, period]`.
fn drain_periods(acc: &mut f32, period: f32) -> u64 {
    if *acc <= period {
        return 0;
    }

    // Below this ratio `period` is well above the accumulator's ulp, so subtraction always
    // makes progress.
    if *acc / period <= STEPWISE_LIMIT {
        let mut n = 0;
        while *acc > period {
            *acc -= period;
            n += 1;
        }
        return n;
    }

    let a = f64::from(*acc);
    let p = f64::from(period);
    let mut n = (a / p).ceil() - 1.0;
    let mut rest = a - n * p;
    if rest <= 0.0 {
        n -= 1.0;
        rest += p;
    } else if rest > p {
        n += 1.0;
        rest -= p;
    }

    *acc = (rest as f32).clamp(0.0, period);
    n as u64
}
