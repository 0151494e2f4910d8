use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::LoopConfig;
use crate::context::LoopSystems;
use crate::editor;
use crate::error::{LoopError, LoopResult};
use crate::fixed_rate::FixedRateOverride;
use crate::frame::{Frame, FrameConstitution};
use crate::host::{ActiveTree, LoopHost};
use crate::identity::NodeId;
use crate::node::{Handler, UpdateNode};
use crate::phase::{self, FramePhase};
use crate::signals::ExitSignal;
use crate::telemetry::Telemetry;
use crate::time::Time;

/// Top-level scheduler: owns the active tree and drives it once per frame.
///
/// The fixed-cadence branch (`FramePhase::FixedUpdate` unless changed) is run once per
/// fixed step, every other node once per frame, in tree pre-order.
pub struct PlayerLoop {
    active: ActiveTree,
    systems: LoopSystems,

    constitution: FrameConstitution,
    fixed_branch: NodeId,

    time: Time,
    telemetry: Telemetry,
    accumulator: f32,

    shutdown_done: bool,
}

impl PlayerLoop {
    pub fn new(cfg: &LoopConfig, tree: UpdateNode) -> Self {
        let constitution = FrameConstitution::from_config(&cfg.frame);

        let mut telemetry = Telemetry::new();
        telemetry.configure_fps_logging(constitution.log_fps, constitution.fps_log_period_sec);

        let rate = FixedRateOverride::new(cfg.rate_override.period_sec);

        let mut this = Self {
            active: ActiveTree::new(tree),
            systems: LoopSystems::new(rate),
            time: Time::new(constitution.fixed_dt_sec),
            constitution,
            fixed_branch: FramePhase::FixedUpdate.id(),
            telemetry,
            accumulator: 0.0,
            shutdown_done: false,
        };

        if cfg.rate_override.enabled {
            this.install_rate_override_by_name(&cfg.rate_override.target);
        }
        this
    }

    #[inline]
    pub fn with_default_tree(cfg: &LoopConfig) -> Self {
        Self::new(cfg, phase::default_tree())
    }

    /// Changes which node is driven at the fixed cadence.
    #[inline]
    pub fn with_fixed_branch(mut self, id: NodeId) -> Self {
        self.fixed_branch = id;
        self
    }

    /* ============================
       Tree editing (forwarded to LoopSystems)
       ============================ */

    #[inline]
    pub fn insert_system_before(&mut self, id: NodeId, handler: Handler, target: NodeId) -> bool {
        self.systems.insert_system_before(&mut self.active, id, handler, target)
    }

    #[inline]
    pub fn insert_system_after(&mut self, id: NodeId, handler: Handler, target: NodeId) -> bool {
        self.systems.insert_system_after(&mut self.active, id, handler, target)
    }

    #[inline]
    pub fn try_remove_system(&mut self, id: NodeId) -> bool {
        self.systems.try_remove_system(&mut self.active, id)
    }

    #[inline]
    pub fn set_update_period(&self, period_sec: f32) {
        self.systems.set_update_period(period_sec);
    }

    /// Installs the override on `target`. When `target` is the fixed-cadence branch itself,
    /// the override node takes over that role.
    pub fn install_rate_override(&mut self, target: NodeId) -> bool {
        if !self.systems.install_rate_override(&mut self.active, target) {
            return false;
        }
        if target == self.fixed_branch {
            self.fixed_branch = FixedRateOverride::node_id();
            info!("fixed-cadence branch moved from '{target}' to the rate override");
        }
        true
    }

    /// Resolves `name` against the active tree, then installs the override there.
    pub fn install_rate_override_by_name(&mut self, name: &str) -> bool {
        let Some(target) = editor::find_by_name(self.active.get(), name) else {
            warn!("fixed-rate override: no node named '{name}'; custom cadence disabled");
            return false;
        };
        self.install_rate_override(target)
    }

    /* ============================
       Accessors
       ============================ */

    #[inline]
    pub fn tree(&self) -> &UpdateNode {
        self.active.get()
    }

    #[inline]
    pub fn systems(&self) -> &LoopSystems {
        &self.systems
    }

    #[inline]
    pub fn rate_override(&self) -> &FixedRateOverride {
        self.systems.rate_override()
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    #[inline]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    #[inline]
    pub fn constitution(&self) -> &FrameConstitution {
        &self.constitution
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown_done
    }

    /* ============================
       Driving
       ============================ */

    /// Drives one frame of `raw_dt` wall time through the active tree.
    pub fn frame(&mut self, raw_dt: Duration) -> LoopResult<Frame> {
        if self.shutdown_done {
            return Err(LoopError::ExitRequested);
        }

        let mut dt = raw_dt.as_secs_f32();
        if !dt.is_finite() || dt < 0.0 {
            dt = 0.0;
        }
        dt = dt.min(self.constitution.max_dt_sec);

        self.time.dt_sec = dt;
        self.time.t_sec += raw_dt.as_secs_f64();
        self.time.frame_index += 1;

        self.accumulator += dt;

        // FixedUpdate with cap (anti spiral-of-death)
        let fixed_dt = self.constitution.fixed_dt_sec;
        let mut fixed_steps: u32 = 0;
        while self.accumulator >= fixed_dt {
            if fixed_steps >= self.constitution.max_fixed_steps_per_frame {
                self.accumulator = 0.0;
                warn!("fixed cap reached (spiral prevented)");
                break;
            }
            self.accumulator -= fixed_dt;
            fixed_steps += 1;
        }

        self.time.fixed_alpha = (self.accumulator / fixed_dt).clamp(0.0, 1.0);

        let traversal = Traversal {
            fixed_branch: self.fixed_branch,
            fixed_steps,
            base_tick: self.time.fixed_tick_index,
        };
        traversal.run(self.active.get(), &mut self.time);
        self.time.fixed_tick_index = traversal.base_tick + u64::from(fixed_steps);

        self.telemetry
            .frame_tick(raw_dt, self.time.fixed_alpha, self.time.fixed_tick_index);

        Ok(Frame {
            frame_index: self.time.frame_index,
            dt,
            fixed_dt,
            fixed_steps,
            fixed_alpha: self.time.fixed_alpha,
        })
    }

    /// Real-time loop paced to `target_fps`. Returns after `exit` is raised (or the loop is
    /// shut down from `on_frame`), with shutdown performed.
    pub fn run<F>(&mut self, exit: &ExitSignal, mut on_frame: F) -> LoopResult<()>
    where
        F: FnMut(&mut PlayerLoop, &Frame),
    {
        info!("player loop: first frame");

        let mut last = Instant::now();
        while !exit.is_exit_requested() {
            let start = Instant::now();
            let raw_dt = start.duration_since(last);
            last = start;

            let frame = match self.frame(raw_dt) {
                Ok(f) => f,
                Err(LoopError::ExitRequested) => break,
                Err(e) => return Err(e),
            };
            on_frame(self, &frame);

            if let Some(rest) = self.constitution.frame_budget.checked_sub(start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Fires the shutdown event. Only the first call does anything.
    pub fn shutdown(&mut self) -> usize {
        if self.shutdown_done {
            return 0;
        }
        self.shutdown_done = true;

        let removed = self.systems.on_shutdown(&mut self.active);
        info!("player loop: shutdown after {} frame(s)", self.time.frame_index);
        removed
    }
}

impl LoopHost for PlayerLoop {
    #[inline]
    fn current_tree(&self) -> UpdateNode {
        self.active.current_tree()
    }

    #[inline]
    fn set_tree(&mut self, tree: UpdateNode) {
        self.active.set_tree(tree);
    }
}

struct Traversal {
    fixed_branch: NodeId,
    fixed_steps: u32,
    base_tick: u64,
}

impl Traversal {
    fn run(&self, node: &UpdateNode, time: &mut Time) {
        if node.id == self.fixed_branch {
            for step in 0..self.fixed_steps {
                time.fixed_tick_index = self.base_tick + u64::from(step) + 1;
                time.in_fixed_step = true;
                run_subtree(node, time);
                time.in_fixed_step = false;
            }
            return;
        }

        node.invoke(time);
        for child in node.children.iter() {
            self.run(child, time);
        }
    }
}

fn run_subtree(node: &UpdateNode, time: &Time) {
    node.invoke(time);
    for child in node.children.iter() {
        run_subtree(child, time);
    }
}
