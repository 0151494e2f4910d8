use std::time::Duration;

use crate::config::FrameConfig;

#[derive(Debug, Clone)]
pub struct FrameConstitution {
    pub fixed_dt_sec: f32,
    pub max_fixed_steps_per_frame: u32,
    pub max_dt_sec: f32,
    pub frame_budget: Duration,

    pub log_fps: bool,
    pub fps_log_period_sec: f32,
}

impl FrameConstitution {
    pub fn from_config(cfg: &FrameConfig) -> Self {
        Self {
            fixed_dt_sec: 1.0 / (cfg.fixed_hz.max(1) as f32),
            max_fixed_steps_per_frame: cfg.max_fixed_steps_per_frame.max(1),
            max_dt_sec: (cfg.max_dt_ms as f32 / 1000.0).max(0.001),
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(cfg.target_fps.max(1))),
            log_fps: cfg.log_fps,
            fps_log_period_sec: (cfg.fps_log_period_ms as f32 / 1000.0).max(0.25),
        }
    }
}

impl Default for FrameConstitution {
    fn default() -> Self {
        Self::from_config(&FrameConfig::default())
    }
}

/// Summary of one driven frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub frame_index: u64,
    pub dt: f32,
    pub fixed_dt: f32,
    pub fixed_steps: u32,
    pub fixed_alpha: f32,
}
