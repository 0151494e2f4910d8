/// Timing view handed to every handler.
#[derive(Debug, Clone)]
pub struct Time {
    pub dt_sec: f32,
    pub t_sec: f64,
    pub frame_index: u64,

    pub fixed_tick_index: u64,
    pub fixed_alpha: f32,
    pub fixed_dt_sec: f32,

    /// Set while the fixed-cadence branch is being driven.
    pub in_fixed_step: bool,
}

impl Time {
    pub fn new(fixed_dt_sec: f32) -> Self {
        Self {
            dt_sec: 0.0,
            t_sec: 0.0,
            frame_index: 0,
            fixed_tick_index: 0,
            fixed_alpha: 0.0,
            fixed_dt_sec,
            in_fixed_step: false,
        }
    }

    /// Delta of the cadence currently being ticked.
    #[inline]
    pub fn delta_sec(&self) -> f32 {
        if self.in_fixed_step {
            self.fixed_dt_sec
        } else {
            self.dt_sec
        }
    }

    /// A view positioned inside a fixed step of `fixed_dt_sec`.
    pub fn fixed_step(fixed_dt_sec: f32) -> Self {
        Self {
            in_fixed_step: true,
            ..Self::new(fixed_dt_sec)
        }
    }
}
