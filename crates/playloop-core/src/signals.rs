use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{LoopError, LoopResult};

/// Process-level shutdown request, shared between the loop and whoever ends it.
#[derive(Clone, Default)]
pub struct ExitSignal {
    flag: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_exit(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_exit_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn install_ctrlc_handler(&self) -> LoopResult<()> {
        let s = self.clone();
        ctrlc::set_handler(move || s.request_exit())
            .map_err(|e| LoopError::Other(format!("ctrl-c handler: {e}")))
    }
}
