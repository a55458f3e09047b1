use gloo_timers::callback::Timeout;

/// Trailing-edge timer: each `schedule` replaces the pending callback.
/// Dropping the timer (or calling `cancel`) clears it.
#[derive(Default)]
pub struct DebounceTimer {
    pending: Option<Timeout>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: u32, callback: impl FnOnce() + 'static) {
        // dropping the previous timeout clears it
        self.pending = Some(Timeout::new(delay_ms, callback));
    }

    pub fn cancel(&mut self) {
        drop(self.pending.take());
    }
}
