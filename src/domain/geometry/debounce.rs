use crate::domain::display::Size;

pub const RESIZE_DEBOUNCE_MS: f64 = 50.0;
/// Upper bound on how stale the layout size may get during a long continuous resize.
pub const RESIZE_MAX_WAIT_MS: f64 = 200.0;

/// Decides which size geometry is derived from while a resize is in progress.
///
/// Outside a resize the live size is used as-is. During a resize, a new size is
/// adopted once it has been stable for `delay_ms` (or pending for `max_wait_ms`).
/// `flush` adopts whatever is pending unconditionally, which is how the final
/// post-resize layout is guaranteed.
#[derive(Debug, Clone)]
pub struct ResizeDebounce {
    applied: Option<Size>,
    pending: Option<Size>,
    last_change_ms: f64,
    first_pending_ms: f64,
    delay_ms: f64,
    max_wait_ms: f64,
}

impl Default for ResizeDebounce {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS, RESIZE_MAX_WAIT_MS)
    }
}

impl ResizeDebounce {
    pub fn new(delay_ms: f64, max_wait_ms: f64) -> Self {
        Self {
            applied: None,
            pending: None,
            last_change_ms: 0.0,
            first_pending_ms: 0.0,
            delay_ms,
            max_wait_ms: max_wait_ms.max(delay_ms),
        }
    }

    /// Size to lay out against this frame.
    pub fn settle(&mut self, live: Size, now_ms: f64, resizing: bool) -> Size {
        let Some(applied) = self.applied else {
            return self.apply(live);
        };
        if !resizing {
            return self.apply(live);
        }
        if applied == live {
            self.pending = None;
            return applied;
        }

        if self.pending != Some(live) {
            if self.pending.is_none() {
                self.first_pending_ms = now_ms;
            }
            self.pending = Some(live);
            self.last_change_ms = now_ms;
        }

        let quiet = now_ms - self.last_change_ms >= self.delay_ms;
        let overdue = now_ms - self.first_pending_ms >= self.max_wait_ms;
        if quiet || overdue { self.apply(live) } else { applied }
    }

    /// Adopt the live size immediately; used when a resize ends or the timer fires.
    pub fn flush(&mut self, live: Size) -> Size {
        self.apply(live)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending size; used on teardown.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn applied(&self) -> Option<Size> {
        self.applied
    }

    fn apply(&mut self, size: Size) -> Size {
        self.applied = Some(size);
        self.pending = None;
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Size = Size::new(220.0, 120.0);
    const B: Size = Size::new(260.0, 140.0);

    #[test]
    fn holds_old_size_until_quiet() {
        let mut d = ResizeDebounce::default();
        assert_eq!(d.settle(A, 0.0, false), A);
        assert_eq!(d.settle(B, 10.0, true), A);
        assert_eq!(d.settle(B, 40.0, true), A);
        assert_eq!(d.settle(B, 61.0, true), B);
    }

    #[test]
    fn end_of_resize_is_never_skipped() {
        let mut d = ResizeDebounce::default();
        d.settle(A, 0.0, false);
        assert_eq!(d.settle(B, 5.0, true), A);
        assert_eq!(d.settle(B, 6.0, false), B);
        assert!(!d.has_pending());
    }

    #[test]
    fn continuous_resize_still_updates_after_max_wait() {
        let mut d = ResizeDebounce::default();
        d.settle(A, 0.0, false);
        let mut last = A;
        for step in 1..=30 {
            let t = step as f64 * 10.0;
            last = d.settle(Size::new(220.0 + step as f64, 120.0), t, true);
        }
        assert_ne!(last, A);
    }
}
