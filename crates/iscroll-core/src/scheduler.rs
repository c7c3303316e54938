//! Host scheduling seam: clock, animation frames and timers
//!
//! The engine never blocks or sleeps. It asks the host for a callback and
//! returns; the host later calls `Viewport::on_frame` / `Viewport::on_timer`
//! with the handle it gave out. Handles the viewport no longer holds are
//! stale and ignored.

/// Fallback frame interval (~60fps) for hosts without a frame primitive
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Handle for a requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle for a one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Monotonic host clock
pub trait Clock {
    /// Current time in milliseconds
    fn now(&self) -> f64;
}

pub trait FrameScheduler {
    /// Arm a one-shot timer that fires `on_timer` after `delay_ms`
    fn set_timeout(&mut self, delay_ms: u64) -> TimerHandle;

    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Ask for `on_frame` before the next repaint
    ///
    /// Hosts without a frame primitive can keep this default, which degrades
    /// to a fixed-interval timer. The viewport accepts the resulting
    /// `on_timer` callback as the frame.
    fn request_frame(&mut self) -> FrameHandle {
        FrameHandle(self.set_timeout(FRAME_INTERVAL_MS).0)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.clear_timeout(TimerHandle(handle.0));
    }
}
