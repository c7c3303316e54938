//! Scroll state records owned by the viewport controller

use crate::geometry::Point;
use crate::event::Modality;

/// Live scroll state
///
/// The position is only written by the render strategy's commit, so what is
/// stored here is always what was last handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    position: Point,
    /// Last committed movement direction per axis: -1, 0 or 1
    pub direction_x: i8,
    pub direction_y: i8,
    pub enabled: bool,
    /// A host-interpolated transition is running
    pub is_in_transition: bool,
    /// A frame-driven tween is running
    pub is_animating: bool,
}

impl ScrollState {
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Whether a settle (transition or tween) is in flight
    #[inline]
    pub fn is_settling(&self) -> bool {
        self.is_in_transition || self.is_animating
    }

    pub(crate) fn commit(&mut self, position: Point) {
        self.position = position;
    }
}

/// Per-gesture axis decision, made once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionLock {
    #[default]
    Unlocked,
    Horizontal,
    Vertical,
    /// Decided, but neither axis dominated; both move
    Neither,
}

impl DirectionLock {
    /// Decide the lock from accumulated movement
    ///
    /// Horizontal needs to lead by strictly more than `threshold`; vertical
    /// wins ties at the threshold.
    pub fn decide(abs_dist_x: f64, abs_dist_y: f64, threshold: f64) -> Self {
        if abs_dist_x > abs_dist_y + threshold {
            DirectionLock::Horizontal
        } else if abs_dist_y >= abs_dist_x + threshold {
            DirectionLock::Vertical
        } else {
            DirectionLock::Neither
        }
    }
}

/// One tracked pointer stream, from start to end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Modality that opened the session
    pub initiated_by: Modality,
    /// Start of the current motion burst (rebased every 300ms)
    pub start_time: f64,
    pub start: Point,
    /// Last page coordinates seen
    pub point: Point,
    /// Accumulated pointer travel per axis
    pub dist: Point,
    pub lock: DirectionLock,
    /// At least one move was applied
    pub moved: bool,
}

impl GestureSession {
    pub fn new(initiated_by: Modality, now: f64, position: Point, page: Point) -> Self {
        Self {
            initiated_by,
            start_time: now,
            start: position,
            point: page,
            dist: Point::ZERO,
            lock: DirectionLock::Unlocked,
            moved: false,
        }
    }

    /// Lock the direction if still unlocked; returns the (possibly old) lock
    pub fn lock_direction(&mut self, threshold: f64) -> DirectionLock {
        if self.lock == DirectionLock::Unlocked {
            self.lock = DirectionLock::decide(self.dist.x.abs(), self.dist.y.abs(), threshold);
        }
        self.lock
    }
}
