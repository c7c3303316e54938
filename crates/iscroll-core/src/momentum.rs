//! Momentum solver: where a released fling comes to rest
//!
//! Velocity is measured over the last burst of motion (the gesture rebases
//! its start sample every 300ms), then decelerated at a constant rate:
//!
//! ```text
//! speed       = |current - start| / time
//! destination = current + speed² / (2 · deceleration) · sign
//! duration    = speed / deceleration
//! ```
//!
//! A destination past either bound is pulled back to the bound, plus an
//! overshoot proportional to speed when a bounce allowance is available.

/// Default deceleration in px/ms²
pub const DEFAULT_DECELERATION: f64 = 0.0006;

/// Predicted resting point of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumResult {
    pub destination: f64,
    /// Milliseconds
    pub duration: f64,
}

impl MomentumResult {
    /// An axis that does not move
    pub fn at_rest(position: f64) -> Self {
        Self {
            destination: position,
            duration: 0.0,
        }
    }
}

/// Release sample for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumInput {
    /// Position at release
    pub current: f64,
    /// Position at the start of the final burst
    pub start: f64,
    /// Milliseconds elapsed since the start of the final burst
    pub time: f64,
    /// Axis scroll bound (`max_scroll`, never positive)
    pub lower_margin: f64,
    /// Viewport extent on this axis when bounce is enabled, 0 otherwise
    pub bounce_allowance: f64,
    pub deceleration: f64,
}

/// Compute the momentum settle for one axis
pub fn solve(input: MomentumInput) -> MomentumResult {
    let MomentumInput {
        current,
        start,
        time,
        lower_margin,
        bounce_allowance,
        deceleration,
    } = input;

    // No overflow on this axis, nothing to fling
    if lower_margin >= 0.0 {
        return MomentumResult::at_rest(current);
    }

    let deceleration = if deceleration > 0.0 && deceleration.is_finite() {
        deceleration
    } else {
        DEFAULT_DECELERATION
    };

    let distance = current - start;
    if time <= 0.0 || distance == 0.0 || !distance.is_finite() {
        return MomentumResult::at_rest(current);
    }

    let speed = distance.abs() / time;
    let sign = if distance < 0.0 { -1.0 } else { 1.0 };

    let mut destination = current + (speed * speed) / (2.0 * deceleration) * sign;
    let mut duration = speed / deceleration;

    if destination < lower_margin {
        destination = if bounce_allowance > 0.0 {
            lower_margin - (bounce_allowance / 2.5 * (speed / 8.0))
        } else {
            lower_margin
        };
        duration = (destination - current).abs() / speed;
    } else if destination > 0.0 {
        destination = if bounce_allowance > 0.0 {
            bounce_allowance / 2.5 * (speed / 8.0)
        } else {
            0.0
        };
        duration = (current.abs() + destination) / speed;
    }

    MomentumResult {
        destination: destination.round(),
        duration,
    }
}
