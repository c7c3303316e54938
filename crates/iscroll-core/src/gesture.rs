//! Gesture state machine: start, move and end of one pointer stream
//!
//! ```text
//! Idle --start--> Tracking --move--> Tracking
//! Tracking --end--> Idle | Settling(bounce) | Settling(momentum)
//! Settling --transition end--> Idle | Settling(bounce)
//! Settling --start--> Tracking
//! ```
//!
//! Tracking is an open [`GestureSession`]; settling is the `is_in_transition`
//! / `is_animating` flags on the scroll state.

use tracing::{debug, trace};

use crate::config::EventPassthrough;
use crate::easing::EasingId;
use crate::event::{EventOutcome, Modality, PointerInput, ScrollEvent, PRIMARY_BUTTON};
use crate::geometry::Point;
use crate::momentum::{self, MomentumInput, MomentumResult};
use crate::state::{DirectionLock, GestureSession};
use crate::viewport::{direction_of, Host, Viewport};

/// Movement (px, per axis) below which a gesture is a tap
pub const MOVE_THRESHOLD: f64 = 10.0;

/// Window (ms) for the velocity sample and the tap debounce
pub const MOMENTUM_WINDOW_MS: f64 = 300.0;

/// Fraction of pointer travel applied past the bounds while bouncing
pub const RUBBER_BAND_FACTOR: f64 = 1.0 / 3.0;

impl<H: Host> Viewport<H> {
    pub(crate) fn start(&mut self, input: PointerInput) -> EventOutcome {
        if input.modality != Modality::Touch && input.button != PRIMARY_BUTTON {
            return EventOutcome::IGNORED;
        }

        if !self.state.enabled {
            return EventOutcome::IGNORED;
        }

        if let Some(session) = &self.session {
            if session.initiated_by != input.modality {
                trace!(
                    active = ?session.initiated_by,
                    incoming = ?input.modality,
                    "Ignoring start from another modality"
                );
                return EventOutcome::IGNORED;
            }
        }

        let outcome = self.prevent_unless_exempt(&input);
        let now = self.host.now();

        if self.state.is_in_transition {
            // Freeze where the host has interpolated to, not the old target
            self.renderer.set_transition_time(&mut self.host, 0.0);
            self.state.is_in_transition = false;
            let rendered = self
                .host
                .rendered_position()
                .unwrap_or_else(|| self.state.position());
            self.renderer
                .translate(&mut self.host, &mut self.state, rendered.round());
            self.emit(ScrollEvent::ScrollEnd);
        } else if self.state.is_animating {
            self.cancel_tween();
            self.emit(ScrollEvent::ScrollEnd);
        }

        self.state.direction_x = 0;
        self.state.direction_y = 0;

        let position = self.state.position();
        debug!(modality = ?input.modality, ?position, "Gesture started");
        self.session = Some(GestureSession::new(input.modality, now, position, input.page));
        self.emit(ScrollEvent::BeforeScrollStart);

        outcome
    }

    pub(crate) fn track(&mut self, input: PointerInput) -> EventOutcome {
        let Some(mut session) = self.session else {
            return EventOutcome::IGNORED;
        };
        if !self.state.enabled || session.initiated_by != input.modality {
            return EventOutcome::IGNORED;
        }

        let mut outcome = EventOutcome {
            prevent_default: self.config.prevent_default,
        };

        let now = self.host.now();
        let mut delta = input.page - session.point;
        session.point = input.page;
        session.dist = session.dist + delta;

        let abs_dist_x = session.dist.x.abs();
        let abs_dist_y = session.dist.y.abs();

        // Micro-drags right after a pause are not scrolls yet
        if now - self.last_gesture_end > MOMENTUM_WINDOW_MS
            && abs_dist_x < MOVE_THRESHOLD
            && abs_dist_y < MOVE_THRESHOLD
        {
            self.session = Some(session);
            return outcome;
        }

        if !self.config.free_scroll && session.lock == DirectionLock::Unlocked {
            let lock = session.lock_direction(self.config.direction_lock_threshold);
            debug!(?lock, abs_dist_x, abs_dist_y, "Direction locked");
        }

        match session.lock {
            DirectionLock::Horizontal => {
                match self.config.event_passthrough {
                    EventPassthrough::Vertical => outcome.prevent_default = true,
                    EventPassthrough::Horizontal => {
                        debug!("Horizontal gesture passed through to host");
                        self.session = None;
                        return EventOutcome::IGNORED;
                    }
                    EventPassthrough::None => {}
                }
                delta.y = 0.0;
            }
            DirectionLock::Vertical => {
                match self.config.event_passthrough {
                    EventPassthrough::Horizontal => outcome.prevent_default = true,
                    EventPassthrough::Vertical => {
                        debug!("Vertical gesture passed through to host");
                        self.session = None;
                        return EventOutcome::IGNORED;
                    }
                    EventPassthrough::None => {}
                }
                delta.x = 0.0;
            }
            DirectionLock::Unlocked | DirectionLock::Neither => {}
        }

        if !self.bounds.has_horizontal_scroll {
            delta.x = 0.0;
        }
        if !self.bounds.has_vertical_scroll {
            delta.y = 0.0;
        }

        let position = self.state.position();
        let next = Point::new(
            self.constrain(position.x, delta.x, self.bounds.max_scroll_x),
            self.constrain(position.y, delta.y, self.bounds.max_scroll_y),
        );

        self.state.direction_x = direction_of(delta.x);
        self.state.direction_y = direction_of(delta.y);

        if !session.moved {
            self.emit(ScrollEvent::ScrollStart);
        }
        session.moved = true;

        self.renderer.translate(&mut self.host, &mut self.state, next);

        // Only the last burst of motion counts towards momentum
        if now - session.start_time > MOMENTUM_WINDOW_MS {
            session.start_time = now;
            session.start = self.state.position();
        }

        self.session = Some(session);
        outcome
    }

    /// Apply a delta on one axis, damped or clamped outside `[max_scroll, 0]`
    fn constrain(&self, current: f64, delta: f64, max_scroll: f64) -> f64 {
        let next = current + delta;
        if next <= 0.0 && next >= max_scroll {
            return next;
        }
        if self.config.bounce {
            current + delta * RUBBER_BAND_FACTOR
        } else if next > 0.0 {
            0.0
        } else {
            max_scroll
        }
    }

    pub(crate) fn end(&mut self, input: PointerInput) -> EventOutcome {
        let Some(session) = self.session else {
            return EventOutcome::IGNORED;
        };
        if !self.state.enabled || session.initiated_by != input.modality {
            return EventOutcome::IGNORED;
        }

        let outcome = self.prevent_unless_exempt(&input);
        let now = self.host.now();
        let duration = now - session.start_time;

        self.state.is_in_transition = false;
        self.session = None;
        self.last_gesture_end = now;

        // Out of bounds: snap back and skip momentum on both axes
        if self.reset_position(self.config.bounce_time) {
            return outcome;
        }

        let rounded = self.state.position().round();
        self.settle_to(rounded, 0.0, None);

        let tapped =
            session.dist.x.abs() < MOVE_THRESHOLD && session.dist.y.abs() < MOVE_THRESHOLD;
        if !session.moved || tapped {
            debug!("Gesture ended as a tap");
            self.emit(ScrollEvent::ScrollCancel);
            return outcome;
        }

        let mut destination = rounded;
        let mut time = 0.0;

        if self.config.momentum && duration < MOMENTUM_WINDOW_MS {
            let x = self.axis_momentum(
                rounded.x,
                session.start.x,
                duration,
                self.bounds.has_horizontal_scroll,
                self.bounds.max_scroll_x,
                self.extents.viewport.sanitized().width,
            );
            let y = self.axis_momentum(
                rounded.y,
                session.start.y,
                duration,
                self.bounds.has_vertical_scroll,
                self.bounds.max_scroll_y,
                self.extents.viewport.sanitized().height,
            );
            destination = Point::new(x.destination, y.destination);
            time = x.duration.max(y.duration);
        }

        if destination != self.state.position() {
            // A fling into the rubber band still resolves elastically
            let easing = if self.bounds.contains(destination) {
                None
            } else {
                Some(EasingId::Quadratic)
            };
            debug!(?destination, time, ?easing, "Momentum settle");
            self.settle_to(destination, time, easing);
            return outcome;
        }

        self.emit(ScrollEvent::ScrollEnd);
        outcome
    }

    fn axis_momentum(
        &self,
        current: f64,
        start: f64,
        time: f64,
        scrollable: bool,
        max_scroll: f64,
        viewport_extent: f64,
    ) -> MomentumResult {
        if !scrollable {
            return MomentumResult::at_rest(current);
        }
        momentum::solve(MomentumInput {
            current,
            start,
            time,
            lower_margin: max_scroll,
            bounce_allowance: if self.config.bounce { viewport_extent } else { 0.0 },
            deceleration: self.config.deceleration,
        })
    }

    fn prevent_unless_exempt(&self, input: &PointerInput) -> EventOutcome {
        EventOutcome {
            prevent_default: self.config.prevent_default
                && !self.config.prevent_default_exception.matches(&input.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::event::InputEvent;
    use crate::geometry::{GeometryProbe, Size};
    use crate::headless::HeadlessHost;
    use crate::render::HostCapabilities;

    const T0: f64 = 1000.0;

    fn viewport_sized(config: ViewportConfig, content: Size) -> Viewport<HeadlessHost> {
        let host = HeadlessHost::new(Size::new(300.0, 500.0), content);
        let mut viewport = Viewport::new(host, &config).unwrap();
        viewport.host_mut().set_now(T0);
        viewport.take_events();
        viewport
    }

    fn viewport(config: ViewportConfig) -> Viewport<HeadlessHost> {
        viewport_sized(config, Size::new(300.0, 1200.0))
    }

    fn mouse(x: f64, y: f64) -> PointerInput {
        PointerInput::new(Modality::Mouse, x, y)
    }

    fn at(viewport: &mut Viewport<HeadlessHost>, t: f64) {
        viewport.host_mut().set_now(t);
    }

    #[test]
    fn test_drag_moves_content() {
        let mut vp = viewport(ViewportConfig::default());

        vp.handle_event(InputEvent::Start(mouse(100.0, 400.0)));
        at(&mut vp, T0 + 10.0);
        let outcome = vp.handle_event(InputEvent::Move(mouse(100.0, 380.0)));

        assert!(outcome.prevent_default);
        assert_eq!(vp.y(), -20.0);
        assert_eq!(vp.state().direction_y, 1);
        assert_eq!(vp.session().unwrap().lock, DirectionLock::Vertical);
        assert_eq!(
            vp.take_events(),
            vec![ScrollEvent::BeforeScrollStart, ScrollEvent::ScrollStart]
        );
    }

    #[test]
    fn test_small_release_is_a_tap() {
        let mut vp = viewport(ViewportConfig::default());

        vp.handle_event(InputEvent::Start(mouse(0.0, 0.0)));
        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(3.0, 4.0)));
        assert_eq!(vp.position(), Point::ZERO);

        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::End(mouse(3.0, 4.0)));

        assert_eq!(vp.position(), Point::ZERO);
        assert!(!vp.state().is_settling());
        assert!(!vp.is_tracking());
        assert_eq!(vp.host().pending_frames(), 0);
        assert!(vp.take_events().contains(&ScrollEvent::ScrollCancel));
    }

    #[test]
    fn test_small_move_applies_right_after_previous_gesture() {
        let mut vp = viewport(ViewportConfig::default());

        vp.handle_event(InputEvent::Start(mouse(0.0, 0.0)));
        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 0.0)));

        at(&mut vp, T0 + 100.0);
        vp.handle_event(InputEvent::Start(mouse(0.0, 100.0)));
        at(&mut vp, T0 + 110.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 96.0)));
        assert_eq!(vp.y(), -4.0);

        at(&mut vp, T0 + 120.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 96.0)));

        assert_eq!(vp.y(), -4.0);
        assert!(!vp.state().is_settling());
        assert!(vp.take_events().contains(&ScrollEvent::ScrollCancel));
    }

    #[test]
    fn test_quick_retouch_wobble_has_no_momentum() {
        let mut vp = viewport_sized(ViewportConfig::default(), Size::new(300.0, 10_000.0));

        vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 400.0)));
        vp.take_events();

        at(&mut vp, T0 + 100.0);
        vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        at(&mut vp, T0 + 110.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 396.0)));
        at(&mut vp, T0 + 120.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 396.0)));

        assert_eq!(vp.y(), -4.0);
        assert!(!vp.state().is_settling());
        assert_eq!(vp.host().pending_frames(), 0);
        assert_eq!(
            vp.take_events(),
            vec![
                ScrollEvent::BeforeScrollStart,
                ScrollEvent::ScrollStart,
                ScrollEvent::ScrollCancel
            ]
        );

        vp.settle(3000.0);
        assert_eq!(vp.y(), -4.0);
    }

    #[test]
    fn test_direction_lock_is_irreversible() {
        let mut vp = viewport_sized(
            ViewportConfig {
                scroll_x: true,
                ..Default::default()
            },
            Size::new(900.0, 1200.0),
        );

        vp.handle_event(InputEvent::Start(mouse(100.0, 400.0)));
        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(100.0, 380.0)));
        assert_eq!(vp.session().unwrap().lock, DirectionLock::Vertical);

        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 380.0)));
        at(&mut vp, T0 + 30.0);
        vp.handle_event(InputEvent::Move(mouse(-200.0, 370.0)));

        assert_eq!(vp.session().unwrap().lock, DirectionLock::Vertical);
        assert_eq!(vp.x(), 0.0);
        assert_eq!(vp.y(), -30.0);
    }

    #[test]
    fn test_other_modality_is_ignored_during_session() {
        let host = HeadlessHost::new(Size::new(300.0, 500.0), Size::new(300.0, 1200.0))
            .with_capabilities(HostCapabilities {
                has_touch: true,
                ..HostCapabilities::browser()
            });
        let config = ViewportConfig {
            disable_mouse: Some(false),
            ..Default::default()
        };
        let mut vp = Viewport::new(host, &config).unwrap();
        at(&mut vp, T0);

        vp.handle_event(InputEvent::Start(PointerInput::new(Modality::Touch, 0.0, 400.0)));
        let outcome = vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        assert_eq!(outcome, EventOutcome::IGNORED);
        assert_eq!(vp.session().unwrap().initiated_by, Modality::Touch);

        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 300.0)));
        assert_eq!(vp.y(), 0.0);

        vp.handle_event(InputEvent::Move(PointerInput::new(Modality::Touch, 0.0, 380.0)));
        assert_eq!(vp.y(), -20.0);

        vp.handle_event(InputEvent::End(mouse(0.0, 380.0)));
        assert!(vp.is_tracking());

        vp.handle_event(InputEvent::End(PointerInput::new(Modality::Touch, 0.0, 380.0)));
        assert!(!vp.is_tracking());
    }

    #[test]
    fn test_disabled_modality_never_starts() {
        let host = HeadlessHost::new(Size::new(300.0, 500.0), Size::new(300.0, 1200.0));
        let mut vp = Viewport::new(host, &ViewportConfig::default()).unwrap();

        // Browser capabilities without touch support disable touch input
        vp.handle_event(InputEvent::Start(PointerInput::new(Modality::Touch, 0.0, 0.0)));
        assert!(!vp.is_tracking());
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut vp = viewport(ViewportConfig::default());
        vp.handle_event(InputEvent::Start(mouse(0.0, 0.0).with_button(2)));
        assert!(!vp.is_tracking());
    }

    #[test]
    fn test_disable_freezes_open_session() {
        let mut vp = viewport(ViewportConfig::default());

        vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        vp.disable();
        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 300.0)));
        vp.handle_event(InputEvent::End(mouse(0.0, 300.0)));

        assert_eq!(vp.y(), 0.0);
        assert!(vp.is_tracking());

        vp.enable();
        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::Start(mouse(50.0, 450.0)));
        assert_eq!(vp.session().unwrap().point, Point::new(50.0, 450.0));
        assert_eq!(vp.session().unwrap().start_time, T0 + 20.0);
    }

    #[test]
    fn test_prevent_default_exception_on_start() {
        let mut vp = viewport(ViewportConfig::default());
        let target = crate::event::EventTarget::new("INPUT");
        let outcome = vp.handle_event(InputEvent::Start(mouse(0.0, 0.0).with_target(target)));
        assert!(!outcome.prevent_default);
        assert!(vp.is_tracking());
    }

    /// Drag 900px up in 30 steps; returns the lowest y seen
    fn overscroll(vp: &mut Viewport<HeadlessHost>) -> f64 {
        vp.handle_event(InputEvent::Start(mouse(0.0, 1000.0)));
        let mut lowest: f64 = 0.0;
        for i in 1..=30 {
            at(vp, T0 + 10.0 * i as f64);
            vp.handle_event(InputEvent::Move(mouse(0.0, 1000.0 - 30.0 * i as f64)));
            lowest = lowest.min(vp.y());
        }
        lowest
    }

    #[test]
    fn test_rubber_band_and_bounce_back_with_transition() {
        let mut vp = viewport(ViewportConfig::default());
        assert_eq!(vp.bounds().max_scroll_y, -700.0);

        let lowest = overscroll(&mut vp);
        assert!(lowest >= -700.0 - 500.0 / 3.0);
        assert!(vp.y() < -700.0);
        assert_eq!(vp.y(), -760.0);

        at(&mut vp, T0 + 310.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 100.0)));

        assert!(vp.state().is_in_transition);
        assert_eq!(vp.y(), -700.0);
        assert_eq!(vp.host().style("transitionDuration"), Some("600ms"));

        vp.settle(2000.0);
        assert!(!vp.state().is_settling());
        assert_eq!(vp.y(), -700.0);
        assert!(vp.take_events().contains(&ScrollEvent::ScrollEnd));
    }

    #[test]
    fn test_rubber_band_and_bounce_back_with_tween() {
        let mut vp = viewport(ViewportConfig {
            use_transition: false,
            ..Default::default()
        });

        let lowest = overscroll(&mut vp);
        assert!(lowest >= -700.0 - 500.0 / 3.0);

        at(&mut vp, T0 + 310.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 100.0)));
        assert!(vp.state().is_animating);
        assert!(!vp.state().is_in_transition);

        vp.advance(300.0);
        assert!(vp.y() < -700.0 && vp.y() > -760.0);

        vp.settle(2000.0);
        assert!(!vp.state().is_settling());
        assert_eq!(vp.y(), -700.0);
        assert_eq!(vp.host().pending_frames(), 0);
    }

    #[test]
    fn test_no_overscroll_without_bounce() {
        let mut vp = viewport(ViewportConfig {
            bounce: false,
            ..Default::default()
        });
        let lowest = overscroll(&mut vp);
        assert_eq!(lowest, -700.0);
    }

    /// Flick upwards in `moves` equal steps spread over 100ms
    fn flick(vp: &mut Viewport<HeadlessHost>, step: f64, moves: u32) {
        let dt = 100.0 / moves as f64;
        vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        for i in 1..=moves {
            at(vp, T0 + dt * i as f64);
            vp.handle_event(InputEvent::Move(mouse(0.0, 400.0 - step * i as f64)));
        }
        vp.handle_event(InputEvent::End(mouse(0.0, 400.0 - step * moves as f64)));
    }

    #[test]
    fn test_fling_past_bounds_resolves_elastically() {
        let mut vp = viewport(ViewportConfig::default());

        flick(&mut vp, 20.0, 10);

        // 2 px/ms overshoots by 500 / 2.5 * (2 / 8) = 50
        assert_eq!(vp.y(), -750.0);
        assert!(vp.state().is_in_transition);
        assert_eq!(
            vp.host().style("transitionTimingFunction"),
            EasingId::Quadratic.css()
        );
        assert_eq!(vp.host().style("transitionDuration"), Some("275ms"));

        vp.settle(3000.0);
        assert_eq!(vp.y(), -700.0);
        assert!(!vp.state().is_settling());
    }

    #[test]
    fn test_fling_inside_bounds() {
        let mut vp = viewport_sized(ViewportConfig::default(), Size::new(300.0, 10_000.0));

        flick(&mut vp, 12.0, 5);

        // 0.6 px/ms travels 0.36 / 0.0012 = 300px further
        assert_eq!(vp.y(), -360.0);
        assert!(vp.state().is_in_transition);
        assert_eq!(
            vp.host().style("transitionTimingFunction"),
            EasingId::Circular.css()
        );

        vp.settle(3000.0);
        assert_eq!(vp.y(), -360.0);
        assert!(vp.take_events().contains(&ScrollEvent::ScrollEnd));
    }

    #[test]
    fn test_momentum_uses_only_the_final_burst() {
        let mut vp = viewport_sized(ViewportConfig::default(), Size::new(300.0, 10_000.0));

        // Slow drag: 20px every 100ms, the start sample rebases at +400ms
        vp.handle_event(InputEvent::Start(mouse(100.0, 1000.0)));
        for i in 1..=4 {
            at(&mut vp, T0 + 100.0 * i as f64);
            vp.handle_event(InputEvent::Move(mouse(100.0, 1000.0 - 20.0 * i as f64)));
        }
        let session = *vp.session().unwrap();
        assert_eq!(session.start_time, T0 + 400.0);
        assert_eq!(session.start, Point::new(0.0, -80.0));

        // Fast burst: 60px in 50ms
        at(&mut vp, T0 + 425.0);
        vp.handle_event(InputEvent::Move(mouse(100.0, 890.0)));
        at(&mut vp, T0 + 450.0);
        vp.handle_event(InputEvent::Move(mouse(100.0, 860.0)));
        vp.handle_event(InputEvent::End(mouse(100.0, 860.0)));

        // 1.2 px/ms travels 1.44 / 0.0012 = 1200px past -140
        assert_eq!(vp.y(), -1340.0);
        assert!(vp.state().is_in_transition);
        assert_eq!(vp.host().style("transitionDuration"), Some("2000ms"));
    }

    #[test]
    fn test_slow_release_has_no_momentum() {
        let mut vp = viewport(ViewportConfig::default());

        vp.handle_event(InputEvent::Start(mouse(0.0, 400.0)));
        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(0.0, 300.0)));
        at(&mut vp, T0 + 500.0);
        vp.handle_event(InputEvent::End(mouse(0.0, 300.0)));

        assert_eq!(vp.y(), -100.0);
        assert!(!vp.state().is_settling());
        assert!(vp.take_events().contains(&ScrollEvent::ScrollEnd));
    }

    #[test]
    fn test_momentum_disabled() {
        let mut vp = viewport_sized(
            ViewportConfig {
                momentum: false,
                ..Default::default()
            },
            Size::new(300.0, 10_000.0),
        );
        flick(&mut vp, 12.0, 5);
        assert_eq!(vp.y(), -60.0);
        assert!(!vp.state().is_settling());
    }

    #[test]
    fn test_out_of_bounds_release_skips_momentum_on_both_axes() {
        let mut vp = viewport_sized(
            ViewportConfig {
                scroll_x: true,
                free_scroll: true,
                ..Default::default()
            },
            Size::new(900.0, 1200.0),
        );

        vp.handle_event(InputEvent::Start(mouse(400.0, 400.0)));
        at(&mut vp, T0 + 10.0);
        vp.handle_event(InputEvent::Move(mouse(300.0, 600.0)));
        assert_eq!(vp.x(), -100.0);
        assert!(vp.y() > 0.0);

        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::End(mouse(300.0, 600.0)));
        vp.settle(2000.0);

        assert_eq!(vp.position(), Point::new(-100.0, 0.0));
    }

    #[test]
    fn test_vertical_passthrough() {
        let mut vp = viewport_sized(
            ViewportConfig {
                scroll_x: true,
                event_passthrough: EventPassthrough::Vertical,
                ..Default::default()
            },
            Size::new(900.0, 1200.0),
        );

        vp.handle_event(InputEvent::Start(mouse(100.0, 400.0)));
        at(&mut vp, T0 + 10.0);
        let outcome = vp.handle_event(InputEvent::Move(mouse(100.0, 380.0)));
        assert!(!outcome.prevent_default);
        assert!(!vp.is_tracking());
        assert_eq!(vp.position(), Point::ZERO);

        at(&mut vp, T0 + 20.0);
        vp.handle_event(InputEvent::Start(mouse(100.0, 400.0)));
        at(&mut vp, T0 + 30.0);
        let outcome = vp.handle_event(InputEvent::Move(mouse(70.0, 400.0)));
        assert!(outcome.prevent_default);
        assert_eq!(vp.position(), Point::new(-30.0, 0.0));
    }

    #[test]
    fn test_start_mid_transition_rebases_to_rendered_position() {
        let mut vp = viewport(ViewportConfig::default());

        vp.scroll_to(0.0, -400.0, 2000.0, Some(EasingId::Circular)).unwrap();
        assert!(vp.state().is_in_transition);
        assert_eq!(vp.y(), -400.0);

        vp.advance(500.0);
        let rendered = vp.host().rendered_position().unwrap();
        assert_eq!(rendered, Point::new(0.0, -100.0));
        vp.take_events();

        vp.handle_event(InputEvent::Start(mouse(0.0, 300.0)));

        assert!(!vp.state().is_in_transition);
        assert_eq!(vp.session().unwrap().start, Point::new(0.0, -100.0));
        assert_eq!(vp.y(), -100.0);
        assert_eq!(
            vp.take_events(),
            vec![ScrollEvent::ScrollEnd, ScrollEvent::BeforeScrollStart]
        );

        // The interrupted transition's end must not resurrect the settle
        vp.settle(3000.0);
        assert_eq!(vp.y(), -100.0);
    }

    #[test]
    fn test_start_mid_tween_stops_animation() {
        let mut vp = viewport(ViewportConfig {
            use_transition: false,
            ..Default::default()
        });

        vp.scroll_to(0.0, -400.0, 2000.0, None).unwrap();
        vp.advance(500.0);
        let mid = vp.y();
        assert!(mid < 0.0 && mid > -400.0);

        vp.handle_event(InputEvent::Start(mouse(0.0, 300.0)));

        assert!(!vp.state().is_animating);
        assert_eq!(vp.host().pending_frames(), 0);
        assert_eq!(vp.session().unwrap().start.y, mid);

        vp.advance(100.0);
        assert_eq!(vp.y(), mid);
    }
}
