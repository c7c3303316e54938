//! Viewport controller: the public facade of the engine
//!
//! Owns the resolved configuration, the scroll state and the host, wires the
//! gesture machine to the render strategy, and exposes the programmatic
//! surface (`scroll_to`, `scroll_by`, `scroll_to_element`, `refresh`,
//! `enable`/`disable`).

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::{ResolvedConfig, ViewportConfig};
use crate::easing::EasingId;
use crate::error::{Error, Result};
use crate::event::{EventOutcome, InputEvent, Modality, ScrollEvent, WheelInput};
use crate::geometry::{Bounds, ElementBox, ElementId, Extents, GeometryProbe, Point};
use crate::render::{Renderer, StyleSurface, Tween, TweenStep};
use crate::scheduler::{Clock, FrameHandle, FrameScheduler, TimerHandle};
use crate::state::{GestureSession, ScrollState};

/// Quiet period after the last wheel event before `ScrollEnd` fires
const WHEEL_END_DELAY_MS: u64 = 400;

/// Everything the engine needs from its environment
pub trait Host: GeometryProbe + StyleSurface + FrameScheduler + Clock {}

impl<T> Host for T where T: GeometryProbe + StyleSurface + FrameScheduler + Clock {}

/// Element to bring into view with [`Viewport::scroll_to_element`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTarget<'a> {
    /// Selector resolved by the host inside the content element
    Selector(&'a str),
    /// Box the caller already resolved
    Element(ElementBox),
}

/// Extra offset applied when scrolling to an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ElementOffset {
    #[default]
    None,
    Px(f64),
    /// Center the element in the viewport on this axis
    Center,
}

impl ElementOffset {
    fn resolve(&self, element_extent: f64, viewport_extent: f64) -> f64 {
        match self {
            ElementOffset::None => 0.0,
            ElementOffset::Px(px) => *px,
            ElementOffset::Center => (element_extent / 2.0 - viewport_extent / 2.0).round(),
        }
    }
}

pub struct Viewport<H: Host> {
    pub(crate) host: H,
    pub(crate) config: ResolvedConfig,
    pub(crate) renderer: Renderer,
    pub(crate) state: ScrollState,
    pub(crate) bounds: Bounds,
    pub(crate) extents: Extents,
    viewport_id: ElementId,
    content_id: ElementId,
    pub(crate) session: Option<GestureSession>,
    /// Clock time of the last gesture end (0 after a refresh)
    pub(crate) last_gesture_end: f64,
    tween: Option<Tween>,
    frame: Option<FrameHandle>,
    resize_timer: Option<TimerHandle>,
    wheel_timer: Option<TimerHandle>,
    events: VecDeque<ScrollEvent>,
    destroyed: bool,
}

impl<H: Host> Viewport<H> {
    /// Attach a viewport to the host's scrollable element
    ///
    /// Fails if the viewport or its content element cannot be resolved, or
    /// if the configuration cannot be compiled.
    pub fn new(host: H, config: &ViewportConfig) -> Result<Self> {
        let viewport_id = host
            .resolve_viewport()
            .ok_or_else(|| Error::Config("viewport element could not be resolved".to_string()))?;
        let content_id = host
            .resolve_content()
            .ok_or_else(|| Error::Config("viewport has no content element".to_string()))?;

        let caps = host.capabilities();
        let resolved = config.resolve(&caps)?;
        let renderer = Renderer::new(&resolved, &caps);

        debug!(
            policy = ?renderer.policy(),
            transform = resolved.use_transform,
            "Viewport attached"
        );

        let start = Point::new(resolved.start_x, resolved.start_y);

        let mut viewport = Self {
            host,
            config: resolved,
            renderer,
            state: ScrollState::default(),
            bounds: Bounds::default(),
            extents: Extents::default(),
            viewport_id,
            content_id,
            session: None,
            last_gesture_end: 0.0,
            tween: None,
            frame: None,
            resize_timer: None,
            wheel_timer: None,
            events: VecDeque::new(),
            destroyed: false,
        };

        viewport.refresh();
        viewport.scroll_to(start.x, start.y, 0.0, None)?;
        viewport.enable();

        Ok(viewport)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.state.position()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.state.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.state.y()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    pub fn viewport_id(&self) -> ElementId {
        self.viewport_id
    }

    pub fn content_id(&self) -> ElementId {
        self.content_id
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Whether the host should route move/end events from the viewport only
    pub fn binds_to_wrapper(&self) -> bool {
        self.config.bind_to_wrapper
    }

    /// Whether a gesture session is open
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Current gesture session, if any
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Whether the host needs to keep delivering frames or timers
    pub fn needs_update(&self) -> bool {
        self.frame.is_some()
            || self.resize_timer.is_some()
            || self.wheel_timer.is_some()
            || self.state.is_in_transition
    }

    /// Drain lifecycle notifications emitted since the last call
    pub fn take_events(&mut self) -> Vec<ScrollEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn emit(&mut self, event: ScrollEvent) {
        trace!(?event, "Scroll event");
        self.events.push_back(event);
    }

    pub fn enable(&mut self) {
        self.state.enabled = true;
    }

    /// Stop processing gesture input; programmatic scrolls still work
    pub fn disable(&mut self) {
        self.state.enabled = false;
    }

    /// Dispatch one host notification
    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        if self.destroyed {
            return EventOutcome::IGNORED;
        }

        if let Some(modality) = event.modality() {
            if !self.accepts(modality) {
                return EventOutcome::IGNORED;
            }
        }

        match event {
            InputEvent::Start(input) => self.start(input),
            InputEvent::Move(input) => self.track(input),
            InputEvent::End(input) | InputEvent::Cancel(input) => self.end(input),
            InputEvent::Wheel(input) => self.wheel(input),
            InputEvent::Resize | InputEvent::OrientationChange => {
                self.schedule_refresh();
                EventOutcome::IGNORED
            }
            InputEvent::TransitionFinished { target } => {
                self.transition_end(target);
                EventOutcome::IGNORED
            }
        }
    }

    fn accepts(&self, modality: Modality) -> bool {
        match modality {
            Modality::Mouse => !self.config.disable_mouse,
            Modality::Touch => !self.config.disable_touch,
            Modality::Pointer => !self.config.disable_pointer,
        }
    }

    /// Re-measure the viewport and content and fix up the position
    pub fn refresh(&mut self) {
        self.extents = Extents {
            viewport: self.host.viewport_size(),
            content: self.host.content_size(),
            viewport_offset: self.host.viewport_offset(),
        };
        self.bounds = Bounds::measure(&self.extents, self.config.scroll_x, self.config.scroll_y);

        self.last_gesture_end = 0.0;
        self.state.direction_x = 0;
        self.state.direction_y = 0;

        debug!(
            max_scroll_x = self.bounds.max_scroll_x,
            max_scroll_y = self.bounds.max_scroll_y,
            horizontal = self.bounds.has_horizontal_scroll,
            vertical = self.bounds.has_vertical_scroll,
            "Viewport refreshed"
        );

        self.emit(ScrollEvent::Refresh);
        self.reset_position(0.0);
    }

    /// Debounce resize notifications into one deferred refresh
    fn schedule_refresh(&mut self) {
        if let Some(handle) = self.resize_timer.take() {
            self.host.clear_timeout(handle);
        }
        self.resize_timer = Some(self.host.set_timeout(self.config.resize_polling));
    }

    /// Bring an out-of-bounds position back inside with the bounce easing
    ///
    /// Returns `true` if a correction was started.
    pub fn reset_position(&mut self, duration: f64) -> bool {
        let position = self.state.position();
        let target = self.bounds.settle_target(position);

        if target == position {
            return false;
        }

        debug!(?position, ?target, duration, "Resetting position into bounds");
        self.settle_to(target, duration, Some(self.config.bounce_easing));
        true
    }

    /// Scroll to an absolute position
    ///
    /// A zero duration commits immediately. Otherwise the settle runs as a
    /// host transition if the render policy and easing allow it, or as a
    /// frame-driven tween. The default easing is circular. Non-finite
    /// coordinates are rejected and leave the position untouched.
    pub fn scroll_to(
        &mut self,
        x: f64,
        y: f64,
        duration: f64,
        easing: Option<EasingId>,
    ) -> Result<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidTarget(format!("non-finite scroll position ({x}, {y})")));
        }
        self.settle_to(Point::new(x, y), duration, easing);
        Ok(())
    }

    /// Scroll relative to the current position
    pub fn scroll_by(
        &mut self,
        dx: f64,
        dy: f64,
        duration: f64,
        easing: Option<EasingId>,
    ) -> Result<()> {
        let position = self.state.position();
        self.scroll_to(position.x + dx, position.y + dy, duration, easing)
    }

    /// Move to an engine-computed position, always finite
    pub(crate) fn settle_to(&mut self, target: Point, duration: f64, easing: Option<EasingId>) {
        let easing = easing.unwrap_or_default();
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };

        self.cancel_tween();

        let transition = duration > 0.0 && self.renderer.can_transition(easing);
        self.state.is_in_transition = transition;

        if duration == 0.0 || transition {
            self.renderer.set_timing_function(&mut self.host, easing);
            self.renderer.set_transition_time(&mut self.host, duration);
            self.renderer.translate(&mut self.host, &mut self.state, target);
        } else {
            self.animate(target, duration, easing);
        }
    }

    /// Scroll so that an element inside the content is at the viewport origin
    ///
    /// `duration = None` picks a duration from the travel distance (1ms per
    /// pixel on the longer axis). The destination is clamped into bounds.
    pub fn scroll_to_element(
        &mut self,
        target: ScrollTarget<'_>,
        duration: Option<f64>,
        offset_x: ElementOffset,
        offset_y: ElementOffset,
        easing: Option<EasingId>,
    ) -> Result<()> {
        let element = match target {
            ScrollTarget::Selector(selector) => self
                .host
                .query(selector)
                .ok_or_else(|| Error::InvalidTarget(format!("no element matches {selector:?}")))?,
            ScrollTarget::Element(element) => element,
        };

        if !element.offset.is_finite() {
            return Err(Error::InvalidTarget(format!(
                "element offset is not finite: {:?}",
                element.offset
            )));
        }

        let relative = element.offset - self.extents.viewport_offset;
        let viewport = self.extents.viewport.sanitized();
        let size = element.size.sanitized();

        let destination = self.bounds.clamp(Point::new(
            -relative.x - offset_x.resolve(size.width, viewport.width),
            -relative.y - offset_y.resolve(size.height, viewport.height),
        ));

        let position = self.state.position();
        let duration = duration.unwrap_or_else(|| {
            (position.x - destination.x)
                .abs()
                .max((position.y - destination.y).abs())
        });

        self.scroll_to(destination.x, destination.y, duration, easing)
    }

    fn animate(&mut self, destination: Point, duration: f64, easing: EasingId) {
        // A transition left running would smear every tween write
        self.renderer.set_transition_time(&mut self.host, 0.0);

        let now = self.host.now();
        self.tween = Some(Tween::new(
            self.state.position(),
            destination,
            now,
            duration,
            easing,
        ));
        self.state.is_animating = true;
        self.step_tween(now);
    }

    fn step_tween(&mut self, now: f64) {
        let Some(tween) = self.tween else {
            return;
        };

        match tween.sample(now) {
            TweenStep::Finished(destination) => {
                self.tween = None;
                self.state.is_animating = false;
                self.renderer.translate(&mut self.host, &mut self.state, destination);
                if !self.reset_position(self.config.bounce_time) {
                    self.emit(ScrollEvent::ScrollEnd);
                }
            }
            TweenStep::Running(position) => {
                self.renderer.translate(&mut self.host, &mut self.state, position);
                if self.state.is_animating {
                    self.frame = Some(self.host.request_frame());
                }
            }
        }
    }

    /// Stop a running tween where it is
    pub(crate) fn cancel_tween(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.host.cancel_frame(handle);
        }
        self.tween = None;
        self.state.is_animating = false;
    }

    /// Animation frame callback from the host
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.frame != Some(handle) {
            trace!(?handle, "Ignoring stale frame");
            return;
        }
        self.frame = None;

        if !self.state.is_animating {
            return;
        }
        let now = self.host.now();
        self.step_tween(now);
    }

    /// Timer callback from the host
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.resize_timer == Some(handle) {
            self.resize_timer = None;
            self.refresh();
        } else if self.wheel_timer == Some(handle) {
            self.wheel_timer = None;
            self.emit(ScrollEvent::ScrollEnd);
        } else if self.frame == Some(FrameHandle(handle.0)) {
            self.on_frame(FrameHandle(handle.0));
        } else {
            trace!(?handle, "Ignoring stale timer");
        }
    }

    fn transition_end(&mut self, target: ElementId) {
        if target != self.content_id || !self.state.is_in_transition {
            trace!(?target, "Ignoring transition end");
            return;
        }

        self.renderer.set_transition_time(&mut self.host, 0.0);
        if !self.reset_position(self.config.bounce_time) {
            self.state.is_in_transition = false;
            self.emit(ScrollEvent::ScrollEnd);
        }
    }

    fn wheel(&mut self, input: WheelInput) -> EventOutcome {
        if !self.config.mouse_wheel || !self.state.enabled {
            return EventOutcome::IGNORED;
        }
        if !input.delta_x.is_finite() || !input.delta_y.is_finite() {
            trace!(?input, "Ignoring non-finite wheel delta");
            return EventOutcome::IGNORED;
        }

        if let Some(handle) = self.wheel_timer.take() {
            self.host.clear_timeout(handle);
        }
        self.wheel_timer = Some(self.host.set_timeout(WHEEL_END_DELAY_MS));

        let direction = if self.config.invert_wheel_direction { -1.0 } else { 1.0 };
        let speed = self.config.mouse_wheel_speed;
        let mut delta_x = -input.delta_x * speed * direction;
        let mut delta_y = -input.delta_y * speed * direction;

        // A horizontal-only scroller takes the vertical wheel
        if !self.bounds.has_vertical_scroll {
            delta_x = delta_y;
            delta_y = 0.0;
        }

        let position = self.state.position();
        let next = Point::new(
            position.x + if self.bounds.has_horizontal_scroll { delta_x.round() } else { 0.0 },
            position.y + if self.bounds.has_vertical_scroll { delta_y.round() } else { 0.0 },
        );

        self.state.direction_x = direction_of(delta_x);
        self.state.direction_y = direction_of(delta_y);

        let next = self.bounds.clamp(next);
        self.settle_to(next, 0.0, None);

        EventOutcome::PREVENTED
    }

    /// Detach from the host: cancel callbacks and ignore further input
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_tween();
        for handle in [self.resize_timer.take(), self.wheel_timer.take()]
            .into_iter()
            .flatten()
        {
            self.host.clear_timeout(handle);
        }
        self.session = None;
        self.state.is_in_transition = false;
        self.state.enabled = false;
        self.destroyed = true;
        self.emit(ScrollEvent::Destroy);
    }
}

/// -1 when content moves towards the origin, 1 away from it
pub(crate) fn direction_of(delta: f64) -> i8 {
    if delta > 0.0 {
        -1
    } else if delta < 0.0 {
        1
    } else {
        0
    }
}
