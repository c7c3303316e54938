//! In-memory host with a manual clock
//!
//! Emulates just enough of a browser for the engine to run without one:
//! element geometry is fixed by the caller, style writes are recorded,
//! transitions are interpolated linearly for `rendered_position`, and
//! frames/timers fire when [`Viewport::advance`] moves the clock.

use std::collections::HashMap;

use crate::event::InputEvent;
use crate::geometry::{ElementBox, ElementId, GeometryProbe, Point, Size};
use crate::render::{parse_translate, HostCapabilities, StyleSurface};
use crate::scheduler::{Clock, FrameHandle, FrameScheduler, TimerHandle, FRAME_INTERVAL_MS};
use crate::timing::{lerp_point, progress};
use crate::viewport::Viewport;

pub const VIEWPORT_ID: ElementId = ElementId(1);
pub const CONTENT_ID: ElementId = ElementId(2);

/// A host-side transition in flight
#[derive(Debug, Clone, Copy, PartialEq)]
struct RunningTransition {
    from: Point,
    to: Point,
    start: f64,
    duration: f64,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    now: f64,
    viewport: Option<Size>,
    content: Option<Size>,
    viewport_offset: Point,
    elements: HashMap<String, ElementBox>,
    capabilities: HostCapabilities,
    styles: HashMap<String, String>,
    writes: Vec<(String, String)>,
    rendered: Point,
    transition_duration: f64,
    transition: Option<RunningTransition>,
    next_handle: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, f64)>,
}

impl HeadlessHost {
    /// Host with a viewport and a content element of the given sizes
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            now: 0.0,
            viewport: Some(viewport),
            content: Some(content),
            viewport_offset: Point::ZERO,
            elements: HashMap::new(),
            capabilities: HostCapabilities::browser(),
            styles: HashMap::new(),
            writes: Vec::new(),
            rendered: Point::ZERO,
            transition_duration: 0.0,
            transition: None,
            next_handle: 1,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// Host whose viewport element cannot be found
    pub fn detached() -> Self {
        Self {
            viewport: None,
            content: None,
            ..Self::new(Size::default(), Size::default())
        }
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_viewport_offset(mut self, offset: Point) -> Self {
        self.viewport_offset = offset;
        self
    }

    /// Register a descendant element for selector queries
    pub fn with_element(mut self, selector: impl Into<String>, element: ElementBox) -> Self {
        self.elements.insert(selector.into(), element);
        self
    }

    pub fn set_now(&mut self, now: f64) {
        self.now = now;
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = Some(size);
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content = Some(size);
    }

    /// Current inline value of a style property
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// Every style write in order
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn has_running_transition(&self) -> bool {
        self.transition.is_some()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn interpolated(&self) -> Point {
        match self.transition {
            Some(t) => lerp_point(t.from, t.to, progress(t.start, self.now, t.duration)),
            None => self.rendered,
        }
    }

    fn place(&mut self, to: Point) {
        let from = self.interpolated();
        self.rendered = to;
        self.transition = (self.transition_duration > 0.0).then_some(RunningTransition {
            from,
            to,
            start: self.now,
            duration: self.transition_duration,
        });
    }

    fn take_finished_transition(&mut self) -> bool {
        match self.transition {
            Some(t) if self.now >= t.start + t.duration => {
                self.transition = None;
                true
            }
            _ => false,
        }
    }

    fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(_, at)| *at <= now);
        self.timers = pending;
        due.into_iter().map(|(handle, _)| handle).collect()
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.parse().ok()
}

fn parse_ms(value: &str) -> Option<f64> {
    value.trim().strip_suffix("ms")?.parse().ok()
}

impl GeometryProbe for HeadlessHost {
    fn resolve_viewport(&self) -> Option<ElementId> {
        self.viewport.map(|_| VIEWPORT_ID)
    }

    fn resolve_content(&self) -> Option<ElementId> {
        self.content.map(|_| CONTENT_ID)
    }

    fn viewport_size(&self) -> Size {
        self.viewport.unwrap_or_default()
    }

    fn content_size(&self) -> Size {
        self.content.unwrap_or_default()
    }

    fn viewport_offset(&self) -> Point {
        self.viewport_offset
    }

    fn query(&self, selector: &str) -> Option<ElementBox> {
        self.elements.get(selector).copied()
    }

    fn rendered_position(&self) -> Option<Point> {
        Some(self.interpolated())
    }
}

impl StyleSurface for HeadlessHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities.clone()
    }

    fn write_style(&mut self, property: &str, value: &str) {
        self.writes.push((property.to_string(), value.to_string()));
        self.styles.insert(property.to_string(), value.to_string());

        if Some(property) == self.capabilities.transition_duration.as_deref() {
            self.transition_duration = parse_ms(value).unwrap_or(0.0);
            if self.transition_duration == 0.0 {
                // Dropping the duration freezes the element where it is
                self.rendered = self.interpolated();
                self.transition = None;
            }
        } else if Some(property) == self.capabilities.transform.as_deref() {
            if let Some(to) = parse_translate(value) {
                self.place(to);
            }
        } else if property == "left" {
            if let Some(x) = parse_px(value) {
                self.place(Point::new(x, self.rendered.y));
            }
        } else if property == "top" {
            if let Some(y) = parse_px(value) {
                self.place(Point::new(self.rendered.x, y));
            }
        }
    }
}

impl FrameScheduler for HeadlessHost {
    fn set_timeout(&mut self, delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push((handle, self.now + delay_ms as f64));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }
}

impl Clock for HeadlessHost {
    fn now(&self) -> f64 {
        self.now
    }
}

impl Viewport<HeadlessHost> {
    /// Move the clock forward frame by frame, delivering callbacks
    pub fn advance(&mut self, ms: f64) {
        let end = self.host.now + ms;
        while self.host.now < end {
            let step = (FRAME_INTERVAL_MS as f64).min(end - self.host.now);
            self.host.now += step;
            self.pump();
        }
    }

    /// Advance until nothing is pending or `max_ms` has elapsed
    pub fn settle(&mut self, max_ms: f64) {
        let end = self.host.now + max_ms;
        while self.host.now < end && self.is_busy() {
            self.advance(FRAME_INTERVAL_MS as f64);
        }
    }

    /// Pending frames, timers or transitions on either side
    pub fn is_busy(&self) -> bool {
        !self.host.frames.is_empty()
            || !self.host.timers.is_empty()
            || self.host.transition.is_some()
            || self.needs_update()
    }

    fn pump(&mut self) {
        for handle in self.host.take_due_timers() {
            self.on_timer(handle);
        }

        let frames = std::mem::take(&mut self.host.frames);
        for handle in frames {
            self.on_frame(handle);
        }

        if self.host.take_finished_transition() {
            let target = self.content_id();
            self.handle_event(InputEvent::TransitionFinished { target });
        }
    }
}
