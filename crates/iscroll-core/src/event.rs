//! Input model: the unified event stream a host feeds into the viewport
//!
//! Mouse, touch and pointer streams share one shape, tagged with their
//! [`Modality`]. The modality that starts a gesture becomes the session's
//! initiation token; events from any other modality are ignored until the
//! session ends.

use std::collections::HashMap;

use crate::geometry::{ElementId, Point};

/// Input device family that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Touch,
    Mouse,
    Pointer,
}

/// Primary mouse / pen button
pub const PRIMARY_BUTTON: u8 = 0;

/// Element an input event was dispatched to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTarget {
    pub id: Option<ElementId>,
    pub tag_name: String,
    /// Other element properties (`className`, `id`, ...) for exception matching
    pub attributes: HashMap<String, String>,
}

impl EventTarget {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up a property by name; `tagName` maps to [`EventTarget::tag_name`]
    pub fn property(&self, name: &str) -> Option<&str> {
        if name == "tagName" {
            return Some(self.tag_name.as_str());
        }
        self.attributes.get(name).map(String::as_str)
    }
}

/// One sample of a pointer stream
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput {
    pub modality: Modality,
    /// Page coordinates of the (first) contact point
    pub page: Point,
    /// Pressed button for mouse/pointer; ignored for touch
    pub button: u8,
    pub target: EventTarget,
}

impl PointerInput {
    pub fn new(modality: Modality, x: f64, y: f64) -> Self {
        Self {
            modality,
            page: Point::new(x, y),
            button: PRIMARY_BUTTON,
            target: EventTarget::default(),
        }
    }

    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        self
    }

    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// Wheel notification, in wheel "lines" (positive = content moves up/left)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Every notification the viewport reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Start(PointerInput),
    Move(PointerInput),
    End(PointerInput),
    Cancel(PointerInput),
    Wheel(WheelInput),
    Resize,
    OrientationChange,
    /// A CSS transition finished on `target`
    TransitionFinished { target: ElementId },
}

impl InputEvent {
    /// Modality of pointer-stream events
    pub fn modality(&self) -> Option<Modality> {
        match self {
            InputEvent::Start(p)
            | InputEvent::Move(p)
            | InputEvent::End(p)
            | InputEvent::Cancel(p) => Some(p.modality),
            _ => None,
        }
    }
}

/// How the host should treat the event after the viewport saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Suppress the host's native handling (page scroll, text selection, ...)
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: EventOutcome = EventOutcome {
        prevent_default: false,
    };

    pub const PREVENTED: EventOutcome = EventOutcome {
        prevent_default: true,
    };
}

/// Lifecycle notifications emitted by the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    /// A gesture session was opened
    BeforeScrollStart,
    /// The first accepted move of a session
    ScrollStart,
    /// A session ended as a tap without moving
    ScrollCancel,
    /// Position came to rest
    ScrollEnd,
    /// Bounds were recomputed
    Refresh,
    Destroy,
}
