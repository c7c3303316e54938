//! Touch/pointer-driven scrolling viewport engine
//!
//! Unifies mouse, touch and pointer input into one gesture model, applies
//! momentum on release and elastic bounce at the edges, and renders through
//! either host-interpolated transitions or a frame-driven tween.
//!
//! # Architecture
//!
//! ## Leaf modules
//! - `geometry` - Geometry probe seam and scroll bounds
//! - `easing` - Named easing curves with CSS equivalents
//! - `timing` - Progress and interpolation helpers
//! - `momentum` - Release velocity to resting point
//!
//! ## Engine
//! - `gesture` - Start/move/end state machine
//! - `render` - Transition vs tween render strategy
//! - `viewport` - Public controller facade
//!
//! # Usage
//!
//! ```ignore
//! use iscroll_core::{headless::HeadlessHost, Size, Viewport, ViewportConfig};
//!
//! let host = HeadlessHost::new(Size::new(320.0, 500.0), Size::new(320.0, 1200.0));
//! let mut viewport = Viewport::new(host, &ViewportConfig::default())?;
//!
//! viewport.scroll_to(0.0, -400.0, 300.0, None)?;
//! viewport.advance(300.0);
//! ```

pub mod config;
pub mod easing;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod headless;
pub mod momentum;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod timing;
pub mod viewport;

pub use config::{AppConfig, EventPassthrough, ResolvedConfig, UiConfig, ViewportConfig};
pub use easing::EasingId;
pub use error::{Error, Result};
pub use event::{
    EventOutcome, EventTarget, InputEvent, Modality, PointerInput, ScrollEvent, WheelInput,
};
pub use geometry::{Bounds, ElementBox, ElementId, GeometryProbe, Point, Size};
pub use momentum::MomentumResult;
pub use render::{parse_translate, HostCapabilities, RenderPolicy, StyleSurface};
pub use scheduler::{Clock, FrameHandle, FrameScheduler, TimerHandle};
pub use state::{DirectionLock, GestureSession, ScrollState};
pub use viewport::{ElementOffset, Host, ScrollTarget, Viewport};
