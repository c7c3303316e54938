//! Render strategy: how a committed position reaches the host
//!
//! Two policies, picked once from configuration and host capabilities:
//!
//! - [`RenderPolicy::Transition`]: write a transition duration and timing
//!   function, then the target transform; the host interpolates and reports
//!   back with a transition-finished notification.
//! - [`RenderPolicy::Tween`]: the viewport samples a [`Tween`] every frame
//!   and commits each intermediate position itself.
//!
//! Either way [`Renderer::translate`] is the only path that changes
//! [`ScrollState`]'s position.

use crate::config::ResolvedConfig;
use crate::easing::EasingId;
use crate::geometry::Point;
use crate::state::ScrollState;
use crate::timing::{is_complete, lerp_point, progress};

/// Style capabilities of the host, resolved once at construction
///
/// Property names are already vendor-resolved (`transform` vs
/// `webkitTransform`). A missing property means the feature is unavailable
/// and the renderer falls back to plain `left`/`top` writes or tweens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostCapabilities {
    pub transform: Option<String>,
    pub transition_duration: Option<String>,
    pub transition_timing_function: Option<String>,
    pub has_perspective: bool,
    pub has_pointer: bool,
    pub has_touch: bool,
}

impl HostCapabilities {
    /// Unprefixed CSS transforms and transitions
    pub fn browser() -> Self {
        Self::with_vendor("")
    }

    /// Transforms and transitions under a vendor prefix (`webkit`, `Moz`, ...)
    pub fn with_vendor(vendor: &str) -> Self {
        Self {
            transform: Some(prefixed(vendor, "transform")),
            transition_duration: Some(prefixed(vendor, "transitionDuration")),
            transition_timing_function: Some(prefixed(vendor, "transitionTimingFunction")),
            has_perspective: true,
            has_pointer: false,
            has_touch: false,
        }
    }

    pub fn supports_transition(&self) -> bool {
        self.transition_duration.is_some() && self.transition_timing_function.is_some()
    }
}

/// `prefixed("webkit", "transform")` is `webkitTransform`
fn prefixed(vendor: &str, property: &str) -> String {
    if vendor.is_empty() {
        return property.to_string();
    }
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("{vendor}{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => vendor.to_string(),
    }
}

/// Style output surface of the content element
pub trait StyleSurface {
    fn capabilities(&self) -> HostCapabilities;

    /// Set one inline style property on the content element
    fn write_style(&mut self, property: &str, value: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPolicy {
    Transition,
    Tween,
}

/// Resolved property table plus the active policy
#[derive(Debug, Clone)]
pub struct Renderer {
    policy: RenderPolicy,
    transform_property: Option<String>,
    duration_property: Option<String>,
    timing_property: Option<String>,
    translate_z: &'static str,
}

impl Renderer {
    pub fn new(config: &ResolvedConfig, caps: &HostCapabilities) -> Self {
        let policy = if config.use_transition {
            RenderPolicy::Transition
        } else {
            RenderPolicy::Tween
        };

        Self {
            policy,
            transform_property: if config.use_transform {
                caps.transform.clone()
            } else {
                None
            },
            duration_property: caps.transition_duration.clone(),
            timing_property: caps.transition_timing_function.clone(),
            translate_z: config.translate_z,
        }
    }

    #[inline]
    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Whether a settle with this easing can be handed to the host
    pub fn can_transition(&self, easing: EasingId) -> bool {
        self.policy == RenderPolicy::Transition && easing.css().is_some()
    }

    /// Commit a position: write it to the host and record it in the state
    pub fn translate<S: StyleSurface + ?Sized>(
        &self,
        surface: &mut S,
        state: &mut ScrollState,
        to: Point,
    ) {
        match &self.transform_property {
            Some(property) => {
                let value = format!("translate({}px,{}px){}", to.x, to.y, self.translate_z);
                surface.write_style(property, &value);
                state.commit(to);
            }
            None => {
                let to = to.round();
                surface.write_style("left", &format!("{}px", to.x));
                surface.write_style("top", &format!("{}px", to.y));
                state.commit(to);
            }
        }
    }

    /// Set the transition duration; a no-op under the tween policy
    pub fn set_transition_time<S: StyleSurface + ?Sized>(&self, surface: &mut S, duration_ms: f64) {
        if self.policy != RenderPolicy::Transition {
            return;
        }
        if let Some(property) = &self.duration_property {
            surface.write_style(property, &format!("{}ms", duration_ms.max(0.0)));
        }
    }

    pub fn set_timing_function<S: StyleSurface + ?Sized>(&self, surface: &mut S, easing: EasingId) {
        if self.policy != RenderPolicy::Transition {
            return;
        }
        if let (Some(property), Some(css)) = (&self.timing_property, easing.css()) {
            surface.write_style(property, css);
        }
    }
}

/// Read back a value written by [`Renderer::translate`]
///
/// Accepts `translate(Xpx,Ypx)` with an optional trailing suffix such as
/// ` translateZ(0)`.
pub fn parse_translate(value: &str) -> Option<Point> {
    let inner = value.strip_prefix("translate(")?;
    let inner = &inner[..inner.find(')')?];
    let (x, y) = inner.split_once(',')?;
    let x = x.trim().strip_suffix("px")?.parse().ok()?;
    let y = y.trim().strip_suffix("px")?.parse().ok()?;
    Some(Point::new(x, y))
}

/// One sample of a running tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep {
    Running(Point),
    /// Exact destination; the tween is over
    Finished(Point),
}

/// Frame-driven interpolation from one position to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Point,
    pub to: Point,
    pub start_time: f64,
    pub duration: f64,
    pub easing: EasingId,
}

impl Tween {
    pub fn new(from: Point, to: Point, start_time: f64, duration: f64, easing: EasingId) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
            easing,
        }
    }

    /// Position at `now`, a pure function of elapsed time
    pub fn sample(&self, now: f64) -> TweenStep {
        if is_complete(self.start_time, now, self.duration) {
            return TweenStep::Finished(self.to);
        }
        let eased = self.easing.apply(progress(self.start_time, now, self.duration));
        TweenStep::Running(lerp_point(self.from, self.to, eased))
    }
}
