use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::easing::EasingId;
use crate::event::EventTarget;
use crate::momentum::DEFAULT_DECELERATION;
use crate::render::HostCapabilities;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Options recognized by the viewport controller
///
/// Every field has a default, so a config file only needs the overrides.
/// Keys that are not recognized are kept in `unknown` and have no effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Let the host interpolate settles with CSS transitions
    #[serde(default = "default_true")]
    pub use_transition: bool,
    /// Position content with a transform instead of left/top
    #[serde(default = "default_true")]
    pub use_transform: bool,
    /// Append `translateZ(0)` to transforms when the host supports it
    #[serde(default = "default_true")]
    pub hw_compositing: bool,
    #[serde(default)]
    pub scroll_x: bool,
    #[serde(default = "default_true")]
    pub scroll_y: bool,
    /// Move on both axes at once instead of locking to one
    #[serde(default)]
    pub free_scroll: bool,
    #[serde(default)]
    pub start_x: f64,
    #[serde(default)]
    pub start_y: f64,
    /// Rubber-band past the edges and snap back on release
    #[serde(default = "default_true")]
    pub bounce: bool,
    /// Snap-back duration in milliseconds
    #[serde(default = "default_bounce_time")]
    pub bounce_time: u64,
    /// Easing name for snap-back: quadratic, circular, back, bounce, elastic
    #[serde(default = "default_bounce_easing")]
    pub bounce_easing: String,
    #[serde(default = "default_true")]
    pub momentum: bool,
    /// Momentum deceleration in px/ms²
    #[serde(default = "default_deceleration")]
    pub deceleration: f64,
    /// Pixels one axis must lead the other by to lock onto it
    #[serde(default = "default_direction_lock_threshold")]
    pub direction_lock_threshold: f64,
    #[serde(default)]
    pub event_passthrough: EventPassthrough,
    #[serde(default = "default_true")]
    pub prevent_default: bool,
    /// Target property name -> regex; matching targets keep native behavior
    #[serde(default = "default_prevent_default_exception")]
    pub prevent_default_exception: BTreeMap<String, String>,
    /// Unset means "decide from host capabilities"
    #[serde(default)]
    pub disable_mouse: Option<bool>,
    #[serde(default)]
    pub disable_touch: Option<bool>,
    #[serde(default)]
    pub disable_pointer: Option<bool>,
    /// Listen for move/end on the viewport rather than the whole window
    #[serde(default)]
    pub bind_to_wrapper: bool,
    /// Resize debounce interval in milliseconds
    #[serde(default = "default_resize_polling")]
    pub resize_polling: u64,
    #[serde(default)]
    pub mouse_wheel: bool,
    /// Pixels scrolled per wheel line
    #[serde(default = "default_mouse_wheel_speed")]
    pub mouse_wheel_speed: f64,
    #[serde(default)]
    pub invert_wheel_direction: bool,
    /// Unrecognized keys, accepted and ignored
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            use_transition: default_true(),
            use_transform: default_true(),
            hw_compositing: default_true(),
            scroll_x: false,
            scroll_y: default_true(),
            free_scroll: false,
            start_x: 0.0,
            start_y: 0.0,
            bounce: default_true(),
            bounce_time: default_bounce_time(),
            bounce_easing: default_bounce_easing(),
            momentum: default_true(),
            deceleration: default_deceleration(),
            direction_lock_threshold: default_direction_lock_threshold(),
            event_passthrough: EventPassthrough::default(),
            prevent_default: default_true(),
            prevent_default_exception: default_prevent_default_exception(),
            disable_mouse: None,
            disable_touch: None,
            disable_pointer: None,
            bind_to_wrapper: false,
            resize_polling: default_resize_polling(),
            mouse_wheel: false,
            mouse_wheel_speed: default_mouse_wheel_speed(),
            invert_wheel_direction: false,
            unknown: BTreeMap::new(),
        }
    }
}

/// Axis on which gestures are left to the host's native handling
///
/// In a config file this is `"vertical"`, `"horizontal"`, `"none"`, or a
/// boolean where `true` means vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPassthrough {
    #[default]
    None,
    Vertical,
    Horizontal,
}

// Accept either a boolean or an axis name
impl<'de> Deserialize<'de> for EventPassthrough {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PassthroughVisitor;

        impl<'de> Visitor<'de> for PassthroughVisitor {
            type Value = EventPassthrough;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a boolean or one of \"vertical\", \"horizontal\", \"none\"")
            }

            fn visit_bool<E>(self, value: bool) -> Result<EventPassthrough, E>
            where
                E: de::Error,
            {
                Ok(if value {
                    EventPassthrough::Vertical
                } else {
                    EventPassthrough::None
                })
            }

            fn visit_str<E>(self, value: &str) -> Result<EventPassthrough, E>
            where
                E: de::Error,
            {
                match value.to_ascii_lowercase().as_str() {
                    "vertical" => Ok(EventPassthrough::Vertical),
                    "horizontal" => Ok(EventPassthrough::Horizontal),
                    "none" | "" => Ok(EventPassthrough::None),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(PassthroughVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while a settle animation runs
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Pixels per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    /// Pixels per terminal row
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bounce_time() -> u64 {
    600
}

fn default_bounce_easing() -> String {
    EasingId::Circular.name().to_string()
}

fn default_deceleration() -> f64 {
    DEFAULT_DECELERATION
}

fn default_direction_lock_threshold() -> f64 {
    5.0
}

fn default_prevent_default_exception() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "tagName".to_string(),
        "^(INPUT|TEXTAREA|BUTTON|SELECT)$".to_string(),
    )])
}

fn default_resize_polling() -> u64 {
    60
}

fn default_mouse_wheel_speed() -> f64 {
    20.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_width() -> f64 {
    8.0
}

fn default_cell_height() -> f64 {
    16.0
}

/// Compiled `prevent_default_exception` table
#[derive(Debug, Clone, Default)]
pub struct ExceptionMatcher {
    rules: Vec<(String, Regex)>,
}

impl ExceptionMatcher {
    pub fn compile(table: &BTreeMap<String, String>) -> crate::Result<Self> {
        let rules = table
            .iter()
            .map(|(property, pattern)| Ok((property.clone(), Regex::new(pattern)?)))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Whether the target is exempt from `preventDefault`
    pub fn matches(&self, target: &EventTarget) -> bool {
        self.rules.iter().any(|(property, re)| {
            target
                .property(property)
                .map(|value| re.is_match(value))
                .unwrap_or(false)
        })
    }
}

/// Effective options after host capabilities and implied settings are applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub use_transition: bool,
    pub use_transform: bool,
    /// Suffix appended to every transform value
    pub translate_z: &'static str,
    pub scroll_x: bool,
    pub scroll_y: bool,
    pub free_scroll: bool,
    pub start_x: f64,
    pub start_y: f64,
    pub bounce: bool,
    pub bounce_time: f64,
    pub bounce_easing: EasingId,
    pub momentum: bool,
    pub deceleration: f64,
    pub direction_lock_threshold: f64,
    pub event_passthrough: EventPassthrough,
    pub prevent_default: bool,
    pub prevent_default_exception: ExceptionMatcher,
    pub disable_mouse: bool,
    pub disable_touch: bool,
    pub disable_pointer: bool,
    pub bind_to_wrapper: bool,
    pub resize_polling: u64,
    pub mouse_wheel: bool,
    pub mouse_wheel_speed: f64,
    pub invert_wheel_direction: bool,
}

impl ViewportConfig {
    /// Parse overrides from TOML, keeping defaults for everything else
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Compute the effective option set for a host
    pub fn resolve(&self, caps: &HostCapabilities) -> crate::Result<ResolvedConfig> {
        if !self.unknown.is_empty() {
            let keys: Vec<&str> = self.unknown.keys().map(String::as_str).collect();
            tracing::warn!(?keys, "Ignoring unrecognized viewport options");
        }

        let passthrough = self.event_passthrough;
        let has_passthrough = passthrough != EventPassthrough::None;

        let deceleration = if self.deceleration > 0.0 && self.deceleration.is_finite() {
            self.deceleration
        } else {
            tracing::warn!(
                deceleration = self.deceleration,
                "Deceleration must be positive, using default"
            );
            DEFAULT_DECELERATION
        };

        let disable_pointer = self.disable_pointer.unwrap_or(!caps.has_pointer);
        let disable_touch = self
            .disable_touch
            .unwrap_or(caps.has_pointer || !caps.has_touch);
        let disable_mouse = self
            .disable_mouse
            .unwrap_or(caps.has_pointer || caps.has_touch);

        Ok(ResolvedConfig {
            use_transition: self.use_transition && caps.supports_transition(),
            use_transform: self.use_transform && caps.transform.is_some(),
            translate_z: if self.hw_compositing && caps.has_perspective {
                " translateZ(0)"
            } else {
                ""
            },
            scroll_x: self.scroll_x && passthrough != EventPassthrough::Horizontal,
            scroll_y: self.scroll_y && passthrough != EventPassthrough::Vertical,
            free_scroll: self.free_scroll && !has_passthrough,
            start_x: self.start_x,
            start_y: self.start_y,
            bounce: self.bounce,
            bounce_time: self.bounce_time as f64,
            bounce_easing: EasingId::from_name_or_default(&self.bounce_easing),
            momentum: self.momentum,
            deceleration,
            direction_lock_threshold: if has_passthrough {
                0.0
            } else {
                self.direction_lock_threshold.max(0.0)
            },
            event_passthrough: passthrough,
            prevent_default: self.prevent_default && !has_passthrough,
            prevent_default_exception: ExceptionMatcher::compile(&self.prevent_default_exception)?,
            disable_mouse,
            disable_touch,
            disable_pointer,
            bind_to_wrapper: self.bind_to_wrapper,
            resize_polling: self.resize_polling,
            mouse_wheel: self.mouse_wheel,
            mouse_wheel_speed: self.mouse_wheel_speed,
            invert_wheel_direction: self.invert_wheel_direction,
        })
    }
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file or return defaults if absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/iscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("iscroll")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser_caps() -> HostCapabilities {
        HostCapabilities::browser()
    }

    #[test]
    fn test_default_config() {
        let config = ViewportConfig::default();
        assert!(config.use_transition);
        assert!(config.scroll_y);
        assert!(!config.scroll_x);
        assert_eq!(config.bounce_time, 600);
        assert_eq!(config.direction_lock_threshold, 5.0);
        assert_eq!(config.resize_polling, 60);
        assert_eq!(config.deceleration, 0.0006);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ViewportConfig::from_toml_str(
            r#"
            scroll_x = true
            bounce_time = 300
            "#,
        )
        .unwrap();
        assert!(config.scroll_x);
        assert!(config.scroll_y);
        assert_eq!(config.bounce_time, 300);
        assert!(config.unknown.is_empty());
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let config = ViewportConfig::from_toml_str("snap = true\nzoom = 2").unwrap();
        assert_eq!(config.unknown.len(), 2);
        assert!(config.resolve(&browser_caps()).is_ok());
    }

    #[test]
    fn test_event_passthrough_forms() {
        let config = ViewportConfig::from_toml_str("event_passthrough = true").unwrap();
        assert_eq!(config.event_passthrough, EventPassthrough::Vertical);

        let config = ViewportConfig::from_toml_str("event_passthrough = \"horizontal\"").unwrap();
        assert_eq!(config.event_passthrough, EventPassthrough::Horizontal);

        assert!(ViewportConfig::from_toml_str("event_passthrough = \"diagonal\"").is_err());
    }

    #[test]
    fn test_passthrough_implications() {
        let config = ViewportConfig {
            scroll_x: true,
            free_scroll: true,
            event_passthrough: EventPassthrough::Vertical,
            ..Default::default()
        };
        let resolved = config.resolve(&browser_caps()).unwrap();
        assert!(!resolved.scroll_y);
        assert!(resolved.scroll_x);
        assert!(!resolved.free_scroll);
        assert!(!resolved.prevent_default);
        assert_eq!(resolved.direction_lock_threshold, 0.0);
    }

    #[test]
    fn test_unknown_bounce_easing_falls_back() {
        let config = ViewportConfig {
            bounce_easing: "wobbly".to_string(),
            ..Default::default()
        };
        let resolved = config.resolve(&browser_caps()).unwrap();
        assert_eq!(resolved.bounce_easing, EasingId::Circular);
    }

    #[test]
    fn test_capabilities_gate_render_paths() {
        let resolved = ViewportConfig::default()
            .resolve(&HostCapabilities::default())
            .unwrap();
        assert!(!resolved.use_transition);
        assert!(!resolved.use_transform);
        assert_eq!(resolved.translate_z, "");

        let resolved = ViewportConfig::default().resolve(&browser_caps()).unwrap();
        assert!(resolved.use_transition);
        assert!(resolved.use_transform);
        assert_eq!(resolved.translate_z, " translateZ(0)");
    }

    #[test]
    fn test_modality_defaults_follow_capabilities() {
        let caps = HostCapabilities {
            has_pointer: true,
            ..browser_caps()
        };
        let resolved = ViewportConfig::default().resolve(&caps).unwrap();
        assert!(!resolved.disable_pointer);
        assert!(resolved.disable_touch);
        assert!(resolved.disable_mouse);

        let resolved = ViewportConfig::default()
            .resolve(&HostCapabilities::default())
            .unwrap();
        assert!(resolved.disable_pointer);
        assert!(resolved.disable_touch);
        assert!(!resolved.disable_mouse);
    }

    #[test]
    fn test_invalid_exception_pattern() {
        let mut config = ViewportConfig::default();
        config
            .prevent_default_exception
            .insert("className".to_string(), "(unclosed".to_string());
        assert!(matches!(
            config.resolve(&browser_caps()),
            Err(crate::Error::Pattern(_))
        ));
    }

    #[test]
    fn test_exception_matcher() {
        let matcher = ExceptionMatcher::compile(&default_prevent_default_exception()).unwrap();
        assert!(matcher.matches(&EventTarget::new("INPUT")));
        assert!(matcher.matches(&EventTarget::new("SELECT")));
        assert!(!matcher.matches(&EventTarget::new("DIV")));
    }

    #[test]
    fn test_app_config_missing_file_gives_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/iscroll/config.toml")).unwrap();
        assert_eq!(config.ui.animation_fps, 60);
        assert!(config.viewport.bounce);
    }

    #[test]
    fn test_app_config_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [viewport]
            mouse_wheel = true
            bounce_easing = "elastic"

            [ui]
            cell_height = 20.0
            "#,
        )
        .unwrap();
        assert!(config.viewport.mouse_wheel);
        assert_eq!(config.ui.cell_height, 20.0);
        assert_eq!(config.ui.cell_width, 8.0);
    }
}
