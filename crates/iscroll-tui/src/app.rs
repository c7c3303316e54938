use crossterm::event::{MouseEvent, MouseEventKind};
use iscroll_core::{
    AppConfig, ElementOffset, InputEvent, Point, ScrollEvent, ScrollTarget, Viewport,
};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::host::TerminalHost;
use crate::input::{mouse_to_input, Action};

/// Duration of keyboard-driven scrolls in milliseconds
const KEY_SCROLL_MS: f64 = 200.0;

/// Application state for the terminal viewer
pub struct App {
    pub viewport: Viewport<TerminalHost>,
    pub title: String,
    /// Pending key for multi-key sequences like "gg"
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    /// Most recent lifecycle notification from the viewport
    pub last_event: Option<ScrollEvent>,
    pub should_quit: bool,
}

impl App {
    pub fn new(text: &str, title: impl Into<String>, config: &AppConfig) -> anyhow::Result<Self> {
        let host = TerminalHost::new(text, &config.ui);

        // Terminals have no native scrolling, so the wheel always drives the viewport
        let mut viewport_config = config.viewport.clone();
        viewport_config.mouse_wheel = true;

        let viewport = Viewport::new(host, &viewport_config)?;

        Ok(Self {
            viewport,
            title: title.into(),
            pending_key: None,
            status_message: None,
            last_event: None,
            should_quit: false,
        })
    }

    pub fn host(&self) -> &TerminalHost {
        self.viewport.host()
    }

    /// Record where the content is drawn this frame
    pub fn set_viewport_area(&mut self, area: Rect) {
        let first = self.host().area().height == 0;
        if !self.viewport.host_mut().set_area(area) {
            return;
        }
        if first {
            self.viewport.refresh();
        } else {
            self.viewport.handle_event(InputEvent::Resize);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let inside = self.host().contains_cell(mouse.column, mouse.row);
        let routed = match mouse.kind {
            // Presses and wheel only count over the content
            MouseEventKind::Down(_)
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => inside,
            // Drags follow the pointer off the viewport unless bound to it
            _ => inside || !self.viewport.binds_to_wrapper(),
        };
        if !routed {
            return;
        }

        if let Some(input) = mouse_to_input(mouse, self.viewport.host()) {
            self.viewport.handle_event(input);
        }
    }

    /// Deliver due timers and frames, then collect lifecycle events
    pub fn pump(&mut self) {
        for handle in self.viewport.host_mut().take_due_timers() {
            self.viewport.on_timer(handle);
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        for event in self.viewport.take_events() {
            debug!(?event, "Viewport event");
            self.last_event = Some(event);
        }
    }

    /// Whether the main loop should poll at the animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.viewport.needs_update() || self.viewport.is_tracking()
    }

    pub fn handle_action(&mut self, action: Action) {
        if action != Action::PendingG {
            self.pending_key = None;
        }

        let page = self.viewport.extents().viewport.height;
        let line = self.host().cell_height();

        match action {
            Action::Quit => self.should_quit = true,
            Action::LineDown => self.scroll_by_px(-line),
            Action::LineUp => self.scroll_by_px(line),
            Action::ScrollHalfPageDown => self.scroll_by_px(-(page / 2.0).round()),
            Action::ScrollHalfPageUp => self.scroll_by_px((page / 2.0).round()),
            Action::ScrollPageDown => self.scroll_by_px(-page),
            Action::ScrollPageUp => self.scroll_by_px(page),
            Action::JumpToTop => {
                let x = self.viewport.x();
                self.scroll_to(Point::new(x, 0.0));
            }
            Action::JumpToBottom => {
                let x = self.viewport.x();
                let bottom = self.viewport.bounds().max_scroll_y;
                self.scroll_to(Point::new(x, bottom));
            }
            Action::PendingG => self.pending_key = Some('g'),
            Action::ToggleEnabled => {
                if self.viewport.is_enabled() {
                    self.viewport.disable();
                    self.status_message = Some("Gestures disabled".to_string());
                } else {
                    self.viewport.enable();
                    self.status_message = None;
                }
            }
            Action::Refresh => self.viewport.refresh(),
            Action::None => {}
        }

        self.drain_events();
    }

    /// Bring a 1-based line to the middle of the viewport
    pub fn jump_to_line(&mut self, line: usize) -> anyhow::Result<()> {
        let selector = format!("#{line}");
        self.viewport.scroll_to_element(
            ScrollTarget::Selector(&selector),
            Some(0.0),
            ElementOffset::None,
            ElementOffset::Center,
            None,
        )?;
        Ok(())
    }

    fn scroll_by_px(&mut self, dy: f64) {
        let position = self.viewport.position();
        let target = self
            .viewport
            .bounds()
            .clamp(Point::new(position.x, position.y + dy));
        if target != position {
            self.scroll_to(target);
        }
    }

    fn scroll_to(&mut self, target: Point) {
        if let Err(e) = self.viewport.scroll_to(target.x, target.y, KEY_SCROLL_MS, None) {
            warn!(error = %e, "Keyboard scroll rejected");
            self.status_message = Some(e.to_string());
        }
    }

    /// First visible line and total line count
    pub fn line_position(&self) -> (usize, usize) {
        let (row, _) = self.host().scroll_cells();
        (row as usize + 1, self.host().lines().len())
    }

    /// Scroll progress through the content, 0..=100
    pub fn percent(&self) -> u16 {
        let max = self.viewport.bounds().max_scroll_y;
        if max >= 0.0 {
            return 100;
        }
        ((self.viewport.y() / max).clamp(0.0, 1.0) * 100.0).round() as u16
    }

    pub fn state_label(&self) -> &'static str {
        let state = self.viewport.state();
        if !self.viewport.is_enabled() {
            "DISABLED"
        } else if self.viewport.is_tracking() {
            "DRAG"
        } else if state.is_settling() {
            "SETTLE"
        } else {
            "IDLE"
        }
    }
}
