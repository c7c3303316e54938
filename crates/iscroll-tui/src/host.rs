//! Terminal host for the viewport engine
//!
//! Maps the engine's pixel space onto terminal cells: one column is
//! `cell_width` px and one row is `cell_height` px. The terminal has no
//! transitions, so capabilities only expose a transform property and the
//! engine settles with frame-driven tweens. Frames come from the default
//! fixed-interval timer of [`FrameScheduler`].

use std::time::{Duration, Instant};

use iscroll_core::{
    parse_translate, Clock, ElementBox, ElementId, FrameScheduler, GeometryProbe,
    HostCapabilities, Point, Size, StyleSurface, TimerHandle, UiConfig,
};
use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

const VIEWPORT_ID: ElementId = ElementId(1);
const CONTENT_ID: ElementId = ElementId(2);
const TRANSFORM: &str = "transform";

pub struct TerminalHost {
    origin: Instant,
    lines: Vec<String>,
    area: Rect,
    cell_width: f64,
    cell_height: f64,
    offset: Point,
    next_handle: u64,
    timers: Vec<(TimerHandle, Instant)>,
}

impl TerminalHost {
    pub fn new(text: &str, ui: &UiConfig) -> Self {
        Self {
            origin: Instant::now(),
            lines: text.lines().map(|line| line.replace('\t', "    ")).collect(),
            area: Rect::default(),
            cell_width: ui.cell_width.max(1.0),
            cell_height: ui.cell_height.max(1.0),
            offset: Point::ZERO,
            next_handle: 1,
            timers: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Whether a terminal cell lies inside the viewport area
    pub fn contains_cell(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }

    /// Update the on-screen viewport; returns whether it changed size
    pub fn set_area(&mut self, area: Rect) -> bool {
        let resized = area.width != self.area.width || area.height != self.area.height;
        self.area = area;
        resized
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Terminal cell to page coordinates
    pub fn to_page(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as f64 * self.cell_width,
            row as f64 * self.cell_height,
        )
    }

    /// Last committed translation in pixels
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// `(row, column)` scroll offset for `Paragraph::scroll`
    pub fn scroll_cells(&self) -> (u16, u16) {
        let row = (-self.offset.y / self.cell_height).round().max(0.0);
        let column = (-self.offset.x / self.cell_width).round().max(0.0);
        (row.min(u16::MAX as f64) as u16, column.min(u16::MAX as f64) as u16)
    }

    /// Rows the content overflows past the viewport top (negative while
    /// bouncing past the top edge)
    pub fn overscroll_rows(&self) -> i32 {
        (self.offset.y / self.cell_height).round() as i32
    }

    /// Remove and return every timer that is due
    pub fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        self.take_timers_due_at(Instant::now())
    }

    fn take_timers_due_at(&mut self, now: Instant) -> Vec<TimerHandle> {
        let mut due = Vec::new();
        self.timers.retain(|(handle, deadline)| {
            if *deadline <= now {
                due.push(*handle);
                false
            } else {
                true
            }
        });
        due
    }

    fn content_columns(&self) -> usize {
        self.lines
            .iter()
            .map(|line| UnicodeWidthStr::width(line.as_str()))
            .max()
            .unwrap_or(0)
    }

    /// `#<n>` addresses the 1-based line `n`
    fn line_box(&self, selector: &str) -> Option<ElementBox> {
        let line: usize = selector.strip_prefix('#')?.parse().ok()?;
        if line == 0 || line > self.lines.len() {
            return None;
        }
        let page = self.to_page(self.area.x, self.area.y);
        Some(ElementBox {
            offset: Point::new(page.x, page.y + (line - 1) as f64 * self.cell_height),
            size: Size::new(
                UnicodeWidthStr::width(self.lines[line - 1].as_str()) as f64 * self.cell_width,
                self.cell_height,
            ),
        })
    }
}

impl GeometryProbe for TerminalHost {
    fn resolve_viewport(&self) -> Option<ElementId> {
        Some(VIEWPORT_ID)
    }

    fn resolve_content(&self) -> Option<ElementId> {
        Some(CONTENT_ID)
    }

    fn viewport_size(&self) -> Size {
        Size::new(
            self.area.width as f64 * self.cell_width,
            self.area.height as f64 * self.cell_height,
        )
    }

    fn content_size(&self) -> Size {
        Size::new(
            self.content_columns() as f64 * self.cell_width,
            self.lines.len() as f64 * self.cell_height,
        )
    }

    fn viewport_offset(&self) -> Point {
        self.to_page(self.area.x, self.area.y)
    }

    fn query(&self, selector: &str) -> Option<ElementBox> {
        self.line_box(selector)
    }

    fn rendered_position(&self) -> Option<Point> {
        None
    }
}

impl StyleSurface for TerminalHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            transform: Some(TRANSFORM.to_string()),
            ..Default::default()
        }
    }

    fn write_style(&mut self, property: &str, value: &str) {
        if property != TRANSFORM {
            return;
        }
        if let Some(offset) = parse_translate(value) {
            self.offset = offset;
        }
    }
}

impl FrameScheduler for TerminalHost {
    fn set_timeout(&mut self, delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers
            .push((handle, Instant::now() + Duration::from_millis(delay_ms)));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }
}

impl Clock for TerminalHost {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
