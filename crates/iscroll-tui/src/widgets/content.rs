use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct ContentWidget;

impl ContentWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let border_style = if app.viewport.is_tracking() {
            Style::default().fg(GruvboxMaterial::ACCENT)
        } else {
            Style::default().fg(GruvboxMaterial::GREY0)
        };

        let block = Block::default()
            .title(format!(" {} ", app.title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(GruvboxMaterial::BG0));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        // The viewport is measured from what is actually drawn
        app.set_viewport_area(inner_area);

        let host = app.host();
        let (row, column) = host.scroll_cells();

        // Pulled past the top edge: leave the gap empty like a rubber band
        let gap = host.overscroll_rows().clamp(0, inner_area.height as i32) as u16;
        let content_area = Rect {
            y: inner_area.y + gap,
            height: inner_area.height - gap,
            ..inner_area
        };

        let lines: Vec<Line> = host
            .lines()
            .iter()
            .skip(row as usize)
            .take(content_area.height as usize)
            .map(|line| Line::raw(line.as_str()))
            .collect();

        let paragraph = Paragraph::new(Text::from(lines))
            .style(Style::default().fg(GruvboxMaterial::FG0))
            .scroll((0, column));

        frame.render_widget(paragraph, content_area);
    }
}
