use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let (line, total) = app.line_position();

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {msg}")
        } else {
            let last_event = app
                .last_event
                .map(|event| format!("{event:?}"))
                .unwrap_or_else(|| "-".to_string());
            format!(
                " {} | Line {}/{} | {}% | y {:.0}px | {}",
                app.state_label(),
                line,
                total,
                app.percent(),
                app.viewport.y(),
                last_event
            )
        };

        let help_hint = " q:quit j/k:line PgUp/PgDn:page gg/G:top/bottom e:toggle ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let status_style = if app.viewport.is_enabled() {
            Style::default().fg(GruvboxMaterial::FG0)
        } else {
            Style::default().fg(GruvboxMaterial::ORANGE)
        };

        let line = Line::from(vec![
            Span::styled(status_text, status_style.bg(GruvboxMaterial::BG2)),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
