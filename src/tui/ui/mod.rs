//! UI module: View components for the TUI.

pub mod form;
pub mod history;
pub mod results;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicalTheme;

/// Centered sub-rectangle, sized as a percentage of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Blocking error popup. Swallows every key except Enter.
pub fn render_alert(f: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" Error ", ClinicalTheme::danger()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::danger());

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), ClinicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Dismiss", ClinicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);

    f.render_widget(content, popup);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Results are indicative and do not replace professional medical evaluation.",
        ClinicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
