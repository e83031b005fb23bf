//! History view: past diagnoses, newest first.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{display_name, HistoryEntry};
use crate::tui::styles::ClinicalTheme;

const LINES_PER_ENTRY: usize = 3;

/// History view state
pub struct HistoryState {
    pub entries: Vec<HistoryEntry>,
    /// True while the fetch task is in flight
    pub loading: bool,
    /// First visible entry
    pub offset: usize,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            loading: true,
            offset: 0,
        }
    }
}

impl HistoryState {
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.offset + 1 < self.entries.len() {
            self.offset += 1;
        }
    }
}

/// Render the history view
pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryState, spinner: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Entries
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_history_header(f, chunks[0], state);
    render_history_content(f, chunks[1], state, spinner);
    render_history_footer(f, chunks[2]);
}

fn render_history_header(f: &mut Frame, area: Rect, state: &HistoryState) {
    let count = if state.loading {
        String::new()
    } else {
        format!(" │ {} records", state.entries.len())
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Diagnosis History", ClinicalTheme::title()),
        Span::styled(count, ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_history_content(f: &mut Frame, area: Rect, state: &HistoryState, spinner: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border());

    if state.loading {
        let loading = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{spinner} Loading history..."),
                ClinicalTheme::text_muted(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(loading, area);
        return;
    }

    if state.entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No diagnoses recorded yet",
                ClinicalTheme::text_muted(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Run an analysis from the Diagnostic view to populate this list.",
                ClinicalTheme::text_secondary(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(state.entries.len() * LINES_PER_ENTRY);
    for entry in &state.entries {
        lines.extend(entry_lines(entry));
    }

    let scroll = (state.offset * LINES_PER_ENTRY) as u16;
    let list = Paragraph::new(lines).scroll((scroll, 0)).block(block);
    f.render_widget(list, area);
}

fn entry_lines(entry: &HistoryEntry) -> [Line<'static>; LINES_PER_ENTRY] {
    [
        Line::from(vec![
            Span::styled(" ● ", ClinicalTheme::history_badge(&entry.diagnosis)),
            Span::styled(
                display_name(&entry.diagnosis).to_string(),
                ClinicalTheme::history_badge(&entry.diagnosis),
            ),
            Span::styled(
                format!("  {}", entry.created_at.format("%d %b %Y %H:%M")),
                ClinicalTheme::text_muted(),
            ),
        ]),
        Line::from(vec![
            Span::styled("   Age: ", ClinicalTheme::text_secondary()),
            Span::styled(entry.age.to_string(), ClinicalTheme::text()),
            Span::styled("  Gender: ", ClinicalTheme::text_secondary()),
            Span::styled(entry.gender.label().to_string(), ClinicalTheme::text()),
            Span::styled("  BP: ", ClinicalTheme::text_secondary()),
            Span::styled(optional_vital(entry.blood_pressure), ClinicalTheme::text()),
            Span::styled(" mmHg", ClinicalTheme::text_muted()),
            Span::styled("  Sugar: ", ClinicalTheme::text_secondary()),
            Span::styled(optional_vital(entry.blood_sugar), ClinicalTheme::text()),
            Span::styled(" g/L", ClinicalTheme::text_muted()),
        ]),
        Line::from(""),
    ]
}

fn optional_vital(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn render_history_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[↑↓] ", ClinicalTheme::key_hint()),
        Span::styled("Scroll ", ClinicalTheme::key_desc()),
        Span::styled("[←→] ", ClinicalTheme::key_hint()),
        Span::styled("Switch view ", ClinicalTheme::key_desc()),
        Span::styled("[Q] ", ClinicalTheme::key_hint()),
        Span::styled("Quit", ClinicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}
