//! Results overlay: diagnosis outcome with per-class probabilities.

use std::path::PathBuf;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::domain::{display_icon, display_name, DiagnosisOutcome};
use crate::tui::styles::ClinicalTheme;
use crate::tui::ui::centered_rect;

/// Prescription download lifecycle, shown in the overlay footer.
#[derive(Debug, Clone, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Saving,
    Saved(PathBuf),
}

/// Render the results overlay on top of the current view.
pub fn render_results(
    f: &mut Frame,
    area: Rect,
    outcome: &DiagnosisOutcome,
    download: &DownloadState,
    spinner: &str,
) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" Analysis Result ", ClinicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border_focused());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Identity
            Constraint::Min(0),    // Probabilities
            Constraint::Length(1), // Download status
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(inner);

    render_identity(f, chunks[0], outcome);
    render_probabilities(f, chunks[1], outcome);
    render_download_status(f, chunks[2], download, spinner);
    render_results_footer(f, chunks[3]);
}

fn render_identity(f: &mut Frame, area: Rect, outcome: &DiagnosisOutcome) {
    let code = outcome.result.diagnosis.as_str();
    let patient = if outcome.patient_name.is_empty() {
        "-"
    } else {
        outcome.patient_name.as_str()
    };

    let identity = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(format!("{} ", display_icon(code))),
            Span::styled(display_name(code), ClinicalTheme::diagnosis_badge(code)),
        ]),
        Line::from(vec![
            Span::styled("Patient: ", ClinicalTheme::text_secondary()),
            Span::styled(patient.to_string(), ClinicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Recorded: ", ClinicalTheme::text_secondary()),
            Span::styled(
                outcome.result.created_at.format("%d %b %Y %H:%M").to_string(),
                ClinicalTheme::text(),
            ),
        ]),
    ])
    .alignment(Alignment::Center);

    f.render_widget(identity, area);
}

fn render_probabilities(f: &mut Frame, area: Rect, outcome: &DiagnosisOutcome) {
    let block = Block::default()
        .title(Span::styled(" Probabilities ", ClinicalTheme::text_secondary()))
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = outcome
        .result
        .probabilities
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, (code, probability)) in outcome.result.probabilities.iter().enumerate() {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" {} ", display_name(code)),
                        ClinicalTheme::text_secondary(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(ClinicalTheme::border()),
            )
            .gauge_style(ClinicalTheme::probability(*probability))
            .percent((probability * 100.0).clamp(0.0, 100.0) as u16)
            .label(format!("{:.0}%", probability * 100.0));

        f.render_widget(gauge, chunks[i]);
    }
}

fn render_download_status(f: &mut Frame, area: Rect, download: &DownloadState, spinner: &str) {
    let line = match download {
        DownloadState::Idle => Line::from(""),
        DownloadState::Saving => Line::from(vec![Span::styled(
            format!("{spinner} Downloading prescription..."),
            ClinicalTheme::info(),
        )]),
        DownloadState::Saved(path) => Line::from(vec![
            Span::styled("Saved: ", ClinicalTheme::success()),
            Span::styled(path.display().to_string(), ClinicalTheme::text()),
        ]),
    };

    let status = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(status, area);
}

fn render_results_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[D] ", ClinicalTheme::key_hint()),
        Span::styled("Download prescription ", ClinicalTheme::key_desc()),
        Span::styled("[N] ", ClinicalTheme::key_hint()),
        Span::styled("New diagnosis ", ClinicalTheme::key_desc()),
        Span::styled("[Esc] ", ClinicalTheme::key_hint()),
        Span::styled("Close", ClinicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}
