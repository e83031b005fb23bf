//! Diagnostic intake form: patient identity, blood panel, risk factors.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Gender, PredictRequest};
use crate::tui::styles::ClinicalTheme;

/// Stable indices into [`DiagnosticFormState::fields`].
pub mod field {
    pub const NAME: usize = 0;
    pub const AGE: usize = 1;
    pub const GENDER: usize = 2;
    pub const GLUCOSE: usize = 3;
    pub const CHOLESTEROL: usize = 4;
    pub const TRIGLYCERIDES: usize = 5;
    pub const CREATININE: usize = 6;
    pub const UREA: usize = 7;
    pub const URIC_ACID: usize = 8;
    pub const GOT: usize = 9;
    pub const GPT: usize = 10;
    pub const BILIRUBIN: usize = 11;
    pub const SMOKING: usize = 12;
    pub const OBESITY: usize = 13;
    pub const FAMILY_HISTORY: usize = 14;
}

/// What a field accepts from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (patient name)
    Text,
    /// Digits only
    Integer,
    /// Digits, dot and minus
    Decimal,
    /// M/F select, Space switches
    Gender,
    /// Boolean flag, Space toggles
    Toggle,
}

/// Current content of a field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Gender(Gender),
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str, hint: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            hint,
            kind,
            value: FieldValue::Text(String::new()),
        }
    }

    fn toggle(label: &'static str) -> Self {
        Self {
            label,
            hint: "Space to toggle",
            kind: FieldKind::Toggle,
            value: FieldValue::Flag(false),
        }
    }
}

/// Diagnostic form state
pub struct DiagnosticFormState {
    pub fields: Vec<FormField>,
    pub selected: usize,
    /// True between submit and the terminal predict message
    pub submitting: bool,
}

impl Default for DiagnosticFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::text("Patient Name", "full name", FieldKind::Text),
                FormField::text("Age", "years, 1-120", FieldKind::Integer),
                FormField {
                    label: "Gender",
                    hint: "Space to switch",
                    kind: FieldKind::Gender,
                    value: FieldValue::Gender(Gender::default()),
                },
                FormField::text("Glucose", "mmol/L, e.g. 5.0", FieldKind::Decimal),
                FormField::text("Cholesterol", "mmol/L, e.g. 4.5", FieldKind::Decimal),
                FormField::text("Triglycerides", "mmol/L, e.g. 1.2", FieldKind::Decimal),
                FormField::text("Creatinine", "µmol/L, e.g. 80", FieldKind::Decimal),
                FormField::text("Urea", "mmol/L, e.g. 5.0", FieldKind::Decimal),
                FormField::text("Uric Acid", "µmol/L, e.g. 300", FieldKind::Decimal),
                FormField::text("GOT (AST)", "U/L, e.g. 25", FieldKind::Decimal),
                FormField::text("GPT (ALT)", "U/L, e.g. 25", FieldKind::Decimal),
                FormField::text("Bilirubin", "µmol/L, e.g. 10", FieldKind::Decimal),
                FormField::toggle("Smoker"),
                FormField::toggle("Obesity"),
                FormField::toggle("Family History"),
            ],
            selected: 0,
            submitting: false,
        }
    }
}

impl DiagnosticFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = self.fields.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Feed a typed character to the selected field. Each kind filters its
    /// own input; Space doubles as the switch for selects and toggles.
    pub fn input_char(&mut self, c: char) {
        let kind = self.fields[self.selected].kind;
        match (kind, &mut self.fields[self.selected].value) {
            (FieldKind::Text, FieldValue::Text(buffer)) => {
                if !c.is_control() {
                    buffer.push(c);
                }
            }
            (FieldKind::Integer, FieldValue::Text(buffer)) => {
                if c.is_ascii_digit() {
                    buffer.push(c);
                }
            }
            (FieldKind::Decimal, FieldValue::Text(buffer)) => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    buffer.push(c);
                }
            }
            (FieldKind::Gender, FieldValue::Gender(gender)) => {
                if c == ' ' {
                    *gender = gender.toggled();
                }
            }
            (FieldKind::Toggle, FieldValue::Flag(flag)) => {
                if c == ' ' {
                    *flag = !*flag;
                }
            }
            _ => {}
        }
    }

    /// Delete the last character of the selected field
    pub fn delete_char(&mut self) {
        if let FieldValue::Text(buffer) = &mut self.fields[self.selected].value {
            buffer.pop();
        }
    }

    /// Clear the selected field
    pub fn clear_field(&mut self) {
        match &mut self.fields[self.selected].value {
            FieldValue::Text(buffer) => buffer.clear(),
            FieldValue::Flag(flag) => *flag = false,
            FieldValue::Gender(gender) => *gender = Gender::default(),
        }
    }

    /// Wipe all buffers from memory and restore the initial state.
    pub fn reset(&mut self) {
        for form_field in &mut self.fields {
            match &mut form_field.value {
                FieldValue::Text(buffer) => buffer.zeroize(),
                FieldValue::Flag(flag) => *flag = false,
                FieldValue::Gender(gender) => *gender = Gender::default(),
            }
        }
        self.selected = 0;
        self.submitting = false;
    }

    /// Coerce the buffers into a request body plus the display-only patient
    /// name. Buffers that fail to parse become `None` and go out as `null`;
    /// the service is the sole validator.
    #[must_use]
    pub fn to_request(&self) -> (String, PredictRequest) {
        let request = PredictRequest {
            age: self.parse_u32(field::AGE),
            gender: self.gender(field::GENDER),
            glucose: self.parse_f64(field::GLUCOSE),
            cholesterol: self.parse_f64(field::CHOLESTEROL),
            triglycerides: self.parse_f64(field::TRIGLYCERIDES),
            creatinine: self.parse_f64(field::CREATININE),
            urea: self.parse_f64(field::UREA),
            uric_acid: self.parse_f64(field::URIC_ACID),
            got: self.parse_f64(field::GOT),
            gpt: self.parse_f64(field::GPT),
            bilirubin: self.parse_f64(field::BILIRUBIN),
            smoking: self.flag(field::SMOKING),
            obesity: self.flag(field::OBESITY),
            family_history: self.flag(field::FAMILY_HISTORY),
        };

        (self.buffer(field::NAME).to_string(), request)
    }

    fn buffer(&self, index: usize) -> &str {
        match &self.fields[index].value {
            FieldValue::Text(buffer) => buffer,
            _ => "",
        }
    }

    fn flag(&self, index: usize) -> bool {
        matches!(self.fields[index].value, FieldValue::Flag(true))
    }

    fn gender(&self, index: usize) -> Gender {
        match self.fields[index].value {
            FieldValue::Gender(gender) => gender,
            _ => Gender::default(),
        }
    }

    fn parse_u32(&self, index: usize) -> Option<u32> {
        self.buffer(index).trim().parse().ok()
    }

    fn parse_f64(&self, index: usize) -> Option<f64> {
        self.buffer(index).trim().parse().ok()
    }
}

/// Render the diagnostic intake form
pub fn render_diagnostic_form(
    f: &mut Frame,
    area: Rect,
    state: &DiagnosticFormState,
    spinner: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state, spinner);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("New Laboratory Analysis", ClinicalTheme::title()),
        Span::styled(" │ Blood panel & risk factors", ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &DiagnosticFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .margin(1)
        .split(area);

    // Three columns of five keep the whole panel on screen
    let per_column = state.fields.len().div_ceil(3);
    for (column, chunk) in columns.iter().enumerate() {
        let start = column * per_column;
        let end = (start + per_column).min(state.fields.len());
        if start < end {
            render_field_column(f, *chunk, &state.fields[start..end], start, state.selected);
        }
    }
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, form_field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            ClinicalTheme::border_focused()
        } else {
            ClinicalTheme::border()
        };
        let title_style = if is_selected {
            ClinicalTheme::focused()
        } else {
            ClinicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", form_field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = match &form_field.value {
            FieldValue::Text(buffer) if buffer.is_empty() => {
                Span::styled(form_field.hint, ClinicalTheme::text_muted())
            }
            FieldValue::Text(buffer) => Span::styled(buffer.as_str(), ClinicalTheme::text()),
            FieldValue::Flag(true) => Span::styled("[x] Yes", ClinicalTheme::text()),
            FieldValue::Flag(false) => Span::styled("[ ] No", ClinicalTheme::text_secondary()),
            FieldValue::Gender(gender) => Span::styled(gender.label(), ClinicalTheme::text()),
        };

        let cursor = if is_selected && matches!(form_field.value, FieldValue::Text(_)) {
            Span::styled("▌", ClinicalTheme::focused())
        } else {
            Span::raw("")
        };

        let content =
            Paragraph::new(Line::from(vec![Span::raw(" "), value_display, cursor])).block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &DiagnosticFormState, spinner: &str) {
    let content = if state.submitting {
        Line::from(vec![
            Span::styled(format!(" {spinner} "), ClinicalTheme::info()),
            Span::styled("Analysis in progress...", ClinicalTheme::info()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓/Tab] ", ClinicalTheme::key_hint()),
            Span::styled("Navigate ", ClinicalTheme::key_desc()),
            Span::styled("[Space] ", ClinicalTheme::key_hint()),
            Span::styled("Toggle ", ClinicalTheme::key_desc()),
            Span::styled("[Enter] ", ClinicalTheme::key_hint()),
            Span::styled("Run diagnosis ", ClinicalTheme::key_desc()),
            Span::styled("[←→] ", ClinicalTheme::key_hint()),
            Span::styled("Switch view", ClinicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(state: &mut DiagnosticFormState, index: usize, text: &str) {
        state.selected = index;
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_navigation_wraps_both_ways() {
        let mut state = DiagnosticFormState::default();
        state.prev_field();
        assert_eq!(state.selected, field::FAMILY_HISTORY);
        state.next_field();
        assert_eq!(state.selected, field::NAME);
    }

    #[test]
    fn test_numeric_fields_filter_keyboard_input() {
        let mut state = DiagnosticFormState::default();

        type_into(&mut state, field::AGE, "4a2.");
        assert_eq!(state.buffer(field::AGE), "42");

        type_into(&mut state, field::GLUCOSE, "x5.2y");
        assert_eq!(state.buffer(field::GLUCOSE), "5.2");
    }

    #[test]
    fn test_name_accepts_free_text() {
        let mut state = DiagnosticFormState::default();
        type_into(&mut state, field::NAME, "Jean-Pierre Durand");
        assert_eq!(state.buffer(field::NAME), "Jean-Pierre Durand");
    }

    #[test]
    fn test_space_switches_gender_and_toggles_flags() {
        let mut state = DiagnosticFormState::default();

        type_into(&mut state, field::GENDER, " ");
        assert_eq!(state.gender(field::GENDER), Gender::Female);

        type_into(&mut state, field::SMOKING, " ");
        assert!(state.flag(field::SMOKING));
        state.input_char(' ');
        assert!(!state.flag(field::SMOKING));
    }

    #[test]
    fn test_to_request_coerces_buffers() {
        let mut state = DiagnosticFormState::default();
        type_into(&mut state, field::NAME, "Alice Martin");
        type_into(&mut state, field::AGE, "45");
        type_into(&mut state, field::GLUCOSE, "5.2");
        type_into(&mut state, field::SMOKING, " ");

        let (name, request) = state.to_request();

        assert_eq!(name, "Alice Martin");
        assert_eq!(request.age, Some(45));
        assert_eq!(request.glucose, Some(5.2));
        assert!(request.smoking);
        assert_eq!(request.gender, Gender::Male);
    }

    #[test]
    fn test_unfilled_and_malformed_buffers_coerce_to_none() {
        let mut state = DiagnosticFormState::default();
        // The keyboard filter still lets syntactically broken numbers through
        type_into(&mut state, field::CHOLESTEROL, "4.5.1");

        let (_, request) = state.to_request();

        assert_eq!(request.age, None);
        assert_eq!(request.cholesterol, None);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut state = DiagnosticFormState::default();
        type_into(&mut state, field::AGE, "45");

        state.delete_char();
        assert_eq!(state.buffer(field::AGE), "4");

        state.clear_field();
        assert_eq!(state.buffer(field::AGE), "");
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = DiagnosticFormState::default();
        type_into(&mut state, field::NAME, "Alice");
        type_into(&mut state, field::SMOKING, " ");
        state.submitting = true;

        state.reset();

        assert_eq!(state.buffer(field::NAME), "");
        assert!(!state.flag(field::SMOKING));
        assert_eq!(state.selected, 0);
        assert!(!state.submitting);
    }
}
