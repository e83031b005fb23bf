//! Main TUI application state machine.
//!
//! Handles:
//! - Tab navigation
//! - Input event handling
//! - Service integration
//! - Background API tasks

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};

use crate::adapters::HttpDiagnosisApi;
use crate::application::TriageService;
use crate::config::Config;
use crate::domain::{DiagnosisOutcome, HistoryEntry};
use crate::ports::DiagnosisApi;
use crate::tui::styles::ClinicalTheme;

use super::ui::{
    form::{render_diagnostic_form, DiagnosticFormState},
    history::{render_history, HistoryState},
    render_alert, render_disclaimer,
    results::{render_results, DownloadState},
};
use super::worker::{ApiWorker, TaskHandle};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Diagnostic,
    History,
}

impl Tab {
    const ALL: [Tab; 2] = [Tab::Diagnostic, Tab::History];

    fn title(self) -> &'static str {
        match self {
            Tab::Diagnostic => "Diagnostic",
            Tab::History => "History",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Diagnostic => 0,
            Tab::History => 1,
        }
    }
}

/// Main application state
pub struct App<A: DiagnosisApi + 'static> {
    /// Triage service shared with the workers
    service: Arc<TriageService<A>>,

    /// Active tab
    tab: Tab,

    /// Whether the app should quit
    should_quit: bool,

    /// Diagnostic form state
    form: DiagnosticFormState,

    /// History view state
    history: HistoryState,

    /// Last completed diagnosis, shown in the results overlay
    outcome: Option<DiagnosisOutcome>,

    /// Whether the results overlay is open
    show_results: bool,

    /// Prescription download status for the overlay
    download: DownloadState,

    /// Blocking error popup; swallows every key until dismissed
    alert: Option<String>,

    /// Pending prediction task (if running)
    predict_task: Option<TaskHandle<crate::Result<DiagnosisOutcome>>>,

    /// Pending history fetch (if running)
    history_task: Option<TaskHandle<crate::Result<Vec<HistoryEntry>>>>,

    /// Pending prescription download (if running)
    download_task: Option<TaskHandle<crate::Result<PathBuf>>>,

    /// For the spinner animation
    started_at: Instant,
}

impl App<HttpDiagnosisApi> {
    /// Create the application against the live HTTP service.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let api = Arc::new(HttpDiagnosisApi::new(&config.api_base_url)?);
        let service = Arc::new(TriageService::new(api, config.download_dir.clone()));
        Ok(Self::with_service(service))
    }
}

impl<A: DiagnosisApi + 'static> App<A> {
    /// Create the application with an injected service (Composition Root
    /// pattern). Lets `main.rs` and tests construct the adapter externally.
    pub fn with_service(service: Arc<TriageService<A>>) -> Self {
        Self {
            service,
            tab: Tab::Diagnostic,
            should_quit: false,
            form: DiagnosticFormState::default(),
            history: HistoryState::default(),
            outcome: None,
            show_results: false,
            download: DownloadState::Idle,
            alert: None,
            predict_task: None,
            history_task: None,
            download_task: None,
            started_at: Instant::now(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Apply terminal messages from background tasks
            self.poll_tasks();

            // Draw current view
            terminal.draw(|f| self.draw(f))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Active view
                Constraint::Length(2), // Disclaimer
            ])
            .split(f.area());

        self.render_tabs(f, chunks[0]);

        match self.tab {
            Tab::Diagnostic => render_diagnostic_form(f, chunks[1], &self.form, self.spinner()),
            Tab::History => render_history(f, chunks[1], &self.history, self.spinner()),
        }

        render_disclaimer(f, chunks[2]);

        // Overlays stack above the active tab; the alert stays on top
        if self.show_results {
            if let Some(outcome) = &self.outcome {
                render_results(f, f.area(), outcome, &self.download, self.spinner());
            }
        }

        if let Some(message) = &self.alert {
            render_alert(f, f.area(), message);
        }
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let titles = Tab::ALL.map(Tab::title);
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(ClinicalTheme::text_secondary())
            .highlight_style(ClinicalTheme::selected())
            .block(
                Block::default()
                    .title(Span::styled(" Labscope │ Lab Result Triage ", ClinicalTheme::title()))
                    .borders(Borders::ALL)
                    .border_style(ClinicalTheme::border()),
            );

        f.render_widget(tabs, area);
    }

    fn spinner(&self) -> &'static str {
        let frame = (self.started_at.elapsed().as_millis() / 100) as usize;
        SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
    }

    /// Apply the terminal message of every finished background task.
    ///
    /// NOTE: each message is bound before the handler runs so no borrow of
    /// the task slot is held while `self` is mutated.
    fn poll_tasks(&mut self) {
        let predict_message = self.predict_task.as_ref().and_then(TaskHandle::try_recv);
        if let Some(result) = predict_message {
            self.predict_task = None;
            self.on_predict_message(result);
        }

        let history_message = self.history_task.as_ref().and_then(TaskHandle::try_recv);
        if let Some(result) = history_message {
            self.history_task = None;
            self.on_history_message(result);
        }

        let download_message = self.download_task.as_ref().and_then(TaskHandle::try_recv);
        if let Some(result) = download_message {
            self.download_task = None;
            self.on_download_message(result);
        }
    }

    fn on_predict_message(&mut self, result: crate::Result<DiagnosisOutcome>) {
        self.form.submitting = false;

        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.download = DownloadState::Idle;
                self.show_results = true;
            }
            Err(e) => {
                tracing::error!("Prediction request failed: {e}");
                self.alert = Some(
                    "Prediction failed. Check the service connection and the submitted values."
                        .to_string(),
                );
            }
        }
    }

    fn on_history_message(&mut self, result: crate::Result<Vec<HistoryEntry>>) {
        self.history.loading = false;

        match result {
            Ok(entries) => {
                self.history.entries = entries;
                self.history.offset = 0;
            }
            Err(e) => {
                // Shown as the empty state; the cause goes to the log only
                tracing::error!("History fetch failed: {e}");
                self.history.entries = Vec::new();
            }
        }
    }

    fn on_download_message(&mut self, result: crate::Result<PathBuf>) {
        match result {
            Ok(path) => {
                tracing::info!("Prescription saved to {}", path.display());
                self.download = DownloadState::Saved(path);
            }
            Err(e) => {
                tracing::error!("Prescription download failed: {e}");
                self.download = DownloadState::Idle;
                self.alert =
                    Some("Could not download the prescription. Check the service connection.".to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // The alert popup captures everything until dismissed
        if self.alert.is_some() {
            if key == KeyCode::Enter {
                self.alert = None;
            }
            return;
        }

        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_results {
            self.handle_results_key(key);
            return;
        }

        match key {
            KeyCode::Left => self.select_tab(Tab::Diagnostic),
            KeyCode::Right => self.select_tab(Tab::History),
            _ => match self.tab {
                Tab::Diagnostic => self.handle_form_key(key),
                Tab::History => self.handle_history_key(key),
            },
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        // Inputs are disabled while a prediction is in flight
        if self.form.submitting {
            return;
        }

        match key {
            KeyCode::Up => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.history.scroll_up(),
            KeyCode::Down => self.history.scroll_down(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => self.close_results(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.new_diagnosis(),
            KeyCode::Char('d') | KeyCode::Char('D') => self.start_download(),
            _ => {}
        }
    }

    /// Switch tabs. No-op while the results overlay is open. Leaving a tab
    /// cancels its pending task; entering one restores its initial state.
    fn select_tab(&mut self, tab: Tab) {
        if self.show_results || tab == self.tab {
            return;
        }

        match self.tab {
            Tab::Diagnostic => {
                if let Some(task) = self.predict_task.take() {
                    task.cancel();
                }
                self.form.submitting = false;
            }
            Tab::History => {
                if let Some(task) = self.history_task.take() {
                    task.cancel();
                }
            }
        }

        self.tab = tab;

        match tab {
            Tab::Diagnostic => self.form.reset(),
            Tab::History => self.refresh_history(),
        }
    }

    fn submit_form(&mut self) {
        if self.form.submitting || self.predict_task.is_some() {
            return;
        }

        let (patient_name, request) = self.form.to_request();
        self.form.submitting = true;
        self.predict_task = Some(ApiWorker::spawn_predict(
            self.service.clone(),
            patient_name,
            request,
        ));
    }

    fn refresh_history(&mut self) {
        self.history = HistoryState::default();
        self.history_task = Some(ApiWorker::spawn_history(self.service.clone()));
    }

    fn start_download(&mut self) {
        if self.download_task.is_some() {
            return;
        }

        let Some(outcome) = &self.outcome else {
            return;
        };
        let record_id = outcome.result.id;

        self.download = DownloadState::Saving;
        self.download_task = Some(ApiWorker::spawn_download(self.service.clone(), record_id));
    }

    fn close_results(&mut self) {
        self.cancel_download();
        self.show_results = false;
        self.select_tab(Tab::History);
    }

    fn new_diagnosis(&mut self) {
        self.cancel_download();
        self.show_results = false;
        self.outcome = None;
        self.download = DownloadState::Idle;
        // The form keeps its values: the overlay only opens from Diagnostic
        self.select_tab(Tab::Diagnostic);
    }

    fn cancel_download(&mut self) {
        if let Some(task) = self.download_task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{sample_entry, sample_result, MockDiagnosisApi};
    use crate::ports::ApiError;
    use crate::tui::ui::form::{field, FieldValue};
    use std::thread;

    fn test_app(api: MockDiagnosisApi) -> (App<MockDiagnosisApi>, Arc<MockDiagnosisApi>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(api);
        let service = Arc::new(TriageService::new(api.clone(), dir.path()));
        (App::with_service(service), api, dir)
    }

    /// Poll until every pending task has delivered its message.
    fn pump(app: &mut App<MockDiagnosisApi>) {
        for _ in 0..200 {
            app.poll_tasks();
            if app.predict_task.is_none()
                && app.history_task.is_none()
                && app.download_task.is_none()
            {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("background task never finished");
    }

    fn type_text(app: &mut App<MockDiagnosisApi>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn name_buffer(app: &App<MockDiagnosisApi>) -> String {
        match &app.form.fields[field::NAME].value {
            FieldValue::Text(buffer) => buffer.clone(),
            other => panic!("name field holds {other:?}"),
        }
    }

    #[test]
    fn test_successful_predict_opens_results_overlay() {
        let (mut app, api, _dir) = test_app(MockDiagnosisApi::new());
        type_text(&mut app, "Alice Martin");

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.form.submitting);

        pump(&mut app);

        assert!(app.show_results);
        assert!(!app.form.submitting);
        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.patient_name, "Alice Martin");
        assert_eq!(api.calls(), vec!["predict".to_string()]);
    }

    #[test]
    fn test_failed_predict_raises_one_alert_and_keeps_form() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::unreachable());
        type_text(&mut app, "Bob");

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        pump(&mut app);

        assert!(app.alert.is_some());
        assert!(!app.show_results);
        assert_eq!(app.tab, Tab::Diagnostic);
        assert!(!app.form.submitting);
        assert_eq!(name_buffer(&app), "Bob");
    }

    #[test]
    fn test_repeated_submit_sends_one_request() {
        let (mut app, api, _dir) = test_app(MockDiagnosisApi::new());

        app.submit_form();
        app.submit_form();
        pump(&mut app);

        assert_eq!(api.calls(), vec!["predict".to_string()]);
    }

    #[test]
    fn test_alert_swallows_every_key_except_enter() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        app.alert = Some("boom".to_string());

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.tab, Tab::Diagnostic);

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_closing_results_switches_to_history_and_fetches() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        app.outcome = Some(DiagnosisOutcome {
            patient_name: "Alice".to_string(),
            result: sample_result(7, "DIABETE", &[("DIABETE", 0.8), ("SAIN", 0.2)]),
        });
        app.show_results = true;

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);

        assert!(!app.show_results);
        assert_eq!(app.tab, Tab::History);
        assert!(app.history.loading);
        assert!(app.history_task.is_some());
        // The outcome is retained, only hidden
        assert!(app.outcome.is_some());

        pump(&mut app);
        assert!(!app.history.loading);
    }

    #[test]
    fn test_new_diagnosis_keeps_form_and_clears_outcome() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        type_text(&mut app, "Alice");
        app.outcome = Some(DiagnosisOutcome {
            patient_name: "Alice".to_string(),
            result: sample_result(7, "SAIN", &[("SAIN", 0.9)]),
        });
        app.show_results = true;

        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);

        assert!(!app.show_results);
        assert!(app.outcome.is_none());
        assert_eq!(app.tab, Tab::Diagnostic);
        assert_eq!(name_buffer(&app), "Alice");
    }

    #[test]
    fn test_tab_switch_is_blocked_while_results_open() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        app.outcome = Some(DiagnosisOutcome {
            patient_name: String::new(),
            result: sample_result(1, "SAIN", &[("SAIN", 1.0)]),
        });
        app.show_results = true;

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);

        assert!(app.show_results);
        assert_eq!(app.tab, Tab::Diagnostic);
    }

    #[test]
    fn test_leaving_diagnostic_cancels_pending_predict() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        app.submit_form();
        assert!(app.predict_task.is_some());

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);

        assert!(app.predict_task.is_none());
        assert!(!app.form.submitting);
        assert_eq!(app.tab, Tab::History);

        // The dropped task never surfaces a result
        pump(&mut app);
        assert!(!app.show_results);
        assert!(app.outcome.is_none());
    }

    #[test]
    fn test_entering_diagnostic_resets_the_form() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        type_text(&mut app, "Alice");

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        pump(&mut app);
        app.handle_key(KeyCode::Left, KeyModifiers::NONE);

        assert_eq!(name_buffer(&app), "");
    }

    #[test]
    fn test_history_fetch_failure_presents_empty_state() {
        let api = MockDiagnosisApi::new()
            .with_history(Err(ApiError::Connection("refused".to_string())));
        let (mut app, _api, _dir) = test_app(api);

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        pump(&mut app);

        assert!(!app.history.loading);
        assert!(app.history.entries.is_empty());
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_history_fetch_populates_entries() {
        let api = MockDiagnosisApi::new().with_history(Ok(vec![
            sample_entry(1, "SAIN", 30),
            sample_entry(2, "RENAL", 61),
        ]));
        let (mut app, _api, _dir) = test_app(api);

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        pump(&mut app);

        assert_eq!(app.history.entries.len(), 2);
        assert_eq!(app.history.entries[1].diagnosis, "RENAL");
    }

    #[test]
    fn test_plain_q_quits_only_from_history() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());

        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        assert_eq!(name_buffer(&app), "q");

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        pump(&mut app);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit);
    }

    #[test]
    fn test_download_success_records_saved_path() {
        let (mut app, _api, _dir) = test_app(MockDiagnosisApi::new());
        app.outcome = Some(DiagnosisOutcome {
            patient_name: "Alice".to_string(),
            result: sample_result(12, "SAIN", &[("SAIN", 0.9)]),
        });
        app.show_results = true;

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(matches!(app.download, DownloadState::Saving));
        pump(&mut app);

        match &app.download {
            DownloadState::Saved(path) => {
                assert_eq!(path.file_name().unwrap(), "Ordonnance_Patient_12.pdf");
            }
            other => panic!("expected saved state, got {other:?}"),
        }
    }

    #[test]
    fn test_download_failure_raises_alert() {
        let api = MockDiagnosisApi::new().with_prescription(Err(ApiError::Timeout));
        let (mut app, _api, _dir) = test_app(api);
        app.outcome = Some(DiagnosisOutcome {
            patient_name: String::new(),
            result: sample_result(3, "SAIN", &[("SAIN", 0.9)]),
        });
        app.show_results = true;

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        pump(&mut app);

        assert!(app.alert.is_some());
        assert!(matches!(app.download, DownloadState::Idle));
    }
}
