//! Application state and core logic

use crate::config::IntakeConfig;
use crate::state::{
    parse_dropped_path, Banner, Debouncer, DraftStore, FieldKind, FormSession, PendingRead,
    StepChange, UploadHandler,
};
use crate::storage::{KeyValueStore, LocalStorage, MemoryStorage};
use crate::submit::{HttpSubmitter, Payload, SubmissionError, Submitter};
use crate::ui::FormLayout;
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Shown when a submission fails for any reason
pub const SUBMIT_ERROR_MESSAGE: &str =
    "There was an error submitting your form. Please try again or contact us directly.";

const RESTORED_MESSAGE: &str = "Restored your saved progress";

/// Results of work spawned off the UI loop
#[derive(Debug)]
pub enum TaskEvent {
    FileRead {
        field: String,
        generation: u64,
        result: Result<Vec<u8>, String>,
    },
    Submitted(Result<(), SubmissionError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Submit control disabled, busy label shown
    InFlight,
    /// The form has been replaced by the success panel
    Succeeded,
}

/// Main application struct
pub struct App {
    /// The form being filled in
    pub session: FormSession,
    /// One drop zone per file field
    pub uploads: Vec<UploadHandler>,
    /// Page-level notice (submission failure, restored draft)
    pub notice: Option<Banner>,
    pub submission: SubmissionState,
    drafts: DraftStore,
    autosave: Debouncer,
    submitter: Arc<dyn Submitter>,
    events_tx: UnboundedSender<TaskEvent>,
    events_rx: UnboundedReceiver<TaskEvent>,
    notice_ttl: Duration,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size for mouse hit-testing (height, width)
    pub terminal_size: Option<(u16, u16)>,
}

impl App {
    /// Create a new App from user configuration
    pub fn new(config: &IntakeConfig) -> Result<Self> {
        let definition = config.form_definition()?;
        let session = FormSession::new(&definition)?;

        let storage: Box<dyn KeyValueStore> = match LocalStorage::default_path() {
            Some(path) => Box::new(LocalStorage::open(path)),
            None => {
                tracing::warn!("No data directory available; drafts will not survive a restart");
                Box::new(MemoryStorage::default())
            }
        };
        let drafts = DraftStore::new(storage, config.draft_key());

        let endpoint = config.endpoint();
        if endpoint.is_none() {
            tracing::warn!("No submission endpoint configured");
        }
        let submitter = Arc::new(HttpSubmitter::new(endpoint, config.request_timeout())?);

        let mut app = Self::with_parts(
            session,
            drafts,
            submitter,
            config.autosave_delay(),
            config.notice_timeout(),
        );
        app.restore_draft(Instant::now());
        Ok(app)
    }

    /// Assemble an App from already-built parts
    pub fn with_parts(
        session: FormSession,
        drafts: DraftStore,
        submitter: Arc<dyn Submitter>,
        autosave_delay: Duration,
        notice_ttl: Duration,
    ) -> Self {
        let uploads = session
            .fields()
            .filter(|f| f.kind == FieldKind::File)
            .map(|f| UploadHandler::new(f.name.clone(), notice_ttl))
            .collect();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            session,
            uploads,
            notice: None,
            submission: SubmissionState::Idle,
            drafts,
            autosave: Debouncer::new(autosave_delay),
            submitter,
            events_tx,
            events_rx,
            notice_ttl,
            quit: false,
            terminal_size: None,
        }
    }

    /// Load a saved draft into the session, if there is one
    pub fn restore_draft(&mut self, now: Instant) {
        match self.drafts.load(&mut self.session) {
            Ok(true) => {
                self.notice = Some(Banner::info(RESTORED_MESSAGE, now, self.notice_ttl));
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Ignoring unreadable draft: {e}"),
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_busy(&self) -> bool {
        self.submission == SubmissionState::InFlight
    }

    /// True while something on screen changes without input
    pub fn is_animating(&self, now: Instant) -> bool {
        self.is_busy() || self.session.entrance_progress(now) < 1.0
    }

    /// Message to show under a field: validation first, then upload errors
    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.session.errors.get(name).or_else(|| {
            self.upload(name)
                .and_then(|u| u.error.as_ref())
                .map(|b| b.message.as_str())
        })
    }

    pub fn upload(&self, field: &str) -> Option<&UploadHandler> {
        self.uploads.iter().find(|u| u.field() == field)
    }

    fn screen_area(&self) -> Rect {
        let (height, width) = self.terminal_size.unwrap_or((24, 80));
        Rect::new(0, 0, width, height)
    }

    // Draft persistence

    fn save_draft(&mut self) {
        if let Err(e) = self.drafts.save(&self.session) {
            tracing::warn!("Failed to save draft: {e}");
        }
    }

    /// A discrete value change is saved right away, superseding pending typing
    fn value_changed(&mut self) {
        self.autosave.cancel();
        self.save_draft();
    }

    /// Typing is saved once the user pauses
    fn value_input(&mut self, now: Instant) {
        self.autosave.touch(now);
    }

    /// Leaving a field commits any pending typed edits
    fn flush_autosave(&mut self) {
        if self.autosave.is_pending() {
            self.autosave.cancel();
            self.save_draft();
        }
    }

    /// Advance the clock: drain finished tasks, fire the autosave and expire notices
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_task_event(event, now);
        }
        if self.autosave.fire(now) {
            self.save_draft();
        }
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
        for upload in &mut self.uploads {
            upload.tick(now);
        }
    }

    pub fn handle_task_event(&mut self, event: TaskEvent, now: Instant) {
        match event {
            TaskEvent::FileRead {
                field,
                generation,
                result,
            } => {
                if let Some(upload) = self.uploads.iter_mut().find(|u| u.field() == field) {
                    upload.complete(&mut self.session, generation, result, now);
                }
            }
            TaskEvent::Submitted(result) => self.finish_submission(result, now),
        }
    }

    // Step navigation

    fn next_step(&mut self) {
        self.flush_autosave();
        match self.session.go_next() {
            StepChange::Advanced => {
                for upload in &mut self.uploads {
                    upload.set_hover(false);
                }
            }
            // Submitting is its own action (Enter, the shortcut or the button)
            StepChange::Blocked | StepChange::AtLastStep => {}
        }
    }

    fn prev_step(&mut self) {
        self.flush_autosave();
        self.session.go_prev();
    }

    // Submission

    /// Validate the last step and send the form in the background
    pub fn submit(&mut self) {
        if self.submission != SubmissionState::Idle || !self.session.is_last_step() {
            return;
        }
        if !self.session.validate_active_step() {
            tracing::debug!("Submission blocked by {} error(s)", self.session.errors.len());
            return;
        }

        self.submission = SubmissionState::InFlight;
        self.notice = None;
        let payload = Payload::from_session(&self.session, Utc::now());
        tracing::info!("Submitting form with {} entries", payload.len());

        let submitter = Arc::clone(&self.submitter);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = submitter.submit(payload).await;
            let _ = tx.send(TaskEvent::Submitted(result));
        });
    }

    fn finish_submission(&mut self, result: Result<(), SubmissionError>, now: Instant) {
        self.submission = SubmissionState::Idle;
        match result {
            Ok(()) => {
                tracing::info!("Form submitted");
                self.submission = SubmissionState::Succeeded;
                self.autosave.cancel();
                if let Err(e) = self.drafts.clear() {
                    tracing::warn!("Failed to clear draft: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("Submission failed: {e}");
                self.notice = Some(Banner::error(SUBMIT_ERROR_MESSAGE, now, self.notice_ttl));
            }
        }
    }

    // File fields

    /// Validate a picked or dropped file and start reading it for the preview
    fn install_file(&mut self, field: &str, path: &Path, now: Instant) {
        let Some(upload) = self.uploads.iter_mut().find(|u| u.field() == field) else {
            return;
        };
        if let Some(pending) = upload.select(&mut self.session, path, now) {
            self.spawn_read(pending);
        }
        self.value_changed();
    }

    fn spawn_read(&self, pending: PendingRead) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = tokio::fs::read(&pending.path)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(TaskEvent::FileRead {
                field: pending.field,
                generation: pending.generation,
                result,
            });
        });
    }

    fn remove_active_file(&mut self) {
        let Some(name) = self.session.active_file_field().map(str::to_string) else {
            return;
        };
        if let Some(upload) = self.uploads.iter_mut().find(|u| u.field() == name) {
            upload.remove(&mut self.session);
        }
    }

    /// Path typed into the focused file field, if it is not installed yet
    fn typed_file_path(&self) -> Option<(String, PathBuf)> {
        let field = self.session.active_field()?;
        if field.kind != FieldKind::File {
            return None;
        }
        let typed = field.as_text().trim();
        if typed.is_empty() {
            return None;
        }
        let path = PathBuf::from(typed);
        if field.attached_file().is_some_and(|f| f.path == path) {
            return None;
        }
        Some((field.name.clone(), path))
    }

    // Terminal events

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        if self.submission == SubmissionState::Succeeded {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')
            ) {
                self.quit = true;
            }
            return;
        }

        if crate::platform::is_shortcut(key.modifiers) {
            match key.code {
                KeyCode::Char('n') => self.next_step(),
                KeyCode::Char('p') => self.prev_step(),
                KeyCode::Char('s') if self.session.is_last_step() => self.submit(),
                KeyCode::Char('x') => {
                    self.remove_active_file();
                    self.value_changed();
                }
                _ => {}
            }
            return;
        }

        let kind = self.session.active_field_kind();
        let on_choice = kind.is_some_and(FieldKind::is_choice);

        match key.code {
            KeyCode::Esc => self.dismiss_notice(),
            KeyCode::Tab => {
                self.flush_autosave();
                self.session.focus_next_field();
            }
            KeyCode::BackTab => {
                self.flush_autosave();
                self.session.focus_prev_field();
            }
            KeyCode::Enter if self.session.is_active_field_multiline() => {
                if self.session.insert_newline() {
                    self.value_input(now);
                }
            }
            KeyCode::Enter => {
                if let Some((field, path)) = self.typed_file_path() {
                    self.install_file(&field, &path, now);
                } else if self.session.is_last_step() {
                    self.flush_autosave();
                    self.submit();
                } else {
                    self.next_step();
                }
            }
            KeyCode::Char(' ') if on_choice => {
                if self.session.toggle_option() {
                    self.value_changed();
                }
            }
            KeyCode::Right | KeyCode::Down if on_choice => {
                if self.session.next_option() {
                    self.value_changed();
                }
            }
            KeyCode::Left | KeyCode::Up if on_choice => {
                if self.session.prev_option() {
                    self.value_changed();
                }
            }
            KeyCode::Char(c) => {
                if self.session.input_char(c) && kind != Some(FieldKind::File) {
                    self.value_input(now);
                }
            }
            KeyCode::Backspace => {
                if self.session.backspace() && kind != Some(FieldKind::File) {
                    self.value_input(now);
                }
            }
            _ => {}
        }
    }

    fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            return;
        }
        for upload in &mut self.uploads {
            upload.dismiss_error();
        }
    }

    /// Bracketed paste: a path dropped on the drop zone, or plain text typing
    pub fn handle_paste(&mut self, text: &str, now: Instant) {
        if self.submission == SubmissionState::Succeeded {
            return;
        }

        let hovered = self
            .uploads
            .iter()
            .find(|u| u.hover)
            .map(|u| u.field().to_string());
        let focused_file = match self.session.active_field() {
            Some(field) if field.kind == FieldKind::File => Some(field.name.clone()),
            _ => None,
        };

        if let Some(field) = hovered.or(focused_file) {
            if let Some(path) = parse_dropped_path(text) {
                self.session.focus_named(&field);
                self.install_file(&field, &path, now);
            }
            return;
        }

        if self
            .session
            .active_field_kind()
            .is_some_and(FieldKind::is_text_like)
        {
            let multiline = self.session.is_active_field_multiline();
            let mut changed = false;
            for c in text.chars() {
                if c == '\n' || c == '\r' {
                    if multiline && c == '\n' {
                        changed |= self.session.insert_newline();
                    }
                    continue;
                }
                changed |= self.session.input_char(c);
            }
            if changed {
                self.value_input(now);
            }
        }
    }

    /// Handle mouse events: hover over drop zones, clicks on fields and buttons
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.submission == SubmissionState::Succeeded {
            return;
        }
        let layout = FormLayout::compute(self.screen_area(), self);
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let fields = &self.session.active_step().fields;
                let hovered: Vec<String> = fields
                    .iter()
                    .zip(&layout.fields)
                    .filter(|(f, _)| f.kind == FieldKind::File)
                    .filter(|(_, rect)| rect.is_some_and(|r| r.contains(position)))
                    .map(|(f, _)| f.name.clone())
                    .collect();
                for upload in &mut self.uploads {
                    let over = hovered.iter().any(|name| name == upload.field());
                    if upload.hover != over {
                        upload.set_hover(over);
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.prev_button.is_some_and(|r| r.contains(position)) {
                    self.prev_step();
                } else if layout.next_button.contains(position) {
                    if self.session.is_last_step() {
                        self.flush_autosave();
                        self.submit();
                    } else {
                        self.next_step();
                    }
                } else if let Some(index) = layout.field_at(position) {
                    self.flush_autosave();
                    self.session.focus_field(index);
                }
            }
            _ => {}
        }
    }
}
