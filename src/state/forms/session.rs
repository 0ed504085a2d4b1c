//! Form session: the step controller and everything it owns
//!
//! A `FormSession` is created once per run from a `FormDefinition`. It holds
//! the active step index, field focus, field values and error slots. Handlers
//! receive it by reference; nothing else mutates the step index.

use super::definition::FormDefinition;
use super::field::{AttachedFile, FieldKind, FormField};
use super::validation::{validate_field, validate_step, FieldErrors};
use anyhow::Result;
use std::time::{Duration, Instant};

/// Duration of the entrance transition for a newly active step
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(500);

/// A group of fields shown together
#[derive(Debug, Clone)]
pub struct Step {
    pub title: String,
    pub subtitle: Option<String>,
    pub fields: Vec<FormField>,
}

/// Result of a forward navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    Advanced,
    /// Validation failed; errors are now in the session's slots
    Blocked,
    /// Already on the last step; submission is a separate action
    AtLastStep,
}

/// What the step chrome should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepView {
    pub index: usize,
    pub total: usize,
    /// `(index + 1) / total`
    pub progress: f64,
    pub show_prev: bool,
    pub show_next: bool,
    pub show_submit: bool,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    title: String,
    steps: Vec<Step>,
    step_index: usize,
    active_field: usize,
    pub errors: FieldErrors,
    entered_at: Instant,
}

impl FormSession {
    pub fn new(definition: &FormDefinition) -> Result<Self> {
        definition.check()?;
        Ok(Self::from_checked(definition))
    }

    fn from_checked(definition: &FormDefinition) -> Self {
        let steps = definition
            .steps
            .iter()
            .map(|step| Step {
                title: step.title.clone(),
                subtitle: step.subtitle.clone(),
                fields: step.fields.iter().map(|f| f.build()).collect(),
            })
            .collect();
        Self {
            title: definition.title.clone(),
            steps,
            step_index: 0,
            active_field: 0,
            errors: FieldErrors::default(),
            entered_at: Instant::now(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 == self.steps.len()
    }

    pub fn active_step(&self) -> &Step {
        &self.steps[self.step_index]
    }

    /// Validate the active step and advance when it passes
    pub fn go_next(&mut self) -> StepChange {
        if !self.validate_active_step() {
            tracing::debug!(
                "Step {} blocked by {} invalid field(s)",
                self.step_index,
                self.errors.len()
            );
            return StepChange::Blocked;
        }
        if self.is_last_step() {
            return StepChange::AtLastStep;
        }
        self.step_index += 1;
        self.enter_step();
        tracing::info!(
            "Advanced to step {}/{}",
            self.step_index + 1,
            self.total_steps()
        );
        StepChange::Advanced
    }

    /// Go back one step; no-op on the first step
    pub fn go_prev(&mut self) -> bool {
        if self.step_index == 0 {
            return false;
        }
        self.step_index -= 1;
        self.enter_step();
        true
    }

    fn enter_step(&mut self) {
        self.active_field = 0;
        self.entered_at = Instant::now();
    }

    /// Authoritative validation of the active step (navigation and submission)
    pub fn validate_active_step(&mut self) -> bool {
        validate_step(&self.steps[self.step_index].fields, &mut self.errors)
    }

    pub fn view(&self) -> StepView {
        let total = self.total_steps();
        StepView {
            index: self.step_index,
            total,
            progress: (self.step_index + 1) as f64 / total as f64,
            show_prev: self.step_index > 0,
            show_next: !self.is_last_step(),
            show_submit: self.is_last_step(),
        }
    }

    /// Eased 0.0..=1.0 progress of the active step's entrance transition
    pub fn entrance_progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.entered_at);
        let t = (elapsed.as_secs_f32() / ENTRANCE_DURATION.as_secs_f32()).min(1.0);
        simple_easing::cubic_out(t)
    }

    // Field focus

    pub fn active_field_index(&self) -> usize {
        self.active_field
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.active_step().fields.get(self.active_field)
    }

    pub fn active_field_mut(&mut self) -> Option<&mut FormField> {
        self.steps[self.step_index].fields.get_mut(self.active_field)
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.active_field().is_some_and(|f| f.is_multiline())
    }

    pub fn active_field_kind(&self) -> Option<FieldKind> {
        self.active_field().map(|f| f.kind)
    }

    /// Move focus to another field of the active step, blurring the current one
    pub fn focus_field(&mut self, index: usize) {
        let count = self.active_step().fields.len();
        if count == 0 || index >= count || index == self.active_field {
            return;
        }
        self.blur_active();
        self.active_field = index;
    }

    pub fn focus_next_field(&mut self) {
        let count = self.active_step().fields.len();
        if count > 1 {
            self.focus_field((self.active_field + 1) % count);
        }
    }

    pub fn focus_prev_field(&mut self) {
        let count = self.active_step().fields.len();
        if count > 1 {
            let index = if self.active_field == 0 {
                count - 1
            } else {
                self.active_field - 1
            };
            self.focus_field(index);
        }
    }

    /// Blur validation: every field, required or not, gets its slot refreshed
    pub fn blur_active(&mut self) {
        if let Some(field) = self.active_field() {
            let result = validate_field(field);
            let name = field.name.clone();
            self.errors.apply(&name, &result);
        }
    }

    // Editing. Each returns true when the value changed; a change clears the
    // field's error optimistically.

    pub fn input_char(&mut self, c: char) -> bool {
        self.edit_active(|field| field.push_char(c))
    }

    pub fn backspace(&mut self) -> bool {
        self.edit_active(FormField::pop_char)
    }

    pub fn insert_newline(&mut self) -> bool {
        self.edit_active(|field| field.is_multiline() && field.push_char('\n'))
    }

    pub fn toggle_option(&mut self) -> bool {
        self.edit_active(FormField::toggle_option)
    }

    pub fn next_option(&mut self) -> bool {
        self.edit_active(FormField::next_option)
    }

    pub fn prev_option(&mut self) -> bool {
        self.edit_active(FormField::prev_option)
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut FormField) -> bool) -> bool {
        let Some(field) = self.active_field_mut() else {
            return false;
        };
        let changed = edit(field);
        if changed {
            let name = field.name.clone();
            self.errors.clear(&name);
        }
        changed
    }

    // Lookup across all steps, in declaration order

    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.steps
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| f.name == name)
    }

    /// Name of the first file field on the active step, if any
    pub fn active_file_field(&self) -> Option<&str> {
        self.active_step()
            .fields
            .iter()
            .find(|f| f.kind == FieldKind::File)
            .map(|f| f.name.as_str())
    }

    /// Focus a field of the active step by name
    pub fn focus_named(&mut self, name: &str) {
        if let Some(index) = self.active_step().fields.iter().position(|f| f.name == name) {
            self.focus_field(index);
        }
    }

    pub fn attach_file(&mut self, name: &str, file: AttachedFile) {
        if let Some(field) = self.field_mut(name) {
            field.attach_file(file);
        }
        self.errors.clear(name);
    }

    pub fn clear_file(&mut self, name: &str) {
        if let Some(field) = self.field_mut(name) {
            field.clear_file();
        }
    }
}

impl Default for FormSession {
    /// Session over the built-in project request form
    fn default() -> Self {
        Self::from_checked(&FormDefinition::default())
    }
}
