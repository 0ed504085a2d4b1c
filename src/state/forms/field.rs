//! Form field value objects

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input type of a field, as declared in the form definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
}

impl FieldKind {
    /// Kinds whose value is a set of checked/selected options
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Checkbox | Self::Radio)
    }

    /// Kinds edited by typing characters
    pub fn is_text_like(self) -> bool {
        matches!(self, Self::Text | Self::Email | Self::Tel | Self::Textarea)
    }
}

/// One selectable option of a select, checkbox group or radio group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// A file that has been accepted into a file field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

/// State of a file field: the typed path plus the installed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    pub path_input: String,
    pub selected: Option<AttachedFile>,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Checked option values, kept in option declaration order
    Choices(Vec<String>),
    File(FileInput),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<ChoiceOption>,
    pub placeholder: Option<String>,
    pub value: FieldValue,
    /// Highlighted option for choice fields
    pub option_cursor: usize,
}

impl FormField {
    /// Create a new field with an empty value for its kind
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        let value = match kind {
            FieldKind::Select | FieldKind::Checkbox | FieldKind::Radio => {
                FieldValue::Choices(Vec::new())
            }
            FieldKind::File => FieldValue::File(FileInput::default()),
            _ => FieldValue::Text(String::new()),
        };
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            options: Vec::new(),
            placeholder: None,
            value,
            option_cursor: 0,
        }
    }

    #[cfg(test)]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.kind == FieldKind::Textarea
    }

    pub fn is_email(&self) -> bool {
        self.kind == FieldKind::Email
    }

    /// True when the field carries no value for the purposes of a required check
    pub fn is_empty(&self) -> bool {
        match &self.value {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choices(values) => values.iter().all(|v| v.trim().is_empty()),
            FieldValue::File(input) => input.selected.is_none(),
        }
    }

    /// Get the text value (the typed path for file fields, empty for choices)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::File(input) => &input.path_input,
            FieldValue::Choices(_) => "",
        }
    }

    /// Get the checked option values (empty for non-choice fields)
    pub fn choices(&self) -> &[String] {
        match &self.value {
            FieldValue::Choices(values) => values,
            _ => &[],
        }
    }

    pub fn attached_file(&self) -> Option<&AttachedFile> {
        match &self.value {
            FieldValue::File(input) => input.selected.as_ref(),
            _ => None,
        }
    }

    /// Set the text value (no-op for choice and file fields)
    pub fn set_text(&mut self, value: String) {
        if let FieldValue::Text(s) = &mut self.value {
            *s = value;
        }
    }

    /// Check the option with the given value.
    ///
    /// Radio and select fields hold at most one value, so checking replaces.
    /// Returns false when no option has that value.
    pub fn check_option(&mut self, value: &str) -> bool {
        let Some(position) = self.options.iter().position(|o| o.value == value) else {
            return false;
        };
        let kind = self.kind;
        let ordered: Vec<String> = {
            let FieldValue::Choices(current) = &self.value else {
                return false;
            };
            match kind {
                FieldKind::Checkbox => self
                    .options
                    .iter()
                    .filter(|o| o.value == value || current.contains(&o.value))
                    .map(|o| o.value.clone())
                    .collect(),
                _ => vec![value.to_string()],
            }
        };
        self.value = FieldValue::Choices(ordered);
        self.option_cursor = position;
        true
    }

    /// Push a character to the field value. Returns true if the value changed.
    ///
    /// A file field with an installed file ignores typing until it is removed.
    pub fn push_char(&mut self, c: char) -> bool {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.push(c);
                true
            }
            FieldValue::File(input) if input.selected.is_none() => {
                input.path_input.push(c);
                true
            }
            FieldValue::File(_) | FieldValue::Choices(_) => false,
        }
    }

    /// Remove the last character from the field value. Returns true if the value changed.
    pub fn pop_char(&mut self) -> bool {
        match &mut self.value {
            FieldValue::Text(s) => s.pop().is_some(),
            FieldValue::File(input) if input.selected.is_none() => {
                input.path_input.pop().is_some()
            }
            FieldValue::File(_) | FieldValue::Choices(_) => false,
        }
    }

    /// Move the option highlight forward. Select fields change value as they move.
    pub fn next_option(&mut self) -> bool {
        if self.options.is_empty() {
            return false;
        }
        self.option_cursor = (self.option_cursor + 1) % self.options.len();
        self.select_at_cursor()
    }

    /// Move the option highlight backward. Select fields change value as they move.
    pub fn prev_option(&mut self) -> bool {
        if self.options.is_empty() {
            return false;
        }
        self.option_cursor = if self.option_cursor == 0 {
            self.options.len() - 1
        } else {
            self.option_cursor - 1
        };
        self.select_at_cursor()
    }

    fn select_at_cursor(&mut self) -> bool {
        if self.kind != FieldKind::Select {
            return false;
        }
        let value = self.options[self.option_cursor].value.clone();
        self.check_option(&value)
    }

    /// Toggle the highlighted option (checkbox) or select it (radio).
    /// Returns true if the value changed.
    pub fn toggle_option(&mut self) -> bool {
        let Some(option) = self.options.get(self.option_cursor) else {
            return false;
        };
        let value = option.value.clone();
        match self.kind {
            FieldKind::Checkbox => {
                if let FieldValue::Choices(values) = &mut self.value {
                    if let Some(pos) = values.iter().position(|v| *v == value) {
                        values.remove(pos);
                        return true;
                    }
                }
                self.check_option(&value)
            }
            FieldKind::Radio | FieldKind::Select => {
                if self.choices().first() == Some(&value) {
                    return false;
                }
                self.check_option(&value)
            }
            _ => false,
        }
    }

    /// Install an accepted file, mirroring its path into the typed input
    pub fn attach_file(&mut self, file: AttachedFile) {
        if let FieldValue::File(input) = &mut self.value {
            input.path_input = file.path.display().to_string();
            input.selected = Some(file);
        }
    }

    /// Reset a file field to its empty state
    pub fn clear_file(&mut self) {
        if let FieldValue::File(input) = &mut self.value {
            *input = FileInput::default();
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choices(values) => values.clear(),
            FieldValue::File(input) => *input = FileInput::default(),
        }
    }

    /// Label of an option value, falling back to the raw value
    pub fn option_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .unwrap_or(value)
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choices(values) => values
                .iter()
                .map(|v| self.option_label(v))
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::File(input) => match &input.selected {
                Some(file) => file.file_name.clone(),
                None => input.path_input.clone(),
            },
        }
    }
}
