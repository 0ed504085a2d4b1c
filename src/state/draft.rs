//! Draft persistence: snapshot field values into storage and restore them

use super::forms::{FieldKind, FieldValue, FormSession};
use crate::storage::KeyValueStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_DRAFT_KEY: &str = "intake_form_data";

/// A saved value: a single string or the checked values of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftValue {
    One(String),
    Many(Vec<String>),
}

impl DraftValue {
    fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(DraftValue::One),
            _ => Some(DraftValue::Many(values)),
        }
    }

    fn values(&self) -> Vec<&str> {
        match self {
            DraftValue::One(value) => vec![value.as_str()],
            DraftValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

pub type Draft = BTreeMap<String, DraftValue>;

/// Capture every field's current value.
///
/// Text fields are always present, choice groups only when something is
/// checked, and file fields are skipped since a file handle cannot be stored.
pub fn snapshot(session: &FormSession) -> Draft {
    let mut draft = Draft::new();
    for field in session.fields() {
        let value = match (&field.value, field.kind) {
            (FieldValue::Text(text), _) => Some(DraftValue::One(text.clone())),
            (FieldValue::Choices(values), FieldKind::Select) => Some(DraftValue::One(
                values.first().cloned().unwrap_or_default(),
            )),
            (FieldValue::Choices(values), _) => DraftValue::from_values(values.clone()),
            (FieldValue::File(_), _) => None,
        };
        if let Some(value) = value {
            draft.insert(field.name.clone(), value);
        }
    }
    draft
}

/// Assign saved values back onto fields with matching names.
///
/// Choice groups get each saved option checked; names and options that no
/// longer exist are ignored. Returns the number of fields touched.
pub fn restore(session: &mut FormSession, draft: &Draft) -> usize {
    let mut restored = 0;
    for (name, value) in draft {
        let Some(field) = session.field_mut(name) else {
            continue;
        };
        match field.kind {
            FieldKind::File => continue,
            kind if kind.is_choice() => {
                for option in value.values() {
                    field.check_option(option);
                }
            }
            _ => field.set_text(value.values().join(",")),
        }
        restored += 1;
    }
    restored
}

/// Persists the form draft under one namespaced key
pub struct DraftStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
}

impl DraftStore {
    pub fn new(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[cfg(test)]
    pub fn has_draft(&self) -> bool {
        self.storage.get_item(&self.key).is_some()
    }

    pub fn save(&mut self, session: &FormSession) -> Result<()> {
        let draft = snapshot(session);
        let json = serde_json::to_string(&draft)?;
        self.storage.set_item(&self.key, json)?;
        tracing::debug!("Saved draft with {} field(s)", draft.len());
        Ok(())
    }

    /// Restore a saved draft into the session. Returns false when none exists.
    pub fn load(&self, session: &mut FormSession) -> Result<bool> {
        let Some(json) = self.storage.get_item(&self.key) else {
            return Ok(false);
        };
        let draft: Draft = serde_json::from_str(&json)?;
        let restored = restore(session, &draft);
        tracing::info!("Restored {restored} field(s) from saved draft");
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }
}
