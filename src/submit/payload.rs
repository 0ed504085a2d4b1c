//! Submission payload assembled from the form session

use crate::state::{AttachedFile, FieldKind, FieldValue, FormSession};
use chrono::{DateTime, SecondsFormat, Utc};

/// Name of the timestamp entry appended to every submission
pub const SUBMISSION_DATE_FIELD: &str = "submission_date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    Text(String),
    File(AttachedFile),
}

/// Ordered multipart entries; a name may repeat (checkbox groups)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    entries: Vec<(String, PayloadValue)>,
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`
pub fn format_submission_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Payload {
    /// Collect every field the way a browser form would submit it, then
    /// append the submission timestamp
    pub fn from_session(session: &FormSession, submitted_at: DateTime<Utc>) -> Self {
        let mut payload = Self::default();
        for field in session.fields() {
            match (&field.value, field.kind) {
                (FieldValue::Text(text), _) => payload.push_text(&field.name, text.clone()),
                (FieldValue::Choices(values), FieldKind::Select) => payload.push_text(
                    &field.name,
                    values.first().cloned().unwrap_or_default(),
                ),
                (FieldValue::Choices(values), _) => {
                    for value in values {
                        payload.push_text(&field.name, value.clone());
                    }
                }
                (FieldValue::File(input), _) => {
                    if let Some(file) = &input.selected {
                        payload
                            .entries
                            .push((field.name.clone(), PayloadValue::File(file.clone())));
                    }
                }
            }
        }
        payload.push_text(SUBMISSION_DATE_FIELD, format_submission_date(submitted_at));
        payload
    }

    pub fn push_text(&mut self, name: &str, value: String) {
        self.entries
            .push((name.to_string(), PayloadValue::Text(value)));
    }

    pub fn into_entries(self) -> Vec<(String, PayloadValue)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
impl Payload {
    pub fn entries(&self) -> &[(String, PayloadValue)] {
        &self.entries
    }

    /// First text value for a name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts(name).into_iter().next()
    }

    /// All text values for a name, in order
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, v)| match v {
                PayloadValue::Text(text) => Some(text.as_str()),
                PayloadValue::File(_) => None,
            })
            .collect()
    }

    pub fn file(&self, name: &str) -> Option<&AttachedFile> {
        self.entries.iter().find_map(|(n, v)| match v {
            PayloadValue::File(file) if n == name => Some(file),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::fill_valid;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_submission_date_format() {
        assert_eq!(format_submission_date(submitted_at()), "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn test_timestamp_appended_last() {
        let payload = Payload::from_session(&FormSession::default(), submitted_at());
        let (name, value) = payload.entries().last().unwrap();
        assert_eq!(name, SUBMISSION_DATE_FIELD);
        assert_eq!(value, &PayloadValue::Text("2024-05-01T09:30:00.000Z".to_string()));
    }

    #[test]
    fn test_checkbox_values_repeat_under_one_name() {
        let mut session = FormSession::default();
        fill_valid(&mut session);
        let features = session.field_mut("features").unwrap();
        features.check_option("seo");
        features.check_option("contact_form");

        let payload = Payload::from_session(&session, submitted_at());
        assert_eq!(payload.texts("features"), vec!["contact_form", "seo"]);
        assert_eq!(payload.text("website_type"), Some("ecommerce"));
        assert_eq!(payload.text("email"), Some("jane@example.com"));
    }

    #[test]
    fn test_empty_text_fields_still_sent() {
        let payload = Payload::from_session(&FormSession::default(), submitted_at());
        assert_eq!(payload.text("phone"), Some(""));
        assert_eq!(payload.text("budget"), Some(""));
        assert!(payload.texts("features").is_empty());
    }

    #[test]
    fn test_attached_file_becomes_file_entry() {
        let mut session = FormSession::default();
        let file = AttachedFile {
            path: PathBuf::from("/tmp/logo.png"),
            file_name: "logo.png".to_string(),
            mime: "image/png".to_string(),
            size: 3,
        };
        session.attach_file("company_logo", file.clone());

        let payload = Payload::from_session(&session, submitted_at());
        assert_eq!(payload.file("company_logo"), Some(&file));
        assert!(payload.text("company_logo").is_none());
    }

    #[test]
    fn test_no_file_entry_without_selection() {
        let payload = Payload::from_session(&FormSession::default(), submitted_at());
        assert!(payload.file("company_logo").is_none());
    }
}
