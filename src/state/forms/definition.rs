//! Declarative form layout: steps and their fields
//!
//! The built-in definition is the website project request form. A custom
//! definition can be supplied as JSON through the config file.

use super::field::{ChoiceOption, FieldKind, FormField};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDefinition {
    fn new(name: &str, label: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required,
            options: Vec::new(),
            placeholder: None,
        }
    }

    fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(value, label)| ChoiceOption::new(value, label))
            .collect();
        self
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn build(&self) -> FormField {
        let mut field = FormField::new(&self.name, &self.label, self.kind)
            .with_options(self.options.clone())
            .with_placeholder(self.placeholder.clone());
        field.required = self.required;
        field
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    pub steps: Vec<StepDefinition>,
}

impl FormDefinition {
    /// Load and check a definition from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form definition {}", path.display()))?;
        let definition: FormDefinition = serde_json::from_str(&content)
            .with_context(|| format!("Invalid form definition {}", path.display()))?;
        definition.check()?;
        Ok(definition)
    }

    /// Reject definitions the step controller cannot drive
    pub fn check(&self) -> Result<()> {
        if self.steps.is_empty() {
            bail!("Form definition has no steps");
        }
        let mut names = HashSet::new();
        for step in &self.steps {
            for field in &step.fields {
                if !names.insert(field.name.as_str()) {
                    bail!("Duplicate field name '{}'", field.name);
                }
                if field.kind.is_choice() && field.options.is_empty() {
                    bail!("Field '{}' needs at least one option", field.name);
                }
            }
        }
        Ok(())
    }

    /// The website project request form
    pub fn project_request() -> Self {
        use FieldKind::*;

        Self {
            title: "Start Your Project".to_string(),
            steps: vec![
                StepDefinition {
                    title: "About You".to_string(),
                    subtitle: Some("Tell us who we'll be working with".to_string()),
                    fields: vec![
                        FieldDefinition::new("full_name", "Full Name", Text, true),
                        FieldDefinition::new("email", "Email Address", Email, true)
                            .placeholder("you@company.com"),
                        FieldDefinition::new("phone", "Phone Number", Tel, false),
                        FieldDefinition::new("company_name", "Company Name", Text, true),
                    ],
                },
                StepDefinition {
                    title: "Your Project".to_string(),
                    subtitle: Some("What are we building?".to_string()),
                    fields: vec![
                        FieldDefinition::new("website_type", "Website Type", Radio, true).options(&[
                            ("business", "Business Website"),
                            ("ecommerce", "E-commerce Store"),
                            ("portfolio", "Portfolio"),
                            ("landing", "Landing Page"),
                        ]),
                        FieldDefinition::new("features", "Features", Checkbox, false).options(&[
                            ("contact_form", "Contact Form"),
                            ("booking", "Online Booking"),
                            ("blog", "Blog"),
                            ("seo", "SEO Optimization"),
                            ("analytics", "Analytics"),
                        ]),
                        FieldDefinition::new("budget", "Budget", Select, true).options(&[
                            ("under_1k", "Under $1,000"),
                            ("1k_5k", "$1,000 - $5,000"),
                            ("5k_10k", "$5,000 - $10,000"),
                            ("over_10k", "Over $10,000"),
                        ]),
                    ],
                },
                StepDefinition {
                    title: "Branding".to_string(),
                    subtitle: Some("Help us match your identity".to_string()),
                    fields: vec![
                        FieldDefinition::new("company_logo", "Company Logo", File, false),
                        FieldDefinition::new("brand_colors", "Brand Colors", Text, false)
                            .placeholder("#667eea, #764ba2"),
                        FieldDefinition::new("design_notes", "Design Preferences", Textarea, false),
                    ],
                },
                StepDefinition {
                    title: "Timeline & Details".to_string(),
                    subtitle: Some("Last step".to_string()),
                    fields: vec![
                        FieldDefinition::new("timeline", "Timeline", Select, true).options(&[
                            ("asap", "As soon as possible"),
                            ("1_month", "Within a month"),
                            ("3_months", "Within 3 months"),
                            ("flexible", "Flexible"),
                        ]),
                        FieldDefinition::new(
                            "project_description",
                            "Project Description",
                            Textarea,
                            true,
                        ),
                    ],
                },
            ],
        }
    }
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self::project_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_definition_passes_check() {
        let definition = FormDefinition::default();
        assert!(definition.check().is_ok());
        assert_eq!(definition.steps.len(), 4);
    }

    #[test]
    fn test_empty_steps_rejected() {
        let definition = FormDefinition {
            title: "Empty".to_string(),
            steps: vec![],
        };
        assert!(definition.check().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"{
            "title": "Dup",
            "steps": [
                {"title": "One", "fields": [{"name": "a", "label": "A"}]},
                {"title": "Two", "fields": [{"name": "a", "label": "A again"}]}
            ]
        }"#;
        let definition: FormDefinition = serde_json::from_str(json).unwrap();
        let err = definition.check().unwrap_err();
        assert!(err.to_string().contains("Duplicate field name"));
    }

    #[test]
    fn test_choice_without_options_rejected() {
        let json = r#"{
            "title": "Choice",
            "steps": [{"title": "One", "fields": [{"name": "pick", "label": "Pick", "type": "radio"}]}]
        }"#;
        let definition: FormDefinition = serde_json::from_str(json).unwrap();
        assert!(definition.check().is_err());
    }

    #[test]
    fn test_deserialize_defaults_type_and_required() {
        let json = r#"{
            "title": "Minimal",
            "steps": [{"title": "One", "fields": [
                {"name": "email", "label": "Email", "type": "email", "required": true},
                {"name": "note", "label": "Note"}
            ]}]
        }"#;
        let definition: FormDefinition = serde_json::from_str(json).unwrap();
        let fields = &definition.steps[0].fields;
        assert_eq!(fields[0].kind, FieldKind::Email);
        assert!(fields[0].required);
        assert_eq!(fields[1].kind, FieldKind::Text);
        assert!(!fields[1].required);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        let json = serde_json::to_string(&FormDefinition::default()).unwrap();
        fs::write(&path, json).unwrap();

        let loaded = FormDefinition::load(&path).unwrap();
        assert_eq!(loaded.title, "Start Your Project");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = FormDefinition::load(Path::new("/definitely/not/here.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_carries_required_and_options() {
        let definition = FormDefinition::default();
        let field = definition.steps[1].fields[0].build();
        assert!(field.required);
        assert_eq!(field.options.len(), 4);
        assert_eq!(field.kind, FieldKind::Radio);
    }
}
