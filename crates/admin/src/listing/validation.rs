//! Declarative form validation.
//!
//! Each entity describes its form as a slice of [`FieldSpec`]s. Submitting a
//! [`FormDraft`] checks every field against its definition and, when all pass,
//! builds the JSON payload sent to the backend. Nothing reaches the network
//! while any field is invalid.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use jatim_bissa_core::Email;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Whether the form creates a record or edits record `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    #[must_use]
    pub const fn is_create(self) -> bool {
        matches!(self, Self::Create)
    }
}

/// How a field is entered and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Multi-line text.
    TextArea,
    Email,
    /// Never echoed back into the form. Blank values are left out of the
    /// payload.
    Password,
    /// Non-negative integer.
    Number,
    /// `YYYY-MM-DD`.
    Date,
    /// One of the listed `(value, label)` options.
    Select(&'static [(&'static str, &'static str)]),
}

/// When a field must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Required {
    Never,
    Always,
    OnCreate,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: Required,
    /// Set on create only; left out of update payloads.
    pub immutable: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: Required::Never,
            immutable: false,
        }
    }

    #[must_use]
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    #[must_use]
    pub const fn text_area(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::TextArea)
    }

    #[must_use]
    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    #[must_use]
    pub const fn password(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    #[must_use]
    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    #[must_use]
    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    #[must_use]
    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = Required::Always;
        self
    }

    #[must_use]
    pub const fn required_on_create(mut self) -> Self {
        self.required = Required::OnCreate;
        self
    }

    #[must_use]
    pub const fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Whether the field must be filled in for `mode`.
    #[must_use]
    pub const fn is_required(&self, mode: FormMode) -> bool {
        match self.required {
            Required::Never => false,
            Required::Always => true,
            Required::OnCreate => mode.is_create(),
        }
    }

    /// Whether the field is shown and submitted for `mode`.
    #[must_use]
    pub const fn is_editable(&self, mode: FormMode) -> bool {
        !self.immutable || mode.is_create()
    }

    /// Check one raw value. `Ok(None)` leaves the field out of the payload.
    fn check(&self, raw: &str, mode: FormMode) -> Result<Option<Value>, String> {
        let value = raw.trim();

        if value.is_empty() {
            if self.is_required(mode) {
                return Err(format!("{} is required", self.label));
            }
            return Ok(match self.kind {
                FieldKind::Password => None,
                _ => Some(Value::Null),
            });
        }

        let checked = match self.kind {
            FieldKind::Text | FieldKind::TextArea => Value::String(value.to_owned()),
            FieldKind::Email => Email::parse(value)
                .map(|email| Value::String(email.into_inner()))
                .map_err(|_| "Enter a valid email address".to_string())?,
            FieldKind::Password => {
                if raw.chars().count() < MIN_PASSWORD_LEN {
                    return Err(format!(
                        "{} must be at least {MIN_PASSWORD_LEN} characters long",
                        self.label
                    ));
                }
                Value::String(raw.to_owned())
            }
            FieldKind::Number => value
                .parse::<u64>()
                .map(Value::from)
                .map_err(|_| format!("{} must be a whole number", self.label))?,
            FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", self.label))?,
            FieldKind::Select(options) => options
                .iter()
                .find(|(option, _)| option.eq_ignore_ascii_case(value))
                .map(|(option, _)| Value::String((*option).to_owned()))
                .ok_or_else(|| {
                    let allowed: Vec<&str> = options.iter().map(|(option, _)| *option).collect();
                    format!("{} must be one of: {}", self.label, allowed.join(", "))
                })?,
        };

        Ok(Some(checked))
    }
}

/// Raw form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormDraft(BTreeMap<String, String>);

impl FormDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or `""` when unset.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_owned(), value.into());
    }

    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Copy with password fields blanked, safe to render back into a form.
    #[must_use]
    pub fn redacted(&self, fields: &[FieldSpec]) -> Self {
        let mut copy = self.clone();
        for field in fields.iter().filter(|f| f.kind == FieldKind::Password) {
            copy.0.remove(field.name);
        }
        copy
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormDraft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-field validation messages, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`; the first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Validate `draft` against `fields` and build the payload.
///
/// Blank optional fields are sent as `null`, blank passwords and immutable
/// fields on update are left out entirely.
///
/// # Errors
///
/// Returns every failing field's message.
pub fn build_payload(
    fields: &[FieldSpec],
    draft: &FormDraft,
    mode: FormMode,
) -> Result<Value, ValidationErrors> {
    let mut payload = Map::new();
    let mut errors = ValidationErrors::new();

    for field in fields.iter().filter(|f| f.is_editable(mode)) {
        match field.check(draft.get(field.name), mode) {
            Ok(Some(value)) => {
                payload.insert(field.name.to_owned(), value);
            }
            Ok(None) => {}
            Err(message) => errors.add(field.name, message),
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(payload))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const STATUS: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::email("email", "Email").required().immutable(),
        FieldSpec::password("password", "Password").required_on_create(),
        FieldSpec::text("phone", "Phone"),
        FieldSpec::number("regency_id", "Regency"),
        FieldSpec::date("deadline", "Deadline"),
        FieldSpec::select("status", "Status", STATUS).required(),
    ];

    fn valid_draft() -> FormDraft {
        FormDraft::new()
            .with("name", " Budi Santoso ")
            .with("email", "Budi@Example.com")
            .with("password", "rahasia123")
            .with("status", "Active")
    }

    #[test]
    fn test_create_payload() {
        let payload = build_payload(FIELDS, &valid_draft(), FormMode::Create).unwrap();
        assert_eq!(
            payload,
            json!({
                "name": "Budi Santoso",
                "email": "budi@example.com",
                "password": "rahasia123",
                "phone": null,
                "regency_id": null,
                "deadline": null,
                "status": "active",
            })
        );
    }

    #[test]
    fn test_update_with_blank_password_omits_key() {
        let draft = valid_draft().with("password", "");
        let payload = build_payload(FIELDS, &draft, FormMode::Edit(7)).unwrap();
        let object = payload.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("email"), "immutable on update");
        assert_eq!(object["name"], "Budi Santoso");
    }

    #[test]
    fn test_create_requires_password() {
        let draft = valid_draft().with("password", "  ");
        let errors = build_payload(FIELDS, &draft, FormMode::Create).unwrap_err();
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_short_password_rejected() {
        let draft = valid_draft().with("password", "pendek");
        let errors = build_payload(FIELDS, &draft, FormMode::Edit(1)).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_collects_every_failure() {
        let draft = FormDraft::new()
            .with("email", "not-an-email")
            .with("regency_id", "35.78")
            .with("deadline", "31/12/2025")
            .with("status", "archived");
        let errors = build_payload(FIELDS, &draft, FormMode::Create).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert_eq!(errors.get("regency_id"), Some("Regency must be a whole number"));
        assert_eq!(
            errors.get("deadline"),
            Some("Deadline must be a date (YYYY-MM-DD)")
        );
        assert_eq!(
            errors.get("status"),
            Some("Status must be one of: active, inactive")
        );
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_numbers_and_dates_are_typed() {
        let draft = valid_draft()
            .with("regency_id", "3578")
            .with("deadline", "2025-12-31");
        let payload = build_payload(FIELDS, &draft, FormMode::Create).unwrap();
        assert_eq!(payload["regency_id"], json!(3578));
        assert_eq!(payload["deadline"], json!("2025-12-31"));
    }

    #[test]
    fn test_redacted_drops_passwords() {
        let draft = valid_draft().redacted(FIELDS);
        assert_eq!(draft.get("password"), "");
        assert_eq!(draft.get("name"), " Budi Santoso ");
    }
}
