//! Submission domain model.
//!
//! # Responsibility
//! - Represent untrusted client input as a loosely typed field map.
//! - Represent the validated record handed to the content store.
//!
//! # Invariants
//! - `submission_data` always holds `name`, `email`, `message` in that order.
//! - `email` and `message` are trimmed and non-empty.
//! - `name` is trimmed and falls back to [`ANONYMOUS_NAME`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Name stored when the sender leaves the name field blank.
pub const ANONYMOUS_NAME: &str = "Anonymous";

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const MESSAGE_FIELD: &str = "message";

/// Stable identifier assigned to every stored submission.
pub type SubmissionId = Uuid;

/// Integer key of a registered form in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub i64);

impl FormId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One value carried by a submitted form.
///
/// Browsers may post file parts under any field name, so a field being
/// present does not mean it holds text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl FormValue {
    /// Returns the text payload, or `None` for non-text parts.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::File { .. } => None,
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Raw field set as received from a client. No validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: BTreeMap<String, FormValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a text field.
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, FormValue::Text(value.into()));
        self
    }

    /// Builder-style insert of an arbitrary field value.
    pub fn with_value(mut self, name: impl Into<String>, value: FormValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: FormValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.get(name)
    }

    /// Returns the field as text; `None` when missing or not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormValue::as_text)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One `{field, value}` entry of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionField {
    pub field: String,
    pub value: String,
}

impl SubmissionField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Validated submission ready to be written to the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    form: FormId,
    submission_data: Vec<SubmissionField>,
}

impl Submission {
    /// Assembles a submission from already normalized values.
    ///
    /// Callers outside the crate go through `ContactService::submit`, which
    /// owns trimming and the anonymous-name fallback.
    pub(crate) fn new(form: FormId, name: &str, email: &str, message: &str) -> Self {
        Self {
            form,
            submission_data: vec![
                SubmissionField::new(NAME_FIELD, name),
                SubmissionField::new(EMAIL_FIELD, email),
                SubmissionField::new(MESSAGE_FIELD, message),
            ],
        }
    }

    pub fn form(&self) -> FormId {
        self.form
    }

    pub fn submission_data(&self) -> &[SubmissionField] {
        &self.submission_data
    }

    pub fn name(&self) -> &str {
        self.field_value(NAME_FIELD)
    }

    pub fn email(&self) -> &str {
        self.field_value(EMAIL_FIELD)
    }

    pub fn message(&self) -> &str {
        self.field_value(MESSAGE_FIELD)
    }

    fn field_value(&self, field: &str) -> &str {
        self.submission_data
            .iter()
            .find(|entry| entry.field == field)
            .map_or("", |entry| entry.value.as_str())
    }
}
