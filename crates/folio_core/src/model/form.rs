//! Registered form definitions.
//!
//! A submission's form identifier points at one of these rows.

use super::submission::FormId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A stored form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub title: String,
    /// Message shown to senders after a successful submission, if any.
    pub confirmation_message: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Input for registering a new form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForm {
    pub title: String,
    pub confirmation_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidationError {
    EmptyTitle,
}

impl Display for FormValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "form title cannot be empty"),
        }
    }
}

impl Error for FormValidationError {}

impl NewForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            confirmation_message: None,
        }
    }

    pub fn with_confirmation_message(mut self, message: impl Into<String>) -> Self {
        self.confirmation_message = Some(message.into());
        self
    }

    /// Returns a copy with trimmed text, blank confirmation dropped.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            confirmation_message: self
                .confirmation_message
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }

    pub fn validate(&self) -> Result<(), FormValidationError> {
        if self.title.trim().is_empty() {
            return Err(FormValidationError::EmptyTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FormValidationError, NewForm};

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            NewForm::new("   ").validate(),
            Err(FormValidationError::EmptyTitle)
        );
    }

    #[test]
    fn normalized_trims_and_drops_blank_confirmation() {
        let form = NewForm::new("  Contact  ").with_confirmation_message("  ");
        let normalized = form.normalized();
        assert_eq!(normalized.title, "Contact");
        assert_eq!(normalized.confirmation_message, None);
    }
}
