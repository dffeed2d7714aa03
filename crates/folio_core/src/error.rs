//! Submission outcome taxonomy.
//!
//! # Responsibility
//! - Enumerate every way a contact submission can fail.
//! - Map each failure kind to a stable code and a short user-facing message.
//!
//! # Invariants
//! - User-facing messages never include internal causes.
//! - `Transport` is only produced on the client side of the submit call.

use crate::model::submission::SubmissionId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of one submission attempt.
pub type SubmitResult = Result<SubmissionId, SubmitError>;

/// Failure kinds surfaced to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitError {
    /// `email` or `message` missing or not text.
    InvalidInput,
    /// `email` or `message` empty after trimming.
    MissingRequiredField,
    /// Form identifier absent from configuration.
    NotConfigured,
    /// Form identifier present but not an integer.
    InvalidConfiguration,
    /// Content store rejected or failed the write.
    PersistenceFailure,
    /// The request never produced a handler response.
    #[serde(rename = "transport_failure")]
    Transport,
}

impl SubmitError {
    /// Stable machine-readable code, used in logs and wire envelopes.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::MissingRequiredField => "missing_required_field",
            Self::NotConfigured => "not_configured",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::PersistenceFailure => "persistence_failure",
            Self::Transport => "transport_failure",
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid form data",
            Self::MissingRequiredField => "Email and message are required",
            Self::NotConfigured => "Form not configured",
            Self::InvalidConfiguration => "Invalid form configuration",
            Self::PersistenceFailure => "Failed to submit form",
            Self::Transport => "Failed to send message",
        }
    }

    /// Reverses [`SubmitError::code`]; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_input" => Some(Self::InvalidInput),
            "missing_required_field" => Some(Self::MissingRequiredField),
            "not_configured" => Some(Self::NotConfigured),
            "invalid_configuration" => Some(Self::InvalidConfiguration),
            "persistence_failure" => Some(Self::PersistenceFailure),
            "transport_failure" => Some(Self::Transport),
            _ => None,
        }
    }
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl Error for SubmitError {}

/// Wire envelope returned to the caller of a submit request.
///
/// `error` is for display; `code` is what clients branch on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl SubmissionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            code: None,
        }
    }

    pub fn failed(error: SubmitError) -> Self {
        Self {
            success: false,
            error: Some(error.user_message().to_string()),
            code: Some(error.code().to_string()),
        }
    }

    /// Failure kind named by `code`; `None` on success or for unknown codes.
    pub fn error_kind(&self) -> Option<SubmitError> {
        self.code.as_deref().and_then(SubmitError::from_code)
    }
}

impl From<&SubmitResult> for SubmissionResponse {
    fn from(value: &SubmitResult) -> Self {
        match value {
            Ok(_) => Self::ok(),
            Err(err) => Self::failed(*err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmissionResponse, SubmitError};

    const ALL: [SubmitError; 6] = [
        SubmitError::InvalidInput,
        SubmitError::MissingRequiredField,
        SubmitError::NotConfigured,
        SubmitError::InvalidConfiguration,
        SubmitError::PersistenceFailure,
        SubmitError::Transport,
    ];

    #[test]
    fn codes_are_unique_and_reversible() {
        for kind in ALL {
            assert_eq!(SubmitError::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SubmitError::from_code("nope"), None);
    }

    #[test]
    fn serde_name_matches_code() {
        for kind in ALL {
            let json = serde_json::to_value(kind).expect("serialize kind");
            assert_eq!(json, kind.code());
        }
    }

    #[test]
    fn success_envelope_omits_error_key() {
        let json = serde_json::to_string(&SubmissionResponse::ok()).expect("serialize");
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn failure_envelope_carries_user_message() {
        let response = SubmissionResponse::failed(SubmitError::MissingRequiredField);
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Email and message are required")
        );
        assert_eq!(response.error_kind(), Some(SubmitError::MissingRequiredField));
    }

    #[test]
    fn unknown_wire_code_has_no_kind() {
        let response: SubmissionResponse =
            serde_json::from_str(r#"{"success":false,"error":"Nope","code":"rate_limited"}"#)
                .expect("deserialize envelope");
        assert_eq!(response.error_kind(), None);
    }
}
