//! Contact form state and submit flow.
//!
//! # Responsibility
//! - Collect `name`, `email`, `message` without applying business rules.
//! - Send the raw field set through a [`SubmitTransport`].
//! - Turn the response into a user notification.
//!
//! # Invariants
//! - At most one request is in flight per form; extra submits are ignored.
//! - Fields are cleared only after a successful response.
//! - There is no automatic retry.

use crate::config::ContactConfig;
use crate::error::{SubmissionResponse, SubmitError};
use crate::model::submission::{FormData, EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD};
use crate::service::contact_service::ContactService;
use crate::store::SubmissionStore;
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const SUCCESS_NOTICE: &str = "Message sent successfully!";
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again.";
pub const TRANSPORT_FAILURE_NOTICE: &str = "Failed to send message.";

/// The request did not reach the handler or its reply was lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport failure: {}", self.message)
    }
}

impl Error for TransportError {}

/// Channel between the form and the submission handler.
pub trait SubmitTransport {
    fn send(&self, form: &FormData) -> Result<SubmissionResponse, TransportError>;
}

/// Transport that calls the handler in process.
pub struct LocalTransport<S: SubmissionStore> {
    service: ContactService<S>,
    config: ContactConfig,
}

impl<S: SubmissionStore> LocalTransport<S> {
    pub fn new(service: ContactService<S>, config: ContactConfig) -> Self {
        Self { service, config }
    }
}

impl<S: SubmissionStore> SubmitTransport for LocalTransport<S> {
    fn send(&self, form: &FormData) -> Result<SubmissionResponse, TransportError> {
        let result = self.service.submit(form, &self.config);
        Ok(SubmissionResponse::from(&result))
    }
}

/// Feedback shown to the sender after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(&'static str),
    Error(&'static str),
}

impl Notification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Success(text) | Self::Error(text) => *text,
        }
    }
}

/// Folds a transport result into one success/failure outcome.
///
/// Handler failures keep the kind named by the envelope's `code`; a missing
/// or unrecognized code is reported as `PersistenceFailure`.
pub fn outcome(reply: &Result<SubmissionResponse, TransportError>) -> Result<(), SubmitError> {
    match reply {
        Ok(response) if response.success => Ok(()),
        Ok(response) => Err(response
            .error_kind()
            .unwrap_or(SubmitError::PersistenceFailure)),
        Err(_) => Err(SubmitError::Transport),
    }
}

/// Contact form as seen by the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    submitting: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is outstanding; the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Label for the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Sending..."
        } else {
            "Send Message"
        }
    }

    /// Starts a submission and snapshots the typed fields.
    ///
    /// Returns `None` while a previous request is still in flight.
    pub fn begin_submission(&mut self) -> Option<FormData> {
        if self.submitting {
            warn!("event=contact_form_submit module=capture status=ignored reason=in_flight");
            return None;
        }
        self.submitting = true;
        Some(
            FormData::new()
                .with_text(NAME_FIELD, self.name.as_str())
                .with_text(EMAIL_FIELD, self.email.as_str())
                .with_text(MESSAGE_FIELD, self.message.as_str()),
        )
    }

    /// Finishes the in-flight submission and returns the notification.
    pub fn complete_submission(
        &mut self,
        reply: Result<SubmissionResponse, TransportError>,
    ) -> Notification {
        self.submitting = false;
        match reply {
            Ok(response) if response.success => {
                self.clear();
                Notification::Success(SUCCESS_NOTICE)
            }
            Ok(_) => Notification::Error(FAILURE_NOTICE),
            Err(err) => {
                error!(
                    "event=contact_form_submit module=capture status=error error_code={} error={err}",
                    SubmitError::Transport.code()
                );
                Notification::Error(TRANSPORT_FAILURE_NOTICE)
            }
        }
    }

    /// Runs one full round trip. `None` when a request is already in flight.
    pub fn submit(&mut self, transport: &impl SubmitTransport) -> Option<Notification> {
        let form = self.begin_submission()?;
        let reply = transport.send(&form);
        Some(self.complete_submission(reply))
    }

    fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }
}
