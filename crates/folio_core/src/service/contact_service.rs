//! Contact-form submission handler.
//!
//! # Responsibility
//! - Validate and normalize raw contact form input.
//! - Resolve the target form from injected configuration.
//! - Write exactly one submission to the content store.
//!
//! # Invariants
//! - Checks run in a fixed order and the first failure decides the outcome.
//! - The store is never called unless email and message are non-empty after
//!   trimming and the form identifier resolved.
//! - Store errors are logged and reported as `PersistenceFailure` only.
//! - Log events carry metadata only, never field values.

use crate::config::ContactConfig;
use crate::error::{SubmitError, SubmitResult};
use crate::model::submission::{
    FormData, Submission, ANONYMOUS_NAME, EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD,
};
use crate::store::{SubmissionStore, FORM_SUBMISSIONS_COLLECTION};
use log::{error, info, warn};
use std::time::Instant;

/// Runs the input and configuration checks and builds the submission.
///
/// Touches no storage, so callers can reject bad requests before opening
/// the content store.
///
/// # Errors
/// `InvalidInput`, `MissingRequiredField`, `NotConfigured` or
/// `InvalidConfiguration`, whichever check fails first.
pub fn prepare_submission(
    form: &FormData,
    config: &ContactConfig,
) -> Result<Submission, SubmitError> {
    let prepared = build_submission(form, config);
    if let Err(err) = &prepared {
        warn!(
            "event=contact_submit module=service status=rejected error_code={}",
            err.code()
        );
    }
    prepared
}

fn build_submission(form: &FormData, config: &ContactConfig) -> Result<Submission, SubmitError> {
    let (Some(email), Some(message)) = (form.text(EMAIL_FIELD), form.text(MESSAGE_FIELD)) else {
        return Err(SubmitError::InvalidInput);
    };

    let email = email.trim();
    let message = message.trim();
    let name = form.text(NAME_FIELD).map_or("", str::trim);

    if email.is_empty() || message.is_empty() {
        return Err(SubmitError::MissingRequiredField);
    }

    let name = if name.is_empty() { ANONYMOUS_NAME } else { name };
    let form_id = config.resolve_form_id()?;

    Ok(Submission::new(form_id, name, email, message))
}

/// Stateless submission handler over a content store.
pub struct ContactService<S: SubmissionStore> {
    store: S,
}

impl<S: SubmissionStore> ContactService<S> {
    /// Creates a service writing to the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Handles one contact submission.
    ///
    /// Returns the stored submission id on success. Every failure is one of
    /// the [`SubmitError`] kinds; `SubmitError::Transport` is never returned.
    pub fn submit(&self, form: &FormData, config: &ContactConfig) -> SubmitResult {
        let submission = prepare_submission(form, config)?;
        self.persist(&submission)
    }

    /// Writes an already prepared submission with one store call.
    ///
    /// Store errors are logged and collapse into `PersistenceFailure`.
    pub fn persist(&self, submission: &Submission) -> SubmitResult {
        let started_at = Instant::now();
        let form_id = submission.form();

        match self.store.create_submission(submission) {
            Ok(id) => {
                info!(
                    "event=contact_submit module=service status=ok submission_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=contact_submit module=service status=error collection={FORM_SUBMISSIONS_COLLECTION} form_id={form_id} error_code={} error={err}",
                    SubmitError::PersistenceFailure.code()
                );
                Err(SubmitError::PersistenceFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{prepare_submission, ContactService};
    use crate::config::ContactConfig;
    use crate::error::SubmitError;
    use crate::model::submission::{FormData, FormId, FormValue, Submission, SubmissionId};
    use crate::store::{StoreError, StoreResult, SubmissionStore};
    use std::cell::RefCell;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingStore {
        written: RefCell<Vec<Submission>>,
    }

    impl SubmissionStore for RecordingStore {
        fn create_submission(&self, submission: &Submission) -> StoreResult<SubmissionId> {
            self.written.borrow_mut().push(submission.clone());
            Ok(Uuid::new_v4())
        }
    }

    fn form(name: &str, email: &str, message: &str) -> FormData {
        FormData::new()
            .with_text("name", name)
            .with_text("email", email)
            .with_text("message", message)
    }

    #[test]
    fn missing_email_is_invalid_input() {
        let store = RecordingStore::default();
        let service = ContactService::new(&store);
        let input = FormData::new().with_text("message", "Hi");

        let result = service.submit(&input, &ContactConfig::with_form_id("3"));
        assert_eq!(result, Err(SubmitError::InvalidInput));
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn file_message_is_invalid_input() {
        let store = RecordingStore::default();
        let service = ContactService::new(&store);
        let input = FormData::new().with_text("email", "a@b.com").with_value(
            "message",
            FormValue::File {
                file_name: "m.txt".to_string(),
                bytes: b"hello".to_vec(),
            },
        );

        let result = service.submit(&input, &ContactConfig::with_form_id("3"));
        assert_eq!(result, Err(SubmitError::InvalidInput));
    }

    #[test]
    fn input_checks_run_before_config_checks() {
        let store = RecordingStore::default();
        let service = ContactService::new(&store);

        let result = service.submit(&form("Sam", "  ", "Hi"), &ContactConfig::default());
        assert_eq!(result, Err(SubmitError::MissingRequiredField));
    }

    #[test]
    fn non_text_name_falls_back_to_anonymous() {
        let store = RecordingStore::default();
        let service = ContactService::new(&store);
        let input = form("ignored", "a@b.com", "Hello").with_value(
            "name",
            FormValue::File {
                file_name: "n.bin".to_string(),
                bytes: Vec::new(),
            },
        );

        service
            .submit(&input, &ContactConfig::with_form_id("3"))
            .expect("submission should succeed");
        let written = store.written.borrow();
        assert_eq!(written[0].name(), "Anonymous");
        assert_eq!(written[0].form(), FormId(3));
    }

    #[test]
    fn store_error_becomes_persistence_failure() {
        struct FailingStore;
        impl SubmissionStore for FailingStore {
            fn create_submission(&self, _: &Submission) -> StoreResult<SubmissionId> {
                Err(StoreError::InvalidData("disk on fire".to_string()))
            }
        }

        let service = ContactService::new(FailingStore);
        let err = service
            .submit(&form("Sam", "sam@x.com", "Hi"), &ContactConfig::with_form_id("3"))
            .expect_err("store failure must fail the submission");
        assert_eq!(err, SubmitError::PersistenceFailure);
        assert!(!err.to_string().contains("disk on fire"));
    }

    #[test]
    fn prepare_submission_normalizes_without_a_store() {
        let submission = prepare_submission(
            &form("", " a@b.com ", " Hello "),
            &ContactConfig::with_form_id("3"),
        )
        .expect("valid input should prepare");
        assert_eq!(submission.form(), FormId(3));
        assert_eq!(submission.name(), "Anonymous");
        assert_eq!(submission.email(), "a@b.com");
        assert_eq!(submission.message(), "Hello");
    }

    #[test]
    fn prepare_submission_checks_input_before_config() {
        let input = FormData::new().with_text("message", "Hi");
        assert_eq!(
            prepare_submission(&input, &ContactConfig::default()),
            Err(SubmitError::InvalidInput)
        );
    }
}
