//! Core logic for the Folio contact pipeline.
//! This crate is the single source of truth for submission invariants.

pub mod capture;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use capture::contact_form::{
    ContactForm, LocalTransport, Notification, SubmitTransport, TransportError,
};
pub use config::{AppConfig, ContactConfig};
pub use error::{SubmissionResponse, SubmitError, SubmitResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config};
pub use model::form::{Form, FormValidationError, NewForm};
pub use model::submission::{
    FormData, FormId, FormValue, Submission, SubmissionField, SubmissionId, ANONYMOUS_NAME,
};
pub use service::contact_service::{prepare_submission, ContactService};
pub use store::{
    SqliteContentStore, StoreError, StoreResult, StoredSubmission, SubmissionListQuery,
    SubmissionStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
