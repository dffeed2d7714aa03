//! Content store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the single write capability the submission handler depends on.
//! - Keep SQL details for forms and submissions inside the persistence
//!   boundary.
//!
//! # Invariants
//! - A submission is written atomically with all of its field entries, or not
//!   at all.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod content_store;

pub use content_store::{
    SqliteContentStore, StoreError, StoreResult, StoredSubmission, SubmissionListQuery,
    SubmissionStore, FORMS_COLLECTION, FORM_SUBMISSIONS_COLLECTION,
};
