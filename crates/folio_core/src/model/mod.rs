//! Domain model for contact-form submissions.
//!
//! # Responsibility
//! - Define the raw field set received from a client (`FormData`).
//! - Define the validated, immutable `Submission` written to the store.
//! - Define registered form definitions that submissions belong to.
//!
//! # Invariants
//! - A `Submission` is only built by the submission handler after validation.
//! - Submissions are written once and never mutated afterwards.

pub mod form;
pub mod submission;
