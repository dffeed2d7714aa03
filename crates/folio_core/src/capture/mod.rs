//! Client-side form capture.
//!
//! # Responsibility
//! - Hold what the sender typed and drive one submit round trip.
//! - Model the call to the submission handler as an explicit transport.

pub mod contact_form;
