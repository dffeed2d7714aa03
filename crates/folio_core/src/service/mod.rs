//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and store calls into use-case level APIs.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod contact_service;
