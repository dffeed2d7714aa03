//! Process configuration sourced from the environment.
//!
//! # Responsibility
//! - Read the contact form identifier, database path and logging settings.
//! - Resolve the form identifier into a [`FormId`] for the handler.
//!
//! # Invariants
//! - Configuration is read once by the embedding process and then passed
//!   explicitly; the handler never reads the environment itself.
//! - An empty or unset form identifier is "not configured"; anything else
//!   that does not parse is "invalid configuration".

use crate::error::SubmitError;
use crate::logging::default_log_level;
use crate::model::submission::FormId;
use std::path::PathBuf;

pub const CONTACT_FORM_ID_ENV: &str = "FOLIO_CONTACT_FORM_ID";
pub const DB_PATH_ENV: &str = "FOLIO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "FOLIO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "FOLIO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "folio.sqlite3";

/// Settings consumed by the submission handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactConfig {
    /// Raw form identifier exactly as configured.
    pub form_id: Option<String>,
}

impl ContactConfig {
    pub fn new(form_id: Option<String>) -> Self {
        Self {
            form_id: form_id.filter(|value| !value.is_empty()),
        }
    }

    /// Convenience for tests and fixed deployments.
    pub fn with_form_id(form_id: impl Into<String>) -> Self {
        Self::new(Some(form_id.into()))
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(CONTACT_FORM_ID_ENV))
    }

    /// Resolves the configured identifier.
    ///
    /// # Errors
    /// - `NotConfigured` when no identifier is set.
    /// - `InvalidConfiguration` when the identifier has no leading integer.
    pub fn resolve_form_id(&self) -> Result<FormId, SubmitError> {
        let raw = self
            .form_id
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(SubmitError::NotConfigured)?;
        parse_leading_integer(raw)
            .map(FormId)
            .ok_or(SubmitError::InvalidConfiguration)
    }
}

/// Whole-process settings for the CLI and FFI front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub contact: ContactConfig,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        Self {
            contact: ContactConfig::from_lookup(&lookup),
            db_path,
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV),
        }
    }
}

/// Parses a base-10 integer prefix.
///
/// Leading whitespace and one sign character are accepted, parsing stops at
/// the first non-digit. Returns `None` when no digit is found or the value
/// overflows `i64`.
fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let magnitude = &rest[..digit_len];
    if negative {
        format!("-{magnitude}").parse().ok()
    } else {
        magnitude.parse().ok()
    }
}
