//! FFI use-case API for the site front end.
//!
//! # Responsibility
//! - Expose the contact submit call to Dart via FRB.
//! - Act as the server side of the form's submit transport.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failure envelopes carry a stable code and a short user-facing message,
//!   never an internal error description.

use folio_core::db::open_db;
use folio_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, prepare_submission, AppConfig, ContactService,
    FormData, FormValue, NewForm, SqliteContentStore, SubmitError,
};
use log::{error, warn};
use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for a contact submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmitResponse {
    /// Whether the submission was stored.
    pub ok: bool,
    /// Stable failure code (`missing_required_field`, ...), `None` on success.
    pub error_code: Option<String>,
    /// Short user-facing message; empty on success.
    pub message: String,
}

impl ContactSubmitResponse {
    fn success() -> Self {
        Self {
            ok: true,
            error_code: None,
            message: String::new(),
        }
    }

    fn failure(error: SubmitError) -> Self {
        Self {
            ok: false,
            error_code: Some(error.code().to_string()),
            message: error.user_message().to_string(),
        }
    }
}

/// Result envelope for registering a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCreateResponse {
    pub ok: bool,
    pub form_id: Option<i64>,
    pub message: String,
}

/// Submits the contact form.
///
/// `None` models a field the browser did not send at all; the handler
/// treats it differently from an empty string.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Configuration is read from the environment on first call only.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_submit(
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
) -> ContactSubmitResponse {
    submit_with_config(app_config(), name, email, message)
}

/// Registers a new form and returns its identifier.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_form_create(
    title: String,
    confirmation_message: Option<String>,
) -> FormCreateResponse {
    create_form_with_config(app_config(), title, confirmation_message)
}

fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(|| {
        let config = AppConfig::from_env();
        if let Err(err) = init_logging_from_config(&config) {
            warn!("event=ffi_init module=ffi status=error error={err}");
        }
        config
    })
}

fn submit_with_config(
    config: &AppConfig,
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
) -> ContactSubmitResponse {
    let form = to_form_data(name, email, message);
    let submission = match prepare_submission(&form, &config.contact) {
        Ok(submission) => submission,
        Err(err) => return ContactSubmitResponse::failure(err),
    };

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=contact_submit module=ffi status=error error_code={} error={err}",
                SubmitError::PersistenceFailure.code()
            );
            return ContactSubmitResponse::failure(SubmitError::PersistenceFailure);
        }
    };

    let store = SqliteContentStore::new(&conn);
    match ContactService::new(&store).persist(&submission) {
        Ok(_) => ContactSubmitResponse::success(),
        Err(err) => ContactSubmitResponse::failure(err),
    }
}

fn create_form_with_config(
    config: &AppConfig,
    title: String,
    confirmation_message: Option<String>,
) -> FormCreateResponse {
    let new_form = NewForm {
        title,
        confirmation_message,
    };
    let created = open_db(&config.db_path)
        .map_err(|err| format!("form DB open failed: {err}"))
        .and_then(|conn| {
            SqliteContentStore::new(&conn)
                .create_form(&new_form)
                .map_err(|err| err.to_string())
        });

    match created {
        Ok(id) => FormCreateResponse {
            ok: true,
            form_id: Some(id.get()),
            message: "Form created.".to_string(),
        },
        Err(err) => FormCreateResponse {
            ok: false,
            form_id: None,
            message: format!("contact_form_create failed: {err}"),
        },
    }
}

fn to_form_data(
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
) -> FormData {
    let mut form = FormData::new();
    for (field, value) in [("name", name), ("email", email), ("message", message)] {
        if let Some(value) = value {
            form.insert(field, FormValue::Text(value));
        }
    }
    form
}
