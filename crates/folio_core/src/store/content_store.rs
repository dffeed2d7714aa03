//! Form and submission persistence over SQLite.
//!
//! # Responsibility
//! - Implement [`SubmissionStore`] for the submission handler.
//! - Provide operator paths: register forms, read back submissions.
//!
//! # Invariants
//! - `create_submission` inserts the submission row and its ordered field
//!   rows in one transaction.
//! - A submission referencing an unregistered form is rejected by the
//!   foreign key and nothing is written.

use crate::db::StorageError;
use crate::model::form::{Form, FormValidationError, NewForm};
use crate::model::submission::{FormId, Submission, SubmissionField, SubmissionId};
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const FORMS_COLLECTION: &str = "forms";
pub const FORM_SUBMISSIONS_COLLECTION: &str = "form-submissions";

const SUBMISSION_LIST_DEFAULT_LIMIT: u32 = 50;
const SUBMISSION_LIST_MAX_LIMIT: u32 = 200;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by content store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(FormValidationError),
    Db(StorageError),
    UnknownForm(FormId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownForm(id) => write!(f, "form not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UnknownForm(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<FormValidationError> for StoreError {
    fn from(value: FormValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(StorageError::Sqlite(value))
    }
}

/// The one capability the submission handler needs from a content store.
pub trait SubmissionStore {
    /// Durably stores one submission under the `form-submissions` collection.
    fn create_submission(&self, submission: &Submission) -> StoreResult<SubmissionId>;
}

impl<T: SubmissionStore + ?Sized> SubmissionStore for &T {
    fn create_submission(&self, submission: &Submission) -> StoreResult<SubmissionId> {
        (**self).create_submission(submission)
    }
}

/// Submission as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    pub form: FormId,
    pub submission_data: Vec<SubmissionField>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl StoredSubmission {
    /// Returns the value stored for `field`, if present.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.submission_data
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.value.as_str())
    }
}

/// Query options for listing submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub form: Option<FormId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl SubmissionListQuery {
    pub fn for_form(form: FormId) -> Self {
        Self {
            form: Some(form),
            ..Self::default()
        }
    }

    /// Effective limit: `None`/`0` -> default, clamped to the maximum.
    pub fn applied_limit(&self) -> u32 {
        match self.limit {
            None | Some(0) => SUBMISSION_LIST_DEFAULT_LIMIT,
            Some(value) => value.min(SUBMISSION_LIST_MAX_LIMIT),
        }
    }
}

/// SQLite-backed content store.
pub struct SqliteContentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Registers a form and returns its identifier.
    pub fn create_form(&self, form: &NewForm) -> StoreResult<FormId> {
        form.validate()?;
        let form = form.normalized();

        self.conn.execute(
            "INSERT INTO forms (title, confirmation_message) VALUES (?1, ?2);",
            params![form.title.as_str(), form.confirmation_message.as_deref()],
        )?;
        let id = FormId(self.conn.last_insert_rowid());

        info!("event=store_create module=store status=ok collection={FORMS_COLLECTION} form_id={id}");
        Ok(id)
    }

    pub fn get_form(&self, id: FormId) -> StoreResult<Option<Form>> {
        let form = self
            .conn
            .query_row(
                "SELECT id, title, confirmation_message, created_at FROM forms WHERE id = ?1;",
                [id.get()],
                parse_form_row,
            )
            .optional()?;
        Ok(form)
    }

    /// Lists all forms ordered by identifier.
    pub fn list_forms(&self) -> StoreResult<Vec<Form>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, confirmation_message, created_at FROM forms ORDER BY id ASC;",
        )?;
        let forms = stmt
            .query_map([], parse_form_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(forms)
    }

    pub fn get_submission(&self, id: SubmissionId) -> StoreResult<Option<StoredSubmission>> {
        let header = self
            .conn
            .query_row(
                "SELECT uuid, form_id, created_at FROM form_submissions WHERE uuid = ?1;",
                [id.to_string()],
                read_submission_header,
            )
            .optional()?;

        match header {
            Some(header) => Ok(Some(self.load_submission(header)?)),
            None => Ok(None),
        }
    }

    /// Lists submissions newest first, optionally for one form.
    pub fn list_submissions(
        &self,
        query: &SubmissionListQuery,
    ) -> StoreResult<Vec<StoredSubmission>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, form_id, created_at
             FROM form_submissions
             WHERE (?1 IS NULL OR form_id = ?1)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2 OFFSET ?3;",
        )?;
        let headers = stmt
            .query_map(
                params![
                    query.form.map(FormId::get),
                    i64::from(query.applied_limit()),
                    i64::from(query.offset)
                ],
                read_submission_header,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        headers
            .into_iter()
            .map(|header| self.load_submission(header))
            .collect()
    }

    fn load_submission(&self, header: SubmissionHeader) -> StoreResult<StoredSubmission> {
        let id = Uuid::parse_str(&header.uuid).map_err(|_| {
            StoreError::InvalidData(format!(
                "invalid uuid value `{}` in form_submissions.uuid",
                header.uuid
            ))
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT field, value
             FROM form_submission_data
             WHERE submission_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let submission_data = stmt
            .query_map([header.uuid.as_str()], |row| {
                Ok(SubmissionField {
                    field: row.get("field")?,
                    value: row.get("value")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if submission_data.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "submission `{id}` has no field entries"
            )));
        }

        Ok(StoredSubmission {
            id,
            form: FormId(header.form_id),
            submission_data,
            created_at: header.created_at,
        })
    }
}

impl SubmissionStore for SqliteContentStore<'_> {
    fn create_submission(&self, submission: &Submission) -> StoreResult<SubmissionId> {
        let id = Uuid::new_v4();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO form_submissions (uuid, form_id) VALUES (?1, ?2);",
            params![id.to_string(), submission.form().get()],
        )
        .map_err(|err| map_form_reference_error(err, submission.form()))?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO form_submission_data (submission_uuid, position, field, value)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (position, entry) in submission.submission_data().iter().enumerate() {
                let position = i64::try_from(position).map_err(|_| {
                    StoreError::InvalidData("submission field position overflow".to_string())
                })?;
                insert.execute(params![
                    id.to_string(),
                    position,
                    entry.field.as_str(),
                    entry.value.as_str()
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            "event=store_create module=store status=ok collection={FORM_SUBMISSIONS_COLLECTION} form_id={} fields={}",
            submission.form(),
            submission.submission_data().len()
        );
        Ok(id)
    }
}

struct SubmissionHeader {
    uuid: String,
    form_id: i64,
    created_at: i64,
}

fn read_submission_header(row: &Row<'_>) -> rusqlite::Result<SubmissionHeader> {
    Ok(SubmissionHeader {
        uuid: row.get("uuid")?,
        form_id: row.get("form_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_form_row(row: &Row<'_>) -> rusqlite::Result<Form> {
    Ok(Form {
        id: FormId(row.get("id")?),
        title: row.get("title")?,
        confirmation_message: row.get("confirmation_message")?,
        created_at: row.get("created_at")?,
    })
}

fn map_form_reference_error(err: rusqlite::Error, form: FormId) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            StoreError::UnknownForm(form)
        }
        _ => err.into(),
    }
}
