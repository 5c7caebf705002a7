use std::collections::BTreeMap;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Field name mapped to every message reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Which uniqueness rule a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Email,
    Username,
    AllergenName,
    RecipeName,
    /// The record changed between read and write.
    StaleRecord,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            ConflictKind::Email => "Email already exists",
            ConflictKind::Username => "Username already exists",
            ConflictKind::AllergenName => "Allergen already exists",
            ConflictKind::RecipeName => "Recipe already exists",
            ConflictKind::StaleRecord => "Record was modified concurrently, retry the update",
        };
        f.write_str(message)
    }
}

/// Error types for the user and role workflow
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Input failed one or more field constraints
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    /// A unique field is already taken, or the record went stale
    #[error("{0}")]
    Conflict(ConflictKind),

    /// The caller's role or identity does not allow the operation
    #[error("{0}")]
    Unauthorized(String),

    /// No valid credentials were presented
    #[error("Authentication required")]
    Unauthenticated,

    /// A looked-up entity or collection does not exist
    #[error("{0}")]
    NotFound(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl WorkflowError {
    pub fn not_found(message: impl Into<String>) -> Self {
        WorkflowError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        WorkflowError::Unauthorized(message.into())
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        WorkflowError::Validation(errors)
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .values()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

// Unique violations become conflicts; the constraint message names the column
impl From<DbErr> for WorkflowError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            let detail = detail.to_lowercase();
            let kind = if detail.contains("email") {
                Some(ConflictKind::Email)
            } else if detail.contains("username") {
                Some(ConflictKind::Username)
            } else if detail.contains("allergens") {
                Some(ConflictKind::AllergenName)
            } else if detail.contains("recipes") {
                Some(ConflictKind::RecipeName)
            } else {
                None
            };
            if let Some(kind) = kind {
                return WorkflowError::Conflict(kind);
            }
        }
        error!(?err, "Database error");
        WorkflowError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
