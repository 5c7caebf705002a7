//! User and role workflow for the cookbook backend: validation, the
//! persistence gateway and every operation the HTTP layer exposes.

pub mod allergens;
pub mod caller;
pub mod error;
pub mod lookup;
pub mod password;
pub mod profile;
pub mod recipes;
pub mod registration;
pub mod repository;
pub mod validation;
pub mod views;

#[cfg(test)]
mod testing;

pub use caller::{authenticate, Caller};
pub use error::{ConflictKind, FieldErrors, WorkflowError};
