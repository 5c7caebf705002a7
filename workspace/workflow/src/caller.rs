//! Identity of the user behind a request.

use model::Role;
use sea_orm::ConnectionTrait;
use tracing::{debug, instrument, warn};

use crate::error::{Result, WorkflowError};
use crate::password::verify_password;
use crate::repository;

/// The authenticated user issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: i32,
    pub role: Role,
}

impl Caller {
    /// Fails with `Unauthorized` unless the caller has one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            warn!("User {} with role {} is not allowed here", self.id, self.role);
            Err(WorkflowError::unauthorized(format!(
                "Role {} is not allowed to perform this operation",
                self.role
            )))
        }
    }
}

/// Resolves the caller from login email and password.
#[instrument(skip(db, password))]
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> Result<Caller> {
    let Some(user) = repository::find_user_by_email(db, email).await? else {
        debug!("No user with email {}", email);
        return Err(WorkflowError::Unauthenticated);
    };

    if !verify_password(password, &user.password).await? {
        debug!("Wrong password for {}", email);
        return Err(WorkflowError::Unauthenticated);
    }

    Ok(Caller {
        id: user.id,
        role: user.role,
    })
}
