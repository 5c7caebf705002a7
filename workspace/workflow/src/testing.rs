//! Shared fixtures for the workflow tests.

use migration::{Migrator, MigratorTrait};
use model::Role;
use sea_orm::{Database, DatabaseConnection};

use crate::caller::Caller;
use crate::registration::{create_admin, create_chef, register_regular_user};
use crate::validation::sample_form;

/// In-memory SQLite database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn regular_user(db: &DatabaseConnection, username: &str) -> Caller {
    let form = sample_form(username, &format!("{}@example.com", username));
    let view = register_regular_user(db, &form)
        .await
        .expect("Failed to register regular user");
    Caller {
        id: view.id,
        role: Role::RegularUser,
    }
}

pub async fn chef(db: &DatabaseConnection, username: &str) -> Caller {
    let view = create_chef(db, &sample_form(username, &format!("{}@example.com", username)))
        .await
        .expect("Failed to create chef");
    Caller {
        id: view.id,
        role: Role::Chef,
    }
}

pub async fn admin(db: &DatabaseConnection) -> Caller {
    let view = create_admin(db, &sample_form("admin", "admin@example.com"))
        .await
        .expect("Failed to create admin");
    Caller {
        id: view.id,
        role: Role::Admin,
    }
}
