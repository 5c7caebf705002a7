//! Creating users: regular users (with their cookbook), chefs and admins.

use model::entities::user;
use model::Role;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{ConflictKind, Result, WorkflowError};
use crate::password::hash_password;
use crate::repository;
use crate::validation::{validate_user_form, UserForm, ValidUser};
use crate::views::{ChefView, RegularUserView, UserView};

/// Email is checked before username, so a double clash reports the email.
async fn ensure_unique<C: ConnectionTrait>(db: &C, user: &ValidUser) -> Result<()> {
    trace!("Checking whether email {} is taken", user.email);
    if repository::find_user_by_email(db, &user.email).await?.is_some() {
        warn!("There is a user with the same email: {}", user.email);
        return Err(WorkflowError::Conflict(ConflictKind::Email));
    }

    trace!("Checking whether username {} is taken", user.username);
    if repository::find_user_by_username(db, &user.username).await?.is_some() {
        warn!("There is a user with the same username: {}", user.username);
        return Err(WorkflowError::Conflict(ConflictKind::Username));
    }

    Ok(())
}

fn new_user(user: ValidUser, password_hash: String, role: Role) -> user::ActiveModel {
    user::ActiveModel {
        name: Set(user.name),
        lastname: Set(user.lastname),
        username: Set(user.username),
        email: Set(user.email),
        password: Set(password_hash),
        role: Set(role),
        my_cook_book_id: Set(None),
        version: Set(0),
        ..Default::default()
    }
}

/// Validates the form, checks uniqueness and stores a user without any
/// owned data.
async fn create_user(db: &DatabaseConnection, form: &UserForm, role: Role) -> Result<user::Model> {
    let valid = validate_user_form(form)?;
    ensure_unique(db, &valid).await?;
    let password_hash = hash_password(&valid.password).await?;

    let created = repository::insert_user(db, new_user(valid, password_hash, role)).await?;
    info!("Created user {} with role {}", created.id, role);
    Ok(created)
}

/// Signs up a regular user together with their empty cookbook.
///
/// The user insert, the cookbook insert and the re-save that links them
/// share one transaction; a failure in any step leaves nothing behind.
#[instrument(skip(db, form))]
pub async fn register_regular_user(
    db: &DatabaseConnection,
    form: &UserForm,
) -> Result<RegularUserView> {
    let valid = validate_user_form(form)?;
    let password_hash = hash_password(&valid.password).await?;

    let txn = db.begin().await?;
    ensure_unique(&txn, &valid).await?;

    let new_regular_user = new_user(valid, password_hash, Role::RegularUser);
    let created = repository::insert_user(&txn, new_regular_user).await?;
    debug!("Saved regular user {}", created.id);

    let cook_book = repository::insert_cook_book(&txn, created.id).await?;
    debug!("Saved cookbook {} for regular user {}", cook_book.id, created.id);

    let linked = repository::link_cook_book(&txn, created, cook_book.id).await?;
    txn.commit().await?;

    info!("Registered regular user {} with cookbook {}", linked.id, cook_book.id);
    Ok(RegularUserView::from_parts(linked, Vec::new()))
}

/// Same flow as registration, but the user becomes a chef and gets no
/// cookbook.
#[instrument(skip(db, form))]
pub async fn create_chef(db: &DatabaseConnection, form: &UserForm) -> Result<ChefView> {
    let created = create_user(db, form, Role::Chef).await?;
    Ok(ChefView::from_parts(created, Vec::new()))
}

/// Seeds an administrator.
#[instrument(skip(db, form))]
pub async fn create_admin(db: &DatabaseConnection, form: &UserForm) -> Result<UserView> {
    let created = create_user(db, form, Role::Admin).await?;
    Ok(UserView::from(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::setup_db;
    use crate::validation::sample_form;
    use model::entities::prelude::*;
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_registration_creates_linked_cook_book() {
        let db = setup_db().await;

        let created = register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap();

        assert_eq!(created.role, Role::RegularUser);
        assert!(created.allergens.is_empty());

        let cook_books = MyCookBook::find().all(&db).await.unwrap();
        assert_eq!(cook_books.len(), 1);
        assert_eq!(cook_books[0].regular_user_id, Some(created.id));
        assert_eq!(created.my_cook_book_id, Some(cook_books[0].id));
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let db = setup_db().await;

        let created = register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap();

        let stored = User::find_by_id(created.id).one(&db).await.unwrap().unwrap();
        assert_ne!(stored.password, "secret");
        assert!(crate::password::verify_password("secret", &stored.password).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_regardless_of_username() {
        let db = setup_db().await;

        register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap();
        let err = register_regular_user(&db, &sample_form("someone_else", "ana@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Conflict(ConflictKind::Email)));
        assert_eq!(User::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = setup_db().await;

        register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap();
        let err = register_regular_user(&db, &sample_form("ana", "other@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Conflict(ConflictKind::Username)));
    }

    #[tokio::test]
    async fn test_dual_conflict_reports_email() {
        let db = setup_db().await;

        register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap();
        let err = register_regular_user(&db, &sample_form("ana", "ana@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Conflict(ConflictKind::Email)));
    }

    #[tokio::test]
    async fn test_uniqueness_spans_all_roles() {
        let db = setup_db().await;

        create_chef(&db, &sample_form("gordon", "gordon@example.com"))
            .await
            .unwrap();
        let err = register_regular_user(&db, &sample_form("gordon", "g2@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Conflict(ConflictKind::Username)));
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let db = setup_db().await;

        let mut form = sample_form("ana", "not-an-email");
        form.confirmed_password = Some("other".to_string());
        let err = register_regular_user(&db, &form).await.unwrap_err();

        match err {
            WorkflowError::Validation(errors) => {
                assert!(errors.contains_key("email"));
                assert!(errors.contains_key("confirmed_password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(User::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_cook_book_write_rolls_back_user() {
        let db = setup_db().await;
        db.execute_unprepared("DROP TABLE my_cook_books").await.unwrap();

        let result = register_regular_user(&db, &sample_form("ana", "ana@example.com")).await;

        assert!(result.is_err());
        assert_eq!(User::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_chef_gets_role_and_no_cook_book() {
        let db = setup_db().await;

        let chef = create_chef(&db, &sample_form("gordon", "gordon@example.com"))
            .await
            .unwrap();

        assert_eq!(chef.role, Role::Chef);
        assert!(chef.recipes.is_empty());
        assert_eq!(MyCookBook::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_admin() {
        let db = setup_db().await;

        let admin = create_admin(&db, &sample_form("admin", "admin@example.com"))
            .await
            .unwrap();

        assert_eq!(admin.role, Role::Admin);
    }
}
