//! Allergen reference data and its association with regular users.

use model::Role;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, WorkflowError};
use crate::repository;
use crate::validation::{validate_allergen_form, AllergenForm};
use crate::views::{AllergenView, RegularUserView};

async fn load_pair<C: sea_orm::ConnectionTrait>(
    db: &C,
    regular_user_id: i32,
    allergen_id: i32,
) -> Result<model::entities::user::Model> {
    let regular_user = repository::find_user_of_kind(db, regular_user_id, Role::RegularUser)
        .await?
        .ok_or_else(|| {
            warn!("No regular user found with ID {}", regular_user_id);
            WorkflowError::not_found(format!("No regular user found with ID {}", regular_user_id))
        })?;

    if repository::find_allergen_by_id(db, allergen_id).await?.is_none() {
        warn!("No allergen found with ID {}", allergen_id);
        return Err(WorkflowError::not_found(format!("No allergen found with ID {}", allergen_id)));
    }

    Ok(regular_user)
}

/// Attaches an allergen to a regular user.
///
/// Membership is not checked, so adding the same allergen twice yields two
/// entries.
#[instrument(skip(db))]
pub async fn add_allergen(
    db: &DatabaseConnection,
    regular_user_id: i32,
    allergen_id: i32,
) -> Result<RegularUserView> {
    let txn = db.begin().await?;
    let regular_user = load_pair(&txn, regular_user_id, allergen_id).await?;

    repository::attach_allergen(&txn, regular_user_id, allergen_id).await?;
    let view = RegularUserView::load(&txn, regular_user).await?;
    txn.commit().await?;

    info!("Added allergen {} to regular user {}", allergen_id, regular_user_id);
    Ok(view)
}

/// Removes one entry of an allergen from a regular user. Not having the
/// allergen is not an error.
#[instrument(skip(db))]
pub async fn remove_allergen(
    db: &DatabaseConnection,
    regular_user_id: i32,
    allergen_id: i32,
) -> Result<RegularUserView> {
    let txn = db.begin().await?;
    let regular_user = load_pair(&txn, regular_user_id, allergen_id).await?;

    let removed = repository::detach_allergen(&txn, regular_user_id, allergen_id).await?;
    if removed {
        info!("Removed allergen {} from regular user {}", allergen_id, regular_user_id);
    } else {
        debug!("Regular user {} did not have allergen {}", regular_user_id, allergen_id);
    }

    let view = RegularUserView::load(&txn, regular_user).await?;
    txn.commit().await?;
    Ok(view)
}

#[instrument(skip(db))]
pub async fn list_allergens(db: &DatabaseConnection) -> Result<Vec<AllergenView>> {
    let allergens = repository::find_all_allergens(db).await?;
    debug!("Retrieved {} allergens", allergens.len());
    Ok(allergens.into_iter().map(AllergenView::from).collect())
}

#[instrument(skip(db))]
pub async fn get_allergen(db: &DatabaseConnection, id: i32) -> Result<AllergenView> {
    repository::find_allergen_by_id(db, id)
        .await?
        .map(AllergenView::from)
        .ok_or_else(|| WorkflowError::not_found(format!("No allergen found with ID {}", id)))
}

#[instrument(skip(db))]
pub async fn create_allergen(db: &DatabaseConnection, form: &AllergenForm) -> Result<AllergenView> {
    validate_allergen_form(form)?;
    let created = repository::insert_allergen(db, &form.name).await?;
    info!("Created allergen {} ({})", created.id, created.name);
    Ok(AllergenView::from(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConflictKind;
    use crate::testing::{chef, regular_user, setup_db};

    async fn allergen(db: &DatabaseConnection, name: &str) -> AllergenView {
        create_allergen(db, &AllergenForm { name: name.to_string() })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_allergen() {
        let db = setup_db().await;
        let ana = regular_user(&db, "ana").await;
        let gluten = allergen(&db, "Gluten").await;

        let view = add_allergen(&db, ana.id, gluten.id).await.unwrap();

        assert_eq!(view.allergens, vec![gluten]);
    }

    #[tokio::test]
    async fn test_adding_twice_keeps_both_entries() {
        let db = setup_db().await;
        let ana = regular_user(&db, "ana").await;
        let gluten = allergen(&db, "Gluten").await;

        add_allergen(&db, ana.id, gluten.id).await.unwrap();
        let view = add_allergen(&db, ana.id, gluten.id).await.unwrap();

        assert_eq!(view.allergens.len(), 2);
        assert!(view.allergens.iter().all(|a| a.id == gluten.id));
    }

    #[tokio::test]
    async fn test_remove_takes_out_one_entry() {
        let db = setup_db().await;
        let ana = regular_user(&db, "ana").await;
        let gluten = allergen(&db, "Gluten").await;
        let nuts = allergen(&db, "Nuts").await;

        add_allergen(&db, ana.id, gluten.id).await.unwrap();
        add_allergen(&db, ana.id, nuts.id).await.unwrap();
        add_allergen(&db, ana.id, gluten.id).await.unwrap();

        let view = remove_allergen(&db, ana.id, gluten.id).await.unwrap();

        let names: Vec<&str> = view.allergens.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Nuts", "Gluten"]);
    }

    #[tokio::test]
    async fn test_remove_missing_entry_is_noop() {
        let db = setup_db().await;
        let ana = regular_user(&db, "ana").await;
        let gluten = allergen(&db, "Gluten").await;

        let view = remove_allergen(&db, ana.id, gluten.id).await.unwrap();
        assert!(view.allergens.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let db = setup_db().await;
        let ana = regular_user(&db, "ana").await;
        let gluten = allergen(&db, "Gluten").await;

        assert!(matches!(
            add_allergen(&db, 999, gluten.id).await,
            Err(WorkflowError::NotFound(_))
        ));
        assert!(matches!(
            add_allergen(&db, ana.id, 999).await,
            Err(WorkflowError::NotFound(_))
        ));
        assert!(matches!(
            remove_allergen(&db, ana.id, 999).await,
            Err(WorkflowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_chef_is_not_a_regular_user() {
        let db = setup_db().await;
        let gordon = chef(&db, "gordon").await;
        let gluten = allergen(&db, "Gluten").await;

        assert!(matches!(
            add_allergen(&db, gordon.id, gluten.id).await,
            Err(WorkflowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_allergen_names_are_unique() {
        let db = setup_db().await;
        allergen(&db, "Gluten").await;

        let err = create_allergen(&db, &AllergenForm { name: "Gluten".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Conflict(ConflictKind::AllergenName)));
    }

    #[tokio::test]
    async fn test_list_and_get_allergens() {
        let db = setup_db().await;
        assert!(list_allergens(&db).await.unwrap().is_empty());

        let gluten = allergen(&db, "Gluten").await;
        allergen(&db, "Nuts").await;

        assert_eq!(list_allergens(&db).await.unwrap().len(), 2);
        assert_eq!(get_allergen(&db, gluten.id).await.unwrap(), gluten);
        assert!(matches!(get_allergen(&db, 999).await, Err(WorkflowError::NotFound(_))));
    }
}
