//! Persistence gateway: find/save/delete by id or unique field.
//!
//! Every function takes any [`ConnectionTrait`] so the same calls work on a
//! pooled connection and inside a transaction.

use model::entities::{allergen, my_cook_book, recipe, regular_user_allergen, user};
use model::Role;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, trace, warn};

use crate::error::{ConflictKind, Result, WorkflowError};
use crate::validation::UpdateUserForm;

type DbResult<T> = std::result::Result<T, DbErr>;

// ===================== Users =====================

pub async fn find_user_by_id<C: ConnectionTrait>(db: &C, id: i32) -> DbResult<Option<user::Model>> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> DbResult<Option<user::Model>> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> DbResult<Option<user::Model>> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

/// Finds a user by id, but only if it is of the given kind.
pub async fn find_user_of_kind<C: ConnectionTrait>(
    db: &C,
    id: i32,
    kind: Role,
) -> DbResult<Option<user::Model>> {
    user::Entity::find_by_id(id)
        .filter(user::Column::Role.eq(kind))
        .one(db)
        .await
}

/// Lowest-id user of the given kind with this first name.
pub async fn find_first_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    kind: Role,
) -> DbResult<Option<user::Model>> {
    user::Entity::find()
        .filter(user::Column::Name.eq(name))
        .filter(user::Column::Role.eq(kind))
        .order_by_asc(user::Column::Id)
        .one(db)
        .await
}

pub async fn find_all_of_kind<C: ConnectionTrait>(
    db: &C,
    kind: Role,
) -> DbResult<Vec<user::Model>> {
    user::Entity::find()
        .filter(user::Column::Role.eq(kind))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
}

pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    new_user: user::ActiveModel,
) -> DbResult<user::Model> {
    new_user.insert(db).await
}

/// Points a regular user at their cookbook.
pub async fn link_cook_book<C: ConnectionTrait>(
    db: &C,
    regular_user: user::Model,
    cook_book_id: i32,
) -> DbResult<user::Model> {
    let mut active: user::ActiveModel = regular_user.into();
    active.my_cook_book_id = Set(Some(cook_book_id));
    active.update(db).await
}

/// Overwrites the profile fields of `current`, provided nobody else has
/// written the row since `current` was read.
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    current: &user::Model,
    form: &UpdateUserForm,
    password_hash: String,
) -> Result<user::Model> {
    trace!("Versioned update of user {} at version {}", current.id, current.version);
    let result = user::Entity::update_many()
        .col_expr(user::Column::Name, Expr::value(form.name.clone()))
        .col_expr(user::Column::Lastname, Expr::value(form.lastname.clone()))
        .col_expr(user::Column::Username, Expr::value(form.username.clone()))
        .col_expr(user::Column::Email, Expr::value(form.email.clone()))
        .col_expr(user::Column::Password, Expr::value(password_hash))
        .col_expr(user::Column::Version, Expr::value(current.version + 1))
        .filter(user::Column::Id.eq(current.id))
        .filter(user::Column::Version.eq(current.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("User {} changed since version {}, rejecting update", current.id, current.version);
        return Err(WorkflowError::Conflict(ConflictKind::StaleRecord));
    }

    find_user_by_id(db, current.id)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("No user found with ID {}", current.id)))
}

pub async fn delete_user<C: ConnectionTrait>(db: &C, id: i32) -> DbResult<u64> {
    let result = user::Entity::delete_by_id(id).exec(db).await?;
    debug!("Deleted user {}, rows affected: {}", id, result.rows_affected);
    Ok(result.rows_affected)
}

// ===================== Cookbooks =====================

pub async fn insert_cook_book<C: ConnectionTrait>(
    db: &C,
    regular_user_id: i32,
) -> DbResult<my_cook_book::Model> {
    my_cook_book::ActiveModel {
        regular_user_id: Set(Some(regular_user_id)),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn count_cook_books<C: ConnectionTrait>(db: &C) -> DbResult<u64> {
    my_cook_book::Entity::find().count(db).await
}

// ===================== Allergens =====================

pub async fn find_allergen_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> DbResult<Option<allergen::Model>> {
    allergen::Entity::find_by_id(id).one(db).await
}

pub async fn find_all_allergens<C: ConnectionTrait>(db: &C) -> DbResult<Vec<allergen::Model>> {
    allergen::Entity::find()
        .order_by_asc(allergen::Column::Id)
        .all(db)
        .await
}

pub async fn insert_allergen<C: ConnectionTrait>(db: &C, name: &str) -> DbResult<allergen::Model> {
    allergen::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Allergens attached to a user in attachment order, duplicates included.
pub async fn allergens_of<C: ConnectionTrait>(
    db: &C,
    regular_user: &user::Model,
) -> DbResult<Vec<allergen::Model>> {
    regular_user
        .find_related(allergen::Entity)
        .order_by_asc(regular_user_allergen::Column::Id)
        .all(db)
        .await
}

/// Appends an allergen entry without looking for an existing one.
pub async fn attach_allergen<C: ConnectionTrait>(
    db: &C,
    regular_user_id: i32,
    allergen_id: i32,
) -> DbResult<()> {
    regular_user_allergen::ActiveModel {
        regular_user_id: Set(regular_user_id),
        allergen_id: Set(allergen_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Removes the earliest matching entry. Returns false if there was none.
pub async fn detach_allergen<C: ConnectionTrait>(
    db: &C,
    regular_user_id: i32,
    allergen_id: i32,
) -> DbResult<bool> {
    let entry = regular_user_allergen::Entity::find()
        .filter(regular_user_allergen::Column::RegularUserId.eq(regular_user_id))
        .filter(regular_user_allergen::Column::AllergenId.eq(allergen_id))
        .order_by_asc(regular_user_allergen::Column::Id)
        .one(db)
        .await?;

    match entry {
        Some(entry) => {
            entry.delete(db).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

// ===================== Recipes =====================

pub async fn find_recipe_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> DbResult<Option<recipe::Model>> {
    recipe::Entity::find_by_id(id).one(db).await
}

pub async fn find_recipe_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> DbResult<Option<recipe::Model>> {
    recipe::Entity::find()
        .filter(recipe::Column::Name.eq(name))
        .one(db)
        .await
}

pub async fn recipes_of<C: ConnectionTrait>(db: &C, chef_id: i32) -> DbResult<Vec<recipe::Model>> {
    recipe::Entity::find()
        .filter(recipe::Column::ChefId.eq(chef_id))
        .order_by_asc(recipe::Column::Id)
        .all(db)
        .await
}

pub async fn insert_recipe<C: ConnectionTrait>(
    db: &C,
    chef_id: i32,
    name: &str,
    description: Option<String>,
) -> DbResult<recipe::Model> {
    recipe::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description),
        chef_id: Set(chef_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Makes `recipe_ids` exactly the chef's recipe list: listed recipes move
/// to the chef, the chef's other recipes are deleted.
pub async fn replace_recipes<C: ConnectionTrait>(
    db: &C,
    chef_id: i32,
    recipe_ids: &[i32],
) -> DbResult<()> {
    let moved = recipe::Entity::update_many()
        .col_expr(recipe::Column::ChefId, Expr::value(chef_id))
        .filter(recipe::Column::Id.is_in(recipe_ids.iter().copied()))
        .exec(db)
        .await?;

    let removed = recipe::Entity::delete_many()
        .filter(recipe::Column::ChefId.eq(chef_id))
        .filter(recipe::Column::Id.is_not_in(recipe_ids.iter().copied()))
        .exec(db)
        .await?;

    debug!(
        "Replaced recipes of chef {}: {} assigned, {} removed",
        chef_id, moved.rows_affected, removed.rows_affected
    );
    Ok(())
}
