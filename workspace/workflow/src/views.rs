//! Response shapes returned by the workflow. Passwords never leave the crate.

use model::entities::{allergen, recipe, user};
use model::Role;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;
use crate::repository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllergenView {
    pub id: i32,
    pub name: String,
}

impl From<allergen::Model> for AllergenView {
    fn from(model: allergen::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub chef_id: i32,
}

impl From<recipe::Model> for RecipeView {
    fn from(model: recipe::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            chef_id: model.chef_id,
        }
    }
}

/// Plain user profile, used for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "ADMIN")]
    pub role: Role,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            lastname: model.lastname,
            username: model.username,
            email: model.email,
            role: model.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegularUserView {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "REGULAR_USER")]
    pub role: Role,
    pub my_cook_book_id: Option<i32>,
    /// In attachment order; the same allergen may appear more than once
    pub allergens: Vec<AllergenView>,
}

impl RegularUserView {
    pub fn from_parts(model: user::Model, allergens: Vec<allergen::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            lastname: model.lastname,
            username: model.username,
            email: model.email,
            role: model.role,
            my_cook_book_id: model.my_cook_book_id,
            allergens: allergens.into_iter().map(AllergenView::from).collect(),
        }
    }

    pub async fn load<C: ConnectionTrait>(db: &C, model: user::Model) -> Result<Self> {
        let allergens = repository::allergens_of(db, &model).await?;
        Ok(Self::from_parts(model, allergens))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChefView {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "CHEF")]
    pub role: Role,
    pub recipes: Vec<RecipeView>,
}

impl ChefView {
    pub fn from_parts(model: user::Model, recipes: Vec<recipe::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            lastname: model.lastname,
            username: model.username,
            email: model.email,
            role: model.role,
            recipes: recipes.into_iter().map(RecipeView::from).collect(),
        }
    }

    pub async fn load<C: ConnectionTrait>(db: &C, model: user::Model) -> Result<Self> {
        let recipes = repository::recipes_of(db, model.id).await?;
        Ok(Self::from_parts(model, recipes))
    }
}
