use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user. Also decides which kind of user a row represents,
/// since admins, regular users and chefs share the `users` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "ROLE_ADMIN")]
    Admin,
    #[sea_orm(string_value = "ROLE_REGULAR_USER")]
    RegularUser,
    #[sea_orm(string_value = "ROLE_CHEF")]
    Chef,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::RegularUser => "REGULAR_USER",
            Role::Chef => "CHEF",
        };
        f.write_str(name)
    }
}

/// A registered user of any role.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub lastname: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password: String,
    pub role: Role,
    /// Set for regular users once their cookbook exists.
    pub my_cook_book_id: Option<i32>,
    /// Bumped on every profile update; guards against lost updates.
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::my_cook_book::Entity")]
    MyCookBook,
    #[sea_orm(has_many = "super::regular_user_allergen::Entity")]
    RegularUserAllergen,
    /// A chef owns recipes.
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipe,
}

impl Related<super::my_cook_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MyCookBook.def()
    }
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl Related<super::allergen::Entity> for Entity {
    fn to() -> RelationDef {
        super::regular_user_allergen::Relation::Allergen.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::regular_user_allergen::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
