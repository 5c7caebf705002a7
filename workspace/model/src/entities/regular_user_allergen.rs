use super::{allergen, user};
use sea_orm::entity::prelude::*;

/// Join row between a regular user and an allergen.
///
/// Rows carry their own id, so the same pair may appear more than once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "regular_user_allergens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub regular_user_id: i32,
    pub allergen_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::RegularUserId",
        to = "user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "allergen::Entity",
        from = "Column::AllergenId",
        to = "allergen::Column::Id"
    )]
    Allergen,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<allergen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allergen.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
