use sea_orm::entity::prelude::*;

/// Reference entity a regular user can tag themselves with.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "allergens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::regular_user_allergen::Entity")]
    RegularUserAllergen,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::regular_user_allergen::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::regular_user_allergen::Relation::Allergen.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
