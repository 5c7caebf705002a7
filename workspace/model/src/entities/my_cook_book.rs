use sea_orm::entity::prelude::*;

/// A regular user's personal recipe collection.
///
/// The back-reference is nulled when the owner is deleted; the cookbook
/// itself stays behind.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "my_cook_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub regular_user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RegularUserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
