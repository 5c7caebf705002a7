use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cookbooks outlive their owner; only the back-reference is cleared
        manager
            .create_table(
                Table::create()
                    .table(MyCookBooks::Table)
                    .if_not_exists()
                    .col(pk_auto(MyCookBooks::Id))
                    .col(integer_null(MyCookBooks::RegularUserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_my_cook_book_regular_user")
                            .from(MyCookBooks::Table, MyCookBooks::RegularUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Allergens::Table)
                    .if_not_exists()
                    .col(pk_auto(Allergens::Id))
                    .col(string(Allergens::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Surrogate key instead of a composite one: duplicates are allowed
        manager
            .create_table(
                Table::create()
                    .table(RegularUserAllergens::Table)
                    .if_not_exists()
                    .col(pk_auto(RegularUserAllergens::Id))
                    .col(integer(RegularUserAllergens::RegularUserId))
                    .col(integer(RegularUserAllergens::AllergenId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_regular_user_allergen_user")
                            .from(RegularUserAllergens::Table, RegularUserAllergens::RegularUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_regular_user_allergen_allergen")
                            .from(RegularUserAllergens::Table, RegularUserAllergens::AllergenId)
                            .to(Allergens::Table, Allergens::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegularUserAllergens::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Allergens::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(MyCookBooks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MyCookBooks {
    Table,
    Id,
    RegularUserId,
}

#[derive(DeriveIden)]
enum Allergens {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum RegularUserAllergens {
    Table,
    Id,
    RegularUserId,
    AllergenId,
}
