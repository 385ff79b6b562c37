use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserRelations::Table)
                    .col(
                        ColumnDef::new(UserRelations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserRelations::Kind)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRelations::FromUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRelations::ToUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRelations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserRelations::Table, UserRelations::FromUserId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserRelations::Table, UserRelations::ToUserId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A relation of a single kind may exist only once per ordered pair.
        // Relationship writes rely on this key to detect duplicates and
        // to resolve concurrent match insertions.
        manager
            .create_index(
                Index::create()
                    .name("idx-user_relations-kind-from-to")
                    .table(UserRelations::Table)
                    .col(UserRelations::Kind)
                    .col(UserRelations::FromUserId)
                    .col(UserRelations::ToUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_relations-from-kind-created_at")
                    .table(UserRelations::Table)
                    .col(UserRelations::FromUserId)
                    .col(UserRelations::Kind)
                    .col(UserRelations::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRelations::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum UserRelations {
    Table,
    Id,
    Kind,
    FromUserId,
    ToUserId,
    CreatedAt,
}
