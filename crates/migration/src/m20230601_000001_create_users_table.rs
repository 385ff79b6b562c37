use db::user::Role;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PhoneNumber).string())
                    .col(
                        ColumnDef::new(Users::Role)
                            .small_integer()
                            .not_null()
                            .default(Role::User),
                    )
                    .col(
                        ColumnDef::new(Users::IsActivated)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::Name).string())
                    .col(ColumnDef::new(Users::Gender).string())
                    .col(ColumnDef::new(Users::Status).string())
                    .col(ColumnDef::new(Users::Orientation).string())
                    .col(ColumnDef::new(Users::Biographic).text())
                    .col(ColumnDef::new(Users::YearOfBirth).integer())
                    .col(ColumnDef::new(Users::BodyType).string())
                    .col(ColumnDef::new(Users::Diet).string())
                    .col(ColumnDef::new(Users::Drinks).string())
                    .col(ColumnDef::new(Users::Drugs).string())
                    .col(ColumnDef::new(Users::Education).string())
                    .col(ColumnDef::new(Users::Ethnicity).string())
                    .col(ColumnDef::new(Users::Height).integer())
                    .col(ColumnDef::new(Users::Income).integer())
                    .col(ColumnDef::new(Users::Job).string())
                    .col(ColumnDef::new(Users::Location).string())
                    .col(ColumnDef::new(Users::Offspring).string())
                    .col(ColumnDef::new(Users::Pets).string())
                    .col(ColumnDef::new(Users::Sign).string())
                    .col(ColumnDef::new(Users::Smokes).string())
                    .col(ColumnDef::new(Users::Speaks).string())
                    .col(ColumnDef::new(Users::RegionCode).string())
                    .col(
                        ColumnDef::new(Users::ShownFields)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .to_owned(),
            )
            .await?;

        // Candidate pool lookups for recommendations.
        manager
            .create_index(
                Index::create()
                    .name("idx-users-region_code")
                    .table(Users::Table)
                    .col(Users::RegionCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    PhoneNumber,
    Role,
    IsActivated,
    IsDeleted,
    IsVerified,
    Name,
    Gender,
    Status,
    Orientation,
    Biographic,
    YearOfBirth,
    BodyType,
    Diet,
    Drinks,
    Drugs,
    Education,
    Ethnicity,
    Height,
    Income,
    Job,
    Location,
    Offspring,
    Pets,
    Sign,
    Smokes,
    Speaks,
    RegionCode,
    ShownFields,
    CreatedAt,
    UpdatedAt,
}
