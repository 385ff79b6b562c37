pub use sea_orm_migration::prelude::*;

mod m20230601_000001_create_users_table;
mod m20230601_000002_create_authentication_tokens_table;
mod m20230601_000003_create_user_relations_table;
mod m20230601_000004_create_notifications_table;

pub(crate) use m20230601_000001_create_users_table::Users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230601_000001_create_users_table::Migration),
            Box::new(m20230601_000002_create_authentication_tokens_table::Migration),
            Box::new(m20230601_000003_create_user_relations_table::Migration),
            Box::new(m20230601_000004_create_notifications_table::Migration),
        ]
    }
}
