pub mod notification;
pub mod relation;
pub mod token;
pub mod user;

use std::error::Error;

use async_trait::async_trait;
pub use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, Database,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, StatementBuilder,
    TransactionError, TransactionTrait, TryGetableMany,
};
pub use time::{OffsetDateTime, PrimitiveDateTime};

/// Current UTC time in the representation used by timestamp columns.
pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();

    PrimitiveDateTime::new(now.date(), now.time())
}

pub trait TransactionErrorExt<T, E> {
    /// Convert transaction [`Result`] into a [`Result`] with
    /// a custom error.
    fn into_raw_result(self) -> Result<T, E>;
}

impl<T, E> TransactionErrorExt<T, E> for Result<T, TransactionError<E>>
where
    E: Error + From<DbErr>,
{
    fn into_raw_result(self) -> Result<T, E> {
        match self {
            Ok(val) => Ok(val),
            Err(TransactionError::Connection(err)) => Err(err.into()),
            Err(TransactionError::Transaction(err)) => Err(err),
        }
    }
}

#[async_trait]
pub trait SelectExt {
    /// Check if at least one record that satisfies a query.
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr>;
}

#[async_trait]
impl<T> SelectExt for T
where
    T: QueryTrait<QueryStatement = sea_query::SelectStatement> + Send,
{
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr> {
        use sea_query::{Expr, Query};

        let mut query = self.into_query();

        // SQLite requires at least one selected expression inside of EXISTS.
        query.expr(1);

        let stmt = StatementBuilder::build(
            Query::select().expr(Expr::exists(query)),
            &db.get_database_backend(),
        );

        db.query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(String::from("EXISTS returned no rows")))?
            .try_get_by_index(0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{
        prelude::*,
        sea_query::{self, ColumnDef, Iden, Table},
        Database, QuerySelect,
    };

    use crate::SelectExt;

    #[derive(Iden)]
    enum Switches {
        Table,
        Id,
        Flag,
    }

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "switches")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub flag: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    #[tokio::test]
    async fn exists_respects_filters() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("unable to create test database");

        let table = Table::create()
            .table(Switches::Table)
            .col(
                ColumnDef::new(Switches::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Switches::Flag).boolean().not_null())
            .to_owned();

        let builder = db.get_database_backend();
        db.execute(builder.build(&table)).await.unwrap();

        assert!(!Entity::find().select_only().exists(&db).await.unwrap());

        Entity::insert(ActiveModel {
            flag: sea_orm::ActiveValue::Set(false),
            ..Default::default()
        })
        .exec_without_returning(&db)
        .await
        .unwrap();

        assert!(Entity::find().select_only().exists(&db).await.unwrap());

        let flagged = Entity::find()
            .select_only()
            .filter(Column::Flag.eq(true))
            .exists(&db)
            .await
            .unwrap();

        assert!(!flagged);
    }
}
