// Generic entity store
// One implementation of insert/find/list/update/delete shared by every resource

pub mod error;
pub mod query;

use std::marker::PhantomData;

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Executor, FromRow, PgPool, Postgres, Transaction,
};
use uuid::Uuid;

pub use error::StoreError;
pub use query::{Criteria, SelectBuilder, SortOrder, Value};

use query::placeholders;

/// A row type the store can persist
///
/// Implementors describe their table and how their create/update payloads
/// turn into column values. `id`, `created_at` and `updated_at` are managed
/// by the store and must appear in `COLUMNS` but not in the value lists.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Clone + 'static {
    const TABLE: &'static str;

    /// Human-readable name used in not-found messages
    const NAME: &'static str;

    /// Every column selected back, in struct order
    const COLUMNS: &'static [&'static str];

    /// Payload for `insert`
    type New: Send;

    /// Partial payload for `update`
    type Patch: Send;

    fn id(&self) -> Uuid;

    /// Columns written by `insert`
    fn insert_values(new: Self::New) -> Vec<(&'static str, Value)>;

    /// Overwrite the fields present in `patch`, leaving the rest untouched
    fn merge(&mut self, patch: Self::Patch);

    /// Columns written back by `update`
    fn update_values(&self) -> Vec<(&'static str, Value)>;
}

/// Generic repository over a single table
///
/// Cloning is cheap: it shares the underlying pool.
pub struct Store<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Store<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Store<E> {
    /// Create a new Store
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Start a transaction for composing the `*_with` operations
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    /// Persist a new row and return it with its generated id and timestamps
    pub async fn insert(&self, new: E::New) -> Result<E, StoreError> {
        let id = Uuid::new_v4();
        let mut values = vec![("id", Value::Uuid(id))];
        values.extend(E::insert_values(new));

        let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            E::TABLE,
            columns.join(", "),
            placeholders(values.len()),
            E::COLUMNS.join(", "),
        );

        let mut query = sqlx::query_as::<_, E>(&sql);
        for (_, value) in values {
            query = bind_as(query, value);
        }

        let entity = query.fetch_one(&self.pool).await?;
        tracing::debug!("Inserted {} {}", E::NAME, id);
        Ok(entity)
    }

    /// At most one row matching `criteria`
    pub async fn find_one(&self, criteria: &Criteria) -> Result<Option<E>, StoreError> {
        let criteria = criteria.clone().limit(1);
        let (sql, params) = SelectBuilder::new(E::TABLE, E::COLUMNS).apply(&criteria)?.build();

        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in params {
            query = bind_as(query, value);
        }

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        self.find_one(&Criteria::by_id(id)).await
    }

    /// Row with `id`, locked until the enclosing transaction ends
    ///
    /// Holds `FOR UPDATE`, which also blocks inserts elsewhere that
    /// reference this row through a foreign key.
    pub async fn find_for_update_with<'c, X>(&self, executor: X, id: Uuid) -> Result<Option<E>, StoreError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
            E::COLUMNS.join(", "),
            E::TABLE,
        );

        Ok(sqlx::query_as::<_, E>(&sql).bind(id).fetch_optional(executor).await?)
    }

    /// Whether any row matches `criteria`
    pub async fn exists(&self, criteria: &Criteria) -> Result<bool, StoreError> {
        Ok(self.find_one(criteria).await?.is_some())
    }

    /// All rows matching `criteria`, newest first unless ordered otherwise
    pub async fn list(&self, criteria: &Criteria) -> Result<Vec<E>, StoreError> {
        self.list_with(&self.pool, criteria).await
    }

    pub async fn list_with<'c, X>(&self, executor: X, criteria: &Criteria) -> Result<Vec<E>, StoreError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let (sql, params) = SelectBuilder::new(E::TABLE, E::COLUMNS).apply(criteria)?.build();

        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in params {
            query = bind_as(query, value);
        }

        Ok(query.fetch_all(executor).await?)
    }

    /// Merge `patch` into the row with `id` and persist it
    ///
    /// This is read-then-write without a row lock: two concurrent updates
    /// of the same id both read the old row and the later write wins,
    /// discarding the fields only the earlier one changed.
    pub async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, StoreError> {
        let mut entity = self
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound { entity: E::NAME })?;

        entity.merge(patch);

        let values = entity.update_values();
        let assignments: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at = NOW() WHERE id = ${} RETURNING {}",
            E::TABLE,
            assignments.join(", "),
            values.len() + 1,
            E::COLUMNS.join(", "),
        );

        let mut query = sqlx::query_as::<_, E>(&sql);
        for (_, value) in values {
            query = bind_as(query, value);
        }

        // The row can vanish between the read and the write
        let updated = query
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: E::NAME })?;

        tracing::debug!("Updated {} {}", E::NAME, id);
        Ok(updated)
    }

    /// Delete exactly one row
    pub async fn destroy(&self, id: Uuid) -> Result<(), StoreError> {
        self.destroy_with(&self.pool, id).await
    }

    pub async fn destroy_with<'c, X>(&self, executor: X, id: Uuid) -> Result<(), StoreError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(executor).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: E::NAME });
        }

        tracing::debug!("Deleted {} {}", E::NAME, id);
        Ok(())
    }

    /// Bulk delete; fails when nothing was deleted
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        self.delete_many_with(&self.pool, ids).await
    }

    pub async fn delete_many_with<'c, X>(&self, executor: X, ids: &[Uuid]) -> Result<u64, StoreError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", E::TABLE);
        let result = sqlx::query(&sql).bind(ids.to_vec()).execute(executor).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: E::NAME });
        }

        tracing::debug!("Deleted {} {} rows", result.rows_affected(), E::NAME);
        Ok(result.rows_affected())
    }
}

fn bind_as<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: Value,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        Value::Uuid(v) => query.bind(v),
        Value::Text(v) => query.bind(v),
        Value::NullableText(v) => query.bind(v),
    }
}
