//! Direct statement strategy

use super::{rows_into, Bind, BrandSearch, Record, RecordId, RecordStore};
use crate::db::queries::ITEMS_BY_BRAND_SQL;
use crate::error::AppError;
use crate::models::Item;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;
use tracing::debug;

/// Runs parameterized statements against the entity's table
pub struct SqlStore<R> {
    pool: Pool,
    _record: PhantomData<fn() -> R>,
}

impl<R> SqlStore<R> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for SqlStore<R> {
    async fn list(&self) -> Result<Vec<R>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(R::SQL.list, &[]).await?;
        rows_into(&rows)
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_opt(R::SQL.get, &[&id]).await?;
        Ok(row.as_ref().map(R::from_row).transpose()?)
    }

    async fn create(&self, new: &R::New) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let affected = client.execute(R::SQL.insert, &new.params()).await?;
        debug!("INSERT {} affected {} rows", R::KIND, affected);
        Ok(affected)
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&id];
        params.extend(patch.params());
        let affected = client.execute(R::SQL.update, &params).await?;
        debug!("UPDATE {} {} affected {} rows", R::KIND, id, affected);
        Ok(affected)
    }

    async fn delete(&self, id: RecordId) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let affected = client.execute(R::SQL.delete, &[&id]).await?;
        debug!("DELETE {} {} affected {} rows", R::KIND, id, affected);
        Ok(affected)
    }
}

#[async_trait]
impl BrandSearch for SqlStore<Item> {
    async fn by_brand(&self, brand: &str) -> Result<Vec<Item>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(ITEMS_BY_BRAND_SQL, &[&brand]).await?;
        rows_into(&rows)
    }
}
