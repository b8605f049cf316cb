//! Stored routine strategy
//!
//! Read routines return `SETOF <table>`, so their rows decode exactly like
//! table rows. Write routines return the `ROW_COUNT` of the statement they
//! wrap, which stands in for the affected-row count.

use super::{rows_into, Bind, BrandSearch, Record, RecordId, RecordStore};
use crate::db::queries::ITEMS_BY_BRAND_ROUTINE;
use crate::error::AppError;
use crate::models::Item;
use async_trait::async_trait;
use deadpool_postgres::{Object, Pool};
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;
use tracing::debug;

/// Calls the database routines registered for the entity
pub struct RoutineStore<R> {
    pool: Pool,
    _record: PhantomData<fn() -> R>,
}

impl<R> RoutineStore<R> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

async fn row_count(
    client: &Object,
    call: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<u64, AppError> {
    let row = client.query_one(call, params).await?;
    let count: Option<i32> = row.try_get(0)?;
    Ok(count.map(|c| c.max(0) as u64).unwrap_or(0))
}

#[async_trait]
impl<R: Record> RecordStore<R> for RoutineStore<R> {
    async fn list(&self) -> Result<Vec<R>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(R::ROUTINES.list, &[]).await?;
        rows_into(&rows)
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(R::ROUTINES.get, &[&id]).await?;
        Ok(rows.first().map(R::from_row).transpose()?)
    }

    async fn create(&self, new: &R::New) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let affected = row_count(&client, R::ROUTINES.insert, &new.params()).await?;
        debug!("add routine for {} reported {} rows", R::KIND, affected);
        Ok(affected)
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&id];
        params.extend(patch.params());
        let affected = row_count(&client, R::ROUTINES.update, &params).await?;
        debug!("update routine for {} {} reported {} rows", R::KIND, id, affected);
        Ok(affected)
    }

    async fn delete(&self, id: RecordId) -> Result<u64, AppError> {
        let client = self.pool.get().await?;
        let affected = row_count(&client, R::ROUTINES.delete, &[&id]).await?;
        debug!("delete routine for {} {} reported {} rows", R::KIND, id, affected);
        Ok(affected)
    }
}

#[async_trait]
impl BrandSearch for RoutineStore<Item> {
    async fn by_brand(&self, brand: &str) -> Result<Vec<Item>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(ITEMS_BY_BRAND_ROUTINE, &[&brand]).await?;
        rows_into(&rows)
    }
}
