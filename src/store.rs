//! Record storage
//!
//! Every entity goes through the same five operations. Two interchangeable
//! strategies implement them: [`SqlStore`] issues statements directly against
//! the tables, [`RoutineStore`] calls the stored routines that wrap the same
//! logic on the database side.

#[cfg(test)]
pub mod memory;
pub mod routine;
pub mod sql;

pub use routine::RoutineStore;
pub use sql::SqlStore;

use crate::error::AppError;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Primary key shared by all records
pub type RecordId = i32;

/// Statement text for one entity under one strategy.
///
/// `get`, `update` and `delete` take the record id as `$1`. `update` takes the
/// patch columns after it, `insert` takes the new record's columns in order.
#[derive(Debug, Clone, Copy)]
pub struct Statements {
    pub list: &'static str,
    pub get: &'static str,
    pub insert: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// Values that bind positionally into a statement
pub trait Bind {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)>;
}

/// A request body that becomes a database-ready value once validated
pub trait IntoValid {
    type Valid;

    fn into_valid(self) -> Result<Self::Valid, AppError>;
}

/// An entity kind the API exposes
pub trait Record: Serialize + Send + Sync + Sized + 'static {
    /// Body accepted by create
    type Create: DeserializeOwned + Send + IntoValid<Valid = Self::New>;
    /// Body accepted by update
    type Update: DeserializeOwned + Send + IntoValid<Valid = Self::Patch>;
    /// Validated record to insert
    type New: Bind + Send + Sync;
    /// Validated partial update; `None` columns keep their stored value
    type Patch: Bind + Send + Sync;

    /// Singular name used in response messages
    const KIND: &'static str;
    /// Plural name used in response messages
    const PLURAL: &'static str;
    const SQL: Statements;
    const ROUTINES: Statements;

    fn new_id(new: &Self::New) -> RecordId;

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;
}

/// The per-entity operation set both strategies implement.
///
/// Write operations return the affected-row count.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, AppError>;

    async fn find(&self, id: RecordId) -> Result<Option<R>, AppError>;

    async fn create(&self, new: &R::New) -> Result<u64, AppError>;

    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<u64, AppError>;

    async fn delete(&self, id: RecordId) -> Result<u64, AppError>;
}

/// Item lookup by brand
#[async_trait]
pub trait BrandSearch: Send + Sync {
    async fn by_brand(&self, brand: &str) -> Result<Vec<crate::models::Item>, AppError>;
}

fn rows_into<R: Record>(rows: &[Row]) -> Result<Vec<R>, AppError> {
    rows.iter()
        .map(|row| R::from_row(row).map_err(AppError::from))
        .collect()
}
