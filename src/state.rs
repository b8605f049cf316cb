//! Application state management
//!
//! Holds the record stores for both API surfaces. Stores are built once from
//! the pool and passed to the routers; handlers never look anything up.

use crate::models::{Customer, Item, ServiceRecord, Technician};
use crate::store::{BrandSearch, RecordStore, RoutineStore, SqlStore};
use deadpool_postgres::Pool;
use std::sync::Arc;

/// One complete set of stores, all using the same strategy
pub struct Backend {
    pub items: Arc<dyn RecordStore<Item>>,
    pub item_search: Arc<dyn BrandSearch>,
    pub customers: Arc<dyn RecordStore<Customer>>,
    pub technicians: Arc<dyn RecordStore<Technician>>,
    pub service_records: Arc<dyn RecordStore<ServiceRecord>>,
}

impl Backend {
    /// Stores that run statements against the tables
    pub fn direct(pool: &Pool) -> Self {
        let items = Arc::new(SqlStore::<Item>::new(pool.clone()));

        Self {
            items: items.clone(),
            item_search: items,
            customers: Arc::new(SqlStore::<Customer>::new(pool.clone())),
            technicians: Arc::new(SqlStore::<Technician>::new(pool.clone())),
            service_records: Arc::new(SqlStore::<ServiceRecord>::new(pool.clone())),
        }
    }

    /// Stores that call the stored routines
    pub fn routines(pool: &Pool) -> Self {
        let items = Arc::new(RoutineStore::<Item>::new(pool.clone()));

        Self {
            items: items.clone(),
            item_search: items,
            customers: Arc::new(RoutineStore::<Customer>::new(pool.clone())),
            technicians: Arc::new(RoutineStore::<Technician>::new(pool.clone())),
            service_records: Arc::new(RoutineStore::<ServiceRecord>::new(pool.clone())),
        }
    }
}

/// Application state shared across all routers
pub struct AppState {
    /// Direct statement surface (`/items`, ...)
    pub direct: Backend,

    /// Stored routine surface (`/procedures/items`, ...)
    pub procedures: Backend,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        Self {
            direct: Backend::direct(&pool),
            procedures: Backend::routines(&pool),
        }
    }
}
