//! In-memory record store for handler tests

use super::{BrandSearch, Record, RecordId, RecordStore};
use crate::error::AppError;
use crate::models::*;
use crate::state::Backend;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// What the memory store needs to emulate inserts and partial updates
pub trait MemoryRecord: Record + Clone {
    fn id(&self) -> RecordId;
    fn build(new: &Self::New) -> Self;
    fn apply(&mut self, patch: &Self::Patch);
}

pub struct MemoryStore<R> {
    rows: Mutex<BTreeMap<RecordId, R>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl<R: MemoryRecord> RecordStore<R> for MemoryStore<R> {
    async fn list(&self) -> Result<Vec<R>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().cloned().collect())
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).cloned())
    }

    async fn create(&self, new: &R::New) -> Result<u64, AppError> {
        let record = R::build(new);
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                R::KIND,
                record.id()
            )));
        }
        rows.insert(record.id(), record);
        Ok(1)
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(record) => {
                record.apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&id).map(|_| 1).unwrap_or(0))
    }
}

#[async_trait]
impl BrandSearch for MemoryStore<Item> {
    async fn by_brand(&self, brand: &str) -> Result<Vec<Item>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().filter(|i| i.brand == brand).cloned().collect())
    }
}

/// A backend whose stores all live in memory
pub fn backend() -> Backend {
    let items = Arc::new(MemoryStore::<Item>::new());

    Backend {
        items: items.clone(),
        item_search: items,
        customers: Arc::new(MemoryStore::<Customer>::new()),
        technicians: Arc::new(MemoryStore::<Technician>::new()),
        service_records: Arc::new(MemoryStore::<ServiceRecord>::new()),
    }
}

impl MemoryRecord for Item {
    fn id(&self) -> RecordId {
        self.id
    }

    fn build(new: &NewItem) -> Self {
        Self {
            id: new.id,
            kind: new.kind.clone(),
            brand: new.brand.clone(),
            price: new.price,
        }
    }

    fn apply(&mut self, patch: &ItemPatch) {
        if let Some(kind) = &patch.kind {
            self.kind = kind.clone();
        }
        if let Some(brand) = &patch.brand {
            self.brand = brand.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

impl MemoryRecord for Customer {
    fn id(&self) -> RecordId {
        self.id
    }

    fn build(new: &NewCustomer) -> Self {
        Self {
            id: new.id,
            name: new.name.clone(),
        }
    }

    fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

impl MemoryRecord for Technician {
    fn id(&self) -> RecordId {
        self.id
    }

    fn build(new: &NewTechnician) -> Self {
        Self {
            id: new.id,
            name: new.name.clone(),
        }
    }

    fn apply(&mut self, patch: &TechnicianPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

impl MemoryRecord for ServiceRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn build(new: &NewServiceRecord) -> Self {
        Self {
            id: new.id,
            customer_id: new.customer_id,
            technician_id: new.technician_id,
            item_id: new.item_id,
            service_date: new.service_date,
            repair_duration: new.repair_duration,
            damage: new.damage.clone(),
            extra_cost: new.extra_cost,
            total_cost: new.total_cost,
        }
    }

    fn apply(&mut self, patch: &ServiceRecordPatch) {
        if let Some(v) = patch.customer_id {
            self.customer_id = v;
        }
        if let Some(v) = patch.technician_id {
            self.technician_id = v;
        }
        if let Some(v) = patch.item_id {
            self.item_id = v;
        }
        if let Some(v) = patch.service_date {
            self.service_date = v;
        }
        if let Some(v) = patch.repair_duration {
            self.repair_duration = v;
        }
        if let Some(damage) = &patch.damage {
            self.damage = damage.clone();
        }
        if let Some(v) = patch.extra_cost {
            self.extra_cost = v;
        }
        if let Some(v) = patch.total_cost {
            self.total_cost = v;
        }
    }
}
