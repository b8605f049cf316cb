//! Service record models
//!
//! A service record ties a customer, a technician and an item to one repair job.
//! The references are plain ids; the database foreign keys enforce them.

use super::{any_change, check, required};
use crate::db::queries;
use crate::error::AppError;
use crate::store::{Bind, IntoValid, Record, RecordId, Statements};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: RecordId,
    pub customer_id: RecordId,
    pub technician_id: RecordId,
    pub item_id: RecordId,
    pub service_date: NaiveDate,
    /// Repair duration in days
    pub repair_duration: i32,
    pub damage: String,
    pub extra_cost: i64,
    pub total_cost: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRecordRequest {
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    pub id: Option<RecordId>,

    #[validate(
        required(message = "customerId is required"),
        range(min = 1, message = "customerId must be a positive integer")
    )]
    pub customer_id: Option<RecordId>,

    #[validate(
        required(message = "technicianId is required"),
        range(min = 1, message = "technicianId must be a positive integer")
    )]
    pub technician_id: Option<RecordId>,

    #[validate(
        required(message = "itemId is required"),
        range(min = 1, message = "itemId must be a positive integer")
    )]
    pub item_id: Option<RecordId>,

    #[validate(required(message = "serviceDate is required"))]
    pub service_date: Option<NaiveDate>,

    #[validate(
        required(message = "repairDuration is required"),
        range(min = 0, message = "repairDuration must not be negative")
    )]
    pub repair_duration: Option<i32>,

    #[validate(
        required(message = "damage is required"),
        length(min = 1, message = "damage must not be empty")
    )]
    pub damage: Option<String>,

    #[validate(
        required(message = "extraCost is required"),
        range(min = 0, message = "extraCost must not be negative")
    )]
    pub extra_cost: Option<i64>,

    #[validate(
        required(message = "totalCost is required"),
        range(min = 0, message = "totalCost must not be negative")
    )]
    pub total_cost: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRecordRequest {
    #[validate(range(min = 1, message = "customerId must be a positive integer"))]
    pub customer_id: Option<RecordId>,

    #[validate(range(min = 1, message = "technicianId must be a positive integer"))]
    pub technician_id: Option<RecordId>,

    #[validate(range(min = 1, message = "itemId must be a positive integer"))]
    pub item_id: Option<RecordId>,

    pub service_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "repairDuration must not be negative"))]
    pub repair_duration: Option<i32>,

    #[validate(length(min = 1, message = "damage must not be empty"))]
    pub damage: Option<String>,

    #[validate(range(min = 0, message = "extraCost must not be negative"))]
    pub extra_cost: Option<i64>,

    #[validate(range(min = 0, message = "totalCost must not be negative"))]
    pub total_cost: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewServiceRecord {
    pub id: RecordId,
    pub customer_id: RecordId,
    pub technician_id: RecordId,
    pub item_id: RecordId,
    pub service_date: NaiveDate,
    pub repair_duration: i32,
    pub damage: String,
    pub extra_cost: i64,
    pub total_cost: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceRecordPatch {
    pub customer_id: Option<RecordId>,
    pub technician_id: Option<RecordId>,
    pub item_id: Option<RecordId>,
    pub service_date: Option<NaiveDate>,
    pub repair_duration: Option<i32>,
    pub damage: Option<String>,
    pub extra_cost: Option<i64>,
    pub total_cost: Option<i64>,
}

impl IntoValid for CreateServiceRecordRequest {
    type Valid = NewServiceRecord;

    fn into_valid(self) -> Result<NewServiceRecord, AppError> {
        check(&self)?;
        Ok(NewServiceRecord {
            id: required(self.id, "id")?,
            customer_id: required(self.customer_id, "customerId")?,
            technician_id: required(self.technician_id, "technicianId")?,
            item_id: required(self.item_id, "itemId")?,
            service_date: required(self.service_date, "serviceDate")?,
            repair_duration: required(self.repair_duration, "repairDuration")?,
            damage: required(self.damage, "damage")?,
            extra_cost: required(self.extra_cost, "extraCost")?,
            total_cost: required(self.total_cost, "totalCost")?,
        })
    }
}

impl IntoValid for UpdateServiceRecordRequest {
    type Valid = ServiceRecordPatch;

    fn into_valid(self) -> Result<ServiceRecordPatch, AppError> {
        check(&self)?;
        any_change(
            &[
                self.customer_id.is_some(),
                self.technician_id.is_some(),
                self.item_id.is_some(),
                self.service_date.is_some(),
                self.repair_duration.is_some(),
                self.damage.is_some(),
                self.extra_cost.is_some(),
                self.total_cost.is_some(),
            ],
            "customerId, technicianId, itemId, serviceDate, repairDuration, damage, extraCost, \
             totalCost",
        )?;
        Ok(ServiceRecordPatch {
            customer_id: self.customer_id,
            technician_id: self.technician_id,
            item_id: self.item_id,
            service_date: self.service_date,
            repair_duration: self.repair_duration,
            damage: self.damage,
            extra_cost: self.extra_cost,
            total_cost: self.total_cost,
        })
    }
}

impl Bind for NewServiceRecord {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.id,
            &self.customer_id,
            &self.technician_id,
            &self.item_id,
            &self.service_date,
            &self.repair_duration,
            &self.damage,
            &self.extra_cost,
            &self.total_cost,
        ]
    }
}

impl Bind for ServiceRecordPatch {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.customer_id,
            &self.technician_id,
            &self.item_id,
            &self.service_date,
            &self.repair_duration,
            &self.damage,
            &self.extra_cost,
            &self.total_cost,
        ]
    }
}

impl Record for ServiceRecord {
    type Create = CreateServiceRecordRequest;
    type Update = UpdateServiceRecordRequest;
    type New = NewServiceRecord;
    type Patch = ServiceRecordPatch;

    const KIND: &'static str = "service record";
    const PLURAL: &'static str = "service records";
    const SQL: Statements = queries::SERVICE_RECORD_SQL;
    const ROUTINES: Statements = queries::SERVICE_RECORD_ROUTINES;

    fn new_id(new: &NewServiceRecord) -> RecordId {
        new.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            technician_id: row.try_get("technician_id")?,
            item_id: row.try_get("item_id")?,
            service_date: row.try_get("service_date")?,
            repair_duration: row.try_get("repair_duration")?,
            damage: row.try_get("damage")?,
            extra_cost: row.try_get("extra_cost")?,
            total_cost: row.try_get("total_cost")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_body() -> serde_json::Value {
        json!({
            "id": 10,
            "customerId": 1,
            "technicianId": 2,
            "itemId": 3,
            "serviceDate": "2024-03-15",
            "repairDuration": 4,
            "damage": "cracked screen",
            "extraCost": 0,
            "totalCost": 150000
        })
    }

    #[test]
    fn create_parses_camel_case_body() {
        let record = serde_json::from_value::<CreateServiceRecordRequest>(full_body())
            .unwrap()
            .into_valid()
            .unwrap();
        assert_eq!(record.service_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.damage, "cracked screen");
        assert_eq!(record.extra_cost, 0);
        assert_eq!(record.params().len(), 9);
    }

    #[test]
    fn create_requires_every_field() {
        for field in [
            "id",
            "customerId",
            "technicianId",
            "itemId",
            "serviceDate",
            "repairDuration",
            "damage",
            "extraCost",
            "totalCost",
        ] {
            let mut body = full_body();
            body.as_object_mut().unwrap().remove(field);
            let result = serde_json::from_value::<CreateServiceRecordRequest>(body)
                .unwrap()
                .into_valid();
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "missing {} should be rejected",
                field
            );
        }
    }

    #[test]
    fn update_accepts_damage_only() {
        let patch = serde_json::from_value::<UpdateServiceRecordRequest>(
            json!({"damage": "water damage"}),
        )
        .unwrap()
        .into_valid()
        .unwrap();
        assert_eq!(patch.damage.as_deref(), Some("water damage"));
        assert_eq!(patch.total_cost, None);
        assert_eq!(patch.params().len(), 8);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = ServiceRecord {
            id: 1,
            customer_id: 2,
            technician_id: 3,
            item_id: 4,
            service_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            repair_duration: 2,
            damage: "broken hinge".to_string(),
            extra_cost: 5000,
            total_cost: 55000,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["customerId"], 2);
        assert_eq!(value["serviceDate"], "2024-01-31");
        assert_eq!(value["totalCost"], 55000);
    }
}
