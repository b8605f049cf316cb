//! Item models: the devices brought in for repair

use super::{any_change, check, required};
use crate::db::queries;
use crate::error::AppError;
use crate::store::{Bind, IntoValid, Record, RecordId, Statements};
use serde::{Deserialize, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use validator::Validate;

/// A device with its standard repair price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub kind: String,
    pub brand: String,
    /// Repair price in the smallest currency unit
    pub price: i64,
}

/// Request to register a new item
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    pub id: Option<RecordId>,

    #[validate(
        required(message = "kind is required"),
        length(min = 1, message = "kind must not be empty")
    )]
    pub kind: Option<String>,

    #[validate(
        required(message = "brand is required"),
        length(min = 1, message = "brand must not be empty")
    )]
    pub brand: Option<String>,

    #[validate(
        required(message = "price is required"),
        range(min = 0, message = "price must not be negative")
    )]
    pub price: Option<i64>,
}

/// Request to change an item; omitted fields keep their value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "kind must not be empty"))]
    pub kind: Option<String>,

    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: Option<String>,

    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub id: RecordId,
    pub kind: String,
    pub brand: String,
    pub price: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub kind: Option<String>,
    pub brand: Option<String>,
    pub price: Option<i64>,
}

impl IntoValid for CreateItemRequest {
    type Valid = NewItem;

    fn into_valid(self) -> Result<NewItem, AppError> {
        check(&self)?;
        Ok(NewItem {
            id: required(self.id, "id")?,
            kind: required(self.kind, "kind")?,
            brand: required(self.brand, "brand")?,
            price: required(self.price, "price")?,
        })
    }
}

impl IntoValid for UpdateItemRequest {
    type Valid = ItemPatch;

    fn into_valid(self) -> Result<ItemPatch, AppError> {
        check(&self)?;
        any_change(
            &[self.kind.is_some(), self.brand.is_some(), self.price.is_some()],
            "kind, brand, price",
        )?;
        Ok(ItemPatch {
            kind: self.kind,
            brand: self.brand,
            price: self.price,
        })
    }
}

impl Bind for NewItem {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.id, &self.kind, &self.brand, &self.price]
    }
}

impl Bind for ItemPatch {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.kind, &self.brand, &self.price]
    }
}

impl Record for Item {
    type Create = CreateItemRequest;
    type Update = UpdateItemRequest;
    type New = NewItem;
    type Patch = ItemPatch;

    const KIND: &'static str = "item";
    const PLURAL: &'static str = "items";
    const SQL: Statements = queries::ITEM_SQL;
    const ROUTINES: Statements = queries::ITEM_ROUTINES;

    fn new_id(new: &NewItem) -> RecordId {
        new.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            kind: row.try_get("kind")?,
            brand: row.try_get("brand")?,
            price: row.try_get("repair_price")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn create(body: serde_json::Value) -> Result<NewItem, AppError> {
        serde_json::from_value::<CreateItemRequest>(body)
            .unwrap()
            .into_valid()
    }

    #[test]
    fn create_accepts_complete_body() {
        let item =
            create(json!({"id": 1, "kind": "printer", "brand": "X", "price": 50000})).unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.kind, "printer");
        assert_eq!(item.brand, "X");
        assert_eq!(item.price, 50000);
    }

    #[test]
    fn create_rejects_missing_or_empty_fields() {
        for body in [
            json!({"kind": "printer", "brand": "X", "price": 1}),
            json!({"id": 1, "brand": "X", "price": 1}),
            json!({"id": 1, "kind": "", "brand": "X", "price": 1}),
            json!({"id": 1, "kind": "printer", "brand": null, "price": 1}),
            json!({"id": 1, "kind": "printer", "brand": "X"}),
            json!({"id": 0, "kind": "printer", "brand": "X", "price": 1}),
            json!({"id": 1, "kind": "printer", "brand": "X", "price": -5}),
        ] {
            let err = create(body.clone()).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        }
    }

    #[test]
    fn update_keeps_only_supplied_fields() {
        let patch = serde_json::from_value::<UpdateItemRequest>(json!({"price": 75000}))
            .unwrap()
            .into_valid()
            .unwrap();
        assert_eq!(patch.kind, None);
        assert_eq!(patch.brand, None);
        assert_eq!(patch.price, Some(75000));
        assert_eq!(patch.params().len(), 3);
    }

    #[test]
    fn update_requires_a_field() {
        let err = serde_json::from_value::<UpdateItemRequest>(json!({}))
            .unwrap()
            .into_valid()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn update_rejects_empty_brand() {
        let err = serde_json::from_value::<UpdateItemRequest>(json!({"brand": ""}))
            .unwrap()
            .into_valid()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
