//! Customer models

use super::{any_change, check, required};
use crate::db::queries;
use crate::error::AppError;
use crate::store::{Bind, IntoValid, Record, RecordId, Statements};
use serde::{Deserialize, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(
        required(message = "id is required"),
        range(min = 1, message = "id must be a positive integer")
    )]
    pub id: Option<RecordId>,

    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
}

impl IntoValid for CreateCustomerRequest {
    type Valid = NewCustomer;

    fn into_valid(self) -> Result<NewCustomer, AppError> {
        check(&self)?;
        Ok(NewCustomer {
            id: required(self.id, "id")?,
            name: required(self.name, "name")?,
        })
    }
}

impl IntoValid for UpdateCustomerRequest {
    type Valid = CustomerPatch;

    fn into_valid(self) -> Result<CustomerPatch, AppError> {
        check(&self)?;
        any_change(&[self.name.is_some()], "name")?;
        Ok(CustomerPatch { name: self.name })
    }
}

impl Bind for NewCustomer {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.id, &self.name]
    }
}

impl Bind for CustomerPatch {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.name]
    }
}

impl Record for Customer {
    type Create = CreateCustomerRequest;
    type Update = UpdateCustomerRequest;
    type New = NewCustomer;
    type Patch = CustomerPatch;

    const KIND: &'static str = "customer";
    const PLURAL: &'static str = "customers";
    const SQL: Statements = queries::CUSTOMER_SQL;
    const ROUTINES: Statements = queries::CUSTOMER_ROUTINES;

    fn new_id(new: &NewCustomer) -> RecordId {
        new.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}
