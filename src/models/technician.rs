//! Technician models

use super::{any_change, check, required};
use crate::db::queries;
use crate::error::AppError;
use crate::store::{Bind, IntoValid, Record, RecordId, Statements};
use serde::{Deserialize, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTechnicianRequest {
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
pub struct UpdateTechnicianRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTechnician {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TechnicianPatch {
    pub name: Option<String>,
}

impl IntoValid for CreateTechnicianRequest {
    type Valid = NewTechnician;

    fn into_valid(self) -> Result<NewTechnician, AppError> {
        check(&self)?;
        Ok(NewTechnician {
            id: required(self.id, "id")?,
            name: required(self.name, "name")?,
        })
    }
}

impl IntoValid for UpdateTechnicianRequest {
    type Valid = TechnicianPatch;

    fn into_valid(self) -> Result<TechnicianPatch, AppError> {
        check(&self)?;
        any_change(&[self.name.is_some()], "name")?;
        Ok(TechnicianPatch { name: self.name })
    }
}

impl Bind for NewTechnician {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.id, &self.name]
    }
}

impl Bind for TechnicianPatch {
    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![&self.name]
    }
}

impl Record for Technician {
    type Create = CreateTechnicianRequest;
    type Update = UpdateTechnicianRequest;
    type New = NewTechnician;
    type Patch = TechnicianPatch;

    const KIND: &'static str = "technician";
    const PLURAL: &'static str = "technicians";
    const SQL: Statements = queries::TECHNICIAN_SQL;
    const ROUTINES: Statements = queries::TECHNICIAN_ROUTINES;

    fn new_id(new: &NewTechnician) -> RecordId {
        new.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}
