//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the record types and the request/response structures used by the API.

pub mod customer;
pub mod item;
pub mod service_record;
pub mod technician;

// Re-export commonly used types
pub use customer::*;
pub use item::*;
pub use service_record::*;
pub use technician::*;

use crate::error::{validation_error, AppError};
use serde::Serialize;
use validator::Validate;

/// Message-only response (no data)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Either the requested data or a message explaining why there is none
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Found<T: Serialize> {
    Data(T),
    Missing(MessageResponse),
}

impl<T: Serialize> Found<T> {
    pub fn missing(message: impl Into<String>) -> Self {
        Found::Missing(MessageResponse::new(message))
    }
}

/// Run the derived validators and turn failures into a 400
pub(crate) fn check(payload: &impl Validate) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| validation_error(e.to_string()))
}

/// Unwrap a field the validators already required
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| validation_error(format!("{} is required", field)))
}

/// Reject an update that names no field to change
pub(crate) fn any_change(present: &[bool], fields: &str) -> Result<(), AppError> {
    if present.iter().any(|p| *p) {
        Ok(())
    } else {
        Err(validation_error(format!(
            "At least one of {} must be provided",
            fields
        )))
    }
}
