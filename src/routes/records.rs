//! Record route handlers
//!
//! One generic handler set serves every entity. The store a router is built
//! with decides whether requests run as direct statements or routine calls.

use crate::error::{ApiResult, AppError};
use crate::models::{Found, Item, MessageResponse};
use crate::store::{BrandSearch, IntoValid, Record, RecordId, RecordStore};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Store handed to the handlers of one entity
pub type Store<R> = Arc<dyn RecordStore<R>>;

/// Routes for one entity mounted at `base`, e.g. `/items`
pub fn record_routes<R: Record>(base: &str, store: Store<R>) -> Router {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/{{id}}", base),
            get(fetch::<R>).put(update::<R>).delete(remove::<R>),
        )
        .with_state(store)
}

/// Brand lookup mounted at `<base>/brand/{brand}`
pub fn brand_routes(base: &str, search: Arc<dyn BrandSearch>) -> Router {
    Router::new()
        .route(&format!("{}/brand/{{brand}}", base), get(by_brand))
        .with_state(search)
}

/// List all records of one kind
pub async fn list<R: Record>(State(store): State<Store<R>>) -> ApiResult<Json<Found<Vec<R>>>> {
    debug!("Listing {}", R::PLURAL);

    let records = store.list().await?;
    if records.is_empty() {
        return Ok(Json(Found::missing(format!("no {} found", R::PLURAL))));
    }

    debug!("Listed {} {}", records.len(), R::PLURAL);
    Ok(Json(Found::Data(records)))
}

/// Get a single record by id
pub async fn fetch<R: Record>(
    State(store): State<Store<R>>,
    WithRejection(Path(id), _): WithRejection<Path<RecordId>, AppError>,
) -> ApiResult<Json<Found<R>>> {
    debug!("Getting {} {}", R::KIND, id);

    match store.find(id).await? {
        Some(record) => Ok(Json(Found::Data(record))),
        None => Ok(Json(Found::missing(format!("id {} not found", id)))),
    }
}

/// Insert a new record
pub async fn create<R: Record>(
    State(store): State<Store<R>>,
    WithRejection(Json(payload), _): WithRejection<Json<R::Create>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    let new = payload.into_valid()?;
    let id = R::new_id(&new);
    debug!("Creating {} {}", R::KIND, id);

    if store.create(&new).await? > 0 {
        info!("{} {} created", R::KIND, id);
        Ok(Json(MessageResponse::new(format!(
            "{} added with id {}",
            R::KIND,
            id
        ))))
    } else {
        warn!("Insert of {} {} reported no affected rows", R::KIND, id);
        Ok(Json(MessageResponse::new(format!("failed to add {}", R::KIND))))
    }
}

/// Change the supplied fields of a record
pub async fn update<R: Record>(
    State(store): State<Store<R>>,
    WithRejection(Path(id), _): WithRejection<Path<RecordId>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<R::Update>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    let patch = payload.into_valid()?;
    debug!("Updating {} {}", R::KIND, id);

    let message = if store.update(id, &patch).await? > 0 {
        info!("{} {} updated", R::KIND, id);
        format!("{} {} updated", R::KIND, id)
    } else {
        format!("{} {} not found or unchanged", R::KIND, id)
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Delete a record
pub async fn remove<R: Record>(
    State(store): State<Store<R>>,
    WithRejection(Path(id), _): WithRejection<Path<RecordId>, AppError>,
) -> ApiResult<Json<MessageResponse>> {
    debug!("Deleting {} {}", R::KIND, id);

    let message = if store.delete(id).await? > 0 {
        info!("{} {} deleted", R::KIND, id);
        format!("{} {} deleted", R::KIND, id)
    } else {
        format!("{} {} not found", R::KIND, id)
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Items of one brand
pub async fn by_brand(
    State(search): State<Arc<dyn BrandSearch>>,
    WithRejection(Path(brand), _): WithRejection<Path<String>, AppError>,
) -> ApiResult<Json<Found<Vec<Item>>>> {
    debug!("Filtering items by brand '{}'", brand);

    let items = search.by_brand(&brand).await?;
    if items.is_empty() {
        return Ok(Json(Found::missing(format!(
            "no items found with brand {}",
            brand
        ))));
    }

    Ok(Json(Found::Data(items)))
}
