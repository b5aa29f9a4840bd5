//! CRUD handlers, generic over the record type.

use crate::errors::RecordError;
use crate::models::{DeleteResponse, Record};
use crate::store::RecordStore;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// `GET /api/{collection}`
#[instrument(skip_all, fields(collection = T::COLLECTION))]
pub async fn list_records<T: Record>(
    State(store): State<Arc<RecordStore<T>>>,
) -> Result<Json<Vec<T>>, RecordError> {
    let records = store.list()?;
    debug!(target: "records.handlers", count = records.len(), "Listed records");
    Ok(Json(records))
}

/// `GET /api/{collection}/:id`
#[instrument(skip_all, fields(collection = T::COLLECTION, id = id))]
pub async fn get_record<T: Record>(
    State(store): State<Arc<RecordStore<T>>>,
    Path(id): Path<i64>,
) -> Result<Json<T>, RecordError> {
    Ok(Json(store.get(id)?))
}

/// `POST /api/{collection}`
///
/// Returns 201 with the stored record, including its assigned id.
#[instrument(skip_all, fields(collection = T::COLLECTION))]
pub async fn create_record<T: Record>(
    State(store): State<Arc<RecordStore<T>>>,
    Json(new): Json<T::New>,
) -> Result<(StatusCode, Json<T>), RecordError> {
    let record = store.insert(new)?;
    info!(target: "records.handlers", id = record.id(), "Created {}", T::LABEL);
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/{collection}/:id`
///
/// Only the fields present in the body are changed.
#[instrument(skip_all, fields(collection = T::COLLECTION, id = id))]
pub async fn update_record<T: Record>(
    State(store): State<Arc<RecordStore<T>>>,
    Path(id): Path<i64>,
    Json(update): Json<T::Update>,
) -> Result<Json<T>, RecordError> {
    let record = store.update(id, update)?;
    info!(target: "records.handlers", id, "Updated {}", T::LABEL);
    Ok(Json(record))
}

/// `DELETE /api/{collection}/:id`
#[instrument(skip_all, fields(collection = T::COLLECTION, id = id))]
pub async fn delete_record<T: Record>(
    State(store): State<Arc<RecordStore<T>>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, RecordError> {
    store.delete(id)?;
    info!(target: "records.handlers", id, "Deleted {}", T::LABEL);
    Ok(Json(DeleteResponse {
        message: format!("{} deleted successfully", T::LABEL),
    }))
}

/// `GET /health`
pub async fn health_check() -> &'static str {
    "OK"
}
