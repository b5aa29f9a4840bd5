//! HTTP routes for a records collection.

use crate::handlers;
use crate::models::Record;
use crate::store::RecordStore;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router serving `T`'s collection under `/api`.
pub fn build_routes<T: Record>(store: Arc<RecordStore<T>>) -> Router {
    let collection = format!("/api/{}", T::COLLECTION);
    let item = format!("{}/:id", collection);

    Router::new()
        .route(
            &collection,
            get(handlers::list_records::<T>).post(handlers::create_record::<T>),
        )
        .route(
            &item,
            get(handlers::get_record::<T>)
                .put(handlers::update_record::<T>)
                .delete(handlers::delete_record::<T>),
        )
        .route("/health", get(handlers::health_check))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}
