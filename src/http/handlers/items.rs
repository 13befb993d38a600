//! `/shoppinglists/{id}/items` and `/shoppinglists/{id}/items/{name}`.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::http::payload::{decode, items_by_name, ItemBody, ItemView, NewItemBody};
use crate::http::request::{parse_list_id, Preconditions};
use crate::http::response::{created, read_response, written, ApiError};
use crate::http::server::AppState;
use crate::store::ItemDraft;

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    /// Exact status to keep; empty means no filter.
    pub status: Option<String>,
}

/// `GET /shoppinglists/{id}/items[?status=]`
pub async fn get_items(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<ItemsQuery>,
    conditions: Preconditions,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let status = query.status.as_deref().filter(|status| !status.is_empty());
    let read = state
        .store
        .items(id, status, conditions.if_none_match())?
        .map(items_by_name);
    Ok(read_response("items", read))
}

/// `GET /shoppinglists/{id}/items/{name}`, also served at
/// `/shoppinglists/{id}/{name}`, the item `Location`.
pub async fn get_item(
    State(state): State<AppState>,
    Path((raw_id, name)): Path<(String, String)>,
    conditions: Preconditions,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let read = state
        .store
        .item(id, &name, conditions.if_none_match())?
        .map(|item| items_by_name([item]));
    Ok(read_response("item", read))
}

/// `POST /shoppinglists/{id}/items`
pub async fn create_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let (name, draft) = decode::<NewItemBody>(&body)?.into_parts();
    let view = ItemView::from(&draft);

    let etag = state.store.create_item(id, &name, draft)?;
    tracing::info!(list_id = %id, item = %name, etag = %etag, "Item created");

    let location = state.locator.item(id, &name);
    Ok(created(etag, location, BTreeMap::from([(name, view)])))
}

/// `PUT /shoppinglists/{id}/items/{name}`
pub async fn update_item(
    State(state): State<AppState>,
    Path((raw_id, name)): Path<(String, String)>,
    conditions: Preconditions,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let draft = ItemDraft::from(decode::<ItemBody>(&body)?);

    let etag = state
        .store
        .update_item(id, &name, draft, conditions.if_match())
        .map_err(ApiError::on("item"))?;
    tracing::debug!(list_id = %id, item = %name, etag = %etag, "Item updated");

    Ok(written(StatusCode::OK, etag))
}

/// `DELETE /shoppinglists/{id}/items/{name}`
pub async fn delete_item(
    State(state): State<AppState>,
    Path((raw_id, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    state.store.delete_item(id, &name)?;
    tracing::info!(list_id = %id, item = %name, "Item deleted");
    Ok(StatusCode::OK.into_response())
}
