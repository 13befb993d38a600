//! `/shoppinglists` and `/shoppinglists/{id}`.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::payload::{decode, ListBody, ListPatchBody, ListView};
use crate::http::request::{parse_list_id, Preconditions};
use crate::http::response::{created, read_response, written, ApiError};
use crate::http::server::AppState;
use crate::store::{ListDraft, ListPatch};

/// `GET /shoppinglists`
pub async fn get_lists(State(state): State<AppState>, conditions: Preconditions) -> Response {
    let read = state.store.lists(conditions.if_none_match()).map(|lists| {
        lists
            .into_iter()
            .map(|(id, list)| (id.0, ListView::from(list)))
            .collect::<BTreeMap<_, _>>()
    });
    read_response("collection", read)
}

/// `GET /shoppinglists/{id}`
pub async fn get_list(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    conditions: Preconditions,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let read = state
        .store
        .list(id, conditions.if_none_match())?
        .map(|list| BTreeMap::from([(id.0, ListView::from(list))]));
    Ok(read_response("list", read))
}

/// `POST /shoppinglists`
pub async fn create_list(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let draft = ListDraft::from(decode::<ListBody>(&body)?);
    let view = ListView::from(&draft);

    let new = state.store.create_list(draft)?;
    tracing::info!(list_id = %new.id, etag = %new.etag, "Shopping list created");

    Ok(created(
        new.etag,
        state.locator.list(new.id),
        BTreeMap::from([(new.id.0, view)]),
    ))
}

/// `PUT /shoppinglists/{id}`
pub async fn replace_list(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    conditions: Preconditions,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let draft = ListDraft::from(decode::<ListBody>(&body)?);

    let etag = state
        .store
        .replace_list(id, draft, conditions.if_match())
        .map_err(ApiError::on("list"))?;
    tracing::debug!(list_id = %id, etag = %etag, "Shopping list replaced");

    Ok(written(StatusCode::NO_CONTENT, etag))
}

/// `PATCH /shoppinglists/{id}`
pub async fn patch_list(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    conditions: Preconditions,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    let patch = ListPatch::from(decode::<ListPatchBody>(&body)?);

    let etag = state
        .store
        .patch_list(id, patch, conditions.if_match())
        .map_err(ApiError::on("list"))?;
    tracing::debug!(list_id = %id, etag = %etag, "Shopping list patched");

    Ok(written(StatusCode::OK, etag))
}

/// `DELETE /shoppinglists/{id}`
pub async fn delete_list(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_list_id(&raw_id)?;
    state.store.delete_list(id)?;
    tracing::info!(list_id = %id, "Shopping list deleted");
    Ok(StatusCode::OK.into_response())
}
