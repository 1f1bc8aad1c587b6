//! Link creation and deletion handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use linkmarks_service::LinkDraft;

use crate::dto::{CreateLinkPayload, CreatedLinkResponse, DeleteLinkPayload, DeletedLinkResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/trees/{user_id}/folders/{folder_id}/links
pub async fn create_link(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateLinkPayload>,
) -> Result<(StatusCode, Json<CreatedLinkResponse>), ApiError> {
    let url = payload.url.clone();
    let draft = LinkDraft {
        url: payload.url,
        description: payload.description,
        is_private: payload.is_private,
    };
    let created = state
        .bookmarks
        .create_link(
            user_id.into(),
            folder_id.into(),
            payload.subfolder_name.as_deref(),
            draft,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedLinkResponse {
            url,
            picture: Some(created.picture),
        }),
    ))
}

/// DELETE /api/trees/{user_id}/folders/{folder_id}/links
pub async fn delete_link(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DeleteLinkPayload>,
) -> Result<Json<DeletedLinkResponse>, ApiError> {
    // payload.picture is deliberately unused: the locator recorded in
    // the tree is the authority on which blob to delete.
    let deleted = state
        .bookmarks
        .remove_link(
            user_id.into(),
            folder_id.into(),
            payload.subfolder_name.as_deref(),
            &payload.url,
        )
        .await?;
    Ok(Json(DeletedLinkResponse { deleted }))
}
