//! Tree, folder and subfolder handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use linkmarks_entity::{BookmarkTree, Folder, Subfolder};

use crate::dto::{NamePayload, RemovalResponse, RenamePayload, RenameSubfolderPayload};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/trees/{user_id}
pub async fn create_tree(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<BookmarkTree>), ApiError> {
    let tree = state.bookmarks.create_tree(user_id.into()).await?;
    Ok((StatusCode::CREATED, Json(tree)))
}

/// GET /api/trees/{user_id}
pub async fn get_tree(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BookmarkTree>, ApiError> {
    let tree = state.bookmarks.get_tree(user_id.into()).await?;
    Ok(Json(tree))
}

/// POST /api/trees/{user_id}/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<NamePayload>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let folder = state
        .bookmarks
        .add_folder(user_id.into(), &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// PATCH /api/trees/{user_id}/folders/{folder_id}
pub async fn rename_folder(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RenamePayload>,
) -> Result<StatusCode, ApiError> {
    state
        .bookmarks
        .rename_folder(user_id.into(), folder_id.into(), &payload.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/trees/{user_id}/folders/{folder_id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemovalResponse>, ApiError> {
    let outcome = state
        .bookmarks
        .remove_folder(user_id.into(), folder_id.into())
        .await?;
    Ok(Json(RemovalResponse {
        blobs_deleted: outcome.blobs_deleted,
        blobs_failed: outcome.blobs_failed,
    }))
}

/// POST /api/trees/{user_id}/folders/{folder_id}/subfolders
pub async fn create_subfolder(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NamePayload>,
) -> Result<(StatusCode, Json<Subfolder>), ApiError> {
    let subfolder = state
        .bookmarks
        .add_subfolder(user_id.into(), folder_id.into(), &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(subfolder)))
}

/// PATCH /api/trees/{user_id}/folders/{folder_id}/subfolders
pub async fn rename_subfolder(
    State(state): State<AppState>,
    Path((user_id, folder_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RenameSubfolderPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .bookmarks
        .rename_subfolder(
            user_id.into(),
            folder_id.into(),
            &payload.old_name,
            &payload.new_name,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/trees/{user_id}/folders/{folder_id}/subfolders/{name}
pub async fn delete_subfolder(
    State(state): State<AppState>,
    Path((user_id, folder_id, name)): Path<(Uuid, Uuid, String)>,
) -> Result<Json<RemovalResponse>, ApiError> {
    let outcome = state
        .bookmarks
        .remove_subfolder(user_id.into(), folder_id.into(), &name)
        .await?;
    Ok(Json(RemovalResponse {
        blobs_deleted: outcome.blobs_deleted,
        blobs_failed: outcome.blobs_failed,
    }))
}
