//! Route table wiring handlers to the shared state.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, link, tree};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let trees = Router::new()
        .route("/{user_id}", post(tree::create_tree).get(tree::get_tree))
        .route("/{user_id}/folders", post(tree::create_folder))
        .route(
            "/{user_id}/folders/{folder_id}",
            axum::routing::patch(tree::rename_folder).delete(tree::delete_folder),
        )
        .route(
            "/{user_id}/folders/{folder_id}/subfolders",
            post(tree::create_subfolder).patch(tree::rename_subfolder),
        )
        .route(
            "/{user_id}/folders/{folder_id}/subfolders/{name}",
            delete(tree::delete_subfolder),
        )
        .route(
            "/{user_id}/folders/{folder_id}/links",
            post(link::create_link).delete(link::delete_link),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/trees", trees)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
