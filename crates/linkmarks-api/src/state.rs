use std::sync::Arc;

use linkmarks_service::BookmarkService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub bookmarks: Arc<BookmarkService>,
}

impl AppState {
    pub fn new(bookmarks: Arc<BookmarkService>) -> Self {
        Self { bookmarks }
    }
}
