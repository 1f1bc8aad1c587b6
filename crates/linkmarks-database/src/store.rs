//! The tree store trait.

use async_trait::async_trait;

use linkmarks_core::result::AppResult;
use linkmarks_core::types::{FolderId, UserId};
use linkmarks_entity::{BookmarkTree, Folder, Link, Subfolder};

/// Per-user bookmark document store.
///
/// Every mutation is a read-modify-write of one document; implementations
/// must serialize mutations per user so that two racing mutations cannot
/// lose updates. Cross-user operations need no coordination.
///
/// Removal operations are two-phase by contract: they return the blob
/// locators owned by the removed subtree so the orchestrator can delete
/// the blobs, and prune the tree entry in the same call.
#[async_trait]
pub trait TreeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Seed the root document for `user_id` with the default folder.
    /// `Conflict` when a document already exists.
    async fn create(&self, user_id: UserId) -> AppResult<BookmarkTree>;

    /// Return the full tree with folders sorted ascending by name.
    async fn get(&self, user_id: UserId) -> AppResult<BookmarkTree>;

    /// Append a new empty folder; returns the created folder.
    async fn add_folder(&self, user_id: UserId, name: &str) -> AppResult<Folder>;

    /// Rename the folder matched by `folder_id`.
    async fn rename_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<()>;

    /// Remove a folder and return the blob locators its subtree owned.
    async fn remove_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Vec<String>>;

    /// Append a new empty subfolder under `folder_id`.
    async fn add_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Subfolder>;

    /// Rename the subfolder matched by `(folder_id, old_name)`.
    async fn rename_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()>;

    /// Remove a subfolder and return the blob locators its links owned.
    async fn remove_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Vec<String>>;

    /// Append a link to a folder, or to the named subfolder under it.
    async fn add_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        link: Link,
    ) -> AppResult<()>;

    /// Remove the first link matching `url` within the given scope and
    /// return it, or `None` when no link matched.
    async fn remove_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<Option<Link>>;
}
