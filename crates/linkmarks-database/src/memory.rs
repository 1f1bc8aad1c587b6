//! In-memory tree store for tests and local development.
//!
//! Documents live in a [`DashMap`]; a mutation holds the entry's shard
//! lock for the duration of the (synchronous, cheap) structural change,
//! which serializes mutations per user.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use linkmarks_core::error::AppError;
use linkmarks_core::result::AppResult;
use linkmarks_core::types::{FolderId, UserId};
use linkmarks_entity::{BookmarkTree, Folder, Link, Subfolder};

use crate::store::TreeStore;

/// Tree store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    trees: DashMap<Uuid, BookmarkTree>,
}

impl MemoryTreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<R>(
        &self,
        user_id: UserId,
        op: impl FnOnce(&mut BookmarkTree) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut entry = self
            .trees
            .get_mut(user_id.as_uuid())
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        op(entry.value_mut())
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn create(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        match self.trees.entry(user_id.into_uuid()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "tree for user {user_id} already exists"
            ))),
            Entry::Vacant(slot) => {
                let tree = BookmarkTree::seeded(user_id);
                slot.insert(tree.clone());
                Ok(tree)
            }
        }
    }

    async fn get(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        let mut tree = self
            .trees
            .get(user_id.as_uuid())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        tree.sort_folders();
        Ok(tree)
    }

    async fn add_folder(&self, user_id: UserId, name: &str) -> AppResult<Folder> {
        self.mutate(user_id, |tree| tree.add_folder(name))
    }

    async fn rename_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<()> {
        self.mutate(user_id, |tree| tree.rename_folder(folder_id, new_name))
    }

    async fn remove_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Vec<String>> {
        self.mutate(user_id, |tree| tree.remove_folder(folder_id))
    }

    async fn add_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Subfolder> {
        self.mutate(user_id, |tree| tree.add_subfolder(folder_id, name))
    }

    async fn rename_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()> {
        self.mutate(user_id, |tree| {
            tree.rename_subfolder(folder_id, old_name, new_name)
        })
    }

    async fn remove_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Vec<String>> {
        self.mutate(user_id, |tree| tree.remove_subfolder(folder_id, name))
    }

    async fn add_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        link: Link,
    ) -> AppResult<()> {
        self.mutate(user_id, |tree| tree.add_link(folder_id, subfolder, link))
    }

    async fn remove_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<Option<Link>> {
        self.mutate(user_id, |tree| tree.remove_link(folder_id, subfolder, url))
    }
}

#[cfg(test)]
mod tests {
    use linkmarks_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn create_is_conflict_when_tree_exists() {
        let store = MemoryTreeStore::new();
        let user = UserId::new();
        store.create(user).await.unwrap();
        assert_eq!(store.create(user).await.unwrap_err().kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn get_returns_folders_sorted_by_name() {
        let store = MemoryTreeStore::new();
        let user = UserId::new();
        store.create(user).await.unwrap();
        store.add_folder(user, "zeta").await.unwrap();
        store.add_folder(user, "alpha").await.unwrap();
        store.add_folder(user, "mu").await.unwrap();

        let tree = store.get(user).await.unwrap();
        let names: Vec<&str> = tree.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["alpha", "favoritos", "mu", "zeta"]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = MemoryTreeStore::new();
        assert_eq!(
            store.get(UserId::new()).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            store.add_folder(UserId::new(), "x").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
