//! PostgreSQL tree store: one JSONB document per user.
//!
//! Mutations run inside a transaction that locks the user's row with
//! `SELECT ... FOR UPDATE`, so read-modify-write cycles for one user are
//! serialized at the storage layer and racing mutations cannot lose
//! updates. The structural changes themselves are the pure operations
//! defined on [`BookmarkTree`].

use async_trait::async_trait;
use sqlx::PgPool;

use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::types::{FolderId, UserId};
use linkmarks_entity::{BookmarkTree, Folder, Link, Subfolder};

use crate::store::TreeStore;

/// Tree store backed by the `bookmark_trees` table.
#[derive(Debug, Clone)]
pub struct PgTreeStore {
    pool: PgPool,
}

impl PgTreeStore {
    /// Create a new store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load, mutate, and write back one user's document atomically.
    async fn mutate<R, F>(&self, user_id: UserId, op: F) -> AppResult<R>
    where
        R: Send,
        F: FnOnce(&mut BookmarkTree) -> AppResult<R> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM bookmark_trees WHERE user_id = $1 FOR UPDATE")
                .bind(user_id.into_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load tree", e)
                })?;

        let doc = doc.ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        let mut tree: BookmarkTree = serde_json::from_value(doc)?;

        // An op error rolls the transaction back on drop; nothing applies.
        let out = op(&mut tree)?;

        sqlx::query("UPDATE bookmark_trees SET doc = $2 WHERE user_id = $1")
            .bind(user_id.into_uuid())
            .bind(serde_json::to_value(&tree)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save tree", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(out)
    }
}

#[async_trait]
impl TreeStore for PgTreeStore {
    async fn create(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        let tree = BookmarkTree::seeded(user_id);

        let result = sqlx::query(
            "INSERT INTO bookmark_trees (user_id, doc, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id.into_uuid())
        .bind(serde_json::to_value(&tree)?)
        .bind(tree.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tree", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "tree for user {user_id} already exists"
            )));
        }

        Ok(tree)
    }

    async fn get(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM bookmark_trees WHERE user_id = $1")
                .bind(user_id.into_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load tree", e)
                })?;

        let doc = doc.ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        let mut tree: BookmarkTree = serde_json::from_value(doc)?;
        tree.sort_folders();
        Ok(tree)
    }

    async fn add_folder(&self, user_id: UserId, name: &str) -> AppResult<Folder> {
        let name = name.to_string();
        self.mutate(user_id, move |tree| tree.add_folder(&name)).await
    }

    async fn rename_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<()> {
        let new_name = new_name.to_string();
        self.mutate(user_id, move |tree| tree.rename_folder(folder_id, &new_name))
            .await
    }

    async fn remove_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Vec<String>> {
        self.mutate(user_id, move |tree| tree.remove_folder(folder_id))
            .await
    }

    async fn add_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Subfolder> {
        let name = name.to_string();
        self.mutate(user_id, move |tree| tree.add_subfolder(folder_id, &name))
            .await
    }

    async fn rename_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()> {
        let (old_name, new_name) = (old_name.to_string(), new_name.to_string());
        self.mutate(user_id, move |tree| {
            tree.rename_subfolder(folder_id, &old_name, &new_name)
        })
        .await
    }

    async fn remove_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Vec<String>> {
        let name = name.to_string();
        self.mutate(user_id, move |tree| tree.remove_subfolder(folder_id, &name))
            .await
    }

    async fn add_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        link: Link,
    ) -> AppResult<()> {
        let subfolder = subfolder.map(str::to_string);
        self.mutate(user_id, move |tree| {
            tree.add_link(folder_id, subfolder.as_deref(), link)
        })
        .await
    }

    async fn remove_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<Option<Link>> {
        let subfolder = subfolder.map(str::to_string);
        let url = url.to_string();
        self.mutate(user_id, move |tree| {
            tree.remove_link(folder_id, subfolder.as_deref(), &url)
        })
        .await
    }
}
