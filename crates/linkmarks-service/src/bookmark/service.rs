//! Tree orchestration: sequences the capture pipeline and the blob store
//! around tree-store mutations so no blob dangles and no tree entry
//! points at a missing blob.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use linkmarks_core::result::AppResult;
use linkmarks_core::traits::BlobStore;
use linkmarks_core::types::{FolderId, UserId};
use linkmarks_database::TreeStore;
use linkmarks_entity::{BookmarkTree, Folder, Link, Subfolder};

use crate::capture::{CaptureService, CaptureStage};

/// A link as submitted by the caller, before capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDraft {
    /// The address to bookmark.
    pub url: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Private links are hidden from public listings.
    #[serde(default)]
    pub is_private: bool,
}

/// Result of a successful link creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedLink {
    /// Durable locator of the captured thumbnail.
    pub picture: String,
}

/// Result of a cascade removal.
///
/// Blob deletion failures degrade the outcome instead of failing it: the
/// tree entry is gone either way, and a few orphaned blobs are strictly
/// preferable to tree references pointing at deleted blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalOutcome {
    /// Blobs successfully deleted.
    pub blobs_deleted: usize,
    /// Blobs whose deletion failed and which may now be orphaned.
    pub blobs_failed: usize,
}

/// Orchestrates tree mutations with their blob side effects.
pub struct BookmarkService {
    trees: Arc<dyn TreeStore>,
    blobs: Arc<dyn BlobStore>,
    capture: Arc<CaptureService>,
}

impl BookmarkService {
    /// Create a new bookmark service.
    pub fn new(
        trees: Arc<dyn TreeStore>,
        blobs: Arc<dyn BlobStore>,
        capture: Arc<CaptureService>,
    ) -> Self {
        Self {
            trees,
            blobs,
            capture,
        }
    }

    /// Seed the tree for a new account. `Conflict` if one exists; the
    /// account-creation caller decides whether that counts as success.
    pub async fn create_tree(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        let tree = self.trees.create(user_id).await?;
        info!(user_id = %user_id, "Created bookmark tree");
        Ok(tree)
    }

    /// Full tree with folders sorted by name.
    pub async fn get_tree(&self, user_id: UserId) -> AppResult<BookmarkTree> {
        self.trees.get(user_id).await
    }

    /// Append a new root folder.
    pub async fn add_folder(&self, user_id: UserId, name: &str) -> AppResult<Folder> {
        let folder = self.trees.add_folder(user_id, name).await?;
        info!(user_id = %user_id, folder_id = %folder.id, name, "Folder created");
        Ok(folder)
    }

    /// Rename a folder; its id never changes.
    pub async fn rename_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<()> {
        self.trees.rename_folder(user_id, folder_id, new_name).await?;
        info!(user_id = %user_id, folder_id = %folder_id, new_name, "Folder renamed");
        Ok(())
    }

    /// Append a new subfolder under `folder_id`.
    pub async fn add_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Subfolder> {
        let subfolder = self.trees.add_subfolder(user_id, folder_id, name).await?;
        info!(user_id = %user_id, folder_id = %folder_id, name, "Subfolder created");
        Ok(subfolder)
    }

    /// Rename the subfolder matched by `(folder_id, old_name)`.
    pub async fn rename_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()> {
        self.trees
            .rename_subfolder(user_id, folder_id, old_name, new_name)
            .await?;
        info!(user_id = %user_id, folder_id = %folder_id, old_name, new_name, "Subfolder renamed");
        Ok(())
    }

    /// Create a link: capture a thumbnail first, then commit the link.
    ///
    /// The link is never recorded without at least an attempted capture.
    /// If the tree mutation fails after the upload, the fresh blob is
    /// deleted best-effort; a compensation failure is logged and the
    /// user-visible outcome stays the original tree error.
    pub async fn create_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        draft: LinkDraft,
    ) -> AppResult<CreatedLink> {
        let key = format!("{}.jpg", Uuid::new_v4());
        info!(user_id = %user_id, folder_id = %folder_id, url = %draft.url, key,
            stage = %CaptureStage::Started, "Creating link");

        let locator = self.capture.create_thumbnail(&draft.url, &key).await?;

        let link = Link {
            url: draft.url,
            picture: Some(locator.clone()),
            description: draft.description,
            is_private: draft.is_private,
        };

        info!(user_id = %user_id, folder_id = %folder_id, stage = %CaptureStage::Committing,
            "Committing link");
        if let Err(tree_err) = self
            .trees
            .add_link(user_id, folder_id, subfolder, link)
            .await
        {
            warn!(user_id = %user_id, folder_id = %folder_id, locator, error = %tree_err,
                "Link commit failed, compensating uploaded blob");
            if let Err(comp_err) = self.blobs.delete(&locator).await {
                // Accepted leak window: the blob stays orphaned until a
                // sweep; the caller still sees the tree error.
                warn!(locator, error = %comp_err, "Compensating blob delete failed");
            }
            return Err(tree_err);
        }

        info!(user_id = %user_id, folder_id = %folder_id, stage = %CaptureStage::Done,
            "Link created");
        Ok(CreatedLink { picture: locator })
    }

    /// Remove a folder and delete every blob its subtree owned.
    pub async fn remove_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
    ) -> AppResult<RemovalOutcome> {
        let locators = self.trees.remove_folder(user_id, folder_id).await?;
        let outcome = self.delete_blobs(locators).await;
        info!(user_id = %user_id, folder_id = %folder_id,
            blobs_deleted = outcome.blobs_deleted, blobs_failed = outcome.blobs_failed,
            "Folder removed");
        Ok(outcome)
    }

    /// Remove a subfolder and delete the blobs its links owned.
    pub async fn remove_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<RemovalOutcome> {
        let locators = self.trees.remove_subfolder(user_id, folder_id, name).await?;
        let outcome = self.delete_blobs(locators).await;
        info!(user_id = %user_id, folder_id = %folder_id, name,
            blobs_deleted = outcome.blobs_deleted, blobs_failed = outcome.blobs_failed,
            "Subfolder removed");
        Ok(outcome)
    }

    /// Remove the first link matching `url` in the given scope, deleting
    /// its blob afterwards. Returns whether a link was removed.
    pub async fn remove_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<bool> {
        let removed = self
            .trees
            .remove_link(user_id, folder_id, subfolder, url)
            .await?;

        match removed {
            Some(link) => {
                if let Some(locator) = link.picture {
                    if let Err(e) = self.blobs.delete(&locator).await {
                        warn!(locator, error = %e, "Failed to delete removed link's blob");
                    }
                }
                info!(user_id = %user_id, folder_id = %folder_id, url, "Link removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete blobs in parallel; each deletion is independent and
    /// idempotent.
    async fn delete_blobs(&self, locators: Vec<String>) -> RemovalOutcome {
        let deletions = locators.iter().map(|locator| self.blobs.delete(locator));
        let results = join_all(deletions).await;

        let blobs_failed = results.iter().filter(|r| r.is_err()).count();
        if blobs_failed > 0 {
            warn!(
                blobs_failed,
                total = locators.len(),
                "Some blobs could not be deleted during cascade and may be orphaned"
            );
        }
        RemovalOutcome {
            blobs_deleted: results.len() - blobs_failed,
            blobs_failed,
        }
    }
}
