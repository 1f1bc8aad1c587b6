//! Bookmark tree entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use linkmarks_core::types::{FolderId, SubfolderId, UserId};

/// Name of the folder every tree is seeded with at creation.
pub const DEFAULT_FOLDER_NAME: &str = "favoritos";

/// A user's root bookmark document.
///
/// Exactly one exists per account, created atomically with it and only
/// ever mutated in place. The folder/link forest is embedded inline:
/// reads are always the whole tree and writes are positional within it,
/// so a single denormalized document is strictly cheaper than joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkTree {
    /// The owning user. Foreign to the account entity.
    pub user_id: UserId,
    /// Root-level folders. Insertion order is preserved in storage and
    /// sorted by name at read time.
    pub folders: Vec<Folder>,
    /// When the tree was created. Immutable.
    pub created_at: DateTime<Utc>,
}

/// A root-level folder, addressed by its stable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Stable unique identifier; the sole key for rename/delete/append.
    pub id: FolderId,
    /// Display name, 1-16 code points. Uniqueness is not enforced.
    pub name: String,
    /// Links held directly by this folder.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Nested subfolders, one level deep operationally.
    #[serde(default)]
    pub subfolders: Vec<Subfolder>,
}

/// A second-level folder, addressed by `(FolderId, name)` in rename and
/// delete paths.
///
/// Distinct from [`Folder`] so that no operation can be written against
/// deeper nesting; the `subfolders` field keeps the stored shape
/// recursive for forward compatibility but stays empty in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subfolder {
    /// Stable identifier, kept for document stability.
    pub id: SubfolderId,
    /// Display name; unique among siblings under the same folder.
    pub name: String,
    /// Links held by this subfolder.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Reserved for deeper nesting; no operation addresses it.
    #[serde(default)]
    pub subfolders: Vec<Subfolder>,
}

/// A bookmarked address with its captured thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// The bookmarked address. Unvalidated beyond non-empty.
    pub url: String,
    /// Blob locator of the screenshot thumbnail; `None` until a capture
    /// succeeded. Once set, the blob must outlive the link.
    #[serde(default)]
    pub picture: Option<String>,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Gates visibility in public listings.
    #[serde(default)]
    pub is_private: bool,
}

impl Folder {
    /// Create an empty folder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(),
            name: name.into(),
            links: Vec::new(),
            subfolders: Vec::new(),
        }
    }

    /// Collect every blob locator owned by this folder and all its
    /// subfolders, for cascade deletion.
    pub fn owned_locators(&self) -> Vec<String> {
        let mut locators: Vec<String> = self
            .links
            .iter()
            .filter_map(|l| l.picture.clone())
            .collect();
        for sub in &self.subfolders {
            locators.extend(sub.owned_locators());
        }
        locators
    }
}

impl Subfolder {
    /// Create an empty subfolder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SubfolderId::new(),
            name: name.into(),
            links: Vec::new(),
            subfolders: Vec::new(),
        }
    }

    /// Collect the blob locators owned by this subfolder's links.
    pub fn owned_locators(&self) -> Vec<String> {
        self.links.iter().filter_map(|l| l.picture.clone()).collect()
    }
}

impl BookmarkTree {
    /// Seed a new tree for `user_id` with the default folder.
    pub fn seeded(user_id: UserId) -> Self {
        Self {
            user_id,
            folders: vec![Folder::new(DEFAULT_FOLDER_NAME)],
            created_at: Utc::now(),
        }
    }

    /// Sort root folders ascending by name (ordinal compare) for display.
    pub fn sort_folders(&mut self) {
        self.folders.sort_by(|a, b| a.name.cmp(&b.name));
    }
}
