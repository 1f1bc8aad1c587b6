//! End-to-end scenarios over the orchestrator with fake collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use linkmarks_core::error::{AppError, ErrorKind};
use linkmarks_core::result::AppResult;
use linkmarks_core::traits::{BlobStore, PageCapturer};
use linkmarks_core::types::{FolderId, UserId};
use linkmarks_database::{MemoryTreeStore, TreeStore};
use linkmarks_entity::Link;
use linkmarks_service::{BookmarkService, CaptureService, LinkDraft};
use linkmarks_storage::providers::memory::BlobEvent;
use linkmarks_storage::{MemoryBlobStore, ThumbnailEncoder};

/// Capturer that renders every URL as a tiny PNG, or always fails.
#[derive(Debug)]
enum FakeCapturer {
    OnePixelPng,
    NameNotResolved,
}

#[async_trait]
impl PageCapturer for FakeCapturer {
    async fn capture(&self, url: &str) -> AppResult<Bytes> {
        match self {
            Self::OnePixelPng => {
                let img = image::RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 0]));
                let mut out = std::io::Cursor::new(Vec::new());
                img.write_to(&mut out, image::ImageFormat::Png).unwrap();
                Ok(Bytes::from(out.into_inner()))
            }
            Self::NameNotResolved => Err(AppError::capture_unreachable(format!(
                "'{url}' could not be resolved"
            ))),
        }
    }
}

/// Tree store wrapper that checks, at commit time, that the link's blob
/// is already reachable in the blob store.
#[derive(Debug)]
struct CommitOrderProbe {
    inner: MemoryTreeStore,
    blobs: Arc<MemoryBlobStore>,
}

#[async_trait]
impl TreeStore for CommitOrderProbe {
    async fn create(&self, user_id: UserId) -> AppResult<linkmarks_entity::BookmarkTree> {
        self.inner.create(user_id).await
    }

    async fn get(&self, user_id: UserId) -> AppResult<linkmarks_entity::BookmarkTree> {
        self.inner.get(user_id).await
    }

    async fn add_folder(&self, user_id: UserId, name: &str) -> AppResult<linkmarks_entity::Folder> {
        self.inner.add_folder(user_id, name).await
    }

    async fn rename_folder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<()> {
        self.inner.rename_folder(user_id, folder_id, new_name).await
    }

    async fn remove_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Vec<String>> {
        self.inner.remove_folder(user_id, folder_id).await
    }

    async fn add_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<linkmarks_entity::Subfolder> {
        self.inner.add_subfolder(user_id, folder_id, name).await
    }

    async fn rename_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()> {
        self.inner
            .rename_subfolder(user_id, folder_id, old_name, new_name)
            .await
    }

    async fn remove_subfolder(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Vec<String>> {
        self.inner.remove_subfolder(user_id, folder_id, name).await
    }

    async fn add_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        link: Link,
    ) -> AppResult<()> {
        let locator = link.picture.as_deref().expect("link committed without picture");
        assert!(
            self.blobs.exists(locator).await.unwrap(),
            "blob must be uploaded before the tree commit"
        );
        self.inner.add_link(user_id, folder_id, subfolder, link).await
    }

    async fn remove_link(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<Option<Link>> {
        self.inner.remove_link(user_id, folder_id, subfolder, url).await
    }
}

struct Harness {
    service: BookmarkService,
    blobs: Arc<MemoryBlobStore>,
    user: UserId,
}

fn harness(capturer: FakeCapturer) -> Harness {
    let blobs = Arc::new(MemoryBlobStore::new());
    let trees = Arc::new(CommitOrderProbe {
        inner: MemoryTreeStore::new(),
        blobs: blobs.clone(),
    });
    let capture = Arc::new(CaptureService::new(
        Arc::new(capturer),
        blobs.clone(),
        ThumbnailEncoder::new(&Default::default()),
    ));
    let service = BookmarkService::new(trees, blobs.clone(), capture);
    Harness {
        service,
        blobs,
        user: UserId::new(),
    }
}

fn draft(url: &str) -> LinkDraft {
    LinkDraft {
        url: url.to_string(),
        description: None,
        is_private: false,
    }
}

#[tokio::test]
async fn happy_path_creates_a_link_with_a_picture() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();

    let created = h
        .service
        .create_link(h.user, work.id, None, draft("https://example.com"))
        .await
        .unwrap();
    assert!(!created.picture.is_empty());
    assert!(h.blobs.exists(&created.picture).await.unwrap());

    let tree = h.service.get_tree(h.user).await.unwrap();
    let folder = tree.folders.iter().find(|f| f.name == "work").unwrap();
    assert_eq!(folder.links.len(), 1);
    assert_eq!(folder.links[0].url, "https://example.com");
    assert_eq!(folder.links[0].picture.as_deref(), Some(created.picture.as_str()));
}

#[tokio::test]
async fn unreachable_target_leaves_no_trace() {
    let h = harness(FakeCapturer::NameNotResolved);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();

    let err = h
        .service
        .create_link(h.user, work.id, None, draft("https://nope.invalid"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CaptureUnreachable);

    // No blob was ever uploaded and no link recorded.
    assert!(h.blobs.events().is_empty());
    let tree = h.service.get_tree(h.user).await.unwrap();
    assert!(tree.folders.iter().all(|f| f.links.is_empty()));
}

#[tokio::test]
async fn cascade_delete_removes_every_owned_blob() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();
    h.service.add_subfolder(h.user, work.id, "sub").await.unwrap();

    h.service
        .create_link(h.user, work.id, None, draft("https://a.example"))
        .await
        .unwrap();
    h.service
        .create_link(h.user, work.id, None, draft("https://b.example"))
        .await
        .unwrap();
    h.service
        .create_link(h.user, work.id, Some("sub"), draft("https://c.example"))
        .await
        .unwrap();
    assert_eq!(h.blobs.len(), 3);

    let outcome = h.service.remove_folder(h.user, work.id).await.unwrap();
    assert_eq!(outcome.blobs_deleted, 3);
    assert_eq!(outcome.blobs_failed, 0);
    assert!(h.blobs.is_empty());

    let tree = h.service.get_tree(h.user).await.unwrap();
    assert!(tree.folders.iter().all(|f| f.name != "work"));
}

#[tokio::test]
async fn failed_commit_compensates_the_uploaded_blob() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();

    // Address a folder that does not exist: capture and upload succeed,
    // the commit fails, and the orchestrator deletes the fresh blob.
    let err = h
        .service
        .create_link(h.user, FolderId::new(), None, draft("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert!(h.blobs.is_empty());
    let events = h.blobs.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], BlobEvent::Put(_)));
    assert!(matches!(events[1], BlobEvent::Delete(_)));
}

#[tokio::test]
async fn removing_a_link_deletes_its_blob() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();
    h.service
        .create_link(h.user, work.id, None, draft("https://example.com"))
        .await
        .unwrap();
    assert_eq!(h.blobs.len(), 1);

    let removed = h
        .service
        .remove_link(h.user, work.id, None, "https://example.com")
        .await
        .unwrap();
    assert!(removed);
    assert!(h.blobs.is_empty());

    // Removing it again is a clean no-op.
    let removed = h
        .service
        .remove_link(h.user, work.id, None, "https://example.com")
        .await
        .unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn subfolder_scoped_removal_keeps_root_links() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();
    h.service.add_subfolder(h.user, work.id, "sub").await.unwrap();

    h.service
        .create_link(h.user, work.id, None, draft("https://root.example"))
        .await
        .unwrap();
    h.service
        .create_link(h.user, work.id, Some("sub"), draft("https://sub.example"))
        .await
        .unwrap();

    let outcome = h.service.remove_subfolder(h.user, work.id, "sub").await.unwrap();
    assert_eq!(outcome.blobs_deleted, 1);
    assert_eq!(h.blobs.len(), 1);

    let tree = h.service.get_tree(h.user).await.unwrap();
    let folder = tree.folders.iter().find(|f| f.name == "work").unwrap();
    assert!(folder.subfolders.is_empty());
    assert_eq!(folder.links.len(), 1);
}

#[tokio::test]
async fn duplicate_subfolder_names_are_rejected() {
    let h = harness(FakeCapturer::OnePixelPng);
    h.service.create_tree(h.user).await.unwrap();
    let work = h.service.add_folder(h.user, "work").await.unwrap();
    h.service.add_subfolder(h.user, work.id, "sub").await.unwrap();

    let err = h
        .service
        .add_subfolder(h.user, work.id, "sub")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}
