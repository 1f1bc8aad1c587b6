//! Structural mutation operations on a [`BookmarkTree`].
//!
//! Every operation either fully applies or returns a typed error without
//! touching the document. Folders are addressed by id; subfolders by
//! `(folder id, name)`. Misses are `NotFound`, duplicate subfolder names
//! are `Conflict`, bad names are `Validation`.

use linkmarks_core::error::AppError;
use linkmarks_core::result::AppResult;
use linkmarks_core::types::FolderId;

use super::model::{BookmarkTree, Folder, Link, Subfolder};

/// Maximum folder/subfolder name length in code points.
pub const MAX_NAME_LEN: usize = 16;

/// Validate a folder or subfolder name: non-empty after trimming, at most
/// [`MAX_NAME_LEN`] code points.
pub fn validate_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(AppError::validation("name cannot be empty"));
    }
    if len > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

impl BookmarkTree {
    fn folder_mut(&mut self, folder_id: FolderId) -> AppResult<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| AppError::not_found(format!("folder {folder_id} not found")))
    }

    fn subfolder_mut(&mut self, folder_id: FolderId, name: &str) -> AppResult<&mut Subfolder> {
        self.folder_mut(folder_id)?
            .subfolders
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| AppError::not_found(format!("subfolder '{name}' not found")))
    }

    /// Append a new empty folder and return a copy of it.
    pub fn add_folder(&mut self, name: &str) -> AppResult<Folder> {
        let name = validate_name(name)?;
        let folder = Folder::new(name);
        self.folders.push(folder.clone());
        Ok(folder)
    }

    /// Rename the folder matched by `folder_id`. The id never changes.
    pub fn rename_folder(&mut self, folder_id: FolderId, new_name: &str) -> AppResult<()> {
        let new_name = validate_name(new_name)?.to_string();
        self.folder_mut(folder_id)?.name = new_name;
        Ok(())
    }

    /// Remove a folder, returning every blob locator the removed subtree
    /// owned so the caller can delete the blobs.
    pub fn remove_folder(&mut self, folder_id: FolderId) -> AppResult<Vec<String>> {
        let pos = self
            .folders
            .iter()
            .position(|f| f.id == folder_id)
            .ok_or_else(|| AppError::not_found(format!("folder {folder_id} not found")))?;
        let folder = self.folders.remove(pos);
        Ok(folder.owned_locators())
    }

    /// Append a new empty subfolder under `folder_id` and return a copy.
    ///
    /// Subfolders are addressed by name in rename/delete paths, so a
    /// second subfolder with the same name under one folder would be an
    /// ambiguous target; creation rejects the duplicate outright.
    pub fn add_subfolder(&mut self, folder_id: FolderId, name: &str) -> AppResult<Subfolder> {
        let name = validate_name(name)?.to_string();
        let folder = self.folder_mut(folder_id)?;
        if folder.subfolders.iter().any(|s| s.name == name) {
            return Err(AppError::conflict(format!(
                "subfolder '{name}' already exists"
            )));
        }
        let subfolder = Subfolder::new(name);
        folder.subfolders.push(subfolder.clone());
        Ok(subfolder)
    }

    /// Rename the subfolder matched by `(folder_id, old_name)`.
    pub fn rename_subfolder(
        &mut self,
        folder_id: FolderId,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<()> {
        let new_name = validate_name(new_name)?.to_string();
        if new_name != old_name {
            let folder = self.folder_mut(folder_id)?;
            if folder.subfolders.iter().any(|s| s.name == new_name) {
                return Err(AppError::conflict(format!(
                    "subfolder '{new_name}' already exists"
                )));
            }
        }
        self.subfolder_mut(folder_id, old_name)?.name = new_name;
        Ok(())
    }

    /// Remove a subfolder, returning the blob locators its links owned.
    pub fn remove_subfolder(&mut self, folder_id: FolderId, name: &str) -> AppResult<Vec<String>> {
        let folder = self.folder_mut(folder_id)?;
        let pos = folder
            .subfolders
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| AppError::not_found(format!("subfolder '{name}' not found")))?;
        let subfolder = folder.subfolders.remove(pos);
        Ok(subfolder.owned_locators())
    }

    /// Append a link (picture already resolved) to a folder, or to the
    /// named subfolder under it when `subfolder` is given.
    pub fn add_link(
        &mut self,
        folder_id: FolderId,
        subfolder: Option<&str>,
        link: Link,
    ) -> AppResult<()> {
        if link.url.trim().is_empty() {
            return Err(AppError::validation("link url cannot be empty"));
        }
        match subfolder {
            Some(name) => self.subfolder_mut(folder_id, name)?.links.push(link),
            None => self.folder_mut(folder_id)?.links.push(link),
        }
        Ok(())
    }

    /// Remove the first link whose url matches within the given scope.
    ///
    /// Returns the removed link so the caller can delete its blob, or
    /// `None` when no link matched. A missing folder or subfolder is
    /// `NotFound`; an unmatched url is not.
    pub fn remove_link(
        &mut self,
        folder_id: FolderId,
        subfolder: Option<&str>,
        url: &str,
    ) -> AppResult<Option<Link>> {
        let links = match subfolder {
            Some(name) => &mut self.subfolder_mut(folder_id, name)?.links,
            None => &mut self.folder_mut(folder_id)?.links,
        };
        Ok(links
            .iter()
            .position(|l| l.url == url)
            .map(|pos| links.remove(pos)))
    }
}

#[cfg(test)]
mod tests {
    use linkmarks_core::error::ErrorKind;
    use linkmarks_core::types::UserId;

    use super::*;
    use crate::tree::model::DEFAULT_FOLDER_NAME;

    fn tree() -> BookmarkTree {
        BookmarkTree::seeded(UserId::new())
    }

    fn link(url: &str, picture: Option<&str>) -> Link {
        Link {
            url: url.to_string(),
            picture: picture.map(str::to_string),
            description: None,
            is_private: false,
        }
    }

    #[test]
    fn seeded_tree_has_default_folder() {
        let t = tree();
        assert_eq!(t.folders.len(), 1);
        assert_eq!(t.folders[0].name, DEFAULT_FOLDER_NAME);
    }

    #[test]
    fn folders_sort_by_name_regardless_of_insertion_order() {
        let mut t = tree();
        t.folders.clear();
        for name in ["zeta", "alpha", "mu"] {
            t.add_folder(name).unwrap();
        }
        t.sort_folders();
        let names: Vec<&str> = t.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["alpha", "mu", "zeta"]);
    }

    #[test]
    fn rename_keeps_folder_id() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.rename_folder(id, "renamed").unwrap();
        assert_eq!(t.folders[0].id, id);
        assert_eq!(t.folders[0].name, "renamed");
    }

    #[test]
    fn name_bounds_are_enforced() {
        let mut t = tree();
        assert_eq!(
            t.add_folder("   ").unwrap_err().kind,
            ErrorKind::Validation
        );
        assert_eq!(
            t.add_folder("seventeen chars!!").unwrap_err().kind,
            ErrorKind::Validation
        );
        // 16 code points, more than 16 bytes.
        t.add_folder("áéíóúáéíóúáéíóúá").unwrap();
    }

    #[test]
    fn duplicate_root_folder_names_may_coexist() {
        let mut t = tree();
        t.add_folder("work").unwrap();
        t.add_folder("work").unwrap();
        assert_eq!(t.folders.iter().filter(|f| f.name == "work").count(), 2);
    }

    #[test]
    fn duplicate_subfolder_name_is_conflict() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.add_subfolder(id, "sub").unwrap();
        assert_eq!(
            t.add_subfolder(id, "sub").unwrap_err().kind,
            ErrorKind::Conflict
        );
    }

    #[test]
    fn rename_subfolder_rejects_existing_sibling_name() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.add_subfolder(id, "a").unwrap();
        t.add_subfolder(id, "b").unwrap();
        assert_eq!(
            t.rename_subfolder(id, "a", "b").unwrap_err().kind,
            ErrorKind::Conflict
        );
        t.rename_subfolder(id, "a", "c").unwrap();
        assert!(t.folders[0].subfolders.iter().any(|s| s.name == "c"));
    }

    #[test]
    fn missing_targets_are_not_found() {
        let mut t = tree();
        let absent = FolderId::new();
        assert_eq!(
            t.rename_folder(absent, "x").unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            t.remove_folder(absent).unwrap_err().kind,
            ErrorKind::NotFound
        );
        let id = t.folders[0].id;
        assert_eq!(
            t.remove_subfolder(id, "nope").unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            t.add_link(id, Some("nope"), link("https://a", None))
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn remove_folder_enumerates_owned_locators() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.add_link(id, None, link("https://a", Some("loc/a"))).unwrap();
        t.add_link(id, None, link("https://b", Some("loc/b"))).unwrap();
        t.add_link(id, None, link("https://c", None)).unwrap();
        t.add_subfolder(id, "sub").unwrap();
        t.add_link(id, Some("sub"), link("https://d", Some("loc/d")))
            .unwrap();

        let mut locators = t.remove_folder(id).unwrap();
        locators.sort();
        assert_eq!(locators, ["loc/a", "loc/b", "loc/d"]);
        assert!(t.folders.is_empty());
    }

    #[test]
    fn remove_subfolder_scopes_to_its_own_links() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.add_link(id, None, link("https://root", Some("loc/root")))
            .unwrap();
        t.add_subfolder(id, "sub").unwrap();
        t.add_link(id, Some("sub"), link("https://s", Some("loc/s")))
            .unwrap();

        let locators = t.remove_subfolder(id, "sub").unwrap();
        assert_eq!(locators, ["loc/s"]);
        assert_eq!(t.folders[0].links.len(), 1);
    }

    #[test]
    fn remove_link_takes_first_url_match() {
        let mut t = tree();
        let id = t.folders[0].id;
        t.add_link(id, None, link("https://dup", Some("loc/1"))).unwrap();
        t.add_link(id, None, link("https://dup", Some("loc/2"))).unwrap();

        let removed = t.remove_link(id, None, "https://dup").unwrap().unwrap();
        assert_eq!(removed.picture.as_deref(), Some("loc/1"));
        assert_eq!(t.folders[0].links.len(), 1);

        assert!(t.remove_link(id, None, "https://absent").unwrap().is_none());
    }
}
