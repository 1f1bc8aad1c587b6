//! Request and response payloads for the HTTP surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameSubfolderPayload {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkPayload {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    /// When present, the link lands in this subfolder instead of the
    /// folder root.
    #[serde(default)]
    pub subfolder_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLinkPayload {
    pub url: String,
    #[serde(default)]
    pub subfolder_name: Option<String>,
    /// Clients may echo the picture locator back; it is ignored in favor
    /// of the locator recorded in the tree.
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedLinkResponse {
    pub url: String,
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedLinkResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct RemovalResponse {
    pub blobs_deleted: usize,
    pub blobs_failed: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
