//! Document-storage collaborator.
//! Defines the `DriveService` seam the mover depends on, the data it exchanges,
//! and two implementations: the Drive v3 HTTP client and an in-memory store
//! (the latter only with the `test-helpers` feature).

pub mod http;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

use serde::Deserialize;

use crate::errors::DriveApiError;
use crate::query::DocumentQuery;

/// Mime type of a native Google Docs document.
pub const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
/// Mime type of a Drive folder.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A document as reported by the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    pub mime_type: String,
    #[serde(default)]
    pub trashed: bool,
    #[serde(default = "default_owned_by_me")]
    pub owned_by_me: bool,
}

fn default_owned_by_me() -> bool {
    true
}

impl Document {
    /// Convenience constructor for a live, owned Google Doc.
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            mime_type: DOCUMENT_MIME_TYPE.to_string(),
            trashed: false,
            owned_by_me: true,
        }
    }

    pub fn has_parent(&self, folder_id: &str) -> bool {
        self.parents.iter().any(|p| p == folder_id)
    }
}

/// Destination folder metadata, used only to validate the target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub mime_type: String,
    #[serde(default)]
    pub trashed: bool,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: FOLDER_MIME_TYPE.to_string(),
            trashed: false,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// One page of a listing; `next_page_token` is `None` once exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

/// The two capabilities the mover needs from the storage service, plus a
/// folder lookup used to validate the destination before any work starts.
pub trait DriveService {
    /// Look up a folder by id.
    fn get_folder(&self, folder_id: &str) -> Result<Folder, DriveApiError>;

    /// List documents in the user's own storage matching `query`.
    fn list_documents(
        &self,
        query: &DocumentQuery,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, DriveApiError>;

    /// Add and remove parents of one document, returning its updated parent set.
    fn update_parents(
        &self,
        document_id: &str,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<Vec<String>, DriveApiError>;
}

impl<T: DriveService + ?Sized> DriveService for &T {
    fn get_folder(&self, folder_id: &str) -> Result<Folder, DriveApiError> {
        (**self).get_folder(folder_id)
    }

    fn list_documents(
        &self,
        query: &DocumentQuery,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, DriveApiError> {
        (**self).list_documents(query, page_size, page_token)
    }

    fn update_parents(
        &self,
        document_id: &str,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<Vec<String>, DriveApiError> {
        (**self).update_parents(document_id, add_parents, remove_parents)
    }
}
