//! In-memory `DriveService`.
//! Holds folders and documents in process, honors queries, pagination and
//! parent updates, and records every mutation so callers can inspect them.
//! Failures can be injected per document or per listing page.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::{Document, DocumentPage, DriveService, Folder};
use crate::errors::DriveApiError;
use crate::query::DocumentQuery;

/// One recorded `update_parents` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub document_id: String,
    pub add_parents: Vec<String>,
    pub remove_parents: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    folders: BTreeMap<String, Folder>,
    // insertion order is listing order
    documents: Vec<Document>,
    updates: Vec<UpdateCall>,
    list_calls: usize,
    fail_updates: HashSet<String>,
    fail_detach: HashSet<String>,
    fail_list_at: Option<usize>,
}

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryDrive {
    state: RefCell<State>,
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, folder: Folder) -> Self {
        self.add_folder(folder);
        self
    }

    pub fn with_document(self, doc: Document) -> Self {
        self.add_document(doc);
        self
    }

    pub fn add_folder(&self, folder: Folder) {
        self.state.borrow_mut().folders.insert(folder.id.clone(), folder);
    }

    /// Insert or replace a document (matched by id).
    pub fn add_document(&self, doc: Document) {
        let mut st = self.state.borrow_mut();
        match st.documents.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => st.documents.push(doc),
        }
    }

    /// Make every update of `document_id` fail.
    pub fn fail_updates_for(&self, document_id: impl Into<String>) {
        self.state.borrow_mut().fail_updates.insert(document_id.into());
    }

    /// Make updates of `document_id` that remove a parent fail; pure attaches succeed.
    pub fn fail_detach_for(&self, document_id: impl Into<String>) {
        self.state.borrow_mut().fail_detach.insert(document_id.into());
    }

    /// Fail the listing call for the given zero-based page index.
    pub fn fail_list_at_page(&self, page: usize) {
        self.state.borrow_mut().fail_list_at = Some(page);
    }

    /// Current parent set of a document.
    pub fn parents_of(&self, document_id: &str) -> Option<Vec<String>> {
        self.state
            .borrow()
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .map(|d| d.parents.clone())
    }

    pub fn document(&self, document_id: &str) -> Option<Document> {
        self.state.borrow().documents.iter().find(|d| d.id == document_id).cloned()
    }

    /// Every update call received so far, in order.
    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.state.borrow().updates.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.borrow().list_calls
    }

    pub fn clear_calls(&self) {
        let mut st = self.state.borrow_mut();
        st.updates.clear();
        st.list_calls = 0;
    }
}

fn parse_offset(token: Option<&str>) -> Result<usize, DriveApiError> {
    match token {
        None => Ok(0),
        Some(t) => t
            .parse::<usize>()
            .map_err(|_| DriveApiError::status(400, format!("invalid page token '{t}'"))),
    }
}

impl DriveService for MemoryDrive {
    fn get_folder(&self, folder_id: &str) -> Result<Folder, DriveApiError> {
        self.state
            .borrow()
            .folders
            .get(folder_id)
            .cloned()
            .ok_or_else(|| DriveApiError::NotFound(folder_id.to_string()))
    }

    fn list_documents(
        &self,
        query: &DocumentQuery,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, DriveApiError> {
        let mut st = self.state.borrow_mut();
        let page_index = st.list_calls;
        st.list_calls += 1;
        if st.fail_list_at == Some(page_index) {
            return Err(DriveApiError::status(403, "listing denied"));
        }
        if page_size == 0 {
            return Err(DriveApiError::status(400, "pageSize must be positive"));
        }

        let offset = parse_offset(page_token)?;
        let matching: Vec<&Document> = st.documents.iter().filter(|d| query.matches(d)).collect();
        let end = (offset + page_size as usize).min(matching.len());
        let documents: Vec<Document> = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|d| (*d).clone())
            .collect();
        let next_page_token = (end < matching.len()).then(|| end.to_string());
        trace!(offset, returned = documents.len(), "memory listing page");
        Ok(DocumentPage {
            documents,
            next_page_token,
        })
    }

    fn update_parents(
        &self,
        document_id: &str,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<Vec<String>, DriveApiError> {
        let mut st = self.state.borrow_mut();
        st.updates.push(UpdateCall {
            document_id: document_id.to_string(),
            add_parents: add_parents.to_vec(),
            remove_parents: remove_parents.to_vec(),
        });

        if st.fail_updates.contains(document_id) {
            return Err(DriveApiError::status(403, "insufficient permissions for this file"));
        }
        if !remove_parents.is_empty() && st.fail_detach.contains(document_id) {
            return Err(DriveApiError::status(409, "concurrent modification"));
        }

        let doc = st
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| DriveApiError::NotFound(document_id.to_string()))?;
        for add in add_parents {
            if !doc.has_parent(add) {
                doc.parents.push(add.clone());
            }
        }
        doc.parents.retain(|p| !remove_parents.contains(p));
        Ok(doc.parents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryDrive {
        let drive = MemoryDrive::new().with_folder(Folder::new("F", "Summaries"));
        for i in 0..5 {
            let name = format!("ChatGPT Summary {i}");
            drive.add_document(Document::new(format!("d{i}"), name, ["A"]));
        }
        drive.add_document(Document::new("x", "Unrelated", ["A"]));
        drive
    }

    #[test]
    fn paginates_matching_documents_only() {
        let drive = store();
        let q = DocumentQuery::new("ChatGPT Summary");
        let first = drive.list_documents(&q, 2, None).unwrap();
        assert_eq!(first.documents.len(), 2);
        assert_eq!(first.next_page_token.as_deref(), Some("2"));
        let second = drive.list_documents(&q, 2, first.next_page_token.as_deref()).unwrap();
        let third = drive.list_documents(&q, 2, second.next_page_token.as_deref()).unwrap();
        assert_eq!(third.documents.len(), 1);
        assert!(third.next_page_token.is_none());
        assert_eq!(drive.list_calls(), 3);
    }

    #[test]
    fn update_adds_and_removes() {
        let drive = store();
        let parents = drive
            .update_parents("d0", &["F".to_string()], &["A".to_string()])
            .unwrap();
        assert_eq!(parents, vec!["F".to_string()]);
        assert_eq!(drive.update_calls().len(), 1);
    }

    #[test]
    fn detach_failure_leaves_attach_possible() {
        let drive = store();
        drive.fail_detach_for("d1");
        drive.update_parents("d1", &["F".to_string()], &[]).unwrap();
        let err = drive.update_parents("d1", &[], &["A".to_string()]).unwrap_err();
        assert!(matches!(err, DriveApiError::Status { status: 409, .. }));
        assert_eq!(drive.parents_of("d1").unwrap(), vec!["A".to_string(), "F".to_string()]);
    }

    #[test]
    fn unknown_folder_is_not_found() {
        let drive = store();
        assert_eq!(
            drive.get_folder("nope").unwrap_err(),
            DriveApiError::NotFound("nope".into())
        );
    }
}
