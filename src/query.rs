//! Name predicate for candidate documents.
//! The same predicate is rendered as a Drive `q` filter for the service and
//! evaluated locally against listed documents.

use crate::drive::{DOCUMENT_MIME_TYPE, Document};

/// Which documents are candidates for a move.
///
/// A document matches when its mime type equals `mime_type`, its name contains
/// `name_contains`, its name does not contain `name_excludes` (if set), it is not
/// trashed, and it is owned by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub mime_type: String,
    pub name_contains: String,
    pub name_excludes: Option<String>,
}

impl DocumentQuery {
    pub fn new(name_contains: impl Into<String>) -> Self {
        Self {
            mime_type: DOCUMENT_MIME_TYPE.to_string(),
            name_contains: name_contains.into(),
            name_excludes: None,
        }
    }

    /// Exclude names containing `text`. Empty text clears the exclusion.
    pub fn excluding(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.name_excludes = if text.is_empty() { None } else { Some(text) };
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Render the Drive v3 `q` parameter.
    pub fn to_drive_q(&self) -> String {
        let mut q = format!(
            "mimeType = '{}' and name contains '{}'",
            escape_literal(&self.mime_type),
            escape_literal(&self.name_contains)
        );
        if let Some(ex) = &self.name_excludes {
            q.push_str(&format!(" and not name contains '{}'", escape_literal(ex)));
        }
        q.push_str(" and trashed = false and 'me' in owners");
        q
    }

    /// Evaluate the predicate against a listed document.
    ///
    /// Name comparison ignores case, as Drive's `contains` operator does.
    pub fn matches(&self, doc: &Document) -> bool {
        let name = doc.name.to_lowercase();
        doc.mime_type == self.mime_type
            && !doc.trashed
            && doc.owned_by_me
            && name.contains(&self.name_contains.to_lowercase())
            && !self
                .name_excludes
                .as_deref()
                .is_some_and(|ex| name.contains(&ex.to_lowercase()))
    }
}

/// Escape a value for use inside a single-quoted Drive query literal.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
