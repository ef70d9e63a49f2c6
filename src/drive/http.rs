//! Google Drive v3 REST client (blocking).
//!
//! Reads (`get_folder`, `list_documents`) retry transient failures with a
//! Fibonacci back-off. Parent updates are sent once and never retried; the
//! caller decides what a failed update means.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{Document, DocumentPage, DriveService, Folder};
use crate::errors::DriveApiError;
use crate::query::DocumentQuery;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const NUM_RETRIES: u64 = 5;
const LIST_FIELDS: &str = "nextPageToken,files(id,name,mimeType,parents,trashed,ownedByMe)";
const FOLDER_FIELDS: &str = "id,name,mimeType,trashed";
const UPDATE_FIELDS: &str = "id,parents";

fn fibonacci_iter() -> impl Iterator<Item = u64> {
    std::iter::successors(Some((0_u64, Some(1))), |&(a, b)| {
        Some((b?, a.checked_add(b?)))
    })
    .map(|(a, _)| a)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatedParents {
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Blocking Drive v3 client authenticated with a bearer access token.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: Client,
    base_url: String,
    access_token: String,
    retry_delay: Duration,
}

impl DriveClient {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self, DriveApiError> {
        Self::with_base_url(DEFAULT_API_BASE, access_token, timeout)
    }

    /// Build a client against a non-default endpoint (proxies, tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DriveApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("drive_mover/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DriveApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Scale of the back-off between read retries (one unit per Fibonacci step).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn files_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/files/{}", self.base_url, id),
            None => format!("{}/files", self.base_url),
        }
    }

    /// Send an idempotent read, retrying transient failures.
    fn read_with_retries<U>(
        &self,
        request_fn: impl Fn() -> RequestBuilder,
        endpoint: &'static str,
    ) -> Result<U, DriveApiError>
    where
        U: DeserializeOwned,
    {
        let mut last_error: Option<DriveApiError> = None;
        for (i, step) in (0..=NUM_RETRIES).zip(fibonacci_iter()) {
            if i > 0 {
                std::thread::sleep(self.retry_delay * step as u32);
                warn!("Retrying: {endpoint} ({i}/{NUM_RETRIES})");
            }
            match send_and_decode(request_fn(), endpoint) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() => {
                    warn!(endpoint, error = %e, "transient failure");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error
            .unwrap_or_else(|| DriveApiError::Transport(format!("{endpoint}: no attempts made"))))
    }
}

fn send_and_decode<U: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &'static str,
) -> Result<U, DriveApiError> {
    let resp = request
        .send()
        .map_err(|e| DriveApiError::Transport(format!("{endpoint}: {e}")))?;
    decode_response(resp, endpoint)
}

fn decode_response<U: DeserializeOwned>(
    resp: Response,
    endpoint: &'static str,
) -> Result<U, DriveApiError> {
    let status = resp.status();
    let text = resp
        .text()
        .map_err(|e| DriveApiError::Transport(format!("{endpoint}: {e}")))?;
    if !status.is_success() {
        return Err(status_error(status, &text));
    }
    serde_json::from_str(&text).map_err(|e| DriveApiError::Decode(format!("{endpoint}: {e}")))
}

/// Map a non-success response onto `DriveApiError`, keeping Drive's own message
/// and first error reason when present.
fn status_error(status: StatusCode, body: &str) -> DriveApiError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let reason = parsed
        .as_ref()
        .and_then(|env| env.error.errors.iter().find(|d| !d.reason.is_empty()))
        .map(|d| d.reason.clone());
    let message = parsed
        .map(|env| env.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    if status == StatusCode::NOT_FOUND {
        DriveApiError::NotFound(message)
    } else {
        DriveApiError::Status {
            status: status.as_u16(),
            message,
            reason,
        }
    }
}

/// Query parameters for one `files.list` page scoped to the user's own storage.
fn list_params(
    query: &DocumentQuery,
    page_size: u32,
    page_token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_drive_q()),
        ("pageSize", page_size.to_string()),
        ("corpora", "user".to_string()),
        ("spaces", "drive".to_string()),
        ("includeItemsFromAllDrives", "false".to_string()),
        ("supportsAllDrives", "false".to_string()),
        ("fields", LIST_FIELDS.to_string()),
    ];
    if let Some(token) = page_token {
        params.push(("pageToken", token.to_string()));
    }
    params
}

fn update_params(add_parents: &[String], remove_parents: &[String]) -> Vec<(&'static str, String)> {
    let mut params = vec![("fields", UPDATE_FIELDS.to_string())];
    if !add_parents.is_empty() {
        params.push(("addParents", add_parents.join(",")));
    }
    if !remove_parents.is_empty() {
        params.push(("removeParents", remove_parents.join(",")));
    }
    params
}

impl DriveService for DriveClient {
    fn get_folder(&self, folder_id: &str) -> Result<Folder, DriveApiError> {
        let url = self.files_url(Some(folder_id));
        self.read_with_retries(
            || {
                self.http
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .query(&[("fields", FOLDER_FIELDS), ("supportsAllDrives", "false")])
            },
            "files.get",
        )
    }

    fn list_documents(
        &self,
        query: &DocumentQuery,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, DriveApiError> {
        let url = self.files_url(None);
        let params = list_params(query, page_size, page_token);
        debug!(q = %params[0].1, page_size, has_token = page_token.is_some(), "files.list");
        let list: FileList = self.read_with_retries(
            || self.http.get(&url).bearer_auth(&self.access_token).query(&params),
            "files.list",
        )?;
        Ok(DocumentPage {
            documents: list.files,
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    fn update_parents(
        &self,
        document_id: &str,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<Vec<String>, DriveApiError> {
        let url = self.files_url(Some(document_id));
        let params = update_params(add_parents, remove_parents);
        debug!(document_id, ?add_parents, ?remove_parents, "files.update");
        let request = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .query(&params)
            .json(&serde_json::json!({}));
        let updated: UpdatedParents = send_and_decode(request, "files.update")?;
        Ok(updated.parents)
    }
}
