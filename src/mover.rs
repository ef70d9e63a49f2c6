//! The move loop.
//!
//! Drains a lazy, paginated listing of matching documents and gives each one a
//! single parent: the target folder. Documents are handled one at a time; a
//! failed update is counted and the loop moves on, while setup and listing
//! failures abort the run.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::config::{MoveConfig, MoveStrategy, SkipPolicy};
use crate::drive::{Document, DriveService};
use crate::errors::{DriveApiError, DriveMoverError};
use crate::query::DocumentQuery;
use crate::shutdown;

/// A document whose move failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFailure {
    pub id: String,
    pub name: String,
    pub message: String,
    /// The target was attached but a stale parent is still present.
    pub partial: bool,
}

impl fmt::Display for MoveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({}): {}", self.name, self.id, self.message)
    }
}

/// Per-run tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Eligible documents left untouched because of a dry run.
    pub would_move: usize,
    pub failures: Vec<MoveFailure>,
    pub dry_run: bool,
}

impl MoveOutcome {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Number of documents classified so far.
    pub fn visited(&self) -> usize {
        self.moved + self.skipped + self.errored + self.would_move
    }

    fn record_failure(&mut self, doc: &Document, message: String, partial: bool) {
        self.errored += 1;
        self.failures.push(MoveFailure {
            id: doc.id.clone(),
            name: doc.name.clone(),
            message,
            partial,
        });
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moved: {} | Skipped: {} | Errored: {}",
            self.moved, self.skipped, self.errored
        )?;
        if self.dry_run {
            write!(f, " | Would move: {}", self.would_move)?;
        }
        Ok(())
    }
}

/// Lazy iterator over every document the service lists for a query.
///
/// Fetches one page at a time, yields each id at most once, and stops after
/// the first listing error (which it yields). A page token the service has
/// already handed out ends pagination, so token cycles cannot loop forever.
pub struct DocumentPages<'a, S: DriveService + ?Sized> {
    service: &'a S,
    query: &'a DocumentQuery,
    page_size: u32,
    next_token: Option<String>,
    buffer: VecDeque<Document>,
    seen: HashSet<String>,
    /// Every page token the service has handed out so far.
    tokens: HashSet<String>,
    started: bool,
    finished: bool,
    pages: usize,
}

impl<'a, S: DriveService + ?Sized> DocumentPages<'a, S> {
    pub fn new(service: &'a S, query: &'a DocumentQuery, page_size: u32) -> Self {
        Self {
            service,
            query,
            page_size,
            next_token: None,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            tokens: HashSet::new(),
            started: false,
            finished: false,
            pages: 0,
        }
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    fn fetch_page(&mut self) -> Result<(), DriveApiError> {
        let page = self
            .service
            .list_documents(self.query, self.page_size, self.next_token.as_deref())?;
        self.started = true;
        self.pages += 1;
        debug!(
            page = self.pages,
            documents = page.documents.len(),
            more = page.next_page_token.is_some(),
            "fetched listing page"
        );
        self.next_token = match page.next_page_token {
            Some(token) if !self.tokens.insert(token.clone()) => {
                warn!(%token, "service repeated an earlier page token; stopping pagination");
                None
            }
            other => other,
        };
        self.buffer.extend(page.documents);
        Ok(())
    }
}

impl<S: DriveService + ?Sized> Iterator for DocumentPages<'_, S> {
    type Item = Result<Document, DriveApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(doc) = self.buffer.pop_front() {
                if self.seen.insert(doc.id.clone()) {
                    return Some(Ok(doc));
                }
                debug!(id = %doc.id, "document listed twice; ignoring repeat");
            }
            if self.finished || (self.started && self.next_token.is_none()) {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

/// Parent changes needed to leave `target` as the only parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentChange {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

/// Decide what to do with a document; `None` means it is already in place.
pub fn plan_move(doc: &Document, target: &str, policy: SkipPolicy) -> Option<ParentChange> {
    let in_target = doc.has_parent(target);
    let mut stale: Vec<String> = Vec::new();
    for p in &doc.parents {
        if p != target && !stale.contains(p) {
            stale.push(p.clone());
        }
    }

    let already_there = match policy {
        SkipPolicy::Exact => in_target && stale.is_empty(),
        SkipPolicy::Contains => in_target,
    };
    if already_there {
        return None;
    }

    Some(ParentChange {
        add: if in_target { Vec::new() } else { vec![target.to_string()] },
        remove: stale,
    })
}

/// Check the target exists, is a folder, and is not trashed.
fn ensure_target_folder<S: DriveService + ?Sized>(
    service: &S,
    target: &str,
) -> Result<(), DriveMoverError> {
    let folder = service
        .get_folder(target)
        .map_err(|source| DriveMoverError::TargetFolderUnavailable {
            id: target.to_string(),
            source,
        })?;
    if !folder.is_folder() {
        return Err(DriveMoverError::NotAFolder {
            id: target.to_string(),
            mime_type: folder.mime_type,
        });
    }
    if folder.trashed {
        return Err(DriveMoverError::TargetFolderTrashed(target.to_string()));
    }
    debug!(id = target, name = %folder.name, "target folder ok");
    Ok(())
}

/// Why applying a change failed; `partial` means the target is attached but a stale parent stayed.
struct ApplyError {
    message: String,
    partial: bool,
}

impl ApplyError {
    fn whole(message: String) -> Self {
        Self {
            message,
            partial: false,
        }
    }
}

fn apply_change<S: DriveService + ?Sized>(
    service: &S,
    doc: &Document,
    target: &str,
    change: &ParentChange,
    strategy: MoveStrategy,
) -> Result<(), ApplyError> {
    let parents = match strategy {
        MoveStrategy::Atomic => service
            .update_parents(&doc.id, &change.add, &change.remove)
            .map_err(|e| ApplyError::whole(e.to_string()))?,
        MoveStrategy::TwoStep => {
            let mut parents = doc.parents.clone();
            if !change.add.is_empty() {
                parents = service
                    .update_parents(&doc.id, &change.add, &[])
                    .map_err(|e| ApplyError::whole(e.to_string()))?;
            }
            for stale in &change.remove {
                parents = service
                    .update_parents(&doc.id, &[], std::slice::from_ref(stale))
                    .map_err(|e| ApplyError {
                        message: format!(
                            "partial move: attached to {target} but parent {stale} could not be removed: {e}"
                        ),
                        partial: true,
                    })?;
            }
            parents
        }
    };

    if parents.iter().all(|p| p == target) && !parents.is_empty() {
        Ok(())
    } else {
        Err(ApplyError {
            message: format!("service reported parents {parents:?} after update"),
            partial: parents.iter().any(|p| p == target),
        })
    }
}

/// Move every matching document into the configured target folder.
pub fn run<S: DriveService + ?Sized>(
    config: &MoveConfig,
    service: &S,
) -> Result<MoveOutcome, DriveMoverError> {
    config.validate()?;
    let target = config.target_folder_id.as_str();
    ensure_target_folder(service, target)?;

    info!(
        target,
        q = %config.query.to_drive_q(),
        dry_run = config.dry_run,
        skip_policy = %config.skip_policy,
        strategy = %config.move_strategy,
        "Scanning for matching documents"
    );

    let mut outcome = MoveOutcome::new(config.dry_run);
    let mut pages = DocumentPages::new(service, &config.query, config.page_size);

    while let Some(item) = pages.next() {
        if shutdown::is_requested() {
            warn!(progress = %outcome, "shutdown requested; stopping before next document");
            return Err(DriveMoverError::Interrupted);
        }
        let doc = match item {
            Ok(doc) => doc,
            Err(e) => {
                if outcome.visited() > 0 {
                    warn!(progress = %outcome, pages = pages.pages(), "listing failed part-way");
                }
                return Err(DriveMoverError::Listing(e));
            }
        };

        if !config.query.matches(&doc) {
            warn!(
                id = %doc.id,
                name = %doc.name,
                "service listed a non-matching document; leaving it alone"
            );
            continue;
        }

        let Some(change) = plan_move(&doc, target, config.skip_policy) else {
            debug!(id = %doc.id, name = %doc.name, "already in target; skipped");
            outcome.skipped += 1;
            continue;
        };

        if config.dry_run {
            info!(
                id = %doc.id,
                name = %doc.name,
                add = ?change.add,
                remove = ?change.remove,
                "dry-run: would move"
            );
            outcome.would_move += 1;
            continue;
        }

        match apply_change(service, &doc, target, &change, config.move_strategy) {
            Ok(()) => {
                info!(id = %doc.id, name = %doc.name, removed = ?change.remove, "Moved document");
                outcome.moved += 1;
            }
            Err(e) => {
                error!(
                    id = %doc.id,
                    name = %doc.name,
                    partial = e.partial,
                    error = %e.message,
                    "Move failed"
                );
                outcome.record_failure(&doc, e.message, e.partial);
            }
        }
    }

    info!(
        moved = outcome.moved,
        skipped = outcome.skipped,
        errored = outcome.errored,
        would_move = outcome.would_move,
        "{outcome}"
    );
    Ok(outcome)
}
