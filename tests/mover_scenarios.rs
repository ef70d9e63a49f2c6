//! End-to-end runs of the mover against the in-memory store.

use drive_mover::drive::memory::MemoryDrive;
use drive_mover::{run, Document, DocumentQuery, Folder, MoveConfig};

fn summaries_query() -> DocumentQuery {
    DocumentQuery::new("ChatGPT Summary").excluding("ChatGPT Sessions")
}

fn drive_with_target() -> MemoryDrive {
    MemoryDrive::new()
        .with_folder(Folder::new("F", "Chat GPT Summaries"))
        .with_folder(Folder::new("A", "Inbox"))
}

#[test]
fn matching_document_is_moved_out_of_its_old_folder() {
    let drive = drive_with_target()
        .with_document(Document::new("d1", "Project ChatGPT Summary 2025-10", ["A"]));
    let outcome = run(&MoveConfig::new("F", summaries_query()), &drive).unwrap();

    assert_eq!(outcome.moved, 1);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.errored, 0);
    assert_eq!(drive.parents_of("d1").unwrap(), vec!["F".to_string()]);
}

#[test]
fn excluded_name_is_never_visited() {
    let drive = drive_with_target()
        .with_document(Document::new("s1", "ChatGPT Sessions Log", ["A"]));
    let outcome = run(&MoveConfig::new("F", summaries_query()), &drive).unwrap();

    assert_eq!(outcome.visited(), 0);
    assert!(drive.update_calls().is_empty());
    assert_eq!(drive.parents_of("s1").unwrap(), vec!["A".to_string()]);
}

#[test]
fn document_already_in_target_is_skipped() {
    let drive = drive_with_target()
        .with_document(Document::new("d2", "ChatGPT Summary Archive", ["F"]));
    let outcome = run(&MoveConfig::new("F", summaries_query()), &drive).unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.moved, 0);
    assert!(drive.update_calls().is_empty());
    assert_eq!(drive.parents_of("d2").unwrap(), vec!["F".to_string()]);
}

#[test]
fn one_failing_update_does_not_stop_the_run() {
    let drive = drive_with_target()
        .with_document(Document::new("a", "ChatGPT Summary A", ["A"]))
        .with_document(Document::new("b", "ChatGPT Summary B", ["A"]))
        .with_document(Document::new("c", "ChatGPT Summary C", ["A"]));
    drive.fail_updates_for("b");

    let outcome = run(&MoveConfig::new("F", summaries_query()), &drive).unwrap();

    assert_eq!(outcome.moved, 2);
    assert_eq!(outcome.errored, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].id, "b");
    assert_eq!(outcome.failures[0].name, "ChatGPT Summary B");
    assert!(!outcome.failures[0].partial);
    assert_eq!(drive.parents_of("b").unwrap(), vec!["A".to_string()]);
    assert_eq!(drive.parents_of("c").unwrap(), vec!["F".to_string()]);
    assert_eq!(outcome.to_string(), "Moved: 2 | Skipped: 0 | Errored: 1");
}

#[test]
fn every_other_parent_is_detached() {
    let drive = drive_with_target()
        .with_document(Document::new("m", "ChatGPT Summary multi", ["A", "B", "C"]));
    let outcome = run(&MoveConfig::new("F", summaries_query()), &drive).unwrap();

    assert_eq!(outcome.moved, 1);
    assert_eq!(drive.parents_of("m").unwrap(), vec!["F".to_string()]);
    let calls = drive.update_calls();
    assert_eq!(calls.len(), 1, "atomic strategy sends a single update");
    assert_eq!(calls[0].add_parents, vec!["F".to_string()]);
    assert_eq!(calls[0].remove_parents, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
}
