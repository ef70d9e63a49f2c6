//! Behavioral properties of a run: dry runs, idempotence, pagination,
//! skip policies, move strategies and fatal setup errors.

use drive_mover::drive::memory::MemoryDrive;
use drive_mover::{
    run, Document, DocumentQuery, DriveMoverError, Folder, MoveConfig, MoveStrategy, SkipPolicy,
};

fn query() -> DocumentQuery {
    DocumentQuery::new("ChatGPT Summary").excluding("ChatGPT Sessions")
}

fn config() -> MoveConfig {
    MoveConfig::new("F", query())
}

fn populated(n: usize) -> MemoryDrive {
    let drive = MemoryDrive::new().with_folder(Folder::new("F", "Summaries"));
    for i in 0..n {
        drive.add_document(Document::new(
            format!("doc{i:02}"),
            format!("ChatGPT Summary {i}"),
            [format!("P{}", i % 3)],
        ));
    }
    drive.add_document(Document::new("noise1", "Meeting notes", ["P0"]));
    drive.add_document(Document::new("noise2", "ChatGPT Sessions export", ["P1"]));
    drive
}

#[test]
fn dry_run_issues_no_mutation() {
    let drive = populated(4);
    drive.add_document(Document::new("in", "ChatGPT Summary in place", ["F"]));

    let outcome = run(&config().with_dry_run(true), &drive).unwrap();

    assert_eq!(outcome.would_move, 4);
    assert_eq!(outcome.moved, 0);
    assert_eq!(outcome.skipped, 1);
    assert!(drive.update_calls().is_empty());
    assert_eq!(drive.parents_of("doc00").unwrap(), vec!["P0".to_string()]);
    assert!(outcome.to_string().ends_with("| Would move: 4"));
}

#[test]
fn second_run_moves_nothing() {
    let drive = populated(5);
    let first = run(&config(), &drive).unwrap();
    assert_eq!(first.moved, 5);

    drive.clear_calls();
    let second = run(&config(), &drive).unwrap();
    assert_eq!(second.moved, 0);
    assert_eq!(second.skipped, 5);
    assert!(drive.update_calls().is_empty());
}

#[test]
fn every_page_is_visited_exactly_once() {
    let drive = populated(23);
    let outcome = run(&config().with_page_size(5), &drive).unwrap();

    assert_eq!(outcome.moved + outcome.skipped + outcome.errored, 23);
    assert_eq!(drive.list_calls(), 5);
    let mut touched: Vec<String> =
        drive.update_calls().into_iter().map(|c| c.document_id).collect();
    touched.sort();
    touched.dedup();
    assert_eq!(touched.len(), 23);
}

#[test]
fn non_matching_documents_are_never_mutated() {
    let drive = populated(3);
    run(&config(), &drive).unwrap();

    assert!(drive.update_calls().iter().all(|c| c.document_id.starts_with("doc")));
    assert_eq!(drive.parents_of("noise1").unwrap(), vec!["P0".to_string()]);
    assert_eq!(drive.parents_of("noise2").unwrap(), vec!["P1".to_string()]);
}

#[test]
fn successful_move_leaves_only_the_target() {
    let drive = populated(6);
    run(&config(), &drive).unwrap();
    for i in 0..6 {
        assert_eq!(drive.parents_of(&format!("doc{i:02}")).unwrap(), vec!["F".to_string()]);
    }
}

#[test]
fn exact_policy_strips_extra_parents() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("x", "ChatGPT Summary x", ["F", "A"]));

    let outcome = run(&config().with_skip_policy(SkipPolicy::Exact), &drive).unwrap();

    assert_eq!(outcome.moved, 1);
    assert_eq!(drive.parents_of("x").unwrap(), vec!["F".to_string()]);
    let calls = drive.update_calls();
    assert!(calls[0].add_parents.is_empty(), "target already present; nothing to add");
    assert_eq!(calls[0].remove_parents, vec!["A".to_string()]);
}

#[test]
fn contains_policy_leaves_extra_parents() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("x", "ChatGPT Summary x", ["F", "A"]));

    let outcome = run(&config().with_skip_policy(SkipPolicy::Contains), &drive).unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(drive.parents_of("x").unwrap(), vec!["F".to_string(), "A".to_string()]);
}

#[test]
fn two_step_attaches_then_detaches_each_parent() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("t", "ChatGPT Summary t", ["A", "B"]));

    let outcome = run(&config().with_move_strategy(MoveStrategy::TwoStep), &drive).unwrap();

    assert_eq!(outcome.moved, 1);
    let calls = drive.update_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].add_parents, vec!["F".to_string()]);
    assert!(calls[0].remove_parents.is_empty());
    assert_eq!(calls[1].remove_parents, vec!["A".to_string()]);
    assert_eq!(calls[2].remove_parents, vec!["B".to_string()]);
    assert_eq!(drive.parents_of("t").unwrap(), vec!["F".to_string()]);
}

#[test]
fn two_step_partial_failure_is_reported_as_error() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("p", "ChatGPT Summary p", ["A"]))
        .with_document(Document::new("q", "ChatGPT Summary q", ["A"]));
    drive.fail_detach_for("p");

    let outcome = run(&config().with_move_strategy(MoveStrategy::TwoStep), &drive).unwrap();

    assert_eq!(outcome.moved, 1);
    assert_eq!(outcome.errored, 1);
    let failure = &outcome.failures[0];
    assert!(failure.partial);
    assert!(failure.message.starts_with("partial move:"), "message: {}", failure.message);
    assert_eq!(drive.parents_of("p").unwrap(), vec!["A".to_string(), "F".to_string()]);
}

#[test]
fn atomic_detach_failure_changes_nothing() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("p", "ChatGPT Summary p", ["A"]));
    drive.fail_detach_for("p");

    let outcome = run(&config(), &drive).unwrap();

    assert_eq!(outcome.errored, 1);
    assert!(!outcome.failures[0].partial);
    assert_eq!(drive.parents_of("p").unwrap(), vec!["A".to_string()]);
}

#[test]
fn missing_target_folder_is_fatal() {
    let drive = MemoryDrive::new().with_document(Document::new("d", "ChatGPT Summary", ["A"]));
    let err = run(&config(), &drive).unwrap_err();

    assert!(matches!(err, DriveMoverError::TargetFolderUnavailable { .. }), "got {err:?}");
    assert_eq!(drive.list_calls(), 0);
    assert!(drive.update_calls().is_empty());
}

#[test]
fn target_that_is_not_a_folder_is_fatal() {
    let mut not_folder = Folder::new("F", "a doc");
    not_folder.mime_type = "application/vnd.google-apps.document".into();
    let drive = MemoryDrive::new().with_folder(not_folder);
    assert!(matches!(run(&config(), &drive), Err(DriveMoverError::NotAFolder { .. })));

    let mut trashed = Folder::new("F", "old");
    trashed.trashed = true;
    let drive = MemoryDrive::new().with_folder(trashed);
    assert!(matches!(run(&config(), &drive), Err(DriveMoverError::TargetFolderTrashed(_))));
}

#[test]
fn empty_target_id_is_fatal_before_any_call() {
    let drive = populated(2);
    let err = run(&MoveConfig::new("", query()), &drive).unwrap_err();
    assert!(matches!(err, DriveMoverError::MissingTargetFolder));
    assert_eq!(drive.list_calls(), 0);
}

#[test]
fn first_listing_failure_aborts_with_nothing_processed() {
    let drive = populated(3);
    drive.fail_list_at_page(0);

    let err = run(&config(), &drive).unwrap_err();

    assert!(matches!(err, DriveMoverError::Listing(_)));
    assert!(drive.update_calls().is_empty());
}

#[test]
fn trashed_and_shared_documents_are_ignored() {
    let drive = MemoryDrive::new().with_folder(Folder::new("F", "Summaries"));
    let mut trashed = Document::new("t", "ChatGPT Summary trashed", ["A"]);
    trashed.trashed = true;
    let mut shared = Document::new("s", "ChatGPT Summary shared", ["A"]);
    shared.owned_by_me = false;
    drive.add_document(trashed);
    drive.add_document(shared);

    let outcome = run(&config(), &drive).unwrap();
    assert_eq!(outcome.visited(), 0);
    assert!(drive.update_calls().is_empty());
}
