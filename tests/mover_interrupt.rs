//! Ctrl-C handling. Kept in its own test binary because the shutdown flag is process-wide.

use drive_mover::drive::memory::MemoryDrive;
use drive_mover::{run, shutdown, Document, DocumentQuery, DriveMoverError, Folder, MoveConfig};

#[test]
fn requested_shutdown_stops_before_the_next_document() {
    let drive = MemoryDrive::new()
        .with_folder(Folder::new("F", "Summaries"))
        .with_document(Document::new("a", "ChatGPT Summary a", ["A"]))
        .with_document(Document::new("b", "ChatGPT Summary b", ["A"]));

    shutdown::request();
    let result = run(&MoveConfig::new("F", DocumentQuery::new("ChatGPT Summary")), &drive);
    shutdown::reset();

    let err = result.unwrap_err();
    assert!(matches!(err, DriveMoverError::Interrupted));
    assert_eq!(err.code(), 130);
    assert!(drive.update_calls().is_empty());
}
