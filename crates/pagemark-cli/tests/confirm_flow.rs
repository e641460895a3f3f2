use std::io::Cursor;
use std::sync::Arc;

use pagemark_cli::confirm::{Decision, settle_pending};
use pagemark_cli::session::Session;
use pagemark_core::{ManualClock, SequentialIds};

fn open(dir: &std::path::Path, prefix: &str) -> Session {
    Session::open_with(
        dir,
        Arc::new(ManualClock::default()),
        Arc::new(SequentialIds::new(prefix)),
    )
    .unwrap()
}

#[test]
fn declining_keeps_everything() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), "id");
    let book = session.library_mut().create_book("Foo", 200, 1000.0).unwrap();
    session.library_mut().add_entry(&book.id, 1, 100).unwrap();
    session.library_mut().resize_book(&book.id, 300).unwrap();

    let mut output = Vec::new();
    let decision =
        settle_pending(&mut session, false, &mut Cursor::new("n\n"), &mut output).unwrap();

    assert!(matches!(decision, Decision::Cancelled(_)));
    let shown = String::from_utf8(output).unwrap();
    assert!(shown.contains("Current total page count: 200"), "{shown}");
    assert!(shown.ends_with("[y/N] "));
    assert_eq!(session.library().book(&book.id).unwrap().total_page_count, 200);
    assert_eq!(session.library().entries(&book.id).len(), 1);
    assert!(session.library().prompt().is_none());
}

#[test]
fn end_of_input_cancels() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), "id");
    let book = session.library_mut().create_book("Foo", 200, 1000.0).unwrap();
    session.library_mut().delete_book(&book.id).unwrap();

    let decision =
        settle_pending(&mut session, false, &mut Cursor::new(""), &mut Vec::new()).unwrap();

    assert!(matches!(decision, Decision::Cancelled(_)));
    assert!(session.library().book(&book.id).is_some());
}

#[test]
fn yes_runs_the_action_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), "id");
    let book = session.library_mut().create_book("Foo", 200, 1000.0).unwrap();
    session.library_mut().add_entry(&book.id, 1, 100).unwrap();
    session.library_mut().delete_book(&book.id).unwrap();

    let decision =
        settle_pending(&mut session, false, &mut Cursor::new("y\n"), &mut Vec::new()).unwrap();

    let Decision::Confirmed(prompt) = decision else {
        panic!("expected confirmation");
    };
    assert_eq!(prompt.title, "Delete book");
    drop(session);

    let reopened = open(dir.path(), "other");
    assert!(reopened.library().list_books(None).is_empty());
    assert!(reopened.library().entries(&book.id).is_empty());
}

#[test]
fn assume_yes_skips_reading_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), "id");
    let book = session.library_mut().create_book("Foo", 200, 1000.0).unwrap();
    let entry = session.library_mut().add_entry(&book.id, 1, 10).unwrap();
    session.library_mut().delete_entry(&book.id, &entry.id).unwrap();

    let mut output = Vec::new();
    let decision =
        settle_pending(&mut session, true, &mut Cursor::new("n\n"), &mut output).unwrap();

    assert!(matches!(decision, Decision::Confirmed(_)));
    assert!(String::from_utf8(output).unwrap().ends_with("[y/N] y\n"));
    assert!(session.library().entries(&book.id).is_empty());
}

#[test]
fn nothing_pending_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), "id");
    assert!(settle_pending(&mut session, true, &mut Cursor::new(""), &mut Vec::new()).is_err());
}

#[test]
fn refresh_picks_up_other_process_writes() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = open(dir.path(), "first");
    let mut second = open(dir.path(), "second");

    let book = second.library_mut().create_book("Foo", 200, 1000.0).unwrap();
    assert!(first.library().book(&book.id).is_none());

    assert_eq!(first.refresh().unwrap(), 1);
    assert_eq!(first.library().book(&book.id).unwrap().title, "Foo");
    assert_eq!(first.refresh().unwrap(), 0);
}

#[test]
fn confirm_applies_to_state_written_while_waiting() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = open(dir.path(), "first");
    let book = first.library_mut().create_book("Foo", 200, 1000.0).unwrap();

    let mut second = open(dir.path(), "second");
    second.library_mut().add_entry(&book.id, 1, 50).unwrap();

    first.library_mut().resize_book(&book.id, 400).unwrap();
    settle_pending(&mut first, false, &mut Cursor::new("yes\n"), &mut Vec::new()).unwrap();

    assert_eq!(first.library().book(&book.id).unwrap().total_page_count, 400);
    assert!(first.library().entries(&book.id).is_empty());

    drop(first);
    drop(second);
    let reopened = open(dir.path(), "third");
    assert!(reopened.library().entries(&book.id).is_empty());
}

#[test]
fn session_reports_its_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let session = open(&dir.path().join("books"), "id");
    assert_eq!(session.data_dir(), dir.path().join("books"));
}
