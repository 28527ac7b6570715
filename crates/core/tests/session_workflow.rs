mod common;

use std::fs;
use std::path::PathBuf;

use blacknote_core::{
    LegacyFallback, RecentLog, SaveChoice, Session, TextEncoding, TextSurface,
};
use common::ScriptedHost;
use tempfile::tempdir;

#[test]
fn open_edit_save_cycle_tracks_dirty_flag() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("notes.txt");
    fs::write(&path, "hello").expect("seed file");

    let recent = RecentLog::new();
    let mut host = ScriptedHost::new().open(path.clone());
    let mut session = Session::new(LegacyFallback::default());

    assert!(session.open(&mut host, &recent));
    assert!(!session.is_dirty());
    assert_eq!(session.window_title(), "notes.txt - Black Notepad");

    session.buffer_mut().set_cursor(5);
    session.buffer_mut().insert_text(", world");
    assert!(session.is_dirty());
    assert_eq!(session.window_title(), "notes.txt* - Black Notepad");

    assert!(session.save(&mut host, &recent));
    assert!(!session.is_dirty());
    assert_eq!(fs::read_to_string(&path).expect("read back"), "hello, world");
    assert_eq!(recent.entries(), vec![path.clone(), path]);
    assert!(host.errors.is_empty());
}

#[test]
fn utf8_text_round_trips_through_save_and_open() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("unicode.txt");
    let text = "한국어 텍스트\n中文\nemoji 🦀\n";

    let recent = RecentLog::new();
    let mut host = ScriptedHost::new().save_to(Some(path.clone()));
    let mut writer = Session::default();
    writer.buffer_mut().insert_text(text);
    assert!(writer.save(&mut host, &recent));

    let mut reader = Session::default();
    assert!(reader.open_path(&path, &mut host, &recent));
    assert_eq!(reader.buffer().text(), text);
    assert_eq!(reader.encoding(), TextEncoding::Utf8);
}

#[test]
fn legacy_file_opens_and_is_rewritten_as_utf8() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("korean.txt");
    let (bytes, _, _) = encoding_rs::EUC_KR.encode("안녕하세요");
    fs::write(&path, &bytes).expect("seed file");

    let recent = RecentLog::new();
    let mut host = ScriptedHost::new();
    let mut session = Session::new(LegacyFallback::default());
    assert!(session.open_path(&path, &mut host, &recent));
    assert_eq!(session.buffer().text(), "안녕하세요");
    assert_eq!(session.encoding().name(), "EUC-KR");

    session.buffer_mut().insert_text("!");
    assert!(session.save(&mut host, &recent));
    assert_eq!(fs::read_to_string(&path).expect("utf-8"), "!안녕하세요");
    assert_eq!(session.encoding(), TextEncoding::Utf8);
}

#[test]
fn save_without_path_offers_untitled_and_cancel_writes_nothing() {
    let temp = tempdir().expect("tempdir");
    let recent = RecentLog::new();
    let mut host = ScriptedHost::new().save_to(None);
    let mut session = Session::default();
    session.buffer_mut().insert_text("unsaved");

    assert!(!session.save(&mut host, &recent));
    assert_eq!(host.suggested, vec![PathBuf::from("Untitled.txt")]);
    assert!(session.is_dirty());
    assert!(session.path().is_none());
    assert!(recent.entries().is_empty());
    assert_eq!(fs::read_dir(temp.path()).expect("list").count(), 0);
}

#[test]
fn close_guard_cancel_keeps_window_open() {
    let recent = RecentLog::new();
    let mut host = ScriptedHost::new().answer(SaveChoice::Cancel);
    let mut session = Session::default();
    session.buffer_mut().insert_text("draft");

    assert!(!session.request_close(&mut host, &recent));
    assert_eq!(host.prompts, vec!["Untitled".to_string()]);
    assert!(session.is_dirty());
}

#[test]
fn close_guard_save_choice_writes_then_allows_close() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("draft.txt");
    let recent = RecentLog::new();
    let mut host = ScriptedHost::new()
        .answer(SaveChoice::Save)
        .save_to(Some(path.clone()));
    let mut session = Session::default();
    session.buffer_mut().insert_text("draft");

    assert!(session.request_close(&mut host, &recent));
    assert_eq!(fs::read_to_string(&path).expect("saved"), "draft");
    assert!(!session.is_dirty());
}

#[test]
fn clean_session_closes_without_prompt() {
    let mut host = ScriptedHost::new();
    let mut session = Session::default();
    assert!(session.request_close(&mut host, &RecentLog::new()));
    assert!(host.prompts.is_empty());
}

#[test]
fn open_cancelled_at_file_picker_keeps_document() {
    let recent = RecentLog::new();
    let mut host = ScriptedHost::new().answer(SaveChoice::Discard);
    let mut session = Session::default();
    session.buffer_mut().insert_text("keep");

    assert!(!session.open(&mut host, &recent));
    assert_eq!(session.buffer().text(), "keep");
}
