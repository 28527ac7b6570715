mod common;

use blacknote_core::{EditorBuffer, FindReplace, SearchQuery, TextSurface};
use common::ScriptedHost;

#[test]
fn find_then_replace_walks_every_match_once() {
    let mut buffer = EditorBuffer::new("one two one two one");
    let mut host = ScriptedHost::new();
    let mut engine = FindReplace::new();
    let query = SearchQuery::new("ONE").with_replacement("1");

    assert!(engine.find_next(&mut buffer, &query, &mut host));
    assert_eq!(buffer.selection(), Some(0..3));

    assert!(engine.replace_one(&mut buffer, &query, &mut host));
    assert!(engine.replace_one(&mut buffer, &query, &mut host));
    assert!(engine.replace_one(&mut buffer, &query, &mut host));
    assert_eq!(buffer.text(), "1 two 1 two 1");
    assert_eq!(host.infos.last().map(|(_, msg)| msg.as_str()), Some("No matches found."));
}

#[test]
fn case_sensitive_query_skips_other_cases() {
    let mut buffer = EditorBuffer::new("Rust rust RUST");
    let mut host = ScriptedHost::new();
    let query = SearchQuery::new("rust")
        .with_case_sensitive(true)
        .with_replacement("crab");

    let count = FindReplace::new().replace_all(&mut buffer, &query, &mut host);
    assert_eq!(count, 1);
    assert_eq!(buffer.text(), "Rust crab RUST");
    assert_eq!(
        host.infos,
        vec![("Replace All".to_string(), "Replaced 1 occurrence(s).".to_string())]
    );
}

#[test]
fn wrap_search_from_end_finds_first_occurrence() {
    let mut buffer = EditorBuffer::new("needle hay hay");
    buffer.set_cursor(buffer.len());
    let mut host = ScriptedHost::new();

    assert!(FindReplace::new().find_next(&mut buffer, &SearchQuery::new("needle"), &mut host));
    assert_eq!(buffer.selection(), Some(0..6));
    assert!(host.infos.is_empty());
}

#[test]
fn replace_all_on_multibyte_text() {
    let mut buffer = EditorBuffer::new("가나 가나 다");
    let mut host = ScriptedHost::new();
    let query = SearchQuery::new("가나").with_replacement("x");

    assert_eq!(FindReplace::new().replace_all(&mut buffer, &query, &mut host), 2);
    assert_eq!(buffer.text(), "x x 다");
}
