//! Memory persistence tests.
//!
//! Load must never fail, whatever is on disk; save must leave a clean,
//! sanitized document behind.

use std::fs;

use mafia_engine::memory::{MemoryRecord, MemoryStore};
use mafia_engine::{Ballots, Role};

#[test]
fn test_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");

    let mut store = MemoryStore::load(&path);
    store.record.append_dialogue("민수: 지연이 수상해요", 120);
    store.record.update_suspicions(
        ["민수: 지연이 수상해요"],
        &["민수".to_string(), "지연".to_string()],
        &["수상".to_string()],
    );
    store.record.reveal_role("지연", Role::Citizen);
    let mut ballots = Ballots::new();
    ballots.insert("민수".into(), "지연".into());
    store.record.add_votes(1, &ballots);
    store.save().unwrap();

    let reloaded = MemoryStore::load(&path);
    assert_eq!(reloaded.record, store.record);
    assert_eq!(reloaded.path(), path.as_path());
}

#[test]
fn test_saved_document_is_sanitized_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");

    let mut store = MemoryStore::load(&path);
    store.record.quietness.insert("수\u{200B}아".into(), 0.5);
    store.record.dialogue_history.push("하린:\u{0008} 흠\u{FEFF}".into());
    store.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'), "pretty printed");
    assert!(!text.contains('\u{200B}'));
    assert!(!text.contains('\u{FEFF}'));

    let reloaded = MemoryStore::load(&path);
    assert_eq!(reloaded.record.quietness["수아"], 0.5);
    assert_eq!(reloaded.record.dialogue_history, vec!["하린: 흠".to_string()]);
}

#[test]
fn test_corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");

    let cases: [&[u8]; 5] = [b"", b"null", b"[]", b"{\"dialogue_history\": ", b"\xc3\x28\xa0\xa1"];
    for garbage in cases {
        fs::write(&path, garbage).unwrap();
        assert_eq!(MemoryStore::load(&path).record, MemoryRecord::default());
    }
}

#[test]
fn test_unknown_and_wrong_fields_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");
    fs::write(
        &path,
        r#"{
            "version": 7,
            "dialogue_history": ["현우: 안녕"],
            "facts": {"dead": ["태훈"], "revealed_roles": []},
            "votes": {"Round1": [{"voter": "a", "target": "b", "weight": 2}]},
            "round_summaries": 12
        }"#,
    )
    .unwrap();

    let record = MemoryStore::load(&path).record;
    assert_eq!(record.dialogue_history, vec!["현우: 안녕".to_string()]);
    assert_eq!(record.facts.dead, vec!["태훈".to_string()]);
    assert!(record.facts.revealed_roles.is_empty());
    assert_eq!(record.votes["Round1"].len(), 1);
    assert!(record.round_summaries.is_empty());
}

#[test]
fn test_save_overwrites_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");
    fs::write(&path, "x".repeat(10_000)).unwrap();

    let store = MemoryStore::load(&path);
    store.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.len() < 1_000);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.get("suspicions").is_some());
}
