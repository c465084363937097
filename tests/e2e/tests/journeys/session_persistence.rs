//! Journey: a session that outlives the process
//!
//! The live session is written to `session.json` between invocations.
//! Reloading it must resume at the same entry with the same resolved
//! directions, and completion clears or keeps the file.

use std::io::Cursor;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wordup_cli::study::{run_round, run_with_recaps, RoundEnd};
use wordup_core::{
    BoxLevel, ContextMode, DirectionPolicy, QueueRequest, SessionError, SessionStart, SessionState,
};
use wordup_e2e_tests::{TestDataFactory, TestDatabaseManager};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 8, 9, 20, 0, 0).unwrap()
}

fn start(db: &TestDatabaseManager, chapter_id: &str, request: &QueueRequest) -> SessionState {
    match db
        .engine(now())
        .start_session_with_rng(chapter_id, request, &mut StdRng::seed_from_u64(42))
        .unwrap()
    {
        SessionStart::Started(session) => session,
        SessionStart::Empty(reason) => panic!("expected a session, got {reason}"),
    }
}

#[test]
fn test_resume_after_reload_keeps_position_and_directions() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Resume", 5);
    let file = db.session_file();
    let request = QueueRequest {
        context_mode: ContextMode::Word,
        ..Default::default()
    };

    let session = start(&db, &chapter.chapter.id, &request);
    let engine = db.engine(now());
    let first = session.current_entry().unwrap().clone();
    let session = engine
        .submit_answer(Some(&session), &first.card_id, false, first.direction)
        .unwrap()
        .session;
    file.save(&session).unwrap();
    drop(engine);

    // a later invocation
    let engine = db.engine(now());
    let loaded = file.load().unwrap().expect("session was saved");
    assert_eq!(loaded, session);
    assert_eq!(loaded.current_index, 1);
    assert_eq!(loaded.wrong_log, vec![first]);

    let prompt = engine.current_prompt(Some(&loaded)).unwrap();
    assert_eq!(prompt.position, 2);
    assert_eq!(prompt.total, 5);
    assert_eq!(prompt.direction, loaded.entries[1].direction);
}

#[test]
fn test_session_file_uses_camel_case_keys() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Keys", 1);
    let file = db.session_file();

    file.save(&start(&db, &chapter.chapter.id, &QueueRequest::default())).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    for key in ["chapterId", "entries", "currentIndex", "correctCount", "totalCount", "wrongLog", "isRecap"] {
        assert!(raw.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn test_quit_then_resume_through_study_loop() {
    let db = TestDatabaseManager::new_temp();
    let scenario = TestDataFactory::create_context_scenario(&db.storage);
    let file = db.session_file();
    let request = QueueRequest {
        direction: DirectionPolicy::SourceToTarget,
        context_mode: ContextMode::Word,
        ..Default::default()
    };
    let session = start(&db, &scenario.chapter_id, &request);
    let answers: Vec<String> = session
        .entries
        .iter()
        .map(|e| db.storage.get_card(&e.card_id).unwrap().target_word)
        .collect();

    let engine = db.engine(now());
    let mut input = Cursor::new(format!("{}\nq\n", answers[0]));
    let mut out = Vec::new();
    let end = run_round(&engine, session, &file, &mut input, &mut out).unwrap();
    assert!(matches!(end, RoundEnd::Quit));

    let saved = file.load().unwrap().expect("quitting keeps the session");
    assert_eq!(saved.current_index, 1);
    assert_eq!(saved.correct_count, 1);

    let mut input = Cursor::new(format!("{}\n", answers[1]));
    let mut out = Vec::new();
    let end = run_round(&engine, saved, &file, &mut input, &mut out).unwrap();

    let RoundEnd::Finished(completion) = end else {
        panic!("second run should finish the session");
    };
    assert_eq!(completion.summary.correct_count, 2);
    assert!(file.load().unwrap().is_none());
    assert!(String::from_utf8(out).unwrap().contains("Session Complete"));

    for card in db.storage.list_cards(&scenario.chapter_id).unwrap() {
        assert_eq!(card.box_level, BoxLevel::Two);
    }
}

#[test]
fn test_missed_round_stays_on_disk_for_recap() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Later", 2);
    let file = db.session_file();
    let request = QueueRequest {
        context_mode: ContextMode::Word,
        ..Default::default()
    };
    let session = start(&db, &chapter.chapter.id, &request);
    let engine = db.engine(now());

    // skip typing, self-grade both as wrong, decline the recap
    let mut input = Cursor::new("\nn\n\nn\nn\n");
    let mut out = Vec::new();
    run_with_recaps(&engine, session, &file, &mut input, &mut out).unwrap();

    let kept = file.load().unwrap().expect("misses keep the session");
    assert!(kept.is_complete());
    assert_eq!(kept.wrong_log.len(), 2);

    // the recap can still be started from the stored session later
    let recap = engine.start_recap(Some(&kept), &chapter.chapter.id).unwrap();
    assert_eq!(recap.total_count, 2);
    assert!(recap.is_recap);
}

#[test]
fn test_recap_mismatch_leaves_stored_session() {
    let db = TestDatabaseManager::new_temp();
    let first = db.seed_chapter("First", 1);
    let second = db.seed_chapter("Second", 1);
    let file = db.session_file();
    let engine = db.engine(now());

    let request = QueueRequest {
        context_mode: ContextMode::Word,
        ..Default::default()
    };
    let session = start(&db, &first.chapter.id, &request);
    let entry = session.current_entry().unwrap().clone();
    let done = engine
        .submit_answer(Some(&session), &entry.card_id, false, entry.direction)
        .unwrap()
        .session;
    file.save(&done).unwrap();

    let stored = file.load().unwrap();
    assert!(matches!(
        engine.start_recap(stored.as_ref(), &second.chapter.id),
        Err(SessionError::ChapterMismatch { .. })
    ));
    assert!(file.load().unwrap().is_some());
}
