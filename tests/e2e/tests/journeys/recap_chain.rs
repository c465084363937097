//! Journey: recap rounds
//!
//! Misses replay with their original direction and mode, recaps chain
//! until a clean round, and no recap answer ever reaches the scheduler.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wordup_core::{
    BoxLevel, ContextMode, FixedClock, PracticeMode, QueueRequest, SessionError, SessionStart, SessionState,
    Storage, StudyEngine,
};
use wordup_e2e_tests::{TestDataFactory, TestDatabaseManager};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 3, 2, 7, 0, 0).unwrap()
}

/// Answer every entry, missing those whose card id is in `miss`
fn play(engine: &StudyEngine<&Storage, FixedClock>, mut session: SessionState, miss: &[&str]) -> SessionState {
    while !session.is_complete() {
        let entry = session.current_entry().unwrap().clone();
        let correct = !miss.contains(&entry.card_id.as_str());
        session = engine
            .submit_answer(Some(&session), &entry.card_id, correct, entry.direction)
            .unwrap()
            .session;
    }
    session
}

fn started(start: SessionStart) -> SessionState {
    match start {
        SessionStart::Started(session) => session,
        SessionStart::Empty(reason) => panic!("expected a session, got {reason}"),
    }
}

#[test]
fn test_recap_chain_terminates_without_touching_srs() {
    let db = TestDatabaseManager::new_temp();
    let scenario = TestDataFactory::create_context_scenario(&db.storage);
    let engine = db.engine(now());
    let plain = scenario.card("plain");
    let context = scenario.card("context");

    let request = QueueRequest {
        practice_mode: PracticeMode::AllCards,
        context_mode: ContextMode::Combined,
        ..Default::default()
    };
    let first = started(
        engine
            .start_session_with_rng(&scenario.chapter_id, &request, &mut StdRng::seed_from_u64(11))
            .unwrap(),
    );
    let first = play(&engine, first, &[plain, context]);
    assert_eq!(first.wrong_log.len(), 3);

    let after_first: Vec<_> = db.storage.list_cards(&scenario.chapter_id).unwrap();
    let reviews_after_first = db.storage.list_chapter_reviews(&scenario.chapter_id).unwrap().len();
    // only the two word entries score
    assert_eq!(reviews_after_first, 2);

    let completion = first.finish().unwrap();
    let retained = completion.retained.expect("misses keep the session");

    let recap = engine.start_recap(Some(&retained), &scenario.chapter_id).unwrap();
    assert!(recap.is_recap);
    assert_eq!(recap.entries, retained.wrong_log);

    engine.clock().advance(Duration::days(10));
    let second = play(&engine, recap, &[plain]);
    assert_eq!(second.wrong_log.len(), 1);
    assert_eq!(second.wrong_log[0].card_id, plain);

    let recap = engine
        .start_recap(second.finish().unwrap().retained.as_ref(), &scenario.chapter_id)
        .unwrap();
    assert_eq!(recap.total_count, 1);
    let third = play(&engine, recap, &[]);

    let completion = third.finish().unwrap();
    assert!(!completion.summary.has_wrong);
    assert!(completion.retained.is_none());
    assert!(matches!(
        engine.start_recap(completion.retained.as_ref(), &scenario.chapter_id),
        Err(SessionError::NoPriorSession)
    ));

    assert_eq!(db.storage.list_cards(&scenario.chapter_id).unwrap(), after_first);
    assert_eq!(
        db.storage.list_chapter_reviews(&scenario.chapter_id).unwrap().len(),
        reviews_after_first
    );
}

#[test]
fn test_recap_preserves_resolved_directions() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Directions", 12);
    let engine = db.engine(now());

    let request = QueueRequest {
        context_mode: ContextMode::Word,
        limit: 12,
        ..Default::default()
    };
    let session = started(
        engine
            .start_session_with_rng(&chapter.chapter.id, &request, &mut StdRng::seed_from_u64(5))
            .unwrap(),
    );
    let asked = session.entries.clone();

    let all: Vec<&str> = chapter.cards.iter().map(|c| c.id.as_str()).collect();
    let done = play(&engine, session, &all);
    let recap = engine.start_recap(Some(&done), &chapter.chapter.id).unwrap();

    assert_eq!(recap.entries, asked);
}

#[test]
fn test_recap_preconditions() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Preconditions", 2);
    let elsewhere = db.seed_chapter("Elsewhere", 1);
    let engine = db.engine(now());

    assert!(matches!(
        engine.start_recap(None, &chapter.chapter.id),
        Err(SessionError::NoPriorSession)
    ));

    let request = QueueRequest {
        context_mode: ContextMode::Word,
        ..Default::default()
    };
    let session = started(engine.start_session(&chapter.chapter.id, &request).unwrap());
    let clean = play(&engine, session, &[]);
    assert!(matches!(
        engine.start_recap(Some(&clean), &chapter.chapter.id),
        Err(SessionError::NoWrongCards)
    ));

    db.place_all(&chapter.chapter.id, BoxLevel::One, now());
    let session = started(engine.start_session(&chapter.chapter.id, &request).unwrap());
    let missed = play(&engine, session, &[chapter.cards[0].id.as_str()]);
    match engine.start_recap(Some(&missed), &elsewhere.chapter.id) {
        Err(SessionError::ChapterMismatch { session, requested }) => {
            assert_eq!(session, chapter.chapter.id);
            assert_eq!(requested, elsewhere.chapter.id);
        }
        other => panic!("expected a chapter mismatch, got {other:?}"),
    }
}
