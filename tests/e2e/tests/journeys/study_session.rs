//! Journey: building and answering a review session
//!
//! Queue selection under each practice mode, scoring of word answers and
//! the non-scoring context path.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wordup_core::{
    BoxLevel, ContextMode, Direction, DirectionPolicy, EmptyQueueReason, PracticeMode, PresentationMode,
    QueueEntry, QueueRequest, SessionStart, SessionState, MAX_SESSION_CARDS,
};
use wordup_e2e_tests::{TestDataFactory, TestDatabaseManager};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 1, 15, 18, 30, 0).unwrap()
}

fn word_request(practice_mode: PracticeMode) -> QueueRequest {
    QueueRequest {
        practice_mode,
        context_mode: ContextMode::Word,
        ..Default::default()
    }
}

fn expect_session(start: SessionStart) -> SessionState {
    match start {
        SessionStart::Started(session) => session,
        SessionStart::Empty(reason) => panic!("expected a session, got {reason}"),
    }
}

#[test]
fn test_due_only_includes_boundary_and_skips_future() {
    let db = TestDatabaseManager::new_temp();
    let scenario = TestDataFactory::create_due_scenario(&db.storage, now());
    let engine = db.engine(now());

    let session = expect_session(
        engine
            .start_session_with_rng(&scenario.chapter_id, &word_request(PracticeMode::DueOnly), &mut StdRng::seed_from_u64(1))
            .unwrap(),
    );

    let mut ids: Vec<&str> = session.entries.iter().map(|e| e.card_id.as_str()).collect();
    ids.sort();
    let mut expected = vec![scenario.card("overdue"), scenario.card("boundary")];
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn test_empty_box_reports_box_specific_reason() {
    let db = TestDatabaseManager::new_temp();
    let scenario = TestDataFactory::create_box_scenario(&db.storage, now());
    let engine = db.engine(now());

    let start = engine
        .start_session(&scenario.chapter_id, &word_request(PracticeMode::BoxSpecific(BoxLevel::Three)))
        .unwrap();
    assert_eq!(start, SessionStart::Empty(EmptyQueueReason::NoCardsInBox(BoxLevel::Three)));

    let start = engine
        .start_session(&scenario.chapter_id, &word_request(PracticeMode::BoxSpecific(BoxLevel::Five)))
        .unwrap();
    let session = expect_session(start);
    assert_eq!(session.entries.len(), 1);
    assert_eq!(session.entries[0].card_id, scenario.card("box5"));
}

#[test]
fn test_combined_mode_one_context_two_words() {
    let db = TestDatabaseManager::new_temp();
    let scenario = TestDataFactory::create_context_scenario(&db.storage);
    let engine = db.engine(now());

    let request = QueueRequest {
        context_mode: ContextMode::Combined,
        ..Default::default()
    };
    let session = expect_session(engine.start_session(&scenario.chapter_id, &request).unwrap());

    assert_eq!(session.total_count, 3);
    let context: Vec<_> = session
        .entries
        .iter()
        .filter(|e| e.mode == PresentationMode::Context)
        .collect();
    assert_eq!(context.len(), 1);
    assert_eq!(context[0].card_id, scenario.card("context"));
    assert_eq!(context[0].direction, Direction::Context);
}

#[test]
fn test_session_size_is_capped() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Big", 60);
    let engine = db.engine(now());

    let request = QueueRequest {
        practice_mode: PracticeMode::AllCards,
        context_mode: ContextMode::Word,
        limit: 500,
        ..Default::default()
    };
    let session = expect_session(engine.start_session(&chapter.chapter.id, &request).unwrap());
    assert_eq!(session.total_count, MAX_SESSION_CARDS);
}

#[test]
fn test_perfect_session_promotes_and_clears() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Perfect", 4);
    let engine = db.engine(now());

    let request = QueueRequest {
        direction: DirectionPolicy::SourceToTarget,
        context_mode: ContextMode::Word,
        ..Default::default()
    };
    let mut session = expect_session(engine.start_session(&chapter.chapter.id, &request).unwrap());

    while !session.is_complete() {
        let prompt = engine.current_prompt(Some(&session)).unwrap();
        assert_eq!(prompt.question_language, "German");
        session = engine
            .submit_answer(Some(&session), &prompt.card_id, true, prompt.direction)
            .unwrap()
            .session;
    }

    let completion = session.finish().unwrap();
    assert_eq!(completion.summary.accuracy, 100.0);
    assert!(completion.retained.is_none());

    for card in db.storage.list_cards(&chapter.chapter.id).unwrap() {
        assert_eq!(card.box_level, BoxLevel::Two);
        assert_eq!(card.next_review, now() + Duration::days(3));
        assert_eq!(db.storage.list_reviews(&card.id).unwrap().len(), 1);
    }
}

#[test]
fn test_ceiling_and_reset_through_sessions() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Edges", 2);
    db.place_all(&chapter.chapter.id, BoxLevel::Five, now());
    let engine = db.engine(now());
    let ids: Vec<String> = chapter.cards.iter().map(|c| c.id.clone()).collect();

    let session = SessionState::new(
        &chapter.chapter.id,
        vec![
            QueueEntry::word(&ids[0], Direction::SourceToTarget),
            QueueEntry::word(&ids[1], Direction::TargetToSource),
        ],
        ContextMode::Word,
    );
    let outcome = engine.submit_answer(Some(&session), &ids[0], true, Direction::SourceToTarget).unwrap();
    let scored = outcome.scored.unwrap();
    assert_eq!(scored.box_level, BoxLevel::Five);
    assert_eq!(scored.next_review, now() + Duration::days(30));

    let outcome = engine
        .submit_answer(Some(&outcome.session), &ids[1], false, Direction::TargetToSource)
        .unwrap();
    assert_eq!(outcome.scored.unwrap().box_level, BoxLevel::One);

    let summary = outcome.session.summary().unwrap();
    assert_eq!((summary.correct_count, summary.total_count), (1, 2));
    assert_eq!(summary.accuracy, 50.0);
}

#[test]
fn test_context_mode_never_scores() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_mixed_chapter("Sentences", 6);
    let engine = db.engine(now());

    let request = QueueRequest {
        practice_mode: PracticeMode::AllCards,
        context_mode: ContextMode::Context,
        ..Default::default()
    };
    let mut session = expect_session(engine.start_session(&chapter.chapter.id, &request).unwrap());
    assert_eq!(session.total_count, 3);

    let mut correct = false;
    while !session.is_complete() {
        let prompt = engine.current_prompt(Some(&session)).unwrap();
        assert!(prompt.context_hint.is_some());
        assert!(prompt.answer.starts_with("Das ist Satz"));
        let outcome = engine
            .submit_answer(Some(&session), &prompt.card_id, correct, prompt.direction)
            .unwrap();
        assert!(outcome.scored.is_none());
        session = outcome.session;
        correct = !correct;
    }

    assert!(db.storage.list_chapter_reviews(&chapter.chapter.id).unwrap().is_empty());
    for card in db.storage.list_cards(&chapter.chapter.id).unwrap() {
        assert_eq!(card.box_level, BoxLevel::One);
    }
}

#[test]
fn test_context_mode_without_context_cards() {
    let db = TestDatabaseManager::new_temp();
    let chapter = db.seed_chapter("Plain", 3);
    let engine = db.engine(now());

    let request = QueueRequest {
        context_mode: ContextMode::Context,
        ..Default::default()
    };
    let start = engine.start_session(&chapter.chapter.id, &request).unwrap();
    assert_eq!(start, SessionStart::Empty(EmptyQueueReason::NoContextCards));
}
