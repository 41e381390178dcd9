//! Tests for the Connections match engine.

use std::collections::HashSet;

use connections::{
    Category, FeedbackKind, HARD_MODE_GUESSES, Outcome, Proximity, Puzzle, Session, SessionStatus,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Categories A..D hold w1..w4, w5..w8, w9..w12 and w13..w16.
fn puzzle() -> Puzzle {
    let categories = ["A", "B", "C", "D"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let words = (1..=4).map(|j| format!("w{}", i * 4 + j)).collect();
            Category::new(*name, words)
                .expect("valid category")
                .with_difficulty(i as u8 + 1)
        })
        .collect();
    Puzzle::new("Numbers", categories).expect("valid puzzle")
}

fn seeded_session(seed: u64) -> Session {
    Session::initialize_with_rng(puzzle(), &mut StdRng::seed_from_u64(seed))
}

fn select(session: Session, words: &[&str]) -> Session {
    words
        .iter()
        .fold(session, |session, word| session.toggle_selection(word))
}

fn word_set(words: &[String]) -> HashSet<String> {
    words.iter().cloned().collect()
}

#[test]
fn test_initialize_pool_is_full_and_fresh() {
    let session = seeded_session(1);
    assert_eq!(session.pool().len(), 16);
    assert_eq!(
        word_set(session.pool()),
        session.puzzle().words().cloned().collect::<HashSet<String>>()
    );
    assert!(session.selection().is_empty());
    assert!(session.found().is_empty());
    assert!(!session.hard_mode());
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
    assert_eq!(session.status(), SessionStatus::Playing);
}

#[test]
fn test_scenario_correct_then_one_away() {
    let session = select(seeded_session(2), &["w1", "w2", "w3", "w4"]);
    let (session, outcome) = session.submit();

    assert!(outcome.is_correct());
    assert_eq!(outcome.to_string(), "Correct! You found: A");
    assert_eq!(outcome.kind(), FeedbackKind::Success);
    assert_eq!(session.found().len(), 1);
    assert_eq!(session.found()[0].name(), "A");
    assert_eq!(session.pool().len(), 12);
    assert!(session.pool().iter().all(|w| !["w1", "w2", "w3", "w4"].contains(&w.as_str())));
    assert!(session.selection().is_empty());

    let session = select(session, &["w5", "w6", "w7", "w9"]);
    let (session, outcome) = session.submit();
    assert_eq!(outcome, Outcome::Miss(Proximity::OneAway));
    assert_eq!(outcome.to_string(), "One away! You have 3 correct words.");
    assert_eq!(session.found().len(), 1);
    assert_eq!(session.pool().len(), 12);
    assert!(session.selection().is_empty());
}

#[test]
fn test_two_away_and_no_matches() {
    let (session, outcome) = select(seeded_session(3), &["w1", "w2", "w5", "w9"]).submit();
    assert_eq!(outcome, Outcome::Miss(Proximity::TwoAway));
    let (_, outcome) = select(session, &["w1", "w5", "w9", "w13"]).submit();
    assert_eq!(outcome, Outcome::Miss(Proximity::NoMatches));
    assert_eq!(outcome.kind(), FeedbackKind::Info);
}

#[test]
fn test_selection_order_does_not_matter() {
    let (_, outcome) = select(seeded_session(4), &["w8", "w6", "w5", "w7"]).submit();
    assert!(matches!(outcome, Outcome::Correct(ref c) if c.name() == "B"));
}

#[test]
fn test_fifth_word_ignored_and_toggle_deselects() {
    let session = select(seeded_session(5), &["w1", "w2", "w3", "w4", "w5"]);
    assert_eq!(session.selection().len(), 4);
    assert!(!session.is_selected("w5"));

    let session = session.toggle_selection("w2");
    assert_eq!(session.selection().len(), 3);
    assert!(!session.is_selected("w2"));
}

#[test]
fn test_found_words_cannot_be_selected() {
    let (session, _) = select(seeded_session(6), &["w1", "w2", "w3", "w4"]).submit();
    let session = session.toggle_selection("w1").toggle_selection("unknown");
    assert!(session.selection().is_empty());
}

#[test]
fn test_short_submit_is_invalid_and_free_in_hard_mode() {
    let session = select(seeded_session(7).toggle_hard_mode(), &["w1", "w2", "w3"]);
    let pool_before = session.pool().to_vec();
    let (session, outcome) = session.submit();

    assert_eq!(outcome, Outcome::InvalidSelection);
    assert_eq!(outcome.to_string(), "Please select exactly 4 words!");
    assert_eq!(outcome.kind(), FeedbackKind::Error);
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
    assert_eq!(session.selection().len(), 3);
    assert_eq!(session.pool(), pool_before.as_slice());
}

#[test]
fn test_miss_leaves_pool_and_found_untouched() {
    let (session, _) = select(seeded_session(8), &["w1", "w2", "w3", "w4"]).submit();
    let pool_before = session.pool().to_vec();
    let (session, outcome) = select(session, &["w5", "w9", "w13", "w6"]).submit();
    assert!(matches!(outcome, Outcome::Miss(_)));
    assert_eq!(session.pool(), pool_before.as_slice());
    assert_eq!(session.found().len(), 1);
}

#[test]
fn test_hard_mode_miss_costs_one_guess_and_correct_costs_none() {
    let session = seeded_session(9).toggle_hard_mode();
    let (session, _) = select(session, &["w1", "w5", "w9", "w13"]).submit();
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES - 1);

    let (session, outcome) = select(session, &["w1", "w2", "w3", "w4"]).submit();
    assert!(outcome.is_correct());
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES - 1);
}

#[test]
fn test_misses_outside_hard_mode_are_free() {
    let mut session = seeded_session(10);
    for _ in 0..10 {
        let (next, outcome) = select(session, &["w1", "w5", "w9", "w13"]).submit();
        assert!(matches!(outcome, Outcome::Miss(_)));
        session = next;
    }
    assert_eq!(session.status(), SessionStatus::Playing);
}

#[test]
fn test_scenario_hard_mode_exhausted() {
    let mut session = seeded_session(11).toggle_hard_mode();
    let mut outcomes = Vec::new();
    for _ in 0..HARD_MODE_GUESSES {
        let (next, outcome) = select(session, &["w1", "w5", "w9", "w13"]).submit();
        outcomes.push(outcome);
        session = next;
    }

    assert!(outcomes[..3].iter().all(|o| matches!(o, Outcome::Miss(_))));
    assert_eq!(outcomes[3], Outcome::HardModeExhausted);
    assert_eq!(
        outcomes[3].to_string(),
        "Game Over! You've run out of guesses in Hard Mode."
    );
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.guesses_remaining(), 0);
    assert!(session.is_terminal());

    let names: Vec<&str> = session.reveal().iter().map(|c| c.name().as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "D"]);
}

#[test]
fn test_terminal_session_ignores_input() {
    let mut session = seeded_session(12).toggle_hard_mode();
    for _ in 0..HARD_MODE_GUESSES {
        session = select(session, &["w1", "w5", "w9", "w13"]).submit().0;
    }
    let session = select(session, &["w1", "w2", "w3", "w4"]);
    assert!(session.selection().is_empty());
    let (session, outcome) = session.submit();
    assert_eq!(outcome, Outcome::InvalidSelection);
    assert_eq!(session.status(), SessionStatus::Lost);
}

#[test]
fn test_toggle_hard_mode_clears_loss() {
    let mut session = seeded_session(13).toggle_hard_mode();
    for _ in 0..HARD_MODE_GUESSES {
        session = select(session, &["w1", "w5", "w9", "w13"]).submit().0;
    }
    assert_eq!(session.status(), SessionStatus::Lost);

    let session = session.toggle_hard_mode();
    assert!(!session.hard_mode());
    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
}

#[test]
fn test_scenario_restart_after_loss() {
    let mut session = seeded_session(14).toggle_hard_mode();
    let (next, _) = select(session, &["w1", "w2", "w3", "w4"]).submit();
    session = next;
    for _ in 0..HARD_MODE_GUESSES {
        session = select(session, &["w5", "w9", "w13", "w6"]).submit().0;
    }
    assert_eq!(session.status(), SessionStatus::Lost);

    let session = session.restart_with_rng(&mut StdRng::seed_from_u64(99));
    assert_eq!(session.status(), SessionStatus::Playing);
    assert!(session.hard_mode());
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
    assert_eq!(session.pool().len(), 16);
    assert!(session.found().is_empty());
    assert!(session.selection().is_empty());
}

#[test]
fn test_win_after_all_four_categories() {
    let mut session = seeded_session(15);
    for group in [
        ["w9", "w10", "w11", "w12"],
        ["w1", "w2", "w3", "w4"],
        ["w13", "w14", "w15", "w16"],
        ["w5", "w6", "w7", "w8"],
    ] {
        let (next, outcome) = select(session, &group).submit();
        assert!(outcome.is_correct());
        session = next;
    }
    assert_eq!(session.status(), SessionStatus::Won);
    assert!(session.pool().is_empty());
    let order: Vec<&str> = session.found().iter().map(|c| c.name().as_str()).collect();
    assert_eq!(order, ["C", "A", "D", "B"]);
}

#[test]
fn test_toggle_hard_mode_after_win() {
    let mut session = seeded_session(16).toggle_hard_mode();
    session = select(session, &["w1", "w5", "w9", "w13"]).submit().0;
    for group in [
        ["w1", "w2", "w3", "w4"],
        ["w5", "w6", "w7", "w8"],
        ["w9", "w10", "w11", "w12"],
        ["w13", "w14", "w15", "w16"],
    ] {
        session = select(session, &group).submit().0;
    }
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES - 1);

    let session = session.toggle_hard_mode();
    assert!(!session.hard_mode());
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.found().len(), 4);

    let session = session.toggle_hard_mode();
    assert!(session.hard_mode());
    assert_eq!(session.guesses_remaining(), HARD_MODE_GUESSES);
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.found().len(), 4);
    assert!(session.pool().is_empty());
}

#[test]
fn test_shuffle_and_deselect() {
    let session = select(seeded_session(16), &["w1", "w2"]);
    let selected = session.selection().to_vec();
    let session = session.shuffle_with_rng(&mut StdRng::seed_from_u64(3));
    assert_eq!(session.selection(), selected.as_slice());
    assert_eq!(session.pool().len(), 16);

    let session = session.deselect_all();
    assert!(session.selection().is_empty());
}

#[test]
fn test_same_seed_same_order() {
    assert_eq!(seeded_session(42).pool(), seeded_session(42).pool());
}

#[derive(Debug, Clone)]
enum Action {
    Toggle(usize),
    Submit,
    Shuffle(u64),
    Deselect,
    HardMode,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0usize..16).prop_map(Action::Toggle),
        1 => Just(Action::Submit),
        1 => any::<u64>().prop_map(Action::Shuffle),
        1 => Just(Action::Deselect),
        1 => Just(Action::HardMode),
    ]
}

proptest! {
    #[test]
    fn prop_initialize_is_a_permutation(seed in any::<u64>()) {
        let session = seeded_session(seed);
        let mut pool = session.pool().to_vec();
        pool.sort();
        let mut words: Vec<String> = session.puzzle().words().cloned().collect();
        words.sort();
        prop_assert_eq!(pool, words);
    }

    #[test]
    fn prop_actions_preserve_invariants(
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 0..60),
    ) {
        let all: Vec<String> = puzzle().words().cloned().collect();
        let mut session = seeded_session(seed);

        for action in actions {
            let found_before = session.found().len();
            let guesses_before = session.guesses_remaining();
            session = match action {
                Action::Toggle(i) => session.toggle_selection(&all[i]),
                Action::Submit => {
                    let (next, outcome) = session.submit();
                    match outcome {
                        Outcome::Correct(_) => {
                            prop_assert_eq!(next.found().len(), found_before + 1);
                            prop_assert_eq!(next.guesses_remaining(), guesses_before);
                        }
                        Outcome::Miss(_) | Outcome::HardModeExhausted => {
                            prop_assert_eq!(next.found().len(), found_before);
                            if next.hard_mode() {
                                prop_assert_eq!(next.guesses_remaining(), guesses_before - 1);
                            }
                        }
                        Outcome::InvalidSelection => {
                            prop_assert_eq!(next.guesses_remaining(), guesses_before);
                        }
                    }
                    next
                }
                Action::Shuffle(s) => session.shuffle_with_rng(&mut StdRng::seed_from_u64(s)),
                Action::Deselect => session.deselect_all(),
                Action::HardMode => session.toggle_hard_mode(),
            };

            prop_assert!(session.selection().len() <= 4);
            prop_assert!(session.selection().iter().all(|w| session.pool().contains(w)));
            let found_words: usize = session.found().len() * 4;
            prop_assert_eq!(session.pool().len() + found_words, 16);
            prop_assert_eq!(session.status() == SessionStatus::Won, session.found().len() == 4);
            if session.status() == SessionStatus::Lost {
                prop_assert!(session.hard_mode());
                prop_assert_eq!(session.guesses_remaining(), 0);
            }
        }
    }
}
