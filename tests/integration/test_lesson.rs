//! End-to-end lesson flow tests.
//!
//! These drive the synchronous phase machine through a whole lesson:
//! examples into practice, reward-game interludes at the streak cadence,
//! earnings reconciliation, and completion, including the persisted
//! multiplier progression across lessons.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sumwise_pizzeria::Outcome;
use sumwise_solver::solve;
use sumwise_tutor::{
    CounterStore, EntryRow, JsonFileStore, MemoryStore, PhaseKind, Tutor, TutorConfig, Verdict,
    COMPLETED_SESSIONS_KEY,
};

fn new_tutor(store: Box<dyn CounterStore>, seed: u64) -> Tutor {
    Tutor::new(
        TutorConfig::default(),
        store,
        ChaCha8Rng::seed_from_u64(seed),
    )
    .expect("Failed to create tutor")
}

/// Runs the examples phase out so the lesson sits at its first practice
/// question.
fn skip_examples(tutor: &mut Tutor) {
    while tutor.autoplay_tick().expect("autoplay failed") {}
    assert_eq!(tutor.phase_kind(), PhaseKind::Practice);
}

/// Fills the open worksheet with the true solution and checks it.
fn answer_correctly(tutor: &mut Tutor) {
    let view = tutor
        .snapshot()
        .worksheet
        .expect("no worksheet in this phase");
    let solved = solve(&view.top, &view.bottom).expect("operands must solve");
    for (index, digit) in solved.result.iter().enumerate() {
        if let Some(digit) = digit {
            tutor.submit_digit(EntryRow::Answer, index, &digit.to_string());
        }
    }
    for (index, digit) in solved.carries.iter().enumerate() {
        if let Some(digit) = digit {
            tutor.submit_digit(EntryRow::Carries, index, &digit.to_string());
        }
    }
    assert_eq!(tutor.check_answer(), Some(Verdict::Correct));
}

/// Applies the pending transition at the current epoch.
fn resolve(tutor: &mut Tutor) {
    let epoch = tutor.epoch();
    assert!(tutor.resolve_pending(epoch).expect("transition failed"));
}

/// Plays the reward game out, serving every order correctly.
fn win_the_game(tutor: &mut Tutor) {
    tutor.start_game();
    for _ in 0..10 {
        let order = tutor
            .snapshot()
            .game
            .expect("no game in this phase")
            .order
            .expect("no active order");
        for topping in &order.required {
            tutor.toggle_topping(*topping);
        }
        let resolution = tutor
            .serve()
            .expect("serve failed")
            .expect("serve was ignored");
        assert_eq!(resolution.outcome, Outcome::ServedCorrect);
    }
}

/// Plays the reward game out, serving every order empty.
fn lose_the_game(tutor: &mut Tutor) {
    tutor.start_game();
    for _ in 0..10 {
        assert!(tutor.serve().expect("serve failed").is_some());
    }
}

/// Runs one whole lesson to completion, winning every game.
fn run_lesson(tutor: &mut Tutor) {
    skip_examples(tutor);
    let mut guard = 0;
    while tutor.phase_kind() != PhaseKind::Complete {
        guard += 1;
        assert!(guard < 100, "lesson never completed");
        match tutor.phase_kind() {
            PhaseKind::Practice | PhaseKind::EarningsCalculation => {
                answer_correctly(tutor);
                resolve(tutor);
            }
            PhaseKind::RewardGame => {
                win_the_game(tutor);
                resolve(tutor);
            }
            PhaseKind::Examples | PhaseKind::Complete => {}
        }
    }
}

#[test]
fn test_full_lesson_completes_with_three_game_sessions() {
    let mut tutor = new_tutor(Box::new(MemoryStore::new()), 3);
    run_lesson(&mut tutor);

    // Six practice questions at a streak of two trigger three games,
    // each followed by one earnings reconciliation.
    assert_eq!(tutor.correct_answers(), 6);
    assert_eq!(tutor.completed_sessions().unwrap(), 3);

    let history = tutor.history();
    assert_eq!(history.len(), 9);
    assert_eq!(
        history
            .iter()
            .filter(|a| a.phase == PhaseKind::Practice)
            .count(),
        6
    );
    assert_eq!(
        history
            .iter()
            .filter(|a| a.phase == PhaseKind::EarningsCalculation)
            .count(),
        3
    );
    assert!(history.iter().all(|a| a.verdict == Verdict::Correct));
}

#[test]
fn test_multipliers_cycle_within_a_lesson() {
    let mut tutor = new_tutor(Box::new(MemoryStore::new()), 8);
    skip_examples(&mut tutor);

    let mut multipliers = Vec::new();
    let mut guard = 0;
    while tutor.phase_kind() != PhaseKind::Complete {
        guard += 1;
        assert!(guard < 100, "lesson never completed");
        match tutor.phase_kind() {
            PhaseKind::Practice | PhaseKind::EarningsCalculation => {
                answer_correctly(&mut tutor);
                resolve(&mut tutor);
            }
            PhaseKind::RewardGame => {
                multipliers.push(tutor.snapshot().game.unwrap().multiplier);
                lose_the_game(&mut tutor);
                resolve(&mut tutor);
            }
            PhaseKind::Examples | PhaseKind::Complete => {}
        }
    }

    // The counter bumps at each completion, so the cycle advances one
    // notch per game: x1, then x4, then x8.
    assert_eq!(multipliers, vec![1, 4, 8]);
}

#[test]
fn test_multiplier_survives_a_restart_through_the_file_store() {
    let dir = std::env::temp_dir().join("sumwise_integration_restart");
    std::fs::remove_dir_all(&dir).ok();
    let path = dir.join("progress.json");

    // Lesson one: play through the first game only.
    let mut tutor = new_tutor(Box::new(JsonFileStore::new(&path)), 13);
    skip_examples(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    assert_eq!(tutor.snapshot().game.unwrap().multiplier, 1);
    lose_the_game(&mut tutor);
    drop(tutor);

    // A fresh lesson on the same store starts its first game at x4.
    let mut tutor = new_tutor(Box::new(JsonFileStore::new(&path)), 14);
    assert_eq!(tutor.completed_sessions().unwrap(), 1);
    skip_examples(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    assert_eq!(tutor.snapshot().game.unwrap().multiplier, 4);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_won_game_reconciles_real_earnings() {
    let mut tutor = new_tutor(Box::new(MemoryStore::new()), 21);
    skip_examples(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    answer_correctly(&mut tutor);
    resolve(&mut tutor);

    win_the_game(&mut tutor);
    let game = tutor.snapshot().game.unwrap();
    assert!(game.earnings_day_one > 0);
    assert!(game.earnings_day_two > 0);

    resolve(&mut tutor);
    assert_eq!(tutor.phase_kind(), PhaseKind::EarningsCalculation);
    let sheet = tutor.snapshot().worksheet.unwrap();
    assert_eq!(sheet.top, game.earnings_day_one.to_string());
    assert_eq!(sheet.bottom, game.earnings_day_two.to_string());

    // Reconcile correctly and land back in practice on question 3.
    answer_correctly(&mut tutor);
    resolve(&mut tutor);
    assert_eq!(tutor.snapshot().worksheet.unwrap().progress, Some((2, 6)));
}

#[test]
fn test_snapshot_serializes_for_hosts() {
    let tutor = new_tutor(Box::new(MemoryStore::new()), 30);
    let json = serde_json::to_value(tutor.snapshot()).expect("snapshot must serialize");

    assert_eq!(json["phase"], "examples");
    assert_eq!(json["correctAnswers"], 0);
    assert_eq!(json["example"]["index"], 0);
    assert_eq!(json["example"]["total"], 3);
    assert!(json["worksheet"].is_null());
    assert!(json["game"].is_null());
}

#[test]
fn test_counter_store_trait_objects_interchange() {
    let mut store = MemoryStore::new();
    store.store(COMPLETED_SESSIONS_KEY, 2).unwrap();
    let tutor = new_tutor(Box::new(store), 4);
    assert_eq!(tutor.completed_sessions().unwrap(), 2);
}
