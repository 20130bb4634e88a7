//! Timer-driven lesson tests on a paused tokio clock.
//!
//! These exercise the [`TutorDriver`]'s three clocks together: example
//! auto-play, the feedback delay before transitions, and the reward
//! game's once-per-second countdown.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sumwise_solver::solve;
use sumwise_tutor::{
    EntryRow, MemoryStore, PhaseKind, Tutor, TutorConfig, TutorDriver, Verdict,
};
use tokio::time::sleep;

fn new_driver(seed: u64) -> TutorDriver {
    let tutor = Tutor::new(
        TutorConfig::default(),
        Box::new(MemoryStore::new()),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .expect("Failed to create tutor");
    TutorDriver::new(tutor)
}

/// Fills the open worksheet with the true solution via the driver.
async fn fill_correctly(driver: &TutorDriver) {
    let view = driver
        .snapshot()
        .await
        .worksheet
        .expect("no worksheet in this phase");
    let solved = solve(&view.top, &view.bottom).expect("operands must solve");
    for (index, digit) in solved.result.iter().enumerate() {
        if let Some(digit) = digit {
            driver
                .submit_digit(EntryRow::Answer, index, &digit.to_string())
                .await;
        }
    }
    for (index, digit) in solved.carries.iter().enumerate() {
        if let Some(digit) = digit {
            driver
                .submit_digit(EntryRow::Carries, index, &digit.to_string())
                .await;
        }
    }
}

/// Answers correctly and waits out the feedback delay.
async fn answer_and_wait(driver: &TutorDriver) {
    fill_correctly(driver).await;
    assert_eq!(driver.check_answer().await, Some(Verdict::Correct));
    sleep(Duration::from_secs(2)).await;
}

/// Skips the examples phase synchronously so timer tests start at
/// practice.
async fn skip_examples(driver: &TutorDriver) {
    let tutor = driver.tutor();
    let mut guard = tutor.lock().await;
    while guard.autoplay_tick().expect("autoplay failed") {}
    assert_eq!(guard.phase_kind(), PhaseKind::Practice);
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_runs_the_examples_phase_unattended() {
    let mut driver = new_driver(2);
    assert_eq!(driver.snapshot().await.phase, PhaseKind::Examples);
    driver.start_autoplay();

    // Three easy-tier examples never need more than 40 beats.
    sleep(Duration::from_secs(4 * 40)).await;
    assert_eq!(driver.snapshot().await.phase, PhaseKind::Practice);
}

#[tokio::test(start_paused = true)]
async fn test_feedback_delay_holds_the_graded_worksheet() {
    let driver = new_driver(6);
    skip_examples(&driver).await;

    fill_correctly(&driver).await;
    driver.check_answer().await;

    // 1.4s in, the correct worksheet is still on screen.
    sleep(Duration::from_millis(1_400)).await;
    let view = driver.snapshot().await.worksheet.unwrap();
    assert_eq!(view.progress, Some((0, 6)));
    assert_eq!(view.verdict, Verdict::Correct);

    // 1.6s in, the lesson has moved on.
    sleep(Duration::from_millis(200)).await;
    assert_eq!(
        driver.snapshot().await.worksheet.unwrap().progress,
        Some((1, 6))
    );
}

#[tokio::test(start_paused = true)]
async fn test_countdown_timeouts_walk_both_days() {
    let mut driver = new_driver(9);
    skip_examples(&driver).await;
    answer_and_wait(&driver).await;
    answer_and_wait(&driver).await;
    assert_eq!(driver.snapshot().await.phase, PhaseKind::RewardGame);

    driver.start_game().await;

    // Five 20-second timeouts finish day 1.
    sleep(Duration::from_secs(5 * 20 + 1)).await;
    let game = driver.snapshot().await.game.unwrap();
    assert_eq!(game.day, 2);
    assert_eq!(game.earnings_day_one, 0);

    // Five more finish day 2; after the feedback delay the earnings
    // worksheet opens on 0 + 0.
    sleep(Duration::from_secs(5 * 20 + 2)).await;
    let snapshot = driver.snapshot().await;
    assert_eq!(snapshot.phase, PhaseKind::EarningsCalculation);
    let view = snapshot.worksheet.unwrap();
    assert_eq!(view.top, "0");
    assert_eq!(view.bottom, "0");
}

#[tokio::test(start_paused = true)]
async fn test_earnings_flow_returns_to_practice_on_the_clock() {
    let mut driver = new_driver(17);
    skip_examples(&driver).await;
    answer_and_wait(&driver).await;
    answer_and_wait(&driver).await;

    driver.start_game().await;
    for _ in 0..10 {
        let order = driver
            .snapshot()
            .await
            .game
            .unwrap()
            .order
            .expect("no active order");
        for topping in &order.required {
            driver.toggle_topping(*topping).await;
        }
        assert!(driver.serve().await.unwrap().is_some());
    }
    sleep(Duration::from_secs(2)).await;
    assert_eq!(
        driver.snapshot().await.phase,
        PhaseKind::EarningsCalculation
    );

    answer_and_wait(&driver).await;
    let snapshot = driver.snapshot().await;
    assert_eq!(snapshot.phase, PhaseKind::Practice);
    assert_eq!(snapshot.worksheet.unwrap().progress, Some((2, 6)));
}
