//! The per-session reward-game state machine.
//!
//! Each order runs `awaiting start -> armed -> resolved`; resolution is a
//! correct serve, an incorrect serve, or a timeout, and all three count
//! as one attempt. After exactly [`ORDERS_PER_DAY`] attempts the game
//! either advances to day 2 or completes with the two daily totals.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Order, Topping};

/// Orders attempted per in-game day.
pub const ORDERS_PER_DAY: usize = 5;

/// Number of in-game days per session.
pub const DAYS_PER_GAME: usize = 2;

/// Price multipliers applied to consecutive completed game sessions.
pub const MULTIPLIER_CYCLE: [u32; 3] = [1, 4, 8];

/// Derives the price multiplier for the *next* session from the
/// persisted completed-session counter.
///
/// # Examples
///
/// ```
/// use sumwise_pizzeria::multiplier_for;
///
/// assert_eq!(multiplier_for(0), 1);
/// assert_eq!(multiplier_for(1), 4);
/// assert_eq!(multiplier_for(2), 8);
/// assert_eq!(multiplier_for(3), 1);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn multiplier_for(completed_sessions: u64) -> u32 {
    MULTIPLIER_CYCLE[(completed_sessions % 3) as usize]
}

// ============================================================================
// Outcomes
// ============================================================================

/// How an armed order was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The served toppings exactly matched the order.
    ServedCorrect,
    /// The served toppings differed from the order.
    ServedIncorrect,
    /// The countdown reached zero before a serve.
    TimedOut,
}

impl Outcome {
    /// Returns `true` if this outcome earned money.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::ServedCorrect)
    }
}

/// The result of resolving one armed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// How the order was resolved.
    pub outcome: Outcome,
    /// Dollars earned, 0 unless the serve was correct.
    pub earned: u32,
}

/// Timestamped record of one resolved order attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// Which order was attempted.
    pub order_id: u32,
    /// Day the attempt happened on (1 or 2).
    pub day: u8,
    /// How the attempt resolved.
    pub outcome: Outcome,
    /// Dollars earned by the attempt.
    pub earned: u32,
    /// When the attempt resolved.
    pub resolved_at: DateTime<Utc>,
}

/// Lifecycle of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Session created but the first order is not yet armed.
    AwaitingStart,
    /// An order is active and its countdown is armed.
    OrderActive,
    /// Both days are done; final earnings are available.
    Complete,
}

// ============================================================================
// RewardGame
// ============================================================================

/// One two-day reward-game session.
///
/// All ten orders are pre-generated up front. The session is driven by
/// three events: [`toggle_topping`](Self::toggle_topping),
/// [`serve`](Self::serve), and the once-per-second
/// [`tick`](Self::tick). Everything else is read-only observation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardGame {
    orders: Vec<Order>,
    order_index: usize,
    day: u8,
    attempts_this_day: u8,
    earnings: [u32; DAYS_PER_GAME],
    timer_seconds: u32,
    time_remaining: u32,
    timer_armed: bool,
    multiplier: u32,
    selection: BTreeSet<Topping>,
    attempts: Vec<AttemptRecord>,
    status: GameStatus,
}

impl RewardGame {
    /// Creates a session with freshly generated orders.
    ///
    /// `multiplier` comes from the persisted completion counter (see
    /// [`multiplier_for`]) and applies to every price in this session.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, multiplier: u32, timer_seconds: u32) -> Self {
        let orders = Order::generate_batch(ORDERS_PER_DAY * DAYS_PER_GAME, rng);
        Self::with_orders(orders, multiplier, timer_seconds)
    }

    /// Creates a session over explicit orders. Used by tests; `new`
    /// delegates here.
    #[must_use]
    pub fn with_orders(orders: Vec<Order>, multiplier: u32, timer_seconds: u32) -> Self {
        Self {
            orders,
            order_index: 0,
            day: 1,
            attempts_this_day: 0,
            earnings: [0; DAYS_PER_GAME],
            timer_seconds,
            time_remaining: timer_seconds,
            timer_armed: false,
            multiplier,
            selection: BTreeSet::new(),
            attempts: Vec::new(),
            status: GameStatus::AwaitingStart,
        }
    }

    /// Arms the countdown for the first order.
    ///
    /// Does nothing unless the session is still awaiting its start.
    pub fn start(&mut self) {
        if self.status != GameStatus::AwaitingStart {
            return;
        }
        self.status = GameStatus::OrderActive;
        self.arm_timer();
        info!(day = self.day, multiplier = self.multiplier, "Game started");
    }

    /// Toggles a topping in the learner's current selection.
    ///
    /// Symmetric-difference semantics: present toppings are removed,
    /// absent toppings are added. Allowed at any point while an order is
    /// active.
    pub fn toggle_topping(&mut self, topping: Topping) {
        if self.status != GameStatus::OrderActive {
            return;
        }
        if !self.selection.remove(&topping) {
            self.selection.insert(topping);
        }
        debug!(%topping, selected = self.selection.len(), "Topping toggled");
    }

    /// Serves the current selection against the active order.
    ///
    /// Accepted only while the countdown is armed; returns `None`
    /// otherwise. Correctness is exact set equality with the order's
    /// required toppings: subsets and supersets are both wrong. A correct
    /// serve earns `base_price * multiplier` plus a time bonus of
    /// `(seconds remaining / 2) * multiplier`.
    pub fn serve(&mut self) -> Option<Resolution> {
        if !self.timer_armed {
            return None;
        }
        let order = self.orders.get(self.order_index)?;

        let (outcome, earned) = if self.selection == order.required {
            let bonus = self.time_remaining / 2;
            (
                Outcome::ServedCorrect,
                order.base_price * self.multiplier + bonus * self.multiplier,
            )
        } else {
            (Outcome::ServedIncorrect, 0)
        };

        Some(self.resolve(outcome, earned))
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `Some` only when this tick expired the order, which scores
    /// exactly like an incorrect serve. Ignored while no order is armed.
    pub fn tick(&mut self) -> Option<Resolution> {
        if !self.timer_armed {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return None;
        }
        Some(self.resolve(Outcome::TimedOut, 0))
    }

    /// Resolves the active order and advances the session.
    fn resolve(&mut self, outcome: Outcome, earned: u32) -> Resolution {
        self.timer_armed = false;
        let order_id = self.orders.get(self.order_index).map_or(0, |o| o.id);

        self.earnings[usize::from(self.day - 1)] += earned;
        self.attempts_this_day += 1;
        self.attempts.push(AttemptRecord {
            order_id,
            day: self.day,
            outcome,
            earned,
            resolved_at: Utc::now(),
        });
        info!(
            order_id,
            day = self.day,
            ?outcome,
            earned,
            attempts = self.attempts_this_day,
            "Order resolved"
        );

        self.selection.clear();

        // Exactly ORDERS_PER_DAY attempts end a day, never fewer or more.
        if usize::from(self.attempts_this_day) == ORDERS_PER_DAY {
            if usize::from(self.day) == DAYS_PER_GAME {
                self.status = GameStatus::Complete;
                info!(
                    day1 = self.earnings[0],
                    day2 = self.earnings[1],
                    "Game complete"
                );
            } else {
                self.day += 1;
                self.attempts_this_day = 0;
                self.order_index += 1;
                self.arm_timer();
                info!(day = self.day, "Day advanced");
            }
        } else {
            self.order_index += 1;
            self.arm_timer();
        }

        Resolution { outcome, earned }
    }

    /// Re-arms the countdown with a fresh full duration.
    fn arm_timer(&mut self) {
        self.time_remaining = self.timer_seconds;
        self.timer_armed = true;
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// The order currently being assembled, if any.
    #[must_use]
    pub fn current_order(&self) -> Option<&Order> {
        if self.status == GameStatus::OrderActive {
            self.orders.get(self.order_index)
        } else {
            None
        }
    }

    /// Current session lifecycle status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns `true` once both days are done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == GameStatus::Complete
    }

    /// Current day, 1 or 2.
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Attempts resolved so far on the current day.
    #[must_use]
    pub const fn attempts_this_day(&self) -> u8 {
        self.attempts_this_day
    }

    /// Seconds left on the active countdown.
    #[must_use]
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Whether a countdown is currently armed.
    #[must_use]
    pub const fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// The session's price multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// The learner's current topping selection.
    #[must_use]
    pub const fn selection(&self) -> &BTreeSet<Topping> {
        &self.selection
    }

    /// Earnings accumulated on a day (1-indexed).
    #[must_use]
    pub fn earnings_for_day(&self, day: u8) -> u32 {
        usize::from(day)
            .checked_sub(1)
            .and_then(|index| self.earnings.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// The `(day 1, day 2)` totals, available once the game is complete.
    #[must_use]
    pub fn final_earnings(&self) -> Option<(u32, u32)> {
        if self.is_complete() {
            Some((self.earnings[0], self.earnings[1]))
        } else {
            None
        }
    }

    /// Every resolved attempt, in order.
    #[must_use]
    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Ten fixed orders: order i requires {Cheese, Pepperoni} when even,
    /// {Olive, Onion, Basil} when odd.
    fn fixed_orders() -> Vec<Order> {
        (1..=10)
            .map(|id| {
                let toppings: BTreeSet<Topping> = if id % 2 == 0 {
                    [Topping::Cheese, Topping::Pepperoni].into()
                } else {
                    [Topping::Olive, Topping::Onion, Topping::Basil].into()
                };
                Order::with_toppings(id, toppings)
            })
            .collect()
    }

    fn started_game(multiplier: u32) -> RewardGame {
        let mut game = RewardGame::with_orders(fixed_orders(), multiplier, 20);
        game.start();
        game
    }

    fn select_required(game: &mut RewardGame) {
        let required: Vec<Topping> = game
            .current_order()
            .unwrap()
            .required
            .iter()
            .copied()
            .collect();
        for topping in required {
            game.toggle_topping(topping);
        }
    }

    #[test]
    fn test_start_arms_the_first_order() {
        let mut game = RewardGame::with_orders(fixed_orders(), 1, 20);
        assert_eq!(game.status(), GameStatus::AwaitingStart);
        assert!(!game.timer_armed());

        game.start();
        assert_eq!(game.status(), GameStatus::OrderActive);
        assert!(game.timer_armed());
        assert_eq!(game.time_remaining(), 20);
        assert_eq!(game.current_order().unwrap().id, 1);
    }

    #[test]
    fn test_exact_match_earns_price_plus_time_bonus() {
        let mut game = started_game(1);
        select_required(&mut game);

        // Full 20 seconds remain: bonus = 20 / 2 = 10.
        // Order 1 = olive + onion + basil = $3 + $5 fee = $8.
        let resolution = game.serve().unwrap();
        assert_eq!(resolution.outcome, Outcome::ServedCorrect);
        assert_eq!(resolution.earned, 8 + 10);
        assert_eq!(game.earnings_for_day(1), 18);
    }

    #[test]
    fn test_multiplier_scales_price_and_bonus() {
        let mut game = started_game(4);
        select_required(&mut game);

        let resolution = game.serve().unwrap();
        assert_eq!(resolution.earned, (8 + 10) * 4);
    }

    #[test]
    fn test_time_bonus_decreases_as_the_clock_runs() {
        let mut game = started_game(1);
        select_required(&mut game);
        for _ in 0..7 {
            game.tick();
        }
        assert_eq!(game.time_remaining(), 13);

        let resolution = game.serve().unwrap();
        // bonus = 13 / 2 = 6
        assert_eq!(resolution.earned, 8 + 6);
    }

    #[test]
    fn test_superset_selection_is_rejected() {
        let mut game = started_game(1);
        select_required(&mut game);
        game.toggle_topping(Topping::Mushroom);

        let resolution = game.serve().unwrap();
        assert_eq!(resolution.outcome, Outcome::ServedIncorrect);
        assert_eq!(resolution.earned, 0);
        assert_eq!(game.earnings_for_day(1), 0);
    }

    #[test]
    fn test_subset_selection_is_rejected() {
        let mut game = started_game(1);
        game.toggle_topping(Topping::Olive);

        let resolution = game.serve().unwrap();
        assert_eq!(resolution.outcome, Outcome::ServedIncorrect);
        assert_eq!(resolution.earned, 0);
    }

    #[test]
    fn test_toggle_is_a_symmetric_difference() {
        let mut game = started_game(1);
        game.toggle_topping(Topping::Cheese);
        assert!(game.selection().contains(&Topping::Cheese));
        game.toggle_topping(Topping::Cheese);
        assert!(!game.selection().contains(&Topping::Cheese));
    }

    #[test]
    fn test_serve_before_start_is_ignored() {
        let mut game = RewardGame::with_orders(fixed_orders(), 1, 20);
        assert!(game.serve().is_none());
        assert!(game.tick().is_none());
    }

    #[test]
    fn test_timeout_scores_like_an_incorrect_serve() {
        let mut game = started_game(1);

        let mut resolution = None;
        for _ in 0..20 {
            resolution = game.tick();
            if resolution.is_some() {
                break;
            }
        }

        let resolution = resolution.unwrap();
        assert_eq!(resolution.outcome, Outcome::TimedOut);
        assert_eq!(resolution.earned, 0);
        assert_eq!(game.attempts_this_day(), 1);
        assert_eq!(game.earnings_for_day(1), 0);
        // The next order is re-armed with a fresh full countdown.
        assert!(game.timer_armed());
        assert_eq!(game.time_remaining(), 20);
        assert_eq!(game.current_order().unwrap().id, 2);
    }

    #[test]
    fn test_timeout_fires_only_at_zero() {
        let mut game = started_game(1);
        for _ in 0..19 {
            assert!(game.tick().is_none());
        }
        assert_eq!(game.time_remaining(), 1);
        assert!(game.tick().is_some());
    }

    #[test]
    fn test_selection_clears_between_orders() {
        let mut game = started_game(1);
        game.toggle_topping(Topping::Cheese);
        game.serve();
        assert!(game.selection().is_empty());
    }

    #[test]
    fn test_day_advances_after_exactly_five_attempts() {
        let mut game = started_game(1);

        for attempt in 1..=4 {
            game.serve();
            assert_eq!(game.day(), 1, "day advanced early at attempt {attempt}");
        }
        game.serve();
        assert_eq!(game.day(), 2);
        assert_eq!(game.attempts_this_day(), 0);
        assert!(game.timer_armed());
        assert_eq!(game.current_order().unwrap().id, 6);
    }

    #[test]
    fn test_game_completes_after_ten_attempts() {
        let mut game = started_game(1);

        for _ in 0..10 {
            assert!(!game.is_complete());
            select_required(&mut game);
            game.serve();
        }

        assert!(game.is_complete());
        assert!(!game.timer_armed());
        assert!(game.serve().is_none());
        assert!(game.tick().is_none());
        assert!(game.current_order().is_none());
    }

    #[test]
    fn test_final_earnings_split_by_day() {
        let mut game = started_game(1);

        // Day 1: serve every order correctly at full bonus.
        // Orders 1,3,5 = $8 each; orders 2,4 = $10 each ($5 toppings + fee).
        for _ in 0..5 {
            select_required(&mut game);
            game.serve();
        }
        // Day 2: fail everything.
        for _ in 0..5 {
            game.serve();
        }

        let (day1, day2) = game.final_earnings().unwrap();
        assert_eq!(day1, 3 * (8 + 10) + 2 * (10 + 10));
        assert_eq!(day2, 0);
    }

    #[test]
    fn test_final_earnings_unavailable_before_completion() {
        let game = started_game(1);
        assert!(game.final_earnings().is_none());
    }

    #[test]
    fn test_attempt_log_records_every_resolution() {
        let mut game = started_game(1);
        select_required(&mut game);
        game.serve();
        game.serve();

        let attempts = game.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].order_id, 1);
        assert_eq!(attempts[0].outcome, Outcome::ServedCorrect);
        assert_eq!(attempts[1].order_id, 2);
        assert_eq!(attempts[1].outcome, Outcome::ServedIncorrect);
        assert_eq!(attempts[1].earned, 0);
    }

    #[test]
    fn test_multiplier_cycle() {
        assert_eq!(multiplier_for(0), 1);
        assert_eq!(multiplier_for(1), 4);
        assert_eq!(multiplier_for(2), 8);
        assert_eq!(multiplier_for(3), 1);
        assert_eq!(multiplier_for(7), 4);
    }

    #[test]
    fn test_generated_session_has_ten_orders() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(21);
        let mut game = RewardGame::new(&mut rng, 1, 20);
        game.start();

        // Ten timeouts must walk through every order and complete.
        for _ in 0..10 {
            loop {
                if game.tick().is_some() {
                    break;
                }
            }
        }
        assert!(game.is_complete());
        assert_eq!(game.attempts().len(), 10);
    }
}
