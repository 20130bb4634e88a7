//! Sumwise Pizzeria
//!
//! The timed order-matching reward game the tutor switches into after a
//! practice streak. The learner is shown an order (a required set of
//! toppings), assembles a pizza by toggling toppings, and serves it
//! against a countdown. An exact topping match earns the order's price
//! plus a time bonus; a wrong serve or a timeout earns nothing. Two
//! five-order "days" make up one game session, and the two daily earnings
//! totals feed the tutor's earnings-reconciliation round.
//!
//! Rendering (the 3D pizza) is out of scope: this crate is the game's
//! state machine and scoring only, driven by `toggle`/`serve`/`tick`
//! events and observed through read-only accessors.
//!
//! # Types
//!
//! - [`Topping`] - The fixed 8-item topping catalog with menu prices
//! - [`Order`] - A required topping set and its base price
//! - [`RewardGame`] - The per-session state machine
//! - [`Resolution`] - How an armed order was resolved and what it earned

mod catalog;
mod game;
mod order;

pub use catalog::Topping;
pub use game::{
    multiplier_for, AttemptRecord, GameStatus, Outcome, Resolution, RewardGame, DAYS_PER_GAME,
    MULTIPLIER_CYCLE, ORDERS_PER_DAY,
};
pub use order::{Order, BASE_FEE, MAX_TOPPINGS, MIN_TOPPINGS};
