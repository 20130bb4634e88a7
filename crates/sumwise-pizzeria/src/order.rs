//! Order generation.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Topping;

/// Fixed fee added to every order on top of its topping prices.
pub const BASE_FEE: u32 = 5;

/// Smallest number of toppings an order can require.
pub const MIN_TOPPINGS: usize = 2;

/// Largest number of toppings an order can require.
pub const MAX_TOPPINGS: usize = 5;

/// One customer order: a required topping set and its base price.
///
/// Immutable once generated. `base_price` is the sum of the required
/// toppings' menu prices plus [`BASE_FEE`], before any session
/// multiplier. Only exact set equality with `required` counts as a
/// correct serve; the selection's summed price is never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order number, 1-indexed across the whole session.
    pub id: u32,
    /// The exact topping set the learner must reproduce.
    pub required: BTreeSet<Topping>,
    /// Topping prices plus the base fee, unmultiplied.
    pub base_price: u32,
}

impl Order {
    /// Generates one order with 2-5 toppings sampled without repetition
    /// from the catalog.
    pub fn generate<R: Rng + ?Sized>(id: u32, rng: &mut R) -> Self {
        let count = rng.gen_range(MIN_TOPPINGS..=MAX_TOPPINGS);
        let required: BTreeSet<Topping> = rand::seq::index::sample(rng, Topping::ALL.len(), count)
            .iter()
            .map(|index| Topping::ALL[index])
            .collect();
        Self::with_toppings(id, required)
    }

    /// Builds an order from an explicit topping set, pricing it from the
    /// catalog. Used by tests and by batch generation.
    #[must_use]
    pub fn with_toppings(id: u32, required: BTreeSet<Topping>) -> Self {
        let base_price = required.iter().map(|topping| topping.price()).sum::<u32>() + BASE_FEE;
        Self {
            id,
            required,
            base_price,
        }
    }

    /// Generates a full session's worth of orders, ids starting at 1.
    pub fn generate_batch<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Self> {
        (0..count)
            .map(|index| {
                // Session order counts are tiny; the cast cannot truncate.
                #[allow(clippy::cast_possible_truncation)]
                let id = index as u32 + 1;
                Self::generate(id, rng)
            })
            .collect()
    }
}
