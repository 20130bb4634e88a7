//! The fixed topping catalog.

use serde::{Deserialize, Serialize};

/// One of the eight toppings on the pizzeria menu.
///
/// The catalog is fixed: orders draw 2-5 toppings from these eight
/// without repetition. `Ord` is derived so selections can live in a
/// `BTreeSet` and serialize in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topping {
    /// Extra cheese.
    Cheese,
    /// Pepperoni slices.
    Pepperoni,
    /// Sliced mushrooms.
    Mushroom,
    /// Black olives.
    Olive,
    /// Red onion.
    Onion,
    /// Green pepper strips.
    GreenPepper,
    /// Crumbled sausage.
    Sausage,
    /// Fresh basil.
    Basil,
}

impl Topping {
    /// Every topping on the menu, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::Cheese,
        Self::Pepperoni,
        Self::Mushroom,
        Self::Olive,
        Self::Onion,
        Self::GreenPepper,
        Self::Sausage,
        Self::Basil,
    ];

    /// Menu price in whole dollars, before any session multiplier.
    #[must_use]
    pub const fn price(self) -> u32 {
        match self {
            Self::Cheese | Self::Mushroom | Self::GreenPepper => 2,
            Self::Pepperoni | Self::Sausage => 3,
            Self::Olive | Self::Onion | Self::Basil => 1,
        }
    }

    /// Parses a topping name, case-insensitively.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cheese" => Some(Self::Cheese),
            "pepperoni" => Some(Self::Pepperoni),
            "mushroom" => Some(Self::Mushroom),
            "olive" => Some(Self::Olive),
            "onion" => Some(Self::Onion),
            "green_pepper" | "green pepper" => Some(Self::GreenPepper),
            "sausage" => Some(Self::Sausage),
            "basil" => Some(Self::Basil),
            _ => None,
        }
    }
}

impl std::fmt::Display for Topping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cheese => write!(f, "cheese"),
            Self::Pepperoni => write!(f, "pepperoni"),
            Self::Mushroom => write!(f, "mushroom"),
            Self::Olive => write!(f, "olive"),
            Self::Onion => write!(f, "onion"),
            Self::GreenPepper => write!(f, "green_pepper"),
            Self::Sausage => write!(f, "sausage"),
            Self::Basil => write!(f, "basil"),
        }
    }
}
