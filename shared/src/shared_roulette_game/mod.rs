mod reconcile;
mod reel;
mod session;
mod spin_plan;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::*;

pub use reconcile::{locate_landing, reconcile};
pub use reel::expand;
pub use session::RouletteSession;
pub use spin_plan::{ease_out_quart, RevealTimer, SpinPlan, SpinSettings};

/// What kind of prize a catalog entry is. Decides which value field counts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrizeCategory {
    Money,
    Product,
}

/// A prize as served by the catalog endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prize {
    pub id: Uuid,
    pub name: String,
    pub category: PrizeCategory,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub redemption_value: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Prize {
    /// Monetary value for money prizes, redemption value otherwise.
    pub fn effective_value(&self) -> f64 {
        let raw = match self.category {
            PrizeCategory::Money => self.amount.as_deref(),
            PrizeCategory::Product => self.redemption_value.as_deref(),
        };
        parse_value(raw)
    }

    pub fn rarity(&self) -> Rarity {
        Rarity::from_value(self.effective_value())
    }
}

/// Parses a decimal string coming off the wire. Missing, unparseable and
/// non-finite values all count as 0.
pub fn parse_value(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn from_value(value: f64) -> Self {
        if value >= LEGENDARY_MIN_VALUE {
            Self::Legendary
        } else if value >= EPIC_MIN_VALUE {
            Self::Epic
        } else if value >= RARE_MIN_VALUE {
            Self::Rare
        } else {
            Self::Common
        }
    }

    /// How many reel cells a prize of this tier occupies.
    pub fn repetitions(self) -> u32 {
        match self {
            Self::Common => COMMON_REPETITIONS,
            Self::Rare => RARE_REPETITIONS,
            Self::Epic => EPIC_REPETITIONS,
            Self::Legendary => LEGENDARY_REPETITIONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique within one reel: the prize plus which copy of it this is.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub prize_id: Uuid,
    pub copy: u32,
}

/// One slot on the reel. Built fresh for every spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReelCell {
    pub id: CellId,
    pub name: String,
    pub category: PrizeCategory,
    pub value: f64,
    pub rarity: Rarity,
    pub image_url: Option<String>,
    pub is_landing: bool,
    /// Set when the cell was not produced by expansion but spliced in to
    /// represent an authoritative prize the reel did not carry.
    pub synthesized: bool,
}

impl ReelCell {
    pub fn from_prize(prize: &Prize, copy: u32) -> Self {
        let value = prize.effective_value();
        Self {
            id: CellId {
                prize_id: prize.id,
                copy,
            },
            name: prize.name.clone(),
            category: prize.category,
            value,
            rarity: Rarity::from_value(value),
            image_url: prize.image_url.clone(),
            is_landing: false,
            synthesized: false,
        }
    }

    pub fn matches_prize(&self, prize: &Prize) -> bool {
        self.category == prize.category && self.value == prize.effective_value()
    }
}

/// Authoritative outcome of one play, decided by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameResult {
    pub is_winner: bool,
    #[serde(default)]
    pub amount_won: f64,
    #[serde(default)]
    pub prize: Option<Prize>,
    #[serde(default)]
    pub game_id: String,
}

/// Lifecycle of one game session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    Idle,
    Loading,
    Spinning,
    Completed,
}

impl GameState {
    /// Whether a new spin may be requested from this state.
    pub fn accepts_spin(self) -> bool {
        matches!(self, Self::Idle | Self::Completed)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Spinning => "spinning",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Handed to the view once the reveal delay has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSummary {
    pub is_winner: bool,
    pub amount_won: f64,
    pub prize_name: Option<String>,
    pub landing: ReelCell,
}

impl SpinSummary {
    pub fn display_amount(&self) -> String {
        format_amount(self.amount_won)
    }
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub game_id: String,
    pub prizes: Vec<Prize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayGameRequest {
    pub game_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayGameResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<GameResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(value: &str) -> Prize {
        Prize {
            id: Uuid::new_v4(),
            name: format!("{} coins", value),
            category: PrizeCategory::Money,
            amount: Some(value.to_string()),
            redemption_value: None,
            image_url: None,
            is_active: true,
        }
    }

    #[test]
    fn test_rarity_boundaries_take_higher_tier() {
        assert_eq!(Rarity::from_value(1000.0), Rarity::Legendary);
        assert_eq!(Rarity::from_value(999.99), Rarity::Epic);
        assert_eq!(Rarity::from_value(100.0), Rarity::Epic);
        assert_eq!(Rarity::from_value(99.5), Rarity::Rare);
        assert_eq!(Rarity::from_value(10.0), Rarity::Rare);
        assert_eq!(Rarity::from_value(9.99), Rarity::Common);
        assert_eq!(Rarity::from_value(0.0), Rarity::Common);
        assert_eq!(Rarity::from_value(250_000.0), Rarity::Legendary);
    }

    #[test]
    fn test_effective_value_uses_category_field() {
        let mut product = money("5");
        product.category = PrizeCategory::Product;
        product.redemption_value = Some("150".to_string());
        assert_eq!(product.effective_value(), 150.0);
        assert_eq!(product.rarity(), Rarity::Epic);

        assert_eq!(money("12.50").effective_value(), 12.5);
    }

    #[test]
    fn test_unparseable_values_are_zero() {
        let mut prize = money("lots");
        assert_eq!(prize.effective_value(), 0.0);
        prize.amount = None;
        assert_eq!(prize.effective_value(), 0.0);
        prize.amount = Some("NaN".to_string());
        assert_eq!(prize.effective_value(), 0.0);
    }

    #[test]
    fn test_prize_from_wire_json() {
        let json = r#"{
            "id": "7f0c6b2e-2a43-4d55-9d0e-0d7a3a5b9c11",
            "name": "Gift card",
            "category": "PRODUCT",
            "redemption_value": "25"
        }"#;
        let prize: Prize = serde_json::from_str(json).unwrap();
        assert!(prize.is_active);
        assert_eq!(prize.category, PrizeCategory::Product);
        assert_eq!(prize.rarity(), Rarity::Rare);
    }

    #[test]
    fn test_display_amount() {
        let landing = ReelCell::from_prize(&money("1500"), 0);
        let summary = SpinSummary {
            is_winner: true,
            amount_won: 1500.0,
            prize_name: None,
            landing,
        };
        assert_eq!(summary.display_amount(), "1500");
        assert_eq!(format_amount(2.5), "2.50");
    }
}
