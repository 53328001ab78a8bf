use std::fmt;

use crate::constants::{CATALOG_UNAVAILABLE_MESSAGE, NOT_AUTHENTICATED_MESSAGE};
use crate::shared_roulette_game::GameState;

#[derive(Debug, Clone, PartialEq)]
pub enum RouletteError {
    CatalogUnavailable,
    NotAuthenticated,
    PlayRequestFailed(String),
    NoLandingCellFound,
    BalanceRefreshFailed(String),
    InvalidTransition {
        from: GameState,
        action: &'static str,
    },
    InvalidSettings(String),
}

impl RouletteError {
    /// Balance refresh failures are logged and swallowed; everything else
    /// ends the spin attempt.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::BalanceRefreshFailed(_))
    }

    /// Message suitable for showing to the player.
    pub fn user_message(&self) -> String {
        match self {
            Self::CatalogUnavailable => CATALOG_UNAVAILABLE_MESSAGE.to_string(),
            Self::NotAuthenticated => NOT_AUTHENTICATED_MESSAGE.to_string(),
            Self::PlayRequestFailed(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for RouletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogUnavailable => write!(f, "Prize catalog unavailable"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::PlayRequestFailed(message) => write!(f, "Play request failed: {}", message),
            Self::NoLandingCellFound => write!(f, "No landing cell found on the reel"),
            Self::BalanceRefreshFailed(message) => write!(f, "Balance refresh failed: {}", message),
            Self::InvalidTransition { from, action } => {
                write!(f, "Cannot {} while {}", action, from)
            }
            Self::InvalidSettings(message) => write!(f, "Invalid spin settings: {}", message),
        }
    }
}

impl std::error::Error for RouletteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_balance_refresh_is_non_fatal() {
        assert!(!RouletteError::BalanceRefreshFailed("timeout".into()).is_fatal());
        assert!(RouletteError::PlayRequestFailed("nope".into()).is_fatal());
        assert!(RouletteError::NoLandingCellFound.is_fatal());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = RouletteError::InvalidTransition {
            from: GameState::Spinning,
            action: "spin",
        };
        assert_eq!(err.to_string(), "Cannot spin while spinning");
    }

    #[test]
    fn test_play_failure_shows_server_message() {
        let err = RouletteError::PlayRequestFailed("Insufficient balance".into());
        assert_eq!(err.user_message(), "Insufficient balance");
    }
}
