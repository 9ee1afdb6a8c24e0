use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Session setup parameters, fixed before dealing.
///
/// `allow_stacking` and `force_uno_call` are table-rule toggles read at setup
/// and carried for collaborators; resolution itself does not branch on them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub human_players: u32,
    pub computer_players: u32,
    pub players_per_deck: u32,
    pub min_decks: u32,
    pub max_decks: u32,
    pub cards_per_player: u32,
    pub allow_stacking: bool,
    pub force_uno_call: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 1,
            computer_players: 1,
            players_per_deck: 4,
            min_decks: 1,
            max_decks: 3,
            cards_per_player: 7,
            allow_stacking: false,
            force_uno_call: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.human_players < 1 {
            return Err(EngineError::InvalidConfiguration(
                "at least one human player is required".into(),
            ));
        }
        if self.total_players() < 2 {
            return Err(EngineError::InvalidConfiguration(
                "at least two players are required".into(),
            ));
        }
        if self.players_per_deck < 1 {
            return Err(EngineError::InvalidConfiguration(
                "players per deck must be at least 1".into(),
            ));
        }
        if self.min_decks < 1 || self.max_decks < self.min_decks {
            return Err(EngineError::InvalidConfiguration(
                "deck count bounds must satisfy 1 <= min <= max".into(),
            ));
        }
        if self.cards_per_player < 1 {
            return Err(EngineError::InvalidConfiguration(
                "players must be dealt at least one card".into(),
            ));
        }
        Ok(())
    }

    pub fn total_players(&self) -> usize {
        (self.human_players + self.computer_players) as usize
    }

    /// Number of physical decks for this table: players divided by the
    /// players-per-deck ratio, rounded up, clamped to the configured bounds.
    pub fn deck_count(&self) -> usize {
        let players = self.human_players + self.computer_players;
        let needed = (players + self.players_per_deck - 1) / self.players_per_deck;
        needed.clamp(self.min_decks, self.max_decks) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_human_players_is_rejected() {
        let config = GameConfig {
            human_players: 0,
            computer_players: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            EngineError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn lone_player_is_rejected() {
        let config = GameConfig {
            human_players: 1,
            computer_players: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_deck_bounds_are_rejected() {
        let config = GameConfig {
            min_decks: 3,
            max_decks: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deck_count_rounds_up() {
        let config = GameConfig {
            human_players: 2,
            computer_players: 3,
            players_per_deck: 4,
            max_decks: 4,
            ..GameConfig::default()
        };
        // 5 players at 4 per deck.
        assert_eq!(config.deck_count(), 2);
    }

    #[test]
    fn deck_count_exact_division_does_not_round() {
        let config = GameConfig {
            human_players: 2,
            computer_players: 2,
            players_per_deck: 4,
            ..GameConfig::default()
        };
        assert_eq!(config.deck_count(), 1);
    }

    #[test]
    fn deck_count_is_clamped_to_bounds() {
        let config = GameConfig {
            human_players: 2,
            computer_players: 10,
            players_per_deck: 2,
            min_decks: 1,
            max_decks: 3,
            ..GameConfig::default()
        };
        assert_eq!(config.deck_count(), 3);
    }
}
