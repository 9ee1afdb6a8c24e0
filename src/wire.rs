//! Wire-level move messages and collaborator-facing events.
//!
//! Messages arrive from a transport that serializes and order-delivers them
//! identically to every peer; events flow the other way, drained by the
//! presentation layer. Both sides use camelCase JSON field names.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardColor, CardId, CardValue};
use crate::player::PlayerId;

/// One submitted move. Card attributes travel alongside the id because a
/// peer may reference a card the receiver has already moved; the engine
/// resolves by id and falls back to a forced draw when the id is unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMessage {
    pub acting_player_id: PlayerId,
    pub card_id: CardId,
    pub color: CardColor,
    pub value: CardValue,
    pub wild_color: Option<CardColor>,
    pub dedupe_token: String,
}

impl MoveMessage {
    /// Builds a message for playing `card` from hand.
    pub fn play(player: PlayerId, card: &Card, dedupe_token: impl Into<String>) -> Self {
        Self {
            acting_player_id: player,
            card_id: card.id(),
            color: card.color(),
            value: card.value(),
            wild_color: None,
            dedupe_token: dedupe_token.into(),
        }
    }

    pub fn with_wild_color(mut self, color: CardColor) -> Self {
        self.wild_color = Some(color);
        self
    }
}

/// Presentation events produced during resolution. Collaborators drain them
/// after each call; nothing in the engine waits for acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    CardMovedToDiscard { card: Card },
    PlayerDrew { player: PlayerId, count: usize },
    TurnAdvanced { player: PlayerId },
    RoundWon { player: PlayerId, score: u32 },
}
