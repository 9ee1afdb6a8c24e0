use serde::{Deserialize, Serialize};

use crate::card::{can_play, Card, CardId};
use crate::constants::PREEMPTIVE_UNO_HAND_SIZE;
use crate::error::{EngineError, Result};

/// A player's cards plus the Uno call state that rides along with them.
///
/// The call flags form a small state machine: `called_uno` can only be set
/// through `try_call_uno`, `has_been_challenged` only through
/// `try_challenge`, and any growth back to two or more cards clears both.
/// Shrinking the hand never touches the flags, so the one-card window a
/// challenge targets stays open until the hand grows again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    cards: Vec<Card>,
    called_uno: bool,
    has_been_challenged: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            called_uno: false,
            has_been_challenged: false,
        }
    }

    pub fn cards_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id() == id)
    }

    pub fn called_uno(&self) -> bool {
        self.called_uno
    }

    pub fn has_been_challenged(&self) -> bool {
        self.has_been_challenged
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        if self.cards.len() >= 2 {
            self.called_uno = false;
            self.has_been_challenged = false;
        }
    }

    /// Removes the card with the given id. Leaves the call flags alone:
    /// playing down to one card is exactly when a standing Uno call matters.
    pub fn remove_card(&mut self, id: CardId) -> Result<Card> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id() == id)
            .ok_or(EngineError::NotFound)?;
        Ok(self.cards.remove(index))
    }

    /// Empties the hand, e.g. when a player departs and their cards return
    /// to the draw pile.
    pub fn drain_cards(&mut self) -> Vec<Card> {
        self.called_uno = false;
        self.has_been_challenged = false;
        std::mem::take(&mut self.cards)
    }

    pub fn has_playable_card(&self, discard_top: &Card) -> bool {
        self.cards.iter().any(|c| can_play(c, discard_top))
    }

    /// Canonical presentation order: color first, then value. Stable, so
    /// duplicate cards keep their relative order on every replica.
    pub fn sort_for_display(&mut self) {
        self.cards.sort_by(|a, b| a.display_cmp(b));
    }

    /// Sum of the scoring weights of every card still held.
    pub fn score(&self) -> u32 {
        self.cards.iter().map(|c| c.value().score()).sum()
    }

    /// Attempts to call Uno. Succeeds with one card left, or pre-emptively
    /// with two cards when at least one of them could be played on
    /// `discard_top`. Returns the resulting call state.
    pub fn try_call_uno(&mut self, discard_top: &Card) -> bool {
        let eligible = self.cards.len() == 1
            || (self.cards.len() == PREEMPTIVE_UNO_HAND_SIZE
                && self.has_playable_card(discard_top));
        if eligible {
            self.called_uno = true;
        }
        self.called_uno
    }

    /// Registers a challenge against this hand. Returns `Some(called_uno)`
    /// when the challenge window is open (exactly one card, not already
    /// challenged) and `None` when the challenge is a no-op. The caller
    /// applies the penalty draw to whichever side lost.
    pub fn try_challenge(&mut self) -> Option<bool> {
        if self.cards.len() != 1 || self.has_been_challenged {
            return None;
        }
        self.has_been_challenged = true;
        Some(self.called_uno)
    }
}
