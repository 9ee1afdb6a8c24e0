use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::{EngineError, Result};
use crate::rng::GameRng;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StackEntry {
    card: Card,
    face_up: bool,
}

/// A LIFO pile of cards. The pile owns its cards exclusively; every transfer
/// in or out goes through push/pop so a card is never in two places at once.
///
/// Entries are stored bottom-to-top: index 0 is the bottom of the pile, the
/// last index is the top. Face orientation is presentation state forwarded to
/// collaborators and is never consulted by rule logic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStack {
    entries: Vec<StackEntry>,
}

impl CardStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_cards<I>(cards: I, face_up: bool) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        Self {
            entries: cards
                .into_iter()
                .map(|card| StackEntry { card, face_up })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, card: Card, face_up: bool) {
        self.entries.push(StackEntry { card, face_up });
    }

    pub fn pop(&mut self) -> Result<Card> {
        self.entries
            .pop()
            .map(|entry| entry.card)
            .ok_or(EngineError::EmptyStack)
    }

    pub fn peek(&self) -> Result<&Card> {
        self.entries
            .last()
            .map(|entry| &entry.card)
            .ok_or(EngineError::EmptyStack)
    }

    pub fn top_face_up(&self) -> Option<bool> {
        self.entries.last().map(|entry| entry.face_up)
    }

    /// Cards from bottom to top; reversible for top-down scans.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Card> + '_ {
        self.entries.iter().map(|entry| &entry.card)
    }

    /// Removes and returns the topmost card satisfying `predicate`, leaving
    /// the relative order of every other card unchanged. The search runs from
    /// the top of the pile downward and stops at the first match.
    pub fn find_and_extract<P>(&mut self, predicate: P) -> Result<Card>
    where
        P: Fn(&Card) -> bool,
    {
        let position = self
            .entries
            .iter()
            .rposition(|entry| predicate(&entry.card))
            .ok_or(EngineError::NotFound)?;
        Ok(self.entries.remove(position).card)
    }

    /// Fisher-Yates over the full contents using the session generator, so
    /// every replica shuffling the same pile state draws the same swaps.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.entries);
    }

    /// Moves every card out of `other` onto this pile, reversing their order
    /// and turning them face-down. `other` is left empty. Callers that want
    /// to keep `other`'s top card (the visible discard) pop it off first and
    /// push it back afterwards.
    pub fn recycle_from(&mut self, other: &mut CardStack) {
        self.entries
            .extend(other.entries.drain(..).rev().map(|mut entry| {
                entry.face_up = false;
                entry
            }));
    }

    /// Buries `card` at a random depth: lifts `k` cards off the top with
    /// `k` drawn uniformly from `[min_depth, max_depth)`, slides `card` in
    /// face-down, and restores the lifted cards in their original order. The
    /// draw happens before clamping to the pile size so the generator is
    /// consumed identically on every replica regardless of pile depth.
    /// `min_depth` must sit strictly below `max_depth`; the window is
    /// half-open and an empty one has no depth to draw.
    pub fn bury_at_random_depth(
        &mut self,
        card: Card,
        min_depth: usize,
        max_depth: usize,
        rng: &mut GameRng,
    ) {
        debug_assert!(min_depth < max_depth, "empty bury depth window");
        let depth = rng.gen_range_usize(min_depth..max_depth);
        let depth = depth.min(self.entries.len());

        let lifted = self.entries.split_off(self.entries.len() - depth);
        self.entries.push(StackEntry {
            card,
            face_up: false,
        });
        self.entries.extend(lifted);
    }
}
