use core::fmt;
use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::error::{EngineError, Result};
use crate::turn::GameAction;

/// Identity of a single physical card, unique within a session. Remote moves
/// reference cards by this id, never by attribute equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `Wild` marks the two wildcard kinds; `Special` is kept for data-model
/// compatibility with collaborators but never appears on a deck card and
/// never matches anything in legality checks.
#[derive(
    Clone,
    Copy,
    Debug,
    StrumDisplay,
    EnumString,
    EnumCountMacro,
    EnumIter,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum CardColor {
    Red,
    Green,
    Blue,
    Yellow,
    Wild,
    Special,
}

impl CardColor {
    /// The four printed colors; `Wild` and `Special` are excluded.
    pub fn is_standard(self) -> bool {
        !matches!(self, CardColor::Wild | CardColor::Special)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardValue {
    Number(u8),
    DrawTwo,
    Skip,
    Reverse,
    DrawFour,
    Wild,
    Custom,
}

impl CardValue {
    /// Fixed action lookup. Numbers and any value without a row of its own
    /// (`Custom`) resolve to `NextPlayer`.
    pub fn action(self) -> GameAction {
        match self {
            CardValue::Skip => GameAction::Skip,
            CardValue::Reverse => GameAction::Reverse,
            CardValue::DrawTwo => GameAction::DrawTwo,
            CardValue::DrawFour => GameAction::DrawFour,
            CardValue::Wild => GameAction::Wild,
            CardValue::Number(_) | CardValue::Custom => GameAction::NextPlayer,
        }
    }

    /// Round-scoring weight of a card left in a losing hand.
    pub fn score(self) -> u32 {
        match self {
            CardValue::Number(n) => u32::from(n),
            CardValue::Skip | CardValue::Reverse | CardValue::DrawTwo | CardValue::Custom => 20,
            CardValue::Wild | CardValue::DrawFour => 40,
        }
    }
}

impl Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardValue::Number(n) => write!(f, "{n}"),
            CardValue::DrawTwo => write!(f, "Draw Two"),
            CardValue::Skip => write!(f, "Skip"),
            CardValue::Reverse => write!(f, "Reverse"),
            CardValue::DrawFour => write!(f, "Draw Four"),
            CardValue::Wild => write!(f, "Wild"),
            CardValue::Custom => write!(f, "Custom"),
        }
    }
}

/// A single physical card. Color and value are fixed at construction; the
/// chosen color of a wildcard is the only mutable attribute and is only ever
/// meaningful while `color == CardColor::Wild`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    color: CardColor,
    value: CardValue,
    wild_color: Option<CardColor>,
    custom_draw_amount: Option<u8>,
}

impl Card {
    pub fn new(id: CardId, color: CardColor, value: CardValue) -> Self {
        Self {
            id,
            color,
            value,
            wild_color: None,
            custom_draw_amount: None,
        }
    }

    /// House-rule card carrying its own draw amount; the amount must be
    /// positive or the card is rejected at construction.
    pub fn custom(id: CardId, color: CardColor, draw_amount: u8) -> Result<Self> {
        if draw_amount == 0 {
            return Err(EngineError::InvalidConfiguration(
                "custom card draw amount must be greater than zero".into(),
            ));
        }
        Ok(Self {
            id,
            color,
            value: CardValue::Custom,
            wild_color: None,
            custom_draw_amount: Some(draw_amount),
        })
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn color(&self) -> CardColor {
        self.color
    }

    pub fn value(&self) -> CardValue {
        self.value
    }

    pub fn wild_color(&self) -> Option<CardColor> {
        self.wild_color
    }

    pub fn custom_draw_amount(&self) -> Option<u8> {
        self.custom_draw_amount
    }

    /// Records the chosen color of a wildcard. Ignored for non-wild cards and
    /// for non-standard choices, keeping the wild-color invariant intact.
    pub fn set_wild_color(&mut self, chosen: CardColor) {
        if self.color == CardColor::Wild && chosen.is_standard() {
            self.wild_color = Some(chosen);
        }
    }

    /// Canonical ordering for hand display: color first, then value. Never
    /// consulted for legality.
    pub fn display_cmp(&self, other: &Card) -> Ordering {
        self.color
            .cmp(&other.color)
            .then(self.value.cmp(&other.value))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.color, self.value) {
            (CardColor::Wild, CardValue::Wild) => write!(f, "Wild"),
            (CardColor::Wild, CardValue::DrawFour) => write!(f, "Wild Draw Four"),
            (color, value) => write!(f, "{color} {value}"),
        }
    }
}

/// Playability predicate over a candidate and the card it would land on.
/// Commutative by construction: the discard top is conventionally the second
/// argument, but the result never depends on argument order.
pub fn can_play(a: &Card, b: &Card) -> bool {
    a.color == b.color
        || a.value == b.value
        || a.color == CardColor::Wild
        || b.color == CardColor::Wild
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32, color: CardColor, value: CardValue) -> Card {
        Card::new(CardId(id), color, value)
    }

    #[test]
    fn return_correct_string_for_number_card() {
        let red_3 = card(0, CardColor::Red, CardValue::Number(3));
        assert_eq!(red_3.to_string(), "Red 3");

        let yellow_5 = card(1, CardColor::Yellow, CardValue::Number(5));
        assert_eq!(yellow_5.to_string(), "Yellow 5");
    }

    #[test]
    fn return_correct_string_for_effect_cards() {
        let red_skip = card(0, CardColor::Red, CardValue::Skip);
        assert_eq!(red_skip.to_string(), "Red Skip");

        let blue_reverse = card(1, CardColor::Blue, CardValue::Reverse);
        assert_eq!(blue_reverse.to_string(), "Blue Reverse");

        let green_draw = card(2, CardColor::Green, CardValue::DrawTwo);
        assert_eq!(green_draw.to_string(), "Green Draw Two");
    }

    #[test]
    fn return_correct_string_for_wildcards() {
        let wild = card(0, CardColor::Wild, CardValue::Wild);
        assert_eq!(wild.to_string(), "Wild");

        let draw_four = card(1, CardColor::Wild, CardValue::DrawFour);
        assert_eq!(draw_four.to_string(), "Wild Draw Four");
    }

    #[test]
    fn matching_color_or_value_is_playable() {
        let red_3 = card(0, CardColor::Red, CardValue::Number(3));
        let red_7 = card(1, CardColor::Red, CardValue::Number(7));
        let blue_3 = card(2, CardColor::Blue, CardValue::Number(3));
        let blue_8 = card(3, CardColor::Blue, CardValue::Number(8));

        assert!(can_play(&red_3, &red_7));
        assert!(can_play(&red_3, &blue_3));
        assert!(!can_play(&red_7, &blue_8));
    }

    #[test]
    fn wild_is_playable_on_either_side() {
        let wild = card(0, CardColor::Wild, CardValue::Wild);
        let draw_four = card(1, CardColor::Wild, CardValue::DrawFour);
        let green_9 = card(2, CardColor::Green, CardValue::Number(9));

        assert!(can_play(&wild, &green_9));
        assert!(can_play(&green_9, &wild));
        assert!(can_play(&draw_four, &green_9));
        assert!(can_play(&green_9, &draw_four));
        assert!(can_play(&wild, &draw_four));
    }

    #[test]
    fn playability_is_commutative() {
        let cards = [
            card(0, CardColor::Red, CardValue::Number(0)),
            card(1, CardColor::Red, CardValue::Skip),
            card(2, CardColor::Blue, CardValue::Number(0)),
            card(3, CardColor::Yellow, CardValue::Reverse),
            card(4, CardColor::Wild, CardValue::Wild),
            card(5, CardColor::Wild, CardValue::DrawFour),
        ];
        for a in &cards {
            for b in &cards {
                assert_eq!(can_play(a, b), can_play(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn action_lookup_matches_table() {
        assert_eq!(CardValue::Number(7).action(), GameAction::NextPlayer);
        assert_eq!(CardValue::Skip.action(), GameAction::Skip);
        assert_eq!(CardValue::Reverse.action(), GameAction::Reverse);
        assert_eq!(CardValue::DrawTwo.action(), GameAction::DrawTwo);
        assert_eq!(CardValue::DrawFour.action(), GameAction::DrawFour);
        assert_eq!(CardValue::Wild.action(), GameAction::Wild);
        assert_eq!(CardValue::Custom.action(), GameAction::NextPlayer);
    }

    #[test]
    fn score_weights() {
        assert_eq!(CardValue::Number(0).score(), 0);
        assert_eq!(CardValue::Number(9).score(), 9);
        assert_eq!(CardValue::Skip.score(), 20);
        assert_eq!(CardValue::Reverse.score(), 20);
        assert_eq!(CardValue::DrawTwo.score(), 20);
        assert_eq!(CardValue::Wild.score(), 40);
        assert_eq!(CardValue::DrawFour.score(), 40);
    }

    #[test]
    fn display_ordering_is_color_then_value() {
        let red_9 = card(0, CardColor::Red, CardValue::Number(9));
        let green_0 = card(1, CardColor::Green, CardValue::Number(0));
        let green_skip = card(2, CardColor::Green, CardValue::Skip);

        assert_eq!(red_9.display_cmp(&green_0), Ordering::Less);
        assert_eq!(green_0.display_cmp(&green_skip), Ordering::Less);
        assert_eq!(green_skip.display_cmp(&red_9), Ordering::Greater);
    }

    #[test]
    fn custom_card_requires_positive_draw_amount() {
        let err = Card::custom(CardId(0), CardColor::Red, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));

        let ok = Card::custom(CardId(1), CardColor::Red, 3).unwrap();
        assert_eq!(ok.custom_draw_amount(), Some(3));
        assert_eq!(ok.value(), CardValue::Custom);
    }

    #[test]
    fn wild_color_only_sticks_on_wildcards() {
        let mut wild = card(0, CardColor::Wild, CardValue::Wild);
        wild.set_wild_color(CardColor::Blue);
        assert_eq!(wild.wild_color(), Some(CardColor::Blue));

        // Choosing a non-printed color is ignored.
        wild.set_wild_color(CardColor::Special);
        assert_eq!(wild.wild_color(), Some(CardColor::Blue));

        let mut red_3 = card(1, CardColor::Red, CardValue::Number(3));
        red_3.set_wild_color(CardColor::Green);
        assert_eq!(red_3.wild_color(), None);
    }
}
