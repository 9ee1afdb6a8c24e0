use strum::EnumCount;

use crate::card::CardColor;

/// One card of each digit per color; the single zero is part of this list.
pub(crate) const NUMBER_CARDS_PER_COLOR: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
pub(crate) const SKIP_CARDS_PER_COLOR: u8 = 1;
pub(crate) const REVERSE_CARDS_PER_COLOR: u8 = 1;
pub(crate) const DRAW_TWO_CARDS_PER_COLOR: u8 = 1;

/// `Wild` and `Special` are never printed on deck cards.
pub(crate) const STANDARD_COLOR_COUNT: u8 = (CardColor::COUNT - 2) as u8;

/// The printed colors in canonical order, used when the engine has to pick
/// a color itself (wild opener default).
pub(crate) const STANDARD_COLORS: [CardColor; STANDARD_COLOR_COUNT as usize] = [
    CardColor::Red,
    CardColor::Green,
    CardColor::Blue,
    CardColor::Yellow,
];

pub(crate) const CARDS_PER_COLOR: u8 = NUMBER_CARDS_PER_COLOR.len() as u8
    + SKIP_CARDS_PER_COLOR
    + REVERSE_CARDS_PER_COLOR
    + DRAW_TWO_CARDS_PER_COLOR;

pub(crate) const WILD_CARDS_PER_DECK: u8 = 4;
pub(crate) const DRAW_FOUR_CARDS_PER_DECK: u8 = 4;

pub(crate) const CARDS_PER_DECK: u8 =
    CARDS_PER_COLOR * STANDARD_COLOR_COUNT + WILD_CARDS_PER_DECK + DRAW_FOUR_CARDS_PER_DECK;

/// Penalty draw for a lost challenge, and for the challenger of a shielded
/// player.
pub(crate) const CHALLENGE_PENALTY_CARDS: usize = 2;

/// A pre-emptive Uno call is allowed from this hand size down, provided a
/// playable card is held.
pub(crate) const PREEMPTIVE_UNO_HAND_SIZE: usize = 2;

/// Depth window for burying an illegal opening card back into the draw pile;
/// deep enough that it cannot resurface within the next few draws.
pub(crate) const OPENER_BURY_MIN_DEPTH: usize = 12;
pub(crate) const OPENER_BURY_MAX_DEPTH: usize = 36;
