use strum::IntoEnumIterator;

use crate::card::{Card, CardColor, CardId, CardValue};
use crate::constants::*;

/// Builds `deck_count` physical decks as one flat run of cards.
///
/// The construction order is fixed and ids are assigned sequentially from 0,
/// so every replica building from the same configuration produces the exact
/// same cards before the shuffle ever touches them.
pub(crate) fn build(deck_count: usize) -> Vec<Card> {
    let mut cards = Vec::with_capacity(deck_count * CARDS_PER_DECK as usize);
    let mut next_id = 0u32;
    let mut card = |color, value| {
        let id = CardId(next_id);
        next_id += 1;
        Card::new(id, color, value)
    };

    for _ in 0..deck_count {
        for color in CardColor::iter().filter(|c| c.is_standard()) {
            for _ in 0..SKIP_CARDS_PER_COLOR {
                cards.push(card(color, CardValue::Skip));
            }
            for _ in 0..REVERSE_CARDS_PER_COLOR {
                cards.push(card(color, CardValue::Reverse));
            }
            for _ in 0..DRAW_TWO_CARDS_PER_COLOR {
                cards.push(card(color, CardValue::DrawTwo));
            }
            for &number in NUMBER_CARDS_PER_COLOR {
                cards.push(card(color, CardValue::Number(number)));
            }
        }

        for _ in 0..WILD_CARDS_PER_DECK {
            cards.push(card(CardColor::Wild, CardValue::Wild));
        }
        for _ in 0..DRAW_FOUR_CARDS_PER_DECK {
            cards.push(card(CardColor::Wild, CardValue::DrawFour));
        }
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn correct_card_count_single_deck() {
        assert_eq!(build(1).len(), CARDS_PER_DECK as usize);
    }

    #[test]
    fn correct_card_count_two_decks() {
        assert_eq!(build(2).len(), 2 * CARDS_PER_DECK as usize);
    }

    #[test]
    fn ids_are_sequential_and_unique() {
        let cards = build(2);
        let ids: BTreeSet<u32> = cards.iter().map(|c| c.id().0).collect();
        assert_eq!(ids.len(), cards.len());
        assert_eq!(ids.iter().next_back(), Some(&(cards.len() as u32 - 1)));
    }

    #[test]
    fn single_deck_composition() {
        let cards = build(1);

        let count = |f: &dyn Fn(&Card) -> bool| cards.iter().filter(|c| f(c)).count();

        // One zero per color, 4 wildcards of each kind.
        assert_eq!(count(&|c| c.value() == CardValue::Number(0)), 4);
        assert_eq!(count(&|c| c.value() == CardValue::Wild), 4);
        assert_eq!(count(&|c| c.value() == CardValue::DrawFour), 4);

        for color in CardColor::iter().filter(|c| c.is_standard()) {
            assert_eq!(count(&|c| c.color() == color), CARDS_PER_COLOR as usize);
            assert_eq!(
                count(&|c| c.color() == color && c.value() == CardValue::Skip),
                SKIP_CARDS_PER_COLOR as usize
            );
        }
    }

    #[test]
    fn construction_order_is_stable() {
        assert_eq!(build(1), build(1));
    }
}
