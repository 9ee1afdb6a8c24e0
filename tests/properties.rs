//! Property-based tests for the pure pieces (playability, shuffling,
//! burying) and for deal/draw conservation across arbitrary seeds.

use proptest::prelude::*;

use onu::{
    card::{can_play, Card, CardColor, CardId, CardValue},
    config::GameConfig,
    engine::RuleEngine,
    player::PlayerKind,
    rng::GameRng,
    stack::CardStack,
    turn::RoundPhase,
    wire::MoveMessage,
};

fn arb_color() -> impl Strategy<Value = CardColor> {
    prop_oneof![
        Just(CardColor::Red),
        Just(CardColor::Green),
        Just(CardColor::Blue),
        Just(CardColor::Yellow),
        Just(CardColor::Wild),
    ]
}

fn arb_value() -> impl Strategy<Value = CardValue> {
    prop_oneof![
        (0u8..10).prop_map(CardValue::Number),
        Just(CardValue::Skip),
        Just(CardValue::Reverse),
        Just(CardValue::DrawTwo),
        Just(CardValue::DrawFour),
        Just(CardValue::Wild),
    ]
}

fn arb_card(id: u32) -> impl Strategy<Value = Card> {
    (arb_color(), arb_value()).prop_map(move |(color, value)| Card::new(CardId(id), color, value))
}

fn seeded_table(players: u32, cards_per_player: u32, seed: u32) -> RuleEngine {
    let config = GameConfig {
        human_players: players,
        computer_players: 0,
        cards_per_player,
        ..GameConfig::default()
    };
    let mut engine = RuleEngine::new(config, seed).unwrap();
    for i in 0..players {
        engine
            .add_player(format!("Player {}", i + 1), PlayerKind::Local)
            .unwrap();
    }
    engine.start_round().unwrap();
    engine
}

fn visible_card_total(engine: &RuleEngine) -> usize {
    let held: usize = engine
        .player_ids()
        .into_iter()
        .map(|id| engine.player(id).unwrap().hand.cards_count())
        .sum();
    held + engine.draw_pile_len() + engine.discard_pile_len()
}

proptest! {
    /// Playability never depends on which of the two cards is on the pile.
    #[test]
    fn playability_is_commutative(a in arb_card(1), b in arb_card(2)) {
        prop_assert_eq!(can_play(&a, &b), can_play(&b, &a));
    }

    /// A shuffle rearranges cards without adding or losing any.
    #[test]
    fn shuffles_are_permutations(seed in any::<u32>(), len in 0usize..120) {
        let mut values: Vec<usize> = (0..len).collect();
        GameRng::new(seed).shuffle(&mut values);
        values.sort_unstable();
        prop_assert_eq!(values, (0..len).collect::<Vec<_>>());
    }

    /// Replaying a seed replays the exact same shuffle.
    #[test]
    fn equal_seeds_shuffle_equally(seed in any::<u32>(), len in 2usize..120) {
        let mut left: Vec<usize> = (0..len).collect();
        let mut right = left.clone();
        GameRng::new(seed).shuffle(&mut left);
        GameRng::new(seed).shuffle(&mut right);
        prop_assert_eq!(left, right);
    }

    /// Burying keeps every card in the pile, whatever depth was drawn.
    #[test]
    fn burying_preserves_the_pile(seed in any::<u32>(), len in 0usize..60, min in 0usize..12) {
        let cards: Vec<Card> = (0..len)
            .map(|i| Card::new(CardId(i as u32), CardColor::Red, CardValue::Number((i % 10) as u8)))
            .collect();
        let mut stack = CardStack::from_cards(cards, false);
        let mut rng = GameRng::new(seed);
        let buried = Card::new(CardId(9999), CardColor::Wild, CardValue::DrawFour);

        stack.bury_at_random_depth(buried, min, min + 10, &mut rng);

        prop_assert_eq!(stack.len(), len + 1);
        prop_assert!(stack.iter().any(|card| card.id() == CardId(9999)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Dealing hands out the configured cards and keeps the totals intact.
    #[test]
    fn dealing_conserves_cards(
        players in 2u32..7,
        cards_per_player in 1u32..9,
        seed in any::<u32>(),
    ) {
        let config = GameConfig {
            human_players: players,
            computer_players: 0,
            cards_per_player,
            ..GameConfig::default()
        };
        let deck_total = 60 * config.deck_count();
        let mut engine = RuleEngine::new(config, seed).unwrap();
        for i in 0..players {
            engine
                .add_player(format!("Player {}", i + 1), PlayerKind::Local)
                .unwrap();
        }
        engine.start_round().unwrap();

        for id in engine.player_ids() {
            prop_assert_eq!(
                engine.player(id).unwrap().hand.cards_count(),
                cards_per_player as usize
            );
        }
        prop_assert_eq!(visible_card_total(&engine), deck_total);
        prop_assert_eq!(engine.discard_pile_len(), 1);
    }

    /// The first play opens the round for any seed: a playable top card,
    /// a current player, and never a draw-four facing up.
    #[test]
    fn first_play_always_opens_the_round(players in 2u32..7, seed in any::<u32>()) {
        let mut engine = seeded_table(players, 7, seed);
        engine.process_first_play().unwrap();

        prop_assert_eq!(engine.phase(), RoundPhase::TurnInProgress);
        prop_assert!(engine.current_player().is_some());

        let top = engine.discard_top().unwrap();
        prop_assert_ne!(top.value(), CardValue::DrawFour);
        if top.color() == CardColor::Wild {
            prop_assert!(top.wild_color().is_some());
        }
    }

    /// Forced draws keep the closed card system closed for any seed.
    #[test]
    fn forced_draws_conserve_cards(seed in any::<u32>()) {
        let mut engine = seeded_table(4, 7, seed);
        engine.process_first_play().unwrap();
        let total = visible_card_total(&engine);

        for i in 0..5 {
            let current = engine.current_player().unwrap();
            let message = MoveMessage {
                acting_player_id: current,
                card_id: CardId(u32::MAX),
                color: CardColor::Special,
                value: CardValue::Number(0),
                wild_color: None,
                dedupe_token: format!("draw-{i}"),
            };
            let outcome = engine.submit_move(&message).unwrap();
            prop_assert!(outcome.is_applied());
            prop_assert_eq!(visible_card_total(&engine), total);
        }
    }
}
