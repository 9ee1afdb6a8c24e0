//! The rule engine: a replicated state machine over two piles, a rotation
//! and the seated players' hands.
//!
//! Every replica holds its own engine instance, seeds it with the shared
//! session seed and feeds it the same ordered move messages; all randomness
//! flows through the one seeded generator in a fixed call order, so replicas
//! stay byte-identical without ever exchanging state. Moves that cannot be
//! honored (out of turn, duplicate, stale card references) resolve as no-ops
//! or degraded draws rather than errors, because a rejection must look the
//! same on every replica that sees the same message.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error, info, warn};

use crate::card::{can_play, Card, CardColor, CardValue};
use crate::config::GameConfig;
use crate::constants::{
    CHALLENGE_PENALTY_CARDS, OPENER_BURY_MAX_DEPTH, OPENER_BURY_MIN_DEPTH, STANDARD_COLORS,
};
use crate::deck;
use crate::error::{EngineError, Result};
use crate::player::{Player, PlayerId, PlayerKind};
use crate::rng::GameRng;
use crate::rotation::{RotationDirection, TurnRotation};
use crate::stack::CardStack;
use crate::turn::{ChallengeOutcome, GameAction, MoveOutcome, RejectReason, RoundPhase};
use crate::wire::{EngineEvent, MoveMessage};

#[derive(Debug)]
pub struct RuleEngine {
    config: GameConfig,
    rng: GameRng,
    players: BTreeMap<PlayerId, Player>,
    rotation: TurnRotation<PlayerId>,
    draw_pile: CardStack,
    discard_pile: CardStack,
    phase: RoundPhase,
    winner: Option<PlayerId>,
    deck_size: usize,
    next_player_id: u32,
    applied_tokens: BTreeSet<String>,
    events: Vec<EngineEvent>,
}

impl RuleEngine {
    pub fn new(config: GameConfig, seed: u32) -> Result<Self> {
        config.validate()?;
        info!(
            "engine ready: seed {seed}, table of {} ({} human, {} computer), \
             stacking {}, forced uno {}",
            config.total_players(),
            config.human_players,
            config.computer_players,
            config.allow_stacking,
            config.force_uno_call
        );
        Ok(Self {
            rng: GameRng::new(seed),
            config,
            players: BTreeMap::new(),
            rotation: TurnRotation::new(),
            draw_pile: CardStack::new(),
            discard_pile: CardStack::new(),
            phase: RoundPhase::WaitingForPlayers,
            winner: None,
            deck_size: 0,
            next_player_id: 0,
            applied_tokens: BTreeSet::new(),
            events: Vec::new(),
        })
    }

    /// Seats a player. Seat ids are handed out in joining order; the first
    /// seat is the dealer.
    pub fn add_player(&mut self, name: impl Into<String>, kind: PlayerKind) -> Result<PlayerId> {
        if self.phase != RoundPhase::WaitingForPlayers {
            return Err(EngineError::WrongPhase(self.phase));
        }
        if self.players.len() >= self.config.total_players() {
            return Err(EngineError::InvalidConfiguration(
                "the table is already full".into(),
            ));
        }
        let name = name.into();
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        debug!("player {id} ({kind}) seated as {name}");
        self.players.insert(id, Player::new(id, name, kind));
        self.rotation.add(id);
        Ok(id)
    }

    /// Verifies the seated players against the configured table, then deals.
    pub fn start_round(&mut self) -> Result<()> {
        if self.phase != RoundPhase::WaitingForPlayers {
            return Err(EngineError::WrongPhase(self.phase));
        }
        let humans = self.players.values().filter(|p| p.kind.is_human()).count() as u32;
        let computers = self.players.len() as u32 - humans;
        if humans != self.config.human_players || computers != self.config.computer_players {
            return Err(EngineError::InvalidConfiguration(format!(
                "seated players ({humans} human, {computers} computer) do not match \
                 the configured table ({} human, {} computer)",
                self.config.human_players, self.config.computer_players
            )));
        }
        self.deal_round()
    }

    /// Resolves the opening discard. Action openers take effect exactly as
    /// if the dealer had played them; a DrawFour cannot open and is buried
    /// back into the draw pile until a legal opener surfaces.
    pub fn process_first_play(&mut self) -> Result<GameAction> {
        if self.phase != RoundPhase::AwaitingFirstPlay {
            return Err(EngineError::WrongPhase(self.phase));
        }

        let mut attempts = self.draw_pile.len();
        while self.discard_pile.peek()?.value() == CardValue::DrawFour {
            if attempts == 0 {
                warn!("no legal opening card reachable; keeping the current one");
                break;
            }
            attempts -= 1;
            let buried = self.discard_pile.pop()?;
            info!("opening card {buried} cannot start a round; burying it");
            self.draw_pile.bury_at_random_depth(
                buried,
                OPENER_BURY_MIN_DEPTH,
                OPENER_BURY_MAX_DEPTH,
                &mut self.rng,
            );
            let replacement = self.draw_pile.pop()?;
            self.events.push(EngineEvent::CardMovedToDiscard {
                card: replacement.clone(),
            });
            self.discard_pile.push(replacement, true);
        }

        // A wild opener carries no color; every replica picks the same
        // default from the shared generator.
        if self.discard_pile.peek()?.color() == CardColor::Wild {
            let color = STANDARD_COLORS[self.rng.gen_range_usize(0..STANDARD_COLORS.len())];
            let mut card = self.discard_pile.pop()?;
            card.set_wild_color(color);
            info!("wild opener defaults to {color}");
            self.discard_pile.push(card, true);
        }

        let action = self.discard_pile.peek()?.value().action();
        self.phase = RoundPhase::TurnInProgress;
        self.apply_action_effect(action)?;
        self.advance_after(action);
        let first = *self
            .rotation
            .current()
            .expect("an active round always has a current player");
        info!("first play resolved as {action}; player {first} begins");
        self.assert_conservation();
        Ok(action)
    }

    /// Applies one submitted move. Rejections are reported, logged and leave
    /// the engine untouched; only applied moves consume their dedupe token,
    /// so a move that was rejected once may be retried and still apply
    /// exactly once.
    pub fn submit_move(&mut self, message: &MoveMessage) -> Result<MoveOutcome> {
        if self.phase != RoundPhase::TurnInProgress {
            debug!(
                "move {} rejected: round phase is {}",
                message.dedupe_token, self.phase
            );
            return Ok(MoveOutcome::Rejected(RejectReason::WrongPhase));
        }
        if self.applied_tokens.contains(&message.dedupe_token) {
            debug!("move {} rejected: already applied", message.dedupe_token);
            return Ok(MoveOutcome::Rejected(RejectReason::Duplicate));
        }
        let acting = message.acting_player_id;
        if !self.players.contains_key(&acting) {
            warn!(
                "move {} rejected: player {acting} is not seated",
                message.dedupe_token
            );
            return Ok(MoveOutcome::Rejected(RejectReason::UnknownPlayer));
        }
        let current = *self
            .rotation
            .current()
            .expect("an active round always has a current player");
        if acting != current {
            debug!(
                "move {} rejected: player {acting} acted while player {current} has the turn",
                message.dedupe_token
            );
            return Ok(MoveOutcome::Rejected(RejectReason::OutOfTurn));
        }

        let action = self.perform_move(message)?;
        self.apply_action_effect(action)?;
        let winner = self.check_round_win(acting);
        if winner.is_none() {
            self.advance_after(action);
        }
        self.applied_tokens.insert(message.dedupe_token.clone());
        self.assert_conservation();
        Ok(MoveOutcome::Applied { action, winner })
    }

    /// Records an Uno call for `player_id` if their hand qualifies. No
    /// penalty either way; the call only matters when a challenge lands.
    pub fn call_uno(&mut self, player_id: PlayerId) -> Result<bool> {
        if self.phase != RoundPhase::TurnInProgress {
            return Err(EngineError::WrongPhase(self.phase));
        }
        let top = self.discard_pile.peek()?.clone();
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(EngineError::NotFound)?;
        let called = player.hand.try_call_uno(&top);
        debug!("player {player_id} called uno: {called}");
        Ok(called)
    }

    /// Resolves an Uno challenge by `challenger_id`. The target is the first
    /// player from the cursor onward, travelling in the turn direction, with
    /// an open one-card window; the challenger is never their own target.
    /// Returns `None` when no window is open (including a repeated challenge
    /// against the same window).
    pub fn challenge(&mut self, challenger_id: PlayerId) -> Result<Option<ChallengeOutcome>> {
        if self.phase != RoundPhase::TurnInProgress {
            return Err(EngineError::WrongPhase(self.phase));
        }
        if !self.players.contains_key(&challenger_id) {
            return Err(EngineError::NotFound);
        }

        let target = self.rotation.iter_from_current().copied().find(|id| {
            *id != challenger_id
                && self
                    .players
                    .get(id)
                    .map(|p| p.hand.cards_count() == 1 && !p.hand.has_been_challenged())
                    .unwrap_or(false)
        });
        let Some(target) = target else {
            debug!("challenge by player {challenger_id} found no open window");
            return Ok(None);
        };

        let target_had_called = self
            .players
            .get_mut(&target)
            .expect("the target was found in the rotation")
            .hand
            .try_challenge()
            .expect("the window was verified during the target scan");

        let penalized = if target_had_called {
            challenger_id
        } else {
            target
        };
        self.draw_cards_to_player(penalized, CHALLENGE_PENALTY_CARDS)?;
        info!(
            "player {challenger_id} challenged player {target} (called: {target_had_called}); \
             player {penalized} draws {CHALLENGE_PENALTY_CARDS}"
        );
        self.assert_conservation();
        Ok(Some(ChallengeOutcome {
            target,
            target_had_called,
            penalized,
        }))
    }

    /// Removes a departing player mid-session. Their cards return to the
    /// draw pile at randomized depths; if only one player remains in an
    /// active round, that player wins immediately.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<()> {
        if !self.players.contains_key(&player_id) {
            return Err(EngineError::NotFound);
        }
        let had_turn = self.rotation.current() == Some(&player_id);
        self.rotation.remove(&player_id)?;
        let mut player = self
            .players
            .remove(&player_id)
            .expect("presence was checked above");

        let cards = player.hand.drain_cards();
        let returned = cards.len();
        for card in cards {
            let bound = self.draw_pile.len() + 1;
            self.draw_pile
                .bury_at_random_depth(card, 0, bound, &mut self.rng);
        }
        info!(
            "player {player_id} ({}) departed; {returned} cards returned to the draw pile",
            player.name()
        );

        match self.rotation.len() {
            0 => self.phase = RoundPhase::Terminated,
            1 => {
                if matches!(
                    self.phase,
                    RoundPhase::AwaitingFirstPlay | RoundPhase::TurnInProgress
                ) {
                    let last = *self
                        .rotation
                        .current()
                        .expect("one player remains in the rotation");
                    self.finish_round(last);
                }
            }
            _ => {
                if had_turn && self.phase == RoundPhase::TurnInProgress {
                    let next = *self
                        .rotation
                        .current()
                        .expect("players remain in the rotation");
                    self.events.push(EngineEvent::TurnAdvanced { player: next });
                    debug!("turn passed to player {next} after the departure");
                }
            }
        }
        self.assert_conservation();
        Ok(())
    }

    /// Resets both piles and all hands and re-deals. Players and their
    /// accumulated scores are kept; the random stream continues rather than
    /// reseeding, so replicas that restart together stay identical.
    pub fn request_restart(&mut self) -> Result<()> {
        match self.phase {
            RoundPhase::AwaitingFirstPlay
            | RoundPhase::TurnInProgress
            | RoundPhase::RoundComplete => {}
            phase => return Err(EngineError::WrongPhase(phase)),
        }
        if self.players.len() < 2 {
            return Err(EngineError::InvalidConfiguration(
                "a restart needs at least two remaining players".into(),
            ));
        }
        for player in self.players.values_mut() {
            player.hand.drain_cards();
        }
        self.winner = None;
        self.applied_tokens.clear();
        info!("restarting: piles and hands reset, scores kept");
        self.deal_round()
    }

    pub fn terminate(&mut self) {
        info!("session terminated");
        self.phase = RoundPhase::Terminated;
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.rotation.current().copied()
    }

    pub fn direction(&self) -> RotationDirection {
        self.rotation.direction()
    }

    pub fn discard_top(&self) -> Result<&Card> {
        self.discard_pile.peek()
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    pub fn hand_score(&self, player_id: PlayerId) -> Result<u32> {
        self.players
            .get(&player_id)
            .map(|p| p.hand.score())
            .ok_or(EngineError::NotFound)
    }

    pub fn total_score(&self, player_id: PlayerId) -> Result<u32> {
        self.players
            .get(&player_id)
            .map(|p| p.total_score())
            .ok_or(EngineError::NotFound)
    }

    /// Players and their running totals, best first, ties broken by seat.
    pub fn standings(&self) -> Vec<(PlayerId, u32)> {
        let mut rows: Vec<_> = self
            .players
            .values()
            .map(|p| (p.id, p.total_score()))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }

    /// Hands out the presentation events accumulated since the last drain.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn deal_round(&mut self) -> Result<()> {
        let cards = deck::build(self.config.deck_count());
        debug_assert_eq!(
            cards.iter().map(|c| c.id()).collect::<BTreeSet<_>>().len(),
            cards.len(),
            "deck construction produced duplicate card ids"
        );
        let needed = self.players.len() * self.config.cards_per_player as usize + 1;
        if cards.len() < needed {
            return Err(EngineError::InvalidConfiguration(format!(
                "{} cards cannot serve {} players at {} cards each",
                cards.len(),
                self.players.len(),
                self.config.cards_per_player
            )));
        }

        self.phase = RoundPhase::Dealing;
        self.deck_size = cards.len();
        self.draw_pile = CardStack::from_cards(cards, false);
        self.discard_pile = CardStack::new();
        self.draw_pile.shuffle(&mut self.rng);
        self.rotation.forward();
        self.rotation.set_position(0);

        let seating: Vec<PlayerId> = self.rotation.iter().copied().collect();
        for id in seating {
            for _ in 0..self.config.cards_per_player {
                let card = self.draw_pile.pop()?;
                self.players
                    .get_mut(&id)
                    .expect("rotation members are always seated")
                    .hand
                    .add_card(card);
            }
        }

        let opener = self.draw_pile.pop()?;
        info!(
            "dealt {} cards to each of {} players from {}; opener is {opener}",
            self.config.cards_per_player,
            self.players.len(),
            self.deck_size
        );
        self.events.push(EngineEvent::CardMovedToDiscard {
            card: opener.clone(),
        });
        self.discard_pile.push(opener, true);
        self.phase = RoundPhase::AwaitingFirstPlay;
        self.assert_conservation();
        Ok(())
    }

    /// Resolves an admitted move to its action: a play from hand if the
    /// referenced card is there, an intentional draw if it names the top of
    /// the draw pile, and a forced draw for anything else.
    fn perform_move(&mut self, message: &MoveMessage) -> Result<GameAction> {
        let has_card = self
            .players
            .get(&message.acting_player_id)
            .expect("admission checked the player is seated")
            .hand
            .contains(message.card_id);

        if has_card {
            self.play_card_from_hand(message)
        } else {
            self.resolve_draw(message)
        }
    }

    fn play_card_from_hand(&mut self, message: &MoveMessage) -> Result<GameAction> {
        let acting = message.acting_player_id;
        let top = self.discard_pile.peek()?.clone();

        let player = self
            .players
            .get_mut(&acting)
            .expect("admission checked the player is seated");
        let legal = player
            .hand
            .cards()
            .iter()
            .find(|c| c.id() == message.card_id)
            .map(|c| can_play(c, &top))
            .unwrap_or(false);
        if !legal {
            warn!(
                "player {acting} tried an unplayable card {} on {top}; resolving as a pass",
                message.card_id
            );
            return Ok(GameAction::NextPlayer);
        }

        let mut card = player.hand.remove_card(message.card_id)?;
        if card.color() == CardColor::Wild {
            if let Some(color) = message.wild_color {
                card.set_wild_color(color);
            }
            // No wild reaches the pile uncolored: a missing or non-printed
            // choice gets the same shared-generator default as a wild opener.
            if card.wild_color().is_none() {
                let color = STANDARD_COLORS[self.rng.gen_range_usize(0..STANDARD_COLORS.len())];
                card.set_wild_color(color);
                warn!(
                    "player {acting} played wild {} without a usable color, defaulting to {color}",
                    card.id()
                );
            }
        }
        let action = card.value().action();
        debug!("player {acting} played {card}, resolving as {action}");
        self.events
            .push(EngineEvent::CardMovedToDiscard { card: card.clone() });
        self.discard_pile.push(card, true);
        Ok(action)
    }

    fn resolve_draw(&mut self, message: &MoveMessage) -> Result<GameAction> {
        let acting = message.acting_player_id;
        let intentional = self
            .draw_pile
            .peek()
            .map(|c| c.id() == message.card_id)
            .unwrap_or(false);
        if !intentional {
            warn!(
                "player {acting} referenced card {} which is in no reachable place; \
                 forcing a draw",
                message.card_id
            );
        }

        let top = self.discard_pile.peek()?.clone();
        let card = match self.take_from_draw_pile() {
            Ok(card) => card,
            Err(EngineError::EmptyStack) => {
                error!("draw requested by player {acting} with both piles exhausted");
                debug_assert!(false, "closed card system cannot satisfy a draw");
                return Ok(GameAction::DrawAndSkip);
            }
            Err(e) => return Err(e),
        };

        let action = if can_play(&card, &top) {
            GameAction::DrawAndPlayOnce
        } else {
            GameAction::DrawAndSkip
        };
        debug!("player {acting} drew {card}, resolving as {action}");
        self.players
            .get_mut(&acting)
            .expect("admission checked the player is seated")
            .hand
            .add_card(card);
        self.events.push(EngineEvent::PlayerDrew {
            player: acting,
            count: 1,
        });
        Ok(action)
    }

    /// Side effects of an action other than cursor movement: direction flips
    /// and penalty draws for the next player. The two one-card draw outcomes
    /// already applied their draw during resolution.
    fn apply_action_effect(&mut self, action: GameAction) -> Result<()> {
        match action {
            GameAction::Reverse => {
                if self.rotation.len() != 2 {
                    self.rotation.swap_direction();
                    debug!("turn direction is now {}", self.rotation.direction());
                }
            }
            GameAction::DrawTwo => {
                let next = *self
                    .rotation
                    .peek_next()
                    .expect("an active round always has a next player");
                self.draw_cards_to_player(next, 2)?;
            }
            GameAction::DrawFour => {
                let next = *self
                    .rotation
                    .peek_next()
                    .expect("an active round always has a next player");
                self.draw_cards_to_player(next, 4)?;
            }
            GameAction::NextPlayer
            | GameAction::Skip
            | GameAction::DrawAndSkip
            | GameAction::DrawAndPlayOnce
            | GameAction::Wild => {}
        }
        Ok(())
    }

    fn advance_after(&mut self, action: GameAction) {
        let net = action.net_advance(self.rotation.len());
        if net == 0 {
            return;
        }
        self.rotation.advance_by(net);
        let player = *self
            .rotation
            .current()
            .expect("an active round always has a current player");
        self.events.push(EngineEvent::TurnAdvanced { player });
        debug!("turn advanced to player {player}");
    }

    fn check_round_win(&mut self, acting: PlayerId) -> Option<PlayerId> {
        let emptied = self
            .players
            .get(&acting)
            .map(|p| p.hand.is_empty())
            .unwrap_or(false);
        if !emptied {
            return None;
        }
        self.finish_round(acting);
        Some(acting)
    }

    fn finish_round(&mut self, winner: PlayerId) {
        let points: u32 = self
            .players
            .values()
            .filter(|p| p.id != winner)
            .map(|p| p.hand.score())
            .sum();
        self.players
            .get_mut(&winner)
            .expect("the winner is seated")
            .add_points(points);
        self.winner = Some(winner);
        self.phase = RoundPhase::RoundComplete;
        self.events.push(EngineEvent::RoundWon {
            player: winner,
            score: points,
        });
        info!("player {winner} won the round, scoring {points} points");
    }

    /// Pops the next draw card, transparently recycling the discard pile
    /// (all but its visible top card) when the draw pile is empty. The whole
    /// operation completes within the current move's resolution.
    fn take_from_draw_pile(&mut self) -> Result<Card> {
        if self.draw_pile.is_empty() {
            if self.discard_pile.len() < 2 {
                return Err(EngineError::EmptyStack);
            }
            let top = self.discard_pile.pop()?;
            self.draw_pile.recycle_from(&mut self.discard_pile);
            self.discard_pile.push(top, true);
            info!(
                "recycled {} discards into the draw pile",
                self.draw_pile.len()
            );
        }
        self.draw_pile.pop()
    }

    /// Draws up to `count` cards for a player, degrading to a partial draw
    /// if the closed system genuinely runs out of cards.
    fn draw_cards_to_player(&mut self, player_id: PlayerId, count: usize) -> Result<usize> {
        let mut drawn = 0;
        for _ in 0..count {
            match self.take_from_draw_pile() {
                Ok(card) => {
                    self.players
                        .get_mut(&player_id)
                        .ok_or(EngineError::NotFound)?
                        .hand
                        .add_card(card);
                    drawn += 1;
                }
                Err(EngineError::EmptyStack) => {
                    error!(
                        "draw shortfall: only {drawn} of {count} cards available \
                         for player {player_id}"
                    );
                    debug_assert!(false, "closed card system cannot satisfy a draw");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        if drawn > 0 {
            self.events.push(EngineEvent::PlayerDrew {
                player: player_id,
                count: drawn,
            });
        }
        Ok(drawn)
    }

    fn card_total(&self) -> usize {
        let held: usize = self.players.values().map(|p| p.hand.cards_count()).sum();
        held + self.draw_pile.len() + self.discard_pile.len()
    }

    fn assert_conservation(&self) {
        debug_assert_eq!(
            self.card_total(),
            self.deck_size,
            "cards were created or destroyed outside the deal"
        );
    }
}
