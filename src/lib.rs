//! Deterministic turn resolution for an Uno-like shedding card game.
//!
//! The engine is a replicated state machine: every participant constructs a
//! [`engine::RuleEngine`] from the same [`config::GameConfig`] and shared
//! seed, then applies the same totally-ordered stream of
//! [`wire::MoveMessage`]s. All shuffles and depth draws flow through one
//! seeded generator in a fixed call order, so replicas reach byte-identical
//! states without ever exchanging them.
//!
//! Moves reference cards by id; a reference that cannot be honored degrades
//! to a draw, and rejections (out of turn, duplicate token, wrong phase)
//! are deliberate no-ops, so retransmitted or stale messages cannot fork
//! replicas that already applied the real move.

pub mod card;
pub mod config;
mod constants;
mod deck;
pub mod engine;
pub mod error;
pub mod hand;
pub mod player;
pub mod rng;
pub mod rotation;
pub mod stack;
pub mod turn;
pub mod wire;

pub use crate::card::{can_play, Card, CardColor, CardId, CardValue};
pub use crate::config::GameConfig;
pub use crate::engine::RuleEngine;
pub use crate::error::{EngineError, Result};
pub use crate::hand::Hand;
pub use crate::player::{Player, PlayerId, PlayerKind};
pub use crate::rng::{GameRng, GameRngState};
pub use crate::rotation::{RotationDirection, TurnRotation};
pub use crate::stack::CardStack;
pub use crate::turn::{ChallengeOutcome, GameAction, MoveOutcome, RejectReason, RoundPhase};
pub use crate::wire::{EngineEvent, MoveMessage};
