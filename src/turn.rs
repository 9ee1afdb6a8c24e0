use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;

use crate::player::PlayerId;

/// Resolved effect of a move. Values that print on cards map here through
/// [`crate::card::CardValue::action`]; `DrawAndSkip` and `DrawAndPlayOnce`
/// are produced only by the draw path and never push a card to the discard
/// pile.
#[derive(Clone, Copy, Debug, StrumDisplay, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    NextPlayer,
    Skip,
    Reverse,
    DrawTwo,
    DrawFour,
    DrawAndSkip,
    DrawAndPlayOnce,
    Wild,
}

impl GameAction {
    /// Total cursor movement a resolved action produces, from the acting
    /// player's seat. Reverse flips the direction as a side effect before
    /// the advance, except with two players where it behaves as a skip and
    /// the direction is left alone.
    pub fn net_advance(self, player_count: usize) -> usize {
        match self {
            GameAction::NextPlayer => 1,
            GameAction::Skip => 2,
            GameAction::Reverse => {
                if player_count == 2 {
                    2
                } else {
                    1
                }
            }
            GameAction::DrawTwo => 2,
            GameAction::DrawFour => 2,
            GameAction::DrawAndSkip => 1,
            GameAction::DrawAndPlayOnce => 0,
            GameAction::Wild => 1,
        }
    }
}

/// Round lifecycle. `Dealing` only exists inside setup; by the time a setup
/// call returns the phase is `AwaitingFirstPlay` or an error aborted it.
#[derive(Clone, Copy, Debug, StrumDisplay, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundPhase {
    WaitingForPlayers,
    Dealing,
    AwaitingFirstPlay,
    TurnInProgress,
    RoundComplete,
    Terminated,
}

/// Why a submitted move was ignored. Rejections are no-ops by design, so
/// retransmitted or stale messages cannot corrupt replicas that already
/// applied the real move.
#[derive(Clone, Copy, Debug, StrumDisplay, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    OutOfTurn,
    Duplicate,
    WrongPhase,
    UnknownPlayer,
}

/// Result of a resolved Uno challenge. `penalized` is the challenger when
/// the target had already called Uno, otherwise the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOutcome {
    pub target: PlayerId,
    pub target_had_called: bool,
    pub penalized: PlayerId,
}

/// Outcome of submitting a move to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveOutcome {
    Applied {
        action: GameAction,
        winner: Option<PlayerId>,
    },
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }

    pub fn action(&self) -> Option<GameAction> {
        match self {
            MoveOutcome::Applied { action, .. } => Some(*action),
            MoveOutcome::Rejected(_) => None,
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            MoveOutcome::Applied { winner, .. } => *winner,
            MoveOutcome::Rejected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_advance_matches_action_table() {
        assert_eq!(GameAction::NextPlayer.net_advance(4), 1);
        assert_eq!(GameAction::Skip.net_advance(4), 2);
        assert_eq!(GameAction::Reverse.net_advance(4), 1);
        assert_eq!(GameAction::DrawTwo.net_advance(4), 2);
        assert_eq!(GameAction::DrawFour.net_advance(4), 2);
        assert_eq!(GameAction::DrawAndSkip.net_advance(4), 1);
        assert_eq!(GameAction::DrawAndPlayOnce.net_advance(4), 0);
        assert_eq!(GameAction::Wild.net_advance(4), 1);
    }

    #[test]
    fn reverse_acts_as_skip_with_two_players() {
        assert_eq!(GameAction::Reverse.net_advance(2), 2);
        assert_eq!(GameAction::Reverse.net_advance(3), 1);
    }

    #[test]
    fn skip_advances_one_further_than_next_player() {
        for count in 2..8 {
            assert_eq!(
                GameAction::Skip.net_advance(count),
                GameAction::NextPlayer.net_advance(count) + 1
            );
        }
    }

    #[test]
    fn return_correct_string_for_phases() {
        assert_eq!(RoundPhase::WaitingForPlayers.to_string(), "WaitingForPlayers");
        assert_eq!(RoundPhase::TurnInProgress.to_string(), "TurnInProgress");
        assert_eq!(RoundPhase::RoundComplete.to_string(), "RoundComplete");
    }
}
