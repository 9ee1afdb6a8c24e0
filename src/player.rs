use core::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::hand::Hand;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability tag only: every seat submits moves through the same path and
/// the engine never branches on the tag during resolution. It is carried so
/// collaborators (session layer, UI) can tell the seats apart.
#[derive(
    Clone, Copy, Debug, StrumDisplay, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PlayerKind {
    Local,
    Remote,
    Computer,
}

impl PlayerKind {
    /// Local and remote seats are both human for table-sizing purposes.
    pub fn is_human(self) -> bool {
        !matches!(self, PlayerKind::Computer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    name: String,
    pub kind: PlayerKind,
    pub hand: Hand,
    total_score: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String, kind: PlayerKind) -> Self {
        Self {
            id,
            name,
            kind,
            hand: Hand::new(),
            total_score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Adds a round's points to the running total kept across rounds.
    pub fn add_points(&mut self, points: u32) {
        self.total_score += points;
    }
}
