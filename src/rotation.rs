use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;

use crate::error::{EngineError, Result};

#[derive(
    Clone, Copy, Debug, StrumDisplay, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum RotationDirection {
    Forward,
    Backward,
}

impl RotationDirection {
    pub fn swapped(self) -> Self {
        match self {
            RotationDirection::Forward => RotationDirection::Backward,
            RotationDirection::Backward => RotationDirection::Forward,
        }
    }
}

/// Circular seating order with a cursor and a travel direction.
///
/// Members sit in insertion order; the cursor marks whose turn it is and
/// moves through the circle in the current direction, wrapping at either end.
/// The container is generic so tests can drive it with plain values; the
/// engine stores player ids and keeps the players themselves elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRotation<P> {
    members: Vec<P>,
    cursor: usize,
    direction: RotationDirection,
}

impl<P> Default for TurnRotation<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TurnRotation<P> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            cursor: 0,
            direction: RotationDirection::Forward,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&P> {
        self.members.get(self.cursor)
    }

    /// Members in seating order, independent of cursor and direction.
    pub fn iter(&self) -> impl Iterator<Item = &P> + '_ {
        self.members.iter()
    }

    /// One full cycle starting at the cursor, travelling in the current
    /// direction. Bounded by construction, so scans over it cannot loop
    /// forever on a missing target.
    pub fn iter_from_current(&self) -> impl Iterator<Item = &P> + '_ {
        (0..self.members.len()).map(move |offset| {
            let index = self.index_at_offset(offset);
            &self.members[index]
        })
    }

    fn index_at_offset(&self, offset: usize) -> usize {
        let n = self.members.len();
        match self.direction {
            RotationDirection::Forward => (self.cursor + offset) % n,
            RotationDirection::Backward => (self.cursor + (n - offset % n) % n) % n,
        }
    }

    fn step(&mut self, direction: RotationDirection) {
        let n = self.members.len();
        if n == 0 {
            return;
        }
        self.cursor = match direction {
            RotationDirection::Forward => (self.cursor + 1) % n,
            RotationDirection::Backward => (self.cursor + n - 1) % n,
        };
    }

    /// Advances one seat in the current direction and returns the new
    /// current member.
    pub fn next(&mut self) -> Option<&P> {
        self.step(self.direction);
        self.current()
    }

    /// Steps one seat against the current direction and returns the new
    /// current member.
    pub fn prev(&mut self) -> Option<&P> {
        self.step(self.direction.swapped());
        self.current()
    }

    /// Advances `n` seats in the current direction.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.step(self.direction);
        }
    }

    pub fn peek_next(&self) -> Option<&P> {
        if self.members.is_empty() {
            return None;
        }
        Some(&self.members[self.index_at_offset(1)])
    }

    pub fn peek_prev(&self) -> Option<&P> {
        let n = self.members.len();
        if n == 0 {
            return None;
        }
        let index = match self.direction {
            RotationDirection::Forward => (self.cursor + n - 1) % n,
            RotationDirection::Backward => (self.cursor + 1) % n,
        };
        Some(&self.members[index])
    }

    /// Moves the cursor to `index`, clamped to the valid range.
    pub fn set_position(&mut self, index: usize) {
        if self.members.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = index.min(self.members.len() - 1);
        }
    }

    pub fn forward(&mut self) {
        self.direction = RotationDirection::Forward;
    }

    pub fn reverse(&mut self) {
        self.direction = RotationDirection::Backward;
    }

    pub fn swap_direction(&mut self) {
        self.direction = self.direction.swapped();
    }

    /// Seats a new member at the end of the seating order. The cursor is not
    /// moved; an empty rotation seats the first member under the cursor.
    pub fn add(&mut self, member: P) {
        self.members.push(member);
    }
}

impl<P: PartialEq> TurnRotation<P> {
    /// Moves the cursor onto `member`. A single pass over the seating order;
    /// fails with `NotFound` instead of searching again.
    pub fn set_cursor_to(&mut self, member: &P) -> Result<()> {
        let index = self
            .members
            .iter()
            .position(|m| m == member)
            .ok_or(EngineError::NotFound)?;
        self.cursor = index;
        Ok(())
    }

    pub fn contains(&self, member: &P) -> bool {
        self.members.contains(member)
    }

    /// Unseat `member` and return it.
    ///
    /// Cursor policy: removing a member seated before the cursor shifts the
    /// cursor back so it keeps addressing the same member; removing one after
    /// the cursor leaves it untouched; removing the member under the cursor
    /// leaves the cursor addressing that member's successor in the current
    /// direction, wrapping at either end. The member who was due to act next
    /// is therefore never skipped and never granted an extra turn.
    pub fn remove(&mut self, member: &P) -> Result<P> {
        let index = self
            .members
            .iter()
            .position(|m| m == member)
            .ok_or(EngineError::NotFound)?;
        let removed = self.members.remove(index);
        let n = self.members.len();

        if n == 0 {
            self.cursor = 0;
        } else if index < self.cursor {
            self.cursor -= 1;
        } else if index == self.cursor {
            self.cursor = match self.direction {
                // The successor slid into the vacated slot.
                RotationDirection::Forward => {
                    if self.cursor >= n {
                        0
                    } else {
                        self.cursor
                    }
                }
                RotationDirection::Backward => {
                    if index == 0 {
                        n - 1
                    } else {
                        index - 1
                    }
                }
            };
        }

        Ok(removed)
    }
}
