//! Deterministic random number generation for replicated sessions.
//!
//! Every replica seeds an identical generator from the session seed and then
//! draws from it in lockstep, so the shuffle order never has to cross the
//! wire. ChaCha8 is used because its output is specified independently of
//! platform and word size; the standard library generators carry no such
//! guarantee across versions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded generator shared by all replicas of a session.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u32,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(u64::from(seed)),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Fisher-Yates shuffle with a pinned draw order: exactly `len - 1` range
    /// draws for any slice, lowest index first. The loop is written out
    /// rather than delegated so the generator consumption is fixed by this
    /// crate and not by a dependency's implementation details.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let n = slice.len();
        if n < 2 {
            return;
        }
        for i in 0..n - 1 {
            let j = self.inner.gen_range(i..n);
            slice.swap(i, j);
        }
    }

    /// Capture the generator position for snapshotting. O(1) regardless of
    /// how many values have been drawn.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Rebuild a generator mid-stream from a captured state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(u64::from(state.seed));
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable generator state for session snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRngState {
    pub seed: u32,
    pub word_pos: u128,
}
