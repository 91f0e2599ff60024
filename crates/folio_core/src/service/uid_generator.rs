//! Short random identifier minting.
//!
//! # Responsibility
//! - Draw 8-char ids from `[a-z0-9]` and redraw until storage reports the
//!   candidate as unused.
//!
//! # Invariants
//! - No retry limit. With 36^8 candidates, collisions are negligible at
//!   expected write rates.
//! - Check-then-act: two concurrent callers can both observe a candidate as
//!   free. The primary key on each id space turns the losing insert into a
//!   storage error instead of an overwrite.

use crate::repo::{RepoResult, UidProbe};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const UID_LEN: usize = 8;
const UID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Collision-checked id generator over an injectable random source.
pub struct UidGenerator<R: Rng = StdRng> {
    rng: R,
}

impl UidGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator, for reproducible candidate sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for UidGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> UidGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draws one candidate without probing storage.
    pub fn draw(&mut self) -> String {
        (0..UID_LEN)
            .map(|_| char::from(UID_ALPHABET[self.rng.gen_range(0..UID_ALPHABET.len())]))
            .collect()
    }

    /// Returns the first drawn candidate that `probe` reports as unused.
    pub fn generate<P: UidProbe + ?Sized>(&mut self, probe: &P) -> RepoResult<String> {
        let mut attempts: u32 = 1;
        loop {
            let candidate = self.draw();
            if !probe.uid_exists(&candidate)? {
                if attempts > 1 {
                    debug!("event=uid_generate module=uid status=ok attempts={attempts}");
                }
                return Ok(candidate);
            }
            attempts += 1;
        }
    }
}
