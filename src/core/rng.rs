//! Seeded Random Number Generator
//!
//! Xorshift128+ seeded through SplitMix64. Every random decision the
//! simulation makes (respawn cells and headings) comes from here, so a
//! session started with the same seed and fed the same input replays
//! exactly.

use super::grid::{Direction, GridPos};

/// Seeded PRNG using the Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use gridtrail::core::rng::SessionRng;
///
/// let mut a = SessionRng::new(12345);
/// let mut b = SessionRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug)]
pub struct SessionRng {
    state: [u64; 2],
}

impl Default for SessionRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SessionRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// SplitMix64 spreads weak seeds (0, 1, 2, ...) across the state space.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // All-zero state would lock the generator at zero
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Modulo bias is negligible for board-sized ranges
        (self.next_u64() % max as u64) as u32
    }

    /// Pick a uniformly random interior cell of a `width` x `height` board.
    ///
    /// Interior means the one-cell wall border is excluded.
    pub fn interior_cell(&mut self, width: usize, height: usize) -> GridPos {
        let x = 1 + self.next_int(width.saturating_sub(2) as u32) as usize;
        let y = 1 + self.next_int(height.saturating_sub(2) as u32) as usize;
        GridPos::new(x, y)
    }

    /// Pick one of the four cardinal directions.
    pub fn direction(&mut self) -> Direction {
        Direction::ALL[self.next_int(Direction::ALL.len() as u32) as usize]
    }
}

/// SplitMix64 for seed initialization.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// =============================================================================
// TESTS
// =============================================================================
