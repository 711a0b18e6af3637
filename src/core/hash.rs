//! Hashing Helpers
//!
//! - Stable persistence keys derived from player names
//! - Board digests for comparing two runs cell by cell

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Incremental SHA-256 hasher with a domain separator.
///
/// Order of updates is significant.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for board contents.
    pub fn for_board() -> Self {
        Self::new(b"GRIDTRAIL_BOARD_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a usize, widened to u64 so digests match across targets.
    #[inline]
    pub fn update_usize(&mut self, value: usize) {
        self.hasher.update((value as u64).to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Derive the persistence key for a player name.
///
/// Lowercase hex of `SHA-256("GRIDTRAIL_PLAYER_V1" || name)`. The same name
/// always maps to the same record across restarts.
pub fn player_key(name: &str) -> String {
    let mut hasher = StateHasher::new(b"GRIDTRAIL_PLAYER_V1");
    hasher.update_bytes(name.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_key_is_stable() {
        assert_eq!(player_key("alice"), player_key("alice"));
        assert_eq!(player_key("alice").len(), 64);
    }

    #[test]
    fn test_player_key_distinguishes_names() {
        assert_ne!(player_key("alice"), player_key("Alice"));
        assert_ne!(player_key("alice"), player_key("bob"));
    }

    #[test]
    fn test_board_and_player_domains_differ() {
        let mut board = StateHasher::for_board();
        board.update_bytes(b"alice");
        assert_ne!(hex::encode(board.finalize()), player_key("alice"));
    }
}
