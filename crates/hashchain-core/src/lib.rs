use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub mod clock;
pub mod constants;
pub mod error;
pub mod hasher;
pub mod mine;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ChainError, Result};
pub use pow::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: u64,
    pub payload: String,
    pub nonce: u64,
    pub hash: String,
}

impl Block {
    /// Build an unmined block stamped with the current wall-clock time.
    pub fn new(index: u64, previous_hash: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::with_clock(index, previous_hash, payload, &SystemClock)
    }

    pub fn with_clock<C: Clock>(
        index: u64,
        previous_hash: impl Into<String>,
        payload: impl Into<String>,
        clock: &C,
    ) -> Self {
        Self::with_timestamp(index, previous_hash, payload, clock.now())
    }

    pub fn with_timestamp(
        index: u64,
        previous_hash: impl Into<String>,
        payload: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        let mut block = Self {
            index,
            previous_hash: previous_hash.into(),
            timestamp,
            payload: payload.into(),
            nonce: 0,
            hash: String::new(),
        };
        block.recompute_hash();
        block
    }

    /// The hashed text for this block's fields with `nonce` substituted:
    /// decimal index, previous hash, decimal timestamp, payload and decimal
    /// nonce, concatenated without separators.
    pub fn preimage_with_nonce(&self, nonce: u64) -> String {
        format!(
            "{}{}{}{}{}",
            self.index, self.previous_hash, self.timestamp, self.payload, nonce
        )
    }

    pub fn preimage(&self) -> String {
        self.preimage_with_nonce(self.nonce)
    }

    /// Digest of the current field values. Does not touch `self.hash`.
    pub fn calculate_hash(&self) -> String {
        hasher::digest(self.preimage().as_bytes())
    }

    /// Bring `hash` back in line with the other fields. Must follow any mutation.
    pub fn recompute_hash(&mut self) {
        self.hash = self.calculate_hash();
    }

    /// False when a field was changed after the hash was last computed.
    pub fn is_consistent(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn meets(&self, difficulty: Difficulty) -> bool {
        pow::meets_difficulty(&self.hash, difficulty)
    }

    /// Search upward from the current nonce for the first one whose hash has
    /// `difficulty` leading `'0'` characters. Returns the number of hashes
    /// evaluated.
    pub fn mine(&mut self, difficulty: Difficulty) -> Result<u64> {
        self.mine_bounded(difficulty, u64::MAX)
    }

    /// Like [`Block::mine`], but gives up after `max_attempts` hashes. At least
    /// one hash is always evaluated. On failure the block is left unmined at
    /// the last nonce tried, with a consistent hash.
    pub fn mine_bounded(&mut self, difficulty: Difficulty, max_attempts: u64) -> Result<u64> {
        self.recompute_hash();
        let mut attempts = 1u64;
        loop {
            if self.meets(difficulty) {
                return Ok(attempts);
            }
            if attempts >= max_attempts {
                warn!(
                    index = self.index,
                    attempts, %difficulty, "giving up on nonce search"
                );
                return Err(ChainError::AttemptsExhausted {
                    index: self.index,
                    attempts,
                });
            }
            self.nonce = self
                .nonce
                .checked_add(1)
                .ok_or(ChainError::NonceSpaceExhausted { index: self.index })?;
            self.recompute_hash();
            attempts += 1;
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index: {}", self.index)?;
        writeln!(f, "Previous Hash: {}", self.previous_hash)?;
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Data: {}", self.payload)?;
        writeln!(f, "Hash: {}", self.hash)?;
        write!(f, "Nonce: {}", self.nonce)
    }
}

pub mod pow {
    use super::{ChainError, Result};
    use crate::constants::{DEFAULT_DIFFICULTY, HASH_HEX_SIZE};
    use std::fmt;

    /// Number of leading `'0'` hex characters a mined hash must carry.
    /// Never larger than the length of a hex digest, so a search over it can
    /// always succeed in principle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Difficulty(usize);

    impl Difficulty {
        pub const MAX: usize = HASH_HEX_SIZE;

        pub fn new(difficulty: usize) -> Result<Self> {
            if difficulty > Self::MAX {
                return Err(ChainError::DifficultyOutOfRange {
                    difficulty,
                    max: Self::MAX,
                });
            }
            Ok(Self(difficulty))
        }

        pub fn get(self) -> usize {
            self.0
        }
    }

    impl Default for Difficulty {
        fn default() -> Self {
            Self(DEFAULT_DIFFICULTY)
        }
    }

    impl TryFrom<usize> for Difficulty {
        type Error = ChainError;

        fn try_from(value: usize) -> Result<Self> {
            Self::new(value)
        }
    }

    impl fmt::Display for Difficulty {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    pub fn count_leading_zero_digits(hash: &str) -> usize {
        hash.bytes().take_while(|b| *b == b'0').count()
    }

    pub fn meets_difficulty(hash: &str, difficulty: Difficulty) -> bool {
        count_leading_zero_digits(hash) >= difficulty.get()
    }
}

pub mod chain {
    use super::*;
    use crate::constants::{DIVIDER, GENESIS_PAYLOAD, GENESIS_PREVIOUS_HASH};
    use tracing::{debug, info};

    /// Append-only sequence of blocks, genesis first. Every block after
    /// genesis is mined before it is stored.
    #[derive(Clone, Debug)]
    pub struct Chain<C: Clock = SystemClock> {
        blocks: Vec<Block>,
        difficulty: Difficulty,
        max_attempts: u64,
        parallel: bool,
        clock: C,
    }

    impl Chain<SystemClock> {
        pub fn new(difficulty: usize) -> Result<Self> {
            Self::with_clock(difficulty, SystemClock)
        }
    }

    impl<C: Clock> Chain<C> {
        pub fn with_clock(difficulty: usize, clock: C) -> Result<Self> {
            let difficulty = Difficulty::new(difficulty)?;
            let genesis = genesis_block(&clock);
            debug!(hash = %genesis.hash, "created genesis block");
            Ok(Self {
                blocks: vec![genesis],
                difficulty,
                max_attempts: u64::MAX,
                parallel: false,
                clock,
            })
        }

        /// Cap every nonce search at `max_attempts` hashes.
        pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
            debug!(max_attempts, "bounding nonce search");
            self.max_attempts = max_attempts;
            self
        }

        /// Search nonces on the rayon pool instead of the calling thread.
        pub fn with_parallel_mining(mut self, parallel: bool) -> Self {
            self.parallel = parallel;
            self
        }

        /// Mine a block carrying `payload` on top of the current tip and
        /// append it. The chain is untouched if the search fails.
        pub fn append(&mut self, payload: impl Into<String>) -> Result<&Block> {
            let mut block = Block::with_clock(
                self.blocks.len() as u64,
                self.last().hash.clone(),
                payload,
                &self.clock,
            );
            let attempts = if self.parallel {
                mine::mine_block_parallel(&mut block, self.difficulty, self.max_attempts)?
            } else {
                block.mine_bounded(self.difficulty, self.max_attempts)?
            };

            info!(
                "Mined block {} with nonce {} after {} attempts and hash {}",
                block.index, block.nonce, attempts, block.hash
            );

            self.blocks.push(block);
            Ok(self.last())
        }

        /// One entry per block, in index order, each followed by a divider line.
        pub fn render(&self) -> String {
            self.to_string()
        }

        pub fn verify(&self) -> Result<()> {
            verify_blocks(&self.blocks, self.difficulty)
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        pub fn get(&self, index: u64) -> Option<&Block> {
            usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
        }

        /// The tip. A chain always holds at least its genesis block.
        pub fn last(&self) -> &Block {
            &self.blocks[self.blocks.len() - 1]
        }

        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        pub fn difficulty(&self) -> Difficulty {
            self.difficulty
        }
    }

    impl<C: Clock> fmt::Display for Chain<C> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for block in &self.blocks {
                writeln!(f, "{block}")?;
                writeln!(f, "{DIVIDER}")?;
            }
            Ok(())
        }
    }

    /// The fixed, unmined first block.
    pub fn genesis_block<C: Clock>(clock: &C) -> Block {
        Block::with_clock(0, GENESIS_PREVIOUS_HASH, GENESIS_PAYLOAD, clock)
    }

    /// Check positions, hashes, links and work for a sequence of blocks,
    /// reporting the first violation found.
    pub fn verify_blocks(blocks: &[Block], difficulty: Difficulty) -> Result<()> {
        for (position, block) in blocks.iter().enumerate() {
            if block.index != position as u64 {
                return Err(ChainError::IndexMismatch {
                    position,
                    found: block.index,
                });
            }
            if !block.is_consistent() {
                return Err(ChainError::StaleHash { index: block.index });
            }
            let expected_previous = match position.checked_sub(1) {
                Some(p) => blocks[p].hash.as_str(),
                None => GENESIS_PREVIOUS_HASH,
            };
            if block.previous_hash != expected_previous {
                return Err(ChainError::BrokenLink { index: block.index });
            }
            // genesis is never mined
            if position > 0 && !block.meets(difficulty) {
                return Err(ChainError::InsufficientWork {
                    index: block.index,
                    difficulty: difficulty.get(),
                });
            }
        }
        Ok(())
    }
}
