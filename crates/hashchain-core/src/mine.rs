use crate::{hasher, pow::meets_difficulty, Block, ChainError, Difficulty, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Nonces handed to the pool per round.
const NONCES_PER_BATCH: u64 = 1 << 14;

/// Mines `block` by searching nonces in parallel, upward from its current
/// nonce. Each round searches one batch with an order-preserving `find_first`,
/// so the winner is the smallest qualifying nonce, the same one
/// [`Block::mine_bounded`] finds. Returns the number of nonces up to and
/// including the winner.
pub fn mine_block_parallel(
    block: &mut Block,
    difficulty: Difficulty,
    max_attempts: u64,
) -> Result<u64> {
    let start = block.nonce;
    // The last nonce we may try, inclusive.
    let limit = start.saturating_add(max_attempts.max(1) - 1);

    let mut batch_start = start;
    loop {
        let batch_end = batch_start.saturating_add(NONCES_PER_BATCH - 1).min(limit);
        debug!(
            index = block.index,
            batch_start, batch_end, "searching nonce batch"
        );

        let template = &*block;
        let found = (batch_start..=batch_end).into_par_iter().find_first(|nonce| {
            let hash = hasher::digest(template.preimage_with_nonce(*nonce).as_bytes());
            meets_difficulty(&hash, difficulty)
        });

        if let Some(nonce) = found {
            block.nonce = nonce;
            block.recompute_hash();
            return Ok(nonce - start + 1);
        }

        if batch_end == limit {
            block.nonce = batch_end;
            block.recompute_hash();
            // The budget reached past u64::MAX, so the nonces ran out first.
            if max_attempts.max(1) - 1 > limit - start {
                return Err(ChainError::NonceSpaceExhausted { index: block.index });
            }
            let attempts = batch_end - start + 1;
            warn!(
                index = block.index,
                attempts, %difficulty, "giving up on parallel nonce search"
            );
            return Err(ChainError::AttemptsExhausted {
                index: block.index,
                attempts,
            });
        }
        batch_start = batch_end + 1;
    }
}
