use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("difficulty {difficulty} exceeds the {max} hex characters of a digest")]
    DifficultyOutOfRange { difficulty: usize, max: usize },

    #[error("block {index}: no satisfying nonce within {attempts} attempts")]
    AttemptsExhausted { index: u64, attempts: u64 },

    #[error("block {index}: nonce space exhausted")]
    NonceSpaceExhausted { index: u64 },

    #[error("block at position {position} carries index {found}")]
    IndexMismatch { position: usize, found: u64 },

    #[error("block {index}: stored hash does not match its contents")]
    StaleHash { index: u64 },

    #[error("block {index}: previous hash does not match its predecessor")]
    BrokenLink { index: u64 },

    #[error("block {index}: hash does not meet difficulty {difficulty}")]
    InsufficientWork { index: u64, difficulty: usize },
}

pub type Result<T> = std::result::Result<T, ChainError>;
