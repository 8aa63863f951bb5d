use notary_types::{BlockId, CodecError};

/// Errors produced by ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("block id {got} does not follow head {head}")]
    NonMonotonicBlockId { head: BlockId, got: BlockId },

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("corrupt ledger file: {0}")]
    Corrupt(String),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
