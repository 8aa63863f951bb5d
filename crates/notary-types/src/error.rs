use thiserror::Error;

/// Errors produced while encoding or decoding binary frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("big integer is too big: {size} encoded bytes (max {max})")]
    ValueTooLarge { size: usize, max: usize },

    #[error("truncated frame: need {needed} bytes, have {available}")]
    TruncatedFrame { needed: usize, available: usize },

    #[error("big integer encoding version {0} is not supported")]
    UnsupportedEncoding(u8),

    #[error("{what} length {len} does not fit the record layout")]
    LengthOverflow { what: &'static str, len: usize },
}

pub type CodecResult<T> = Result<T, CodecError>;
