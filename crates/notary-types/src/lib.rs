//! Foundation types for the notary ledger.
//!
//! The ledger is an append-only sequence of [`Block`]s, each holding an
//! ordered sequence of [`Entry`] records. Every other notary crate depends on
//! `notary-types`.
//!
//! # Key Types
//!
//! - [`BlockId`]: Sequence-monotonic block identifier
//! - [`Block`]: One unit of the ledger
//! - [`Entry`]: One record within a block, addressed by position
//! - [`BinaryMarshallable`]: Self-describing binary encoding for ledger records
//!
//! The [`binary`] module also hosts the length-prefixed frame used for
//! arbitrary-precision integers embedded in larger records.

pub mod binary;
pub mod block;
pub mod entry;
pub mod error;

pub use binary::{
    big_int_marshalled_size, marshal_big_int, unmarshal_big_int, BinaryMarshallable,
    MAX_FRAME_PAYLOAD,
};
pub use block::{Block, BlockId};
pub use entry::Entry;
pub use error::{CodecError, CodecResult};

pub use num_bigint::BigInt;
