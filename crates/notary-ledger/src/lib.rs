//! Block store for the notary ledger.
//!
//! This crate supplies the block sequence the read API resolves against:
//! - `LedgerReader` / `LedgerWriter` trait boundaries
//! - `InMemoryLedger`, which hands out immutable snapshots per reader
//! - The binary ledger file used to persist and reload a block sequence

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use file::{decode_ledger, encode_ledger, LEDGER_MAGIC, LEDGER_VERSION};
pub use memory::InMemoryLedger;
pub use traits::{BlockSnapshot, LedgerReader, LedgerWriter};
