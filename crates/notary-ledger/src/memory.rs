use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use notary_types::{Block, BlockId};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::file::{decode_ledger, encode_ledger};
use crate::traits::{BlockSnapshot, LedgerReader, LedgerWriter};

/// In-memory block store for servers, tests, and local demos.
///
/// Writers replace the shared sequence copy-on-write, so a snapshot handed to
/// a reader stays unchanged for as long as the reader holds it.
#[derive(Debug)]
pub struct InMemoryLedger {
    inner: RwLock<BlockSnapshot>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Build a ledger from an existing sequence, checking that block IDs
    /// strictly increase.
    pub fn from_blocks(blocks: Vec<Block>) -> LedgerResult<Self> {
        for pair in blocks.windows(2) {
            check_follows(pair[0].block_id, pair[1].block_id)?;
        }
        Ok(Self {
            inner: RwLock::new(Arc::new(blocks)),
        })
    }

    /// Load a ledger file written by [`InMemoryLedger::save`].
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let data = fs::read(path)?;
        let ledger = Self::from_blocks(decode_ledger(&data)?)?;
        info!(
            path = %path.display(),
            blocks = ledger.block_count()?,
            "loaded ledger file"
        );
        Ok(ledger)
    }

    /// Write the current snapshot to `path`.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let snapshot = self.snapshot()?;
        let bytes = encode_ledger(&snapshot)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved ledger file");
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerReader for InMemoryLedger {
    fn snapshot(&self) -> LedgerResult<BlockSnapshot> {
        let guard = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(Arc::clone(&guard))
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append_block(&self, block: Block) -> LedgerResult<()> {
        let mut guard = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        if let Some(head) = guard.last() {
            check_follows(head.block_id, block.block_id)?;
        }
        debug!(block_id = %block.block_id, entries = block.entries.len(), "appending block");
        Arc::make_mut(&mut guard).push(block);
        Ok(())
    }

    fn prune_before(&self, id: BlockId) -> LedgerResult<usize> {
        let mut guard = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        let keep_from = guard.partition_point(|b| b.block_id < id);
        if keep_from > 0 {
            Arc::make_mut(&mut guard).drain(..keep_from);
            debug!(removed = keep_from, base = %id, "pruned blocks");
        }
        Ok(keep_from)
    }
}

fn check_follows(head: BlockId, got: BlockId) -> LedgerResult<()> {
    if got <= head {
        return Err(LedgerError::NonMonotonicBlockId { head, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notary_types::{BigInt, Entry};

    fn block(id: u64, entries: usize) -> Block {
        let entries = (0..entries)
            .map(|i| Entry::new(1, BigInt::from(i as u64 * 1000), vec![i as u8]))
            .collect();
        Block::new(id, entries)
    }

    #[test]
    fn empty_ledger_has_no_offset() {
        let ledger = InMemoryLedger::default();
        assert!(ledger.snapshot().unwrap().is_empty());
        assert_eq!(ledger.base_offset().unwrap(), None);
        assert_eq!(ledger.head().unwrap(), None);
    }

    #[test]
    fn append_tracks_offset_and_head() {
        let ledger = InMemoryLedger::new();
        ledger.append_block(block(100, 1)).unwrap();
        ledger.append_block(block(101, 2)).unwrap();
        ledger.append_block(block(105, 0)).unwrap();

        assert_eq!(ledger.base_offset().unwrap(), Some(BlockId::new(100)));
        assert_eq!(ledger.head().unwrap(), Some(BlockId::new(105)));
        assert_eq!(ledger.block_count().unwrap(), 3);
    }

    #[test]
    fn append_rejects_non_increasing_id() {
        let ledger = InMemoryLedger::new();
        ledger.append_block(block(10, 0)).unwrap();

        let err = ledger.append_block(block(10, 0)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NonMonotonicBlockId { head, got }
                if head == BlockId::new(10) && got == BlockId::new(10)
        ));
        assert!(ledger.append_block(block(9, 0)).is_err());
        assert_eq!(ledger.block_count().unwrap(), 1);
    }

    #[test]
    fn from_blocks_validates_order() {
        assert!(InMemoryLedger::from_blocks(vec![block(1, 0), block(2, 0)]).is_ok());
        assert!(InMemoryLedger::from_blocks(vec![block(2, 0), block(1, 0)]).is_err());
    }

    #[test]
    fn snapshot_is_isolated_from_appends() {
        let ledger = InMemoryLedger::new();
        ledger.append_block(block(1, 0)).unwrap();
        let before = ledger.snapshot().unwrap();

        ledger.append_block(block(2, 0)).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(ledger.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn prune_moves_base_offset() {
        let ledger =
            InMemoryLedger::from_blocks(vec![block(100, 0), block(101, 0), block(102, 0)])
                .unwrap();
        let held = ledger.snapshot().unwrap();

        assert_eq!(ledger.prune_before(BlockId::new(102)).unwrap(), 2);
        assert_eq!(ledger.base_offset().unwrap(), Some(BlockId::new(102)));
        assert_eq!(held.len(), 3);

        assert_eq!(ledger.prune_before(BlockId::new(50)).unwrap(), 0);
    }

    #[test]
    fn save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.bin");

        let ledger = InMemoryLedger::from_blocks(vec![block(7, 2), block(8, 1)]).unwrap();
        ledger.save(&path).unwrap();

        let reopened = InMemoryLedger::open(&path).unwrap();
        assert_eq!(*reopened.snapshot().unwrap(), *ledger.snapshot().unwrap());
    }

    #[test]
    fn debug_shows_blocks() {
        let ledger = InMemoryLedger::from_blocks(vec![block(7, 1)]).unwrap();
        assert!(format!("{ledger:?}").contains("BlockId(7)"));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryLedger::open(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
