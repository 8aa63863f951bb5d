use std::sync::Arc;

use notary_types::{Block, BlockId};

use crate::error::LedgerResult;

/// An immutable view of the block sequence at one point in time.
pub type BlockSnapshot = Arc<Vec<Block>>;

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    /// The current block sequence. Later appends never alter a snapshot
    /// already handed out.
    fn snapshot(&self) -> LedgerResult<BlockSnapshot>;

    /// ID of the first visible block, which is the base offset for ID lookups.
    fn base_offset(&self) -> LedgerResult<Option<BlockId>> {
        Ok(self.snapshot()?.first().map(|b| b.block_id))
    }

    /// ID of the most recent block.
    fn head(&self) -> LedgerResult<Option<BlockId>> {
        Ok(self.snapshot()?.last().map(|b| b.block_id))
    }

    fn block_count(&self) -> LedgerResult<usize> {
        Ok(self.snapshot()?.len())
    }
}

/// Write boundary for growing and trimming the ledger.
pub trait LedgerWriter: Send + Sync {
    /// Append a block whose ID is greater than the current head.
    fn append_block(&self, block: Block) -> LedgerResult<()>;

    /// Drop every block with an ID below `id`. Returns the number removed.
    fn prune_before(&self, id: BlockId) -> LedgerResult<usize>;
}
