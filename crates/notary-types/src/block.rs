use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binary::{len_u32, read_u32, read_u64, BinaryMarshallable};
use crate::entry::Entry;
use crate::error::CodecResult;

/// Identifier of a block within the ledger.
///
/// Block IDs increase strictly along the block sequence but need not start at
/// zero: the first visible block's ID is the base offset used to translate
/// public IDs into positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Position of `self` in a sequence whose first block is `base`, if it
    /// is not below the base.
    pub fn offset_from(self, base: BlockId) -> Option<u64> {
        self.0.checked_sub(base.0)
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<BlockId> for u64 {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

/// One unit of the ledger: an identifier and the ordered entries it holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_id: BlockId,
    pub entries: Vec<Entry>,
}

impl Block {
    pub fn new(block_id: impl Into<BlockId>, entries: Vec<Entry>) -> Self {
        Self {
            block_id: block_id.into(),
            entries,
        }
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }
}

/// Layout: `[u64 BE block id][u32 BE entry count][entries...]`.
impl BinaryMarshallable for Block {
    fn marshal_binary(&self) -> CodecResult<Vec<u8>> {
        let count = len_u32("entry count", self.entries.len())?;
        let mut buf = Vec::with_capacity(self.marshalled_size() as usize);
        buf.extend_from_slice(&self.block_id.get().to_be_bytes());
        buf.extend_from_slice(&count.to_be_bytes());
        for entry in &self.entries {
            buf.extend(entry.marshal_binary()?);
        }
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CodecResult<(Self, &[u8])> {
        let (block_id, rest) = read_u64(data)?;
        let (count, mut rest) = read_u32(rest)?;

        let mut entries = Vec::new();
        for _ in 0..count {
            let (entry, tail) = Entry::unmarshal_binary(rest)?;
            entries.push(entry);
            rest = tail;
        }

        Ok((Block::new(block_id, entries), rest))
    }

    fn marshalled_size(&self) -> u64 {
        let mut size = 8 + 4;
        for entry in &self.entries {
            match entry.marshalled_size() {
                0 => return 0,
                n => size += n,
            }
        }
        size
    }
}
