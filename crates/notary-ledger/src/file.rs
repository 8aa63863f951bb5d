//! Binary ledger file.
//!
//! On-disk format:
//! ```text
//! [4 bytes: magic "NCLG"]
//! [4 bytes: format version (big-endian u32)]
//! [8 bytes: block count (big-endian u64)]
//! [N bytes: blocks, each in its `BinaryMarshallable` layout]
//! [4 bytes: CRC32 of everything above (big-endian u32)]
//! ```

use notary_types::{BinaryMarshallable, Block};

use crate::error::{LedgerError, LedgerResult};

pub const LEDGER_MAGIC: &[u8; 4] = b"NCLG";
pub const LEDGER_VERSION: u32 = 1;

const HEADER_SIZE: usize = 4 + 4 + 8;
const TRAILER_SIZE: usize = 4;

/// Encode a block sequence into the ledger file format.
pub fn encode_ledger(blocks: &[Block]) -> LedgerResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + TRAILER_SIZE);
    buf.extend_from_slice(LEDGER_MAGIC);
    buf.extend_from_slice(&LEDGER_VERSION.to_be_bytes());
    buf.extend_from_slice(&(blocks.len() as u64).to_be_bytes());
    for block in blocks {
        buf.extend(block.marshal_binary()?);
    }
    let crc = crc32fast::hash(&buf);
    buf.extend_from_slice(&crc.to_be_bytes());
    Ok(buf)
}

/// Decode a ledger file produced by [`encode_ledger`].
pub fn decode_ledger(data: &[u8]) -> LedgerResult<Vec<Block>> {
    if data.len() < HEADER_SIZE + TRAILER_SIZE {
        return Err(LedgerError::Corrupt(format!(
            "file too short: {} bytes",
            data.len()
        )));
    }

    let (body, trailer) = data.split_at(data.len() - TRAILER_SIZE);
    let stored = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(LedgerError::Corrupt(format!(
            "checksum mismatch: stored {stored:08x}, computed {computed:08x}"
        )));
    }

    if &body[0..4] != LEDGER_MAGIC {
        return Err(LedgerError::Corrupt("bad magic".into()));
    }
    let version = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
    if version != LEDGER_VERSION {
        return Err(LedgerError::Corrupt(format!(
            "unsupported format version {version}"
        )));
    }
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&body[8..HEADER_SIZE]);
    let count = u64::from_be_bytes(count_bytes);

    let mut rest = &body[HEADER_SIZE..];
    let mut blocks = Vec::new();
    for _ in 0..count {
        let (block, tail) = Block::unmarshal_binary(rest)?;
        blocks.push(block);
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(LedgerError::Corrupt(format!(
            "{} trailing bytes after {count} blocks",
            rest.len()
        )));
    }

    Ok(blocks)
}
