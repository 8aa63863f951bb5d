use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::binary::{
    big_int_marshalled_size, len_u32, read_u32, take, unmarshal_big_int, write_big_int,
    BinaryMarshallable,
};
use crate::error::CodecResult;

/// A record within a block.
///
/// Entries have no global identifier; they are addressed by their zero-based
/// position in the parent block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_type: u32,
    /// Arbitrary-precision value carried by the entry.
    #[serde(with = "decimal")]
    pub value: BigInt,
    /// Opaque payload.
    #[serde(with = "hex")]
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(entry_type: u32, value: BigInt, data: Vec<u8>) -> Self {
        Self {
            entry_type,
            value,
            data,
        }
    }
}

/// Layout: `[u32 BE entry type][big-int frame][u32 BE data length][data]`.
impl BinaryMarshallable for Entry {
    fn marshal_binary(&self) -> CodecResult<Vec<u8>> {
        let data_len = len_u32("entry data", self.data.len())?;
        let mut buf = Vec::with_capacity(self.marshalled_size() as usize);
        buf.extend_from_slice(&self.entry_type.to_be_bytes());
        write_big_int(&self.value, &mut buf)?;
        buf.extend_from_slice(&data_len.to_be_bytes());
        buf.extend_from_slice(&self.data);
        Ok(buf)
    }

    fn unmarshal_binary(data: &[u8]) -> CodecResult<(Self, &[u8])> {
        let (entry_type, rest) = read_u32(data)?;
        let (value, rest) = unmarshal_big_int(rest)?;
        let (len, rest) = read_u32(rest)?;
        let (payload, rest) = take(rest, len as usize)?;
        Ok((Entry::new(entry_type, value, payload.to_vec()), rest))
    }

    fn marshalled_size(&self) -> u64 {
        match big_int_marshalled_size(&self.value) {
            0 => 0,
            value => 4 + value + 4 + self.data.len() as u64,
        }
    }
}

/// Serde adapter writing big integers as decimal strings.
mod decimal {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn marshal_layout() {
        let entry = Entry::new(3, BigInt::from(1), vec![0xAB]);
        let bytes = entry.marshal_binary().unwrap();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 3, 2, 0x02, 0x01, 0, 0, 0, 1, 0xAB]
        );
        assert_eq!(entry.marshalled_size(), 12);
    }

    #[test]
    fn roundtrip_leaves_remainder() {
        let entry = Entry::new(9, BigInt::from(-123_456_789_i64), b"payload".to_vec());
        let mut bytes = entry.marshal_binary().unwrap();
        bytes.extend_from_slice(b"next");
        let (decoded, rest) = Entry::unmarshal_binary(&bytes).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(rest, b"next");
    }

    #[test]
    fn truncated_data_fails() {
        let entry = Entry::new(1, BigInt::from(0), vec![1, 2, 3, 4]);
        let bytes = entry.marshal_binary().unwrap();
        let err = Entry::unmarshal_binary(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err, CodecError::TruncatedFrame { needed: 4, available: 3 });
    }

    #[test]
    fn json_uses_decimal_and_hex() {
        let entry = Entry::new(1, BigInt::from(-42), vec![0xDE, 0xAD]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["value"], "-42");
        assert_eq!(json["data"], "dead");

        let parsed: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }
}
