//! Binary marshalling for ledger values.
//!
//! Arbitrary-precision integers are stored as a self-describing frame:
//!
//! ```text
//! [1 byte: payload length N]
//! [N bytes: canonical big-integer encoding]
//! ```
//!
//! The canonical encoding is one header byte, `(version << 1) | sign`, where
//! `sign` is 1 for negative values, followed by the big-endian magnitude with
//! no leading zeros. Zero encodes as the header byte alone. Because the length
//! lives in a single byte, integers whose canonical encoding exceeds
//! [`MAX_FRAME_PAYLOAD`] bytes cannot be framed at all.

use num_bigint::{BigInt, Sign};

use crate::error::{CodecError, CodecResult};

/// Largest canonical encoding that fits behind a single length byte.
pub const MAX_FRAME_PAYLOAD: usize = u8::MAX as usize;

const ENCODING_VERSION: u8 = 1;

/// A ledger record with a self-describing binary form.
///
/// Decoding consumes exactly the bytes of one record and hands back the
/// remainder, so records can be laid end to end inside a larger buffer.
pub trait BinaryMarshallable: Sized {
    /// Encode the record.
    fn marshal_binary(&self) -> CodecResult<Vec<u8>>;

    /// Decode one record from the front of `data`, returning it together with
    /// the unconsumed bytes.
    fn unmarshal_binary(data: &[u8]) -> CodecResult<(Self, &[u8])>;

    /// Encoded size in bytes, or `0` if the record cannot be encoded.
    fn marshalled_size(&self) -> u64;
}

/// Encode `value` as `[length][canonical bytes]`.
pub fn marshal_big_int(value: &BigInt) -> CodecResult<Vec<u8>> {
    let mut frame = Vec::with_capacity(1 + canonical_len(value));
    write_big_int(value, &mut frame)?;
    Ok(frame)
}

/// Decode one integer frame from the front of `data`.
///
/// Returns the integer and the bytes following the frame.
pub fn unmarshal_big_int(data: &[u8]) -> CodecResult<(BigInt, &[u8])> {
    let (&size, rest) = data.split_first().ok_or(CodecError::TruncatedFrame {
        needed: 1,
        available: 0,
    })?;
    let size = size as usize;
    if rest.len() < size {
        return Err(CodecError::TruncatedFrame {
            needed: 1 + size,
            available: data.len(),
        });
    }
    let (payload, rest) = rest.split_at(size);
    Ok((decode_canonical(payload)?, rest))
}

/// Size of the frame `marshal_big_int` would produce, computed without
/// encoding. Returns `0` when the integer has no frame.
pub fn big_int_marshalled_size(value: &BigInt) -> u64 {
    let size = canonical_len(value);
    if size > MAX_FRAME_PAYLOAD {
        return 0;
    }
    1 + size as u64
}

/// Append the frame for `value` to `buf`.
pub(crate) fn write_big_int(value: &BigInt, buf: &mut Vec<u8>) -> CodecResult<()> {
    let size = canonical_len(value);
    if size > MAX_FRAME_PAYLOAD {
        return Err(CodecError::ValueTooLarge {
            size,
            max: MAX_FRAME_PAYLOAD,
        });
    }
    buf.push(size as u8);

    let mut header = ENCODING_VERSION << 1;
    if value.sign() == Sign::Minus {
        header |= 1;
    }
    buf.push(header);
    if value.sign() != Sign::NoSign {
        buf.extend_from_slice(&value.magnitude().to_bytes_be());
    }
    Ok(())
}

fn canonical_len(value: &BigInt) -> usize {
    let magnitude = value.bits().div_ceil(8);
    1 + magnitude as usize
}

fn decode_canonical(payload: &[u8]) -> CodecResult<BigInt> {
    // An empty payload decodes to zero.
    let Some((&header, magnitude)) = payload.split_first() else {
        return Ok(BigInt::default());
    };
    let version = header >> 1;
    if version != ENCODING_VERSION {
        return Err(CodecError::UnsupportedEncoding(version));
    }
    let sign = if header & 1 == 1 { Sign::Minus } else { Sign::Plus };
    Ok(BigInt::from_bytes_be(sign, magnitude))
}

pub(crate) fn take(data: &[u8], n: usize) -> CodecResult<(&[u8], &[u8])> {
    if data.len() < n {
        return Err(CodecError::TruncatedFrame {
            needed: n,
            available: data.len(),
        });
    }
    Ok(data.split_at(n))
}

pub(crate) fn read_u32(data: &[u8]) -> CodecResult<(u32, &[u8])> {
    let (head, rest) = take(data, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(head);
    Ok((u32::from_be_bytes(bytes), rest))
}

pub(crate) fn read_u64(data: &[u8]) -> CodecResult<(u64, &[u8])> {
    let (head, rest) = take(data, 8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(head);
    Ok((u64::from_be_bytes(bytes), rest))
}

pub(crate) fn len_u32(what: &'static str, len: usize) -> CodecResult<u32> {
    u32::try_from(len).map_err(|_| CodecError::LengthOverflow { what, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn zero_is_header_only() {
        let frame = marshal_big_int(&big(0)).unwrap();
        assert_eq!(frame, vec![1, 0x02]);
        assert_eq!(big_int_marshalled_size(&big(0)), 2);
    }

    #[test]
    fn positive_layout() {
        let frame = marshal_big_int(&big(256)).unwrap();
        assert_eq!(frame, vec![3, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn negative_sets_sign_bit() {
        let frame = marshal_big_int(&big(-1)).unwrap();
        assert_eq!(frame, vec![2, 0x03, 0x01]);
        let (value, rest) = unmarshal_big_int(&frame).unwrap();
        assert_eq!(value, big(-1));
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_returns_remainder() {
        let mut buf = marshal_big_int(&big(42)).unwrap();
        buf.extend_from_slice(&[0xAA, 0xBB]);
        let (value, rest) = unmarshal_big_int(&buf).unwrap();
        assert_eq!(value, big(42));
        assert_eq!(rest, &[0xAA, 0xBB]);
    }

    #[test]
    fn consecutive_frames() {
        let mut buf = marshal_big_int(&big(7)).unwrap();
        buf.extend(marshal_big_int(&big(-300)).unwrap());
        let (first, rest) = unmarshal_big_int(&buf).unwrap();
        let (second, rest) = unmarshal_big_int(rest).unwrap();
        assert_eq!(first, big(7));
        assert_eq!(second, big(-300));
        assert!(rest.is_empty());
    }

    #[test]
    fn largest_frameable_value() {
        let value = BigInt::from_bytes_be(Sign::Plus, &[0xFF; 254]);
        let frame = marshal_big_int(&value).unwrap();
        assert_eq!(frame.len(), 256);
        assert_eq!(frame[0], 255);
        assert_eq!(big_int_marshalled_size(&value), 256);
        assert_eq!(unmarshal_big_int(&frame).unwrap().0, value);
    }

    #[test]
    fn oversize_value_is_rejected() {
        let value = BigInt::from_bytes_be(Sign::Minus, &[0x01; 255]);
        let err = marshal_big_int(&value).unwrap_err();
        assert_eq!(err, CodecError::ValueTooLarge { size: 256, max: 255 });
        assert_eq!(big_int_marshalled_size(&value), 0);
    }

    #[test]
    fn empty_buffer_is_truncated() {
        let err = unmarshal_big_int(&[]).unwrap_err();
        assert_eq!(err, CodecError::TruncatedFrame { needed: 1, available: 0 });
    }

    #[test]
    fn short_payload_is_truncated() {
        let err = unmarshal_big_int(&[3, 0x02, 0x01]).unwrap_err();
        assert_eq!(err, CodecError::TruncatedFrame { needed: 4, available: 3 });
    }

    #[test]
    fn empty_payload_decodes_to_zero() {
        let (value, rest) = unmarshal_big_int(&[0, 9]).unwrap();
        assert_eq!(value, big(0));
        assert_eq!(rest, &[9]);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = unmarshal_big_int(&[2, 0x04, 0x01]).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedEncoding(2));
    }

    #[test]
    fn leading_zero_magnitude_is_tolerated() {
        let (value, _) = unmarshal_big_int(&[3, 0x02, 0x00, 0x05]).unwrap();
        assert_eq!(value, big(5));
    }

    proptest! {
        #[test]
        fn frame_roundtrip(
            negative in any::<bool>(),
            magnitude in prop::collection::vec(any::<u8>(), 0..=254),
        ) {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            let value = BigInt::from_bytes_be(sign, &magnitude);
            let frame = marshal_big_int(&value).unwrap();
            prop_assert_eq!(frame.len() as u64, big_int_marshalled_size(&value));
            prop_assert_eq!(frame[0] as usize, frame.len() - 1);
            let (decoded, rest) = unmarshal_big_int(&frame).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert!(rest.is_empty());
        }
    }
}
