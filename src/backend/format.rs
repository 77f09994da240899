//! Binary layout of a [`RawValue`] on disk.
//!
//! ```text
//! +-----+-----------------+-----------+
//! | tag | payload         | crc32 LE  |
//! +-----+-----------------+-----------+
//! ```
//!
//! Integers and floats are little-endian. A string payload is its UTF-8
//! bytes. A string set is a `u32` count followed by `u32` length-prefixed
//! UTF-8 members. The checksum covers tag and payload.

use std::collections::BTreeSet;

use super::{BackendError, RawValue};

const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_LONG: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_STRING: u8 = 5;
const TAG_STRING_SET: u8 = 6;

const CHECKSUM_LEN: usize = 4;

/// Encode a value with its tag and checksum.
pub(super) fn encode(value: &RawValue) -> Result<Vec<u8>, BackendError> {
    let mut out = Vec::new();
    match value {
        RawValue::Bool(v) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*v));
        }
        RawValue::Int(v) => {
            out.push(TAG_INT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        RawValue::Long(v) => {
            out.push(TAG_LONG);
            out.extend_from_slice(&v.to_le_bytes());
        }
        RawValue::Float(v) => {
            out.push(TAG_FLOAT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        RawValue::String(v) => {
            out.push(TAG_STRING);
            out.extend_from_slice(v.as_bytes());
        }
        RawValue::StringSet(members) => {
            out.push(TAG_STRING_SET);
            out.extend_from_slice(&length_prefix(members.len())?);
            for member in members {
                out.extend_from_slice(&length_prefix(member.len())?);
                out.extend_from_slice(member.as_bytes());
            }
        }
    }
    let checksum = crc32fast::hash(&out);
    out.extend_from_slice(&checksum.to_le_bytes());
    Ok(out)
}

/// Decode bytes produced by [`encode`], verifying the checksum.
pub(super) fn decode(bytes: &[u8]) -> Result<RawValue, BackendError> {
    let body_len = bytes
        .len()
        .checked_sub(CHECKSUM_LEN)
        .ok_or_else(|| invalid(format!("value too short ({} bytes)", bytes.len())))?;
    let (body, trailer) = bytes
        .split_at_checked(body_len)
        .ok_or_else(|| invalid("value too short".to_string()))?;

    let stored = u32::from_le_bytes(
        trailer
            .try_into()
            .map_err(|_| invalid("invalid checksum trailer".to_string()))?,
    );
    let actual = crc32fast::hash(body);
    if stored != actual {
        return Err(invalid(format!(
            "checksum mismatch: stored {:08x}, computed {:08x}",
            stored, actual
        )));
    }

    let (tag, payload) = body
        .split_first()
        .ok_or_else(|| invalid("missing value tag".to_string()))?;
    let mut reader = Reader { bytes: payload };

    let value = match *tag {
        TAG_BOOL => match reader.array::<1>()? {
            [0] => RawValue::Bool(false),
            [1] => RawValue::Bool(true),
            [other] => return Err(invalid(format!("invalid bool byte {}", other))),
        },
        TAG_INT => RawValue::Int(i32::from_le_bytes(reader.array()?)),
        TAG_LONG => RawValue::Long(i64::from_le_bytes(reader.array()?)),
        TAG_FLOAT => RawValue::Float(f32::from_le_bytes(reader.array()?)),
        TAG_STRING => RawValue::String(utf8(reader.rest())?),
        TAG_STRING_SET => {
            let count = reader.u32()?;
            let mut members = BTreeSet::new();
            for _ in 0..count {
                let len = reader.u32()? as usize;
                members.insert(utf8(reader.take(len)?)?);
            }
            RawValue::StringSet(members)
        }
        other => return Err(invalid(format!("unknown value tag {}", other))),
    };

    if !reader.bytes.is_empty() {
        return Err(invalid(format!(
            "{} trailing bytes after value",
            reader.bytes.len()
        )));
    }
    Ok(value)
}

fn length_prefix(len: usize) -> Result<[u8; 4], BackendError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| invalid(format!("length {} does not fit in u32", len)))
}

fn utf8(bytes: &[u8]) -> Result<String, BackendError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| invalid(format!("invalid UTF-8: {}", e)))
}

fn invalid(msg: String) -> BackendError {
    BackendError::InvalidFormat(msg)
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], BackendError> {
        let (head, tail) = self.bytes.split_at_checked(n).ok_or_else(|| {
            invalid(format!(
                "truncated value: needed {} bytes, {} left",
                n,
                self.bytes.len()
            ))
        })?;
        self.bytes = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BackendError> {
        self.take(N)?
            .try_into()
            .map_err(|_| invalid(format!("expected {} bytes", N)))
    }

    fn u32(&mut self) -> Result<u32, BackendError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.bytes)
    }
}
