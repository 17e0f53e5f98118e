//! Requested address ranges and the bytes read from them

use super::error::{InspectError, InspectResult};
use super::Address;
use serde::{Deserialize, Serialize};

/// A caller-requested `[start, end)` byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

/// Unchecked wire form of [`MemoryRange`]
#[derive(Deserialize)]
struct RawRange {
    start: Address,
    end: Address,
}

impl TryFrom<RawRange> for MemoryRange {
    type Error = InspectError;

    fn try_from(raw: RawRange) -> InspectResult<Self> {
        MemoryRange::new(raw.start, raw.end)
    }
}

impl MemoryRange {
    /// Creates a range, rejecting `start > end` before any OS interaction
    pub fn new(start: Address, end: Address) -> InspectResult<Self> {
        if start > end {
            return Err(InspectError::InvalidRange { start, end });
        }
        Ok(MemoryRange { start, end })
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    /// Number of bytes covered
    pub fn len(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks if `address` falls inside the range
    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }
}

/// The exact bytes read from a [`MemoryRange`]
///
/// A snapshot is only ever built from a complete read, so
/// `bytes.len() == range.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct MemorySnapshot {
    range: MemoryRange,
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    range: MemoryRange,
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
}

impl TryFrom<RawSnapshot> for MemorySnapshot {
    type Error = String;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let expected = raw.range.len();
        let actual = raw.bytes.len();
        MemorySnapshot::new(raw.range, raw.bytes)
            .ok_or_else(|| format!("snapshot holds {actual} bytes but its range covers {expected}"))
    }
}

impl MemorySnapshot {
    /// Wraps a fully read buffer; returns `None` if the lengths disagree
    pub fn new(range: MemoryRange, bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() as u64 == range.len()).then_some(MemorySnapshot { range, bytes })
    }

    /// Snapshot of a zero-length range
    pub fn empty(range: MemoryRange) -> Self {
        debug_assert!(range.is_empty());
        MemorySnapshot {
            range,
            bytes: Vec::new(),
        }
    }

    pub fn range(&self) -> MemoryRange {
        self.range
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Splits the bytes into display rows of `width`, each tagged with its address
    pub fn rows(&self, width: usize) -> impl Iterator<Item = (Address, &[u8])> + '_ {
        let width = width.max(1);
        let start = self.range.start().as_u64();
        self.bytes
            .chunks(width)
            .enumerate()
            .map(move |(i, row)| (Address::new(start + (i * width) as u64), row))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}
