//! Address wrapper type with decimal/hex parsing

use super::error::{InspectError, InspectResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An address in the virtual address space of an inspected process
///
/// Stored as `u64` regardless of the host pointer width because the target
/// process may use wider addresses than the inspecting tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Adds a byte offset, returning `None` on overflow
    pub const fn checked_add(&self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(value) => Some(Address(value)),
            None => None,
        }
    }

    /// Number of bytes from `self` up to `other`, or `None` if `other` lies below
    pub const fn distance_to(&self, other: Address) -> Option<u64> {
        other.0.checked_sub(self.0)
    }

    /// Parses a hexadecimal string without prefix, as found in `/proc/<pid>/maps`
    pub fn from_hex(s: &str) -> InspectResult<Self> {
        u64::from_str_radix(s, 16)
            .map(Address::new)
            .map_err(|_| InspectError::InvalidAddress(s.to_string()))
    }
}

impl FromStr for Address {
    type Err = InspectError;

    /// Accepts decimal (`4194304`) or `0x`-prefixed hexadecimal (`0x400000`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        };

        value
            .map(Address::new)
            .map_err(|_| InspectError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value as u64)
    }
}

impl<T> From<*const T> for Address {
    fn from(ptr: *const T) -> Self {
        Address::new(ptr as usize as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert_eq!(Address::from_str("0x1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("0X1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("4096").unwrap(), Address::new(4096));
        assert_eq!(
            Address::from_str(" 0x7fffdeadbeef ").unwrap(),
            Address::new(0x7fff_dead_beef)
        );
    }

    #[test]
    fn test_address_parsing_rejects_garbage() {
        for input in ["", "0x", "DEADBEEF", "12ab", "-1", "0xzz"] {
            let err = Address::from_str(input).unwrap_err();
            assert!(matches!(err, InspectError::InvalidAddress(_)), "{input}");
        }
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(
            Address::from_hex("55d4c2a00000").unwrap(),
            Address::new(0x55d4_c2a0_0000)
        );
        assert!(Address::from_hex("xyz").is_err());
    }

    #[test]
    fn test_address_arithmetic() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.checked_add(0x10), Some(Address::new(0x1010)));
        assert_eq!(Address::new(u64::MAX).checked_add(1), None);
        assert_eq!(addr.distance_to(Address::new(0x1800)), Some(0x800));
        assert_eq!(addr.distance_to(Address::new(0x800)), None);
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xDEADBEEF);
        assert_eq!(format!("{}", addr), "0xdeadbeef");
        assert_eq!(format!("{:x}", addr), "deadbeef");
        assert_eq!(format!("{:016X}", addr), "00000000DEADBEEF");
    }
}
