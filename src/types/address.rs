//! Segmented addresses.

use std::fmt;

/// A tagged 32-bit address: segment number in the top byte, offset in the
/// low 24 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentAddress(pub u32);

impl SegmentAddress {
    /// The segment a room file is loaded into.
    pub const ROOM_SEGMENT: u8 = 0x03;

    /// Largest offset an address can carry.
    pub const MAX_OFFSET: usize = 0x00FF_FFFF;

    /// The null address.
    pub const NULL: SegmentAddress = SegmentAddress(0);

    /// Address of `offset` within the room segment. Offsets past
    /// [`MAX_OFFSET`](Self::MAX_OFFSET) wrap.
    pub fn room(offset: usize) -> Self {
        Self(((Self::ROOM_SEGMENT as u32) << 24) | (offset as u32 & 0x00FF_FFFF))
    }

    pub fn segment(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn offset(self) -> usize {
        (self.0 & 0x00FF_FFFF) as usize
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for SegmentAddress {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SegmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_address() {
        let addr = SegmentAddress::room(0x1234);
        assert_eq!(addr.0, 0x0300_1234);
        assert_eq!(addr.segment(), 0x03);
        assert_eq!(addr.offset(), 0x1234);
        assert_eq!(addr.to_string(), "03001234");
    }

    #[test]
    fn test_null() {
        assert!(SegmentAddress::NULL.is_null());
        assert!(!SegmentAddress::room(0).is_null());
    }
}
