//! Segmented address resolution against a loaded room buffer.

use crate::error::{Result, ZroomError};
use crate::types::SegmentAddress;
use byteorder::{BigEndian, ByteOrder};

/// A room buffer mapped as segment 3.
///
/// Passed explicitly through every decode call; each independent decode gets
/// its own.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Resolve a tagged address into an offset in this buffer.
    ///
    /// Only segment 3 resolves; any other segment yields `None`.
    pub fn resolve(&self, address: SegmentAddress) -> Option<usize> {
        if address.segment() != SegmentAddress::ROOM_SEGMENT {
            return None;
        }
        Some(address.offset())
    }

    /// Resolve an address, treating a foreign segment as an error.
    pub fn resolve_required(&self, address: SegmentAddress) -> Result<usize> {
        self.resolve(address)
            .ok_or(ZroomError::InvalidSegment(address.0))
    }

    /// Borrow `len` bytes at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(ZroomError::OutOfBounds {
                offset,
                len,
                size: self.data.len(),
            })
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(BigEndian::read_u32(self.bytes(offset, 4)?))
    }

    /// Read the big-endian address stored at `offset`.
    pub fn read_address(&self, offset: usize) -> Result<SegmentAddress> {
        self.read_u32(offset).map(SegmentAddress)
    }
}
