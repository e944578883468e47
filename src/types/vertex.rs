//! Vertex records.

use crate::gbi::VERTEX_SIZE;
use byteorder::{BigEndian, ByteOrder};
use glam::IVec3;

/// Size of the opaque attribute blob following the coordinates.
pub const ATTRIBUTE_SIZE: usize = 10;

/// A vertex as stored in a 16-byte vertex record.
///
/// Coordinates are signed 16-bit model units. The trailing attribute blob
/// (flag, texture coordinates, color or normal) is carried through untouched.
/// Equality is exact over all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vertex {
    pub position: [i16; 3],
    pub attributes: [u8; ATTRIBUTE_SIZE],
}

impl Vertex {
    pub fn new(position: [i16; 3], attributes: [u8; ATTRIBUTE_SIZE]) -> Self {
        Self {
            position,
            attributes,
        }
    }

    /// Parse a big-endian vertex record. `bytes` must hold at least 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut attributes = [0; ATTRIBUTE_SIZE];
        attributes.copy_from_slice(&bytes[6..VERTEX_SIZE]);
        Self {
            position: [
                BigEndian::read_i16(&bytes[0..2]),
                BigEndian::read_i16(&bytes[2..4]),
                BigEndian::read_i16(&bytes[4..6]),
            ],
            attributes,
        }
    }

    /// Serialize to a big-endian vertex record.
    pub fn to_bytes(&self) -> [u8; VERTEX_SIZE] {
        let mut bytes = [0; VERTEX_SIZE];
        BigEndian::write_i16(&mut bytes[0..2], self.position[0]);
        BigEndian::write_i16(&mut bytes[2..4], self.position[1]);
        BigEndian::write_i16(&mut bytes[4..6], self.position[2]);
        bytes[6..].copy_from_slice(&self.attributes);
        bytes
    }

    pub fn pos(&self) -> IVec3 {
        IVec3::new(
            self.position[0] as i32,
            self.position[1] as i32,
            self.position[2] as i32,
        )
    }
}
