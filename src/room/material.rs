//! Material runs and their deduplication table.

use super::Room;
use crate::types::SegmentAddress;

/// Identifies a material within its owning [`Room`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) u32);

/// A run of draw-state opcodes preceding a batch of geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub(crate) id: MaterialId,
    /// Raw opcode records, byte for byte.
    pub bytes: Vec<u8>,
    /// Address of this material in the last encoded output.
    pub written_at: Option<SegmentAddress>,
}

impl Material {
    pub fn id(&self) -> MaterialId {
        self.id
    }
}

/// Fixed draw-state run substituted for decoded material runs.
///
/// Sets up a two-tile RGBA16 texture with vertex shading.
pub const PLACEHOLDER_MATERIAL: [u8; 120] = [
    0xE7, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xE3, 0x00, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00,
    0xD7, 0x00, 0x00, 0x02, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFD, 0x10, 0x00, 0x00, 0x04, 0x00, 0x04, 0x00,
    0xF5, 0x10, 0x00, 0x00, 0x07, 0x05, 0x81, 0x50,
    0xE6, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xF3, 0x00, 0x00, 0x00, 0x07, 0x7F, 0xF1, 0x00,
    0xE7, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xF5, 0x10, 0x10, 0x00, 0x00, 0x05, 0x81, 0x50,
    0xF2, 0x00, 0x00, 0x00, 0x00, 0x07, 0xC0, 0xFC,
    0xFC, 0x12, 0x7E, 0x03, 0xFF, 0xFF, 0xFD, 0xF8,
    0xE2, 0x00, 0x00, 0x1C, 0xC8, 0x11, 0x20, 0x78,
    0xD9, 0xF3, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
    0xD9, 0xFF, 0xFF, 0xFF, 0x00, 0x03, 0x00, 0x00,
    0xFA, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
];

impl Room {
    /// Find a material with exactly these bytes, or add one at the head of
    /// the material list.
    pub fn intern_material(&mut self, bytes: &[u8]) -> MaterialId {
        if let Some(existing) = self.materials.iter().find(|m| m.bytes == bytes) {
            return existing.id;
        }

        let id = MaterialId(self.next_material_id);
        self.next_material_id += 1;
        self.materials.insert(
            0,
            Material {
                id,
                bytes: bytes.to_vec(),
                written_at: None,
            },
        );
        log::debug!("interned material {:?} ({} bytes)", id, bytes.len());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_runs_share_a_material() {
        let mut room = Room::new();
        let a = room.intern_material(&[0xE7, 0, 0, 0, 0, 0, 0, 0]);
        let b = room.intern_material(&[0xE7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(a, b);
        assert_eq!(room.materials().len(), 1);
    }

    #[test]
    fn test_distinct_runs_get_distinct_materials() {
        let mut room = Room::new();
        let a = room.intern_material(&[0xE7, 0, 0, 0, 0, 0, 0, 0]);
        let b = room.intern_material(&[0xE7, 0, 0, 0, 0, 0, 0, 1]);
        // a prefix is not a match
        let c = room.intern_material(&[0xE7, 0, 0, 0]);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(room.materials().len(), 3);
    }

    #[test]
    fn test_new_materials_go_to_the_head() {
        let mut room = Room::new();
        let a = room.intern_material(&[1; 8]);
        let b = room.intern_material(&[2; 8]);
        let order: Vec<_> = room.materials().iter().map(Material::id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(room.material(a).unwrap().bytes, vec![1; 8]);
    }

    #[test]
    fn test_placeholder_is_record_aligned() {
        assert_eq!(PLACEHOLDER_MATERIAL.len() % 8, 0);
    }
}
