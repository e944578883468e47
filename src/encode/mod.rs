//! Room encoding.
//!
//! Output layout, in order: a placeholder room header, the material display
//! lists, then for each group its vertex batches followed by its display
//! list, and finally a type 0x00 mesh header. The room header's mesh command
//! is patched to point at the mesh header once its address is known.

mod packer;

use crate::error::{Result, ZroomError};
use crate::gbi::{self, END_DL, RECORD_SIZE, ROOM_CMD_MESH};
use crate::room::{Group, Material, MaterialId, Room};
use crate::types::SegmentAddress;
use byteorder::{BigEndian, WriteBytesExt};
use packer::Batch;
use std::collections::HashMap;

/// Room header written ahead of everything else. The mesh command (0x0A) at
/// offset 32 is patched once the mesh header is written.
pub const ROOM_HEADER: [u8; 64] = [
    0x16, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x10, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x0A, 0x00,
    0x0A, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
    0x05, 0x00, 0x00, 0x00, 0x0F, 0x28, 0x6D, 0xBE,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Mesh header type written by the encoder: a plain list of display lists.
const MESH_HEADER_SIMPLE: u8 = 0x00;
/// Size of one entry in a type 0x00 mesh header.
const MESH_ENTRY_SIZE: u32 = 8;
/// Size of the mesh header itself.
const MESH_HEADER_SIZE: u32 = 12;

/// Encoder configuration.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Write the material section and branch into it from group display lists.
    pub with_materials: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            with_materials: true,
        }
    }
}

impl EncoderConfig {
    pub fn with_materials(mut self, with_materials: bool) -> Self {
        self.with_materials = with_materials;
        self
    }
}

/// Where the per-triangle packing loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackState {
    /// Adding the current triangle to the batch.
    Packing,
    /// The batch is full; write it out before retrying the triangle.
    FlushingBatch,
    /// The triangle uses a different material; close the batch drawn with the
    /// old one, then branch to the new one.
    MaterialSwitchPending(SegmentAddress),
}

/// Serializes rooms to the zroom layout.
#[derive(Debug, Clone, Default)]
pub struct ZroomEncoder {
    config: EncoderConfig,
}

impl ZroomEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encode `room`, recording where each material and group was written.
    ///
    /// Only each top-level group's own triangles are written; children left
    /// by spatial division are not part of the flat mesh header.
    pub fn encode(&self, room: &mut Room) -> Result<Vec<u8>> {
        if room.groups.len() > u8::MAX as usize {
            return Err(ZroomError::TooManyGroups(room.groups.len()));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&ROOM_HEADER);

        for material in room.materials_mut() {
            material.written_at = None;
        }
        if self.config.with_materials {
            write_materials(&mut out, room.materials_mut());
        }
        let addresses: HashMap<MaterialId, SegmentAddress> = room
            .materials()
            .iter()
            .filter_map(|m| m.written_at.map(|at| (m.id(), at)))
            .collect();

        let mut current_material = None;
        for (index, group) in room.groups.iter_mut().enumerate() {
            log::info!("processing group {}...", index);
            if !group.children.is_empty() {
                log::warn!(
                    "group {} has {} children; only its own triangles are written",
                    index,
                    group.children.len()
                );
            }

            let display_list = self.pack_group(&mut out, group, &addresses, &mut current_material);

            let at = SegmentAddress::room(out.len());
            group.written_at = Some(at);
            log::info!(" > writing it at {}", at);
            out.extend_from_slice(&display_list);
            out.extend_from_slice(&END_DL);
        }

        // every address recorded so far lies below the end of the mesh header
        let entries = MESH_ENTRY_SIZE as usize * room.groups.len();
        let end = out.len() + MESH_HEADER_SIZE as usize + entries;
        if end > SegmentAddress::MAX_OFFSET {
            return Err(ZroomError::OutputTooLarge(end));
        }
        let header = write_mesh_header(&mut out, &room.groups)?;
        while out.len() % 16 != 0 {
            out.push(0);
        }
        patch_header_reference(&mut out, header)?;

        Ok(out)
    }

    /// Pack one group's triangles. Vertex batches go straight to `out`; the
    /// returned display list goes after them.
    fn pack_group(
        &self,
        out: &mut Vec<u8>,
        group: &Group,
        addresses: &HashMap<MaterialId, SegmentAddress>,
        current_material: &mut Option<MaterialId>,
    ) -> Vec<u8> {
        let mut display_list = Vec::new();
        let mut batch = Batch::new();

        for triangle in &group.triangles {
            let mut state = PackState::Packing;
            if self.config.with_materials && triangle.material != *current_material {
                *current_material = triangle.material;
                if let Some(&address) = triangle.material.and_then(|id| addresses.get(&id)) {
                    state = PackState::MaterialSwitchPending(address);
                }
            }

            loop {
                state = match state {
                    PackState::MaterialSwitchPending(address) => {
                        batch.flush(out, &mut display_list);
                        display_list.extend_from_slice(&gbi::branch_cmd(address));
                        PackState::Packing
                    }
                    PackState::Packing => {
                        if batch.try_add(triangle) {
                            break;
                        }
                        PackState::FlushingBatch
                    }
                    PackState::FlushingBatch => {
                        batch.flush(out, &mut display_list);
                        PackState::Packing
                    }
                };
            }
        }

        batch.flush(out, &mut display_list);
        display_list
    }
}

/// Write every material as its own display list, without branch records.
fn write_materials(out: &mut Vec<u8>, materials: &mut [Material]) {
    for material in materials {
        let at = SegmentAddress::room(out.len());
        material.written_at = Some(at);
        for record in material.bytes.chunks(RECORD_SIZE) {
            if !gbi::is_branch_op(record[0]) {
                out.extend_from_slice(record);
            }
        }
        out.extend_from_slice(&END_DL);
        log::debug!("material {:?} written at {}", material.id(), at);
    }
}

/// Write the mesh header and its entry array; returns the header address.
fn write_mesh_header(out: &mut Vec<u8>, groups: &[Group]) -> Result<SegmentAddress> {
    let header = SegmentAddress::room(out.len());
    let count = groups.len() as u32;
    let start = header.0 + MESH_HEADER_SIZE;
    let end = start + count * MESH_ENTRY_SIZE;

    out.write_u8(MESH_HEADER_SIMPLE)?;
    out.write_u8(count as u8)?;
    out.write_u16::<BigEndian>(0)?;
    out.write_u32::<BigEndian>(start)?;
    out.write_u32::<BigEndian>(end)?;

    for group in groups {
        let opaque = group.written_at.unwrap_or(SegmentAddress::NULL);
        out.write_u32::<BigEndian>(opaque.0)?;
        // translucent
        out.write_u32::<BigEndian>(0)?;
    }
    Ok(header)
}

/// Point the first mesh command in the room header at `header`.
fn patch_header_reference(out: &mut [u8], header: SegmentAddress) -> Result<()> {
    let record = out
        .chunks_exact_mut(RECORD_SIZE)
        .find(|record| record[0] == ROOM_CMD_MESH)
        .ok_or(ZroomError::MissingHeaderReference)?;
    record[4..8].copy_from_slice(&header.to_be_bytes());
    Ok(())
}

/// Encode `room` with the given configuration.
pub fn encode_room(room: &mut Room, config: &EncoderConfig) -> Result<Vec<u8>> {
    ZroomEncoder::new(config.clone()).encode(room)
}
