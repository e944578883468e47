//! Room file decoding.
//!
//! A room file starts with 8-byte header commands. The mesh command (0x0A)
//! points at a mesh header whose entries each name an opaque and a
//! translucent display list; every display list becomes one [`Group`].
//!
//! [`Group`]: crate::room::Group

mod display_list;

use crate::error::{Result, ZroomError};
use crate::gbi::{RECORD_SIZE, ROOM_CMD_END, ROOM_CMD_MESH};
use crate::room::Room;
use crate::segment::Segment;
use crate::types::SegmentAddress;

/// Size of one entry in a type 0x02 mesh header.
const MESH_ENTRY_SIZE: usize = 16;

/// Mesh header type the decoder accepts.
const MESH_HEADER_CULLABLE: u8 = 0x02;

/// How material runs found in display lists are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialPolicy {
    /// Replace every run with [`PLACEHOLDER_MATERIAL`], so all triangles end
    /// up sharing one material.
    ///
    /// [`PLACEHOLDER_MATERIAL`]: crate::room::PLACEHOLDER_MATERIAL
    #[default]
    Placeholder,
    /// Keep each run's bytes as decoded.
    Verbatim,
}

/// Decoder configuration.
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// What to do with decoded material runs.
    pub material_policy: MaterialPolicy,
}

impl DecoderConfig {
    pub fn with_material_policy(mut self, policy: MaterialPolicy) -> Self {
        self.material_policy = policy;
        self
    }
}

/// Decodes one room buffer.
pub struct Decoder<'a> {
    segment: Segment<'a>,
    config: DecoderConfig,
}

impl<'a> Decoder<'a> {
    /// Create a decoder with `data` mapped as segment 3.
    pub fn new(data: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            segment: Segment::new(data),
            config,
        }
    }

    /// Decode the whole room.
    pub fn decode(&self) -> Result<Room> {
        let mut room = Room::new();
        let header = self.find_mesh_header()?;
        let seg = &self.segment;

        let kind = seg.read_u8(header)?;
        if kind != MESH_HEADER_CULLABLE {
            return Err(ZroomError::UnsupportedMeshHeader(kind));
        }
        let count = seg.read_u8(header + 1)? as usize;
        let start = seg.resolve_required(seg.read_address(header + 4)?)?;
        let end = seg.resolve_required(seg.read_address(header + 8)?)?;

        let actual = end.saturating_sub(start) / MESH_ENTRY_SIZE;
        if end < start || actual != count {
            return Err(ZroomError::MeshHeaderMismatch {
                expected: count,
                actual,
            });
        }
        log::debug!("mesh header at {:#x}: {} entries", header, count);

        let mut entry = start;
        while entry < end {
            let opaque = seg.read_address(entry + 8)?;
            let translucent = seg.read_address(entry + 12)?;
            self.decode_entry_list(&mut room, opaque)?;
            self.decode_entry_list(&mut room, translucent)?;
            entry += MESH_ENTRY_SIZE;
        }

        log::info!(
            "decoded {} groups, {} triangles, {} materials",
            room.groups.len(),
            room.total_triangles(),
            room.materials().len()
        );
        Ok(room)
    }

    /// Scan the room header commands for the mesh header and return its offset.
    ///
    /// The scan stops at the terminator command or one record short of the
    /// end of the buffer; the last mesh command seen wins.
    pub fn find_mesh_header(&self) -> Result<usize> {
        let data = self.segment.data();
        let mut header = None;
        let mut offset = 0;

        while offset + RECORD_SIZE < data.len() && data[offset] != ROOM_CMD_END {
            if data[offset] == ROOM_CMD_MESH {
                header = Some(self.segment.read_address(offset + 4)?);
            }
            offset += RECORD_SIZE;
        }

        let header = header.ok_or(ZroomError::MissingMeshHeader)?;
        self.segment.resolve_required(header)
    }

    fn decode_entry_list(&self, room: &mut Room, address: SegmentAddress) -> Result<()> {
        if address.is_null() {
            return Ok(());
        }
        if self.segment.resolve(address).is_none() {
            log::warn!("skipping display list at foreign address {}", address);
            return Ok(());
        }
        self.decode_display_list(room, address)
    }
}

/// Decode a room buffer with the given configuration.
pub fn decode_room(data: &[u8], config: &DecoderConfig) -> Result<Room> {
    Decoder::new(data, config.clone()).decode()
}
