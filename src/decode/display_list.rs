//! Display list walking.

use super::{Decoder, MaterialPolicy};
use crate::error::{Result, ZroomError};
use crate::gbi::{
    self, G_ENDDL, G_TRI1, G_TRI2, G_VTX, RECORD_SIZE, VERTEX_BUFFER_SLOTS, VERTEX_SIZE,
};
use crate::room::{Group, MaterialId, Room, Triangle, PLACEHOLDER_MATERIAL};
use crate::types::{SegmentAddress, Vertex};

/// The hardware vertex buffer as seen by draw commands.
struct VertexBuffer {
    slots: [Vertex; VERTEX_BUFFER_SLOTS],
}

impl VertexBuffer {
    fn new() -> Self {
        Self {
            slots: [Vertex::default(); VERTEX_BUFFER_SLOTS],
        }
    }

    /// Fetch the vertex a draw command refers to. Draw commands store slot
    /// indices doubled.
    fn get(&self, encoded: u8) -> Result<Vertex> {
        self.slots
            .get(encoded as usize / 2)
            .copied()
            .ok_or(ZroomError::VertexIndexOutOfRange(encoded / 2))
    }

    fn triangle(&self, encoded: &[u8], material: Option<MaterialId>) -> Result<Triangle> {
        Ok(Triangle::new(
            [
                self.get(encoded[0])?,
                self.get(encoded[1])?,
                self.get(encoded[2])?,
            ],
            material,
        ))
    }
}

impl<'a> Decoder<'a> {
    /// Decode the display list at `address` into a new group at the head of
    /// `room`'s group list.
    ///
    /// Each run of non-geometry records becomes the material for the
    /// triangles drawn after it. Triangles are stored most recent first.
    pub fn decode_display_list(&self, room: &mut Room, address: SegmentAddress) -> Result<()> {
        let seg = &self.segment;
        let mut offset = seg.resolve_required(address)?;
        let mut vbuf = VertexBuffer::new();
        let mut material = None;
        let mut triangles = Vec::new();

        log::debug!("decoding display list at {}", address);

        let mut opcode = seg.read_u8(offset)?;
        while opcode != G_ENDDL {
            let start = offset;
            while !gbi::is_mesh_op(opcode) && opcode != G_ENDDL {
                offset += RECORD_SIZE;
                opcode = seg.read_u8(offset)?;
            }
            if offset > start {
                let run = seg.bytes(start, offset - start)?;
                material = Some(self.intern(room, run));
            }

            while gbi::is_mesh_op(opcode) {
                let cmd = seg.bytes(offset, RECORD_SIZE)?;
                match opcode {
                    G_VTX => self.load_vertices(&mut vbuf, cmd)?,
                    G_TRI1 => triangles.push(vbuf.triangle(&cmd[1..4], material)?),
                    G_TRI2 => {
                        triangles.push(vbuf.triangle(&cmd[1..4], material)?);
                        triangles.push(vbuf.triangle(&cmd[5..8], material)?);
                    }
                    _ => unreachable!("is_mesh_op admits only vertex and triangle opcodes"),
                }
                offset += RECORD_SIZE;
                opcode = seg.read_u8(offset)?;
            }
        }

        log::debug!("  {} triangles", triangles.len());
        triangles.reverse();
        room.prepend_group(Group::with_triangles(triangles));
        Ok(())
    }

    fn intern(&self, room: &mut Room, run: &[u8]) -> MaterialId {
        match self.config.material_policy {
            MaterialPolicy::Placeholder => room.intern_material(&PLACEHOLDER_MATERIAL),
            MaterialPolicy::Verbatim => room.intern_material(run),
        }
    }

    fn load_vertices(&self, vbuf: &mut VertexBuffer, cmd: &[u8]) -> Result<()> {
        let (base, count) = gbi::vertex_cmd_range(cmd);
        if base < 0 || base as usize + count > VERTEX_BUFFER_SLOTS {
            return Err(ZroomError::VertexBufferOverflow { base, count });
        }

        let source = SegmentAddress::from(u32::from_be_bytes([cmd[4], cmd[5], cmd[6], cmd[7]]));
        let offset = self.segment.resolve_required(source)?;
        let records = self.segment.bytes(offset, count * VERTEX_SIZE)?;

        let base = base as usize;
        for (slot, record) in vbuf.slots[base..base + count]
            .iter_mut()
            .zip(records.chunks_exact(VERTEX_SIZE))
        {
            *slot = Vertex::from_bytes(record);
        }
        Ok(())
    }
}
