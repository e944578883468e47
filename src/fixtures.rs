//! Synthetic room files and geometry for tests.

use crate::gbi::{self, END_DL, RECORD_SIZE, ROOM_CMD_END, ROOM_CMD_MESH};
use crate::room::Triangle;
use crate::types::{SegmentAddress, Vertex};

pub(crate) fn vtx(p: [i16; 3]) -> Vertex {
    Vertex::new(p, [0; 10])
}

pub(crate) fn tri(a: [i16; 3], b: [i16; 3], c: [i16; 3]) -> Triangle {
    Triangle::new([vtx(a), vtx(b), vtx(c)], None)
}

/// A triangle whose three vertices are unique to `n`.
pub(crate) fn unique_tri(n: i16) -> Triangle {
    tri([n, 0, 0], [n, 1, 0], [n, 0, 1])
}

/// Builds a room file: a two-record room header, then whatever blocks are
/// pushed, then the mesh header entries.
pub(crate) struct RoomFile {
    data: Vec<u8>,
}

impl RoomFile {
    pub fn new() -> Self {
        Self {
            data: vec![0; RECORD_SIZE * 2],
        }
    }

    /// Append raw bytes and return their address.
    pub fn push(&mut self, bytes: &[u8]) -> SegmentAddress {
        let at = SegmentAddress::room(self.data.len());
        self.data.extend_from_slice(bytes);
        at
    }

    pub fn push_vertices(&mut self, vertices: &[Vertex]) -> SegmentAddress {
        let bytes: Vec<u8> = vertices.iter().flat_map(|v| v.to_bytes()).collect();
        self.push(&bytes)
    }

    /// Append the mesh header with one 16-byte entry per `(opaque, translucent)`
    /// pair, point the room header at it, and return the file.
    pub fn finish(mut self, entries: &[(SegmentAddress, SegmentAddress)]) -> Vec<u8> {
        let start = SegmentAddress::room(self.data.len());
        for (opa, xlu) in entries {
            self.data.extend_from_slice(&[0; 8]);
            self.data.extend_from_slice(&opa.to_be_bytes());
            self.data.extend_from_slice(&xlu.to_be_bytes());
        }
        let end = SegmentAddress::room(self.data.len());
        let header = self.finish_header(0x02, entries.len() as u8, start, end);
        self.into_bytes(header)
    }

    /// Append a mesh header with explicit fields, for malformed-input tests.
    pub fn finish_header(
        &mut self,
        kind: u8,
        count: u8,
        start: SegmentAddress,
        end: SegmentAddress,
    ) -> SegmentAddress {
        let mut header = vec![kind, count, 0, 0];
        header.extend_from_slice(&start.to_be_bytes());
        header.extend_from_slice(&end.to_be_bytes());
        self.push(&header)
    }

    /// Point the room header at `header` and return the file.
    pub fn into_bytes(mut self, header: SegmentAddress) -> Vec<u8> {
        self.data[..RECORD_SIZE].copy_from_slice(&mesh_ref_record(header));
        self.data[RECORD_SIZE] = ROOM_CMD_END;
        self.data
    }
}

fn mesh_ref_record(header: SegmentAddress) -> [u8; RECORD_SIZE] {
    let [a0, a1, a2, a3] = header.to_be_bytes();
    [ROOM_CMD_MESH, 0, 0, 0, a0, a1, a2, a3]
}

/// Builds a display list record by record.
#[derive(Default)]
pub(crate) struct DisplayList {
    bytes: Vec<u8>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, record: [u8; RECORD_SIZE]) -> Self {
        self.bytes.extend_from_slice(&record);
        self
    }

    pub fn load(self, address: SegmentAddress, count: usize, base: usize) -> Self {
        self.record(gbi::vertex_cmd(address, count, base))
    }

    pub fn tri1(self, t: [u8; 3]) -> Self {
        self.record(gbi::tri1_cmd(t))
    }

    pub fn tri2(self, t0: [u8; 3], t1: [u8; 3]) -> Self {
        self.record(gbi::tri2_cmd(t0, t1))
    }

    pub fn end(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&END_DL);
        self.bytes
    }
}
