//! Display-list opcodes and record layout constants.

use crate::types::SegmentAddress;

/// Load vertices into the working vertex buffer.
pub const G_VTX: u8 = 0x01;
/// Cull the display list against a vertex range.
pub const G_CULLDL: u8 = 0x03;
/// Draw one triangle.
pub const G_TRI1: u8 = 0x05;
/// Draw two triangles.
pub const G_TRI2: u8 = 0x06;
/// Branch to (or call) another display list.
pub const G_DL: u8 = 0xDE;
/// End of display list.
pub const G_ENDDL: u8 = 0xDF;

/// Room header command referencing the mesh header.
pub const ROOM_CMD_MESH: u8 = 0x0A;
/// Room header terminator.
pub const ROOM_CMD_END: u8 = 0x14;

/// Size of one display-list or room header record.
pub const RECORD_SIZE: usize = 8;
/// Size of a vertex record.
pub const VERTEX_SIZE: usize = 16;
/// Number of slots in the hardware vertex buffer.
pub const VERTEX_BUFFER_SLOTS: usize = 32;

/// An end-of-list record.
pub const END_DL: [u8; RECORD_SIZE] = [G_ENDDL, 0, 0, 0, 0, 0, 0, 0];

/// Returns `true` for opcodes that build geometry.
pub fn is_mesh_op(opcode: u8) -> bool {
    matches!(opcode, G_VTX | G_TRI1 | G_TRI2)
}

/// Returns `true` for opcodes stripped from material runs on export.
pub fn is_branch_op(opcode: u8) -> bool {
    matches!(opcode, G_CULLDL | G_DL)
}

/// Load `count` vertices from `address` into slots `base..base + count`.
pub fn vertex_cmd(address: SegmentAddress, count: usize, base: usize) -> [u8; RECORD_SIZE] {
    let [a0, a1, a2, a3] = address.to_be_bytes();
    [
        G_VTX,
        (count >> 4) as u8,
        (count << 4) as u8,
        (((base + count) & 0x7F) << 1) as u8,
        a0,
        a1,
        a2,
        a3,
    ]
}

/// Slot range written by a load-vertices record, as `(base, count)`.
///
/// The base can come out negative on a malformed record.
pub fn vertex_cmd_range(cmd: &[u8]) -> (i32, usize) {
    let count = ((cmd[1] as usize) << 4) | (cmd[2] as usize >> 4);
    let base = (cmd[3] >> 1) as i32 - count as i32;
    (base, count)
}

/// Draw one triangle from three vertex buffer slots.
pub fn tri1_cmd(t: [u8; 3]) -> [u8; RECORD_SIZE] {
    [G_TRI1, t[0] << 1, t[1] << 1, t[2] << 1, 0, 0, 0, 0]
}

/// Draw two triangles from six vertex buffer slots.
pub fn tri2_cmd(t0: [u8; 3], t1: [u8; 3]) -> [u8; RECORD_SIZE] {
    [
        G_TRI2,
        t0[0] << 1,
        t0[1] << 1,
        t0[2] << 1,
        0,
        t1[0] << 1,
        t1[1] << 1,
        t1[2] << 1,
    ]
}

/// Call the display list at `address`.
pub fn branch_cmd(address: SegmentAddress) -> [u8; RECORD_SIZE] {
    let [a0, a1, a2, a3] = address.to_be_bytes();
    [G_DL, 0, 0, 0, a0, a1, a2, a3]
}
