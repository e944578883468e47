//! Greedy vertex-batch packing.
//!
//! Triangles are packed into a batch until one of them needs a vertex that
//! no longer fits in the 32-slot hardware buffer. The batch is then flushed:
//! its vertices go to the main output, and a load-vertices command followed
//! by the batch's draw commands goes to the group's display list.

use crate::gbi::{self, VERTEX_BUFFER_SLOTS};
use crate::room::Triangle;
use crate::types::{SegmentAddress, Vertex};

/// Distinct vertices staged for one load, plus the triangles drawn from them.
#[derive(Debug, Default)]
pub(crate) struct Batch {
    vertices: Vec<Vertex>,
    triangles: Vec<[u8; 3]>,
}

impl Batch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(VERTEX_BUFFER_SLOTS),
            triangles: Vec::new(),
        }
    }

    /// Add a triangle, reusing any vertex already staged.
    ///
    /// Returns `false` and leaves the batch untouched if the triangle's new
    /// vertices would not fit.
    pub fn try_add(&mut self, triangle: &Triangle) -> bool {
        let mark = self.vertices.len();
        let mut slots = [0u8; 3];

        for (slot, vertex) in slots.iter_mut().zip(&triangle.vertices) {
            match self.vertices.iter().position(|v| v == vertex) {
                Some(i) => *slot = i as u8,
                None if self.vertices.len() < VERTEX_BUFFER_SLOTS => {
                    *slot = self.vertices.len() as u8;
                    self.vertices.push(*vertex);
                }
                None => {
                    self.vertices.truncate(mark);
                    return false;
                }
            }
        }

        self.triangles.push(slots);
        true
    }

    /// Write the staged vertices to `out` and the load and draw commands to
    /// `display_list`, then reset. Does nothing on an empty batch.
    pub fn flush(&mut self, out: &mut Vec<u8>, display_list: &mut Vec<u8>) {
        if self.triangles.is_empty() {
            self.vertices.clear();
            return;
        }

        let address = SegmentAddress::room(out.len());
        for vertex in &self.vertices {
            out.extend_from_slice(&vertex.to_bytes());
        }
        display_list.extend_from_slice(&gbi::vertex_cmd(address, self.vertices.len(), 0));

        for pair in self.triangles.chunks(2) {
            match *pair {
                [a, b] => display_list.extend_from_slice(&gbi::tri2_cmd(a, b)),
                [a] => display_list.extend_from_slice(&gbi::tri1_cmd(a)),
                _ => {}
            }
        }

        log::debug!(
            "  flushed {} vertices, {} triangles at {}",
            self.vertices.len(),
            self.triangles.len(),
            address
        );
        self.vertices.clear();
        self.triangles.clear();
    }
}
