//! The decoded scene graph.
//!
//! A [`Room`] owns an ordered list of top-level [`Group`]s and an ordered list
//! of [`Material`]s. Triangles hold their vertices by value and refer to their
//! material by [`MaterialId`], so groups can be moved between rooms and
//! restructured in place without any shared ownership.

mod material;
mod ops;
mod partition;

pub use material::{Material, MaterialId, PLACEHOLDER_MATERIAL};
pub use partition::MAX_DIVISION;

use crate::types::{BoundingBox, SegmentAddress, Vertex};
use glam::IVec3;
use serde::Serialize;

/// A triangle with its own copy of each vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    /// Draw state in effect when the triangle was decoded.
    pub material: Option<MaterialId>,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], material: Option<MaterialId>) -> Self {
        Self { vertices, material }
    }

    /// Mean of the three vertex positions, truncated toward zero.
    pub fn centroid(&self) -> IVec3 {
        let sum = self.vertices[0].pos() + self.vertices[1].pos() + self.vertices[2].pos();
        sum / 3
    }

    /// The three vertex positions.
    pub fn positions(&self) -> [IVec3; 3] {
        self.vertices.map(|v| v.pos())
    }
}

/// An ordered run of triangles, optionally with child groups.
///
/// Children only exist after spatial division.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// Triangles in draw order.
    pub triangles: Vec<Triangle>,
    /// Child groups, in cell scan order.
    pub children: Vec<Group>,
    /// The cell this group covers, set by division.
    pub bounds: Option<BoundingBox>,
    /// Address of this group's display list in the last encoded output.
    pub written_at: Option<SegmentAddress>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            ..Self::default()
        }
    }

    /// Number of triangles in this group and all of its descendants.
    pub fn total_triangles(&self) -> usize {
        self.triangles.len()
            + self
                .children
                .iter()
                .map(Group::total_triangles)
                .sum::<usize>()
    }

    /// Bounds over every vertex of this group's own triangles.
    pub fn vertex_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.triangles.iter().flat_map(|t| t.positions()))
    }
}

/// A decoded room: groups plus the materials their triangles use.
#[derive(Debug, Clone, Default)]
pub struct Room {
    /// Top-level groups, as siblings.
    pub groups: Vec<Group>,
    materials: Vec<Material>,
    next_material_id: u32,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materials in list order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    /// Look up a material by id.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Insert a group at the head of the top-level list.
    pub fn prepend_group(&mut self, group: Group) {
        self.groups.insert(0, group);
    }

    /// Number of triangles across the whole graph.
    pub fn total_triangles(&self) -> usize {
        self.groups.iter().map(Group::total_triangles).sum()
    }

    /// Bounds over every triangle vertex in the whole graph.
    pub fn bounds(&self) -> BoundingBox {
        fn visit(group: &Group, bounds: &mut BoundingBox) {
            for t in &group.triangles {
                for p in t.positions() {
                    bounds.include(p);
                }
            }
            for child in &group.children {
                visit(child, bounds);
            }
        }

        let mut bounds = BoundingBox::empty();
        for group in &self.groups {
            visit(group, &mut bounds);
        }
        bounds
    }

    /// Summarize the room for reporting.
    pub fn summary(&self) -> RoomSummary {
        let bounds = self.bounds();
        RoomSummary {
            groups: self.groups.len(),
            triangles: self.total_triangles(),
            materials: self.materials.len(),
            group_triangles: self.groups.iter().map(Group::total_triangles).collect(),
            bounds: (!bounds.is_empty()).then_some(bounds),
        }
    }
}

/// Counts describing a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    /// Number of top-level groups.
    pub groups: usize,
    /// Total triangle count, including children.
    pub triangles: usize,
    /// Number of distinct materials.
    pub materials: usize,
    /// Triangle count per top-level group.
    pub group_triangles: Vec<usize>,
    /// Bounds over all vertices, absent for an empty room.
    pub bounds: Option<BoundingBox>,
}
