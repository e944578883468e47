//! Whole-room graph operations.

use super::{Group, MaterialId, Room};

impl Room {
    /// Append `other`'s materials and groups after this room's own.
    ///
    /// `other` is consumed; its material ids are renumbered so they stay
    /// unique within this room.
    pub fn merge(&mut self, mut other: Room) {
        let offset = self.next_material_id;
        for material in &mut other.materials {
            material.id = MaterialId(material.id.0 + offset);
        }
        for group in &mut other.groups {
            renumber_materials(group, offset);
        }

        self.next_material_id += other.next_material_id;
        self.materials.append(&mut other.materials);
        self.groups.append(&mut other.groups);
    }

    /// Collapse every group into one childless top-level group.
    ///
    /// Each group's children are folded into it depth first, then every
    /// sibling's triangles are appended to the first group in order. Does
    /// nothing on a room without groups.
    pub fn flatten(&mut self) {
        let mut siblings = std::mem::take(&mut self.groups).into_iter();
        let Some(mut first) = siblings.next() else {
            return;
        };

        absorb_children(&mut first);
        for mut sibling in siblings {
            absorb_children(&mut sibling);
            first.triangles.append(&mut sibling.triangles);
        }

        first.bounds = None;
        first.written_at = None;
        log::debug!("flattened room into {} triangles", first.triangles.len());
        self.groups.push(first);
    }
}

fn renumber_materials(group: &mut Group, offset: u32) {
    for triangle in &mut group.triangles {
        if let Some(id) = &mut triangle.material {
            id.0 += offset;
        }
    }
    for child in &mut group.children {
        renumber_materials(child, offset);
    }
}

/// Move every descendant's triangles into `group`, children in order, each
/// child's own children before its next sibling.
fn absorb_children(group: &mut Group) {
    for mut child in std::mem::take(&mut group.children) {
        absorb_children(&mut child);
        group.triangles.append(&mut child.triangles);
    }
}
