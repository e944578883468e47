//! Spatial subdivision of a flattened room.
//!
//! The single top-level group is split into a grid of `n * n * n` cubic
//! cells, one child group per cell, and each child is split again for every
//! further division level. Triangles are assigned by centroid.

use super::{Group, Room};
use crate::error::{Result, ZroomError};
use crate::types::BoundingBox;
use glam::IVec3;

/// Largest grid size per division level.
pub const MAX_DIVISION: u32 = 64;

impl Room {
    /// Subdivide the room's only group, one grid level per entry in
    /// `divisions`.
    ///
    /// Fails without touching the room unless it is flattened: a single
    /// top-level group with no children. A room without groups is left alone.
    pub fn divide(&mut self, divisions: &[u32]) -> Result<()> {
        if self.groups.len() > 1 {
            return Err(ZroomError::NotFlattened(self.groups.len()));
        }
        if let Some(&bad) = divisions.iter().find(|&&d| d == 0 || d > MAX_DIVISION) {
            return Err(ZroomError::InvalidDivision(bad));
        }
        let Some(group) = self.groups.first_mut() else {
            return Ok(());
        };
        if !group.children.is_empty() {
            return Err(ZroomError::NotFlattened(1));
        }

        let bounds = group.vertex_bounds();
        log::debug!("dividing {} triangles by {:?}", group.triangles.len(), divisions);
        divide_group(group, bounds, divisions);
        Ok(())
    }
}

fn divide_group(group: &mut Group, bounds: BoundingBox, divisions: &[u32]) {
    let Some((&count, rest)) = divisions.split_first() else {
        return;
    };
    let count = count as i32;

    let mut largest = bounds.largest_extent();
    if largest % count != 0 {
        largest += count - largest % count;
    }
    let cell_size = largest / count;
    let cube = cube_around(bounds, largest);
    group.bounds = Some(cube);

    let mut remaining = std::mem::take(&mut group.triangles);
    for x in 0..count {
        for y in 0..count {
            for z in 0..count {
                let min = cube.min + IVec3::new(x, y, z) * cell_size;
                let cell = BoundingBox::new(min, min + IVec3::splat(cell_size));

                let (inside, outside) = remaining
                    .into_iter()
                    .partition(|t| cell.contains(t.centroid()));
                remaining = outside;

                let mut child = Group::with_triangles(inside);
                child.bounds = Some(cell);
                divide_group(&mut child, cell, rest);
                group.children.push(child);
            }
        }
    }

    if !remaining.is_empty() {
        log::debug!("{} triangles matched no cell", remaining.len());
    }
    group.triangles = remaining;
}

/// Grow `bounds` into a cube of edge `size`, one unit at a time per axis,
/// alternating between the max and min side, max first.
fn cube_around(bounds: BoundingBox, size: i32) -> BoundingBox {
    if bounds.is_empty() {
        return BoundingBox::new(IVec3::ZERO, IVec3::splat(size));
    }

    let grow = IVec3::splat(size) - bounds.dimensions();
    let toward_max = (grow + IVec3::ONE) / 2;
    let toward_min = grow / 2;
    BoundingBox::new(bounds.min - toward_min, bounds.max + toward_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{tri, unique_tri};
    use crate::room::Triangle;

    /// A small triangle whose centroid is exactly `c`.
    fn tri_at(c: [i16; 3]) -> Triangle {
        tri(
            [c[0] - 1, c[1], c[2]],
            [c[0] + 1, c[1], c[2]],
            [c[0], c[1], c[2]],
        )
    }

    fn flat_room(triangles: Vec<Triangle>) -> Room {
        let mut room = Room::new();
        room.groups.push(Group::with_triangles(triangles));
        room
    }

    #[test]
    fn test_cube_around_alternates_max_first() {
        let bounds = BoundingBox::new(IVec3::new(0, 0, 0), IVec3::new(10, 7, 4));
        let cube = cube_around(bounds, 10);
        assert_eq!(cube.dimensions(), IVec3::splat(10));
        assert_eq!(cube.min, IVec3::new(0, -1, -3));
        assert_eq!(cube.max, IVec3::new(10, 9, 7));
    }

    #[test]
    fn test_divide_into_eight() {
        let triangles: Vec<Triangle> = [
            [-100, -100, -100],
            [100, 100, 100],
            [-50, 60, -70],
            [80, -10, 30],
            [0, 0, 0],
            [-1, 99, 1],
        ]
        .into_iter()
        .map(tri_at)
        .collect();
        let total = triangles.len();
        let mut room = flat_room(triangles);

        room.divide(&[2]).unwrap();

        let group = &room.groups[0];
        assert_eq!(group.children.len(), 8);
        let assigned: usize = group.children.iter().map(|c| c.triangles.len()).sum();
        assert_eq!(assigned + group.triangles.len(), total);

        for child in &group.children {
            let cell = child.bounds.unwrap();
            for t in &child.triangles {
                assert!(cell.contains(t.centroid()));
            }
        }
        // first matching cell wins; the origin lies on every cell's corner
        assert!(group.children[0]
            .triangles
            .iter()
            .any(|t| t.centroid() == IVec3::ZERO));
    }

    #[test]
    fn test_cells_cover_rounded_cube() {
        // extent 101 rounds up to 102 for two divisions
        let mut room = flat_room(vec![tri_at([0, 0, 0]), tri_at([99, 0, 0])]);
        room.divide(&[2]).unwrap();

        let group = &room.groups[0];
        let cube = group.bounds.unwrap();
        assert_eq!(cube.dimensions(), IVec3::splat(102));
        assert_eq!(cube.min.x, -1);
        for child in &group.children {
            assert_eq!(child.bounds.unwrap().dimensions(), IVec3::splat(51));
        }
        assert!(group.triangles.is_empty());
    }

    #[test]
    fn test_cell_scan_order_is_x_major() {
        let mut room = flat_room(vec![tri_at([100, 0, 0]), tri_at([0, 0, 100])]);
        room.divide(&[2]).unwrap();

        let children = &room.groups[0].children;
        // z varies fastest, x slowest
        assert!(children[1].triangles.iter().any(|t| t.centroid().z == 100));
        assert!(children[4].triangles.iter().any(|t| t.centroid().x == 100));
    }

    #[test]
    fn test_two_levels() {
        let triangles: Vec<Triangle> = (0..20).map(|n| unique_tri(n * 5)).collect();
        let mut room = flat_room(triangles);
        room.divide(&[2, 2]).unwrap();

        let group = &room.groups[0];
        assert_eq!(group.children.len(), 8);
        for child in &group.children {
            assert_eq!(child.children.len(), 8);
            for grandchild in &child.children {
                assert!(grandchild.children.is_empty());
            }
        }
        assert_eq!(room.total_triangles(), 20);
    }

    #[test]
    fn test_divide_requires_flattened_room() {
        let mut room = flat_room(vec![unique_tri(0)]);
        room.groups.push(Group::with_triangles(vec![unique_tri(1)]));

        assert!(matches!(room.divide(&[2]), Err(ZroomError::NotFlattened(2))));
        assert_eq!(room.groups.len(), 2);
        assert!(room.groups.iter().all(|g| g.children.is_empty()));
        assert_eq!(room.groups[0].triangles.len(), 1);
    }

    #[test]
    fn test_divide_twice_fails() {
        let mut room = flat_room(vec![unique_tri(0)]);
        room.divide(&[2]).unwrap();
        assert!(matches!(room.divide(&[2]), Err(ZroomError::NotFlattened(1))));
    }

    #[test]
    fn test_zero_division_rejected() {
        let mut room = flat_room(vec![unique_tri(0)]);
        assert!(matches!(
            room.divide(&[2, 0]),
            Err(ZroomError::InvalidDivision(0))
        ));
        assert!(room.groups[0].children.is_empty());
    }

    #[test]
    fn test_oversized_division_rejected() {
        let mut room = flat_room(vec![unique_tri(0), unique_tri(1)]);
        assert!(matches!(
            room.divide(&[3_000_000_000]),
            Err(ZroomError::InvalidDivision(3_000_000_000))
        ));
        assert!(matches!(
            room.divide(&[2, MAX_DIVISION + 1]),
            Err(ZroomError::InvalidDivision(65))
        ));
        assert!(room.groups[0].children.is_empty());
        assert_eq!(room.groups[0].triangles.len(), 2);
    }

    #[test]
    fn test_empty_group_divides_into_empty_cells() {
        let mut room = flat_room(Vec::new());
        room.divide(&[2]).unwrap();
        assert_eq!(room.groups[0].children.len(), 8);
        assert_eq!(room.total_triangles(), 0);
    }

    #[test]
    fn test_divide_empty_room_is_noop() {
        let mut room = Room::new();
        room.divide(&[2]).unwrap();
        assert!(room.groups.is_empty());
    }
}
