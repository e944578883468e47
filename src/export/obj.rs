//! Wavefront OBJ export.
//!
//! Every triangle gets its own three `v` lines, so faces never share
//! vertices and indices simply count up from 1. Each group becomes a `g`
//! line named after its path in the graph (`group_0`, `group_0_3`, ...),
//! followed by its own triangles and then its children.

use crate::error::Result;
use crate::room::{Group, Room};
use std::io::{self, Write};

/// Export a room to OBJ text.
pub fn export_obj(room: &Room) -> Result<String> {
    // ~3 vertex lines plus a face line per triangle
    let mut buf = Vec::with_capacity(64 + room.total_triangles() * 80);
    write_obj(room, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a room as OBJ text to `out`.
pub fn write_obj<W: Write>(room: &Room, out: W) -> Result<()> {
    let mut writer = ObjWriter::new(out);
    for (i, group) in room.groups.iter().enumerate() {
        writer.write_group(group, &format!("group_{}", i))?;
    }
    writer.finish()?;
    Ok(())
}

/// Output handle plus the index the next vertex line will get.
struct ObjWriter<W: Write> {
    out: W,
    next_vertex: usize,
}

impl<W: Write> ObjWriter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            next_vertex: 1,
        }
    }

    fn write_group(&mut self, group: &Group, name: &str) -> io::Result<()> {
        writeln!(self.out, "g {}", name)?;

        for triangle in &group.triangles {
            for v in &triangle.vertices {
                let [x, y, z] = v.position;
                writeln!(self.out, "v {} {} {}", x, y, z)?;
            }
            let v = self.next_vertex;
            writeln!(self.out, "f {} {} {}", v, v + 1, v + 2)?;
            self.next_vertex += 3;
        }

        for (i, child) in group.children.iter().enumerate() {
            self.write_group(child, &format!("{}_{}", name, i))?;
        }
        Ok(())
    }

    fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}
