//! # zroomutil
//!
//! Read, restructure and write Zelda 64 room geometry.
//!
//! ## Overview
//!
//! A room file is decoded into a [`Room`]: an ordered list of [`Group`]s of
//! triangles, one group per display list, plus the deduplicated material
//! runs those triangles were drawn with. Rooms can be merged, flattened into
//! a single group, and divided into a grid of spatial cells, then written
//! back out as a zroom file or as Wavefront OBJ text.
//!
//! ## Quick Start
//!
//! ```ignore
//! use zroomutil::{load_room, save_zroom, EncoderConfig};
//!
//! let mut room = load_room("room_0.zmap")?;
//! room.merge(load_room("room_1.zmap")?);
//! room.flatten();
//! room.divide(&[2])?;
//!
//! save_zroom(&mut room, "out.zroom", &EncoderConfig::default())?;
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod export;
pub mod gbi;
pub mod room;
pub mod segment;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export main types for convenience
pub use decode::{decode_room, Decoder, DecoderConfig, MaterialPolicy};
pub use encode::{encode_room, EncoderConfig, ZroomEncoder};
pub use error::{Result, ZroomError};
pub use export::{export_obj, write_obj};
pub use room::{Group, Material, MaterialId, Room, RoomSummary, Triangle};
pub use types::{BoundingBox, SegmentAddress, Vertex};

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Load and decode a room file with the default configuration.
pub fn load_room<P: AsRef<Path>>(path: P) -> Result<Room> {
    load_room_with_config(path, &DecoderConfig::default())
}

pub fn load_room_with_config<P: AsRef<Path>>(path: P, config: &DecoderConfig) -> Result<Room> {
    let path = path.as_ref();
    log::info!("loading room {}", path.display());
    let data = fs::read(path)?;
    decode_room(&data, config)
}

/// Decode a room already in memory with the default configuration.
pub fn load_room_from_bytes(data: &[u8]) -> Result<Room> {
    decode_room(data, &DecoderConfig::default())
}

/// Encode `room` and write it to `path`.
///
/// The room is updated with the address each group and material was
/// written at.
pub fn save_zroom<P: AsRef<Path>>(room: &mut Room, path: P, config: &EncoderConfig) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_room(room, config)?;
    fs::write(path, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Write `room` to `path` as Wavefront OBJ.
pub fn save_wavefront<P: AsRef<Path>>(room: &Room, path: P) -> Result<()> {
    let path = path.as_ref();
    write_obj(room, BufWriter::new(File::create(path)?))?;
    log::info!("wrote wavefront {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{vtx, DisplayList, RoomFile};

    fn sample_room_file() -> Vec<u8> {
        let mut file = RoomFile::new();
        let verts = file.push_vertices(&[
            vtx([0, 0, 0]),
            vtx([100, 0, 0]),
            vtx([0, 100, 0]),
            vtx([100, 100, 0]),
        ]);
        let a = file.push(
            &DisplayList::new()
                .record([0xE7, 0, 0, 0, 0, 0, 0, 0])
                .load(verts, 4, 0)
                .tri2([0, 1, 2], [1, 3, 2])
                .end(),
        );
        let b = file.push(&DisplayList::new().load(verts, 3, 0).tri1([2, 1, 0]).end());
        file.finish(&[(a, SegmentAddress::NULL), (SegmentAddress::NULL, b)])
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room.zmap");
        fs::write(&path, sample_room_file()).unwrap();

        let room = load_room(&path).unwrap();
        assert_eq!(room.groups.len(), 2);
        assert_eq!(room.total_triangles(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_room(dir.path().join("absent.zmap")),
            Err(ZroomError::Io(_))
        ));
    }

    #[test]
    fn test_zroom_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zroom");

        let mut room = load_room_from_bytes(&sample_room_file()).unwrap();
        room.flatten();
        save_zroom(&mut room, &path, &EncoderConfig::default()).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(written.len() % 16, 0);
        let group_at = room.groups[0].written_at.unwrap();

        // the written mesh header is type 0x00, so walk its one list directly
        let decoder = Decoder::new(&written, DecoderConfig::default());
        let mut reread = Room::new();
        decoder.decode_display_list(&mut reread, group_at).unwrap();
        // decoding stores triangles most recent first
        let written: Vec<[Vertex; 3]> =
            room.groups[0].triangles.iter().map(|t| t.vertices).collect();
        let mut decoded: Vec<[Vertex; 3]> =
            reread.groups[0].triangles.iter().map(|t| t.vertices).collect();
        decoded.reverse();
        assert_eq!(decoded, written);
    }

    #[test]
    fn test_save_wavefront() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.obj");

        let room = load_room_from_bytes(&sample_room_file()).unwrap();
        save_wavefront(&room, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, export_obj(&room).unwrap());
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 3);
    }
}
