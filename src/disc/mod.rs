//! Disc image handling module
//!
//! Mounts CUE/BIN and ISO images into a session/track layout, reads 2048-byte
//! logical sectors and decodes ISO 9660 volume descriptors.

mod bincue;
mod formats;
pub mod iso9660;
mod reader;
mod toc;

pub use formats::{ImageFormat, SessionFormat, StreamView};
pub use iso9660::{parse_volume, IsoEntry, IsoVolume, VolumeDescriptor};
pub use reader::{mount, Disc, DiscSectorReader, MountError, SectorReader, TrackExtent, SECTOR_SIZE};
pub use toc::{DiscStructure, Session, Track, TrackKind, TrackMode, TrackSummary};

#[cfg(test)]
pub(crate) use reader::testing;
