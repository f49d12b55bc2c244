//! Disc mounting and logical sector reading
//!
//! Unified interface over the supported image containers: a mounted [`Disc`]
//! exposes its TOC and hands out a [`SectorReader`] for a chosen stream view.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::bincue;
use super::formats::{ImageFormat, SessionFormat, StreamView};
use super::toc::{DiscStructure, Session, Track, TrackKind, TrackMode};

/// Logical sector size for CD-ROM data (cooked)
pub const SECTOR_SIZE: u64 = 2048;

/// Raw CD-ROM sector size
pub const RAW_SECTOR_SIZE: u64 = 2352;

/// Errors that can occur when mounting disc images
#[derive(Error, Debug)]
pub enum MountError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CUE parse error: {0}")]
    CueParse(String),

    #[error("BIN file not found: {0}")]
    BinNotFound(String),

    #[error("No tracks found in {0}")]
    NoTracks(PathBuf),
}

/// Trait for reading 2048-byte logical sectors
pub trait SectorReader: Send {
    /// Read a single sector at the given LBA (Logical Block Address)
    fn read_sector(&mut self, lba: u32) -> Result<Vec<u8>, io::Error>;
}

/// Where a track's sectors live inside its backing file
#[derive(Debug, Clone)]
pub struct TrackExtent {
    /// Track number (1-based)
    pub number: u32,
    /// Absolute LBA of the first sector
    pub start_lba: u32,
    /// Number of sectors in this track
    pub sector_count: u32,
    /// Backing file
    pub file: PathBuf,
    /// Byte offset of the first sector within the file
    pub byte_offset: u64,
    /// Stored sector size (2048, 2336, 2352 or 2448)
    pub sector_size: u64,
    pub mode: TrackMode,
}

impl TrackExtent {
    fn contains(&self, lba: u32) -> bool {
        lba >= self.start_lba && lba - self.start_lba < self.sector_count
    }
}

/// A mounted disc image
#[derive(Debug, Clone)]
pub struct Disc {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub structure: DiscStructure,
    pub session1_format: SessionFormat,
    extents: Vec<TrackExtent>,
}

impl Disc {
    /// Build a single-session disc from its track extents
    pub(crate) fn from_extents(path: &Path, format: ImageFormat, extents: Vec<TrackExtent>) -> Self {
        let tracks = extents
            .iter()
            .map(|e| Track {
                number: e.number,
                lba: e.start_lba,
                kind: TrackKind::Track(e.mode),
            })
            .collect();
        let lead_out = extents
            .iter()
            .map(|e| e.start_lba.saturating_add(e.sector_count))
            .max()
            .unwrap_or(0);

        let session1_format = if extents.iter().any(|e| e.mode == TrackMode::Mode2) {
            SessionFormat::CdXa
        } else if extents.iter().any(|e| e.mode == TrackMode::Cdi) {
            SessionFormat::Cdi
        } else {
            SessionFormat::CdRomOrCdda
        };

        Self {
            path: path.to_path_buf(),
            format,
            structure: DiscStructure {
                sessions: vec![Session::bracketed(1, tracks, lead_out)],
            },
            session1_format,
            extents,
        }
    }

    /// Logical view matching the first session's format
    pub fn stream_view(&self) -> StreamView {
        StreamView::for_session(self.session1_format)
    }

    /// Open a sector reader over this disc using the given view
    pub fn open_reader(&self, view: StreamView) -> DiscSectorReader {
        DiscSectorReader {
            extents: self.extents.clone(),
            files: HashMap::new(),
            view,
        }
    }
}

/// Mount a disc image from a file path
///
/// # Returns
/// * `Ok(Disc)` - Successfully built the session/track layout
/// * `Err(MountError)` - Missing path, unsupported container or malformed image
pub fn mount(path: &Path) -> Result<Disc, MountError> {
    if !path.exists() {
        return Err(MountError::NotFound(path.to_path_buf()));
    }

    let format = ImageFormat::from_path(path).ok_or_else(|| {
        MountError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        )
    })?;

    match format {
        ImageFormat::CueSheet => bincue::mount_cue(path),
        ImageFormat::Iso => mount_iso(path),
        ImageFormat::DiscJuggler => Err(MountError::UnsupportedFormat(
            ImageFormat::DiscJuggler.display_name().to_string(),
        )),
    }
}

/// Mount a plain ISO as a single Mode 1 data track
fn mount_iso(path: &Path) -> Result<Disc, MountError> {
    let size = std::fs::metadata(path)?.len();
    let sector_count = (size / SECTOR_SIZE) as u32;
    if sector_count == 0 {
        return Err(MountError::NoTracks(path.to_path_buf()));
    }

    log::debug!("ISO image {}: {} sectors", path.display(), sector_count);

    let extent = TrackExtent {
        number: 1,
        start_lba: 0,
        sector_count,
        file: path.to_path_buf(),
        byte_offset: 0,
        sector_size: SECTOR_SIZE,
        mode: TrackMode::Mode1,
    };
    Ok(Disc::from_extents(path, ImageFormat::Iso, vec![extent]))
}

/// Sector reader over a mounted disc's track extents
pub struct DiscSectorReader {
    extents: Vec<TrackExtent>,
    files: HashMap<PathBuf, BufReader<File>>,
    view: StreamView,
}

impl DiscSectorReader {
    fn file_for(&mut self, path: &Path) -> Result<&mut BufReader<File>, io::Error> {
        if !self.files.contains_key(path) {
            let file = File::open(path)?;
            self.files.insert(path.to_path_buf(), BufReader::new(file));
        }
        self.files
            .get_mut(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

impl SectorReader for DiscSectorReader {
    fn read_sector(&mut self, lba: u32) -> Result<Vec<u8>, io::Error> {
        let extent = self
            .extents
            .iter()
            .find(|e| e.contains(lba))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("LBA {} is outside every track", lba))
            })?;

        let physical_offset = extent.byte_offset
            + (lba - extent.start_lba) as u64 * extent.sector_size
            + self.view.data_offset(extent.sector_size);

        let file = self.file_for(&extent.file)?;
        file.seek(SeekFrom::Start(physical_offset))?;
        let mut buffer = vec![0u8; SECTOR_SIZE as usize];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory sector reader that records every requested LBA
    #[derive(Default)]
    pub struct MemoryReader {
        sectors: HashMap<u32, Vec<u8>>,
        reads: Arc<Mutex<Vec<u32>>>,
    }

    impl MemoryReader {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store a sector, zero-padding `data` to 2048 bytes
        pub fn with_sector(mut self, lba: u32, data: &[u8]) -> Self {
            let mut sector = vec![0u8; SECTOR_SIZE as usize];
            sector[..data.len()].copy_from_slice(data);
            self.sectors.insert(lba, sector);
            self
        }

        /// Store a sector verbatim (may be short, to simulate a truncated read)
        pub fn with_raw(mut self, lba: u32, data: Vec<u8>) -> Self {
            self.sectors.insert(lba, data);
            self
        }

        /// Shared log of every LBA requested so far
        pub fn read_log(&self) -> Arc<Mutex<Vec<u32>>> {
            Arc::clone(&self.reads)
        }
    }

    impl SectorReader for MemoryReader {
        fn read_sector(&mut self, lba: u32) -> Result<Vec<u8>, io::Error> {
            if let Ok(mut reads) = self.reads.lock() {
                reads.push(lba);
            }
            self.sectors
                .get(&lba)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, format!("no sector {}", lba)))
        }
    }

    pub fn logged(log: &Arc<Mutex<Vec<u32>>>) -> Vec<u32> {
        log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}
