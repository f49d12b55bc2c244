//! DiscJuggler (`.cdi`) containers
//!
//! The container's track tables are not decoded. The file is searched for the
//! Dreamcast hardware id instead, which is all that is recognized inside one.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use super::classification::DiscClassification;
use super::platforms::{dreamcast, PlatformRecord};

const KATANA_MAGIC: &[u8] = b"SEGA SEGAKATANA";
const CHUNK_SIZE: usize = 1024 * 1024;
const HEADER_LEN: usize = 2048;

/// Look for a Dreamcast header anywhere in the container
pub fn scan(path: &Path) -> (DiscClassification, PlatformRecord) {
    match scan_file(path) {
        Ok(Some(platform)) => (DiscClassification::DreamCast, platform),
        Ok(None) => {
            log::debug!("No Dreamcast header in {}", path.display());
            (DiscClassification::UnknownFormat, PlatformRecord::default())
        }
        Err(e) => {
            log::warn!("Failed to scan {}: {}", path.display(), e);
            (DiscClassification::UnknownFormat, PlatformRecord::default())
        }
    }
}

fn scan_file(path: &Path) -> io::Result<Option<PlatformRecord>> {
    let mut file = File::open(path)?;
    let Some(offset) = find_magic(&mut file, KATANA_MAGIC)? else {
        return Ok(None);
    };

    file.seek(SeekFrom::Start(offset))?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(dreamcast::parse_header(&header))
}

/// Byte offset of the first occurrence of `magic`
///
/// Consecutive chunks overlap by `magic.len() - 1` bytes so a match spanning
/// a chunk boundary is still found.
fn find_magic<R: Read>(reader: &mut R, magic: &[u8]) -> io::Result<Option<u64>> {
    let keep = magic.len().saturating_sub(1);
    let mut window: Vec<u8> = Vec::with_capacity(CHUNK_SIZE + keep);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    // File offset of window[0]
    let mut base: u64 = 0;

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok(None);
        }
        window.extend_from_slice(&chunk[..n]);

        if let Some(pos) = window.windows(magic.len()).position(|w| w == magic) {
            return Ok(Some(base + pos as u64));
        }

        let drop = window.len().saturating_sub(keep);
        window.drain(..drop);
        base += drop as u64;
    }
}
