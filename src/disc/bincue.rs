//! BIN/CUE disc image mounting
//!
//! Parses CUE sheet files into track extents: which BIN file each track lives
//! in, where its INDEX 01 starts and how its sectors are stored.

use std::path::{Path, PathBuf};

use cue_sheet::parser::{parse_cue, Command, TrackType};

use super::formats::ImageFormat;
use super::reader::{Disc, MountError, TrackExtent, RAW_SECTOR_SIZE};
use super::toc::{parse_msf, TrackMode};

/// Sector size of CD+G tracks (raw sector plus subcode)
const CDG_SECTOR_SIZE: u64 = 2448;

/// A track as declared in the cue sheet
#[derive(Debug, Clone)]
struct CueTrack {
    number: u32,
    mode: TrackMode,
    sector_size: u64,
    /// INDEX 01 position in frames, relative to the start of its FILE
    index01: u32,
}

/// A FILE entry and the tracks declared under it
#[derive(Debug)]
struct CueFile {
    name: String,
    tracks: Vec<CueTrack>,
}

/// Mount a CUE sheet and its BIN file(s)
///
/// # Arguments
/// * `cue_path` - Path to the CUE file (BIN files are resolved relative to it)
pub fn mount_cue(cue_path: &Path) -> Result<Disc, MountError> {
    // Read file as bytes to handle non-UTF-8 encodings (Latin-1, etc.)
    let cue_bytes = std::fs::read(cue_path)?;
    let cue_content = match String::from_utf8(cue_bytes) {
        Ok(s) => s,
        Err(e) => {
            log::info!("CUE file is not valid UTF-8, using lossy conversion");
            String::from_utf8_lossy(e.as_bytes()).to_string()
        }
    };

    let normalized = normalize_cue_keywords(&cue_content);
    let files = parse_cue_files(&normalized)?;

    let cue_dir = cue_path.parent().unwrap_or(Path::new("."));
    let mut extents = Vec::new();
    let mut file_base_lba = 0u32;

    for file in files.iter().filter(|f| !f.tracks.is_empty()) {
        let bin_path = resolve_bin_path(cue_dir, &file.name, Some(cue_path))?;
        let file_size = std::fs::metadata(&bin_path)?.len();
        let file_extents = layout_file(file, &bin_path, file_size, file_base_lba)?;

        if let Some(last) = file_extents.last() {
            file_base_lba = end_lba(last.start_lba, last.sector_count)?;
        }
        extents.extend(file_extents);
    }

    if extents.is_empty() {
        return Err(MountError::NoTracks(cue_path.to_path_buf()));
    }

    log::debug!(
        "Mounted {} with {} tracks, {} sectors",
        cue_path.display(),
        extents.len(),
        file_base_lba
    );

    Ok(Disc::from_extents(cue_path, ImageFormat::CueSheet, extents))
}

/// Group TRACK/INDEX 01 commands under their FILE entries
fn parse_cue_files(normalized: &str) -> Result<Vec<CueFile>, MountError> {
    let commands = parse_cue(normalized)
        .map_err(|e| MountError::CueParse(format!("Failed to parse CUE: {:?}", e)))?;

    // INDEX positions in line order; the parser yields Index commands in the same order
    let index_positions = index_positions(normalized);
    let mut next_index = 0;

    let mut files: Vec<CueFile> = Vec::new();
    let mut current_track: Option<(u32, TrackType)> = None;

    for cmd in &commands {
        match cmd {
            Command::File(filename, _format) => {
                files.push(CueFile {
                    name: filename.clone(),
                    tracks: Vec::new(),
                });
            }
            Command::Track(track_no, track_type) => {
                current_track = Some((*track_no as u32, track_type.clone()));
            }
            Command::Index(idx, _time) => {
                let position = index_positions.get(next_index).copied().flatten();
                next_index += 1;

                if *idx != 1 {
                    continue;
                }
                let (Some(file), Some((track_no, track_type))) = (files.last_mut(), &current_track) else {
                    continue;
                };
                let index01 = position.ok_or_else(|| {
                    MountError::CueParse(format!("Track {} has an unreadable INDEX 01", track_no))
                })?;
                let (sector_size, mode) = track_layout(track_type);
                if sector_size == 0 {
                    return Err(MountError::CueParse(format!("Track {} has a zero sector size", track_no)));
                }

                log::debug!(
                    "Track {}: {:?}, sector_size={}, index01={}",
                    track_no, mode, sector_size, index01
                );

                file.tracks.push(CueTrack {
                    number: *track_no,
                    mode,
                    sector_size,
                    index01,
                });
            }
            _ => {}
        }
    }

    Ok(files)
}

/// Compute the extents of all tracks stored in one BIN file
fn layout_file(
    file: &CueFile,
    bin_path: &Path,
    file_size: u64,
    file_base_lba: u32,
) -> Result<Vec<TrackExtent>, MountError> {
    let mut extents: Vec<TrackExtent> = Vec::with_capacity(file.tracks.len());
    let mut byte_offset = 0u64;

    for (i, track) in file.tracks.iter().enumerate() {
        if i == 0 {
            byte_offset = track.index01 as u64 * track.sector_size;
        } else {
            let prev = &file.tracks[i - 1];
            let gap = track.index01.checked_sub(prev.index01).ok_or_else(|| {
                MountError::CueParse(format!("Track {} starts before track {}", track.number, prev.number))
            })?;
            byte_offset += gap as u64 * prev.sector_size;
        }

        let sector_count = match file.tracks.get(i + 1) {
            Some(next) => next.index01.saturating_sub(track.index01),
            None => (file_size.saturating_sub(byte_offset) / track.sector_size) as u32,
        };

        let start_lba = end_lba(file_base_lba, track.index01)?;
        end_lba(start_lba, sector_count)?;

        extents.push(TrackExtent {
            number: track.number,
            start_lba,
            sector_count,
            file: bin_path.to_path_buf(),
            byte_offset,
            sector_size: track.sector_size,
            mode: track.mode,
        });
    }

    Ok(extents)
}

/// `start + count`, rejecting layouts that run past the addressable LBA range
fn end_lba(start: u32, count: u32) -> Result<u32, MountError> {
    start
        .checked_add(count)
        .ok_or_else(|| MountError::CueParse(format!("Track layout overflows at LBA {} + {}", start, count)))
}

/// Frame positions of every INDEX line, in order
fn index_positions(normalized: &str) -> Vec<Option<u32>> {
    normalized
        .lines()
        .map(str::trim)
        .filter(|line| line.to_uppercase().starts_with("INDEX"))
        .map(|line| line.split_whitespace().nth(2).and_then(parse_msf))
        .collect()
}

/// Normalize CUE file keywords for parser compatibility
fn normalize_cue_keywords(content: &str) -> String {
    let mut result = String::new();

    for line in content.lines() {
        let trimmed = line.trim();

        // Skip CATALOG lines (parser has issues with number parsing)
        if trimmed.starts_with("CATALOG") {
            continue;
        }

        // Handle FILE lines - strip quotes from filename (parser quirk)
        if let Some(rest) = trimmed.strip_prefix("FILE ") {
            let rest = rest.trim();
            if let Some(quoted) = rest.strip_prefix('"') {
                if let Some(end_quote) = quoted.find('"') {
                    let filename = &quoted[..end_quote];
                    let format = quoted[end_quote + 1..].trim();
                    result.push_str(&format!("FILE {} {}\n", filename, format));
                    continue;
                }
            }
        }

        result.push_str(line);
        result.push('\n');
    }

    // Fix case-sensitive file format keywords
    result
        .replace("BINARY", "Binary")
        .replace("MOTOROLA", "Motorola")
        .replace(" WAVE", " Wave")
        .replace(" MP3", " Mp3")
        .replace(" AIFF", " Aiff")
}

/// Get stored sector size and mode for a track type
fn track_layout(track_type: &TrackType) -> (u64, TrackMode) {
    match track_type {
        TrackType::Audio => (RAW_SECTOR_SIZE, TrackMode::Audio),
        TrackType::Cdg => (CDG_SECTOR_SIZE, TrackMode::Cdg),
        TrackType::Mode(mode, size) => {
            let mode = match *mode {
                1 => TrackMode::Mode1,
                2 => TrackMode::Mode2,
                _ => TrackMode::Audio,
            };
            (*size as u64, mode)
        }
        TrackType::Cdi(size) => (*size as u64, TrackMode::Cdi),
    }
}

/// Resolve BIN file path, trying different locations
fn resolve_bin_path(
    cue_dir: &Path,
    bin_filename: &str,
    cue_path: Option<&Path>,
) -> Result<PathBuf, MountError> {
    // Try the path as-is (relative to CUE dir)
    let bin_path = cue_dir.join(bin_filename);
    if bin_path.exists() {
        return Ok(bin_path);
    }

    // Try just the filename (in case the CUE has an absolute path)
    if let Some(filename) = Path::new(bin_filename).file_name() {
        let bin_path = cue_dir.join(filename);
        if bin_path.exists() {
            return Ok(bin_path);
        }
    }

    // Try common variations of the referenced filename
    let base = Path::new(bin_filename).file_stem().unwrap_or_default();
    for ext in &["bin", "BIN", "img", "IMG"] {
        let try_path = cue_dir.join(format!("{}.{}", base.to_string_lossy(), ext));
        if try_path.exists() {
            return Ok(try_path);
        }
    }

    // If CUE path provided, try using the CUE's basename with BIN extensions
    if let Some(cue_stem) = cue_path.and_then(|c| c.file_stem()) {
        for ext in &["bin", "BIN", "img", "IMG"] {
            let try_path = cue_dir.join(format!("{}.{}", cue_stem.to_string_lossy(), ext));
            if try_path.exists() {
                return Ok(try_path);
            }
        }
    }

    Err(MountError::BinNotFound(bin_path.display().to_string()))
}
