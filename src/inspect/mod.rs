//! Disc inspection
//!
//! Mounts an image, normalizes its ISO 9660 volume, classifies the platform
//! and extracts the platform header into one [`InspectionResult`].
//!
//! Every failure along the way is absorbed: a missing or unmountable image
//! yields an empty `UnknownFormat` result, unreadable sectors are skipped.

pub mod cache;
pub mod classification;
pub mod classifier;
pub mod discjuggler;
pub mod platforms;
pub mod result;
pub mod signature;
pub mod text;
pub mod volume;

use std::path::Path;

pub use cache::SectorCache;
pub use classification::DiscClassification;
pub use classifier::{Classifier, ScanMode};
pub use platforms::PlatformRecord;
pub use result::InspectionResult;
pub use volume::{DateField, FieldParseError, VolumeMetadata};

use crate::disc::iso9660::PVD_TYPE;
use crate::disc::{mount, parse_volume, ImageFormat, SectorReader};

/// Inspect a disc image
///
/// `forced` skips every detection heuristic and runs that platform's
/// extractor directly. `UnknownFormat` / `UnknownCDFS` count as not forced.
pub fn inspect(path: &Path, mode: ScanMode, forced: Option<DiscClassification>) -> InspectionResult {
    if !path.exists() {
        log::warn!("Image not found: {}", path.display());
        return InspectionResult::empty(path);
    }

    if mode.is_intensive() && ImageFormat::from_path(path) == Some(ImageFormat::DiscJuggler) {
        return inspect_container(path, forced);
    }

    let disc = match mount(path) {
        Ok(disc) => disc,
        Err(e) => {
            log::warn!("Failed to mount {}: {}", path.display(), e);
            return InspectionResult::empty(path);
        }
    };

    let view = disc.stream_view();
    let mut reader = disc.open_reader(view);
    let volume = read_volume(&mut reader);
    if volume.is_none() {
        log::debug!("{}: no ISO 9660 volume", path.display());
    }

    let tracks = disc.structure.track_summary();
    let data_tracks = disc.structure.data_track_lbas();

    let mut cache = SectorCache::new(Box::new(reader));
    let (classification, platform) = Classifier::new(
        &mut cache,
        volume.as_ref(),
        &data_tracks,
        tracks.total_audio_tracks > 0,
        mode,
    )
    .classify(forced);

    log::info!("{}: {} ({} sectors read)", path.display(), classification, cache.len());

    InspectionResult {
        path: path.to_path_buf(),
        classification,
        view: Some(view),
        volume,
        platform,
        tracks,
        structure: Some(disc.structure),
    }
}

/// Normalized primary volume (or the first descriptor when there is no primary)
fn read_volume(reader: &mut dyn SectorReader) -> Option<VolumeMetadata> {
    let iso = parse_volume(reader)?;
    let descriptor = iso
        .descriptors
        .iter()
        .find(|vd| vd.descriptor_type == PVD_TYPE)
        .or_else(|| iso.descriptors.first())?;
    Some(VolumeMetadata::from_descriptor(descriptor, iso.root))
}

fn inspect_container(path: &Path, forced: Option<DiscClassification>) -> InspectionResult {
    let mut result = InspectionResult::empty(path);
    match forced.filter(|kind| !kind.is_unknown()) {
        Some(kind) if kind != DiscClassification::DreamCast => {
            result.classification = kind;
        }
        _ => {
            let (classification, platform) = discjuggler::scan(path);
            result.classification = classification;
            result.platform = platform;
        }
    }
    log::info!("{}: {}", path.display(), result.classification);
    result
}

/// Full detection, intensive or quick
pub fn scan_disc(path: &Path, intensive: bool) -> InspectionResult {
    inspect(path, ScanMode::from_intensive(intensive), None)
}

/// Signatures and ISO 9660 presence only
pub fn scan_disc_quick(path: &Path) -> InspectionResult {
    inspect(path, ScanMode::Quick, None)
}

fn scan_as(path: &Path, kind: DiscClassification) -> InspectionResult {
    inspect(path, ScanMode::Intensive, Some(kind))
}

pub fn scan_psx(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::SonyPSX)
}

pub fn scan_ps2(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::SonyPS2)
}

pub fn scan_psp(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::SonyPSP)
}

pub fn scan_saturn(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::SegaSaturn)
}

pub fn scan_pcecd(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::PCEngineCD)
}

pub fn scan_pcfx(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::PCFX)
}

pub fn scan_segacd(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::SegaCD)
}

pub fn scan_cdi(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::PhilipsCDi)
}

pub fn scan_neogeocd(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::NeoGeoCD)
}

pub fn scan_dreamcast(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::DreamCast)
}

pub fn scan_3do(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::Panasonic3DO)
}

pub fn scan_amiga_cdtv(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::AmigaCDTV)
}

pub fn scan_amiga_cd32(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::AmigaCD32)
}

pub fn scan_playdia(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::BandaiPlaydia)
}

pub fn scan_gamecube(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::Gamecube)
}

pub fn scan_wii(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::Wii)
}

pub fn scan_towns(path: &Path) -> InspectionResult {
    scan_as(path, DiscClassification::FMTowns)
}
