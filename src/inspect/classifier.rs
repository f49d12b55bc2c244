//! Disc-type classification
//!
//! Order of evaluation:
//! 1. a forced platform is taken as-is and goes straight to its extractor
//! 2. fixed-sector signatures (Saturn, PlayStation, PSP)
//! 3. Dreamcast IP.BIN probe when the ISO system id names the Katana
//! 4. intensive mode only: marker search in the sector after each data track start
//! 5. `UnknownCDFS` for an unrecognized ISO, `AudioCD` for audio-only discs

use super::cache::SectorCache;
use super::classification::DiscClassification;
use super::platforms::generic::{self, PCFX_MARKER, PC_ENGINE_MARKER};
use super::platforms::{dreamcast, extractor_for, ExtractContext, PlatformRecord};
use super::signature;
use super::text::find_ignore_case;
use super::volume::VolumeMetadata;

const KATANA_SYSTEM_ID: &str = "SEGAKATANA";
const SONY_MARKER: &str = "sony computer";
const SATURN_MARKER: &str = "segasaturn";

/// How hard to look before giving up on a disc
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Signatures and ISO9660 presence only
    Quick,
    /// Also scan data tracks for platform markers and open DiscJuggler containers
    #[default]
    Intensive,
}

impl ScanMode {
    pub fn from_intensive(intensive: bool) -> Self {
        if intensive {
            Self::Intensive
        } else {
            Self::Quick
        }
    }

    pub fn is_intensive(&self) -> bool {
        matches!(self, Self::Intensive)
    }
}

/// Outcome of the data-track marker scan
enum TrackHit {
    /// Platform identified and its metadata already taken from the matching sector
    Resolved(DiscClassification, PlatformRecord),
    /// Platform identified; its extractor still has to run
    Deferred(DiscClassification),
}

pub struct Classifier<'a> {
    cache: &'a mut SectorCache,
    volume: Option<&'a VolumeMetadata>,
    data_tracks: &'a [u32],
    has_audio: bool,
    mode: ScanMode,
}

impl<'a> Classifier<'a> {
    pub fn new(
        cache: &'a mut SectorCache,
        volume: Option<&'a VolumeMetadata>,
        data_tracks: &'a [u32],
        has_audio: bool,
        mode: ScanMode,
    ) -> Self {
        Self {
            cache,
            volume,
            data_tracks,
            has_audio,
            mode,
        }
    }

    /// Classify the disc and extract its platform metadata
    pub fn classify(&mut self, forced: Option<DiscClassification>) -> (DiscClassification, PlatformRecord) {
        if let Some(kind) = forced.filter(|kind| !kind.is_unknown()) {
            log::debug!("Platform forced to {}", kind);
            let platform = self.extract(kind);
            return (kind, platform);
        }

        let mut kind = signature::detect(self.cache);
        if !kind.is_unknown() {
            log::debug!("Signature match: {}", kind);
        }

        if kind.is_unknown() && self.is_katana_volume() {
            if let Some(platform) = dreamcast::extract(&mut self.context()) {
                return (DiscClassification::DreamCast, platform);
            }
        }

        if kind.is_unknown() && self.mode.is_intensive() {
            match self.scan_data_tracks() {
                Some(TrackHit::Resolved(found, platform)) => return (found, platform),
                Some(TrackHit::Deferred(found)) => kind = found,
                None => {}
            }
        }

        if kind.is_unknown() {
            if self.volume.is_some() {
                kind = DiscClassification::UnknownCDFS;
            } else if self.data_tracks.is_empty() && self.has_audio {
                kind = DiscClassification::AudioCD;
            }
        }

        let platform = self.extract(kind);
        (kind, platform)
    }

    fn context(&mut self) -> ExtractContext<'_> {
        ExtractContext {
            cache: self.cache,
            volume: self.volume,
            data_tracks: self.data_tracks,
        }
    }

    fn is_katana_volume(&self) -> bool {
        self.volume
            .is_some_and(|v| v.system_identifier.contains(KATANA_SYSTEM_ID))
    }

    /// Run the classification's extractor, if it has one
    fn extract(&mut self, kind: DiscClassification) -> PlatformRecord {
        extractor_for(kind)
            .and_then(|extractor| extractor(&mut self.context()))
            .unwrap_or_default()
    }

    /// First data track whose `lba + 1` sector carries a known marker wins
    fn scan_data_tracks(&mut self) -> Option<TrackHit> {
        for &lba in self.data_tracks {
            let probe = lba.saturating_add(1);
            let Some(sector) = self.cache.read(probe) else {
                log::debug!("Track at LBA {}: sector {} unreadable, skipping", lba, probe);
                continue;
            };

            if find_ignore_case(sector, PCFX_MARKER).is_some() {
                return Some(TrackHit::Resolved(DiscClassification::PCFX, generic::record_from_sector(sector)));
            }
            if find_ignore_case(sector, PC_ENGINE_MARKER).is_some() {
                return Some(TrackHit::Resolved(
                    DiscClassification::PCEngineCD,
                    generic::record_from_sector(sector),
                ));
            }
            if find_ignore_case(sector, SONY_MARKER).is_some() {
                return Some(TrackHit::Deferred(DiscClassification::SonyPSX));
            }
            if find_ignore_case(sector, SATURN_MARKER).is_some() {
                return Some(TrackHit::Deferred(DiscClassification::SegaSaturn));
            }
        }
        None
    }
}
