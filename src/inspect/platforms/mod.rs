//! Platform-specific metadata extractors
//!
//! Each extractor reads the sectors it needs through the inspection's cache
//! and fills a [`PlatformRecord`]. A missing marker or file entry leaves the
//! dependent fields absent.

pub mod dreamcast;
pub mod generic;
pub mod psx;
pub mod saturn;

use serde::Serialize;

use super::cache::SectorCache;
use super::classification::DiscClassification;
use super::volume::VolumeMetadata;

/// Platform metadata pulled from a disc header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformRecord {
    pub game_title: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<String>,
    pub manufacturer_id: Option<String>,
    pub publisher: Option<String>,
    /// Platform-defined date text
    pub internal_date: Option<String>,
    pub device_information: Option<String>,
    pub area_codes: Option<String>,
    pub peripheral_codes: Option<String>,
    pub media_id: Option<String>,
    pub media_info: Option<String>,
}

/// What an extractor gets to work with
pub struct ExtractContext<'a> {
    pub cache: &'a mut SectorCache,
    pub volume: Option<&'a VolumeMetadata>,
    /// Start LBAs of the data tracks, in TOC order
    pub data_tracks: &'a [u32],
}

/// Returns `None` when the platform's header could not be found at all
pub type Extractor = fn(&mut ExtractContext<'_>) -> Option<PlatformRecord>;

/// Platforms that have a metadata extractor
const EXTRACTORS: &[(DiscClassification, Extractor)] = &[
    (DiscClassification::SonyPSX, psx::extract),
    (DiscClassification::SonyPS2, psx::extract),
    (DiscClassification::SegaSaturn, saturn::extract),
    (DiscClassification::DreamCast, dreamcast::extract),
    (DiscClassification::PCFX, generic::extract_pcfx),
    (DiscClassification::PCEngineCD, generic::extract_pc_engine),
];

/// Look up the extractor for a classification
pub fn extractor_for(kind: DiscClassification) -> Option<Extractor> {
    EXTRACTORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, extractor)| *extractor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table() {
        assert!(extractor_for(DiscClassification::SonyPSX).is_some());
        assert!(extractor_for(DiscClassification::SonyPS2).is_some());
        assert!(extractor_for(DiscClassification::SegaSaturn).is_some());
        assert!(extractor_for(DiscClassification::DreamCast).is_some());
        assert!(extractor_for(DiscClassification::PCFX).is_some());
        assert!(extractor_for(DiscClassification::PCEngineCD).is_some());
        assert!(extractor_for(DiscClassification::Gamecube).is_none());
        assert!(extractor_for(DiscClassification::UnknownFormat).is_none());
    }
}
