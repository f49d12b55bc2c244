//! Final per-image inspection result

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::classification::DiscClassification;
use super::platforms::PlatformRecord;
use super::volume::VolumeMetadata;
use crate::disc::{DiscStructure, StreamView, TrackSummary};

/// Everything learned about one disc image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionResult {
    pub path: PathBuf,
    pub classification: DiscClassification,
    /// Logical view used for 2048-byte reads; absent when nothing was mounted
    pub view: Option<StreamView>,
    /// Normalized ISO 9660 primary volume, when the disc has one
    pub volume: Option<VolumeMetadata>,
    pub platform: PlatformRecord,
    pub tracks: TrackSummary,
    pub structure: Option<DiscStructure>,
}

impl InspectionResult {
    /// `UnknownFormat` with nothing filled in
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            classification: DiscClassification::UnknownFormat,
            view: None,
            volume: None,
            platform: PlatformRecord::default(),
            tracks: TrackSummary::default(),
            structure: None,
        }
    }

    /// Serial number if the platform header provided one
    pub fn serial_number(&self) -> Option<&str> {
        self.platform.serial_number.as_deref()
    }

    /// Best available title: the platform header's, else the ISO volume label
    pub fn title(&self) -> Option<&str> {
        self.platform.game_title.as_deref().filter(|t| !t.is_empty()).or_else(|| {
            self.volume
                .as_ref()
                .map(|v| v.volume_identifier.as_str())
                .filter(|label| !label.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = InspectionResult::empty(Path::new("/games/disc.cue"));
        assert_eq!(result.classification, DiscClassification::UnknownFormat);
        assert_eq!(result.tracks.total_tracks, 0);
        assert!(result.volume.is_none());
        assert_eq!(result.title(), None);
    }

    #[test]
    fn test_title_falls_back_to_volume_label() {
        let mut result = InspectionResult::empty(Path::new("disc.iso"));
        result.volume = Some(VolumeMetadata {
            volume_identifier: "RIDGE_RACER".to_string(),
            ..Default::default()
        });
        assert_eq!(result.title(), Some("RIDGE_RACER"));

        result.platform.game_title = Some("RIDGE RACER".to_string());
        assert_eq!(result.title(), Some("RIDGE RACER"));
    }

    #[test]
    fn test_serializes_to_json() {
        let result = InspectionResult::empty(Path::new("disc.iso"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["classification"], "UnknownFormat");
        assert!(json["platform"]["serial_number"].is_null());
    }
}
