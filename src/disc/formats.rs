//! Disc image container formats, session formats and logical stream views

use serde::Serialize;
use std::path::Path;

/// Supported disc image containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// CUE sheet referencing one or more BIN files
    CueSheet,
    /// Plain 2048 byte/sector ISO 9660 image (.iso)
    Iso,
    /// DiscJuggler single-file container (.cdi)
    DiscJuggler,
}

impl ImageFormat {
    /// Detect the image format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "cue" => Some(Self::CueSheet),
            "iso" => Some(Self::Iso),
            "cdi" => Some(Self::DiscJuggler),
            _ => None,
        }
    }

    /// Get the display name for this format
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CueSheet => "CUE/BIN",
            Self::Iso => "ISO 9660",
            Self::DiscJuggler => "DiscJuggler",
        }
    }
}

/// Format of the first session, as declared by its tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionFormat {
    /// CD-DA or Mode 1 CD-ROM
    CdRomOrCdda,
    /// CD-i
    Cdi,
    /// CD-ROM XA (Mode 2)
    CdXa,
}

/// The 2048-byte logical view used to read user data out of data sectors
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamView {
    Mode1_2048,
    #[serde(rename = "Mode2_Form1_2048")]
    Mode2Form1_2048,
}

impl StreamView {
    /// Pick the view matching a session format
    pub fn for_session(format: SessionFormat) -> Self {
        match format {
            SessionFormat::CdXa => Self::Mode2Form1_2048,
            SessionFormat::CdRomOrCdda | SessionFormat::Cdi => Self::Mode1_2048,
        }
    }

    /// Offset of the 2048 user-data bytes inside a stored sector of `sector_size` bytes
    pub fn data_offset(&self, sector_size: u64) -> u64 {
        match sector_size {
            2352 => match self {
                Self::Mode1_2048 => 16,
                Self::Mode2Form1_2048 => 24,
            },
            2336 => 8,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_path(Path::new("game.cue")), Some(ImageFormat::CueSheet));
        assert_eq!(ImageFormat::from_path(Path::new("game.CUE")), Some(ImageFormat::CueSheet));
        assert_eq!(ImageFormat::from_path(Path::new("game.iso")), Some(ImageFormat::Iso));
        assert_eq!(ImageFormat::from_path(Path::new("game.Cdi")), Some(ImageFormat::DiscJuggler));
        assert_eq!(ImageFormat::from_path(Path::new("game.bin")), None);
        assert_eq!(ImageFormat::from_path(Path::new("game")), None);
    }

    #[test]
    fn test_view_selection() {
        assert_eq!(StreamView::for_session(SessionFormat::CdXa), StreamView::Mode2Form1_2048);
        assert_eq!(StreamView::for_session(SessionFormat::CdRomOrCdda), StreamView::Mode1_2048);
        assert_eq!(StreamView::for_session(SessionFormat::Cdi), StreamView::Mode1_2048);
    }

    #[test]
    fn test_data_offsets() {
        assert_eq!(StreamView::Mode1_2048.data_offset(2352), 16);
        assert_eq!(StreamView::Mode2Form1_2048.data_offset(2352), 24);
        assert_eq!(StreamView::Mode1_2048.data_offset(2048), 0);
        assert_eq!(StreamView::Mode2Form1_2048.data_offset(2336), 8);
    }

    #[test]
    fn test_view_json_names() {
        assert_eq!(serde_json::to_value(StreamView::Mode1_2048).unwrap(), "Mode1_2048");
        assert_eq!(serde_json::to_value(StreamView::Mode2Form1_2048).unwrap(), "Mode2_Form1_2048");
    }
}
