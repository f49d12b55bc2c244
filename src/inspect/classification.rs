//! Detected platform / format of a disc

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Platform or format a disc image was identified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DiscClassification {
    SonyPSX,
    SonyPS2,
    SonyPSP,
    SegaSaturn,
    SegaCD,
    PCEngineCD,
    PCFX,
    PhilipsCDi,
    AudioCD,
    NeoGeoCD,
    DreamCast,
    Panasonic3DO,
    AmigaCDTV,
    AmigaCD32,
    BandaiPlaydia,
    Gamecube,
    Wii,
    FMTowns,
    /// ISO 9660 filesystem present but no platform recognized
    UnknownCDFS,
    #[default]
    UnknownFormat,
}

impl DiscClassification {
    pub const ALL: [DiscClassification; 20] = [
        Self::SonyPSX,
        Self::SonyPS2,
        Self::SonyPSP,
        Self::SegaSaturn,
        Self::SegaCD,
        Self::PCEngineCD,
        Self::PCFX,
        Self::PhilipsCDi,
        Self::AudioCD,
        Self::NeoGeoCD,
        Self::DreamCast,
        Self::Panasonic3DO,
        Self::AmigaCDTV,
        Self::AmigaCD32,
        Self::BandaiPlaydia,
        Self::Gamecube,
        Self::Wii,
        Self::FMTowns,
        Self::UnknownCDFS,
        Self::UnknownFormat,
    ];

    /// True for the two "nothing recognized" values
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::UnknownFormat | Self::UnknownCDFS)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SonyPSX => "SonyPSX",
            Self::SonyPS2 => "SonyPS2",
            Self::SonyPSP => "SonyPSP",
            Self::SegaSaturn => "SegaSaturn",
            Self::SegaCD => "SegaCD",
            Self::PCEngineCD => "PCEngineCD",
            Self::PCFX => "PCFX",
            Self::PhilipsCDi => "PhilipsCDi",
            Self::AudioCD => "AudioCD",
            Self::NeoGeoCD => "NeoGeoCD",
            Self::DreamCast => "DreamCast",
            Self::Panasonic3DO => "Panasonic3DO",
            Self::AmigaCDTV => "AmigaCDTV",
            Self::AmigaCD32 => "AmigaCD32",
            Self::BandaiPlaydia => "BandaiPlaydia",
            Self::Gamecube => "Gamecube",
            Self::Wii => "Wii",
            Self::FMTowns => "FMTowns",
            Self::UnknownCDFS => "UnknownCDFS",
            Self::UnknownFormat => "UnknownFormat",
        }
    }
}

impl fmt::Display for DiscClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiscClassification {
    type Err = String;

    /// Case-insensitive variant name, e.g. `sonypsx` or `DreamCast`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown disc type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown_format() {
        assert_eq!(DiscClassification::default(), DiscClassification::UnknownFormat);
        assert!(DiscClassification::UnknownCDFS.is_unknown());
        assert!(!DiscClassification::AudioCD.is_unknown());
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for kind in DiscClassification::ALL {
            assert_eq!(kind.name().parse::<DiscClassification>(), Ok(kind));
        }
        assert_eq!("sonypsx".parse(), Ok(DiscClassification::SonyPSX));
        assert!("Atari Jaguar".parse::<DiscClassification>().is_err());
    }
}
