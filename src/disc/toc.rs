//! Table of Contents (TOC) model
//!
//! Sessions hold their real tracks bracketed by a lead-in entry (first) and a
//! lead-out entry (last), so every consumer can skip the pseudo-tracks the
//! same way.

use serde::Serialize;

/// Frames (sectors) per second of CD time
pub const FRAMES_PER_SECOND: u32 = 75;

/// Track number conventionally used for the lead-out
pub const LEAD_OUT_TRACK: u32 = 0xAA;

/// Mode of a real track, as declared by the cue sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackMode {
    Audio,
    /// CD+G audio (2448-byte sectors)
    Cdg,
    Mode1,
    Mode2,
    Cdi,
}

impl TrackMode {
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode2 | Self::Cdi)
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio | Self::Cdg)
    }
}

/// Entry kind within a session's track list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackKind {
    LeadIn,
    Track(TrackMode),
    LeadOut,
}

/// A single TOC entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Track number (0 for lead-in, 0xAA for lead-out)
    pub number: u32,
    /// First logical block of the track (INDEX 01)
    pub lba: u32,
    pub kind: TrackKind,
}

impl Track {
    pub fn is_data(&self) -> bool {
        matches!(self.kind, TrackKind::Track(mode) if mode.is_data())
    }

    pub fn is_audio(&self) -> bool {
        matches!(self.kind, TrackKind::Track(mode) if mode.is_audio())
    }
}

/// One session of the disc
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub number: u32,
    pub tracks: Vec<Track>,
}

impl Session {
    /// Build a session from its real tracks, adding the lead-in and lead-out entries
    pub fn bracketed(number: u32, tracks: Vec<Track>, lead_out_lba: u32) -> Self {
        let mut all = Vec::with_capacity(tracks.len() + 2);
        all.push(Track {
            number: 0,
            lba: 0,
            kind: TrackKind::LeadIn,
        });
        all.extend(tracks);
        all.push(Track {
            number: LEAD_OUT_TRACK,
            lba: lead_out_lba,
            kind: TrackKind::LeadOut,
        });
        Self { number, tracks: all }
    }

    /// Tracks between the lead-in and lead-out entries
    pub fn real_tracks(&self) -> &[Track] {
        if self.tracks.len() < 2 {
            return &[];
        }
        &self.tracks[1..self.tracks.len() - 1]
    }
}

/// Physical layout of a mounted disc
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscStructure {
    pub sessions: Vec<Session>,
}

impl DiscStructure {
    /// Count real tracks per session, skipping lead-in and lead-out
    pub fn track_summary(&self) -> TrackSummary {
        let mut summary = TrackSummary::default();
        for track in self.sessions.iter().flat_map(|s| s.real_tracks()) {
            if track.is_data() {
                summary.total_data_tracks += 1;
            } else if track.is_audio() {
                summary.total_audio_tracks += 1;
            }
        }
        summary.total_tracks = summary.total_data_tracks + summary.total_audio_tracks;
        summary
    }

    /// Start LBAs of all data tracks, in TOC order
    pub fn data_track_lbas(&self) -> Vec<u32> {
        self.sessions
            .iter()
            .flat_map(|s| s.real_tracks())
            .filter(|t| t.is_data())
            .map(|t| t.lba)
            .collect()
    }
}

/// Track counts for an inspected disc
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackSummary {
    pub total_tracks: u32,
    pub total_data_tracks: u32,
    pub total_audio_tracks: u32,
}

/// Parse MSF (Minutes:Seconds:Frames) time from CUE INDEX format
/// Format: MM:SS:FF where FF is frames (0-74)
pub fn parse_msf(msf: &str) -> Option<u32> {
    let parts: Vec<&str> = msf.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let minutes: u32 = parts[0].parse().ok()?;
    let seconds: u32 = parts[1].parse().ok()?;
    let frames: u32 = parts[2].parse().ok()?;

    if seconds >= 60 || frames >= FRAMES_PER_SECOND {
        return None;
    }

    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(FRAMES_PER_SECOND)?
        .checked_add(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(number: u32, lba: u32, mode: TrackMode) -> Track {
        Track {
            number,
            lba,
            kind: TrackKind::Track(mode),
        }
    }

    #[test]
    fn test_parse_msf() {
        assert_eq!(parse_msf("00:00:00"), Some(0));
        assert_eq!(parse_msf("00:02:00"), Some(150));
        assert_eq!(parse_msf("01:00:00"), Some(4500));
        assert_eq!(parse_msf("74:59:74"), Some(337424));
        assert_eq!(parse_msf("00:60:00"), None);
        assert_eq!(parse_msf("954437:00:00"), Some(4_294_966_500));
        assert_eq!(parse_msf("954438:00:00"), None);
        assert_eq!(parse_msf("99999999999:00:00"), None);
        assert_eq!(parse_msf("00:00"), None);
    }

    #[test]
    fn test_track_summary_skips_lead_in_and_out() {
        let session = Session::bracketed(
            1,
            vec![
                track(1, 0, TrackMode::Mode1),
                track(2, 1000, TrackMode::Mode2),
                track(3, 2000, TrackMode::Audio),
            ],
            3000,
        );
        assert_eq!(session.tracks.len(), 5);

        let structure = DiscStructure {
            sessions: vec![session],
        };
        let summary = structure.track_summary();
        assert_eq!(summary.total_tracks, 3);
        assert_eq!(summary.total_data_tracks, 2);
        assert_eq!(summary.total_audio_tracks, 1);
    }

    #[test]
    fn test_data_track_lbas_in_toc_order() {
        let structure = DiscStructure {
            sessions: vec![
                Session::bracketed(
                    1,
                    vec![track(1, 0, TrackMode::Audio), track(2, 100, TrackMode::Mode1)],
                    150,
                ),
                Session::bracketed(2, vec![track(3, 200, TrackMode::Mode2)], 400),
            ],
        };
        assert_eq!(structure.data_track_lbas(), vec![100, 200]);
        assert_eq!(structure.track_summary().total_tracks, 3);
    }

    #[test]
    fn test_degenerate_session() {
        let session = Session {
            number: 1,
            tracks: vec![Track {
                number: 0,
                lba: 0,
                kind: TrackKind::LeadIn,
            }],
        };
        assert!(session.real_tracks().is_empty());
    }
}
