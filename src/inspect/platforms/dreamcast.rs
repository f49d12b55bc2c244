//! Sega Dreamcast IP.BIN header
//!
//! The header is a run of 16-byte fields anchored on the `SEGAKATANA`
//! hardware id, which sits five bytes into the first field (`SEGA SEGAKATANA`).
//! Fields are cut from the text starting at the marker: field `i` starts at
//! `i * 16 - 5` there, clamped to 0, so field 0 reads `SEGAKATANA SEGA`.

use super::{ExtractContext, PlatformRecord};
use crate::inspect::text::{decode_latin1, find_ignore_case};

const MARKER: &str = "segakatana";
const SYSTEM_ID: &str = "SEGAKATANA";
const HEADER_FILE: &str = "IP.BIN";

const FIELD_LEN: usize = 16;
const FIELD_COUNT: usize = 20;
/// Distance from the start of the first header field to the marker
const MARKER_OFFSET: usize = 5;

/// Locate and parse IP.BIN; `None` when the hardware id is nowhere to be found
pub fn extract(ctx: &mut ExtractContext<'_>) -> Option<PlatformRecord> {
    let lba = match ctx.volume {
        Some(volume) if volume.system_identifier.contains(SYSTEM_ID) => volume
            .find_root_file(HEADER_FILE)
            .map(|entry| entry.lba)
            .unwrap_or(0),
        _ => 0,
    };

    let sector = ctx.cache.read(lba)?;
    let record = parse_header(sector);
    if record.is_none() {
        log::debug!("No Dreamcast hardware id at LBA {}", lba);
    }
    record
}

/// Parse the header fields around the first case-insensitive `segakatana`
pub fn parse_header(data: &[u8]) -> Option<PlatformRecord> {
    let marker = find_ignore_case(data, MARKER)?;
    let header = &data[marker..];

    let fields: Vec<String> = (0..FIELD_COUNT)
        .map(|i| {
            let start = (i * FIELD_LEN).saturating_sub(MARKER_OFFSET).min(header.len());
            let end = (start + FIELD_LEN).min(header.len());
            decode_latin1(&header[start..end])
        })
        .collect();

    let media = fields[2].as_str();
    let regions = fields[3].trim();
    let product = fields[4].as_str();

    Some(PlatformRecord {
        device_information: Some(fields[0].trim().to_string()),
        publisher: Some(fields[1].trim().to_string()),
        media_id: Some(first_token(media, ' ')),
        media_info: Some(last_token(media.trim(), ' ')),
        area_codes: Some(first_token(regions, ' ')),
        peripheral_codes: Some(last_token(regions, ' ')),
        serial_number: Some(first_token(product, 'V')),
        version: Some(format!("V{}", last_token(product, 'V'))),
        internal_date: Some(fields[5].trim().to_string()),
        manufacturer_id: Some(fields[7].trim().to_string()),
        game_title: Some(format!("{}{}", fields[8], fields[9]).trim().to_string()),
        ..Default::default()
    })
}

fn first_token(s: &str, sep: char) -> String {
    s.split(sep).next().unwrap_or_default().trim().to_string()
}

fn last_token(s: &str, sep: char) -> String {
    s.split(sep).last().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::{logged, MemoryReader};
    use crate::disc::IsoEntry;
    use crate::inspect::cache::SectorCache;
    use crate::inspect::volume::VolumeMetadata;

    /// IP.BIN with the hardware id at offset 0, so the marker sits at index 5
    fn ip_bin() -> Vec<u8> {
        let fields: [&[u8; 16]; 10] = [
            b"SEGA SEGAKATANA ",
            b"SEGA ENTERPRISES",
            b"5B3E GD-ROM1/1  ",
            b"JUE     E000F10 ",
            b"HDR-0001  V1.005",
            b"19990826        ",
            b"1ST_READ.BIN    ",
            b"SEGA LC-T-17    ",
            b"SONIC ADVENTURE ",
            b"                ",
        ];
        let mut sector = vec![b' '; 2048];
        for (i, field) in fields.iter().enumerate() {
            sector[i * 16..(i + 1) * 16].copy_from_slice(*field);
        }
        sector
    }

    #[test]
    fn test_parse_header() {
        let sector = ip_bin();
        assert_eq!(find_ignore_case(&sector, MARKER), Some(5));

        let record = parse_header(&sector).unwrap();
        assert_eq!(record.device_information.as_deref(), Some("SEGAKATANA SEGA"));
        assert_eq!(record.publisher.as_deref(), Some("SEGA ENTERPRISES"));
        assert_eq!(record.media_id.as_deref(), Some("5B3E"));
        assert_eq!(record.media_info.as_deref(), Some("GD-ROM1/1"));
        assert_eq!(record.area_codes.as_deref(), Some("JUE"));
        assert_eq!(record.peripheral_codes.as_deref(), Some("E000F10"));
        assert_eq!(record.serial_number.as_deref(), Some("HDR-0001"));
        assert_eq!(record.version.as_deref(), Some("V1.005"));
        assert_eq!(record.internal_date.as_deref(), Some("19990826"));
        assert_eq!(record.manufacturer_id.as_deref(), Some("SEGA LC-T-17"));
        assert_eq!(record.game_title.as_deref(), Some("SONIC ADVENTURE"));
    }

    #[test]
    fn test_first_field_starts_at_marker() {
        // Bytes ahead of the hardware id never end up in a field
        let mut sector = vec![b'#'; 32];
        sector.extend(ip_bin());
        let record = parse_header(&sector).unwrap();

        assert_eq!(record.device_information.as_deref(), Some("SEGAKATANA SEGA"));
        assert_eq!(record.publisher.as_deref(), Some("SEGA ENTERPRISES"));
        assert_eq!(record.game_title.as_deref(), Some("SONIC ADVENTURE"));
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let mut sector = ip_bin();
        sector[5..15].copy_from_slice(b"SegaKatana");
        assert!(parse_header(&sector).is_some());
    }

    #[test]
    fn test_missing_marker() {
        assert!(parse_header(&[b' '; 2048]).is_none());
    }

    #[test]
    fn test_extract_from_ip_bin_entry() {
        let reader = MemoryReader::new().with_sector(45000, &ip_bin());
        let log = reader.read_log();
        let mut cache = SectorCache::new(Box::new(reader));
        let volume = VolumeMetadata {
            system_identifier: "SEGA SEGAKATANA".to_string(),
            root_entries: vec![IsoEntry {
                name: "IP.BIN;1".to_string(),
                lba: 45000,
                size: 32768,
                is_file: true,
            }],
            ..Default::default()
        };
        let mut ctx = ExtractContext {
            cache: &mut cache,
            volume: Some(&volume),
            data_tracks: &[],
        };

        let record = extract(&mut ctx).unwrap();
        assert_eq!(record.serial_number.as_deref(), Some("HDR-0001"));
        assert_eq!(logged(&log), vec![45000]);
    }

    #[test]
    fn test_extract_without_iso_reads_lba_zero() {
        let reader = MemoryReader::new().with_sector(0, b"nothing to see here");
        let log = reader.read_log();
        let mut cache = SectorCache::new(Box::new(reader));
        let mut ctx = ExtractContext {
            cache: &mut cache,
            volume: None,
            data_tracks: &[],
        };

        assert!(extract(&mut ctx).is_none());
        assert_eq!(logged(&log), vec![0]);
    }
}
