//! Sony PlayStation serial extraction from SYSTEM.CNF

use super::{ExtractContext, PlatformRecord};
use crate::inspect::text::decode_latin1;

/// Where SYSTEM.CNF conventionally sits when the root listing does not resolve it
const DEFAULT_BOOT_LBA: u32 = 23;

/// Bytes of SYSTEM.CNF inspected for the boot line
const BOOT_READ_LEN: usize = 200;

/// Boot device prefixes, in order of preference (`cdrom0:` is the PS2 spelling)
const BOOT_MARKERS: [&str; 2] = ["cdrom:", "cdrom0:"];

/// Read SYSTEM.CNF and pull the serial out of its boot path
pub fn extract(ctx: &mut ExtractContext<'_>) -> Option<PlatformRecord> {
    let lba = ctx
        .volume
        .and_then(|v| v.find_root_file("SYSTEM.CNF"))
        .map(|entry| entry.lba)
        .unwrap_or(DEFAULT_BOOT_LBA);

    let serial_number = match ctx.cache.read_prefix(lba, BOOT_READ_LEN) {
        Some(data) => parse_boot_serial(&decode_latin1(data)),
        None => {
            log::debug!("SYSTEM.CNF sector {} unreadable", lba);
            None
        }
    };

    Some(PlatformRecord {
        serial_number,
        ..Default::default()
    })
}

/// Normalize the boot executable name into a serial, e.g. `cdrom:\SLUS_123.45;1` -> `SLUS-12345`
pub fn parse_boot_serial(text: &str) -> Option<String> {
    let (pos, marker) = BOOT_MARKERS
        .iter()
        .find_map(|marker| text.find(*marker).map(|pos| (pos, *marker)))?;

    let rest = &text[pos + marker.len()..];
    let path = match rest.find(";1") {
        Some(end) => &rest[..end],
        None => rest,
    };

    let cleaned = path.replace('_', "-").replace('.', "");
    let is_separator = |c: char| c == '\\' || c == '/';
    let mut serial = match cleaned.rfind(is_separator) {
        Some(idx) => cleaned[idx + 1..].to_string(),
        None => cleaned.trim_start_matches(is_separator).to_string(),
    };

    // Fixed-width SYSTEM.CNF padding follows the boot line
    if let Some(cr) = serial.find('\r') {
        serial.truncate(cr);
    }

    let serial = serial.trim();
    if serial.is_empty() {
        None
    } else {
        Some(serial.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::{logged, MemoryReader};
    use crate::disc::IsoEntry;
    use crate::inspect::cache::SectorCache;
    use crate::inspect::volume::VolumeMetadata;

    #[test]
    fn test_serial_without_separator() {
        assert_eq!(parse_boot_serial("BOOT = cdrom:SLUS_123.45;1\r\n").as_deref(), Some("SLUS-12345"));
    }

    #[test]
    fn test_serial_with_backslash() {
        let cnf = "BOOT = cdrom:\\SCUS_941.63;1\r\nTCB = 4\r\nEVENT = 10\r\n";
        assert_eq!(parse_boot_serial(cnf).as_deref(), Some("SCUS-94163"));
    }

    #[test]
    fn test_serial_without_version_suffix() {
        let cnf = "BOOT=cdrom:\\SLES_005.24\r\nTCB=4\r\n";
        assert_eq!(parse_boot_serial(cnf).as_deref(), Some("SLES-00524"));
    }

    #[test]
    fn test_ps2_boot_marker() {
        let cnf = "BOOT2 = cdrom0:\\SLUS_200.62;1\r\nVER = 1.00\r\n";
        assert_eq!(parse_boot_serial(cnf).as_deref(), Some("SLUS-20062"));
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(parse_boot_serial("BOOT = host:PSX.EXE"), None);
    }

    #[test]
    fn test_extract_uses_root_entry() {
        let reader = MemoryReader::new().with_sector(30, b"BOOT = cdrom:\\SLPS_000.01;1\r\n");
        let log = reader.read_log();
        let mut cache = SectorCache::new(Box::new(reader));
        let volume = VolumeMetadata {
            root_entries: vec![IsoEntry {
                name: "SYSTEM.CNF;1".to_string(),
                lba: 30,
                size: 68,
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
        assert_eq!(record.serial_number.as_deref(), Some("SLPS-00001"));
        assert_eq!(logged(&log), vec![30]);
    }

    #[test]
    fn test_extract_falls_back_to_lba_23() {
        let reader = MemoryReader::new().with_sector(23, b"BOOT = cdrom:\\SLUS_006.91;1\r\n");
        let log = reader.read_log();
        let mut cache = SectorCache::new(Box::new(reader));
        let mut ctx = ExtractContext {
            cache: &mut cache,
            volume: None,
            data_tracks: &[],
        };

        let record = extract(&mut ctx).unwrap();
        assert_eq!(record.serial_number.as_deref(), Some("SLUS-00691"));
        assert_eq!(logged(&log), vec![23]);
    }
}
