//! Fixed-sector magic detection for Saturn, PlayStation and PSP

use super::cache::SectorCache;
use super::classification::DiscClassification;

const SATURN_LBA: u32 = 0;
const SATURN_MAGIC: &[u8] = b"SEGA SEGASATURN";

/// Sony discs carry their marker in the primary volume descriptor's system id
const SONY_LBA: u32 = 16;
const SONY_OFFSET: usize = 8;
const PSP_MAGIC: &[u8] = b"PSP GAME";
const PSX_MAGIC: &[u8] = b"PLAYSTATION";

/// Check the known fixed locations; `UnknownFormat` when nothing matches
pub fn detect(cache: &mut SectorCache) -> DiscClassification {
    if let Some(sector) = cache.read(SATURN_LBA) {
        if sector.starts_with(SATURN_MAGIC) {
            return DiscClassification::SegaSaturn;
        }
    }

    if let Some(sector) = cache.read(SONY_LBA) {
        let system_id = &sector[SONY_OFFSET..];
        if system_id.starts_with(PSP_MAGIC) {
            return DiscClassification::SonyPSP;
        }
        if system_id.starts_with(PSX_MAGIC) {
            return DiscClassification::SonyPSX;
        }
    }

    DiscClassification::UnknownFormat
}
