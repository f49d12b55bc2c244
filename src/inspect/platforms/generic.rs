//! NEC PC-FX and PC Engine CD
//!
//! Neither platform has a documented header, so the title is lifted from a
//! fixed window of the sector following a data track's first sector.

use super::{ExtractContext, PlatformRecord};
use crate::inspect::text::{decode_latin1, find_ignore_case};

pub const PCFX_MARKER: &str = "pc-fx";
pub const PC_ENGINE_MARKER: &str = "pc engine";

const TITLE_WINDOW: (usize, usize) = (106, 154);

pub fn extract_pcfx(ctx: &mut ExtractContext<'_>) -> Option<PlatformRecord> {
    extract_marked(ctx, PCFX_MARKER)
}

pub fn extract_pc_engine(ctx: &mut ExtractContext<'_>) -> Option<PlatformRecord> {
    extract_marked(ctx, PC_ENGINE_MARKER)
}

/// First data track whose `lba + 1` sector carries `marker` provides the title
fn extract_marked(ctx: &mut ExtractContext<'_>, marker: &str) -> Option<PlatformRecord> {
    for &lba in ctx.data_tracks {
        let probe = lba.saturating_add(1);
        let Some(sector) = ctx.cache.read(probe) else {
            log::debug!("Skipping unreadable sector {}", probe);
            continue;
        };
        if find_ignore_case(sector, marker).is_some() {
            return Some(record_from_sector(sector));
        }
    }
    None
}

pub fn record_from_sector(sector: &[u8]) -> PlatformRecord {
    PlatformRecord {
        game_title: title_from_sector(sector),
        ..Default::default()
    }
}

/// Text up to the first double space in bytes 106..154
pub fn title_from_sector(sector: &[u8]) -> Option<String> {
    let (start, end) = TITLE_WINDOW;
    let end = end.min(sector.len());
    let start = start.min(end);

    let text = decode_latin1(&sector[start..end]).replace('\0', " ");
    let title = text.trim().split("  ").next().unwrap_or_default();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
