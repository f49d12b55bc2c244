//! Read-through sector cache for a single inspection

use std::collections::HashMap;

use crate::disc::{SectorReader, SECTOR_SIZE};

/// One 2048-byte logical sector
pub type Sector = [u8; SECTOR_SIZE as usize];

/// Memoizes successful sector reads by LBA
///
/// Identification touches tens of sectors at most, so nothing is ever evicted.
/// Failed or short reads are not stored; asking again retries the read.
pub struct SectorCache {
    reader: Box<dyn SectorReader>,
    sectors: HashMap<u32, Box<Sector>>,
}

impl SectorCache {
    pub fn new(reader: Box<dyn SectorReader>) -> Self {
        Self {
            reader,
            sectors: HashMap::new(),
        }
    }

    /// Read a sector, going to the underlying reader only on a miss
    pub fn read(&mut self, lba: u32) -> Option<&Sector> {
        if !self.sectors.contains_key(&lba) {
            let data = match self.reader.read_sector(lba) {
                Ok(data) => data,
                Err(e) => {
                    log::debug!("Sector {} unreadable: {}", lba, e);
                    return None;
                }
            };
            let sector: Box<Sector> = match data.into_boxed_slice().try_into() {
                Ok(sector) => sector,
                Err(short) => {
                    log::debug!("Sector {} returned {} bytes", lba, short.len());
                    return None;
                }
            };
            self.sectors.insert(lba, sector);
        }
        self.sectors.get(&lba).map(|s| &**s)
    }

    /// Read the first `len` bytes of a sector
    pub fn read_prefix(&mut self, lba: u32, len: usize) -> Option<&[u8]> {
        self.read(lba).map(|s| &s[..len.min(s.len())])
    }

    /// Number of sectors currently cached
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}
