//! ISO 9660 volume descriptor and root directory decoding
//!
//! Volume descriptors start at sector 16 and run until a set terminator.
//! Fields are kept as raw bytes here; turning them into text and dates is the
//! normalizer's job.

use serde::Serialize;

use super::reader::{SectorReader, SECTOR_SIZE};

/// Sector number where the first volume descriptor is located
pub const PVD_SECTOR: u32 = 16;

/// Volume descriptor type for the Primary Volume Descriptor
pub const PVD_TYPE: u8 = 1;

/// Volume descriptor set terminator
const TERMINATOR_TYPE: u8 = 255;

/// Upper bound on descriptors read before giving up on a terminator
const MAX_DESCRIPTORS: u32 = 32;

/// Upper bound on root directory sectors read
const MAX_ROOT_SECTORS: u32 = 64;

/// Standard identifier for ISO 9660 volume descriptors
const ISO9660_IDENTIFIER: &[u8; 5] = b"CD001";

/// Raw ISO 9660 volume descriptor
#[derive(Debug, Clone)]
pub struct VolumeDescriptor {
    pub descriptor_type: u8,
    pub system_identifier: Vec<u8>,
    pub volume_identifier: Vec<u8>,
    /// Unused field between the volume identifier and space size
    pub reserved: Vec<u8>,
    pub number_of_sectors: u32,
    pub volume_sequence_number: u16,
    pub sector_size: u16,
    pub path_table_size: u32,
    pub root_directory_record: Vec<u8>,
    pub volume_set_identifier: Vec<u8>,
    pub publisher_identifier: Vec<u8>,
    pub data_preparer_identifier: Vec<u8>,
    pub application_identifier: Vec<u8>,
    pub copyright_file_identifier: Vec<u8>,
    pub abstract_file_identifier: Vec<u8>,
    pub bibliographic_file_identifier: Vec<u8>,
    pub creation_date_time: Vec<u8>,
    pub modification_date_time: Vec<u8>,
    pub expiration_date_time: Vec<u8>,
    pub effective_date_time: Vec<u8>,
}

impl VolumeDescriptor {
    /// Parse a volume descriptor from raw sector data
    ///
    /// # Returns
    /// * `Ok(VolumeDescriptor)` - Successfully parsed descriptor
    /// * `Err(String)` - Error message if the sector is not a volume descriptor
    pub fn parse(sector: &[u8]) -> Result<Self, String> {
        if sector.len() < SECTOR_SIZE as usize {
            return Err(format!(
                "Sector too small: {} bytes (expected {})",
                sector.len(),
                SECTOR_SIZE
            ));
        }

        // Check standard identifier (bytes 1-5)
        if &sector[1..6] != ISO9660_IDENTIFIER {
            return Err("Invalid ISO 9660 identifier (expected 'CD001')".to_string());
        }

        // Layout according to ECMA-119 (both-endian numbers read as little-endian)
        Ok(Self {
            descriptor_type: sector[0],
            system_identifier: sector[8..40].to_vec(),
            volume_identifier: sector[40..72].to_vec(),
            reserved: sector[72..80].to_vec(),
            number_of_sectors: read_u32_le(&sector[80..84]),
            volume_sequence_number: read_u16_le(&sector[124..126]),
            sector_size: read_u16_le(&sector[128..130]),
            path_table_size: read_u32_le(&sector[132..136]),
            root_directory_record: sector[156..190].to_vec(),
            volume_set_identifier: sector[190..318].to_vec(),
            publisher_identifier: sector[318..446].to_vec(),
            data_preparer_identifier: sector[446..574].to_vec(),
            application_identifier: sector[574..702].to_vec(),
            copyright_file_identifier: sector[702..739].to_vec(),
            abstract_file_identifier: sector[739..776].to_vec(),
            bibliographic_file_identifier: sector[776..813].to_vec(),
            creation_date_time: sector[813..830].to_vec(),
            modification_date_time: sector[830..847].to_vec(),
            expiration_date_time: sector[847..864].to_vec(),
            effective_date_time: sector[864..881].to_vec(),
        })
    }

    /// Root directory location (LBA) and size in bytes
    pub fn root_extent(&self) -> (u32, u32) {
        let record = &self.root_directory_record;
        (read_u32_le(&record[2..6]), read_u32_le(&record[10..14]))
    }
}

/// A root directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsoEntry {
    /// Raw file identifier, version suffix included (e.g. `SYSTEM.CNF;1`)
    pub name: String,
    /// Location of extent (LBA)
    pub lba: u32,
    /// Data length in bytes
    pub size: u32,
    pub is_file: bool,
}

/// A decoded ISO 9660 volume
#[derive(Debug, Clone)]
pub struct IsoVolume {
    /// Descriptors in on-disc order, terminator excluded
    pub descriptors: Vec<VolumeDescriptor>,
    /// Root directory listing of the first primary descriptor
    pub root: Vec<IsoEntry>,
}

/// Parse an ISO 9660 volume through a 2048-byte sector reader
///
/// Returns `None` when no volume descriptor is present.
pub fn parse_volume(reader: &mut dyn SectorReader) -> Option<IsoVolume> {
    let mut descriptors = Vec::new();

    for lba in PVD_SECTOR..PVD_SECTOR + MAX_DESCRIPTORS {
        let sector = match reader.read_sector(lba) {
            Ok(sector) => sector,
            Err(e) => {
                log::debug!("Stopped reading volume descriptors at LBA {}: {}", lba, e);
                break;
            }
        };
        if sector.first() == Some(&TERMINATOR_TYPE) {
            break;
        }
        match VolumeDescriptor::parse(&sector) {
            Ok(vd) => descriptors.push(vd),
            Err(e) => {
                log::debug!("No volume descriptor at LBA {}: {}", lba, e);
                break;
            }
        }
    }

    if descriptors.is_empty() {
        return None;
    }

    let root = descriptors
        .iter()
        .find(|vd| vd.descriptor_type == PVD_TYPE)
        .map(|pvd| read_root_directory(reader, pvd))
        .unwrap_or_default();

    log::debug!(
        "ISO 9660 volume: {} descriptors, {} root entries",
        descriptors.len(),
        root.len()
    );

    Some(IsoVolume { descriptors, root })
}

/// Read and parse the root directory of a primary descriptor
fn read_root_directory(reader: &mut dyn SectorReader, pvd: &VolumeDescriptor) -> Vec<IsoEntry> {
    let (location, size) = pvd.root_extent();
    let sector_count = (size as u64).div_ceil(SECTOR_SIZE).min(MAX_ROOT_SECTORS as u64) as u32;

    let mut entries = Vec::new();
    for i in 0..sector_count {
        match reader.read_sector(location + i) {
            Ok(sector) => entries.extend(parse_directory_sector(&sector)),
            Err(e) => {
                log::warn!("Failed to read root directory sector {}: {}", location + i, e);
                break;
            }
        }
    }
    entries
}

/// Parse the directory records packed into one sector
fn parse_directory_sector(data: &[u8]) -> Vec<IsoEntry> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        // Record length is first byte; 0 means no more records in this sector
        let record_length = data[offset] as usize;
        if record_length == 0 || offset + record_length > data.len() {
            break;
        }

        if let Some(entry) = parse_directory_record(&data[offset..offset + record_length]) {
            entries.push(entry);
        }

        offset += record_length;
    }

    entries
}

/// Parse a single directory record, skipping the "." and ".." entries
fn parse_directory_record(data: &[u8]) -> Option<IsoEntry> {
    if data.len() < 33 {
        return None;
    }

    // File identifier length at byte 32, identifier from byte 33
    let identifier_length = data[32] as usize;
    if data.len() < 33 + identifier_length {
        return None;
    }

    let identifier = &data[33..33 + identifier_length];
    if identifier.is_empty() || identifier == [0] || identifier == [1] {
        return None;
    }

    // File flags at byte 25; bit 1 marks a directory
    let is_directory = data[25] & 0x02 != 0;

    Some(IsoEntry {
        name: String::from_utf8_lossy(identifier).to_string(),
        lba: read_u32_le(&data[2..6]),
        size: read_u32_le(&data[10..14]),
        is_file: !is_directory,
    })
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Primary volume descriptor sector with the root directory at `root_lba`
    pub fn pvd_sector(system_id: &str, volume_id: &str, root_lba: u32) -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE as usize];
        sector[0] = PVD_TYPE;
        sector[1..6].copy_from_slice(ISO9660_IDENTIFIER);
        sector[6] = 1;
        write_padded(&mut sector[8..40], system_id);
        write_padded(&mut sector[40..72], volume_id);
        sector[80..84].copy_from_slice(&1000u32.to_le_bytes());
        sector[124..126].copy_from_slice(&1u16.to_le_bytes());
        sector[128..130].copy_from_slice(&2048u16.to_le_bytes());
        sector[132..136].copy_from_slice(&10u32.to_le_bytes());

        let mut root = directory_record("\0", root_lba, 2048, true);
        root.resize(34, 0);
        sector[156..190].copy_from_slice(&root);
        sector
    }

    /// Volume descriptor set terminator sector
    pub fn terminator_sector() -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE as usize];
        sector[0] = TERMINATOR_TYPE;
        sector[1..6].copy_from_slice(ISO9660_IDENTIFIER);
        sector[6] = 1;
        sector
    }

    /// Directory sector holding "." and ".." followed by `files` as (name, lba)
    pub fn directory_sector(files: &[(&str, u32)]) -> Vec<u8> {
        let mut sector = Vec::new();
        sector.extend(directory_record("\0", 20, 2048, true));
        sector.extend(directory_record("\x01", 20, 2048, true));
        for (name, lba) in files {
            sector.extend(directory_record(name, *lba, 2048, false));
        }
        sector.resize(SECTOR_SIZE as usize, 0);
        sector
    }

    pub fn directory_record(name: &str, lba: u32, size: u32, directory: bool) -> Vec<u8> {
        let id = name.as_bytes();
        let mut length = 33 + id.len();
        if length % 2 == 1 {
            length += 1;
        }
        let mut record = vec![0u8; length];
        record[0] = length as u8;
        record[2..6].copy_from_slice(&lba.to_le_bytes());
        record[10..14].copy_from_slice(&size.to_le_bytes());
        record[25] = if directory { 0x02 } else { 0x00 };
        record[32] = id.len() as u8;
        record[33..33 + id.len()].copy_from_slice(id);
        record
    }

    pub fn write_padded(field: &mut [u8], text: &str) {
        field.fill(b' ');
        field[..text.len()].copy_from_slice(text.as_bytes());
    }
}
