//! ISO 9660 volume descriptor normalization
//!
//! Turns a raw descriptor into trimmed text, verbatim numbers and strictly
//! parsed dates.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use super::text::{decode_latin1, trim_end_padding};
use crate::disc::{IsoEntry, VolumeDescriptor};

/// Significant length of a descriptor date (YYYYMMDDHHmm)
const DATE_LEN: usize = 12;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})$").unwrap()
});

/// The four dated fields of a volume descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateField {
    Creation,
    Modification,
    Expiration,
    Effective,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Creation => "creation",
            Self::Modification => "modification",
            Self::Expiration => "expiration",
            Self::Effective => "effective",
        };
        f.write_str(name)
    }
}

/// A non-sentinel date that is not a valid `YYYYMMDDHHmm` timestamp
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field} date {raw:?} is not a valid YYYYMMDDHHmm timestamp")]
pub struct FieldParseError {
    pub field: DateField,
    pub raw: String,
}

/// Normalized contents of a volume descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeMetadata {
    pub system_identifier: String,
    pub volume_identifier: String,
    pub volume_set_identifier: String,
    pub publisher_identifier: String,
    pub data_preparer_identifier: String,
    pub application_identifier: String,
    pub copyright_file_identifier: String,
    pub abstract_file_identifier: String,
    pub bibliographic_file_identifier: String,
    /// Trimmed of NUL bytes only
    pub reserved: String,

    pub number_of_sectors: u32,
    pub path_table_size: u32,
    pub sector_size: u16,
    pub descriptor_type: u8,
    pub volume_sequence_number: u16,

    pub creation_date: Option<NaiveDateTime>,
    pub modification_date: Option<NaiveDateTime>,
    pub expiration_date: Option<NaiveDateTime>,
    pub effective_date: Option<NaiveDateTime>,
    /// Date fields that held something other than a timestamp or the zero sentinel
    pub field_errors: Vec<FieldParseError>,

    /// Root directory listing
    pub root_entries: Vec<IsoEntry>,
}

impl VolumeMetadata {
    /// Normalize a raw descriptor together with its root directory listing
    pub fn from_descriptor(vd: &VolumeDescriptor, root_entries: Vec<IsoEntry>) -> Self {
        let mut field_errors = Vec::new();
        let mut date = |field: DateField, raw: &[u8]| match parse_disc_date(field, raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("{}", e);
                field_errors.push(e);
                None
            }
        };

        let creation_date = date(DateField::Creation, &vd.creation_date_time);
        let modification_date = date(DateField::Modification, &vd.modification_date_time);
        let expiration_date = date(DateField::Expiration, &vd.expiration_date_time);
        let effective_date = date(DateField::Effective, &vd.effective_date_time);

        Self {
            system_identifier: text(&vd.system_identifier),
            volume_identifier: text(&vd.volume_identifier),
            volume_set_identifier: text(&vd.volume_set_identifier),
            publisher_identifier: text(&vd.publisher_identifier),
            data_preparer_identifier: text(&vd.data_preparer_identifier),
            application_identifier: text(&vd.application_identifier),
            copyright_file_identifier: text(&vd.copyright_file_identifier),
            abstract_file_identifier: text(&vd.abstract_file_identifier),
            bibliographic_file_identifier: text(&vd.bibliographic_file_identifier),
            reserved: decode_latin1(&vd.reserved).trim_matches('\0').to_string(),
            number_of_sectors: vd.number_of_sectors,
            path_table_size: vd.path_table_size,
            sector_size: vd.sector_size,
            descriptor_type: vd.descriptor_type,
            volume_sequence_number: vd.volume_sequence_number,
            creation_date,
            modification_date,
            expiration_date,
            effective_date,
            field_errors,
            root_entries,
        }
    }

    /// First root-level file whose name contains `needle`
    pub fn find_root_file(&self, needle: &str) -> Option<&IsoEntry> {
        self.root_entries
            .iter()
            .find(|entry| entry.is_file && entry.name.contains(needle))
    }
}

fn text(raw: &[u8]) -> String {
    trim_end_padding(&decode_latin1(raw)).to_string()
}

/// Parse a descriptor date field
///
/// # Returns
/// * `Ok(Some(_))` - A valid `YYYYMMDDHHmm` timestamp
/// * `Ok(None)` - Blank or the all-zero sentinel
/// * `Err(FieldParseError)` - Anything else
pub fn parse_disc_date(field: DateField, raw: &[u8]) -> Result<Option<NaiveDateTime>, FieldParseError> {
    let decoded = decode_latin1(raw);
    let trimmed: String = decoded
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .chars()
        .take(DATE_LEN)
        .collect();

    if trimmed.chars().all(|c| c == '0') {
        return Ok(None);
    }

    let invalid = || FieldParseError {
        field,
        raw: trimmed.clone(),
    };

    let caps = DATE_PATTERN.captures(&trimmed).ok_or_else(invalid)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();
    let (year, month, day, hour, minute) = (num(1), num(2), num(3), num(4), num(5));

    year.zip(month)
        .zip(day)
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y as i32, m, d))
        .zip(hour.zip(minute))
        .and_then(|(date, (h, min))| date.and_hms_opt(h, min, 0))
        .map(Some)
        .ok_or_else(invalid)
}
