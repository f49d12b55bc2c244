//! Disc Inspector Library
//!
//! Identifies the platform of CD/GD-ROM disc images and extracts their
//! ISO 9660 volume and platform header metadata.

pub mod config;
pub mod disc;
pub mod inspect;
