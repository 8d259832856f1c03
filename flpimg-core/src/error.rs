//! Error types for the flpimg core library.
//!
//! Fatal conditions abort a transfer immediately; they each get their own
//! variant so front-ends can report them precisely. Per-sector transport
//! faults are not errors on their own — the engines tally them and finish
//! the pass, surfacing the tally as [`Error::BadSectors`] at the end.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for flpimg operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The image file could not be opened or created.
    #[error("error opening file '{path}': {source}")]
    FileOpen {
        /// Path of the image file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A full sector could not be read from the image file.
    #[error("error reading from file '{path}': {source}")]
    FileRead {
        /// Path of the image file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A full sector could not be written to the image file.
    #[error("error writing to file '{path}': {source}")]
    FileWrite {
        /// Path of the image file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The image file could not be flushed and closed cleanly.
    #[error("error closing file '{path}': {source}")]
    FileClose {
        /// Path of the image file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The drive's device node could not be opened.
    #[error("error opening drive {}: {source}", drive_letter(.drive))]
    DriveOpen {
        /// Drive index (0 = A:)
        drive: u8,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Verify mode: the image file does not cover the same number of bytes
    /// as the disk.
    #[error("file size is {file_size} but disk size is {device_size}")]
    SizeMismatch {
        /// Size of the image file in bytes
        file_size: u64,
        /// Size the disk declares, in bytes
        device_size: u64,
    },

    /// Write mode: the image file is not a whole number of sectors.
    #[error("file size must be a multiple of the sector size (512), not {size}")]
    SizeAlignment {
        /// Size of the image file in bytes
        size: u64,
    },

    /// Write mode: only the first two drive slots may be written.
    #[error("can only write to drive A: or B:, not {}", drive_letter(.drive))]
    UnsupportedDevice {
        /// The rejected drive index
        drive: u8,
    },

    /// The transfer finished, but some sectors failed or did not match.
    #[error("transfer completed with {count} bad sectors")]
    BadSectors {
        /// Number of sectors that failed transport or miscompared
        count: u64,
    },
}

/// Result type alias using the flpimg error type.
pub type Result<T> = std::result::Result<T, Error>;

fn drive_letter(drive: &u8) -> String {
    if *drive < 26 {
        format!("{}:", (b'A' + drive) as char)
    } else {
        format!("#{drive}")
    }
}
