//! The core, UI-agnostic library for the `flpimg` floppy disk imaging utility.
//!
//! `flpimg-core` is designed to be used as a library by any front-end, whether
//! it's a command-line interface (like `flpimg`) or a graphical user interface.
//! It handles boot sector parsing, sector-level device I/O, and the three
//! transfer engines.
//!
//! The library is structured into several key modules:
//! - [`bootsector`]: Decodes the BIOS parameter block from sector 0 and
//!   resolves the size of a whole-disk image.
//! - [`device`]: The [`device::SectorDevice`] transport trait, the real
//!   [`device::DriveDevice`] and the simulated [`device::MemoryDevice`].
//! - [`platform`]: Maps a drive index to the platform's raw device node.
//! - [`mod@read`]: Copies a drive, sector by sector, into a flat image file.
//! - [`mod@write`]: Copies a flat image file onto a drive.
//! - [`verify`]: Compares an image file against a drive without writing.
//!
//! The primary entry points are the [`read::run`], [`write::run`] and
//! [`verify::run`] functions. Each drives a strictly sequential,
//! one-sector-at-a-time loop and reports its progress via callbacks, allowing
//! the calling application to display progress in any way it chooses.
//! Per-sector transport faults are tallied rather than aborting the loop; the
//! tally decides the final outcome.
//!
//! ## Example: Backing Up a Drive
//!
//! ```rust,no_run
//! use flpimg_core::device::DriveDevice;
//! use flpimg_core::{read, Session};
//!
//! fn main() -> flpimg_core::error::Result<()> {
//!     // Drive 0 is A:.
//!     let mut drive = DriveDevice::open(0, false)?;
//!     let session = Session::new(0, "drive_a.img");
//!
//!     read::run(
//!         &session,
//!         &mut drive,
//!         |total| println!("Logical sectors = {total}"),
//!         |sector| print!("Reading sector {sector}\r"),
//!         |sector| eprintln!("Error reading sector {sector}"),
//!     )?;
//!
//!     println!("Disk read successfully");
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

pub mod bootsector;
pub mod device;
pub mod error;
pub mod platform;
pub mod read;
pub mod verify;
pub mod write;

/// Size of one sector in bytes. All transfers move exactly this much per step.
pub const SECTOR_SIZE: usize = 512;

/// How much of the disk a transfer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every sector, as declared by the boot sector (or, in write mode, by
    /// the image file's size).
    WholeDisk,
    /// Sector 0 only.
    BootSectorOnly,
}

/// The parameters of one transfer, constructed once from parsed arguments
/// and passed into the engines.
#[derive(Debug, Clone)]
pub struct Session {
    /// Drive index (0 = A:, 1 = B:, ...).
    pub drive: u8,
    /// The image file read from or written to.
    pub image: PathBuf,
    /// Whole disk, or boot sector only.
    pub scope: Scope,
}

impl Session {
    /// Create a whole-disk session for the given drive and image path.
    pub fn new(drive: u8, image: impl Into<PathBuf>) -> Self {
        Self {
            drive,
            image: image.into(),
            scope: Scope::WholeDisk,
        }
    }

    /// Set the transfer scope.
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults_to_whole_disk() {
        let session = Session::new(0, "floppy.img");
        assert_eq!(session.drive, 0);
        assert_eq!(session.scope, Scope::WholeDisk);
        assert_eq!(session.image, PathBuf::from("floppy.img"));
    }

    #[test]
    fn session_scope_builder() {
        let session = Session::new(1, "boot.img").scope(Scope::BootSectorOnly);
        assert_eq!(session.scope, Scope::BootSectorOnly);
    }
}
