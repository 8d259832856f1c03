//! Contains the logic for writing a flat image file onto a drive.
//!
//! Write mode needs no boot sector parsing: the image file's own size says
//! how many sectors to transfer. What it does need is caution — only the
//! first two drive slots are accepted as targets, and the image must be a
//! whole number of sectors.

use std::fs::{self, File};
use std::io::Read;

use tracing::{debug, warn};

use crate::device::SectorDevice;
use crate::error::{Error, Result};
use crate::{SECTOR_SIZE, Scope, Session};

/// Writes the session's image file onto the drive, sector by sector.
///
/// A sector the device refuses to take is tallied and skipped so the rest
/// of the image still gets written. A short read from the image file is
/// fatal.
///
/// # Arguments
///
/// * `session` - Drive, image path, and scope for this transfer.
/// * `device` - The sector transport to write to.
/// * `on_total` - Called once with the total sector count, before the first
///   sector is transferred.
/// * `on_progress` - Called after each sector with the number of sectors
///   transferred so far.
/// * `on_bad_sector` - Called with the index of each sector the device
///   failed to write.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDevice`] for a drive outside A:/B: (checked
/// before the image file is touched), [`Error::SizeAlignment`] when the
/// image is not a whole number of sectors, [`Error::FileOpen`] /
/// [`Error::FileRead`] on fatal file failures, or [`Error::BadSectors`]
/// when the pass completed with a nonzero tally.
pub fn run<D, F, G>(
    session: &Session,
    device: &mut D,
    on_total: impl FnOnce(u64),
    mut on_progress: F,
    mut on_bad_sector: G,
) -> Result<()>
where
    D: SectorDevice,
    F: FnMut(u64),
    G: FnMut(u64),
{
    if session.drive > 1 {
        return Err(Error::UnsupportedDevice {
            drive: session.drive,
        });
    }

    let file_size = fs::metadata(&session.image)
        .map_err(|source| Error::FileOpen {
            path: session.image.clone(),
            source,
        })?
        .len();

    if file_size % SECTOR_SIZE as u64 != 0 {
        return Err(Error::SizeAlignment { size: file_size });
    }

    let mut image = File::open(&session.image).map_err(|source| Error::FileOpen {
        path: session.image.clone(),
        source,
    })?;

    let total = match session.scope {
        Scope::BootSectorOnly => 1,
        Scope::WholeDisk => file_size / SECTOR_SIZE as u64,
    };
    debug!(sectors = total, "image size taken from file size");
    on_total(total);

    let mut cursor: u64 = 0;
    let mut bad_sectors: u64 = 0;

    loop {
        let mut buffer = [0u8; SECTOR_SIZE];
        image
            .read_exact(&mut buffer)
            .map_err(|source| Error::FileRead {
                path: session.image.clone(),
                source,
            })?;

        if let Err(e) = device.write_sector(cursor, &buffer) {
            warn!(sector = cursor, "device write failed: {e}");
            on_bad_sector(cursor);
            bad_sectors += 1;
        }

        cursor += 1;
        on_progress(cursor);
        if cursor >= total {
            break;
        }
    }

    if bad_sectors > 0 {
        return Err(Error::BadSectors { count: bad_sectors });
    }
    Ok(())
}
