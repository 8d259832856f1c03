//! Contains the logic for comparing an image file against a drive.
//!
//! Verify reads both sides but writes neither. It refuses to start (or, for
//! a whole-disk pass, to continue past sector 0) when the file's size does
//! not match the disk's declared size — once the sizes disagree, comparing
//! the rest of the sectors would be meaningless.

use std::fs::{self, File};
use std::io::Read;

use tracing::{debug, warn};

use crate::bootsector::BootSector;
use crate::device::SectorDevice;
use crate::error::{Error, Result};
use crate::{SECTOR_SIZE, Scope, Session};

/// Compares the session's image file against the drive, sector by sector.
///
/// A sector the device fails to deliver is tallied and compared anyway
/// (against a zeroed buffer, so it normally also miscompares). Mismatches
/// are tallied and reported; neither stops the pass. A short read from the
/// image file is fatal.
///
/// # Arguments
///
/// * `session` - Drive, image path, and scope for this transfer.
/// * `device` - The sector transport to read from.
/// * `on_total` - Called once, as soon as the total sector count is known.
/// * `on_progress` - Called after each sector with the number of sectors
///   compared so far.
/// * `on_mismatch` - Called with the index of each sector whose bytes do
///   not match the image.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] when the image file cannot cover the
/// disk, [`Error::FileOpen`] / [`Error::FileRead`] on fatal file failures,
/// or [`Error::BadSectors`] when the pass completed with a nonzero tally.
pub fn run<D, F, G>(
    session: &Session,
    device: &mut D,
    on_total: impl FnOnce(u64),
    mut on_progress: F,
    mut on_mismatch: G,
) -> Result<()>
where
    D: SectorDevice,
    F: FnMut(u64),
    G: FnMut(u64),
{
    let file_size = fs::metadata(&session.image)
        .map_err(|source| Error::FileOpen {
            path: session.image.clone(),
            source,
        })?
        .len();

    // A boot-sector image is exactly one sector; check before touching the
    // drive at all.
    if session.scope == Scope::BootSectorOnly && file_size != SECTOR_SIZE as u64 {
        return Err(Error::SizeMismatch {
            file_size,
            device_size: SECTOR_SIZE as u64,
        });
    }

    let mut image = File::open(&session.image).map_err(|source| Error::FileOpen {
        path: session.image.clone(),
        source,
    })?;

    let mut on_total = Some(on_total);
    let mut total: u64 = 1;
    let mut cursor: u64 = 0;
    let mut bad_sectors: u64 = 0;

    loop {
        let mut device_buffer = [0u8; SECTOR_SIZE];
        let mut file_buffer = [0u8; SECTOR_SIZE];

        if let Err(e) = device.read_sector(cursor, &mut device_buffer) {
            warn!(sector = cursor, "device read failed: {e}");
            bad_sectors += 1;
        }

        if cursor == 0 {
            total = match session.scope {
                Scope::BootSectorOnly => 1,
                Scope::WholeDisk => {
                    let count = BootSector::parse(&device_buffer).sector_count();
                    debug!(sectors = count, "resolved disk size from boot sector");
                    let device_size = count * SECTOR_SIZE as u64;
                    if file_size != device_size {
                        return Err(Error::SizeMismatch {
                            file_size,
                            device_size,
                        });
                    }
                    count
                }
            };
            if let Some(report) = on_total.take() {
                report(total);
            }
        }

        image
            .read_exact(&mut file_buffer)
            .map_err(|source| Error::FileRead {
                path: session.image.clone(),
                source,
            })?;

        if file_buffer != device_buffer {
            on_mismatch(cursor);
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
