//! Contains the logic for reading a drive into a flat image file.
//!
//! The image is a headerless concatenation of 512-byte sectors in ascending
//! index order. Sector 0 doubles as the size authority: its boot sector
//! declares how many sectors the whole-disk pass covers.

use std::fs::File;
use std::io::Write;

use tracing::{debug, warn};

use crate::bootsector::BootSector;
use crate::device::SectorDevice;
use crate::error::{Error, Result};
use crate::{SECTOR_SIZE, Scope, Session};

/// Reads a drive, sector by sector, into the session's image file.
///
/// A sector the device fails to deliver is tallied and written to the image
/// as zeros; the pass keeps going, so the operator ends up with a complete
/// error count and a best-effort partial image. File errors abort
/// immediately.
///
/// # Arguments
///
/// * `session` - Drive, image path, and scope for this transfer.
/// * `device` - The sector transport to read from.
/// * `on_total` - Called once, as soon as the total sector count is known
///   (after sector 0 for a whole-disk pass).
/// * `on_progress` - Called after each sector with the number of sectors
///   transferred so far.
/// * `on_bad_sector` - Called with the index of each sector the device
///   failed to read.
///
/// # Errors
///
/// Returns [`Error::FileOpen`], [`Error::FileWrite`] or [`Error::FileClose`]
/// on a fatal file failure, or [`Error::BadSectors`] when the pass completed
/// but the tally is nonzero.
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
    let mut image = File::create(&session.image).map_err(|source| Error::FileOpen {
        path: session.image.clone(),
        source,
    })?;

    let mut on_total = Some(on_total);
    let mut total: u64 = 1;
    let mut cursor: u64 = 0;
    let mut bad_sectors: u64 = 0;

    loop {
        // Zeroed up front so a failed read leaves a defined sector body.
        let mut buffer = [0u8; SECTOR_SIZE];
        if let Err(e) = device.read_sector(cursor, &mut buffer) {
            warn!(sector = cursor, "device read failed: {e}");
            on_bad_sector(cursor);
            bad_sectors += 1;
        }

        if cursor == 0 {
            total = match session.scope {
                Scope::BootSectorOnly => 1,
                Scope::WholeDisk => {
                    let count = BootSector::parse(&buffer).sector_count();
                    debug!(sectors = count, "resolved image size from boot sector");
                    count
                }
            };
            if let Some(report) = on_total.take() {
                report(total);
            }
        }

        image
            .write_all(&buffer)
            .map_err(|source| Error::FileWrite {
                path: session.image.clone(),
                source,
            })?;

        cursor += 1;
        on_progress(cursor);
        if cursor >= total {
            break;
        }
    }

    image.sync_all().map_err(|source| Error::FileClose {
        path: session.image.clone(),
        source,
    })?;

    if bad_sectors > 0 {
        return Err(Error::BadSectors { count: bad_sectors });
    }
    Ok(())
}
