//! Sector-level device transport.
//!
//! The transfer engines never talk to hardware directly; they go through the
//! [`SectorDevice`] trait, which moves exactly one sector per call. The real
//! implementation is [`DriveDevice`], backed by the operating system's raw
//! device node. [`MemoryDevice`] is a simulated drive used by the test suite
//! and by front-ends that want a dry run.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};
use crate::{SECTOR_SIZE, platform};

/// One-sector-at-a-time access to a numbered drive.
///
/// Implementations take `&mut self` because a transfer owns its device
/// exclusively for the duration of the operation; there is never more than
/// one outstanding call.
pub trait SectorDevice {
    /// Read the sector at `index` into `buf`.
    ///
    /// On failure the buffer contents are unspecified; callers that want a
    /// defined fallback must zero the buffer first.
    fn read_sector(&mut self, index: u64, buf: &mut [u8; SECTOR_SIZE]) -> io::Result<()>;

    /// Write `buf` to the sector at `index`.
    fn write_sector(&mut self, index: u64, buf: &[u8; SECTOR_SIZE]) -> io::Result<()>;
}

/// A physical drive, addressed through the platform's raw device node.
pub struct DriveDevice {
    file: File,
}

impl DriveDevice {
    /// Open the device node for a drive index (0 = A:, 1 = B:, ...).
    ///
    /// The node is always opened for reading; pass `writable` to also open
    /// it for writing.
    pub fn open(drive: u8, writable: bool) -> Result<Self> {
        let path = platform::drive_path(drive);
        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(&path)
            .map_err(|source| Error::DriveOpen { drive, source })?;
        Ok(Self { file })
    }
}

impl SectorDevice for DriveDevice {
    fn read_sector(&mut self, index: u64, buf: &mut [u8; SECTOR_SIZE]) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(index * SECTOR_SIZE as u64))?;
        self.file.read_exact(buf)
    }

    fn write_sector(&mut self, index: u64, buf: &[u8; SECTOR_SIZE]) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(index * SECTOR_SIZE as u64))?;
        self.file.write_all(buf)
    }
}

/// An in-memory drive with injectable per-sector faults.
///
/// Reads and writes against a sector listed in the fault set fail the same
/// way a bad physical sector would, without touching any data.
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    data: Vec<u8>,
    bad_sectors: BTreeSet<u64>,
    reads: u64,
}

impl MemoryDevice {
    /// Create a zero-filled device of `sector_count` sectors.
    pub fn new(sector_count: u64) -> Self {
        Self {
            data: vec![0u8; sector_count as usize * SECTOR_SIZE],
            bad_sectors: BTreeSet::new(),
            reads: 0,
        }
    }

    /// Create a device holding `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not a whole number of sectors.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        assert!(
            data.len() % SECTOR_SIZE == 0,
            "device contents must be a whole number of sectors"
        );
        Self {
            data,
            bad_sectors: BTreeSet::new(),
            reads: 0,
        }
    }

    /// Mark a sector as bad: every read or write of it will fail.
    #[must_use]
    pub fn fail_sector(mut self, index: u64) -> Self {
        self.bad_sectors.insert(index);
        self
    }

    /// The raw device contents.
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Number of sector reads attempted so far, including failed ones.
    pub fn read_count(&self) -> u64 {
        self.reads
    }

    fn sector_range(&self, index: u64) -> io::Result<std::ops::Range<usize>> {
        let start = index as usize * SECTOR_SIZE;
        let end = start + SECTOR_SIZE;
        if end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("sector {index} is past the end of the medium"),
            ));
        }
        Ok(start..end)
    }
}

impl SectorDevice for MemoryDevice {
    fn read_sector(&mut self, index: u64, buf: &mut [u8; SECTOR_SIZE]) -> io::Result<()> {
        self.reads += 1;
        if self.bad_sectors.contains(&index) {
            return Err(io::Error::other(format!("simulated read fault at sector {index}")));
        }
        let range = self.sector_range(index)?;
        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write_sector(&mut self, index: u64, buf: &[u8; SECTOR_SIZE]) -> io::Result<()> {
        if self.bad_sectors.contains(&index) {
            return Err(io::Error::other(format!("simulated write fault at sector {index}")));
        }
        let range = self.sector_range(index)?;
        self.data[range].copy_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_device_round_trips_a_sector() {
        let mut device = MemoryDevice::new(3);
        let sector = [0xA5u8; SECTOR_SIZE];
        device.write_sector(2, &sector).unwrap();

        let mut back = [0u8; SECTOR_SIZE];
        device.read_sector(2, &mut back).unwrap();
        assert_eq!(back, sector);
    }

    #[test]
    fn memory_device_fails_marked_sectors() {
        let mut device = MemoryDevice::new(2).fail_sector(1);
        let mut buf = [0u8; SECTOR_SIZE];

        device.read_sector(0, &mut buf).unwrap();
        assert!(device.read_sector(1, &mut buf).is_err());
        assert!(device.write_sector(1, &buf).is_err());
    }

    #[test]
    fn memory_device_rejects_out_of_range() {
        let mut device = MemoryDevice::new(1);
        let mut buf = [0u8; SECTOR_SIZE];
        assert!(device.read_sector(1, &mut buf).is_err());
        assert!(device.write_sector(5, &buf).is_err());
    }

    #[test]
    fn memory_device_counts_reads() {
        let mut device = MemoryDevice::new(2).fail_sector(0);
        let mut buf = [0u8; SECTOR_SIZE];
        assert_eq!(device.read_count(), 0);

        let _ = device.read_sector(0, &mut buf);
        device.read_sector(1, &mut buf).unwrap();
        assert_eq!(device.read_count(), 2);
    }

    #[test]
    #[should_panic(expected = "whole number of sectors")]
    fn from_bytes_rejects_partial_sector() {
        let _ = MemoryDevice::from_bytes(vec![0u8; 513]);
    }
}
