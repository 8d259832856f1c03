//! DOS boot sector (BIOS parameter block) parsing.
//!
//! Sector 0 of a FAT-formatted floppy carries a fixed-layout parameter block.
//! The transfer engines only consume one field from it, the logical sector
//! count, which tells them how many sectors make up a whole-disk image.

use crate::SECTOR_SIZE;

/// Size in bytes of the parameter block at the start of sector 0.
pub const BOOT_RECORD_SIZE: usize = 30;

/// Sector count assumed when the boot sector declares zero logical sectors.
///
/// The old 160 KB format predates the logical-sector-count field and leaves
/// it zeroed; 160 KB disks hold 310 usable sectors. Other pre-BPB formats
/// (180/320/360 KB) are not auto-detected.
pub const FALLBACK_SECTOR_COUNT: u64 = 310;

/// The parameter block decoded from the first sector of a disk or image.
///
/// Fields are read with explicit little-endian decoding at fixed offsets
/// rather than overlaying a packed struct, so the layout stays byte-exact on
/// any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSector {
    /// x86 jump instruction to the boot code.
    pub jump: [u8; 3],
    /// OEM name and version.
    pub oem_name: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub root_entries: u16,
    /// Total sector count of the medium. Zero on pre-BPB formats.
    pub logical_sectors: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub head_count: u16,
    pub hidden_sectors: u16,
}

// Field offsets within sector 0. The record must span exactly
// BOOT_RECORD_SIZE bytes.
const JUMP: usize = 0;
const OEM_NAME: usize = 3;
const BYTES_PER_SECTOR: usize = 11;
const SECTORS_PER_CLUSTER: usize = 13;
const RESERVED_SECTORS: usize = 14;
const FAT_COUNT: usize = 16;
const ROOT_ENTRIES: usize = 17;
const LOGICAL_SECTORS: usize = 19;
const MEDIA_DESCRIPTOR: usize = 21;
const SECTORS_PER_FAT: usize = 22;
const SECTORS_PER_TRACK: usize = 24;
const HEAD_COUNT: usize = 26;
const HIDDEN_SECTORS: usize = 28;

const _: () = assert!(HIDDEN_SECTORS + 2 == BOOT_RECORD_SIZE);

fn le_u16(sector: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([sector[offset], sector[offset + 1]])
}

impl BootSector {
    /// Decode the parameter block from a full sector buffer.
    ///
    /// Cannot fail: every field sits at a fixed offset inside the buffer.
    /// Garbage in, garbage out — callers that read sector 0 from a bad
    /// medium get a zeroed buffer and therefore a zeroed record.
    pub fn parse(sector: &[u8; SECTOR_SIZE]) -> Self {
        let mut oem_name = [0u8; 8];
        oem_name.copy_from_slice(&sector[OEM_NAME..OEM_NAME + 8]);

        Self {
            jump: [sector[JUMP], sector[JUMP + 1], sector[JUMP + 2]],
            oem_name,
            bytes_per_sector: le_u16(sector, BYTES_PER_SECTOR),
            sectors_per_cluster: sector[SECTORS_PER_CLUSTER],
            reserved_sectors: le_u16(sector, RESERVED_SECTORS),
            fat_count: sector[FAT_COUNT],
            root_entries: le_u16(sector, ROOT_ENTRIES),
            logical_sectors: le_u16(sector, LOGICAL_SECTORS),
            media_descriptor: sector[MEDIA_DESCRIPTOR],
            sectors_per_fat: le_u16(sector, SECTORS_PER_FAT),
            sectors_per_track: le_u16(sector, SECTORS_PER_TRACK),
            head_count: le_u16(sector, HEAD_COUNT),
            hidden_sectors: le_u16(sector, HIDDEN_SECTORS),
        }
    }

    /// The total sector count governing a whole-disk transfer.
    ///
    /// Returns the declared logical sector count, or
    /// [`FALLBACK_SECTOR_COUNT`] when the field is zero.
    pub fn sector_count(&self) -> u64 {
        if self.logical_sectors == 0 {
            FALLBACK_SECTOR_COUNT
        } else {
            u64::from(self.logical_sectors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a sector 0 with the geometry of a 1.44 MB floppy, overriding
    /// the logical sector count.
    fn sample_sector(logical_sectors: u16) -> [u8; SECTOR_SIZE] {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        sector[3..11].copy_from_slice(b"MSDOS5.0");
        sector[11..13].copy_from_slice(&512u16.to_le_bytes());
        sector[13] = 1; // sectors per cluster
        sector[14..16].copy_from_slice(&1u16.to_le_bytes());
        sector[16] = 2; // FAT copies
        sector[17..19].copy_from_slice(&224u16.to_le_bytes());
        sector[19..21].copy_from_slice(&logical_sectors.to_le_bytes());
        sector[21] = 0xF0;
        sector[22..24].copy_from_slice(&9u16.to_le_bytes());
        sector[24..26].copy_from_slice(&18u16.to_le_bytes());
        sector[26..28].copy_from_slice(&2u16.to_le_bytes());
        sector[28..30].copy_from_slice(&0u16.to_le_bytes());
        sector[510] = 0x55;
        sector[511] = 0xAA;
        sector
    }

    #[test]
    fn parses_all_fields() {
        let bs = BootSector::parse(&sample_sector(2880));
        assert_eq!(bs.jump, [0xEB, 0x3C, 0x90]);
        assert_eq!(&bs.oem_name, b"MSDOS5.0");
        assert_eq!(bs.bytes_per_sector, 512);
        assert_eq!(bs.sectors_per_cluster, 1);
        assert_eq!(bs.reserved_sectors, 1);
        assert_eq!(bs.fat_count, 2);
        assert_eq!(bs.root_entries, 224);
        assert_eq!(bs.logical_sectors, 2880);
        assert_eq!(bs.media_descriptor, 0xF0);
        assert_eq!(bs.sectors_per_fat, 9);
        assert_eq!(bs.sectors_per_track, 18);
        assert_eq!(bs.head_count, 2);
        assert_eq!(bs.hidden_sectors, 0);
    }

    #[test]
    fn sector_count_uses_declared_value() {
        let bs = BootSector::parse(&sample_sector(2880));
        assert_eq!(bs.sector_count(), 2880);

        let bs = BootSector::parse(&sample_sector(720));
        assert_eq!(bs.sector_count(), 720);

        let bs = BootSector::parse(&sample_sector(1));
        assert_eq!(bs.sector_count(), 1);
    }

    #[test]
    fn sector_count_falls_back_on_zero() {
        let bs = BootSector::parse(&sample_sector(0));
        assert_eq!(bs.sector_count(), FALLBACK_SECTOR_COUNT);
    }

    #[test]
    fn zeroed_sector_falls_back() {
        // A failed sector-0 read leaves the engine with an all-zero buffer.
        let bs = BootSector::parse(&[0u8; SECTOR_SIZE]);
        assert_eq!(bs.sector_count(), 310);
    }
}
