use std::path::PathBuf;

/// The device node for a drive index.
///
/// Raw volume access on Windows goes through the `\\.\X:` namespace, with
/// drive 0 mapping to `\\.\A:`.
pub fn drive_path(drive: u8) -> PathBuf {
    let letter = (b'A' + drive.min(25)) as char;
    PathBuf::from(format!(r"\\.\{letter}:"))
}
