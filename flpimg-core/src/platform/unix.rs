use std::path::PathBuf;

/// The device node for a drive index.
///
/// The kernel exposes legacy floppy drives as `/dev/fd0`, `/dev/fd1`, ...
/// in drive order, so the mapping is direct.
pub fn drive_path(drive: u8) -> PathBuf {
    PathBuf::from(format!("/dev/fd{drive}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_drive_index_to_fd_node() {
        assert_eq!(drive_path(0), PathBuf::from("/dev/fd0"));
        assert_eq!(drive_path(1), PathBuf::from("/dev/fd1"));
    }
}
