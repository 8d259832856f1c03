//! Provides platform-specific functionality.
//!
//! The only platform concern in this crate is locating the raw device node
//! for a drive index. Each submodule exposes the same `drive_path` function,
//! selected with conditional compilation, so the rest of the library never
//! has to care about the target OS.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use self::unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::*;
