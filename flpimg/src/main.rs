//! `flpimg` - read, write, and verify raw floppy disk images.
//!
//! One operand names a drive (`a:` or `b:`), the other an image file; their
//! order picks the direction. Drive first reads the drive into the file,
//! file first writes the file onto the drive, and `--verify` compares the
//! two without writing anything.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use flpimg_core::device::DriveDevice;
use flpimg_core::{Scope, Session, read, verify, write};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Read and write floppy disk images, one sector at a time.
///
/// Use to back up things like bootable disks.
#[derive(Parser)]
#[command(name = "flpimg", version)]
#[command(about = "Read/write floppy disk images")]
#[command(after_help = "\
Read from drive to file:
  flpimg a: floppy.img

Write from file to drive:
  flpimg floppy.img a:

Verify a file against a drive:
  flpimg -v a: floppy.img")]
struct Cli {
    /// Transfer the boot sector only
    #[arg(short = 'b', long = "boot-sector")]
    boot_sector: bool,

    /// Compare the image against the drive instead of copying
    #[arg(short = 'v', long = "verify")]
    verify: bool,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Drive letter ("a:") or image file
    source: String,

    /// Drive letter ("a:") or image file
    dest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
    Verify,
}

/// What one invocation asks for, classified from the two operands.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    mode: Mode,
    drive: u8,
    image: PathBuf,
}

/// Parse a drive-letter token such as "a:" into a drive index.
fn parse_drive_token(operand: &str) -> Option<u8> {
    let bytes = operand.as_bytes();
    if bytes.len() == 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        Some(bytes[0].to_ascii_lowercase() - b'a')
    } else {
        None
    }
}

/// Work out the operating mode from the operand order and flags.
///
/// Exactly one operand must be a drive letter. A drive letter in front
/// selects read mode, behind selects write mode; `--verify` overrides both.
fn classify(source: &str, dest: &str, verify: bool) -> Result<Invocation> {
    let (mode, drive, image) = match (parse_drive_token(source), parse_drive_token(dest)) {
        (Some(_), Some(_)) => bail!("command line error: two drive letters given"),
        (None, None) => bail!("command line error: no drive letter given"),
        (Some(drive), None) => (Mode::Read, drive, dest),
        (None, Some(drive)) => (Mode::Write, drive, source),
    };
    Ok(Invocation {
        mode: if verify { Mode::Verify } else { mode },
        drive,
        image: PathBuf::from(image),
    })
}

fn sector_bar(prefix: &'static str) -> (ProgressBar, impl FnOnce(u64)) {
    let bar = ProgressBar::new(0);
    let setup = bar.clone();
    let on_total = move |total| {
        setup.set_length(total);
        setup.set_prefix(prefix);
        setup.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{prefix:12} [{elapsed_precise}] [{bar:40.green/black}] {pos}/{len} sectors",
                )
                .unwrap()
                .progress_chars("■ "),
        );
    };
    (bar, on_total)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let invocation = classify(&cli.source, &cli.dest, cli.verify)?;
    let scope = if cli.boot_sector {
        Scope::BootSectorOnly
    } else {
        Scope::WholeDisk
    };
    let session = Session::new(invocation.drive, invocation.image).scope(scope);

    match invocation.mode {
        Mode::Read => {
            let mut drive = DriveDevice::open(session.drive, false)?;
            let (bar, on_total) = sector_bar("Reading");

            let result = read::run(
                &session,
                &mut drive,
                on_total,
                |done| bar.set_position(done),
                |sector| {
                    bar.println(format!(
                        "{} reading sector {sector}",
                        style("error").red().bold()
                    ));
                },
            );
            finish(result, &bar, "Disk read successfully")
        }
        Mode::Write => {
            let mut drive = DriveDevice::open(session.drive, true)?;
            let (bar, on_total) = sector_bar("Writing");

            let result = write::run(
                &session,
                &mut drive,
                on_total,
                |done| bar.set_position(done),
                |sector| {
                    bar.println(format!(
                        "{} writing sector {sector}",
                        style("error").red().bold()
                    ));
                },
            );
            finish(result, &bar, "Disk write succeeded")
        }
        Mode::Verify => {
            let mut drive = DriveDevice::open(session.drive, false)?;
            let (bar, on_total) = sector_bar("Verifying");

            let result = verify::run(
                &session,
                &mut drive,
                on_total,
                |done| bar.set_position(done),
                |sector| bar.println(format!("Sector {sector} does not match")),
            );
            finish(result, &bar, "Disk verify succeeded")
        }
    }
}

/// Close out the progress bar and report the final outcome.
fn finish(
    result: flpimg_core::error::Result<()>,
    bar: &ProgressBar,
    success_message: &str,
) -> Result<()> {
    match result {
        Ok(()) => {
            bar.finish_and_clear();
            println!("{}", style(success_message).green());
            Ok(())
        }
        Err(e) => {
            bar.finish_and_clear();
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_tokens_parse_case_insensitively() {
        assert_eq!(parse_drive_token("a:"), Some(0));
        assert_eq!(parse_drive_token("B:"), Some(1));
        assert_eq!(parse_drive_token("z:"), Some(25));
    }

    #[test]
    fn non_drive_operands_are_files() {
        assert_eq!(parse_drive_token("floppy.img"), None);
        assert_eq!(parse_drive_token("a"), None);
        assert_eq!(parse_drive_token("ab:"), None);
        assert_eq!(parse_drive_token("1:"), None);
        assert_eq!(parse_drive_token(""), None);
    }

    #[test]
    fn drive_first_selects_read_mode() {
        let inv = classify("a:", "floppy.img", false).unwrap();
        assert_eq!(inv.mode, Mode::Read);
        assert_eq!(inv.drive, 0);
        assert_eq!(inv.image, PathBuf::from("floppy.img"));
    }

    #[test]
    fn file_first_selects_write_mode() {
        let inv = classify("floppy.img", "b:", false).unwrap();
        assert_eq!(inv.mode, Mode::Write);
        assert_eq!(inv.drive, 1);
    }

    #[test]
    fn verify_flag_overrides_either_order() {
        let inv = classify("a:", "floppy.img", true).unwrap();
        assert_eq!(inv.mode, Mode::Verify);

        let inv = classify("floppy.img", "a:", true).unwrap();
        assert_eq!(inv.mode, Mode::Verify);
    }

    #[test]
    fn rejects_malformed_operand_pairs() {
        assert!(classify("a:", "b:", false).is_err());
        assert!(classify("one.img", "two.img", false).is_err());
    }
}
