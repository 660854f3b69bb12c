//! # Installer Module
//!
//! Turns a located DLSS library into an installed one. The module owns the
//! policy around the copy:
//!
//! - **Directory gate**: installation targets an Unreal-style
//!   `Binaries/Win64` directory. Outside that layout the library must
//!   already sit in the starting directory itself.
//! - **Already-installed check**: an existing `_nvngx.dll` larger than the
//!   minimum size short-circuits the whole search.
//! - **Validity check**: a located file smaller than the minimum size is a
//!   stub or a placeholder and is never installed.
//!
//! Every failure is a typed [`InstallError`] carrying its process exit
//! code; the caller decides how to surface it.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::invariant::assert_invariant;
use crate::search::locate_file;

/// Filename the DLSS runtime ships under.
pub const DLSS_FILENAME: &str = "nvngx_dlss.dll";

/// Filename the library is installed under next to the game binary.
pub const INSTALL_FILENAME: &str = "_nvngx.dll";

/// Smallest byte size a genuine DLSS library can have. Anything below this
/// is a dummy left behind by a stripped build. Size is the only validity
/// check; richer inspection of the payload tends to trip antivirus
/// heuristics.
pub const MINIMUM_FILESIZE: u64 = 32_000_000;

/// Default number of ancestor levels the locator may climb.
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Ancestor names that end the climb on sight. These trees are either far
/// too large to crawl or hold files no installer should ever pick up; a
/// stray download must never become the installed library.
pub const EXCLUDED_ANCESTORS: &[&str] = &[
    "Program Files",
    "Program Files (x86)",
    "steamapps",
    "Users",
    "Downloads",
];

/// Why an installation did not happen. Each variant maps onto one process
/// exit code and one user-facing message.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The starting directory is not a `Binaries/Win64` layout and holds
    /// no local copy of the library either.
    #[error("DLSS file not found in current directory and the game directory structure is unsupported")]
    UnsupportedDirectory,

    /// The search envelope is exhausted without a match.
    #[error("DLSS file not found")]
    FileNotFound,

    /// A file with the right name was found but is below the size floor.
    #[error("DLSS file is invalid")]
    InvalidFile,

    /// The located file could not be read or copied into place.
    #[error("Error copying DLSS file")]
    CopyFailed(#[source] std::io::Error),
}

impl InstallError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::UnsupportedDirectory => 1,
            InstallError::FileNotFound => 2,
            InstallError::InvalidFile => 3,
            InstallError::CopyFailed(_) => 4,
        }
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A valid library was already in place; nothing was searched.
    AlreadyInstalled,
    /// A library was located and copied into the starting directory.
    Installed,
}

impl InstallOutcome {
    /// User-facing message for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            InstallOutcome::AlreadyInstalled => "DLSS file is already installed",
            InstallOutcome::Installed => "DLSS file installed successfully",
        }
    }
}

/// Locates the DLSS library near `start_dir` and copies it into
/// `start_dir` under [`INSTALL_FILENAME`], overwriting any existing file
/// there.
///
/// The sequence is: directory gate, already-installed check, bounded
/// search, size validation, copy. The first step that fails decides the
/// returned [`InstallError`].
pub fn install_dlss(
    start_dir: &Path,
    max_depth: u32,
    excluded_dirs: &[&str],
) -> Result<InstallOutcome, InstallError> {
    let destination = start_dir.join(INSTALL_FILENAME);
    debug!("Install destination: {:?}", destination);

    if !is_engine_binaries_dir(start_dir) {
        // Not an Unreal layout. The run can still make sense when the
        // library sits right in the starting directory.
        debug!("{:?} is not a Binaries/Win64 directory", start_dir);
        if !start_dir.join(DLSS_FILENAME).exists() {
            return Err(InstallError::UnsupportedDirectory);
        }
    }

    // A metadata failure here counts as "not installed yet" and the run
    // carries on with the search.
    let already_installed = fs::metadata(&destination)
        .map(|meta| meta.len() > MINIMUM_FILESIZE)
        .unwrap_or(false);
    if already_installed {
        info!("DLSS file already installed at {:?}", destination);
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let Some(found) = locate_file(DLSS_FILENAME, start_dir, max_depth, excluded_dirs) else {
        return Err(InstallError::FileNotFound);
    };
    info!("Found DLSS library at {:?}", found);

    let size = fs::metadata(&found).map_err(InstallError::CopyFailed)?.len();
    if size < MINIMUM_FILESIZE {
        warn!("Rejecting undersized DLSS file ({} bytes): {:?}", size, found);
        return Err(InstallError::InvalidFile);
    }
    assert_invariant(
        size >= MINIMUM_FILESIZE,
        "Only full-size DLSS payloads are installed",
        Some("Installer"),
    );

    fs::copy(&found, &destination).map_err(InstallError::CopyFailed)?;
    info!("Installed {:?} as {:?}", found, destination);

    Ok(InstallOutcome::Installed)
}

/// True when `dir` is named `Win64` and sits directly under a directory
/// named `Binaries`, the layout Unreal Engine games ship their binaries
/// in.
fn is_engine_binaries_dir(dir: &Path) -> bool {
    let in_win64 = dir.file_name().is_some_and(|name| name == "Win64");
    let under_binaries = dir
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == "Binaries");
    in_win64 && under_binaries
}
