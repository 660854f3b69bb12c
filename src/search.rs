//! # Search Module
//!
//! The bounded file search at the heart of dlss-finder. Two operations live
//! here:
//!
//! 1. **Scanning** ([`scan_directory`]): a depth-first recursive walk of a
//!    single root directory, looking for one exact filename.
//! 2. **Locating** ([`locate_file`]): repeated scans starting in the
//!    working directory and climbing through a bounded number of ancestor
//!    levels, refusing to enter directories whose names mark them as too
//!    large or too risky to crawl.
//!
//! The climb is deliberately conservative. It stops at the depth bound or
//! the filesystem root, and an excluded ancestor name halts it before that
//! level is scanned. Within a single scan root, recursion is unbounded;
//! the depth bound and the exclusion list are the only brakes on runtime.
//!
//! Directories the process cannot read are skipped silently. A failed read
//! anywhere in the tree contributes no match and never aborts the search.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::invariant::assert_invariant;

/// Searches `root` and all of its subdirectories for a regular file named
/// exactly `filename`.
///
/// The first match in traversal order wins; there is no ranking. Exactly
/// one real candidate is assumed to exist under any given root, so the
/// traversal order only needs to be deterministic for an unchanged tree,
/// which `walkdir` provides.
///
/// Returns `None` when no match exists or when `root` itself cannot be
/// read. `filename` must be a plain name without path separators.
pub fn scan_directory(root: &Path, filename: &str) -> Option<PathBuf> {
    debug!("Scanning directory: {:?}", root);

    let found = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == filename)
        .map(walkdir::DirEntry::into_path);

    if let Some(path) = &found {
        assert_invariant(
            path.file_name().is_some_and(|name| name == filename),
            "Scanner results carry the requested filename",
            Some("Scanner"),
        );
    }

    found
}

/// Searches for `filename` in `start_dir` and then in a bounded chain of
/// its ancestors, preferring matches closer to `start_dir`.
///
/// # Algorithm
///
/// 1. Scan `start_dir` in full. Return on a match.
/// 2. Climb one level at a time, up to `max_depth` levels. At each
///    climbed-to level:
///    - stop the ascent without scanning if the level's final path
///      component is listed in `excluded_dirs`, or if the level is the
///      filesystem root;
///    - scan the level in full, then scan each of its immediate child
///      directories except the subtree the ascent just climbed out of.
///      Return on the first match.
/// 3. Report "not found" once the bound is exhausted.
///
/// The exclusion match is exact and case-sensitive. `start_dir` itself is
/// always scanned, even if its own name appears in `excluded_dirs`; the
/// list only guards the ascent.
///
/// # Arguments
/// * `filename` - Plain filename to match exactly, no separators.
/// * `start_dir` - Absolute directory the search radiates out from.
/// * `max_depth` - How many ancestor levels may be climbed.
/// * `excluded_dirs` - Directory names that terminate the climb on sight.
pub fn locate_file(
    filename: &str,
    start_dir: &Path,
    max_depth: u32,
    excluded_dirs: &[&str],
) -> Option<PathBuf> {
    // Level 0: the starting directory and everything under it.
    if let Some(found) = scan_directory(start_dir, filename) {
        return Some(found);
    }

    let mut current = start_dir.to_path_buf();

    for _ in 0..max_depth {
        let Some(parent) = current.parent().map(Path::to_path_buf) else {
            debug!("Ascent exhausted, {:?} has no parent", current);
            break;
        };
        let previous = std::mem::replace(&mut current, parent);

        let at_excluded = is_excluded(&current, excluded_dirs);
        if at_excluded || current.parent().is_none() {
            debug!("Ascent stopped at {:?}", current);
            break;
        }
        assert_invariant(
            !at_excluded,
            "The ascent never scans an excluded ancestor",
            Some("Locator"),
        );

        debug!("Climbing to {:?} (came from {:?})", current, previous);
        if let Some(found) = scan_directory(&current, filename) {
            return Some(found);
        }

        // Each immediate child directory becomes a scan root of its own,
        // except the subtree the ascent just left. That subtree has been
        // covered in full on an earlier level and is never re-entered as
        // a root.
        for entry in fs::read_dir(&current)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
        {
            let path = entry.path();
            if path == previous || !path.is_dir() {
                continue;
            }
            if let Some(found) = scan_directory(&path, filename) {
                return Some(found);
            }
        }
    }

    None
}

/// True when the final path component of `dir` is one of `excluded_dirs`.
/// A path without a final component (a filesystem root) is never excluded;
/// the locator stops at roots through its own parent check.
fn is_excluded(dir: &Path, excluded_dirs: &[&str]) -> bool {
    dir.file_name()
        .map(|name| excluded_dirs.iter().any(|excluded| name == *excluded))
        .unwrap_or(false)
}
