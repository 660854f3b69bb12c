//! # Invariant Checks
//!
//! Lightweight runtime contracts for the search and install paths.
//!
//! A failed invariant panics in debug and test builds and logs a critical
//! error in release builds. Invariants that hold are recorded in a
//! process-wide registry, which lets tests verify that the contracts they
//! rely on were actually exercised by the scenario under test rather than
//! silently skipped.

use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::{error, info};

lazy_static! {
    /// Descriptions of every invariant that has been checked and held.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// Asserts that a critical invariant holds true.
///
/// # Arguments
/// * `condition` - The boolean result of the check.
/// * `description` - A human-readable description of the invariant
///   (e.g., "Scanner results carry the requested filename").
/// * `component` - Optional component tag (e.g., "Scanner", "Installer").
pub fn assert_invariant(condition: bool, description: &str, component: Option<&str>) {
    if !condition {
        let msg = format!(
            "CRITICAL INVARIANT VIOLATION [{}]: {}",
            component.unwrap_or("General"),
            description
        );
        error!("{}", msg);

        if cfg!(debug_assertions) || cfg!(test) {
            panic!("{}", msg);
        }
    } else if let Ok(mut set) = CHECKED_INVARIANTS.lock() {
        set.insert(description.to_string());
    }
}

/// Verifies, from a test, that the named invariants were actually checked
/// during the scenario that just ran.
///
/// The registry is add-only, so this is safe to call from parallel tests:
/// other tests can only ever contribute entries, never remove the ones the
/// current scenario recorded.
#[allow(dead_code)]
pub fn contract_test(context: &str, required_invariants: &[&str]) {
    let checked = CHECKED_INVARIANTS.lock().unwrap();
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|required| !checked.contains(*required))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Contract test failed for '{}'. The following invariants were NOT checked:\n{:#?}",
            context, missing
        );
    }
    info!("Contract test passed: {}", context);
}
