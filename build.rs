//! # Build Script
//!
//! This script runs during the build process (before compilation).
//! Its primary job is to embed the Windows Application Manifest
//! (`app.manifest`, referenced from `app.rc`) into the final executable.
//!
//! The manifest controls:
//! - DPI Awareness (so the status window and boxes render crisply).
//! - User Account Control (UAC) behavior: `asInvoker`, the tool must
//!   never trigger an elevation prompt from inside a game directory.
//! - Windows Version Compatibility (identifying as Win10/11 compatible).

fn main() {
    // Embeds the resource script as a Windows resource.
    // We ignore the result because if it fails, the app still builds, just without the manifest.
    let _ = embed_resource::compile("app.rc", embed_resource::NONE);
}
