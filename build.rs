//! Build script for CGM
//!
//! Increments build number on each recompilation and embeds build metadata.
//! CI can pin the number with `CGM_BUILD_NUMBER`; the counter file is then
//! left untouched.

use std::fs;
use std::path::PathBuf;

fn main() {
    // Only rerun when src/ files change (not on every cargo build)
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=CGM_BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=CGM_BUILD_NUMBER_FILE");

    let build_number = match std::env::var("CGM_BUILD_NUMBER") {
        Ok(pinned) => pinned
            .trim()
            .parse::<u64>()
            .expect("CGM_BUILD_NUMBER must be a whole number"),
        Err(_) => next_build_number(),
    };

    // Get current timestamp
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    // Set environment variables for compile-time embedding
    println!("cargo:rustc-env=CGM_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=CGM_BUILD_TIMESTAMP={}", timestamp);
}

/// Read, increment and write back the local counter file
fn next_build_number() -> u64 {
    let path = std::env::var("CGM_BUILD_NUMBER_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("build_number.txt"));

    // Missing or garbled file starts at 0
    let current: u64 = fs::read_to_string(&path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);

    let next = current + 1;
    fs::write(&path, next.to_string()).expect("Failed to write build number file");
    next
}
