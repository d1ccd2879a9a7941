//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cadence_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("cadence_core ping={}", cadence_core::ping());
    println!("cadence_core version={}", cadence_core::core_version());
}
