//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `laboveda_core` linkage and
//!   store bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use laboveda_core::db::open_db_in_memory;

fn main() {
    println!("laboveda_core version={}", laboveda_core::core_version());
    match open_db_in_memory() {
        Ok(_) => println!("laboveda_core store=ready"),
        Err(err) => println!("laboveda_core store=error detail={err}"),
    }
}
