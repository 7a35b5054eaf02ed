//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `traveldiary_core` linkage.
//! - Optionally report how many entries a diary database holds.
//!
//! Usage: `traveldiary_cli [DB_PATH]` (falls back to `TRAVELDIARY_DB_PATH`).

use std::process::ExitCode;
use traveldiary_core::{summarize, EntryStore};

fn main() -> ExitCode {
    println!("traveldiary_core ping={}", traveldiary_core::ping());
    println!("traveldiary_core version={}", traveldiary_core::core_version());

    let Some(db_path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TRAVELDIARY_DB_PATH").ok())
        .filter(|path| !path.trim().is_empty())
    else {
        return ExitCode::SUCCESS;
    };

    match EntryStore::open(db_path.trim()) {
        Ok(store) => {
            let summary = summarize(&store.list());
            println!(
                "traveldiary_core memories={} locations={}",
                summary.memories, summary.locations
            );
            if let Err(err) = store.close() {
                eprintln!("traveldiary_core close failed: {err}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("traveldiary_core open failed: {err}");
            ExitCode::FAILURE
        }
    }
}
