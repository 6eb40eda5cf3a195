//! Stops command implementation.
//!
//! Parses a stops file and prints the resolved set, sorted the way the
//! pipeline will use it. Useful for checking a file before a long render.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{Result, StippleError};
use crate::output::{display_path, plural, Printer};
use crate::types::{StopKind, StopSet};

/// Inspect a stops file
#[derive(Args, Debug)]
pub struct StopsArgs {
    /// Stops file (YAML)
    pub file: PathBuf,
}

pub fn run(args: StopsArgs) -> Result<()> {
    let printer = Printer::new();

    let source = fs::read_to_string(&args.file).map_err(|e| StippleError::Io {
        path: args.file.clone(),
        message: format!("Failed to read stops file: {}", e),
    })?;
    let set = StopSet::from_yaml(&source)?;

    printer.status(
        "Loaded",
        &format!(
            "{} from {}",
            plural(set.len(), "stop", "stops"),
            display_path(&args.file)
        ),
    );

    for stop in set.stops() {
        let payload = match &stop.kind {
            StopKind::Character(text) => format!("character {:?}", text),
            StopKind::Bitmap(handle) => format!("bitmap {}", handle),
        };
        let background = match stop.background {
            Some(colour) => format!(" on {}", colour),
            None => String::new(),
        };
        println!(
            "{:>6.1}%  {}  {}{}",
            stop.percentage, payload, stop.foreground, background
        );
    }

    Ok(())
}
