//! Live re-run loop: watch a scenario file and run it again on every change

use crate::{load_scenario, print_result, Overrides};
use anyhow::{Context, Result};
use jostle_core::run_scenario;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use tracing::{debug, warn};

pub fn watch_file(file: &Path, overrides: &Overrides) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // The receiver only goes away on shutdown
        let _ = tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(file, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", file.display()))?;

    run_once(file, overrides);

    for res in rx {
        match res {
            Ok(event) if is_change(&event.kind) => {
                debug!(path = %file.display(), "scenario changed");
                run_once(file, overrides);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "watch error"),
        }
    }

    Ok(())
}

fn is_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

/// Load errors are reported and the watch keeps going
fn run_once(file: &Path, overrides: &Overrides) {
    match load_scenario(file, overrides) {
        Ok(scenario) => print_result(&run_scenario(scenario)),
        Err(e) => eprintln!("Error: {:#}", e),
    }
}
