use std::path::Path;

use anyhow::Result;
use iscroll_core::AppConfig;
use tracing::info;

pub fn run(config: &AppConfig, path: &Path, init: bool) -> Result<()> {
    if !init {
        let state = if path.exists() { "" } else { " (not created, using defaults)" };
        println!("{}{}", path.display(), state);
        return Ok(());
    }

    if path.exists() {
        println!("{} already exists", path.display());
        return Ok(());
    }

    config.save(path)?;
    info!(path = %path.display(), "Wrote default configuration");
    println!("Wrote {}", path.display());
    Ok(())
}
