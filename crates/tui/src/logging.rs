use std::{fs::OpenOptions, path::Path, sync::Mutex};

use crate::error::Result;

/// Sends `tracing` output to `path`: the terminal belongs to the UI.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("mercado_tui={level},engine={level}"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
