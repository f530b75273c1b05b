pub mod build;
pub mod core;
pub mod layout;
pub mod ports;

use std::path::Path;

use anyhow::{Context, Result};

/// Write `text` to `output`, or to stdout when no path is given.
pub(crate) fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
