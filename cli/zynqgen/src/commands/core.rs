//! `zynqgen core`: hard-core profile listing and description.

use anyhow::{bail, Result};
use zynq_alloc::{builtin_profiles, resolve_profile};

/// List the built-in profiles.
pub fn list() -> Result<()> {
    println!("Built-in cores:");
    println!();
    for profile in builtin_profiles() {
        println!("  {:<25} {}", profile.name, profile.description);
    }
    println!();
    println!("Use 'zynqgen core describe <name>' for details.");
    Ok(())
}

/// Describe a built-in profile or a `.core.toml` file.
pub fn describe(name: &str, format: Option<&str>) -> Result<()> {
    let profile = resolve_profile(name).map_err(|e| {
        anyhow::anyhow!("{e}. Use 'zynqgen core list' to see available cores.")
    })?;
    match format {
        None => print!("{}", profile.describe()),
        Some("toml") => print!("{}", profile.to_toml()?),
        Some(other) => bail!("unknown format '{other}' (expected toml)"),
    }
    Ok(())
}
