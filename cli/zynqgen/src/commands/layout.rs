//! `zynqgen layout`: generate the layout artifact of a hard core's channels.

use std::path::Path;

use anyhow::{bail, Context, Result};
use zynq_alloc::{resolve_profile, CoreProfile};
use zynq_layout::{ChannelClass, LayoutArtifact};
use zynq_ports::{load_port_file, PortSet};

pub fn run(file: &Path, core: &str, channels: &[String], output: Option<&Path>) -> Result<()> {
    let ports = load_port_file(file).with_context(|| format!("reading {}", file.display()))?;
    let profile = resolve_profile(core)?;
    let artifact = build_artifact(&profile, &ports, channels)?;
    tracing::info!(
        core = %profile.name,
        channels = artifact.channels.len(),
        "generated layout artifact"
    );
    super::emit(&artifact.to_toml()?, output)
}

/// Artifact for the requested channels, or for every channel the profile
/// declares that is present in `ports`.
pub fn build_artifact(
    profile: &CoreProfile,
    ports: &PortSet,
    channels: &[String],
) -> Result<LayoutArtifact> {
    let mut selected: Vec<(&str, ChannelClass)> = Vec::new();
    if channels.is_empty() {
        for decl in &profile.channels {
            if ports.with_prefix(&decl.name).next().is_some() {
                selected.push((decl.name.as_str(), decl.class));
            } else {
                tracing::debug!(channel = %decl.name, "no ports, skipped");
            }
        }
    } else {
        for name in channels {
            match profile.channel(name) {
                Some(decl) => selected.push((decl.name.as_str(), decl.class)),
                None => bail!("core '{}' declares no channel '{name}'", profile.name),
            }
        }
    }
    Ok(LayoutArtifact::generate(&profile.name, ports, selected)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zynq_ports::parse_ports;

    const PS8_SUBSET: &str = include_str!("../../../../testdata/ps8_subset.v");

    #[test]
    fn default_selection_skips_absent_channels() {
        let ports = parse_ports(PS8_SUBSET).unwrap();
        let artifact = build_artifact(&CoreProfile::zynq_mp(), &ports, &[]).unwrap();
        let names: Vec<&str> = artifact.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MAXIGP0", "MAXIGP2", "SAXIGP0"]);
        assert!(artifact.matches(&ports));
    }

    #[test]
    fn explicit_selection() {
        let ports = parse_ports(PS8_SUBSET).unwrap();
        let artifact =
            build_artifact(&CoreProfile::zynq_mp(), &ports, &["maxigp2".to_string()]).unwrap();
        assert_eq!(artifact.channels.len(), 1);
        assert_eq!(artifact.channel("MAXIGP2").unwrap().class(), ChannelClass::Master);
    }

    #[test]
    fn undeclared_channel_fails() {
        let ports = parse_ports(PS8_SUBSET).unwrap();
        assert!(build_artifact(&CoreProfile::zynq_mp(), &ports, &["HPM9".to_string()]).is_err());
    }

    #[test]
    fn writes_artifact_file() {
        let dir = tempfile::tempdir().unwrap();
        let ports_path = dir.path().join("ps8.v");
        std::fs::write(&ports_path, PS8_SUBSET).unwrap();
        let out = dir.path().join("ps8.layout.toml");
        run(&ports_path, "zynq-mp", &[], Some(&out)).unwrap();
        let artifact = LayoutArtifact::from_toml(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(artifact.core, "zynq-mp");
        assert_eq!(artifact.channels.len(), 3);
    }
}
