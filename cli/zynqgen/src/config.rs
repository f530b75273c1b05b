//! Design configuration files for `zynqgen build`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zynq_bridge::{BridgeParams, PrimitiveContract};

/// A complete design: which core, which ports, what to allocate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignConfig {
    pub core: CoreConfig,
    #[serde(default)]
    pub clocks: Vec<ClockRequest>,
    #[serde(default)]
    pub resets: Vec<ResetRequest>,
    #[serde(default)]
    pub irqs: Vec<IrqRequest>,
    #[serde(default)]
    pub channels: Vec<ChannelRequest>,
    #[serde(default)]
    pub bridge: Option<BridgeConfig>,
}

/// `[core]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoreConfig {
    /// Built-in profile name or `.core.toml` path.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Port declaration file, relative to the config file.
    pub ports: PathBuf,
    /// Layout artifact to check the port file against.
    #[serde(default)]
    pub artifact: Option<PathBuf>,
}

fn default_profile() -> String {
    "zynq-mp".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    pub index: u32,
    /// Frequency in Hz.
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequest {
    pub index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrqRequest {
    pub index: u32,
    /// User net that drives the line.
    #[serde(default)]
    pub net: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRequest {
    pub name: String,
}

/// `[bridge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeConfig {
    /// Master channel to bridge.
    pub channel: String,
    #[serde(default)]
    pub data_width: Option<u32>,
    #[serde(default)]
    pub addr_width: Option<u32>,
    #[serde(default)]
    pub id_width: Option<u32>,
    /// Clock slot driving the bridge and the channel.
    pub clock: u32,
    /// Reset slot of the bridge.
    pub reset: u32,
    /// Fields excluded on top of the default set.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Instance name of the primitive.
    #[serde(default)]
    pub name: Option<String>,
    /// Alternative conversion primitive.
    #[serde(default)]
    pub primitive: Option<PrimitiveContract>,
}

impl BridgeConfig {
    /// Configured widths, defaulting to 32-bit data, 16-bit address, 5-bit ID.
    pub fn params(&self) -> BridgeParams {
        let defaults = BridgeParams::default();
        BridgeParams {
            data_width: self.data_width.unwrap_or(defaults.data_width),
            addr_width: self.addr_width.unwrap_or(defaults.addr_width),
            id_width: self.id_width.unwrap_or(defaults.id_width),
        }
    }
}

impl DesignConfig {
    /// Parse a design configuration from TOML.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid design configuration")
    }

    /// Load a design file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("parsing {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.core.ports = base.join(&config.core.ports);
        if let Some(artifact) = config.core.artifact.take() {
            config.core.artifact = Some(base.join(artifact));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[core]
profile = "zynq-mp"
ports = "ps8.v"
artifact = "ps8.layout.toml"

[[clocks]]
index = 0
frequency = 200e6

[[resets]]
index = 0

[[irqs]]
index = 9
net = "uart_irq"

[[channels]]
name = "maxigp2"

[bridge]
channel = "maxigp2"
data-width = 64
clock = 0
reset = 0
exclude = ["ARLOCK"]
"#;

    #[test]
    fn parse_full_config() {
        let config = DesignConfig::parse(FULL).unwrap();
        assert_eq!(config.core.profile, "zynq-mp");
        assert_eq!(config.clocks[0].frequency, 200e6);
        assert_eq!(config.irqs[0].net.as_deref(), Some("uart_irq"));
        let bridge = config.bridge.unwrap();
        assert_eq!(
            bridge.params(),
            BridgeParams {
                data_width: 64,
                addr_width: 16,
                id_width: 5
            }
        );
        assert_eq!(bridge.exclude, vec!["ARLOCK"]);
        assert!(bridge.primitive.is_none());
    }

    #[test]
    fn parse_minimal_config() {
        let config = DesignConfig::parse("[core]\nports = \"ps.v\"\n").unwrap();
        assert_eq!(config.core.profile, "zynq-mp");
        assert!(config.clocks.is_empty());
        assert!(config.bridge.is_none());
    }

    #[test]
    fn missing_ports_is_an_error() {
        assert!(DesignConfig::parse("[core]\nprofile = \"zynq-7000\"\n").is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.toml");
        std::fs::write(&path, FULL).unwrap();
        let config = DesignConfig::load(&path).unwrap();
        assert_eq!(config.core.ports, dir.path().join("ps8.v"));
        assert_eq!(
            config.core.artifact.as_deref(),
            Some(dir.path().join("ps8.layout.toml").as_path())
        );
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = DesignConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }
}
