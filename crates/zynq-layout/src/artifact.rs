//! Layout artifact: the TOML file written by `zynqgen layout`.
//!
//! Holds the hard core's full port table plus one symbolic layout per bus
//! channel, keyed by the digest of the port set it was generated from.

use serde::{Deserialize, Serialize};
use zynq_ports::{PortDescriptor, PortDigest, PortSet};

use crate::channel::ChannelClass;
use crate::error::Result;
use crate::layout::{generate_channel_layout, InterfaceLayout};
use crate::width::WidthParams;

/// One named channel layout inside an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    /// Channel prefix (e.g. `MAXIGP0`).
    pub name: String,
    pub layout: InterfaceLayout,
}

/// Generated port and channel tables for one hard core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutArtifact {
    /// Core profile the artifact was generated for.
    pub core: String,
    /// Digest of the port set.
    pub source_digest: PortDigest,
    #[serde(default)]
    pub ports: Vec<PortDescriptor>,
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
}

impl LayoutArtifact {
    /// Generate default-width layouts for each `(prefix, class)` channel.
    pub fn generate<'a, I>(core: &str, ports: &PortSet, channels: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, ChannelClass)>,
    {
        let channels = channels
            .into_iter()
            .map(|(name, class)| {
                let layout = generate_channel_layout(ports, name, class, WidthParams::default())?;
                Ok(ChannelEntry {
                    name: name.to_string(),
                    layout,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            core: core.to_string(),
            source_digest: ports.digest(),
            ports: ports.iter().cloned().collect(),
            channels,
        })
    }

    /// Layout of a named channel.
    pub fn channel(&self, name: &str) -> Option<&InterfaceLayout> {
        self.channels
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| &c.layout)
    }

    /// Rebuild the port set.
    pub fn port_set(&self) -> PortSet {
        self.ports.iter().cloned().collect()
    }

    /// Whether the artifact was generated from exactly this port set.
    pub fn matches(&self, ports: &PortSet) -> bool {
        self.source_digest == ports.digest()
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse an artifact and re-check every layout.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut artifact: LayoutArtifact = toml::from_str(text)?;
        artifact.channels = artifact
            .channels
            .into_iter()
            .map(|entry| {
                Ok(ChannelEntry {
                    name: entry.name,
                    layout: entry.layout.validated()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(artifact)
    }
}
