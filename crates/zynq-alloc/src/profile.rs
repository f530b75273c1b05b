//! Hard-core profiles.
//!
//! A [`CoreProfile`] names the primitive that wraps the processing system
//! and the ports the resource manager draws clocks, resets, interrupts and
//! bus channels from. Two profiles are built in; others can be loaded from
//! `.core.toml` files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use zynq_layout::ChannelClass;

use crate::error::{AllocError, Result};
use crate::{CLOCK_SLOTS, IRQ_LINES, IRQ_LINES_PER_GROUP, RESET_SLOTS};

/// Source of the programmable-logic clocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockSource {
    /// Hard-core output carrying the unbuffered clocks, one bit per slot.
    pub port: String,
    /// Global clock buffer primitive.
    pub buffer: String,
}

/// Bit numbering of the reset status port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BitOrder {
    /// Reset `n` is bit `width - 1 - n`.
    MsbFirst,
    /// Reset `n` is bit `n`.
    LsbFirst,
}

/// Active-low status bits the resets are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResetSource {
    pub port: String,
    pub order: BitOrder,
}

impl ResetSource {
    /// Bit of a `port_width`-bit status port that backs reset `index`.
    pub fn bit(&self, index: u32, port_width: u32) -> u32 {
        match self.order {
            BitOrder::MsbFirst => port_width - 1 - index,
            BitOrder::LsbFirst => index,
        }
    }
}

/// Eight consecutive interrupt inputs of the hard core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IrqGroup {
    pub port: String,
    /// Bit of `port` that carries the group's first line.
    #[serde(default)]
    pub base_bit: u32,
}

/// A bus channel the core exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDecl {
    /// Port-name prefix (e.g. `MAXIGP2`).
    pub name: String,
    pub class: ChannelClass,
}

impl ChannelDecl {
    fn new(name: impl Into<String>, class: ChannelClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

/// Description of one processing-system hard core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoreProfile {
    /// Profile name (e.g. "zynq-mp").
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Primitive that instantiates the hard core.
    pub primitive: String,
    pub clock: ClockSource,
    pub reset: ResetSource,
    pub irq_groups: Vec<IrqGroup>,
    #[serde(default)]
    pub channels: Vec<ChannelDecl>,
}

impl CoreProfile {
    /// Zynq UltraScale+ MPSoC (PS8).
    pub fn zynq_mp() -> Self {
        let mut channels: Vec<ChannelDecl> = (0..3)
            .map(|i| ChannelDecl::new(format!("MAXIGP{i}"), ChannelClass::Master))
            .collect();
        channels.extend((0..7).map(|i| ChannelDecl::new(format!("SAXIGP{i}"), ChannelClass::Slave)));
        channels.push(ChannelDecl::new("SAXIACP", ChannelClass::SlaveAcp));

        Self {
            name: "zynq-mp".into(),
            description: "Zynq UltraScale+ MPSoC processing system (PS8)".into(),
            primitive: "PS8".into(),
            clock: ClockSource {
                port: "PLCLK".into(),
                buffer: "BUFG_PS".into(),
            },
            reset: ResetSource {
                port: "EMIOGPIOO".into(),
                order: BitOrder::MsbFirst,
            },
            irq_groups: vec![
                IrqGroup {
                    port: "PLPSIRQ0".into(),
                    base_bit: 0,
                },
                IrqGroup {
                    port: "PLPSIRQ1".into(),
                    base_bit: 0,
                },
            ],
            channels,
        }
    }

    /// Zynq-7000 (PS7).
    pub fn zynq_7000() -> Self {
        let mut channels: Vec<ChannelDecl> = (0..2)
            .map(|i| ChannelDecl::new(format!("MAXIGP{i}"), ChannelClass::Master))
            .collect();
        channels.extend((0..2).map(|i| ChannelDecl::new(format!("SAXIGP{i}"), ChannelClass::Slave)));
        channels.extend((0..4).map(|i| ChannelDecl::new(format!("SAXIHP{i}"), ChannelClass::Slave)));
        channels.push(ChannelDecl::new("SAXIACP", ChannelClass::SlaveAcp));

        Self {
            name: "zynq-7000".into(),
            description: "Zynq-7000 processing system (PS7)".into(),
            primitive: "PS7".into(),
            clock: ClockSource {
                port: "FCLKCLK".into(),
                buffer: "BUFG".into(),
            },
            reset: ResetSource {
                port: "FCLKRESETN".into(),
                order: BitOrder::LsbFirst,
            },
            irq_groups: vec![
                IrqGroup {
                    port: "IRQF2P".into(),
                    base_bit: 0,
                },
                IrqGroup {
                    port: "IRQF2P".into(),
                    base_bit: IRQ_LINES_PER_GROUP,
                },
            ],
            channels,
        }
    }

    /// Channel declaration by name, ignoring case.
    pub fn channel(&self, name: &str) -> Option<&ChannelDecl> {
        self.channels
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Check the profile's own shape (not its ports).
    pub fn validate(&self) -> Result<()> {
        let invalid = |detail: String| AllocError::InvalidProfile {
            profile: self.name.clone(),
            detail,
        };
        if self.primitive.is_empty() {
            return Err(invalid("primitive name is empty".into()));
        }
        let lines = self.irq_groups.len() as u32 * IRQ_LINES_PER_GROUP;
        if lines != IRQ_LINES {
            return Err(invalid(format!(
                "{} interrupt groups give {lines} lines, expected {IRQ_LINES}",
                self.irq_groups.len()
            )));
        }
        for group in &self.irq_groups {
            if group.base_bit.checked_add(IRQ_LINES_PER_GROUP).is_none() {
                return Err(invalid(format!(
                    "interrupt group {} starts at bit {}, past the end of any port",
                    group.port, group.base_bit
                )));
            }
        }
        for (i, decl) in self.channels.iter().enumerate() {
            if decl.class == ChannelClass::Lite {
                return Err(invalid(format!("channel {} cannot be lite", decl.name)));
            }
            if self.channels[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&decl.name))
            {
                return Err(invalid(format!("channel {} declared twice", decl.name)));
            }
        }
        Ok(())
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Summary lines for `core describe`.
    pub fn describe(&self) -> String {
        let mut out = format!("{}: {}\n", self.name, self.description);
        out.push_str(&format!("  primitive: {}\n", self.primitive));
        out.push_str(&format!(
            "  clocks:    {} x {} via {}\n",
            CLOCK_SLOTS, self.clock.port, self.clock.buffer
        ));
        out.push_str(&format!(
            "  resets:    {} x ~{} ({:?})\n",
            RESET_SLOTS, self.reset.port, self.reset.order
        ));
        let groups: Vec<String> = self
            .irq_groups
            .iter()
            .map(|g| format!("{}[{}+:8]", g.port, g.base_bit))
            .collect();
        out.push_str(&format!("  irqs:      {} via {}\n", IRQ_LINES, groups.join(", ")));
        for class in [ChannelClass::Master, ChannelClass::Slave, ChannelClass::SlaveAcp] {
            let names: Vec<&str> = self
                .channels
                .iter()
                .filter(|c| c.class == class)
                .map(|c| c.name.as_str())
                .collect();
            if !names.is_empty() {
                out.push_str(&format!("  {:<10} {}\n", format!("{class}:"), names.join(", ")));
            }
        }
        out
    }
}

/// All built-in profiles.
pub fn builtin_profiles() -> Vec<CoreProfile> {
    vec![CoreProfile::zynq_mp(), CoreProfile::zynq_7000()]
}

/// Parse a profile from TOML and validate it.
pub fn parse_profile(text: &str) -> Result<CoreProfile> {
    let profile: CoreProfile = toml::from_str(text)?;
    profile.validate()?;
    Ok(profile)
}

/// Load a profile from a `.core.toml` file.
pub fn load_profile(path: &Path) -> Result<CoreProfile> {
    if !path.exists() {
        return Err(AllocError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_profile(&content)
}

/// A built-in profile by name, or a profile file by path.
pub fn resolve_profile(name_or_path: &str) -> Result<CoreProfile> {
    if let Some(profile) = builtin_profiles()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name_or_path))
    {
        return Ok(profile);
    }
    let path = Path::new(name_or_path);
    if path.is_file() {
        return load_profile(path);
    }
    Err(AllocError::UnknownProfile {
        name: name_or_path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_validate() {
        for profile in builtin_profiles() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn zynq_mp_channels() {
        let mp = CoreProfile::zynq_mp();
        assert_eq!(mp.channels.len(), 11);
        assert_eq!(mp.channel("maxigp2").unwrap().class, ChannelClass::Master);
        assert_eq!(mp.channel("SAXIACP").unwrap().class, ChannelClass::SlaveAcp);
        assert!(mp.channel("SAXIHP0").is_none());
    }

    #[test]
    fn reset_bit_order() {
        let mp = CoreProfile::zynq_mp();
        assert_eq!(mp.reset.bit(0, 96), 95);
        assert_eq!(mp.reset.bit(3, 96), 92);
        let ps7 = CoreProfile::zynq_7000();
        assert_eq!(ps7.reset.bit(3, 4), 3);
    }

    #[test]
    fn toml_survives_write_and_read() {
        let ps7 = CoreProfile::zynq_7000();
        let text = ps7.to_toml().unwrap();
        assert!(text.contains("order = \"lsb-first\""));
        assert!(text.contains("base-bit = 8"));
        assert_eq!(parse_profile(&text).unwrap(), ps7);
    }

    #[test]
    fn irq_base_bit_out_of_range_rejected() {
        let mut profile = CoreProfile::zynq_7000();
        profile.irq_groups[1].base_bit = u32::MAX;
        let err = profile.validate().unwrap_err();
        assert!(
            matches!(err, AllocError::InvalidProfile { ref detail, .. } if detail.contains("IRQF2P"))
        );

        let text = profile.to_toml().unwrap();
        assert!(parse_profile(&text).is_err());

        profile.irq_groups[1].base_bit = u32::MAX - IRQ_LINES_PER_GROUP;
        profile.validate().unwrap();
    }

    #[test]
    fn wrong_irq_group_count_rejected() {
        let mut profile = CoreProfile::zynq_mp();
        profile.irq_groups.pop();
        assert!(matches!(
            profile.validate().unwrap_err(),
            AllocError::InvalidProfile { .. }
        ));
    }

    #[test]
    fn duplicate_channel_rejected() {
        let mut profile = CoreProfile::zynq_mp();
        profile
            .channels
            .push(ChannelDecl::new("maxigp0", ChannelClass::Master));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn resolve_builtin_and_file() {
        assert_eq!(resolve_profile("ZYNQ-MP").unwrap().primitive, "PS8");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.core.toml");
        let mut custom = CoreProfile::zynq_mp();
        custom.name = "custom".into();
        std::fs::write(&path, custom.to_toml().unwrap()).unwrap();
        assert_eq!(resolve_profile(path.to_str().unwrap()).unwrap(), custom);

        assert!(matches!(
            resolve_profile("zynq-9000").unwrap_err(),
            AllocError::UnknownProfile { .. }
        ));
        assert!(matches!(
            load_profile(&dir.path().join("missing.core.toml")).unwrap_err(),
            AllocError::NotFound { .. }
        ));
    }
}
