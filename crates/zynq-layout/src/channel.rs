//! Channel classes, roles and the direction-to-prefix map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zynq_ports::PortDirection;

use crate::error::{LayoutError, Result};

/// The role a bus interface plays on the hard core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelClass {
    /// General-purpose master port (core issues transactions).
    Master,
    /// General-purpose or high-performance slave port.
    Slave,
    /// Accelerator coherency slave port.
    SlaveAcp,
    /// Reduced register bus (AXI-Lite), fixed shape.
    Lite,
}

impl ChannelClass {
    /// The side whose point of view the field directions are tagged from.
    pub fn role(self) -> Role {
        match self {
            ChannelClass::Master | ChannelClass::Lite => Role::Master,
            ChannelClass::Slave | ChannelClass::SlaveAcp => Role::Slave,
        }
    }

    /// Name used in layout artifacts and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelClass::Master => "master",
            ChannelClass::Slave => "slave",
            ChannelClass::SlaveAcp => "slave_acp",
            ChannelClass::Lite => "lite",
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelClass {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "master" => Ok(ChannelClass::Master),
            "slave" => Ok(ChannelClass::Slave),
            "slave_acp" | "slave-acp" | "acp" => Ok(ChannelClass::SlaveAcp),
            "lite" => Ok(ChannelClass::Lite),
            _ => Err(LayoutError::UnknownChannelClass { name: s.to_string() }),
        }
    }
}

/// Which end of a point-to-point bus a layout describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Master,
    Slave,
}

impl Role {
    pub fn opposite(self) -> Self {
        match self {
            Role::Master => Role::Slave,
            Role::Slave => Role::Master,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => f.write_str("master"),
            Role::Slave => f.write_str("slave"),
        }
    }
}

/// Whether an instance consumes or produces the value on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    Consumed,
    Produced,
}

impl PortRole {
    /// Map a declared direction to its role. Bidirectional ports are bound
    /// as produced.
    pub fn of(direction: PortDirection) -> Self {
        match direction {
            PortDirection::Input => PortRole::Consumed,
            PortDirection::Output | PortDirection::Bidirectional => PortRole::Produced,
        }
    }

    /// Instance port-binding prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            PortRole::Consumed => "i_",
            PortRole::Produced => "o_",
        }
    }
}

/// Instance port-binding prefix for a declared direction.
pub fn field_prefix(direction: PortDirection) -> &'static str {
    PortRole::of(direction).prefix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_class_names() {
        assert_eq!("master".parse::<ChannelClass>().unwrap(), ChannelClass::Master);
        assert_eq!("Slave".parse::<ChannelClass>().unwrap(), ChannelClass::Slave);
        assert_eq!(
            "slave_acp".parse::<ChannelClass>().unwrap(),
            ChannelClass::SlaveAcp
        );
        assert_eq!("lite".parse::<ChannelClass>().unwrap(), ChannelClass::Lite);
    }

    #[test]
    fn unknown_class_rejected() {
        let err = "bidirectional".parse::<ChannelClass>().unwrap_err();
        assert!(matches!(err, LayoutError::UnknownChannelClass { .. }));
        assert!(err.to_string().contains("bidirectional"));
    }

    #[test]
    fn class_roles() {
        assert_eq!(ChannelClass::Master.role(), Role::Master);
        assert_eq!(ChannelClass::Lite.role(), Role::Master);
        assert_eq!(ChannelClass::Slave.role(), Role::Slave);
        assert_eq!(ChannelClass::SlaveAcp.role(), Role::Slave);
        assert_eq!(Role::Slave.opposite(), Role::Master);
    }

    #[test]
    fn prefix_map() {
        assert_eq!(field_prefix(PortDirection::Input), "i_");
        assert_eq!(field_prefix(PortDirection::Output), "o_");
        assert_eq!(field_prefix(PortDirection::Bidirectional), "o_");
        assert_eq!(PortRole::of(PortDirection::Input), PortRole::Consumed);
    }
}
