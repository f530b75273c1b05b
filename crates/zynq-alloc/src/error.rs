//! Error types for resource allocation.

use std::fmt;
use std::path::PathBuf;

use zynq_layout::LayoutError;
use zynq_netlist::NetlistError;

/// A single allocatable unit of the hard core.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotId {
    Clock(u32),
    Reset(u32),
    Irq(u32),
    Channel(String),
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Clock(n) => write!(f, "clock slot {n}"),
            SlotId::Reset(n) => write!(f, "reset slot {n}"),
            SlotId::Irq(n) => write!(f, "irq line {n}"),
            SlotId::Channel(name) => write!(f, "bus channel {name}"),
        }
    }
}

/// Errors raised by the resource manager and core profiles.
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    /// The slot was already bound in this generation run.
    #[error("resource conflict: {slot} is already allocated")]
    SlotTaken {
        /// The contested slot.
        slot: SlotId,
    },

    /// Index outside the pool.
    #[error("{slot} is out of range (pool has {capacity} slots)")]
    OutOfRange {
        /// The requested slot.
        slot: SlotId,
        /// Pool size.
        capacity: u32,
    },

    /// Channel name not declared by the core or absent from the port set.
    #[error("unknown bus channel '{name}' (available: {available})")]
    UnknownChannel {
        /// The requested name.
        name: String,
        /// Comma-separated list of channels that can be allocated.
        available: String,
    },

    /// Clock frequency that is zero, negative or not finite.
    #[error("invalid frequency {frequency} Hz for clock slot {index}")]
    InvalidFrequency {
        /// Clock slot index.
        index: u32,
        /// The rejected frequency.
        frequency: f64,
    },

    /// A port the profile relies on is not in the port set.
    #[error("core port '{port}' ({purpose}) is not declared")]
    MissingCorePort {
        /// Port name.
        port: String,
        /// What the profile uses it for.
        purpose: &'static str,
    },

    /// A port the profile relies on is too narrow.
    #[error("core port '{port}' is {width} bits wide, need at least {required}")]
    CorePortTooNarrow {
        /// Port name.
        port: String,
        /// Declared width.
        width: u32,
        /// Minimum width.
        required: u32,
    },

    /// A channel port whose width disagrees with its layout.
    #[error("channel {channel}: field {field} resolves to {expected} bits but the port is {found} bits")]
    ChannelShape {
        /// Channel name.
        channel: String,
        /// Field name.
        field: String,
        /// Width from the layout.
        expected: u32,
        /// Declared port width.
        found: u32,
    },

    /// Field lookup on an allocated channel failed.
    #[error("channel {channel} has no field '{field}'")]
    UnknownField {
        /// Channel name.
        channel: String,
        /// Requested field.
        field: String,
    },

    /// Structurally invalid core profile.
    #[error("invalid core profile '{profile}': {detail}")]
    InvalidProfile {
        /// Profile name.
        profile: String,
        /// What is wrong.
        detail: String,
    },

    /// Unknown built-in profile name and no such file.
    #[error("core profile '{name}' is neither built in nor a readable file")]
    UnknownProfile {
        /// The requested name or path.
        name: String,
    },

    /// Core profile file not found.
    #[error("core profile file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Layout generation failure.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Elaboration failure during finalize.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading a profile.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, AllocError>;
