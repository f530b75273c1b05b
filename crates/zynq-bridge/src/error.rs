//! Error types for bridge wiring and elaboration.

use zynq_alloc::AllocError;
use zynq_layout::{ChannelClass, LayoutError, Role};
use zynq_netlist::NetlistError;
use zynq_ports::PortDirection;

use crate::wiring::End;

/// Structural wiring failures between two layouts.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// Both ends drive, or both ends receive, the field.
    #[error("field {field} is {direction} on both ends")]
    SameDirection {
        /// Field name.
        field: String,
        /// The shared direction.
        direction: PortDirection,
    },

    /// A field with no counterpart on the other end.
    #[error("field {field} has no counterpart on the {missing_on} end")]
    Unmatched {
        /// Field name.
        field: String,
        /// The end lacking the field.
        missing_on: End,
    },

    /// Paired fields whose resolved widths differ.
    #[error("field {field}: source is {source_width} bits, destination is {destination_width} bits")]
    WidthMismatch {
        /// Field name.
        field: String,
        /// Resolved source width.
        source_width: u32,
        /// Resolved destination width.
        destination_width: u32,
    },

    /// The two layouts do not form a master/slave pair.
    #[error("cannot wire a {source_role} layout to a {destination_role} layout")]
    RoleMismatch {
        /// Role of the source layout.
        source_role: Role,
        /// Role of the destination layout.
        destination_role: Role,
    },

    /// A field width that cannot be resolved.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised while building or elaborating a bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge wiring: {0}")]
    Wiring(#[from] WiringError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// The allocated channel is not the one the adapter was built for.
    #[error("adapter was built for channel {expected}, got {found}")]
    ChannelMismatch {
        /// Channel the adapter expects.
        expected: String,
        /// Channel passed to elaborate.
        found: String,
    },

    /// The core profile declares no channel by that name.
    #[error("profile {profile} declares no channel {channel}")]
    UnknownChannel {
        /// The requested name.
        channel: String,
        /// Profile searched.
        profile: String,
    },

    /// Bridges hang off master channels only.
    #[error("channel {channel} is a {class} channel, a bridge needs a master")]
    NotMasterChannel {
        /// Channel name.
        channel: String,
        /// Its class.
        class: ChannelClass,
    },

    /// The configured width exceeds the hard-core port.
    #[error("field {field} needs {width} bits but the channel provides {available}")]
    NetTooNarrow {
        /// Field name.
        field: String,
        /// Configured width.
        width: u32,
        /// Hard-core net width.
        available: u32,
    },
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
