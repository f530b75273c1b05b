//! AXI to AXI-Lite bridging for processing-system master channels.
//!
//! [`BridgeWiring`] pairs two layouts field by field from their direction
//! tags. [`BridgeAdapter`] uses it to bind an external conversion primitive
//! between an allocated hard-core master channel and a fresh AXI-Lite bus.

pub mod adapter;
pub mod error;
pub mod primitive;
pub mod wiring;

pub use adapter::{BridgeAdapter, BridgeParams, LiteBus, DEFAULT_EXCLUDED};
pub use error::{BridgeError, Result, WiringError};
pub use primitive::PrimitiveContract;
pub use wiring::{BridgeWiring, Connection, End};

#[cfg(test)]
pub(crate) mod testdata {
    use zynq_ports::{parse_ports, PortSet};

    pub const PS8_SUBSET: &str = include_str!("../../../testdata/ps8_subset.v");

    pub fn ps8_ports() -> PortSet {
        parse_ports(PS8_SUBSET).unwrap()
    }
}
