//! Symbolic-width AXI channel layouts for the Zynq processing system.
//!
//! Turns a parsed [`zynq_ports::PortSet`] into per-channel field tables whose
//! data, address, ID and strobe widths stay symbolic until resolved against
//! concrete [`WidthParams`], and provides the fixed-shape AXI and AXI-Lite
//! layouts used by bridges.
//!
//! ## Modules
//!
//! - [`width`]: Width expressions and parameters
//! - [`channel`]: Channel classes, roles, direction-to-prefix map
//! - [`layout`]: Interface layouts and channel layout generation
//! - [`fixed`]: Fixed AXI4 and AXI-Lite layouts
//! - [`artifact`]: TOML layout artifact

pub mod artifact;
pub mod channel;
pub mod error;
pub mod fixed;
pub mod layout;
pub mod width;

pub use artifact::{ChannelEntry, LayoutArtifact};
pub use channel::{field_prefix, ChannelClass, PortRole, Role};
pub use error::{LayoutError, Result};
pub use fixed::{axi_full_layout, axi_lite_layout};
pub use layout::{classify_field, generate_channel_layout, FieldDescriptor, InterfaceLayout};
pub use width::{WidthExpr, WidthParams};
