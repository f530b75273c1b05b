//! Port declaration parsing for Zynq processing-system interface descriptions.
//!
//! The hard core exposes a fixed port list, published as a Verilog/unisim
//! module. This crate turns that text into an ordered [`PortSet`] of
//! `(name, width, direction)` descriptors.
//!
//! ## Modules
//!
//! - [`port`]: Port descriptors, directions and the ordered port set
//! - [`parse`]: Tokenizer and parser for declaration text
//! - [`error`]: Parse errors

pub mod error;
pub mod parse;
pub mod port;

pub use error::{ParseError, Result};
pub use parse::{load_port_file, parse_declaration, parse_ports};
pub use port::{PortDescriptor, PortDigest, PortDirection, PortSet};
