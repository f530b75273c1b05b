//! Structural netlist model for generated processing-system wiring.
//!
//! Generators do not emit HDL text directly. They describe nets, continuous
//! assignments, primitive instantiations and clock constraints through the
//! [`Elaborator`] trait; [`Netlist`] is the in-memory implementation used by
//! the command line tool and the tests.

pub mod elaborate;
pub mod error;
pub mod instance;
pub mod net;

pub use elaborate::{Assignment, ClockConstraint, Elaborator, Netlist};
pub use error::{NetlistError, Result};
pub use instance::{Instance, PortBinding};
pub use net::{Expr, Net};
