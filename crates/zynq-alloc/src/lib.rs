//! Exclusive allocation of the processing system's clocks, resets,
//! interrupt lines and bus channels.
//!
//! A [`ResourceManager`] is created once per generation run from a parsed
//! port set and a [`CoreProfile`]. Every allocation binds a slot
//! immediately; asking for a slot twice is an error on the spot. When user
//! logic has taken what it needs, [`ResourceManager::finalize`] emits the
//! clock buffers, reset and interrupt wiring and the hard-core instance
//! into any [`zynq_netlist::Elaborator`].
//!
//! ## Modules
//!
//! - [`profile`]: Built-in and file-based hard-core profiles
//! - [`pool`]: Single-use slot pools
//! - [`manager`]: Allocation operations
//! - [`channel`]: Allocated bus channel views
//! - [`finalize`]: Emission of the allocated structure
//! - [`report`]: Pool usage report

pub mod channel;
pub mod error;
pub mod finalize;
pub mod manager;
pub mod pool;
pub mod profile;
pub mod report;

pub use channel::{port_net, AxiChannel};
pub use error::{AllocError, Result, SlotId};
pub use finalize::{FinalizeSummary, CORE_INSTANCE};
pub use manager::{ClockBinding, ResourceManager};
pub use profile::{
    builtin_profiles, load_profile, parse_profile, resolve_profile, BitOrder, ChannelDecl,
    ClockSource, CoreProfile, IrqGroup, ResetSource,
};
pub use report::{PoolUsage, ResourceReport};

/// Programmable-logic clock slots.
pub const CLOCK_SLOTS: u32 = 4;
/// Reset slots.
pub const RESET_SLOTS: u32 = 4;
/// Interrupt lines into the core.
pub const IRQ_LINES: u32 = 16;
/// Lines per interrupt group.
pub const IRQ_LINES_PER_GROUP: u32 = 8;
