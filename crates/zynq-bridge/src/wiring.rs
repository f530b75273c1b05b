//! Direction algebra between two layouts.
//!
//! A [`BridgeWiring`] pairs the fields of a master-role layout with the
//! identically named fields of a slave-role layout. Which end drives a
//! field comes from the layouts' direction tags alone.

use std::collections::BTreeSet;
use std::fmt;

use zynq_layout::InterfaceLayout;
use zynq_ports::PortDirection;

use crate::error::WiringError;

/// One end of a wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Source,
    Destination,
}

impl End {
    pub fn other(self) -> Self {
        match self {
            End::Source => End::Destination,
            End::Destination => End::Source,
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Source => f.write_str("source"),
            End::Destination => f.write_str("destination"),
        }
    }
}

/// A driven field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub field: String,
    /// Resolved width in bits.
    pub width: u32,
    pub driver: End,
    pub receiver: End,
}

impl Connection {
    /// Direction of the field as seen from `end`.
    pub fn direction_at(&self, end: End) -> PortDirection {
        if end == self.driver {
            PortDirection::Output
        } else {
            PortDirection::Input
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} -> {}",
            self.field, self.width, self.driver, self.receiver
        )
    }
}

/// Point-to-point wiring of two layouts, minus an exclusion set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeWiring {
    pub source: InterfaceLayout,
    pub destination: InterfaceLayout,
    pub excluded: BTreeSet<String>,
}

impl BridgeWiring {
    pub fn new(
        source: InterfaceLayout,
        destination: InterfaceLayout,
        excluded: BTreeSet<String>,
    ) -> Self {
        Self {
            source,
            destination,
            excluded,
        }
    }

    /// Every non-excluded field exactly once, in source order.
    pub fn connections(&self) -> Result<Vec<Connection>, WiringError> {
        if self.source.role() == self.destination.role() {
            return Err(WiringError::RoleMismatch {
                source_role: self.source.role(),
                destination_role: self.destination.role(),
            });
        }

        let source = self.source.without(&self.excluded);
        let destination = self.destination.without(&self.excluded);

        let mut connections = Vec::with_capacity(source.len());
        for field in source.fields() {
            let peer = destination
                .field(&field.name)
                .ok_or_else(|| WiringError::Unmatched {
                    field: field.name.clone(),
                    missing_on: End::Destination,
                })?;

            let driver = match (field.direction, peer.direction) {
                (PortDirection::Output, PortDirection::Input) => End::Source,
                (PortDirection::Input, PortDirection::Output) => End::Destination,
                (direction, _) => {
                    return Err(WiringError::SameDirection {
                        field: field.name.clone(),
                        direction,
                    })
                }
            };

            let source_width = field.width.resolve(source.params())?;
            let destination_width = peer.width.resolve(destination.params())?;
            if source_width != destination_width {
                return Err(WiringError::WidthMismatch {
                    field: field.name.clone(),
                    source_width,
                    destination_width,
                });
            }

            connections.push(Connection {
                field: field.name.clone(),
                width: source_width,
                driver,
                receiver: driver.other(),
            });
        }

        if let Some(extra) = destination
            .fields()
            .iter()
            .find(|f| source.field(&f.name).is_none())
        {
            return Err(WiringError::Unmatched {
                field: extra.name.clone(),
                missing_on: End::Source,
            });
        }

        Ok(connections)
    }
}
