//! Allocated bus channel views.

use zynq_layout::{FieldDescriptor, InterfaceLayout};
use zynq_netlist::Net;
use zynq_ports::PortSet;

use crate::error::{AllocError, Result};

/// Net carrying a hard-core port.
pub fn port_net(name: &str, width: u32) -> Net {
    Net::new(name.to_ascii_lowercase(), width)
}

/// The hard-core side of one allocated bus channel: every layout field
/// mapped to the net of the port that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct AxiChannel {
    name: String,
    layout: InterfaceLayout,
    nets: Vec<Net>,
}

impl AxiChannel {
    /// Map each layout field to its port, checking that the port exists and
    /// that its width matches the layout's resolved width.
    pub fn new(name: &str, layout: InterfaceLayout, ports: &PortSet) -> Result<Self> {
        let mut nets = Vec::with_capacity(layout.len());
        for field in layout.fields() {
            let port_name = format!("{name}{}", field.name);
            let port = ports.get(&port_name).ok_or_else(|| AllocError::UnknownField {
                channel: name.to_string(),
                field: field.name.clone(),
            })?;
            let expected = field.width.resolve(layout.params())?;
            if expected != port.width {
                return Err(AllocError::ChannelShape {
                    channel: name.to_string(),
                    field: field.name.clone(),
                    expected,
                    found: port.width,
                });
            }
            nets.push(port_net(&port.name, port.width));
        }
        Ok(Self {
            name: name.to_string(),
            layout,
            nets,
        })
    }

    /// Channel prefix as declared by the core profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &InterfaceLayout {
        &self.layout
    }

    /// Net of a field, e.g. `ACLK` or `AWADDR`.
    pub fn field(&self, field: &str) -> Result<&Net> {
        self.layout
            .fields()
            .iter()
            .position(|f| f.name == field)
            .map(|i| &self.nets[i])
            .ok_or_else(|| AllocError::UnknownField {
                channel: self.name.clone(),
                field: field.to_string(),
            })
    }

    /// Fields paired with their nets, in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Net)> {
        self.layout.fields().iter().zip(self.nets.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zynq_layout::{generate_channel_layout, ChannelClass, WidthParams};
    use zynq_ports::parse_ports;

    const PORTS: &str = "\
input MAXIGP0ACLK
output [39:0] MAXIGP0AWADDR
output [127:0] MAXIGP0WDATA
output [15:0] MAXIGP0WSTRB
";

    #[test]
    fn maps_fields_to_port_nets() {
        let ports = parse_ports(PORTS).unwrap();
        let layout =
            generate_channel_layout(&ports, "MAXIGP0", ChannelClass::Master, WidthParams::default())
                .unwrap();
        let channel = AxiChannel::new("MAXIGP0", layout, &ports).unwrap();
        assert_eq!(channel.field("AWADDR").unwrap(), &Net::new("maxigp0awaddr", 40));
        assert_eq!(channel.field("ACLK").unwrap().width, 1);
        assert!(matches!(
            channel.field("ARADDR").unwrap_err(),
            AllocError::UnknownField { .. }
        ));
        assert_eq!(channel.fields().count(), 4);
    }

    #[test]
    fn rejects_width_disagreement() {
        let ports = parse_ports(PORTS).unwrap();
        let layout = generate_channel_layout(
            &ports,
            "MAXIGP0",
            ChannelClass::Master,
            WidthParams::new(32, 40, 4),
        )
        .unwrap();
        let err = AxiChannel::new("MAXIGP0", layout, &ports).unwrap_err();
        assert!(matches!(
            err,
            AllocError::ChannelShape {
                expected: 32,
                found: 128,
                ..
            }
        ));
    }
}
