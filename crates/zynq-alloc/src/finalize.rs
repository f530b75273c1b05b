//! Turning allocations into structure.

use std::fmt;

use tracing::info;
use zynq_layout::field_prefix;
use zynq_netlist::{Elaborator, Expr, Instance, Net};

use crate::channel::port_net;
use crate::error::{AllocError, Result};
use crate::manager::ResourceManager;
use crate::IRQ_LINES_PER_GROUP;

/// Instance name of the hard core.
pub const CORE_INSTANCE: &str = "ps_i";

/// What finalize emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeSummary {
    /// Hard-core primitive name.
    pub primitive: String,
    pub clock_buffers: usize,
    pub resets: usize,
    pub irqs: usize,
    /// Allocated bus channels.
    pub channels: Vec<String>,
    /// Ports bound on the hard-core instance.
    pub ports_bound: usize,
}

impl fmt::Display for FinalizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ports, {} clocks, {} resets, {} irqs",
            self.primitive, self.ports_bound, self.clock_buffers, self.resets, self.irqs
        )?;
        if !self.channels.is_empty() {
            write!(f, ", channels {}", self.channels.join(", "))?;
        }
        Ok(())
    }
}

impl ResourceManager {
    /// Emit every binding and the hard-core instance into `elab`.
    ///
    /// Clocks get a buffer primitive and a frequency constraint on the
    /// unbuffered net, resets are driven from the inverted status bit,
    /// interrupt lines drive their group bit, and every parsed port is bound
    /// on the hard-core instance with its `i_`/`o_` prefix.
    pub fn finalize<E: Elaborator + ?Sized>(self, elab: &mut E) -> Result<FinalizeSummary> {
        let net_of = |name: &str, purpose: &'static str| -> Result<Net> {
            self.ports
                .get(name)
                .map(|p| port_net(&p.name, p.width))
                .ok_or_else(|| AllocError::MissingCorePort {
                    port: name.to_string(),
                    purpose,
                })
        };

        let clock_src = net_of(&self.profile.clock.port, "clock source")?;
        let mut clock_buffers = 0;
        for (i, binding) in self.clocks.bound() {
            let unbuf = Net::bit_net(format!("pl_clk{i}_unbuf"));
            elab.assign(Expr::from(&unbuf), clock_src.bit(i))?;
            elab.add_clock_constraint(&unbuf, binding.frequency_hz)?;
            elab.instantiate(
                Instance::new(format!("clk{i}_buffer"), self.profile.clock.buffer.as_str())
                    .with_port("i_I", &unbuf)
                    .with_port("o_O", &binding.net),
            )?;
            clock_buffers += 1;
        }

        let status = net_of(&self.profile.reset.port, "reset status")?;
        let mut resets = 0;
        for (i, net) in self.resets.bound() {
            let bit = self.profile.reset.bit(i, status.width);
            elab.assign(Expr::from(net), status.bit(bit).not())?;
            resets += 1;
        }

        let mut irqs = 0;
        for (i, net) in self.irqs.bound() {
            let group = self
                .profile
                .irq_groups
                .get((i / IRQ_LINES_PER_GROUP) as usize)
                .ok_or_else(|| AllocError::InvalidProfile {
                    profile: self.profile.name.clone(),
                    detail: format!("no interrupt group for line {i}"),
                })?;
            let group_net = net_of(&group.port, "interrupt group")?;
            elab.assign(
                group_net.bit(group.base_bit + i % IRQ_LINES_PER_GROUP),
                Expr::from(net),
            )?;
            irqs += 1;
        }

        let mut core = Instance::new(CORE_INSTANCE, self.profile.primitive.as_str())
            .with_attribute("DONT_TOUCH", "true");
        for port in &self.ports {
            core.bind(
                format!("{}{}", field_prefix(port.direction), port.name),
                port_net(&port.name, port.width),
            );
        }
        let ports_bound = core.ports.len();
        elab.instantiate(core)?;

        let channels: Vec<String> = self
            .channels
            .bound()
            .map(|(i, _)| self.available[i as usize].name.clone())
            .collect();

        let summary = FinalizeSummary {
            primitive: self.profile.primitive.clone(),
            clock_buffers,
            resets,
            irqs,
            channels,
            ports_bound,
        };
        info!(%summary, "finalized hard core");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CoreProfile;
    use crate::testdata::ps8_ports;
    use zynq_netlist::Netlist;
    use zynq_ports::{parse_ports, PortDirection};

    fn finalized(setup: impl FnOnce(&mut ResourceManager)) -> (Netlist, FinalizeSummary) {
        let mut rm = ResourceManager::new(&ps8_ports(), CoreProfile::zynq_mp()).unwrap();
        setup(&mut rm);
        let mut netlist = Netlist::new();
        let summary = rm.finalize(&mut netlist).unwrap();
        (netlist, summary)
    }

    #[test]
    fn every_port_bound_once_with_prefix() {
        let ports = ps8_ports();
        let (netlist, summary) = finalized(|_| {});
        let core = netlist.instance(CORE_INSTANCE).unwrap();
        assert_eq!(core.module, "PS8");
        assert_eq!(core.attributes.get("DONT_TOUCH").map(String::as_str), Some("true"));
        assert_eq!(core.ports.len(), ports.len());
        assert_eq!(summary.ports_bound, ports.len());

        for port in &ports {
            let prefix = match port.direction {
                PortDirection::Input => "i_",
                PortDirection::Output | PortDirection::Bidirectional => "o_",
            };
            let bound = core.port(&format!("{prefix}{}", port.name)).unwrap();
            assert_eq!(bound.width(), port.width);
        }
        assert!(core.port("o_PSS_ALTO_CORE_PAD_MIO").is_some());
        assert!(core.port("i_PLCLK").is_none());
    }

    #[test]
    fn clock_gets_buffer_and_constraint() {
        let (netlist, summary) = finalized(|rm| {
            rm.allocate_clock(2, 200e6).unwrap();
        });
        assert_eq!(summary.clock_buffers, 1);

        let buffer = netlist.instance("clk2_buffer").unwrap();
        assert_eq!(buffer.module, "BUFG_PS");
        let unbuf = Net::bit_net("pl_clk2_unbuf");
        assert_eq!(buffer.port("i_I"), Some(&Expr::from(&unbuf)));
        assert_eq!(
            buffer.port("o_O"),
            Some(&Expr::from(Net::bit_net("pl_clk2")))
        );
        assert_eq!(
            netlist.driver_of(&Expr::from(&unbuf)),
            Some(&Net::new("plclk", 4).bit(2))
        );
        assert_eq!(
            netlist.clock_constraint("pl_clk2_unbuf").unwrap().frequency_hz,
            200e6
        );
    }

    #[test]
    fn reset_is_inverted_status_bit_from_msb() {
        let (netlist, _) = finalized(|rm| {
            rm.allocate_reset(0).unwrap();
            rm.allocate_reset(3).unwrap();
        });
        let gpio = Net::new("emiogpioo", 96);
        assert_eq!(
            netlist.driver_of(&Expr::from(Net::bit_net("pl_reset0"))),
            Some(&gpio.bit(95).not())
        );
        assert_eq!(
            netlist.driver_of(&Expr::from(Net::bit_net("pl_reset3"))),
            Some(&gpio.bit(92).not())
        );
    }

    #[test]
    fn irq_nine_drives_bit_one_of_group_one() {
        let (netlist, summary) = finalized(|rm| {
            rm.allocate_irq(9).unwrap();
            rm.allocate_irq(0).unwrap();
        });
        assert_eq!(summary.irqs, 2);
        assert_eq!(
            netlist.driver_of(&Net::new("plpsirq1", 8).bit(1)),
            Some(&Expr::from(Net::bit_net("pl_irq9")))
        );
        assert_eq!(
            netlist.driver_of(&Net::new("plpsirq0", 8).bit(0)),
            Some(&Expr::from(Net::bit_net("pl_irq0")))
        );
    }

    #[test]
    fn ps7_irq_groups_share_one_port() {
        let ports = parse_ports(
            "output [3:0] FCLKCLK\noutput [3:0] FCLKRESETN\ninput [19:0] IRQF2P\n",
        )
        .unwrap();
        let mut rm = ResourceManager::new(&ports, CoreProfile::zynq_7000()).unwrap();
        rm.allocate_irq(9).unwrap();
        rm.allocate_reset(1).unwrap();
        let mut netlist = Netlist::new();
        let summary = rm.finalize(&mut netlist).unwrap();
        assert_eq!(summary.primitive, "PS7");
        let irq = Net::new("irqf2p", 20);
        assert_eq!(
            netlist.driver_of(&irq.bit(9)),
            Some(&Expr::from(Net::bit_net("pl_irq9")))
        );
        assert_eq!(
            netlist.driver_of(&Expr::from(Net::bit_net("pl_reset1"))),
            Some(&Net::new("fclkresetn", 4).bit(1).not())
        );
    }

    #[test]
    fn summary_lists_channels() {
        let (_, summary) = finalized(|rm| {
            rm.allocate_axi_channel("saxigp0").unwrap();
            rm.allocate_axi_channel("MAXIGP2").unwrap();
        });
        assert_eq!(summary.channels, vec!["MAXIGP2", "SAXIGP0"]);
        assert!(summary.to_string().starts_with("PS8: 132 ports"));
    }
}
