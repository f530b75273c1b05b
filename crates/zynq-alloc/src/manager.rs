//! The resource manager.
//!
//! One [`ResourceManager`] owns every slot pool for a generation run.
//! Allocation calls bind slots immediately and fail immediately; nothing is
//! emitted until [`ResourceManager::finalize`](crate::finalize) consumes it.

use tracing::debug;
use zynq_layout::{generate_channel_layout, InterfaceLayout, LayoutError, WidthParams};
use zynq_netlist::Net;
use zynq_ports::{PortDescriptor, PortSet};

use crate::channel::AxiChannel;
use crate::error::{AllocError, Result, SlotId};
use crate::pool::SlotPool;
use crate::profile::CoreProfile;
use crate::report::{PoolUsage, ResourceReport};
use crate::{CLOCK_SLOTS, IRQ_LINES, IRQ_LINES_PER_GROUP, RESET_SLOTS};

/// A bound clock slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockBinding {
    /// Buffered clock handed to user logic.
    pub net: Net,
    pub frequency_hz: f64,
}

/// A channel the port set actually provides.
#[derive(Debug, Clone)]
pub(crate) struct AvailableChannel {
    pub(crate) name: String,
    pub(crate) layout: InterfaceLayout,
}

/// Exclusive allocator for the hard core's clocks, resets, interrupt lines
/// and bus channels.
#[derive(Debug)]
pub struct ResourceManager {
    pub(crate) profile: CoreProfile,
    pub(crate) ports: PortSet,
    pub(crate) clocks: SlotPool<ClockBinding>,
    pub(crate) resets: SlotPool<Net>,
    pub(crate) irqs: SlotPool<Net>,
    pub(crate) available: Vec<AvailableChannel>,
    pub(crate) channels: SlotPool<()>,
}

impl ResourceManager {
    /// Create the pools for `profile` over a parsed port set.
    ///
    /// Fails when a clock, reset or interrupt port the profile names is
    /// missing or too narrow. Declared channels whose ports are absent are
    /// left out of the channel pool.
    pub fn new(ports: &PortSet, profile: CoreProfile) -> Result<Self> {
        profile.validate()?;
        require_port(ports, &profile.clock.port, "clock source", CLOCK_SLOTS)?;
        require_port(ports, &profile.reset.port, "reset status", RESET_SLOTS)?;
        for group in &profile.irq_groups {
            require_port(
                ports,
                &group.port,
                "interrupt group",
                group.base_bit.saturating_add(IRQ_LINES_PER_GROUP),
            )?;
        }

        let mut available = Vec::new();
        for decl in &profile.channels {
            match generate_channel_layout(ports, &decl.name, decl.class, WidthParams::default()) {
                Ok(layout) => available.push(AvailableChannel {
                    name: decl.name.clone(),
                    layout,
                }),
                Err(LayoutError::UnknownPrefix { .. }) => {
                    debug!(channel = %decl.name, "channel has no ports, not allocatable");
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(
            core = %profile.name,
            ports = ports.len(),
            channels = available.len(),
            "resource manager ready"
        );

        let channels = SlotPool::named(available.iter().map(|c| c.name.clone()));
        Ok(Self {
            profile,
            ports: ports.clone(),
            clocks: SlotPool::numbered(CLOCK_SLOTS, SlotId::Clock),
            resets: SlotPool::numbered(RESET_SLOTS, SlotId::Reset),
            irqs: SlotPool::numbered(IRQ_LINES, SlotId::Irq),
            available,
            channels,
        })
    }

    pub fn profile(&self) -> &CoreProfile {
        &self.profile
    }

    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    /// Bind clock slot `index` at `frequency_hz` and return the buffered
    /// clock net (`pl_clk<index>`).
    pub fn allocate_clock(&mut self, index: u32, frequency_hz: f64) -> Result<Net> {
        self.clocks.check_free(index)?;
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(AllocError::InvalidFrequency {
                index,
                frequency: frequency_hz,
            });
        }
        let net = Net::bit_net(format!("pl_clk{index}"));
        self.clocks.bind(
            index,
            ClockBinding {
                net: net.clone(),
                frequency_hz,
            },
        )?;
        debug!(index, frequency_hz, "allocated clock");
        Ok(net)
    }

    /// Bind reset slot `index` and return its active-high reset net.
    pub fn allocate_reset(&mut self, index: u32) -> Result<Net> {
        self.resets.check_free(index)?;
        let net = Net::bit_net(format!("pl_reset{index}"));
        self.resets.bind(index, net.clone())?;
        debug!(index, "allocated reset");
        Ok(net)
    }

    /// Bind interrupt line `index` and return the net user logic drives.
    pub fn allocate_irq(&mut self, index: u32) -> Result<Net> {
        self.irqs.check_free(index)?;
        let net = Net::bit_net(format!("pl_irq{index}"));
        self.irqs.bind(index, net.clone())?;
        debug!(index, "allocated interrupt line");
        Ok(net)
    }

    /// Bind a bus channel by name (case-insensitive).
    pub fn allocate_axi_channel(&mut self, name: &str) -> Result<AxiChannel> {
        let index = self.channel_index(name)?;
        self.channels.check_free(index)?;
        let entry = &self.available[index as usize];
        let channel = AxiChannel::new(&entry.name, entry.layout.clone(), &self.ports)?;
        self.channels.bind(index, ())?;
        debug!(channel = %entry.name, class = %entry.layout.class(), "allocated bus channel");
        Ok(channel)
    }

    /// Frequency recorded for a bound clock slot.
    pub fn clock_frequency(&self, index: u32) -> Option<f64> {
        self.clocks.get(index).map(|c| c.frequency_hz)
    }

    pub fn is_bound(&self, slot: &SlotId) -> bool {
        match slot {
            SlotId::Clock(n) => self.clocks.is_bound(*n),
            SlotId::Reset(n) => self.resets.is_bound(*n),
            SlotId::Irq(n) => self.irqs.is_bound(*n),
            SlotId::Channel(name) => self
                .channel_index(name)
                .is_ok_and(|i| self.channels.is_bound(i)),
        }
    }

    /// Names of the channels this port set provides, in profile order.
    pub fn available_channels(&self) -> impl Iterator<Item = &str> {
        self.available.iter().map(|c| c.name.as_str())
    }

    /// Bound and free counts per pool.
    pub fn usage(&self) -> ResourceReport {
        ResourceReport {
            core: self.profile.name.clone(),
            pools: vec![
                PoolUsage::of("clocks", &self.clocks),
                PoolUsage::of("resets", &self.resets),
                PoolUsage::of("irqs", &self.irqs),
                PoolUsage::of("channels", &self.channels),
            ],
        }
    }

    fn channel_index(&self, name: &str) -> Result<u32> {
        self.available
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(|i| i as u32)
            .ok_or_else(|| AllocError::UnknownChannel {
                name: name.to_string(),
                available: self
                    .available
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

fn require_port<'a>(
    ports: &'a PortSet,
    name: &str,
    purpose: &'static str,
    min_width: u32,
) -> Result<&'a PortDescriptor> {
    let port = ports.get(name).ok_or_else(|| AllocError::MissingCorePort {
        port: name.to_string(),
        purpose,
    })?;
    if port.width < min_width {
        return Err(AllocError::CorePortTooNarrow {
            port: name.to_string(),
            width: port.width,
            required: min_width,
        });
    }
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::ps8_ports;
    use zynq_ports::parse_ports;

    fn manager() -> ResourceManager {
        ResourceManager::new(&ps8_ports(), CoreProfile::zynq_mp()).unwrap()
    }

    #[test]
    fn only_present_channels_are_available() {
        let rm = manager();
        let names: Vec<_> = rm.available_channels().collect();
        assert_eq!(names, vec!["MAXIGP0", "MAXIGP2", "SAXIGP0"]);
    }

    #[test]
    fn clock_twice_keeps_first_frequency() {
        let mut rm = manager();
        let clk = rm.allocate_clock(0, 100e6).unwrap();
        assert_eq!(clk.name, "pl_clk0");
        let err = rm.allocate_clock(0, 50e6).unwrap_err();
        assert!(matches!(err, AllocError::SlotTaken { slot: SlotId::Clock(0) }));
        assert_eq!(rm.clock_frequency(0), Some(100e6));
    }

    #[test]
    fn bad_frequency_rejected_without_binding() {
        let mut rm = manager();
        for f in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                rm.allocate_clock(1, f).unwrap_err(),
                AllocError::InvalidFrequency { index: 1, .. }
            ));
        }
        assert!(!rm.is_bound(&SlotId::Clock(1)));
        rm.allocate_clock(1, 25e6).unwrap();
    }

    #[test]
    fn irq_sixteen_is_out_of_range() {
        let mut rm = manager();
        rm.allocate_irq(3).unwrap();
        let err = rm.allocate_irq(16).unwrap_err();
        assert!(matches!(
            err,
            AllocError::OutOfRange {
                slot: SlotId::Irq(16),
                capacity: 16
            }
        ));
        assert_eq!(rm.usage().pool("irqs").unwrap().bound, vec!["irq line 3"]);
    }

    #[test]
    fn reset_and_irq_conflicts() {
        let mut rm = manager();
        rm.allocate_reset(2).unwrap();
        assert!(matches!(
            rm.allocate_reset(2).unwrap_err(),
            AllocError::SlotTaken { slot: SlotId::Reset(2) }
        ));
        assert!(matches!(
            rm.allocate_reset(4).unwrap_err(),
            AllocError::OutOfRange { .. }
        ));
        rm.allocate_irq(15).unwrap();
        assert!(rm.allocate_irq(15).is_err());
    }

    #[test]
    fn channels_allocate_once_ignoring_case() {
        let mut rm = manager();
        let ch = rm.allocate_axi_channel("maxigp2").unwrap();
        assert_eq!(ch.name(), "MAXIGP2");
        assert_eq!(ch.field("WDATA").unwrap().width, 128);
        assert!(rm.is_bound(&SlotId::Channel("MAXIGP2".into())));
        assert!(matches!(
            rm.allocate_axi_channel("MAXIGP2").unwrap_err(),
            AllocError::SlotTaken { .. }
        ));
        assert!(matches!(
            rm.allocate_axi_channel("MAXIGP1").unwrap_err(),
            AllocError::UnknownChannel { .. }
        ));
    }

    #[test]
    fn missing_core_ports_rejected() {
        let ports = parse_ports("output [3:0] PLCLK\noutput [95:0] EMIOGPIOO").unwrap();
        let err = ResourceManager::new(&ports, CoreProfile::zynq_mp()).unwrap_err();
        assert!(matches!(
            err,
            AllocError::MissingCorePort {
                purpose: "interrupt group",
                ..
            }
        ));

        let narrow = parse_ports(
            "output [1:0] PLCLK\noutput [95:0] EMIOGPIOO\ninput [7:0] PLPSIRQ0\ninput [7:0] PLPSIRQ1",
        )
        .unwrap();
        assert!(matches!(
            ResourceManager::new(&narrow, CoreProfile::zynq_mp()).unwrap_err(),
            AllocError::CorePortTooNarrow { required: 4, .. }
        ));
    }

    #[test]
    fn irq_group_past_the_port_end_rejected() {
        let mut profile = CoreProfile::zynq_mp();
        profile.irq_groups[0].base_bit = u32::MAX;
        assert!(matches!(
            ResourceManager::new(&ps8_ports(), profile.clone()).unwrap_err(),
            AllocError::InvalidProfile { .. }
        ));

        profile.irq_groups[0].base_bit = u32::MAX - IRQ_LINES_PER_GROUP;
        assert!(matches!(
            ResourceManager::new(&ps8_ports(), profile).unwrap_err(),
            AllocError::CorePortTooNarrow { required: u32::MAX, .. }
        ));
    }

    #[test]
    fn usage_report_counts() {
        let mut rm = manager();
        rm.allocate_clock(0, 100e6).unwrap();
        rm.allocate_clock(3, 200e6).unwrap();
        rm.allocate_axi_channel("SAXIGP0").unwrap();
        let report = rm.usage();
        assert_eq!(report.pool("clocks").unwrap().bound.len(), 2);
        assert_eq!(report.pool("channels").unwrap().capacity, 3);
        assert_eq!(report.total_bound(), 3);
        let text = report.to_string();
        assert!(text.contains("clocks: 2/4 bound"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn distinct_indices_always_succeed(
                clocks in Just((0..CLOCK_SLOTS).collect::<Vec<_>>()).prop_shuffle(),
                resets in Just((0..RESET_SLOTS).collect::<Vec<_>>()).prop_shuffle(),
                irqs in Just((0..IRQ_LINES).collect::<Vec<_>>()).prop_shuffle(),
            ) {
                let mut rm = manager();
                for i in clocks {
                    prop_assert!(rm.allocate_clock(i, 100e6).is_ok());
                }
                for i in resets {
                    prop_assert!(rm.allocate_reset(i).is_ok());
                }
                for i in irqs {
                    prop_assert!(rm.allocate_irq(i).is_ok());
                }
                prop_assert_eq!(rm.usage().total_bound(), CLOCK_SLOTS + RESET_SLOTS + IRQ_LINES);
            }

            #[test]
            fn second_allocation_conflicts(
                clock in 0..CLOCK_SLOTS,
                reset in 0..RESET_SLOTS,
                irq in 0..IRQ_LINES,
            ) {
                let mut rm = manager();
                rm.allocate_clock(clock, 10e6).unwrap();
                rm.allocate_reset(reset).unwrap();
                rm.allocate_irq(irq).unwrap();
                let is_taken = |r: Result<Net>| matches!(r, Err(AllocError::SlotTaken { .. }));
                prop_assert!(is_taken(rm.allocate_clock(clock, 20e6)));
                prop_assert!(is_taken(rm.allocate_reset(reset)));
                prop_assert!(is_taken(rm.allocate_irq(irq)));
            }

            #[test]
            fn out_of_range_never_mutates(index in IRQ_LINES..1000u32) {
                let mut rm = manager();
                let before = rm.usage();
                let is_range = matches!(
                    rm.allocate_irq(index),
                    Err(AllocError::OutOfRange { .. })
                );
                prop_assert!(is_range);
                prop_assert_eq!(rm.usage(), before);
            }
        }
    }
}
