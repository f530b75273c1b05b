//! The AXI to AXI-Lite bridge adapter.
//!
//! One adapter drives one point-to-point translation: a hard-core master
//! channel on the full-bus side and a single reduced-bus master on the
//! other. Fan-out to several peripherals needs an external crossbar.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zynq_alloc::{AxiChannel, CoreProfile};
use zynq_layout::{
    axi_full_layout, axi_lite_layout, field_prefix, generate_channel_layout, ChannelClass,
    FieldDescriptor, InterfaceLayout, WidthParams,
};
use zynq_netlist::{Elaborator, Expr, Instance, Net};
use zynq_ports::PortSet;

use crate::error::{BridgeError, Result};
use crate::primitive::PrimitiveContract;
use crate::wiring::{BridgeWiring, End};

/// Sideband fields the bridge never wires.
pub const DEFAULT_EXCLUDED: &[&str] = &[
    "ACLK", "ARESETN", "AWUSER", "ARUSER", "WID", "RCOUNT", "WCOUNT", "RACOUNT", "WACOUNT",
    "AWQOS", "ARQOS",
];

/// Bus widths the bridge is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeParams {
    pub data_width: u32,
    pub addr_width: u32,
    pub id_width: u32,
}

impl BridgeParams {
    pub fn widths(&self) -> WidthParams {
        WidthParams::new(self.data_width, self.addr_width, self.id_width)
    }
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            data_width: 32,
            addr_width: 16,
            id_width: 5,
        }
    }
}

/// Reduced-bus side of an elaborated bridge, as handed to the peripheral.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteBus {
    layout: InterfaceLayout,
    nets: Vec<Net>,
}

impl LiteBus {
    /// Layout from the bridge's (master) point of view.
    pub fn layout(&self) -> &InterfaceLayout {
        &self.layout
    }

    pub fn field(&self, name: &str) -> Option<&Net> {
        self.layout
            .fields()
            .iter()
            .position(|f| f.name == name)
            .map(|i| &self.nets[i])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Net)> {
        self.layout.fields().iter().zip(self.nets.iter())
    }
}

/// Builds the bindings of one bridge primitive between a hard-core master
/// channel and a reduced-bus master port.
#[derive(Debug, Clone)]
pub struct BridgeAdapter {
    name: String,
    channel: String,
    params: BridgeParams,
    contract: PrimitiveContract,
    excluded: BTreeSet<String>,
    core: InterfaceLayout,
    full: InterfaceLayout,
    lite: InterfaceLayout,
}

impl BridgeAdapter {
    /// Adapter for master channel `channel` of `profile` (case-insensitive),
    /// using the `axi2axilite` contract and the default exclusions.
    ///
    /// The channel's port prefix and class come from the profile. Fails
    /// here, not at elaborate time, when the channel is not a master or its
    /// ports cannot be wired to the primitive.
    pub fn new(
        ports: &PortSet,
        profile: &CoreProfile,
        channel: &str,
        params: BridgeParams,
    ) -> Result<Self> {
        Self::with_exclusions(ports, profile, channel, params, std::iter::empty::<String>())
    }

    /// Like [`BridgeAdapter::new`], excluding `extra` fields on top of
    /// [`DEFAULT_EXCLUDED`].
    pub fn with_exclusions<I, S>(
        ports: &PortSet,
        profile: &CoreProfile,
        channel: &str,
        params: BridgeParams,
        extra: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let decl = profile
            .channel(channel)
            .ok_or_else(|| BridgeError::UnknownChannel {
                channel: channel.to_string(),
                profile: profile.name.clone(),
            })?;
        if decl.class != ChannelClass::Master {
            return Err(BridgeError::NotMasterChannel {
                channel: decl.name.clone(),
                class: decl.class,
            });
        }

        let channel = decl.name.clone();
        let widths = params.widths();
        let core = generate_channel_layout(ports, &channel, ChannelClass::Master, widths)?;
        let full = axi_full_layout(widths)?.flipped();
        let lite = axi_lite_layout(params.data_width, params.addr_width)?;

        let mut excluded: BTreeSet<String> =
            DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect();
        excluded.extend(extra.into_iter().map(|f| f.into().to_ascii_uppercase()));

        let adapter = Self {
            name: format!("{}_axi2axil", channel.to_ascii_lowercase()),
            channel,
            params,
            contract: PrimitiveContract::default(),
            excluded,
            core,
            full,
            lite,
        };
        adapter.upstream_wiring().connections()?;
        Ok(adapter)
    }

    /// Use a different primitive.
    pub fn with_contract(mut self, contract: PrimitiveContract) -> Self {
        self.contract = contract;
        self
    }

    /// Instance name of the primitive.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn params(&self) -> BridgeParams {
        self.params
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Hard-core master channel (source) to the primitive's full-bus slave
    /// port (destination).
    pub fn upstream_wiring(&self) -> BridgeWiring {
        BridgeWiring::new(self.core.clone(), self.full.clone(), self.excluded.clone())
    }

    /// Primitive's reduced-bus master port (source) to the peripheral
    /// (destination).
    pub fn downstream_wiring(&self) -> BridgeWiring {
        BridgeWiring::new(self.lite.clone(), self.lite.flipped(), BTreeSet::new())
    }

    /// Emit the primitive instance. The full-bus side is bound to the
    /// allocated channel's nets, the reduced side to fresh nets returned as
    /// a [`LiteBus`]. `reset` is active high.
    pub fn elaborate<E: Elaborator + ?Sized>(
        self,
        channel: &AxiChannel,
        clock: &Net,
        reset: &Net,
        elab: &mut E,
    ) -> Result<LiteBus> {
        if !channel.name().eq_ignore_ascii_case(&self.channel) {
            return Err(BridgeError::ChannelMismatch {
                expected: self.channel,
                found: channel.name().to_string(),
            });
        }
        let class = channel.layout().class();
        if class != ChannelClass::Master {
            return Err(BridgeError::NotMasterChannel {
                channel: channel.name().to_string(),
                class,
            });
        }

        let contract = &self.contract;
        let mut instance = Instance::new(self.name.as_str(), contract.module.as_str())
            .with_parameter(contract.data_width_param.as_str(), self.params.data_width.into())
            .with_parameter(contract.addr_width_param.as_str(), self.params.addr_width.into())
            .with_parameter(contract.id_width_param.as_str(), self.params.id_width.into());
        instance.bind(format!("i_{}", contract.clock_port), clock);
        instance.bind(format!("i_{}", contract.reset_port), Expr::from(reset).not());

        let mut narrowed = Vec::new();
        for conn in self.upstream_wiring().connections()? {
            let net = channel.field(&conn.field)?;
            if net.width < conn.width {
                return Err(BridgeError::NetTooNarrow {
                    field: conn.field,
                    width: conn.width,
                    available: net.width,
                });
            }
            let expr = if net.width == conn.width {
                Expr::from(net)
            } else {
                narrowed.push(conn.field.clone());
                net.slice(0, conn.width)
            };
            let prefix = field_prefix(conn.direction_at(End::Destination));
            instance.bind(format!("{prefix}{}{}", contract.slave_prefix, conn.field), expr);
        }

        if !narrowed.is_empty() {
            warn!(
                channel = %self.channel,
                fields = %narrowed.join(","),
                "bridge uses the low bits of wider channel ports"
            );
        }

        let mut nets = Vec::with_capacity(self.lite.len());
        for field in self.lite.fields() {
            let width = field.width.resolve(self.lite.params())?;
            let net = Net::new(
                format!("{}_{}", self.name, field.name.to_ascii_lowercase()),
                width,
            );
            instance.bind(
                format!("{}{}{}", field_prefix(field.direction), contract.master_prefix, field.name),
                &net,
            );
            nets.push(net);
        }

        let bound = instance.ports.len();
        elab.instantiate(instance)?;
        info!(
            bridge = %self.name,
            channel = %self.channel,
            data_width = self.params.data_width,
            addr_width = self.params.addr_width,
            id_width = self.params.id_width,
            ports = bound,
            "elaborated AXI-Lite bridge"
        );

        Ok(LiteBus {
            layout: self.lite,
            nets,
        })
    }
}
