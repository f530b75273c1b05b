//! `zynqgen build`: allocate the resources a design file asks for and emit
//! the resulting netlist.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use zynq_alloc::{
    resolve_profile, AxiChannel, CoreProfile, FinalizeSummary, ResourceManager, ResourceReport,
};
use zynq_bridge::BridgeAdapter;
use zynq_layout::LayoutArtifact;
use zynq_netlist::{Elaborator, Expr, Net, Netlist};
use zynq_ports::{load_port_file, PortSet};

use crate::config::{BridgeConfig, DesignConfig};

/// Everything a build produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub netlist: Netlist,
    pub usage: ResourceReport,
    pub summary: FinalizeSummary,
    /// Nets of the AXI-Lite bus, when a bridge was requested.
    pub lite_nets: Vec<Net>,
}

pub fn run(config_path: &Path, output: Option<&Path>, format: Option<&str>) -> Result<()> {
    let json = match format {
        None | Some("json") => true,
        Some("text") => false,
        Some(other) => bail!("unknown format '{other}' (expected json or text)"),
    };

    let config = DesignConfig::load(config_path)?;
    let result = build(&config)?;
    eprint!("{}", result.usage);
    eprintln!("{}", result.summary);

    let text = if json {
        format!("{}\n", result.netlist.to_json()?)
    } else {
        result.netlist.to_string()
    };
    super::emit(&text, output)
}

/// Run a whole design. Nothing is written; a failure at any step leaves no
/// partial netlist behind.
pub fn build(config: &DesignConfig) -> Result<BuildOutput> {
    let ports_path = &config.core.ports;
    let ports = load_port_file(ports_path)
        .with_context(|| format!("reading {}", ports_path.display()))?;
    if let Some(artifact) = &config.core.artifact {
        check_artifact(artifact, &ports)?;
    }

    let profile = resolve_profile(&config.core.profile)?;
    let mut manager = ResourceManager::new(&ports, profile)?;
    let mut netlist = Netlist::new();

    let mut clocks = BTreeMap::new();
    for req in &config.clocks {
        let net = manager
            .allocate_clock(req.index, req.frequency)
            .with_context(|| format!("allocating clock {}", req.index))?;
        clocks.insert(req.index, net);
    }

    let mut resets = BTreeMap::new();
    for req in &config.resets {
        let net = manager
            .allocate_reset(req.index)
            .with_context(|| format!("allocating reset {}", req.index))?;
        resets.insert(req.index, net);
    }

    for req in &config.irqs {
        let net = manager
            .allocate_irq(req.index)
            .with_context(|| format!("allocating irq {}", req.index))?;
        if let Some(source) = &req.net {
            netlist.assign(net.into(), Net::bit_net(source.as_str()).into())?;
        }
    }

    let mut channels: BTreeMap<String, AxiChannel> = BTreeMap::new();
    for req in &config.channels {
        let channel = manager
            .allocate_axi_channel(&req.name)
            .with_context(|| format!("allocating channel {}", req.name))?;
        channels.insert(channel.name().to_string(), channel);
    }

    let mut lite_nets = Vec::new();
    if let Some(bridge) = &config.bridge {
        // listed channels are keyed by the profile's spelling
        let key = manager
            .profile()
            .channel(&bridge.channel)
            .map_or_else(|| bridge.channel.clone(), |decl| decl.name.clone());
        let channel = match channels.remove(&key) {
            Some(channel) => channel,
            None => manager
                .allocate_axi_channel(&bridge.channel)
                .with_context(|| format!("allocating channel {} for the bridge", bridge.channel))?,
        };
        lite_nets = elaborate_bridge(
            bridge,
            &ports,
            manager.profile(),
            &channel,
            &clocks,
            &resets,
            &mut netlist,
        )?;
    }

    let usage = manager.usage();
    let summary = manager.finalize(&mut netlist)?;
    info!(
        instances = netlist.instances.len(),
        assignments = netlist.assignments.len(),
        "build complete"
    );
    Ok(BuildOutput {
        netlist,
        usage,
        summary,
        lite_nets,
    })
}

fn check_artifact(path: &Path, ports: &PortSet) -> Result<()> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let artifact =
        LayoutArtifact::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?;
    if !artifact.matches(ports) {
        warn!(
            artifact = %path.display(),
            expected = %artifact.source_digest,
            found = %ports.digest(),
            "port file changed since the layout artifact was generated"
        );
    }
    Ok(())
}

fn elaborate_bridge(
    bridge: &BridgeConfig,
    ports: &PortSet,
    profile: &CoreProfile,
    channel: &AxiChannel,
    clocks: &BTreeMap<u32, Net>,
    resets: &BTreeMap<u32, Net>,
    netlist: &mut Netlist,
) -> Result<Vec<Net>> {
    let Some(clock) = clocks.get(&bridge.clock) else {
        bail!("bridge clock {} is not allocated", bridge.clock);
    };
    let Some(reset) = resets.get(&bridge.reset) else {
        bail!("bridge reset {} is not allocated", bridge.reset);
    };

    let mut adapter = BridgeAdapter::with_exclusions(
        ports,
        profile,
        &bridge.channel,
        bridge.params(),
        &bridge.exclude,
    )
    .with_context(|| format!("bridging {}", bridge.channel))?;
    if let Some(contract) = &bridge.primitive {
        adapter = adapter.with_contract(contract.clone());
    }
    if let Some(name) = &bridge.name {
        adapter = adapter.with_name(name.as_str());
    }

    // The hard core samples the channel on the clock the bridge runs on.
    netlist.assign(Expr::from(channel.field("ACLK")?), Expr::from(clock))?;

    let lite = adapter.elaborate(channel, clock, reset, netlist)?;
    Ok(lite.fields().map(|(_, net)| net.clone()).collect())
}
