//! Fixed-shape bus layouts that do not come from a port list.
//!
//! Both are drawn from the master's point of view: `Output` fields are
//! driven by the master, `Input` fields by the slave.

use zynq_ports::PortDirection::{Input, Output};

use crate::channel::{ChannelClass, Role};
use crate::error::Result;
use crate::layout::{FieldDescriptor, InterfaceLayout};
use crate::width::{WidthExpr, WidthParams};

use WidthExpr::{AddrWidth, DataWidth, DataWidthOverEight, IdWidth, Literal};

/// The reduced register bus: no bursts, no IDs.
pub fn axi_lite_layout(data_width: u32, addr_width: u32) -> Result<InterfaceLayout> {
    let fields = vec![
        FieldDescriptor::new("AWADDR", AddrWidth, Output),
        FieldDescriptor::new("AWPROT", Literal(3), Output),
        FieldDescriptor::new("AWVALID", Literal(1), Output),
        FieldDescriptor::new("AWREADY", Literal(1), Input),
        FieldDescriptor::new("WDATA", DataWidth, Output),
        FieldDescriptor::new("WSTRB", DataWidthOverEight, Output),
        FieldDescriptor::new("WVALID", Literal(1), Output),
        FieldDescriptor::new("WREADY", Literal(1), Input),
        FieldDescriptor::new("BRESP", Literal(2), Input),
        FieldDescriptor::new("BVALID", Literal(1), Input),
        FieldDescriptor::new("BREADY", Literal(1), Output),
        FieldDescriptor::new("ARADDR", AddrWidth, Output),
        FieldDescriptor::new("ARPROT", Literal(3), Output),
        FieldDescriptor::new("ARVALID", Literal(1), Output),
        FieldDescriptor::new("ARREADY", Literal(1), Input),
        FieldDescriptor::new("RDATA", DataWidth, Input),
        FieldDescriptor::new("RRESP", Literal(2), Input),
        FieldDescriptor::new("RVALID", Literal(1), Input),
        FieldDescriptor::new("RREADY", Literal(1), Output),
    ];
    let params = WidthParams {
        data_width: Some(data_width),
        addr_width: Some(addr_width),
        id_width: None,
    };
    InterfaceLayout::new(ChannelClass::Lite, Role::Master, params, fields)
}

/// The full AXI4 bus as seen by a bridge primitive's upstream port.
pub fn axi_full_layout(params: WidthParams) -> Result<InterfaceLayout> {
    let fields = vec![
        FieldDescriptor::new("AWID", IdWidth, Output),
        FieldDescriptor::new("AWADDR", AddrWidth, Output),
        FieldDescriptor::new("AWLEN", Literal(8), Output),
        FieldDescriptor::new("AWSIZE", Literal(3), Output),
        FieldDescriptor::new("AWBURST", Literal(2), Output),
        FieldDescriptor::new("AWLOCK", Literal(1), Output),
        FieldDescriptor::new("AWCACHE", Literal(4), Output),
        FieldDescriptor::new("AWPROT", Literal(3), Output),
        FieldDescriptor::new("AWQOS", Literal(4), Output),
        FieldDescriptor::new("AWVALID", Literal(1), Output),
        FieldDescriptor::new("AWREADY", Literal(1), Input),
        FieldDescriptor::new("WDATA", DataWidth, Output),
        FieldDescriptor::new("WSTRB", DataWidthOverEight, Output),
        FieldDescriptor::new("WLAST", Literal(1), Output),
        FieldDescriptor::new("WVALID", Literal(1), Output),
        FieldDescriptor::new("WREADY", Literal(1), Input),
        FieldDescriptor::new("BID", IdWidth, Input),
        FieldDescriptor::new("BRESP", Literal(2), Input),
        FieldDescriptor::new("BVALID", Literal(1), Input),
        FieldDescriptor::new("BREADY", Literal(1), Output),
        FieldDescriptor::new("ARID", IdWidth, Output),
        FieldDescriptor::new("ARADDR", AddrWidth, Output),
        FieldDescriptor::new("ARLEN", Literal(8), Output),
        FieldDescriptor::new("ARSIZE", Literal(3), Output),
        FieldDescriptor::new("ARBURST", Literal(2), Output),
        FieldDescriptor::new("ARLOCK", Literal(1), Output),
        FieldDescriptor::new("ARCACHE", Literal(4), Output),
        FieldDescriptor::new("ARPROT", Literal(3), Output),
        FieldDescriptor::new("ARQOS", Literal(4), Output),
        FieldDescriptor::new("ARVALID", Literal(1), Output),
        FieldDescriptor::new("ARREADY", Literal(1), Input),
        FieldDescriptor::new("RID", IdWidth, Input),
        FieldDescriptor::new("RDATA", DataWidth, Input),
        FieldDescriptor::new("RRESP", Literal(2), Input),
        FieldDescriptor::new("RLAST", Literal(1), Input),
        FieldDescriptor::new("RVALID", Literal(1), Input),
        FieldDescriptor::new("RREADY", Literal(1), Output),
    ];
    InterfaceLayout::new(ChannelClass::Master, Role::Master, params, fields)
}
