//! Port and parameter names of the external protocol-conversion primitive.

use serde::{Deserialize, Serialize};

/// How to instantiate the primitive that performs the AXI to AXI-Lite
/// conversion. The adapter only produces bindings; the conversion logic
/// lives in the primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrimitiveContract {
    /// Module name.
    pub module: String,
    pub data_width_param: String,
    pub addr_width_param: String,
    pub id_width_param: String,
    /// Prefix of the full-bus (upstream, slave) ports.
    pub slave_prefix: String,
    /// Prefix of the reduced-bus (downstream, master) ports.
    pub master_prefix: String,
    pub clock_port: String,
    /// Active-low reset input.
    pub reset_port: String,
}

impl PrimitiveContract {
    /// The `axi2axilite` bridge core.
    pub fn axi2axilite() -> Self {
        Self {
            module: "axi2axilite".into(),
            data_width_param: "C_AXI_DATA_WIDTH".into(),
            addr_width_param: "C_AXI_ADDR_WIDTH".into(),
            id_width_param: "C_AXI_ID_WIDTH".into(),
            slave_prefix: "S_AXI_".into(),
            master_prefix: "M_AXI_".into(),
            clock_port: "S_AXI_ACLK".into(),
            reset_port: "S_AXI_ARESETN".into(),
        }
    }
}

impl Default for PrimitiveContract {
    fn default() -> Self {
        Self::axi2axilite()
    }
}
