//! Primitive instantiations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::Expr;

/// A port of an instance bound to an expression. `port` carries the
/// direction prefix (`i_` or `o_`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    pub port: String,
    pub expr: Expr,
}

/// A named instantiation of an external primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name, unique within a netlist.
    pub name: String,
    /// Primitive (module) name.
    pub module: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, u64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub ports: Vec<PortBinding>,
}

impl Instance {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            parameters: BTreeMap::new(),
            attributes: BTreeMap::new(),
            ports: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: u64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Bind a prefixed port name to an expression.
    pub fn bind(&mut self, port: impl Into<String>, expr: impl Into<Expr>) {
        self.ports.push(PortBinding {
            port: port.into(),
            expr: expr.into(),
        });
    }

    /// Builder form of [`Instance::bind`].
    pub fn with_port(mut self, port: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.bind(port, expr);
        self
    }

    /// The binding of a prefixed port name.
    pub fn port(&self, port: &str) -> Option<&Expr> {
        self.ports.iter().find(|b| b.port == port).map(|b| &b.expr)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance {} : {}", self.name, self.module)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, " #({})", params.join(", "))?;
        }
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}=\"{v}\""))
                .collect();
            write!(f, " ({})", attrs.join(", "))?;
        }
        writeln!(f)?;
        for binding in &self.ports {
            writeln!(f, "  .{}({})", binding.port, binding.expr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Net;

    #[test]
    fn builder_and_lookup() {
        let clk = Net::bit_net("pl_clk0");
        let inst = Instance::new("clk0_buffer", "BUFG_PS")
            .with_port("i_I", Net::bit_net("pl_clk0_unbuf"))
            .with_port("o_O", &clk);
        assert_eq!(inst.port("o_O"), Some(&Expr::from(&clk)));
        assert!(inst.port("O").is_none());
    }

    #[test]
    fn display_lists_bindings() {
        let inst = Instance::new("bridge", "axi2axilite")
            .with_parameter("C_AXI_DATA_WIDTH", 32)
            .with_attribute("DONT_TOUCH", "true")
            .with_port("i_S_AXI_ACLK", Net::bit_net("clk"));
        let text = inst.to_string();
        assert!(text.starts_with("instance bridge : axi2axilite #(C_AXI_DATA_WIDTH=32) (DONT_TOUCH=\"true\")"));
        assert!(text.contains("  .i_S_AXI_ACLK(clk)"));
    }
}
