//! Nets and the expressions built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named signal of fixed width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub width: u32,
}

impl Net {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    /// A one-bit net.
    pub fn bit_net(name: impl Into<String>) -> Self {
        Self::new(name, 1)
    }

    /// Single bit `index` of this net.
    pub fn bit(&self, index: u32) -> Expr {
        Expr::Bit {
            net: self.clone(),
            index,
        }
    }

    /// Bits `start .. start + width` of this net.
    pub fn slice(&self, start: u32, width: u32) -> Expr {
        Expr::Slice {
            net: self.clone(),
            start,
            width,
        }
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A value or assignable location in the netlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A whole net.
    Net(Net),
    /// One bit of a net.
    Bit { net: Net, index: u32 },
    /// A contiguous bit range of a net.
    Slice { net: Net, start: u32, width: u32 },
    /// Bitwise inverse.
    Not(Box<Expr>),
}

impl Expr {
    /// Width in bits.
    pub fn width(&self) -> u32 {
        match self {
            Expr::Net(net) => net.width,
            Expr::Bit { .. } => 1,
            Expr::Slice { width, .. } => *width,
            Expr::Not(inner) => inner.width(),
        }
    }

    /// The net this expression reads or writes.
    pub fn net(&self) -> &Net {
        match self {
            Expr::Net(net) | Expr::Bit { net, .. } | Expr::Slice { net, .. } => net,
            Expr::Not(inner) => inner.net(),
        }
    }

    /// Whether the expression refers to bits that exist on its net.
    pub fn in_bounds(&self) -> bool {
        match self {
            Expr::Net(_) => true,
            Expr::Bit { net, index } => *index < net.width,
            Expr::Slice { net, start, width } => {
                *width > 0 && start.checked_add(*width).is_some_and(|end| end <= net.width)
            }
            Expr::Not(inner) => inner.in_bounds(),
        }
    }

    /// Whether the expression can be driven (an inverse cannot).
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Expr::Not(_))
    }

    /// Bitwise inverse of this expression.
    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl From<Net> for Expr {
    fn from(net: Net) -> Self {
        Expr::Net(net)
    }
}

impl From<&Net> for Expr {
    fn from(net: &Net) -> Self {
        Expr::Net(net.clone())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Net(net) => write!(f, "{net}"),
            Expr::Bit { net, index } => write!(f, "{net}[{index}]"),
            Expr::Slice { net, start, width } => {
                match width.checked_sub(1).and_then(|w| start.checked_add(w)) {
                    Some(msb) => write!(f, "{net}[{msb}:{start}]"),
                    // empty or past u32::MAX: no msb:lsb form exists
                    None => write!(f, "{net}[{start}+:{width}]"),
                }
            }
            Expr::Not(inner) => write!(f, "~{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        let bus = Net::new("emiogpioo", 95);
        assert_eq!(Expr::from(&bus).width(), 95);
        assert_eq!(bus.bit(94).width(), 1);
        assert_eq!(bus.slice(8, 8).width(), 8);
        assert_eq!(bus.bit(94).not().width(), 1);
    }

    #[test]
    fn bounds() {
        let bus = Net::new("plclk", 4);
        assert!(bus.bit(3).in_bounds());
        assert!(!bus.bit(4).in_bounds());
        assert!(bus.slice(0, 4).in_bounds());
        assert!(!bus.slice(2, 3).in_bounds());
        assert!(!bus.slice(0, 0).in_bounds());
    }

    #[test]
    fn display() {
        let bus = Net::new("irq", 8);
        assert_eq!(bus.bit(2).to_string(), "irq[2]");
        assert_eq!(bus.slice(0, 4).to_string(), "irq[3:0]");
        assert_eq!(bus.bit(1).not().to_string(), "~irq[1]");
        assert!(!bus.bit(1).not().is_assignable());
        assert_eq!(bus.bit(1).not().net().name, "irq");
    }

    #[test]
    fn display_degenerate_slices() {
        let bus = Net::new("irq", 8);
        assert_eq!(bus.slice(0, 0).to_string(), "irq[0+:0]");
        assert_eq!(bus.slice(u32::MAX, 2).to_string(), format!("irq[{}+:2]", u32::MAX));
        assert_eq!(bus.slice(u32::MAX, 1).to_string(), format!("irq[{0}:{0}]", u32::MAX));
        assert_eq!(bus.slice(9, 4).to_string(), "irq[12:9]");
    }
}
