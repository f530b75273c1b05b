//! Symbolic field widths.
//!
//! Bus field widths are either literal or one of a closed set of symbols
//! resolved against concrete [`WidthParams`] when the layout is used.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Width of a layout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WidthExpr {
    /// Fixed width in bits.
    Literal(u32),
    /// Bus data width.
    DataWidth,
    /// Bus address width.
    AddrWidth,
    /// Transaction ID width.
    IdWidth,
    /// One strobe bit per data byte.
    DataWidthOverEight,
}

impl WidthExpr {
    /// Resolve to a bit count.
    pub fn resolve(self, params: &WidthParams) -> Result<u32> {
        match self {
            WidthExpr::Literal(n) => Ok(n),
            WidthExpr::DataWidth => params.require_data(),
            WidthExpr::AddrWidth => params
                .addr_width
                .ok_or(LayoutError::UnresolvedWidth { symbol: "addr_width" }),
            WidthExpr::IdWidth => params
                .id_width
                .ok_or(LayoutError::UnresolvedWidth { symbol: "id_width" }),
            WidthExpr::DataWidthOverEight => Ok(params.require_data()? / 8),
        }
    }

    /// Whether the width depends on a parameter.
    pub fn is_symbolic(self) -> bool {
        !matches!(self, WidthExpr::Literal(_))
    }
}

impl fmt::Display for WidthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthExpr::Literal(n) => write!(f, "{n}"),
            WidthExpr::DataWidth => f.write_str("data_width"),
            WidthExpr::AddrWidth => f.write_str("addr_width"),
            WidthExpr::IdWidth => f.write_str("id_width"),
            WidthExpr::DataWidthOverEight => f.write_str("data_width/8"),
        }
    }
}

impl FromStr for WidthExpr {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "data_width" => Ok(WidthExpr::DataWidth),
            "addr_width" => Ok(WidthExpr::AddrWidth),
            "id_width" => Ok(WidthExpr::IdWidth),
            "data_width/8" | "data_width//8" => Ok(WidthExpr::DataWidthOverEight),
            other => other
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .map(WidthExpr::Literal)
                .ok_or_else(|| LayoutError::InvalidWidthExpr {
                    text: s.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for WidthExpr {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WidthExpr> for String {
    fn from(expr: WidthExpr) -> Self {
        expr.to_string()
    }
}

/// Concrete values for the width symbols of one layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WidthParams {
    /// Data width in bits; must be a multiple of 8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_width: Option<u32>,
    /// Address width in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_width: Option<u32>,
    /// ID width in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_width: Option<u32>,
}

impl WidthParams {
    /// Parameters with all three widths set.
    pub fn new(data_width: u32, addr_width: u32, id_width: u32) -> Self {
        Self {
            data_width: Some(data_width),
            addr_width: Some(addr_width),
            id_width: Some(id_width),
        }
    }

    /// Fill every unset width from `defaults`.
    pub fn or(self, defaults: WidthParams) -> Self {
        Self {
            data_width: self.data_width.or(defaults.data_width),
            addr_width: self.addr_width.or(defaults.addr_width),
            id_width: self.id_width.or(defaults.id_width),
        }
    }

    /// Reject zero widths and data widths that are not byte multiples.
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.data_width {
            if width == 0 {
                return Err(LayoutError::ZeroWidth { symbol: "data_width" });
            }
            if width % 8 != 0 {
                return Err(LayoutError::UnalignedDataWidth { width });
            }
        }
        if self.addr_width == Some(0) {
            return Err(LayoutError::ZeroWidth { symbol: "addr_width" });
        }
        if self.id_width == Some(0) {
            return Err(LayoutError::ZeroWidth { symbol: "id_width" });
        }
        Ok(())
    }

    fn require_data(&self) -> Result<u32> {
        self.data_width
            .ok_or(LayoutError::UnresolvedWidth { symbol: "data_width" })
    }
}
