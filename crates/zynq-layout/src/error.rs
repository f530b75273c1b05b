//! Layout generation errors.

use thiserror::Error;

use crate::channel::ChannelClass;

/// Errors that can occur while generating or resolving an interface layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown channel class '{name}' (expected master, slave, slave_acp or lite)")]
    UnknownChannelClass { name: String },

    #[error("{class} layouts have a fixed shape and are not derived from port lists")]
    FixedShapeClass { class: ChannelClass },

    #[error("data width {width} is not a multiple of 8")]
    UnalignedDataWidth { width: u32 },

    #[error("{symbol} must be at least 1")]
    ZeroWidth { symbol: &'static str },

    #[error("width symbol {symbol} has no value in this layout")]
    UnresolvedWidth { symbol: &'static str },

    #[error("invalid width expression '{text}'")]
    InvalidWidthExpr { text: String },

    #[error("no port starts with channel prefix '{prefix}'")]
    UnknownPrefix { prefix: String },

    #[error("layout has no field '{field}'")]
    UnknownField { field: String },

    #[error("duplicate field '{field}' in layout")]
    DuplicateField { field: String },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
