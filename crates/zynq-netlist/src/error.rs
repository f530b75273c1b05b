//! Error types for netlist elaboration.

/// Errors raised while recording structural netlist content.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// Two instances with the same name.
    #[error("duplicate instance name '{name}'")]
    DuplicateInstance {
        /// The repeated instance name.
        name: String,
    },

    /// A port bound twice on one instance.
    #[error("instance '{instance}' binds port '{port}' more than once")]
    DuplicatePortBinding {
        /// Instance name.
        instance: String,
        /// Prefixed port name.
        port: String,
    },

    /// Assignment between expressions of different widths.
    #[error("width mismatch assigning {source_expr} ({source_width} bits) to {target} ({target_width} bits)")]
    WidthMismatch {
        /// Rendered target expression.
        target: String,
        /// Target width in bits.
        target_width: u32,
        /// Rendered source expression.
        source_expr: String,
        /// Source width in bits.
        source_width: u32,
    },

    /// An expression referring to bits outside its net.
    #[error("expression {expr} is out of bounds")]
    OutOfBounds {
        /// Rendered expression.
        expr: String,
    },

    /// An assignment whose target cannot be driven.
    #[error("cannot assign to {target}")]
    NotAssignable {
        /// Rendered target expression.
        target: String,
    },

    /// A second clock constraint on the same net.
    #[error("net '{net}' already carries a clock constraint")]
    DuplicateConstraint {
        /// Constrained net name.
        net: String,
    },

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for netlist operations.
pub type Result<T> = std::result::Result<T, NetlistError>;
