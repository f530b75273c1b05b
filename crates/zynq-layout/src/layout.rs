//! Interface layouts and their generation from a parsed port set.
//!
//! A layout is the ordered field table of one bus interface. Layouts
//! derived from the hard core keep the core's own port directions; the
//! field widths that depend on bus configuration are symbolic.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zynq_ports::{PortDirection, PortSet};

use crate::channel::{ChannelClass, Role};
use crate::error::{LayoutError, Result};
use crate::width::{WidthExpr, WidthParams};

/// One field of an interface layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name with the channel prefix removed (e.g. `AWADDR`).
    pub name: String,
    /// Symbolic or literal width.
    pub width: WidthExpr,
    /// Direction from the point of view of the layout's role.
    pub direction: PortDirection,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, width: WidthExpr, direction: PortDirection) -> Self {
        Self {
            name: name.into(),
            width,
            direction,
        }
    }
}

/// Ordered field table of one bus interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceLayout {
    class: ChannelClass,
    role: Role,
    params: WidthParams,
    fields: Vec<FieldDescriptor>,
}

impl InterfaceLayout {
    /// Build a layout, checking field-name uniqueness and parameter ranges.
    pub fn new(
        class: ChannelClass,
        role: Role,
        params: WidthParams,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        params.validate()?;
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(LayoutError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self {
            class,
            role,
            params,
            fields,
        })
    }

    /// Re-run construction checks, e.g. after deserialization.
    pub fn validated(self) -> Result<Self> {
        Self::new(self.class, self.role, self.params, self.fields)
    }

    pub fn class(&self) -> ChannelClass {
        self.class
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Concrete values the symbolic widths resolve against.
    pub fn params(&self) -> &WidthParams {
        &self.params
    }

    /// Fields in layout order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolved width of a named field.
    pub fn resolved_width(&self, name: &str) -> Result<u32> {
        let field = self.field(name).ok_or_else(|| LayoutError::UnknownField {
            field: name.to_string(),
        })?;
        field.width.resolve(&self.params)
    }

    /// The same interface seen from the other end: every direction is
    /// reversed and the role toggled.
    pub fn flipped(&self) -> Self {
        Self {
            class: self.class,
            role: self.role.opposite(),
            params: self.params,
            fields: self
                .fields
                .iter()
                .map(|f| FieldDescriptor::new(f.name.clone(), f.width, f.direction.flip()))
                .collect(),
        }
    }

    /// A copy without the named fields.
    pub fn without(&self, excluded: &BTreeSet<String>) -> Self {
        Self {
            class: self.class,
            role: self.role,
            params: self.params,
            fields: self
                .fields
                .iter()
                .filter(|f| !excluded.contains(&f.name))
                .cloned()
                .collect(),
        }
    }
}

/// Width class of a field name, or `None` when the parsed literal width is
/// kept. Later rules win: `DATA`, then `ADDR`, then `STRB`, then `ID`
/// (unless the name also contains `VALID`).
pub fn classify_field(field: &str) -> Option<WidthExpr> {
    let mut class = None;
    if field.contains("DATA") {
        class = Some(WidthExpr::DataWidth);
    }
    if field.contains("ADDR") {
        class = Some(WidthExpr::AddrWidth);
    }
    if field.contains("STRB") {
        class = Some(WidthExpr::DataWidthOverEight);
    }
    if field.contains("ID") && !field.contains("VALID") {
        class = Some(WidthExpr::IdWidth);
    }
    class
}

/// A field as found in the port list, before parameter resolution.
struct RawField {
    name: String,
    parsed_width: u32,
    width: WidthExpr,
    direction: PortDirection,
}

/// Generate the layout of the bus instance whose ports start with `prefix`.
///
/// Unset entries of `overrides` default to the parsed widths of the
/// instance's own `WDATA`, `AWADDR` and `AWID` ports, falling back to the
/// first field of the same width class.
pub fn generate_channel_layout(
    ports: &PortSet,
    prefix: &str,
    class: ChannelClass,
    overrides: WidthParams,
) -> Result<InterfaceLayout> {
    if class == ChannelClass::Lite {
        return Err(LayoutError::FixedShapeClass { class });
    }
    overrides.validate()?;

    let raw: Vec<RawField> = ports
        .with_prefix(prefix)
        .filter(|p| p.name.len() > prefix.len())
        .map(|p| {
            let name = p.name[prefix.len()..].to_string();
            let width = classify_field(&name).unwrap_or(WidthExpr::Literal(p.width));
            RawField {
                name,
                parsed_width: p.width,
                width,
                direction: p.direction,
            }
        })
        .collect();

    if raw.is_empty() {
        return Err(LayoutError::UnknownPrefix {
            prefix: prefix.to_string(),
        });
    }

    let defaults = WidthParams {
        data_width: default_width(&raw, "WDATA", WidthExpr::DataWidth),
        addr_width: default_width(&raw, "AWADDR", WidthExpr::AddrWidth),
        id_width: default_width(&raw, "AWID", WidthExpr::IdWidth),
    };
    let params = overrides.or(defaults);

    debug!(
        prefix,
        %class,
        fields = raw.len(),
        ?params,
        "generated channel layout"
    );

    let fields = raw
        .into_iter()
        .map(|f| FieldDescriptor::new(f.name, f.width, f.direction))
        .collect();
    InterfaceLayout::new(class, class.role(), params, fields)
}

fn default_width(raw: &[RawField], canonical: &str, class: WidthExpr) -> Option<u32> {
    raw.iter()
        .find(|f| f.name == canonical)
        .or_else(|| raw.iter().find(|f| f.width == class))
        .map(|f| f.parsed_width)
}
