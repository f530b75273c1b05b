//! Port model for hard-core interface declarations.
//!
//! A [`PortDescriptor`] is one `(name, width, direction)` triple from the
//! processing system's port list. A [`PortSet`] keeps them in declaration
//! order with lookup by name.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Direction of a hard-core port, as seen from the hard core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven by programmable logic into the core.
    #[serde(rename = "input")]
    Input,
    /// Driven by the core.
    #[serde(rename = "output")]
    Output,
    /// Bidirectional pad-style port.
    #[serde(rename = "inout")]
    Bidirectional,
}

impl PortDirection {
    /// Parse a Verilog direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "inout" => Some(Self::Bidirectional),
            _ => None,
        }
    }

    /// The Verilog keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Bidirectional => "inout",
        }
    }

    /// The opposite direction. Bidirectional ports stay bidirectional.
    pub fn flip(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
            Self::Bidirectional => Self::Bidirectional,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single declared hard-core port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// Port name as declared (case preserved).
    pub name: String,
    /// Width in bits, always at least 1.
    pub width: u32,
    /// Declared direction.
    pub direction: PortDirection,
}

impl PortDescriptor {
    /// Create a port descriptor.
    pub fn new(name: impl Into<String>, width: u32, direction: PortDirection) -> Self {
        Self {
            name: name.into(),
            width,
            direction,
        }
    }

    /// Create an input port.
    pub fn input(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, width, PortDirection::Input)
    }

    /// Create an output port.
    pub fn output(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, width, PortDirection::Output)
    }

    /// Create a bidirectional port.
    pub fn inout(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, width, PortDirection::Bidirectional)
    }
}

impl fmt::Display for PortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width > 1 {
            write!(f, "{} [{}:0] {}", self.direction, self.width - 1, self.name)
        } else {
            write!(f, "{} {}", self.direction, self.name)
        }
    }
}

/// SHA-256 digest of a port set (lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortDigest(pub String);

impl PortDigest {
    /// Hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of ports with unique names.
///
/// Inserting a name that already exists replaces the stored descriptor in
/// place: the entry keeps its original position and takes the new width and
/// direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PortDescriptor>", into = "Vec<PortDescriptor>")]
pub struct PortSet {
    ports: Vec<PortDescriptor>,
    index: HashMap<String, usize>,
}

impl PortSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a port, returning the descriptor it replaced, if any.
    pub fn insert(&mut self, port: PortDescriptor) -> Option<PortDescriptor> {
        match self.index.get(&port.name) {
            Some(&pos) => Some(std::mem::replace(&mut self.ports[pos], port)),
            None => {
                self.index.insert(port.name.clone(), self.ports.len());
                self.ports.push(port);
                None
            }
        }
    }

    /// Look up a port by exact name.
    pub fn get(&self, name: &str) -> Option<&PortDescriptor> {
        self.index.get(name).map(|&pos| &self.ports[pos])
    }

    /// Whether a port with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate ports in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PortDescriptor> {
        self.ports.iter()
    }

    /// Ports whose name starts with `prefix`, in declaration order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a PortDescriptor> + 'a {
        self.ports.iter().filter(move |p| p.name.starts_with(prefix))
    }

    /// SHA-256 over the canonical rendering of every port, in order.
    pub fn digest(&self) -> PortDigest {
        let mut hasher = Sha256::new();
        for port in &self.ports {
            hasher.update(port.direction.keyword().as_bytes());
            hasher.update(b" ");
            hasher.update(port.width.to_string().as_bytes());
            hasher.update(b" ");
            hasher.update(port.name.as_bytes());
            hasher.update(b"\n");
        }
        let bytes = hasher.finalize();
        PortDigest(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }
}

impl From<Vec<PortDescriptor>> for PortSet {
    fn from(ports: Vec<PortDescriptor>) -> Self {
        ports.into_iter().collect()
    }
}

impl From<PortSet> for Vec<PortDescriptor> {
    fn from(set: PortSet) -> Self {
        set.ports
    }
}

impl FromIterator<PortDescriptor> for PortSet {
    fn from_iter<I: IntoIterator<Item = PortDescriptor>>(iter: I) -> Self {
        let mut set = PortSet::new();
        for port in iter {
            set.insert(port);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = &'a PortDescriptor;
    type IntoIter = std::slice::Iter<'a, PortDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
