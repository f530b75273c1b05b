//! The elaboration interface and a recording implementation.
//!
//! Generators describe structure through [`Elaborator`]; [`Netlist`] keeps
//! everything it is given so the result can be inspected, rendered as text
//! or written out as JSON.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NetlistError, Result};
use crate::instance::Instance;
use crate::net::{Expr, Net};

/// Sink for structural hardware description.
pub trait Elaborator {
    /// Continuously drive `target` from `source`.
    fn assign(&mut self, target: Expr, source: Expr) -> Result<()>;

    /// Add a primitive instantiation.
    fn instantiate(&mut self, instance: Instance) -> Result<()>;

    /// Declare `net` as a clock running at `frequency_hz`.
    fn add_clock_constraint(&mut self, net: &Net, frequency_hz: f64) -> Result<()>;
}

/// A continuous assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: Expr,
    pub source: Expr,
}

/// Timing constraint on a clock net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockConstraint {
    pub net: String,
    pub frequency_hz: f64,
}

impl ClockConstraint {
    /// Clock period in nanoseconds.
    pub fn period_ns(&self) -> f64 {
        1e9 / self.frequency_hz
    }
}

/// Recording [`Elaborator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub constraints: Vec<ClockConstraint>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance by name.
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Instances of a given primitive, in insertion order.
    pub fn instances_of<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a Instance> + 'a {
        self.instances.iter().filter(move |i| i.module == module)
    }

    /// The source driving `target`, if it was assigned.
    pub fn driver_of(&self, target: &Expr) -> Option<&Expr> {
        self.assignments
            .iter()
            .find(|a| &a.target == target)
            .map(|a| &a.source)
    }

    /// Frequency constraint recorded for a net name.
    pub fn clock_constraint(&self, net: &str) -> Option<&ClockConstraint> {
        self.constraints.iter().find(|c| c.net == net)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON produced by [`Netlist::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn check_bounds(expr: &Expr) -> Result<()> {
    if expr.in_bounds() {
        Ok(())
    } else {
        Err(NetlistError::OutOfBounds {
            expr: expr.to_string(),
        })
    }
}

impl Elaborator for Netlist {
    fn assign(&mut self, target: Expr, source: Expr) -> Result<()> {
        if !target.is_assignable() {
            return Err(NetlistError::NotAssignable {
                target: target.to_string(),
            });
        }
        check_bounds(&target)?;
        check_bounds(&source)?;
        if target.width() != source.width() {
            return Err(NetlistError::WidthMismatch {
                target: target.to_string(),
                target_width: target.width(),
                source_expr: source.to_string(),
                source_width: source.width(),
            });
        }
        self.assignments.push(Assignment { target, source });
        Ok(())
    }

    fn instantiate(&mut self, instance: Instance) -> Result<()> {
        if self.instance(&instance.name).is_some() {
            return Err(NetlistError::DuplicateInstance {
                name: instance.name,
            });
        }
        let mut seen = HashSet::new();
        for binding in &instance.ports {
            if !seen.insert(binding.port.as_str()) {
                return Err(NetlistError::DuplicatePortBinding {
                    instance: instance.name.clone(),
                    port: binding.port.clone(),
                });
            }
            check_bounds(&binding.expr)?;
        }
        self.instances.push(instance);
        Ok(())
    }

    fn add_clock_constraint(&mut self, net: &Net, frequency_hz: f64) -> Result<()> {
        if self.clock_constraint(&net.name).is_some() {
            return Err(NetlistError::DuplicateConstraint {
                net: net.name.clone(),
            });
        }
        self.constraints.push(ClockConstraint {
            net: net.name.clone(),
            frequency_hz,
        });
        Ok(())
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instance in &self.instances {
            write!(f, "{instance}")?;
        }
        if !self.assignments.is_empty() {
            writeln!(f, "assignments:")?;
            for a in &self.assignments {
                writeln!(f, "  {} <= {}", a.target, a.source)?;
            }
        }
        if !self.constraints.is_empty() {
            writeln!(f, "clocks:")?;
            for c in &self.constraints {
                writeln!(
                    f,
                    "  {}: {:.3} MHz ({:.3} ns)",
                    c.net,
                    c.frequency_hz / 1e6,
                    c.period_ns()
                )?;
            }
        }
        Ok(())
    }
}
