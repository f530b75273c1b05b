//! Resource usage report.

use std::fmt;

use crate::pool::SlotPool;

/// Usage of a single pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolUsage {
    /// Pool name (e.g. "clocks", "irqs").
    pub name: &'static str,
    /// Bound slots, rendered.
    pub bound: Vec<String>,
    /// Number of slots in the pool.
    pub capacity: u32,
}

impl PoolUsage {
    pub(crate) fn of<T>(name: &'static str, pool: &SlotPool<T>) -> Self {
        let ids = pool.ids();
        Self {
            name,
            bound: pool
                .bound()
                .map(|(i, _)| ids[i as usize].to_string())
                .collect(),
            capacity: pool.capacity(),
        }
    }

    pub fn free(&self) -> u32 {
        self.capacity - self.bound.len() as u32
    }
}

impl fmt::Display for PoolUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}/{} bound", self.name, self.bound.len(), self.capacity)?;
        if !self.bound.is_empty() {
            write!(f, " ({})", self.bound.join(", "))?;
        }
        Ok(())
    }
}

/// Bound and free slots of every pool of one resource manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// Core profile name.
    pub core: String,
    pub pools: Vec<PoolUsage>,
}

impl ResourceReport {
    pub fn pool(&self, name: &str) -> Option<&PoolUsage> {
        self.pools.iter().find(|p| p.name == name)
    }

    pub fn total_bound(&self) -> u32 {
        self.pools.iter().map(|p| p.bound.len() as u32).sum()
    }
}

impl fmt::Display for ResourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Resource Report ({}) ===", self.core)?;
        for pool in &self.pools {
            writeln!(f, "  {pool}")?;
        }
        Ok(())
    }
}
