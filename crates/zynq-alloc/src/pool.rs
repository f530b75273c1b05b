//! Fixed-size pools of single-use slots.

use crate::error::{AllocError, Result, SlotId};

/// State of one slot. A slot moves from `Free` to `Bound` at most once.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    Free,
    Bound(T),
}

/// A pool of slots, each identified by a [`SlotId`].
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    ids: Vec<SlotId>,
    states: Vec<SlotState<T>>,
    numbered: fn(u32) -> SlotId,
}

impl<T> SlotPool<T> {
    /// `capacity` slots with ids `make(0) .. make(capacity - 1)`.
    pub fn numbered(capacity: u32, make: fn(u32) -> SlotId) -> Self {
        Self {
            ids: (0..capacity).map(make).collect(),
            states: (0..capacity).map(|_| SlotState::Free).collect(),
            numbered: make,
        }
    }

    /// One channel slot per name.
    pub fn named<I: IntoIterator<Item = String>>(names: I) -> Self {
        let ids: Vec<SlotId> = names.into_iter().map(SlotId::Channel).collect();
        let states = ids.iter().map(|_| SlotState::Free).collect();
        Self {
            ids,
            states,
            numbered: |n| SlotId::Channel(format!("#{n}")),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.states.len() as u32
    }

    /// Id of the slot at `index`, even when out of range.
    pub fn id(&self, index: u32) -> SlotId {
        self.ids
            .get(index as usize)
            .cloned()
            .unwrap_or_else(|| (self.numbered)(index))
    }

    /// Fail unless `index` names a free slot. Never mutates the pool.
    pub fn check_free(&self, index: u32) -> Result<()> {
        match self.states.get(index as usize) {
            None => Err(AllocError::OutOfRange {
                slot: self.id(index),
                capacity: self.capacity(),
            }),
            Some(SlotState::Bound(_)) => Err(AllocError::SlotTaken {
                slot: self.id(index),
            }),
            Some(SlotState::Free) => Ok(()),
        }
    }

    /// Bind a free slot to `payload`.
    pub fn bind(&mut self, index: u32, payload: T) -> Result<()> {
        self.check_free(index)?;
        self.states[index as usize] = SlotState::Bound(payload);
        Ok(())
    }

    /// Payload of a bound slot.
    pub fn get(&self, index: u32) -> Option<&T> {
        match self.states.get(index as usize) {
            Some(SlotState::Bound(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn is_bound(&self, index: u32) -> bool {
        self.get(index).is_some()
    }

    /// Bound slots in index order.
    pub fn bound(&self) -> impl Iterator<Item = (u32, &T)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, state)| match state {
                SlotState::Bound(payload) => Some((i as u32, payload)),
                SlotState::Free => None,
            })
    }

    /// Consume the pool, yielding bound payloads in index order.
    pub fn into_bound(self) -> impl Iterator<Item = (u32, T)> {
        self.states
            .into_iter()
            .enumerate()
            .filter_map(|(i, state)| match state {
                SlotState::Bound(payload) => Some((i as u32, payload)),
                SlotState::Free => None,
            })
    }

    pub fn bound_count(&self) -> u32 {
        self.bound().count() as u32
    }

    /// Ids of all slots, in index order.
    pub fn ids(&self) -> &[SlotId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_once() {
        let mut pool = SlotPool::numbered(4, SlotId::Clock);
        pool.bind(2, 100.0).unwrap();
        let err = pool.bind(2, 50.0).unwrap_err();
        assert!(matches!(err, AllocError::SlotTaken { slot: SlotId::Clock(2) }));
        assert_eq!(pool.get(2), Some(&100.0));
        assert_eq!(pool.bound_count(), 1);
    }

    #[test]
    fn out_of_range_leaves_pool_untouched() {
        let mut pool: SlotPool<()> = SlotPool::numbered(16, SlotId::Irq);
        let err = pool.bind(16, ()).unwrap_err();
        assert!(matches!(
            err,
            AllocError::OutOfRange {
                slot: SlotId::Irq(16),
                capacity: 16
            }
        ));
        assert_eq!(pool.bound_count(), 0);
    }

    #[test]
    fn named_pool() {
        let mut pool = SlotPool::named(["MAXIGP0".to_string(), "SAXIGP0".to_string()]);
        pool.bind(1, ()).unwrap();
        assert!(pool.is_bound(1));
        assert_eq!(pool.id(1), SlotId::Channel("SAXIGP0".into()));
        let bound: Vec<_> = pool.into_bound().map(|(i, _)| i).collect();
        assert_eq!(bound, vec![1]);
    }
}
