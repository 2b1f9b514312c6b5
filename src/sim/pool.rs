//! Fixed-capacity object pool for short-lived entities
//!
//! Entities are allocated once and then shuttle between an inactive free
//! stack and the active list. Nothing is created or dropped after
//! construction unless the pool runs under `PoolPolicy::Grow`.

use crate::error::SimError;
use crate::settings::PoolPolicy;

/// An entity that can be recycled by a [`Pool`]
pub trait Poolable: Default {
    /// Parameters describing a fresh spawn
    type Spawn;

    /// Overwrite every piece of mutable state from the spawn parameters
    fn init(&mut self, spawn: Self::Spawn);
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    name: &'static str,
    active: Vec<T>,
    inactive: Vec<T>,
    policy: PoolPolicy,
}

impl<T: Poolable> Pool<T> {
    /// Pre-allocate `capacity` inactive entities
    pub fn new(name: &'static str, capacity: usize, policy: PoolPolicy) -> Self {
        let inactive = (0..capacity).map(|_| T::default()).collect();
        Self {
            name,
            active: Vec::with_capacity(capacity),
            inactive,
            policy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Total entities owned (active + inactive)
    pub fn capacity(&self) -> usize {
        self.active.len() + self.inactive.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    pub fn active(&self) -> &[T] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [T] {
        &mut self.active
    }

    /// Take the most recently released entity, initialise it and make it
    /// active
    pub fn acquire(&mut self, spawn: T::Spawn) -> Result<&mut T, SimError> {
        let mut entity = match self.inactive.pop() {
            Some(entity) => entity,
            None => match self.policy {
                PoolPolicy::Reject => {
                    return Err(SimError::PoolExhausted {
                        pool: self.name,
                        capacity: self.capacity(),
                    });
                }
                PoolPolicy::Grow => {
                    log::debug!("{} pool growing to {}", self.name, self.capacity() + 1);
                    T::default()
                }
            },
        };
        entity.init(spawn);
        self.active.push(entity);
        let last = self.active.len() - 1;
        Ok(&mut self.active[last])
    }

    /// Return the active entities at `marked` to the free stack.
    ///
    /// Indices refer to the active list as it was when they were collected;
    /// duplicates and stale indices are ignored. Order of the survivors is
    /// preserved.
    pub fn release_marked(&mut self, marked: &[usize]) -> usize {
        if marked.is_empty() {
            return 0;
        }
        let mut marked = marked.to_vec();
        marked.sort_unstable();
        marked.dedup();

        let mut released = 0;
        for &i in marked.iter().rev() {
            if i < self.active.len() {
                let entity = self.active.remove(i);
                self.inactive.push(entity);
                released += 1;
            }
        }
        log::debug!(
            "{} pool released {} ({} active / {} free)",
            self.name,
            released,
            self.active.len(),
            self.inactive.len()
        );
        released
    }

    /// Collect every active entity matching `expired`, then release them in
    /// one pass
    pub fn release_where(&mut self, mut expired: impl FnMut(&T) -> bool) -> usize {
        let marked: Vec<usize> = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, e)| expired(e))
            .map(|(i, _)| i)
            .collect();
        self.release_marked(&marked)
    }

    /// Deactivate everything
    pub fn reset(&mut self) {
        self.inactive.append(&mut self.active);
    }
}
