//! Per-owner instance storage addressed by opaque tokens.
//!
//! A host layer that hands instances (schemas, assemblers, caches) across a
//! handle-based boundary keeps them here and passes out the token. Each
//! arena is owned by its host, so independent hosts share no state.

use std::collections::HashMap;

use crate::error::{RecordError, Result};

/// Opaque handle to an instance in an [`InstanceArena`]. Tokens are never
/// reused within one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceToken(u64);

impl InstanceToken {
    /// Raw value, for passing through integer-only interfaces.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Rebuilds a token from its raw value. Lookups with a value the arena
    /// never issued fail with `InvalidToken`.
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug)]
pub struct InstanceArena<T> {
    instances: HashMap<InstanceToken, T>,
    next_id: u64,
}

impl<T> InstanceArena<T> {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            next_id: 1,
        }
    }

    /// Stores `instance` and returns its token.
    pub fn insert(&mut self, instance: T) -> InstanceToken {
        let token = InstanceToken(self.next_id);
        self.next_id += 1;
        self.instances.insert(token, instance);
        token
    }

    pub fn get(&self, token: InstanceToken) -> Result<&T> {
        self.instances
            .get(&token)
            .ok_or(RecordError::InvalidToken(token.0))
    }

    pub fn get_mut(&mut self, token: InstanceToken) -> Result<&mut T> {
        self.instances
            .get_mut(&token)
            .ok_or(RecordError::InvalidToken(token.0))
    }

    /// Removes and returns the instance. The token is dead afterwards.
    pub fn remove(&mut self, token: InstanceToken) -> Result<T> {
        self.instances
            .remove(&token)
            .ok_or(RecordError::InvalidToken(token.0))
    }

    pub fn contains(&self, token: InstanceToken) -> bool {
        self.instances.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<T> Default for InstanceArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
