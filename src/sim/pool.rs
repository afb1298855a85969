//! Keyed object pool
//!
//! Bodies are never dropped once registered; a kind's slot list only grows.
//! Callers try [`Pool::recycle`] first and only allocate when it comes back
//! empty.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pool keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoolKind {
    Enemies,
    Lasers,
    Asteroids,
}

impl PoolKind {
    pub const ALL: [PoolKind; 3] = [PoolKind::Enemies, PoolKind::Lasers, PoolKind::Asteroids];
}

/// Stable handle to a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: PoolKind,
    pub slot: usize,
}

/// Anything the pool can hand out again
pub trait Poolable {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

#[derive(Debug, Clone)]
pub struct Pool<E> {
    entries: HashMap<PoolKind, Vec<E>>,
}

impl<E> Default for Pool<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: Poolable> Pool<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly constructed entity under `kind`, inactive
    pub fn register(&mut self, kind: PoolKind, mut entity: E) -> EntityId {
        entity.set_active(false);
        let slots = self.entries.entry(kind).or_default();
        slots.push(entity);
        let id = EntityId {
            kind,
            slot: slots.len() - 1,
        };
        log::debug!("pool {:?} grew to {}", kind, slots.len());
        id
    }

    /// Hand out the first inactive entity of `kind`, marking it active
    pub fn recycle(&mut self, kind: PoolKind) -> Option<EntityId> {
        let slots = self.entries.get_mut(&kind)?;
        let slot = slots.iter().position(|e| !e.is_active())?;
        slots[slot].set_active(true);
        Some(EntityId { kind, slot })
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entries.get(&id.kind)?.get(id.slot)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.entries.get_mut(&id.kind)?.get_mut(id.slot)
    }

    /// Entities of `kind` in slot order
    pub fn slice(&self, kind: PoolKind) -> &[E] {
        match self.entries.get(&kind) {
            Some(slots) => slots,
            None => &[],
        }
    }

    pub fn slice_mut(&mut self, kind: PoolKind) -> &mut [E] {
        match self.entries.get_mut(&kind) {
            Some(slots) => slots,
            None => &mut [],
        }
    }

    pub fn iter(&self, kind: PoolKind) -> std::slice::Iter<'_, E> {
        self.slice(kind).iter()
    }

    pub fn ids(&self, kind: PoolKind) -> Vec<EntityId> {
        (0..self.len(kind))
            .map(|slot| EntityId { kind, slot })
            .collect()
    }

    pub fn len(&self, kind: PoolKind) -> usize {
        self.slice(kind).len()
    }

    pub fn is_empty(&self, kind: PoolKind) -> bool {
        self.len(kind) == 0
    }

    pub fn active_count(&self, kind: PoolKind) -> usize {
        self.slice(kind).iter().filter(|e| e.is_active()).count()
    }
}
