// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An offset into one of the owning [`super::Profile`]'s entity sequences.
/// The type parameter only says which sequence; a slot never owns anything.
pub struct Slot<T> {
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slot<T> {
    #[inline]
    pub(crate) const fn new(offset: usize) -> Self {
        Self {
            offset,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn offset(self) -> usize {
        self.offset
    }
}

// The derives would require `T` to implement these traits too.
impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T> Eq for Slot<T> {}

impl<T> Hash for Slot<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state)
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.offset).finish()
    }
}

/// A link from one entity to another by id. When the id had no backing entity
/// the link stays usable as an explicit unresolved marker that remembers the
/// id it was looking for.
pub enum Ref<T> {
    Resolved(Slot<T>),
    Unresolved { id: u64 },
}

impl<T> Ref<T> {
    #[inline]
    pub fn slot(self) -> Option<Slot<T>> {
        match self {
            Ref::Resolved(slot) => Some(slot),
            Ref::Unresolved { .. } => None,
        }
    }

    #[inline]
    pub fn is_resolved(self) -> bool {
        matches!(self, Ref::Resolved(_))
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ref::Resolved(a), Ref::Resolved(b)) => a == b,
            (Ref::Unresolved { id: a }, Ref::Unresolved { id: b }) => a == b,
            _ => false,
        }
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Ref::Resolved(slot) => {
                0u8.hash(state);
                slot.hash(state);
            }
            Ref::Unresolved { id } => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::Resolved(slot) => f.debug_tuple("Resolved").field(slot).finish(),
            Ref::Unresolved { id } => f.debug_struct("Unresolved").field("id", id).finish(),
        }
    }
}

/// Lookup table from a nonzero id to its slot, built once per id space. When
/// an id is used more than once the first entity wins; the duplicate itself
/// is the validator's business. Zero is never a valid id, so it never
/// resolves.
pub(crate) struct IdSpace<T> {
    slots: FxHashMap<u64, Slot<T>>,
}

impl<T> IdSpace<T> {
    pub(crate) fn build(ids: impl ExactSizeIterator<Item = u64>) -> Self {
        let mut slots = FxHashMap::default();
        slots.reserve(ids.len());
        for (offset, id) in ids.enumerate() {
            if id != 0 {
                slots.entry(id).or_insert(Slot::new(offset));
            }
        }
        Self { slots }
    }

    #[inline]
    pub(crate) fn get(&self, id: u64) -> Option<Slot<T>> {
        self.slots.get(&id).copied()
    }

    #[inline]
    pub(crate) fn lookup(&self, id: u64) -> Ref<T> {
        match self.get(id) {
            Some(slot) => Ref::Resolved(slot),
            None => Ref::Unresolved { id },
        }
    }
}

impl<T> Clone for IdSpace<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<T> PartialEq for IdSpace<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<T> Eq for IdSpace<T> {}

impl<T> fmt::Debug for IdSpace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slots.iter()).finish()
    }
}
