// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage and management
//!
//! Every component kind lives in its own contiguous, fixed-capacity array.
//! A slot is live when its `owner` tag names an entity and free when the
//! tag is [`EntityId::INVALID`]; there is no free-list and no generation
//! counter. The tags are the only record of occupancy: live counts are
//! read from them, never kept alongside. Arrays never grow and never compact.
//!
//! # Memory Layout
//!
//! ```text
//! positions:  [P(owner=1), P(owner=2), P(free), P(free), ...]  // capacity slots
//! displays:   [D(owner=1), D(owner=2), D(free), D(free), ...]
//! ```
//!
//! Slot search goes through a [`SlotAllocator`], so the linear scan used
//! here can be replaced by a free-list or generational index without
//! touching the systems.

use crate::ecs::EntityId;
use crate::error::{EcsError, EcsResult};
use std::fmt;

/// The closed set of component kinds the store knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`Position`](crate::ecs::components::Position)
    Position,
    /// [`Display`](crate::ecs::components::Display)
    Display,
    /// [`RigidBody`](crate::ecs::components::RigidBody)
    RigidBody,
    /// [`CircleCollider`](crate::ecs::components::CircleCollider)
    CircleCollider,
}

impl ComponentKind {
    /// All kinds, in storage order
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Position,
        ComponentKind::Display,
        ComponentKind::RigidBody,
        ComponentKind::CircleCollider,
    ];
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Position => "Position",
            ComponentKind::Display => "Display",
            ComponentKind::RigidBody => "RigidBody",
            ComponentKind::CircleCollider => "CircleCollider",
        };
        f.write_str(name)
    }
}

/// Trait that all components must implement
///
/// Components are plain, fixed-size records tagged with the entity that owns
/// them. `Default` must produce a free slot (owner [`EntityId::INVALID`]).
pub trait Component: Copy + Default + PartialEq + Send + Sync + 'static {
    /// Which array this component lives in
    const KIND: ComponentKind;

    /// The owning entity, or [`EntityId::INVALID`] for a free slot
    fn owner(&self) -> EntityId;

    /// Stamp a new owner on this slot
    fn set_owner(&mut self, owner: EntityId);

    /// Whether this slot is unowned
    fn is_free(&self) -> bool {
        !self.owner().is_valid()
    }
}

/// Strategy for locating slots inside a component array
///
/// Lookup and allocation are the same question ("which slot carries this
/// owner tag?"), allocation just asks it for [`EntityId::INVALID`].
pub trait SlotAllocator: Default + Send + Sync {
    /// Index of the first slot owned by `owner`
    fn find<T: Component>(&self, slots: &[T], owner: EntityId) -> Option<usize>;

    /// Index of a free slot to claim, if any
    fn claim<T: Component>(&mut self, slots: &[T]) -> Option<usize> {
        self.find(slots, EntityId::INVALID)
    }
}

/// First-match linear scan over the owner tags
///
/// O(capacity) per call. Fine for hundreds to low thousands of entities;
/// beyond that, swap in another [`SlotAllocator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearScan;

impl SlotAllocator for LinearScan {
    fn find<T: Component>(&self, slots: &[T], owner: EntityId) -> Option<usize> {
        slots.iter().position(|slot| slot.owner() == owner)
    }
}

/// Fixed-capacity array of one component kind
///
/// An array starts uninitialized (no slots); every accessor reports
/// [`EcsError::NotInitialized`] until [`ComponentArray::init`] runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentArray<T: Component, A: SlotAllocator = LinearScan> {
    slots: Vec<T>,
    initialized: bool,
    allocator: A,
}

impl<T: Component, A: SlotAllocator> ComponentArray<T, A> {
    /// Create an uninitialized array
    pub fn new() -> Self {
        ComponentArray {
            slots: Vec::new(),
            initialized: false,
            allocator: A::default(),
        }
    }

    /// Create an array with `capacity` free slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        array.init(capacity);
        array
    }

    /// Allocate `capacity` free slots
    ///
    /// Returns `false` without touching anything if already initialized.
    pub fn init(&mut self, capacity: usize) -> bool {
        if self.initialized {
            return false;
        }
        self.slots = vec![T::default(); capacity];
        self.initialized = true;
        true
    }

    /// Whether `init` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Fixed number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of owned slots
    ///
    /// Equals the number of successful [`create`](Self::create) calls unless
    /// a caller overwrote a claimed slot with a free one.
    pub fn len(&self) -> usize {
        live_count(&self.slots)
    }

    /// Check if no slot is owned
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_free())
    }

    /// Number of slots that can still be claimed
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }

    fn check_init(&self) -> EcsResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(EcsError::NotInitialized { kind: T::KIND })
        }
    }

    /// Claim the first free slot for `entity`
    ///
    /// The slot keeps whatever field values it held; callers fill it in
    /// through the returned handle. A full array is left unchanged.
    pub fn create(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        self.check_init()?;
        if !entity.is_valid() {
            return Err(EcsError::InvalidEntity { kind: T::KIND });
        }

        let index = self
            .allocator
            .claim(&self.slots)
            .ok_or(EcsError::CapacityExceeded {
                kind: T::KIND,
                capacity: self.slots.len(),
            })?;

        let slot = &mut self.slots[index];
        slot.set_owner(entity);
        Ok(slot)
    }

    /// Index of the first slot owned by `entity`
    pub fn index_of(&self, entity: EntityId) -> EcsResult<usize> {
        self.check_init()?;
        let not_found = EcsError::ComponentNotFound {
            kind: T::KIND,
            entity,
        };
        if !entity.is_valid() {
            return Err(not_found);
        }
        self.allocator.find(&self.slots, entity).ok_or(not_found)
    }

    /// The first component owned by `entity`
    pub fn get(&self, entity: EntityId) -> EcsResult<&T> {
        let index = self.index_of(entity)?;
        Ok(&self.slots[index])
    }

    /// The first component owned by `entity`, mutably
    pub fn get_mut(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        let index = self.index_of(entity)?;
        Ok(&mut self.slots[index])
    }

    /// Slot at `index`, owned or free
    pub fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    /// Slot at `index`, owned or free, mutably
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Bulk view for systems
    pub fn view(&self) -> EcsResult<ComponentSlice<'_, T>> {
        self.check_init()?;
        Ok(ComponentSlice {
            live: live_count(&self.slots),
            slots: &self.slots,
        })
    }
}

fn live_count<T: Component>(slots: &[T]) -> usize {
    slots.iter().filter(|slot| !slot.is_free()).count()
}

impl<T: Component, A: SlotAllocator> Default for ComponentArray<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view over a component array
///
/// `len` is the live count; the backing slice always spans the full
/// capacity, free slots included.
#[derive(Debug, Clone, Copy)]
pub struct ComponentSlice<'a, T: Component> {
    live: usize,
    slots: &'a [T],
}

impl<'a, T: Component> ComponentSlice<'a, T> {
    /// Number of live components of this kind
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if no component of this kind is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Fixed capacity of the backing array
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The full backing array
    pub fn slots(&self) -> &'a [T] {
        self.slots
    }

    /// Owned slots only, in array order
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.slots.iter().filter(|slot| !slot.is_free())
    }

    /// Owned slots with their indices, in array order
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_free())
    }
}
