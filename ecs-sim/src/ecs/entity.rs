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
//! Entity management
//!
//! Entities are plain identifiers. They own no storage themselves; an entity
//! exists in storage only through the `owner` tag of the component slots it
//! has claimed.

use std::fmt;

/// Unique identifier for an entity
///
/// The raw value `0` is reserved as [`EntityId::INVALID`] and marks a free
/// component slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(u64);

impl EntityId {
    /// The reserved "no owner" identifier
    pub const INVALID: EntityId = EntityId(0);

    /// Create a new EntityId from a raw u64 value
    pub const fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Whether this is a real entity rather than the free-slot marker
    pub fn is_valid(&self) -> bool {
        *self != EntityId::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Monotonic entity identifier allocator
///
/// Identifiers start at 1 and are never reused. The registry enforces no
/// upper bound; the practical ceiling is component storage capacity.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    next: u64,
}

impl EntityRegistry {
    /// Create a registry whose first identifier is 1
    pub fn new() -> Self {
        EntityRegistry { next: 1 }
    }

    /// Allocate the next unused identifier
    pub fn new_entity(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }

    /// Whether `id` was handed out by this registry
    pub fn was_issued(&self, id: EntityId) -> bool {
        id.is_valid() && id.0 < self.next
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
