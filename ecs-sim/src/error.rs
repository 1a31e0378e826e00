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
//! Error types
//!
//! Nothing here crosses the thread boundary while the physics thread runs;
//! the background loop reports through flags and counters, and its errors
//! only surface when it is joined.

use crate::ecs::{ComponentKind, EntityId};
use crate::ecs::scheduler::ThreadState;
use thiserror::Error;

/// Errors raised by component storage
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// Storage was used before `init` allocated it
    #[error("{kind} storage used before init")]
    NotInitialized {
        /// Kind whose array was accessed
        kind: ComponentKind,
    },

    /// Every slot of the array is owned
    #[error("{kind} storage full: capacity {capacity}")]
    CapacityExceeded {
        /// Kind whose array is full
        kind: ComponentKind,
        /// Fixed capacity of the array
        capacity: usize,
    },

    /// The free-slot marker was used where a real entity is required
    #[error("cannot attach a {kind} component to the invalid entity")]
    InvalidEntity {
        /// Kind that was requested
        kind: ComponentKind,
    },

    /// The entity owns no component of this kind
    #[error("{entity} has no {kind} component")]
    ComponentNotFound {
        /// Kind that was looked up
        kind: ComponentKind,
        /// Entity that was looked up
        entity: EntityId,
    },
}

/// Result alias for storage operations
pub type EcsResult<T> = Result<T, EcsError>;

/// Errors raised by the background simulation thread
#[derive(Error, Debug)]
pub enum SimError {
    /// The OS refused to create the thread
    #[error("failed to spawn physics thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The thread panicked before it could be joined
    #[error("physics thread panicked")]
    ThreadPanicked,

    /// A lifecycle call was made in the wrong state
    #[error("physics thread is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// State the call requires
        expected: ThreadState,
        /// State the thread was in
        actual: ThreadState,
    },
}

/// Errors raised when validating a [`SimConfig`](crate::config::SimConfig)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Component capacity must be at least one
    #[error("max_components must be greater than zero")]
    ZeroCapacity,

    /// Step rate must be at least one per second
    #[error("steps_per_second must be greater than zero")]
    ZeroStepRate,

    /// More entities allowed than component slots exist
    #[error("entity ceiling {ceiling} exceeds component capacity {capacity}")]
    CeilingAboveCapacity {
        /// Configured entity ceiling
        ceiling: usize,
        /// Configured component capacity
        capacity: usize,
    },

    /// Window must have a non-zero area
    #[error("window size {width}x{height} is empty")]
    EmptyWindow {
        /// Configured width
        width: u32,
        /// Configured height
        height: u32,
    },
}
