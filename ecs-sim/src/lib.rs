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
//! # ECS Sim
//!
//! A small entity-component-system with a fixed-step physics thread and a
//! foreground render loop contending for the same component storage.
//!
//! ## Features
//!
//! - **Fixed-capacity storage**: one contiguous array per component kind,
//!   slots claimed by owner tag
//! - **Bouncing-ball physics**: gravity, drag, integration and boundary
//!   reflection at 60 steps per second on a background thread
//! - **Explicit shared context**: one [`SharedWorld`] lock guards all storage
//! - **Staged growth**: timed batches of randomized entities
//! - **Parallelization**: optional Rayon join resolution in the physics step
//!
//! ## Example
//!
//! ```rust
//! use ecs_sim::ecs::components::{Position, RigidBody};
//! use ecs_sim::ecs::World;
//! use ecs_sim::math::Vec2;
//!
//! let mut world = World::with_capacity(16);
//! let entity = world.new_entity();
//!
//! let store = world.components_mut();
//! store.attach(entity, Position::new(10.0, 10.0)).unwrap();
//! store.attach(entity, RigidBody::new(1.0, Vec2::new(5.0, 0.0))).unwrap();
//! assert_eq!(store.component_array::<Position>().unwrap().len(), 1);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Foreground loop driving rendering, timers and shutdown
pub mod app;

/// Simulation configuration
pub mod config;

/// Error types
pub mod error;

/// 2D vector math
pub mod math;

/// Rendering collaborator interface
pub mod render;

/// Randomized entity creation and staged growth
pub mod spawn;

/// One-shot timers and time measurement
pub mod timer;

pub use ecs::{EntityId, SharedWorld, World};
