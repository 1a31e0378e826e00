//! Entity Component System (ECS) core implementation
//!
//! This module provides:
//! - Monotonic entity identifiers
//! - Fixed-capacity component arrays with owner-tag slots
//! - The physics and draw systems
//! - The fixed-step background physics thread

mod entity;
mod component;
mod system;
mod world;

pub mod components;
pub mod scheduler;
pub mod systems;

pub use entity::{EntityId, EntityRegistry};
pub use component::{
    Component, ComponentArray, ComponentKind, ComponentSlice, LinearScan, SlotAllocator,
};
pub use system::System;
pub use world::{ComponentStore, ScreenSize, SharedWorld, Stored, World};
