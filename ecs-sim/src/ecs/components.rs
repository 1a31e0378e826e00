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
//! Built-in components
//!
//! Four fixed-size records, each carrying the `owner` tag that marks the
//! slot as live. Values built with `new` are unowned until the store
//! stamps them (see [`ComponentStore::attach`](crate::ecs::ComponentStore::attach)).

use crate::ecs::{Component, ComponentKind, EntityId};
use crate::math::Vec2;
use crate::render::Color;

/// Screen-space position
///
/// # Examples
///
/// ```
/// use ecs_sim::ecs::components::Position;
///
/// let pos = Position::new(1.0, 2.0);
/// assert_eq!(pos.x(), 1.0);
/// assert!(pos.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    owner: EntityId,
    pos: Vec2,
}

impl Position {
    /// Create an unowned position
    pub fn new(x: f32, y: f32) -> Self {
        Position {
            owner: EntityId::INVALID,
            pos: Vec2::new(x, y),
        }
    }

    /// Get the position vector
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Set the position vector
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Get the x coordinate
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    /// Check if both coordinates are finite
    pub fn is_valid(&self) -> bool {
        self.pos.is_valid()
    }
}

impl Component for Position {
    const KIND: ComponentKind = ComponentKind::Position;

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }
}

/// How an entity is drawn: a filled circle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Display {
    owner: EntityId,
    radius: f32,
    color: Color,
}

impl Display {
    /// Create an unowned display record
    pub fn new(radius: f32, color: Color) -> Self {
        Display {
            owner: EntityId::INVALID,
            radius,
            color,
        }
    }

    /// Drawn radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the drawn radius
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Fill color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the fill color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Component for Display {
    const KIND: ComponentKind = ComponentKind::Display;

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }
}

/// Mass and velocity of a simulated body
///
/// # Panics
///
/// [`RigidBody::new`] panics if mass is negative, NaN or infinite; use
/// [`RigidBody::try_new`] to validate instead.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidBody {
    owner: EntityId,
    mass: f32,
    velocity: Vec2,
}

impl RigidBody {
    /// Create an unowned rigid body
    pub fn new(mass: f32, velocity: Vec2) -> Self {
        assert!(
            mass >= 0.0 && mass.is_finite(),
            "Mass must be non-negative and finite"
        );
        RigidBody {
            owner: EntityId::INVALID,
            mass,
            velocity,
        }
    }

    /// Create a rigid body, returning None for an invalid mass
    pub fn try_new(mass: f32, velocity: Vec2) -> Option<Self> {
        if mass >= 0.0 && mass.is_finite() {
            Some(RigidBody::new(mass, velocity))
        } else {
            None
        }
    }

    /// Mass of the body
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Current velocity in units per second
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

impl Component for RigidBody {
    const KIND: ComponentKind = ComponentKind::RigidBody;

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }
}

/// Circular collision shape used for boundary response
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircleCollider {
    owner: EntityId,
    radius: f32,
}

impl CircleCollider {
    /// Create an unowned collider
    pub fn new(radius: f32) -> Self {
        CircleCollider {
            owner: EntityId::INVALID,
            radius,
        }
    }

    /// Collision radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the collision radius
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }
}

impl Component for CircleCollider {
    const KIND: ComponentKind = ComponentKind::CircleCollider;

    fn owner(&self) -> EntityId {
        self.owner
    }

    fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_free_slots() {
        assert!(Position::default().is_free());
        assert!(Display::default().is_free());
        assert!(RigidBody::default().is_free());
        assert!(CircleCollider::default().is_free());
    }

    #[test]
    fn test_new_components_are_unowned() {
        assert!(Position::new(1.0, 2.0).is_free());
        assert!(Display::new(4.0, Color::RED).is_free());
        assert!(RigidBody::new(1.0, Vec2::ZERO).is_free());
        assert!(CircleCollider::new(4.0).is_free());
    }

    #[test]
    fn test_position_accessors() {
        let mut pos = Position::new(1.0, 2.0);
        assert_eq!(pos.position(), Vec2::new(1.0, 2.0));
        pos.set_position(Vec2::new(3.0, 4.0));
        assert_eq!(pos.x(), 3.0);
        assert_eq!(pos.y(), 4.0);
        assert!(!Position::new(f32::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_rigid_body_try_new() {
        assert!(RigidBody::try_new(2.0, Vec2::ZERO).is_some());
        assert!(RigidBody::try_new(0.0, Vec2::ZERO).is_some());
        assert!(RigidBody::try_new(-1.0, Vec2::ZERO).is_none());
        assert!(RigidBody::try_new(f32::NAN, Vec2::ZERO).is_none());
        assert!(RigidBody::try_new(f32::INFINITY, Vec2::ZERO).is_none());
    }

    #[test]
    #[should_panic(expected = "Mass must be non-negative and finite")]
    fn test_rigid_body_negative_mass_panics() {
        RigidBody::new(-1.0, Vec2::ZERO);
    }

    #[test]
    fn test_owner_stamp() {
        let mut collider = CircleCollider::new(3.0);
        collider.set_owner(EntityId::new(7));
        assert_eq!(collider.owner(), EntityId::new(7));
        assert!(!collider.is_free());
        assert_eq!(collider.radius(), 3.0);
    }
}
