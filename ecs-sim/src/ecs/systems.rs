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
//! Built-in systems: physics and draw
//!
//! Both systems walk one component array and join the other kinds they need
//! by owner lookup. An entity missing a dependent component is skipped
//! without error; that is the normal state of an entity still being built.

use crate::ecs::components::{CircleCollider, Display, Position, RigidBody};
use crate::ecs::world::{ComponentStore, ScreenSize};
use crate::ecs::{Component, System, World};
use crate::error::EcsResult;
use crate::math::Vec2;
use crate::render::Renderer;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Downward acceleration scale, in units/s² per unit of mass
pub const GRAVITY: f32 = 2000.0;

/// Fraction of velocity removed every step
///
/// Applied once per step regardless of `dt`, so damping depends on the
/// step rate. This is a deliberate simplification, not a per-second rate.
pub const DRAG_COEFFICIENT: f32 = 0.01;

/// Slot indices of one rigid body and the components it was joined with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BodyJoin {
    body: usize,
    position: usize,
    collider: usize,
}

/// Fixed-step rigid-body update
///
/// Per body, in order: gravity, drag, position integration, then boundary
/// reflection against `[radius, screen - radius]` on each axis. The step is
/// deterministic for identical inputs.
///
/// # Examples
///
/// ```
/// use ecs_sim::ecs::components::{CircleCollider, Position, RigidBody};
/// use ecs_sim::ecs::systems::PhysicsSystem;
/// use ecs_sim::ecs::{ComponentStore, EntityId, ScreenSize};
/// use ecs_sim::math::Vec2;
///
/// let mut store = ComponentStore::with_capacity(4);
/// let e = EntityId::new(1);
/// store.attach(e, Position::new(10.0, 10.0)).unwrap();
/// store.attach(e, RigidBody::new(1.0, Vec2::new(10.0, 0.0))).unwrap();
/// store.attach(e, CircleCollider::new(1.0)).unwrap();
///
/// let physics = PhysicsSystem::new().with_gravity(0.0).with_drag(0.0);
/// physics.step(&mut store, ScreenSize::new(100.0, 100.0), 1.0).unwrap();
/// assert_eq!(store.get_component::<Position>(e).unwrap().x(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSystem {
    gravity: f32,
    drag: f32,
}

impl PhysicsSystem {
    /// Create a physics system using [`GRAVITY`] and [`DRAG_COEFFICIENT`]
    pub fn new() -> Self {
        PhysicsSystem {
            gravity: GRAVITY,
            drag: DRAG_COEFFICIENT,
        }
    }

    /// Override the gravity scale
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Override the drag coefficient
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Gravity scale in use
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Drag coefficient in use
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Advance every complete rigid body by `dt` seconds
    ///
    /// Returns the number of bodies updated. Bodies without a Position or
    /// CircleCollider are left untouched.
    pub fn step(&self, store: &mut ComponentStore, screen: ScreenSize, dt: f32) -> EcsResult<usize> {
        let joins = resolve_joins(store)?;
        let mut updated = 0;

        for join in joins {
            let (Some(body), Some(position), Some(collider)) = (
                store.array::<RigidBody>().slot(join.body).copied(),
                store.array::<Position>().slot(join.position).copied(),
                store.array::<CircleCollider>().slot(join.collider).copied(),
            ) else {
                continue;
            };

            let (new_position, new_velocity) = self.integrate(
                position.position(),
                body.velocity(),
                body.mass(),
                collider.radius(),
                screen,
                dt,
            );

            if !new_position.is_valid() || !new_velocity.is_valid() {
                log::warn!(
                    "Integration produced invalid state for {:?}, skipping",
                    body.owner()
                );
                continue;
            }

            if let Some(slot) = store.array_mut::<RigidBody>().slot_mut(join.body) {
                slot.set_velocity(new_velocity);
            }
            if let Some(slot) = store.array_mut::<Position>().slot_mut(join.position) {
                slot.set_position(new_position);
            }
            updated += 1;
        }

        Ok(updated)
    }

    /// One body's update, returning the committed position and velocity
    pub fn integrate(
        &self,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: f32,
        screen: ScreenSize,
        dt: f32,
    ) -> (Vec2, Vec2) {
        let mut velocity = velocity;
        velocity.y += self.gravity * mass * dt;
        velocity += (-velocity) * self.drag;

        let mut candidate = position + velocity * dt;
        reflect_axis(&mut candidate.x, &mut velocity.x, radius, screen.width - radius);
        reflect_axis(&mut candidate.y, &mut velocity.y, radius, screen.height - radius);

        (candidate, velocity)
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PhysicsSystem {
    fn run(&mut self, world: &mut World, dt: f32) -> EcsResult<usize> {
        let screen = world.screen();
        self.step(world.components_mut(), screen, dt)
    }

    fn name(&self) -> &str {
        "PhysicsSystem"
    }
}

/// Clamp to `[min, max]` and flip the velocity if a bound was crossed
fn reflect_axis(value: &mut f32, velocity: &mut f32, min: f32, max: f32) {
    if *value < min {
        *value = min;
        *velocity = -*velocity;
    } else if *value > max {
        *value = max;
        *velocity = -*velocity;
    }
}

/// Find, for each live rigid body, the Position and CircleCollider of its owner
fn resolve_joins(store: &ComponentStore) -> EcsResult<Vec<BodyJoin>> {
    let bodies = store.component_array::<RigidBody>()?;
    let positions = store.array::<Position>();
    let colliders = store.array::<CircleCollider>();
    // surface NotInitialized for the joined kinds too
    store.component_array::<Position>()?;
    store.component_array::<CircleCollider>()?;

    let join = |(index, body): (usize, &RigidBody)| -> Option<BodyJoin> {
        if body.is_free() {
            return None;
        }
        let owner = body.owner();
        Some(BodyJoin {
            body: index,
            position: positions.index_of(owner).ok()?,
            collider: colliders.index_of(owner).ok()?,
        })
    };

    #[cfg(feature = "parallel")]
    let joins: Vec<BodyJoin> = bodies.slots().par_iter().enumerate().filter_map(join).collect();

    #[cfg(not(feature = "parallel"))]
    let joins: Vec<BodyJoin> = bodies.slots().iter().enumerate().filter_map(join).collect();

    let skipped = bodies.len().saturating_sub(joins.len());
    if skipped > 0 {
        log::trace!("{} rigid bodies skipped: missing Position or CircleCollider", skipped);
    }

    Ok(joins)
}

/// Draw every displayable entity as a filled circle
///
/// Read-only with respect to storage. Returns the number of circles drawn;
/// entities with a Display but no Position are skipped.
pub fn draw<R: Renderer + ?Sized>(store: &ComponentStore, renderer: &mut R) -> EcsResult<usize> {
    let displays = store.component_array::<Display>()?;
    store.component_array::<Position>()?;

    let mut drawn = 0;
    for display in displays.iter() {
        let Ok(position) = store.get_component::<Position>(display.owner()) else {
            continue;
        };
        renderer.draw_circle(position.x(), position.y(), display.radius(), display.color());
        drawn += 1;
    }

    Ok(drawn)
}
