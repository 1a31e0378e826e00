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
//! Entity population: randomized balls and staged growth
//!
//! Every spawned entity gets all four components. Batches are
//! all-or-nothing: a batch that would cross the entity ceiling or overflow
//! any component array is skipped before a single id is allocated.

use crate::config::GrowthStage;
use crate::ecs::components::{CircleCollider, Display, Position, RigidBody};
use crate::ecs::{EntityId, SharedWorld, World};
use crate::error::EcsResult;
use crate::math::Vec2;
use crate::render::Color;
use crate::timer::TimerSet;
use rand::rngs::StdRng;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// Smallest ball radius
pub const MIN_RADIUS: f32 = 2.0;
/// Largest ball radius
pub const MAX_RADIUS: f32 = 8.0;
/// Lightest ball
pub const MIN_MASS: f32 = 0.5;
/// Heaviest ball
pub const MAX_MASS: f32 = 2.0;
/// Largest initial speed along either axis
pub const MAX_INITIAL_SPEED: f32 = 300.0;

/// What happened to a batch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every entity of the batch was created
    Spawned(usize),
    /// The batch would have crossed the entity ceiling
    SkippedCeiling,
    /// A component array lacked room for the batch
    SkippedCapacity,
}

/// Create one entity with random position, size, color, mass and velocity
///
/// Fails without allocating an id if any component array is full.
pub fn spawn_random_entity<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> EcsResult<EntityId> {
    if let Some(err) = world.components().full_kind() {
        return Err(err);
    }

    let screen = world.screen();
    let radius = rng.gen_range(MIN_RADIUS..=MAX_RADIUS);
    let x = random_in(rng, radius, screen.width - radius);
    let y = random_in(rng, radius, screen.height - radius);
    let color = Color::new(rng.gen(), rng.gen(), rng.gen(), 255);
    let mass = rng.gen_range(MIN_MASS..=MAX_MASS);
    let velocity = Vec2::new(
        rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
        rng.gen_range(-MAX_INITIAL_SPEED..=MAX_INITIAL_SPEED),
    );

    let entity = world.new_entity();
    let store = world.components_mut();
    store.attach(entity, Position::new(x, y))?;
    store.attach(entity, Display::new(radius, color))?;
    store.attach(entity, RigidBody::new(mass, velocity))?;
    store.attach(entity, CircleCollider::new(radius))?;
    Ok(entity)
}

fn random_in<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Spawn `count` random entities, or none at all
pub fn spawn_batch<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    count: usize,
    ceiling: usize,
) -> EcsResult<BatchOutcome> {
    if world.entity_count() + count > ceiling {
        return Ok(BatchOutcome::SkippedCeiling);
    }
    if world.components().remaining() < count {
        return Ok(BatchOutcome::SkippedCapacity);
    }

    for _ in 0..count {
        spawn_random_entity(world, rng)?;
    }
    Ok(BatchOutcome::Spawned(count))
}

/// Register one timer per growth stage that spawns its batch under the world lock
pub fn schedule_growth(
    timers: &mut TimerSet,
    world: &SharedWorld,
    stages: &[GrowthStage],
    ceiling: usize,
    rng: Rc<RefCell<StdRng>>,
) {
    for stage in stages.iter().copied() {
        let world = world.clone();
        let rng = Rc::clone(&rng);
        timers.start(stage.delay, move || {
            let mut guard = world.lock();
            let mut rng = rng.borrow_mut();
            match spawn_batch(&mut guard, &mut *rng, stage.batch, ceiling) {
                Ok(BatchOutcome::Spawned(n)) => {
                    log::info!("Growth stage spawned {} entities ({} total)", n, guard.entity_count())
                }
                Ok(skipped) => log::info!(
                    "Growth stage of {} entities skipped: {:?}",
                    stage.batch,
                    skipped
                ),
                Err(err) => log::warn!("Growth stage failed: {}", err),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, ScreenSize};
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_random_entity_is_complete_and_in_bounds() {
        let mut world = World::with_capacity(8);
        world.set_screen(ScreenSize::new(200.0, 100.0));
        let e = spawn_random_entity(&mut world, &mut rng()).unwrap();

        let store = world.components();
        let pos = store.get_component::<Position>(e).unwrap();
        let display = store.get_component::<Display>(e).unwrap();
        let collider = store.get_component::<CircleCollider>(e).unwrap();
        let body = store.get_component::<RigidBody>(e).unwrap();

        assert_eq!(display.radius(), collider.radius());
        assert!(pos.x() >= collider.radius() && pos.x() <= 200.0 - collider.radius());
        assert!(pos.y() >= collider.radius() && pos.y() <= 100.0 - collider.radius());
        assert!(body.mass() >= MIN_MASS && body.mass() <= MAX_MASS);
        assert_eq!(body.owner(), e);
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = World::with_capacity(16);
        let mut b = World::with_capacity(16);
        spawn_batch(&mut a, &mut rng(), 10, 16).unwrap();
        spawn_batch(&mut b, &mut rng(), 10, 16).unwrap();
        assert_eq!(a.components(), b.components());
    }

    #[test]
    fn test_full_storage_allocates_no_id() {
        let mut world = World::with_capacity(1);
        spawn_random_entity(&mut world, &mut rng()).unwrap();
        assert!(spawn_random_entity(&mut world, &mut rng()).is_err());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_batch_over_ceiling_is_skipped_whole() {
        let mut world = World::with_capacity(32);
        let mut rng = rng();
        assert_eq!(spawn_batch(&mut world, &mut rng, 8, 10), Ok(BatchOutcome::Spawned(8)));
        assert_eq!(spawn_batch(&mut world, &mut rng, 3, 10), Ok(BatchOutcome::SkippedCeiling));
        assert_eq!(world.entity_count(), 8);
        assert_eq!(spawn_batch(&mut world, &mut rng, 2, 10), Ok(BatchOutcome::Spawned(2)));
    }

    #[test]
    fn test_batch_over_capacity_is_skipped_whole() {
        let mut world = World::with_capacity(4);
        assert_eq!(
            spawn_batch(&mut world, &mut rng(), 5, 100),
            Ok(BatchOutcome::SkippedCapacity)
        );
        assert_eq!(world.entity_count(), 0);
        assert!(world.components().component_array::<Position>().unwrap().is_empty());
    }

    #[test]
    fn test_batch_sees_slots_claimed_outside_create() {
        let mut world = World::with_capacity(4);
        let mut rng = rng();
        spawn_batch(&mut world, &mut rng, 3, 100).unwrap();
        world
            .components_mut()
            .array_mut::<Position>()
            .slot_mut(3)
            .unwrap()
            .set_owner(EntityId::new(77));

        assert_eq!(world.components().remaining(), 0);
        assert_eq!(spawn_batch(&mut world, &mut rng, 1, 100), Ok(BatchOutcome::SkippedCapacity));
        assert_eq!(world.entity_count(), 3);
        assert_eq!(world.components().component_array::<Display>().unwrap().len(), 3);
    }

    #[test]
    fn test_growth_stages_fire_on_tick() {
        let world = SharedWorld::new(World::with_capacity(64));
        let mut timers = TimerSet::new();
        let stages = [
            GrowthStage::new(Duration::ZERO, 5),
            GrowthStage::new(Duration::from_secs(3600), 5),
        ];
        schedule_growth(&mut timers, &world, &stages, 64, Rc::new(RefCell::new(rng())));

        assert_eq!(timers.tick_at(Instant::now() + Duration::from_millis(1)), 1);
        assert_eq!(world.lock().entity_count(), 5);
        assert_eq!(timers.pending(), 1);
    }
}
