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
//! Component storage tests
//!
//! Capacity, lookup and the uninitialized paths of the fixed-capacity arrays.

use ecs_sim::ecs::components::{CircleCollider, Display, Position, RigidBody};
use ecs_sim::ecs::{Component, ComponentArray, ComponentKind, ComponentStore, EntityId, World};
use ecs_sim::error::EcsError;
use ecs_sim::math::Vec2;

#[test]
fn test_live_count_never_exceeds_capacity() {
    let mut store = ComponentStore::with_capacity(10);
    let mut failures = 0;
    for raw in 1..=25 {
        if store.create_component::<Position>(EntityId::new(raw)).is_err() {
            failures += 1;
        }
        let view = store.component_array::<Position>().unwrap();
        assert!(view.len() <= view.capacity());
    }
    assert_eq!(failures, 15);
    assert_eq!(store.component_array::<Position>().unwrap().len(), 10);
}

#[test]
fn test_full_array_reports_capacity_exceeded() {
    let mut array = ComponentArray::<RigidBody>::with_capacity(2);
    array.create(EntityId::new(1)).unwrap();
    array.create(EntityId::new(2)).unwrap();

    assert_eq!(
        array.create(EntityId::new(3)).unwrap_err(),
        EcsError::CapacityExceeded {
            kind: ComponentKind::RigidBody,
            capacity: 2
        }
    );
    assert_eq!(array.len(), 2);
}

#[test]
fn test_lookup_returns_the_owners_component() {
    let mut world = World::with_capacity(100);
    let mut entities = Vec::new();
    for i in 0..100 {
        let e = world.new_entity();
        world
            .components_mut()
            .attach(e, Position::new(i as f32, -(i as f32)))
            .unwrap();
        entities.push(e);
    }

    let store = world.components();
    for (i, e) in entities.iter().enumerate() {
        let pos = store.get_component::<Position>(*e).unwrap();
        assert_eq!(pos.owner(), *e);
        assert_eq!(pos.position(), Vec2::new(i as f32, -(i as f32)));
    }
}

#[test]
fn test_lookup_of_missing_component_is_not_found() {
    let mut world = World::with_capacity(4);
    let e = world.new_entity();
    world.components_mut().attach(e, Position::new(1.0, 2.0)).unwrap();

    assert_eq!(
        world.components().get_component::<CircleCollider>(e).unwrap_err(),
        EcsError::ComponentNotFound {
            kind: ComponentKind::CircleCollider,
            entity: e
        }
    );
    let stranger = EntityId::new(99);
    assert!(world.components().get_component::<Position>(stranger).is_err());
}

#[test]
fn test_invalid_entity_never_matches_free_slots() {
    let store = ComponentStore::with_capacity(8);
    assert!(store.get_component::<Display>(EntityId::INVALID).is_err());

    let mut store = store;
    assert_eq!(
        store.create_component::<Display>(EntityId::INVALID).unwrap_err(),
        EcsError::InvalidEntity {
            kind: ComponentKind::Display
        }
    );
}

#[test]
fn test_every_accessor_reports_uninitialized_storage() {
    let mut store = ComponentStore::new();
    let e = EntityId::new(1);
    let not_init = EcsError::NotInitialized {
        kind: ComponentKind::Position,
    };

    assert_eq!(store.create_component::<Position>(e).unwrap_err(), not_init);
    assert_eq!(store.get_component::<Position>(e).unwrap_err(), not_init);
    assert_eq!(store.get_component_mut::<Position>(e).unwrap_err(), not_init);
    assert_eq!(store.component_array::<Position>().unwrap_err(), not_init);
}

#[test]
fn test_initialized_storage_accepts_the_same_calls() {
    let mut store = ComponentStore::new();
    assert!(store.init(4));
    let e = EntityId::new(1);

    assert!(store.create_component::<Position>(e).is_ok());
    assert!(store.get_component::<Position>(e).is_ok());
    assert!(store.get_component_mut::<Position>(e).is_ok());
    assert_eq!(store.component_array::<Position>().unwrap().len(), 1);
}

#[test]
fn test_view_skips_free_slots() {
    let mut store = ComponentStore::with_capacity(6);
    store.attach(EntityId::new(4), CircleCollider::new(3.0)).unwrap();
    store.attach(EntityId::new(5), CircleCollider::new(4.0)).unwrap();

    let view = store.component_array::<CircleCollider>().unwrap();
    assert_eq!(view.slots().len(), 6);
    let owners: Vec<u64> = view.iter().map(|c| c.owner().raw()).collect();
    assert_eq!(owners, vec![4, 5]);
}

#[test]
fn test_entity_ids_are_monotonic_and_never_invalid() {
    let mut world = World::new();
    let mut previous = EntityId::INVALID;
    for _ in 0..1000 {
        let e = world.new_entity();
        assert!(e.is_valid());
        assert!(e.raw() > previous.raw());
        previous = e;
    }
    assert_eq!(world.entity_count(), 1000);
}

#[test]
fn test_overwritten_slot_is_returned_to_the_pool() {
    let mut store = ComponentStore::with_capacity(2);
    let a = EntityId::new(1);
    store.attach(a, Position::new(1.0, 1.0)).unwrap();
    store.attach(EntityId::new(2), Position::new(2.0, 2.0)).unwrap();
    assert!(store.create_component::<Position>(EntityId::new(3)).is_err());

    *store.get_component_mut::<Position>(a).unwrap() = Position::new(5.0, 5.0);

    assert_eq!(store.component_array::<Position>().unwrap().len(), 1);
    assert_eq!(store.remaining_of(ComponentKind::Position), 1);
    assert!(store.get_component::<Position>(a).is_err());
    assert!(store.create_component::<Position>(EntityId::new(3)).is_ok());
}
