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
//! System trait
//!
//! Systems contain the logic that operates on component arrays. They keep
//! no per-entity state; anything they need lives in the world.

use crate::ecs::World;
use crate::error::EcsResult;

/// A step function the background thread can drive
///
/// `run` is always called with the storage lock held for its whole
/// duration.
pub trait System: Send {
    /// Advance the world by `dt` seconds, returning how many entities were updated
    fn run(&mut self, world: &mut World, dt: f32) -> EcsResult<usize>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSystem {
        run_count: usize,
    }

    impl System for CountingSystem {
        fn run(&mut self, world: &mut World, _dt: f32) -> EcsResult<usize> {
            self.run_count += 1;
            Ok(world.entity_count())
        }
    }

    #[test]
    fn test_system_run_and_name() {
        let mut system = CountingSystem { run_count: 0 };
        let mut world = World::with_capacity(1);
        world.new_entity();

        assert_eq!(system.run(&mut world, 0.016), Ok(1));
        assert_eq!(system.run_count, 1);
        assert!(system.name().ends_with("CountingSystem"));
    }
}
