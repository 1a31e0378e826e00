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
//! Foreground render loop
//!
//! Each frame: tick timers (staged growth, benchmark end), then hold the
//! world lock for the whole draw traversal, release it and yield so the
//! physics thread can get in. On exit the physics thread is stopped and
//! joined before the report is taken.

use crate::config::SimConfig;
use crate::ecs::scheduler::{self, PhysicsThread, ThreadSpawner};
use crate::ecs::systems::{self, PhysicsSystem};
use crate::ecs::{ScreenSize, SharedWorld, World};
use crate::error::{ConfigError, SimError};
use crate::render::{Color, Renderer};
use crate::spawn::{self, BatchOutcome};
use crate::timer::{format_elapsed, Stopwatch, TimerSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Frames presented
    pub frames: u64,
    /// Physics steps completed
    pub physics_steps: u64,
    /// Entities alive at the end
    pub entities: usize,
    /// Wall-clock duration of the loop
    pub elapsed: Duration,
    /// False if the physics thread could not be started
    pub physics_enabled: bool,
    /// Longest frame the renderer reported, in seconds
    pub slowest_frame: f32,
}

/// The simulation: a shared world, its physics thread and the timers that grow it
pub struct App {
    config: SimConfig,
    world: SharedWorld,
    physics: PhysicsThread,
    spawner: ThreadSpawner,
    timers: TimerSet,
    closing: Rc<Cell<bool>>,
    rng: Rc<RefCell<StdRng>>,
}

impl App {
    /// Validate `config` and build an initialized world
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        world.init(config.max_components);
        world.set_screen(ScreenSize::new(
            config.window.width as f32,
            config.window.height as f32,
        ));

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(App {
            physics: PhysicsThread::with_steps_per_second(config.steps_per_second),
            config,
            world: SharedWorld::new(world),
            spawner: scheduler::spawn_thread,
            timers: TimerSet::new(),
            closing: Rc::new(Cell::new(false)),
            rng: Rc::new(RefCell::new(rng)),
        })
    }

    /// Use `spawner` to create the physics thread
    pub fn with_thread_spawner(mut self, spawner: ThreadSpawner) -> Self {
        self.spawner = spawner;
        self
    }

    /// The shared world
    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    /// The configuration in use
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run until the window closes or the benchmark duration elapses
    ///
    /// A physics thread that fails to start is logged and the loop carries
    /// on render-only. An error is returned only if joining the thread fails.
    pub fn run<R: Renderer + ?Sized>(mut self, renderer: &mut R) -> Result<RunReport, SimError> {
        self.populate();

        // start_with logs the failure itself
        let physics_enabled = self
            .physics
            .start_with(self.world.clone(), PhysicsSystem::new(), self.spawner)
            .is_ok();
        if !physics_enabled {
            log::info!("Running render-only");
        }

        spawn::schedule_growth(
            &mut self.timers,
            &self.world,
            &self.config.growth_stages,
            self.config.entity_ceiling,
            Rc::clone(&self.rng),
        );
        if let Some(duration) = self.config.benchmark_duration {
            let closing = Rc::clone(&self.closing);
            self.timers.start(duration, move || closing.set(true));
        }

        let stopwatch = Stopwatch::start();
        let mut frames = 0u64;
        let mut slowest_frame = 0.0f32;
        while !renderer.should_close() && !self.closing.get() {
            self.timers.tick();
            self.frame(&mut *renderer);
            frames += 1;
            slowest_frame = slowest_frame.max(renderer.frame_time());
            thread::yield_now();
        }
        let elapsed = stopwatch.elapsed();

        let shutdown = if physics_enabled {
            self.physics.shutdown()
        } else {
            Ok(())
        };

        let report = RunReport {
            frames,
            physics_steps: self.physics.steps(),
            entities: self.world.lock().entity_count(),
            elapsed,
            physics_enabled,
            slowest_frame,
        };
        log::info!(
            "Ran {} frames and {} physics steps with {} entities in {} (slowest frame {:.1} ms)",
            report.frames,
            report.physics_steps,
            report.entities,
            format_elapsed(report.elapsed),
            report.slowest_frame * 1000.0
        );

        shutdown.map(|()| report)
    }

    fn populate(&mut self) {
        let mut world = self.world.lock();
        let mut rng = self.rng.borrow_mut();
        match spawn::spawn_batch(
            &mut world,
            &mut *rng,
            self.config.initial_entities,
            self.config.entity_ceiling,
        ) {
            Ok(BatchOutcome::Spawned(n)) => log::info!("Spawned {} initial entities", n),
            Ok(skipped) => log::warn!("Initial population skipped: {:?}", skipped),
            Err(err) => log::warn!("Initial population failed: {}", err),
        }
    }

    fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        renderer.begin_frame();
        renderer.clear(Color::RAYWHITE);
        {
            let mut world = self.world.lock();
            world.set_screen(ScreenSize::new(
                renderer.screen_width() as f32,
                renderer.screen_height() as f32,
            ));
            if let Err(err) = systems::draw(world.components(), &mut *renderer) {
                log::warn!("Draw failed: {}", err);
            }
        }
        renderer.draw_fps(10, 10);
        renderer.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Position;
    use crate::render::HeadlessRenderer;

    fn quick_config() -> SimConfig {
        SimConfig::new(64)
            .with_initial_entities(10)
            .with_entity_ceiling(64)
            .with_growth_stages(Vec::new())
            .with_benchmark_duration(None)
            .with_seed(1)
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(App::new(SimConfig::new(0)).is_err());
    }

    #[test]
    fn test_run_until_window_closes() {
        let app = App::new(quick_config()).unwrap();
        let world = app.world().clone();
        let mut renderer = HeadlessRenderer::open(320, 240, "test").with_max_frames(5);

        let report = app.run(&mut renderer).unwrap();
        assert_eq!(report.frames, 5);
        assert_eq!(report.entities, 10);
        assert!(report.physics_enabled);
        assert_eq!(renderer.draw_calls().len(), 10);
        assert_eq!(world.lock().screen(), ScreenSize::new(320.0, 240.0));
    }

    #[test]
    fn test_benchmark_timer_ends_run() {
        let config = quick_config().with_benchmark_duration(Some(Duration::from_millis(50)));
        let app = App::new(config).unwrap();
        let mut renderer = HeadlessRenderer::open(100, 100, "bench").with_target_fps(200);

        let report = app.run(&mut renderer).unwrap();
        assert!(report.elapsed >= Duration::from_millis(50));
        assert!(report.frames > 0);
        assert!(report.slowest_frame >= 0.004);
    }

    fn refuse_spawn(
        _: std::thread::Builder,
        _: Box<dyn FnOnce() + Send>,
    ) -> std::io::Result<std::thread::JoinHandle<()>> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "no threads available"))
    }

    #[test]
    fn test_spawn_failure_runs_render_only() {
        let app = App::new(quick_config()).unwrap().with_thread_spawner(refuse_spawn);
        let world = app.world().clone();
        let mut renderer = HeadlessRenderer::open(320, 240, "render-only").with_max_frames(4);

        let report = app.run(&mut renderer).unwrap();
        assert!(!report.physics_enabled);
        assert_eq!(report.physics_steps, 0);
        assert_eq!(report.frames, 4);
        assert_eq!(renderer.frames(), 4);
        assert_eq!(renderer.draw_calls().len(), 10);

        // same seed, no physics: positions are exactly as spawned
        let mut reference = World::with_capacity(64);
        let mut rng = StdRng::seed_from_u64(1);
        spawn::spawn_batch(&mut reference, &mut rng, 10, 64).unwrap();
        assert_eq!(
            world.snapshot().array::<Position>(),
            reference.components().array::<Position>()
        );
    }
}
