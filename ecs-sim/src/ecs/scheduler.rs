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
//! Fixed-step background simulation thread
//!
//! The thread repeats: lock the world, measure `dt` since the previous
//! step started, run the system, unlock, yield, then sleep off whatever
//! is left of the step period. A step that overruns its period is followed
//! immediately by the next one; the sleep never goes negative.
//!
//! Shutdown is cooperative. [`PhysicsThread::stop`] clears a shared flag
//! that the loop checks once per iteration, so a step in progress always
//! completes. [`PhysicsThread::join`] then waits for the thread to exit.
//!
//! ```text
//! NotStarted --start--> Running --stop--> Stopping --join--> Joined
//! ```
//!
//! Lock acquisition never times out. If another holder of the world lock
//! never releases it, this thread blocks forever.

use crate::ecs::{SharedWorld, System};
use crate::error::SimError;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default step rate of the physics thread
pub const STEPS_PER_SECOND: u32 = 60;

/// Creates the OS thread that runs the step loop
///
/// [`spawn_thread`] is the real one; anything else with this signature can
/// stand in for it, e.g. to exercise the spawn-failure path.
pub type ThreadSpawner = fn(thread::Builder, Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>>;

/// Spawn `body` on a new OS thread configured by `builder`
pub fn spawn_thread(builder: thread::Builder, body: Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>> {
    builder.spawn(body)
}

/// Lifecycle of a [`PhysicsThread`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// `start` has not been called
    NotStarted,
    /// The loop is stepping
    Running,
    /// Termination requested, not yet joined
    Stopping,
    /// The thread has exited and been joined
    Joined,
}

/// Handle to the background physics thread
///
/// Dropping a running handle stops and joins the thread.
#[derive(Debug)]
pub struct PhysicsThread {
    state: ThreadState,
    running: Arc<AtomicBool>,
    steps: Arc<AtomicU64>,
    step_period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PhysicsThread {
    /// Create a handle that steps at [`STEPS_PER_SECOND`]
    pub fn new() -> Self {
        Self::with_steps_per_second(STEPS_PER_SECOND)
    }

    /// Create a handle that steps at the given rate
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_second` is zero
    pub fn with_steps_per_second(steps_per_second: u32) -> Self {
        assert!(steps_per_second > 0, "Step rate must be positive");
        PhysicsThread {
            state: ThreadState::NotStarted,
            running: Arc::new(AtomicBool::new(false)),
            steps: Arc::new(AtomicU64::new(0)),
            step_period: Duration::from_secs(1) / steps_per_second,
            handle: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ThreadState {
        self.state
    }

    /// Nominal time budget of one step
    pub fn step_period(&self) -> Duration {
        self.step_period
    }

    /// Steps completed so far
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Acquire)
    }

    /// Whether the loop has been started and not asked to stop
    pub fn is_running(&self) -> bool {
        self.state == ThreadState::Running
    }

    fn expect_state(&self, expected: ThreadState) -> Result<(), SimError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SimError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Spawn the thread and begin stepping `system` against `world`
    ///
    /// A spawn failure leaves the handle in `NotStarted`; the caller can
    /// carry on without physics.
    pub fn start<S: System + 'static>(&mut self, world: SharedWorld, system: S) -> Result<(), SimError> {
        self.start_with(world, system, spawn_thread)
    }

    /// [`start`](Self::start) with a custom thread spawner
    pub fn start_with<S: System + 'static>(
        &mut self,
        world: SharedWorld,
        system: S,
        spawner: ThreadSpawner,
    ) -> Result<(), SimError> {
        self.expect_state(ThreadState::NotStarted)?;

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let steps = Arc::clone(&self.steps);
        let period = self.step_period;

        let spawned = spawner(
            thread::Builder::new().name("physics".into()),
            Box::new(move || run_loop(world, system, running, steps, period)),
        );

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = ThreadState::Running;
                log::info!("Physics thread started ({:?} per step)", period);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                log::error!("Failed to start physics thread: {}", err);
                Err(SimError::Spawn(err))
            }
        }
    }

    /// Ask the loop to exit after its current step
    pub fn stop(&mut self) -> Result<(), SimError> {
        self.expect_state(ThreadState::Running)?;
        self.running.store(false, Ordering::Release);
        self.state = ThreadState::Stopping;
        log::debug!("Physics thread stop requested");
        Ok(())
    }

    /// Wait for a stopped loop to exit
    ///
    /// Once this returns the thread makes no further storage mutations.
    pub fn join(&mut self) -> Result<(), SimError> {
        self.expect_state(ThreadState::Stopping)?;
        self.state = ThreadState::Joined;

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(()) => {
                log::info!("Physics thread joined after {} steps", self.steps());
                Ok(())
            }
            Err(_) => {
                log::error!("Physics thread panicked");
                Err(SimError::ThreadPanicked)
            }
        }
    }

    /// `stop` followed by `join`
    pub fn shutdown(&mut self) -> Result<(), SimError> {
        if self.state == ThreadState::Running {
            self.stop()?;
        }
        self.join()
    }
}

impl Default for PhysicsThread {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PhysicsThread {
    fn drop(&mut self) {
        if matches!(self.state, ThreadState::Running | ThreadState::Stopping) {
            if let Err(err) = self.shutdown() {
                log::error!("Physics thread shutdown on drop failed: {}", err);
            }
        }
    }
}

fn run_loop<S: System>(
    world: SharedWorld,
    mut system: S,
    running: Arc<AtomicBool>,
    steps: Arc<AtomicU64>,
    period: Duration,
) {
    let mut last_step = Instant::now();
    let mut reported_error = false;

    while running.load(Ordering::Acquire) {
        let step_start;
        {
            let mut guard = world.lock();
            step_start = Instant::now();
            let dt = step_start.duration_since(last_step).as_secs_f32();

            if let Err(err) = system.run(&mut guard, dt) {
                if !reported_error {
                    log::warn!("{} step failed: {}", system.name(), err);
                    reported_error = true;
                }
            }

            last_step = step_start;
            steps.fetch_add(1, Ordering::Release);
        }
        thread::yield_now();

        let taken = step_start.elapsed();
        if taken < period {
            thread::sleep(period - taken);
        } else {
            log::debug!("Physics step overran: {:?} > {:?}", taken, period);
        }
    }
}
