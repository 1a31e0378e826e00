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
//! Simulation configuration

use crate::ecs::scheduler::STEPS_PER_SECOND;
use crate::error::ConfigError;
use std::time::Duration;

/// Window the foreground loop opens
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Title bar text
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 512,
            height: 512,
            title: "ecs-sim".to_string(),
        }
    }
}

/// One batch of entities added at a fixed offset after startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthStage {
    /// Offset from startup at which the batch is spawned
    pub delay: Duration,
    /// Entities in the batch
    pub batch: usize,
}

impl GrowthStage {
    /// Create a growth stage
    pub fn new(delay: Duration, batch: usize) -> Self {
        GrowthStage { delay, batch }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Slots per component kind
    pub max_components: usize,
    /// Entities spawned before the first frame
    pub initial_entities: usize,
    /// Upper bound on entities; a growth batch that would cross it is skipped
    pub entity_ceiling: usize,
    /// Timed batches added while running
    pub growth_stages: Vec<GrowthStage>,
    /// Window to open
    pub window: WindowConfig,
    /// Physics step rate
    pub steps_per_second: u32,
    /// Close the loop after this long, if set
    pub benchmark_duration: Option<Duration>,
    /// Seed for entity randomization; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_components: 1024,
            initial_entities: 100,
            entity_ceiling: 1000,
            growth_stages: vec![
                GrowthStage::new(Duration::from_secs(2), 100),
                GrowthStage::new(Duration::from_secs(4), 200),
                GrowthStage::new(Duration::from_secs(6), 400),
            ],
            window: WindowConfig::default(),
            steps_per_second: STEPS_PER_SECOND,
            benchmark_duration: Some(Duration::from_secs(10)),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Create a configuration with the given capacity and default everything else
    pub fn new(max_components: usize) -> Self {
        SimConfig {
            max_components,
            entity_ceiling: max_components.min(SimConfig::default().entity_ceiling),
            ..Self::default()
        }
    }

    /// Set the number of entities spawned at startup
    pub fn with_initial_entities(mut self, count: usize) -> Self {
        self.initial_entities = count;
        self
    }

    /// Set the entity ceiling
    pub fn with_entity_ceiling(mut self, ceiling: usize) -> Self {
        self.entity_ceiling = ceiling;
        self
    }

    /// Replace the growth schedule
    pub fn with_growth_stages(mut self, stages: Vec<GrowthStage>) -> Self {
        self.growth_stages = stages;
        self
    }

    /// Set the window
    pub fn with_window(mut self, width: u32, height: u32, title: impl Into<String>) -> Self {
        self.window = WindowConfig {
            width,
            height,
            title: title.into(),
        };
        self
    }

    /// Set the physics step rate
    pub fn with_steps_per_second(mut self, steps: u32) -> Self {
        self.steps_per_second = steps;
        self
    }

    /// Set or clear the benchmark duration
    pub fn with_benchmark_duration(mut self, duration: Option<Duration>) -> Self {
        self.benchmark_duration = duration;
        self
    }

    /// Use a fixed seed for entity randomization
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_components == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.steps_per_second == 0 {
            return Err(ConfigError::ZeroStepRate);
        }
        if self.entity_ceiling > self.max_components {
            return Err(ConfigError::CeilingAboveCapacity {
                ceiling: self.entity_ceiling,
                capacity: self.max_components,
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        Ok(())
    }
}
