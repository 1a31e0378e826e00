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
//! Bouncing balls
//!
//! Runs a short seeded simulation against the headless renderer and prints
//! where the first few balls ended up.
//!
//! Run with: cargo run --example bouncing_balls

use ecs_sim::app::App;
use ecs_sim::config::{GrowthStage, SimConfig};
use ecs_sim::ecs::components::{Position, RigidBody};
use ecs_sim::ecs::Component;
use ecs_sim::render::HeadlessRenderer;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::new(256)
        .with_initial_entities(20)
        .with_entity_ceiling(200)
        .with_growth_stages(vec![
            GrowthStage::new(Duration::from_millis(500), 40),
            GrowthStage::new(Duration::from_secs(1), 80),
        ])
        .with_window(320, 240, "bouncing balls")
        .with_benchmark_duration(Some(Duration::from_secs(2)))
        .with_seed(2025);

    let mut renderer = HeadlessRenderer::open(
        config.window.width as i32,
        config.window.height as i32,
        config.window.title.clone(),
    )
    .with_target_fps(60);

    let app = App::new(config)?;
    let world = app.world().clone();
    let report = app.run(&mut renderer)?;

    println!("=== Bouncing balls ===");
    println!("Frames:        {}", report.frames);
    println!("Physics steps: {}", report.physics_steps);
    println!("Entities:      {}", report.entities);
    println!();

    let world = world.lock();
    let store = world.components();
    for body in store.component_array::<RigidBody>()?.iter().take(5) {
        let pos = store.get_component::<Position>(body.owner())?;
        println!(
            "{}: pos = ({:7.2}, {:7.2}), vel = ({:8.2}, {:8.2})",
            body.owner(),
            pos.x(),
            pos.y(),
            body.velocity().x,
            body.velocity().y
        );
    }
    Ok(())
}
