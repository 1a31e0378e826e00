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
//! Runs the default simulation against a headless window.

use ecs_sim::app::App;
use ecs_sim::config::SimConfig;
use ecs_sim::render::HeadlessRenderer;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::default();
    let mut renderer = HeadlessRenderer::open(
        config.window.width as i32,
        config.window.height as i32,
        config.window.title.clone(),
    )
    .with_target_fps(60);

    let app = App::new(config)?;
    let report = app.run(&mut renderer)?;
    log::info!(
        "Average frame rate: {:.1} fps",
        report.frames as f64 / report.elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}
