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
//! Rendering collaborator interface
//!
//! The simulation only issues calls through [`Renderer`]; windowing, input
//! and rasterization belong to whatever backend implements it. The
//! [`HeadlessRenderer`] backend records draw calls instead of rasterizing
//! them, which is what the binary, tests and benches run against.

use std::thread;
use std::time::{Duration, Instant};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Off-white background
    pub const RAYWHITE: Color = Color::new(245, 245, 245, 255);
    /// Red
    pub const RED: Color = Color::new(230, 41, 55, 255);
    /// Green
    pub const GREEN: Color = Color::new(0, 228, 48, 255);
    /// Blue
    pub const BLUE: Color = Color::new(0, 121, 241, 255);
    /// Pink
    pub const PINK: Color = Color::new(255, 109, 194, 255);
    /// Black
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

/// The window/renderer the foreground loop drives
///
/// Opening the window is the implementor's constructor.
pub trait Renderer {
    /// Whether the user asked to close the window
    fn should_close(&self) -> bool;

    /// Start a frame
    fn begin_frame(&mut self);

    /// Finish and present a frame
    fn end_frame(&mut self);

    /// Fill the frame with a color
    fn clear(&mut self, color: Color);

    /// Draw a filled circle centred at (x, y)
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);

    /// Draw the frames-per-second counter at (x, y)
    fn draw_fps(&mut self, x: i32, y: i32);

    /// Seconds elapsed during the previous frame
    fn frame_time(&self) -> f32;

    /// Current drawable width in pixels
    fn screen_width(&self) -> i32;

    /// Current drawable height in pixels
    fn screen_height(&self) -> i32;
}

/// One recorded `draw_circle` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Centre x
    pub x: f32,
    /// Centre y
    pub y: f32,
    /// Radius
    pub radius: f32,
    /// Fill color
    pub color: Color,
}

/// Window-less renderer that records what would have been drawn
#[derive(Debug)]
pub struct HeadlessRenderer {
    width: i32,
    height: i32,
    title: String,
    max_frames: Option<u64>,
    target_frame_time: Option<Duration>,
    frames: u64,
    total_draw_calls: u64,
    calls: Vec<DrawCall>,
    clear_color: Option<Color>,
    frame_start: Option<Instant>,
    last_frame_time: f32,
}

impl HeadlessRenderer {
    /// "Open" a window of the given size
    pub fn open(width: i32, height: i32, title: impl Into<String>) -> Self {
        let title = title.into();
        log::debug!("Opened headless window '{}' ({}x{})", title, width, height);
        HeadlessRenderer {
            width,
            height,
            title,
            max_frames: None,
            target_frame_time: None,
            frames: 0,
            total_draw_calls: 0,
            calls: Vec::new(),
            clear_color: None,
            frame_start: None,
            last_frame_time: 0.0,
        }
    }

    /// Report `should_close` once this many frames have been presented
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Pace `end_frame` to the given frame rate
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        if fps > 0 {
            self.target_frame_time = Some(Duration::from_secs(1) / fps);
        }
        self
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the drawable size, as a window resize would
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Circles drawn across all frames
    pub fn total_draw_calls(&self) -> u64 {
        self.total_draw_calls
    }

    /// Circles drawn since the last `begin_frame`
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Color of the last `clear`
    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }
}

impl Renderer for HeadlessRenderer {
    fn should_close(&self) -> bool {
        self.max_frames.map_or(false, |max| self.frames >= max)
    }

    fn begin_frame(&mut self) {
        self.calls.clear();
        self.frame_start = Some(Instant::now());
    }

    fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            if let Some(target) = self.target_frame_time {
                let spent = start.elapsed();
                thread::sleep(target.saturating_sub(spent));
            }
            self.last_frame_time = start.elapsed().as_secs_f32();
        }
        self.frames += 1;
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = Some(color);
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.total_draw_calls += 1;
        self.calls.push(DrawCall {
            x,
            y,
            radius,
            color,
        });
    }

    fn draw_fps(&mut self, _x: i32, _y: i32) {
        if self.last_frame_time > 0.0 {
            log::trace!("fps: {:.0}", 1.0 / self.last_frame_time);
        }
    }

    fn frame_time(&self) -> f32 {
        self.last_frame_time
    }

    fn screen_width(&self) -> i32 {
        self.width
    }

    fn screen_height(&self) -> i32 {
        self.height
    }
}
