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
//! One-shot timers and elapsed-time measurement
//!
//! Timers are polled, not threaded: the foreground loop ticks them once per
//! frame and a due timer runs its callback synchronously on that thread.
//! Callbacks are closures that carry their own state.

use std::fmt;
use std::time::{Duration, Instant};

/// Identifier of a timer inside a [`TimerSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A callback that fires once after a delay
pub struct OneShotTimer {
    started: Instant,
    duration: Duration,
    callback: Option<Box<dyn FnOnce()>>,
}

impl OneShotTimer {
    /// Start a timer that fires `callback` once `duration` has elapsed
    pub fn start(duration: Duration, callback: impl FnOnce() + 'static) -> Self {
        Self::start_at(Instant::now(), duration, callback)
    }

    /// Start a timer measured from `started`
    pub fn start_at(started: Instant, duration: Duration, callback: impl FnOnce() + 'static) -> Self {
        OneShotTimer {
            started,
            duration,
            callback: Some(Box::new(callback)),
        }
    }

    /// Fire the callback if due; returns whether it fired on this call
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) against an explicit clock reading
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.started) < self.duration {
            return false;
        }
        match self.callback.take() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Whether the callback has yet to fire
    pub fn is_pending(&self) -> bool {
        self.callback.is_some()
    }

    /// Configured delay
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Debug for OneShotTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotTimer")
            .field("started", &self.started)
            .field("duration", &self.duration)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// A group of one-shot timers ticked together
#[derive(Debug, Default)]
pub struct TimerSet {
    next_id: u64,
    timers: Vec<(TimerId, OneShotTimer)>,
}

impl TimerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer and return its id
    pub fn start(&mut self, duration: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        self.insert(OneShotTimer::start(duration, callback))
    }

    /// Add an already-started timer
    pub fn insert(&mut self, timer: OneShotTimer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push((id, timer));
        id
    }

    /// Tick every timer, dropping the ones that fired
    pub fn tick(&mut self) -> usize {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) against an explicit clock reading
    pub fn tick_at(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        for (_, timer) in &mut self.timers {
            if timer.tick_at(now) {
                fired += 1;
            }
        }
        self.timers.retain(|(_, timer)| timer.is_pending());
        fired
    }

    /// Whether timer `id` has yet to fire
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|(timer_id, _)| *timer_id == id)
    }

    /// Number of timers that have yet to fire
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

/// Wall-clock interval measurement
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start measuring now
    pub fn start() -> Self {
        Stopwatch {
            started: Instant::now(),
        }
    }

    /// Time since `start`
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Format a duration as `"<seconds>s <milliseconds>ms"`, e.g. `"2s 345ms"`
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}s {}ms", elapsed.as_secs(), elapsed.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_one_shot_fires_exactly_once() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let start = Instant::now();
        let mut timer = OneShotTimer::start_at(start, Duration::from_millis(100), move || {
            counter.set(counter.get() + 1)
        });

        assert!(!timer.tick_at(start + Duration::from_millis(50)));
        assert!(timer.is_pending());
        assert!(timer.tick_at(start + Duration::from_millis(100)));
        assert!(!timer.tick_at(start + Duration::from_millis(200)));
        assert_eq!(count.get(), 1);
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_timer_set_drops_fired_timers() {
        let start = Instant::now();
        let fired = Rc::new(Cell::new(0));
        let mut timers = TimerSet::new();

        let f1 = Rc::clone(&fired);
        let early = timers.insert(OneShotTimer::start_at(start, Duration::from_secs(1), move || {
            f1.set(f1.get() + 1)
        }));
        let f2 = Rc::clone(&fired);
        let late = timers.insert(OneShotTimer::start_at(start, Duration::from_secs(3), move || {
            f2.set(f2.get() + 10)
        }));

        assert_eq!(timers.tick_at(start + Duration::from_secs(2)), 1);
        assert!(!timers.is_pending(early));
        assert!(timers.is_pending(late));
        assert_eq!(timers.pending(), 1);

        assert_eq!(timers.tick_at(start + Duration::from_secs(3)), 1);
        assert_eq!(timers.pending(), 0);
        assert_eq!(fired.get(), 11);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(2345)), "2s 345ms");
        assert_eq!(format_elapsed(Duration::from_micros(999)), "0s 0ms");
    }

    #[test]
    fn test_stopwatch_advances() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(2));
        assert!(watch.elapsed() >= Duration::from_millis(2));
    }
}
