//! Time management utilities
//!
//! [`Timer`] measures wall-clock frame time for the main loop.
//! [`TimerManager`] runs delayed and repeating tasks on simulated time.

use slotmap::{new_key_type, SlotMap};
use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Restart measuring from now without touching the totals
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Update the timer (should be called once per frame)
    ///
    /// Returns the elapsed seconds since the previous call.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

new_key_type! {
    /// Handle to a task scheduled on a [`TimerManager`]
    pub struct TimerKey;
}

/// Callback run when a scheduled task comes due
pub type TimerCallback = Box<dyn FnMut() + Send>;

struct TimerTask {
    callback: TimerCallback,
    delay: f32,
    repeat: bool,
    elapsed: f32,
}

/// Schedules delayed or repeating tasks driven by the engine tick
///
/// Tasks fire from inside [`TimerManager::update`], on the tick thread.
#[derive(Default)]
pub struct TimerManager {
    tasks: SlotMap<TimerKey, TimerTask>,
}

impl TimerManager {
    /// Create an empty timer manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` to run after `delay` seconds
    ///
    /// Repeating tasks restart their countdown each time they fire.
    pub fn schedule<F>(&mut self, delay: f32, repeat: bool, callback: F) -> TimerKey
    where
        F: FnMut() + Send + 'static,
    {
        self.tasks.insert(TimerTask {
            callback: Box::new(callback),
            delay: delay.max(0.0),
            repeat,
            elapsed: 0.0,
        })
    }

    /// Cancel a pending task; returns false if it already finished or never existed
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.tasks.remove(key).is_some()
    }

    /// Check whether a task is still pending
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.tasks.contains_key(key)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance every task and run the ones that came due
    pub fn update(&mut self, delta_time: f32) {
        let mut finished = Vec::new();

        for (key, task) in &mut self.tasks {
            task.elapsed += delta_time;
            if task.elapsed >= task.delay {
                (task.callback)();
                if task.repeat {
                    task.elapsed = 0.0;
                } else {
                    finished.push(key);
                }
            }
        }

        for key in finished {
            self.tasks.remove(key);
        }
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
