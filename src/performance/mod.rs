//! # Performance Metrics System
//!
//! Tracks how fast the simulation is actually advancing, as opposed to the
//! rate it was asked to run at.
//!
//! ## Features
//!
//! - **Tick Tracking**: Interval between generations and the resulting rate
//! - **Step Timing**: Time spent inside each step (GPU submit and wait)
//!
//! ## Usage
//!
//! ```rust
//! use glow_life::performance::PerformanceMonitor;
//! use std::time::{Duration, Instant};
//!
//! let mut monitor = PerformanceMonitor::new();
//! let start = Instant::now();
//!
//! // In the animation loop, once per generation
//! monitor.record_tick(start);
//! monitor.record_tick(start + Duration::from_millis(100));
//!
//! assert!((monitor.get_metrics().fps - 10.0).abs() < 0.01);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rate metrics over the most recent window of ticks
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Measured generations per second
    pub fps: f32,
    /// Average interval between generations in milliseconds
    pub frame_time_ms: f32,
    /// Minimum interval in the current window
    pub min_frame_time_ms: f32,
    /// Maximum interval in the current window
    pub max_frame_time_ms: f32,
    /// Average time spent inside a step in milliseconds
    pub step_time_ms: f32,
    /// Ticks recorded since the last reset
    pub total_ticks: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            step_time_ms: 0.0,
            total_ticks: 0,
        }
    }
}

/// Performance monitoring system
pub struct PerformanceMonitor {
    /// Ring buffer of recent tick intervals for averaging
    frame_times: VecDeque<Duration>,
    /// Ring buffer of recent step durations
    step_times: VecDeque<Duration>,
    /// Maximum number of samples to keep for averaging
    max_samples: usize,
    /// Time of the previous tick
    last_tick: Option<Instant>,
    /// Current performance metrics
    current_metrics: PerformanceMetrics,
}

impl PerformanceMonitor {
    /// Create a new performance monitor
    pub fn new() -> Self {
        Self::with_config(120) // ~2 seconds at 60fps
    }

    /// Create a new performance monitor averaging over `max_samples` ticks
    pub fn with_config(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            step_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_tick: None,
            current_metrics: PerformanceMetrics::default(),
        }
    }

    /// Mark that a generation was produced at `now`
    pub fn record_tick(&mut self, now: Instant) {
        if let Some(previous) = self.last_tick.replace(now) {
            let interval = now.saturating_duration_since(previous);
            push_sample(&mut self.frame_times, interval, self.max_samples);
        }
        self.current_metrics.total_ticks += 1;
        self.update_metrics();
    }

    /// Record how long one step took
    pub fn record_step_time(&mut self, duration: Duration) {
        push_sample(&mut self.step_times, duration, self.max_samples);
        self.current_metrics.step_time_ms = average_ms(&self.step_times);
    }

    /// Forget the previous tick so a pause is not counted as a slow frame
    pub fn pause(&mut self) {
        self.last_tick = None;
    }

    /// Update calculated metrics
    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let avg_frame_time_ms = average_ms(&self.frame_times);
        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    /// Get current performance metrics
    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Get tick interval history in milliseconds
    pub fn get_frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.step_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.last_tick = None;
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn push_sample(samples: &mut VecDeque<Duration>, sample: Duration, max_samples: usize) {
    if samples.len() >= max_samples {
        samples.pop_front();
    }
    samples.push_back(sample);
}

fn average_ms(samples: &VecDeque<Duration>) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: Duration = samples.iter().sum();
    (total / samples.len() as u32).as_secs_f32() * 1000.0
}
