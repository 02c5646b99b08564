//! Fixed-rate driver for a [`Simulation`]
//!
//! The animator is a cooperative timer: the host loop calls
//! [`Animator::poll`] whenever it wakes up, and a step runs only once the
//! interval since the previous step has elapsed. The next deadline is armed
//! after the step returns, so steps never overlap.

use std::time::{Duration, Instant};

use crate::error::{LifeError, LifeResult};
use crate::performance::{PerformanceMetrics, PerformanceMonitor};
use crate::simulation::traits::Simulation;

pub struct Animator {
    target_fps: f32,
    interval: Duration,
    /// `None` while stopped
    next_deadline: Option<Instant>,
    monitor: PerformanceMonitor,
}

impl Animator {
    /// A stopped animator targeting `target_fps` steps per second
    pub fn new(target_fps: f32) -> LifeResult<Self> {
        Ok(Self {
            target_fps,
            interval: interval_for(target_fps)?,
            next_deadline: None,
            monitor: PerformanceMonitor::new(),
        })
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// When the next step is due, if running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// First step fires one interval after `now`; no-op if already running
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.next_deadline = Some(now + self.interval);
        log::info!("Animation started at {} fps", self.target_fps);
    }

    pub fn stop(&mut self) {
        if self.next_deadline.take().is_some() {
            self.monitor.pause();
            log::info!("Animation stopped");
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Changes the rate, restarting the timer if it was running
    pub fn change_target_framerate(&mut self, target_fps: f32, now: Instant) -> LifeResult<()> {
        let interval = interval_for(target_fps)?;
        let was_running = self.is_running();

        self.stop();
        self.target_fps = target_fps;
        self.interval = interval;
        self.monitor.reset();

        if was_running {
            self.start(now);
        }
        Ok(())
    }

    /// Steps `simulation` if running and due; returns whether it stepped
    ///
    /// A step that fails stops the animator before the error is returned.
    pub fn poll<S: Simulation + ?Sized>(
        &mut self,
        now: Instant,
        simulation: &mut S,
    ) -> LifeResult<bool> {
        match self.next_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return Ok(false),
        }

        self.run_step(now, simulation)?;

        // Fall back to now-relative timing rather than bursting to catch up
        let next = deadline_after(self.next_deadline, self.interval, now);
        if self.is_running() {
            self.next_deadline = Some(next);
        }
        Ok(true)
    }

    /// One step regardless of the timer, for single-stepping while stopped
    pub fn step_once<S: Simulation + ?Sized>(
        &mut self,
        now: Instant,
        simulation: &mut S,
    ) -> LifeResult<()> {
        self.run_step(now, simulation)
    }

    fn run_step<S: Simulation + ?Sized>(
        &mut self,
        now: Instant,
        simulation: &mut S,
    ) -> LifeResult<()> {
        let started = Instant::now();
        if let Err(e) = simulation.step() {
            log::error!("Step of '{}' failed: {}", simulation.name(), e);
            self.stop();
            return Err(e);
        }
        self.monitor.record_step_time(started.elapsed());
        self.monitor.record_tick(now);
        Ok(())
    }

    /// Measured steps per second
    pub fn measured_fps(&self) -> f32 {
        self.monitor.get_metrics().fps
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.monitor.get_metrics()
    }
}

fn interval_for(target_fps: f32) -> LifeResult<Duration> {
    if !target_fps.is_finite() || target_fps <= 0.0 {
        return Err(LifeError::config(format!(
            "target frame rate must be positive, got {}",
            target_fps
        )));
    }
    Ok(Duration::from_secs_f64(1.0 / target_fps as f64))
}

fn deadline_after(previous: Option<Instant>, interval: Duration, now: Instant) -> Instant {
    match previous {
        Some(deadline) if deadline + interval > now => deadline + interval,
        _ => now + interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        steps: u32,
        fail: bool,
    }

    impl Simulation for Counter {
        fn step(&mut self) -> LifeResult<()> {
            if self.fail {
                return Err(LifeError::draw("counter", "boom"));
            }
            self.steps += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    #[test]
    fn stopped_animator_never_steps() {
        let mut animator = Animator::new(10.0).unwrap();
        let mut counter = Counter::default();
        let now = Instant::now();

        assert!(!animator.poll(now + Duration::from_secs(5), &mut counter).unwrap());
        assert_eq!(counter.steps, 0);
    }

    #[test]
    fn steps_only_after_interval() {
        let mut animator = Animator::new(10.0).unwrap();
        let mut counter = Counter::default();
        let t0 = Instant::now();
        animator.start(t0);

        assert!(!animator.poll(t0 + Duration::from_millis(50), &mut counter).unwrap());
        assert!(animator.poll(t0 + Duration::from_millis(100), &mut counter).unwrap());
        assert!(!animator.poll(t0 + Duration::from_millis(150), &mut counter).unwrap());
        assert!(animator.poll(t0 + Duration::from_millis(200), &mut counter).unwrap());
        assert_eq!(counter.steps, 2);
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut animator = Animator::new(10.0).unwrap();
        let mut counter = Counter::default();
        let t0 = Instant::now();
        animator.start(t0);

        let late = t0 + Duration::from_secs(2);
        assert!(animator.poll(late, &mut counter).unwrap());
        assert!(!animator.poll(late, &mut counter).unwrap());
        assert_eq!(animator.next_deadline(), Some(late + Duration::from_millis(100)));
    }

    #[test]
    fn toggle_flips_running_state() {
        let mut animator = Animator::new(1.0).unwrap();
        let now = Instant::now();
        animator.toggle(now);
        assert!(animator.is_running());
        animator.toggle(now);
        assert!(!animator.is_running());
    }

    #[test]
    fn changing_rate_restarts_running_timer() {
        let mut animator = Animator::new(1.0).unwrap();
        let t0 = Instant::now();
        animator.start(t0);

        let t1 = t0 + Duration::from_millis(300);
        animator.change_target_framerate(4.0, t1).unwrap();

        assert!(animator.is_running());
        assert_eq!(animator.interval(), Duration::from_millis(250));
        assert_eq!(animator.next_deadline(), Some(t1 + Duration::from_millis(250)));
    }

    #[test]
    fn changing_rate_keeps_stopped_timer_stopped() {
        let mut animator = Animator::new(1.0).unwrap();
        animator.change_target_framerate(60.0, Instant::now()).unwrap();
        assert!(!animator.is_running());
    }

    #[test]
    fn invalid_rate_is_rejected() {
        assert!(Animator::new(0.0).is_err());
        assert!(Animator::new(f32::NAN).is_err());
        let mut animator = Animator::new(1.0).unwrap();
        assert!(animator.change_target_framerate(-1.0, Instant::now()).is_err());
        assert_eq!(animator.target_fps(), 1.0);
    }

    #[test]
    fn failed_step_stops_animation() {
        let mut animator = Animator::new(10.0).unwrap();
        let mut counter = Counter {
            fail: true,
            ..Default::default()
        };
        let t0 = Instant::now();
        animator.start(t0);

        assert!(animator.poll(t0 + Duration::from_secs(1), &mut counter).is_err());
        assert!(!animator.is_running());
    }

    #[test]
    fn measured_rate_follows_ticks() {
        let mut animator = Animator::new(10.0).unwrap();
        let mut counter = Counter::default();
        let t0 = Instant::now();
        animator.start(t0);

        for i in 1..=5 {
            animator
                .poll(t0 + Duration::from_millis(100 * i), &mut counter)
                .unwrap();
        }
        assert!((animator.measured_fps() - 10.0).abs() < 0.1);
    }
}
