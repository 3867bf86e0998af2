//! Pointer velocity tracking for drag release.
//!
//! Keeps the samples of the current drag and estimates the release velocity
//! from the ones inside a short horizon, so a drag that paused before the
//! release does not fling.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Only samples this recent count toward the release velocity.
const HORIZON: Duration = Duration::from_millis(100);
/// No movement for this long means the pointer had stopped.
const ASSUME_STOPPED: Duration = Duration::from_millis(40);
const MAX_SAMPLES: usize = 20;

/// Samples of one drag gesture in normalized drag units.
#[derive(Debug, Default)]
pub struct DragTracker {
    samples: VecDeque<(Instant, f32)>,
    origin: Option<f32>,
    furthest: f32,
}

impl DragTracker {
    pub fn begin(&mut self, now: Instant, position: f32) {
        self.samples.clear();
        self.origin = Some(position);
        self.furthest = 0.0;
        self.push(now, position);
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn push(&mut self, now: Instant, position: f32) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((now, position));
        if let Some(origin) = self.origin {
            self.furthest = self.furthest.max((position - origin).abs());
        }
    }

    /// Largest distance from the press point seen during the gesture.
    pub fn travel(&self) -> f32 {
        self.furthest
    }

    /// End the gesture and return the release velocity in units / second.
    pub fn finish(&mut self, now: Instant) -> f32 {
        let velocity = self.velocity(now);
        self.samples.clear();
        self.origin = None;
        velocity
    }

    fn velocity(&self, now: Instant) -> f32 {
        let Some(&(last_t, last_p)) = self.samples.back() else {
            return 0.0;
        };
        if now.saturating_duration_since(last_t) > ASSUME_STOPPED {
            return 0.0;
        }

        let first = self
            .samples
            .iter()
            .find(|(t, _)| last_t.saturating_duration_since(*t) <= HORIZON);
        match first {
            Some(&(first_t, first_p)) if first_t < last_t => {
                let dt = (last_t - first_t).as_secs_f32();
                (last_p - first_p) / dt
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn steady_drag_reports_its_speed() {
        let t0 = Instant::now();
        let mut tracker = DragTracker::default();
        tracker.begin(t0, 0.8);
        tracker.push(t0 + ms(20), 0.78);
        tracker.push(t0 + ms(40), 0.76);
        tracker.push(t0 + ms(60), 0.74);

        let v = tracker.finish(t0 + ms(70));
        assert!((v + 1.0).abs() < 1e-3, "{v}");
        assert!(!tracker.is_active());
    }

    #[test]
    fn old_samples_fall_outside_the_horizon() {
        let t0 = Instant::now();
        let mut tracker = DragTracker::default();
        tracker.begin(t0, 0.0);
        tracker.push(t0 + ms(500), 0.5);
        tracker.push(t0 + ms(550), 0.6);

        // Only the last two samples count: 0.1 over 50 ms.
        let v = tracker.finish(t0 + ms(560));
        assert!((v - 2.0).abs() < 1e-3, "{v}");
    }

    #[test]
    fn pause_before_release_means_no_fling() {
        let t0 = Instant::now();
        let mut tracker = DragTracker::default();
        tracker.begin(t0, 0.5);
        tracker.push(t0 + ms(20), 0.4);
        assert_eq!(tracker.finish(t0 + ms(200)), 0.0);
    }

    #[test]
    fn single_sample_has_no_velocity() {
        let t0 = Instant::now();
        let mut tracker = DragTracker::default();
        tracker.begin(t0, 0.5);
        assert_eq!(tracker.finish(t0), 0.0);
    }

    #[test]
    fn travel_tracks_the_furthest_excursion() {
        let t0 = Instant::now();
        let mut tracker = DragTracker::default();
        tracker.begin(t0, 0.5);
        tracker.push(t0 + ms(10), 0.7);
        tracker.push(t0 + ms(20), 0.5);
        assert!((tracker.travel() - 0.2).abs() < 1e-6);
    }
}
