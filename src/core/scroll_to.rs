//! Fixed-duration eased transition to an explicit scroll position.
//!
//! While active it replaces the free-running integrator; velocity is held
//! at zero for the whole transition.

use std::f32::consts::PI;

/// Duration of one programmatic page move, in seconds.
pub const SCROLL_TO_DURATION: f32 = 0.2;

/// Half-cosine ease-in-out over `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    ((t + 1.0) * PI).cos() * 0.5 + 0.5
}

/// An in-flight (or idle) scroll-to animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTo {
    /// Seconds left.  Zero means idle.
    remaining: f32,
    total: f32,
    start: f32,
    target: f32,
}

impl Default for ScrollTo {
    fn default() -> Self {
        Self::new(SCROLL_TO_DURATION)
    }
}

impl ScrollTo {
    pub fn new(total: f32) -> Self {
        Self {
            remaining: 0.0,
            total,
            start: 0.0,
            target: 0.0,
        }
    }

    /// Start moving from `start` to `target`, replacing any previous move.
    pub fn begin(&mut self, start: f32, target: f32) {
        self.remaining = self.total;
        self.start = start;
        self.target = target;
    }

    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining != 0.0
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Position for this tick, then consume `dt`.  The final tick lands
    /// exactly on the target and deactivates the animation.
    pub fn step(&mut self, dt: f32, min: f32, max: f32) -> f32 {
        let target = self.target.clamp(min, max);
        let elapsed = (self.total - self.remaining) / self.total;
        let mut position = self.start + (target - self.start) * ease_in_out(elapsed);

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            position = target;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_runs_from_zero_to_one() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);

        let mut last = 0.0;
        for i in 1..=20 {
            let v = ease_in_out(i as f32 / 20.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn lands_exactly_on_target() {
        let mut anim = ScrollTo::default();
        anim.begin(1.0, 2.0);
        assert!(anim.is_active());

        let mut position = 1.0;
        let mut ticks = 0;
        while anim.is_active() {
            position = anim.step(1.0 / 30.0, -0.49, 3.49);
            ticks += 1;
            assert!(ticks <= 7);
        }
        assert_eq!(position, 2.0);
    }

    #[test]
    fn first_step_starts_at_origin() {
        let mut anim = ScrollTo::default();
        anim.begin(3.0, 0.0);
        assert_eq!(anim.step(0.05, -0.49, 3.49), 3.0);
        let mid = anim.step(0.05, -0.49, 3.49);
        assert!(mid < 3.0 && mid > 0.0);
    }

    #[test]
    fn target_is_clamped_to_bounds() {
        let mut anim = ScrollTo::default();
        anim.begin(0.0, 10.0);
        assert_eq!(anim.step(1.0, -0.49, 2.49), 2.49);
        assert!(!anim.is_active());
    }

    #[test]
    fn cancel_deactivates() {
        let mut anim = ScrollTo::default();
        anim.begin(0.0, 1.0);
        anim.cancel();
        assert!(!anim.is_active());
    }
}
