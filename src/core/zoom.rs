//! Zoom ramp: moves the zoom level toward its target at a fixed rate.

/// Zoom units per second.
pub const ZOOM_RATE: f32 = 1.7;
/// Targets (and levels) below this count as fully zoomed out.
pub const ZOOM_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Zoom {
    current: f32,
    target: f32,
}

impl Zoom {
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Request a new zoom level.  Without `animate` the level jumps there.
    pub fn set(&mut self, target: f32, animate: bool) {
        let target = target.clamp(0.0, 1.0);
        self.target = if target < ZOOM_EPSILON { 0.0 } else { target };
        if !animate {
            self.current = self.target;
        }
    }

    pub fn at_target(&self) -> bool {
        self.current == self.target
    }

    /// Both the level and the request are (near) zero: nothing to show.
    pub fn is_hidden(&self) -> bool {
        self.current < ZOOM_EPSILON && self.target < ZOOM_EPSILON
    }

    /// Advance one tick.  Returns `true` when the level changed.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.at_target() {
            return false;
        }
        let remaining = self.target - self.current;
        let dz = (dt * ZOOM_RATE).copysign(remaining);
        if remaining.abs() < dz.abs() {
            self.current = self.target;
        } else {
            self.current += dz;
        }
        true
    }

    /// Cubic ease of the zoom-out amount: 1 when hidden, 0 when fully in.
    pub fn blend(&self) -> f32 {
        (1.0 - self.current).powi(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_tiny_targets_to_zero() {
        let mut zoom = Zoom::default();
        zoom.set(0.0005, false);
        assert_eq!(zoom.target(), 0.0);
        assert_eq!(zoom.current(), 0.0);
        zoom.set(1.5, false);
        assert_eq!(zoom.current(), 1.0);
    }

    #[test]
    fn ramps_in_without_overshoot() {
        let mut zoom = Zoom::default();
        zoom.set(1.0, true);
        assert_eq!(zoom.current(), 0.0);

        let dt = 0.2;
        let bound = (1.0 / (ZOOM_RATE * dt)).ceil() as usize;
        let mut ticks = 0;
        let mut last = 0.0;
        while zoom.step(dt) {
            ticks += 1;
            assert!(zoom.current() >= last && zoom.current() <= 1.0);
            last = zoom.current();
        }
        assert_eq!(zoom.current(), 1.0);
        assert!(ticks <= bound, "{ticks} > {bound}");
    }

    #[test]
    fn ramps_toward_a_lower_target() {
        let mut zoom = Zoom::default();
        zoom.set(0.9, false);
        zoom.set(0.7, true);
        assert!(zoom.step(0.05));
        assert!(zoom.current() < 0.9);
        while zoom.step(0.05) {}
        assert_eq!(zoom.current(), 0.7);
    }

    #[test]
    fn blend_is_cubic() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.blend(), 1.0);
        zoom.set(0.5, false);
        assert!((zoom.blend() - 0.125).abs() < 1e-6);
        zoom.set(1.0, false);
        assert_eq!(zoom.blend(), 0.0);
    }

    #[test]
    fn hidden_only_when_level_and_target_are_zero() {
        let mut zoom = Zoom::default();
        assert!(zoom.is_hidden());
        zoom.set(1.0, true);
        assert!(!zoom.is_hidden());
    }
}
