//! Frame driver: owns the simulation record, applies gestures between
//! frames and advances everything once per tick.
//!
//! Each tick runs zoom, then either the scroll-to animation or the
//! integrator, then readback and layout, and finally decides whether the
//! host must schedule another frame.

use std::time::{Duration, Instant};

use super::grid::{self, GridCapacity, LayoutParams};
use super::physics::{self, ScrollState};
use super::readback::{Discard, ReadbackEmitter, ReadbackSink, Snapshot};
use super::scroll_to::ScrollTo;
use super::surface::{Rgba, SpriteKind, Surface};
use super::zoom::Zoom;

/// Longest step the integrator is trusted with, in seconds.
pub const MAX_DT: f32 = 0.2;
/// Step used after an idle gap, when the wall clock says nothing useful.
pub const IDLE_DT: f32 = 0.033;
/// Sprite tint during the warm-up pass: drawn, but not visibly.
const WARM_UP_TINT: Rgba = Rgba::black(0.001);

// ───────────────────────────────────────── clock ─────────────

/// Monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// ───────────────────────────────────────── policy ────────────

/// Rendering-backend workarounds and readback behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePolicy {
    /// Keep rendering one frame after motion stops, for backends that do
    /// not reliably present the last posted frame.
    pub extra_final_frame: bool,
    /// Run one invisible frame at startup so the backend preloads.
    pub warm_up_pass: bool,
    /// Skip readback when the values did not change since the last send.
    pub suppress_duplicate_readback: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            extra_final_frame: true,
            warm_up_pass: true,
            suppress_duplicate_readback: true,
        }
    }
}

// ───────────────────────────────────────── state ─────────────

/// The whole simulation record.  Mutated only by [`Engine`].
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub scroll: ScrollState,
    /// Last page index, recomputed every drawn frame.
    pub max_position: i32,
    pub capacity: GridCapacity,
    pub dragging: bool,
    /// Last drag coordinate reported by the host.
    pub last_drag: f32,
    pub zoom: Zoom,
    /// `(1 - zoom)^3`, refreshed every tick.
    pub blend: f32,
    pub scroll_to: ScrollTo,
    pub icon_count: usize,
    pub selected: Option<usize>,
    /// Whether the previous tick asked for another frame.
    continuation_latch: bool,
    warm_up_pending: bool,
    last_tick: Option<Duration>,
}

impl SimulationState {
    fn new(warm_up: bool) -> Self {
        Self {
            scroll: ScrollState::default(),
            max_position: 0,
            capacity: GridCapacity::PORTRAIT,
            dragging: false,
            last_drag: 0.0,
            zoom: Zoom::default(),
            blend: 1.0,
            scroll_to: ScrollTo::default(),
            icon_count: 0,
            selected: None,
            continuation_latch: false,
            warm_up_pending: warm_up,
            last_tick: None,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.scroll.position,
            velocity: self.scroll.velocity,
            zoom: self.zoom.current(),
        }
    }

    /// Anything still moving that needs another frame.
    fn in_motion(&self) -> bool {
        self.scroll.velocity != 0.0
            || physics::frac(self.scroll.position) != 0.0
            || !self.zoom.at_target()
            || self.scroll_to.is_active()
    }
}

// ───────────────────────────────────────── engine ────────────

/// Scroll / zoom engine for the app grid.
pub struct Engine<C: Clock = SystemClock> {
    state: SimulationState,
    policy: EnginePolicy,
    readback: ReadbackEmitter,
    observer: Box<dyn ReadbackSink>,
    clock: C,
}

impl<C: Clock> Engine<C> {
    pub fn new(clock: C, policy: EnginePolicy) -> Self {
        Self {
            state: SimulationState::new(policy.warm_up_pass),
            policy,
            readback: ReadbackEmitter::new(policy.suppress_duplicate_readback),
            observer: Box::new(Discard),
            clock,
        }
    }

    /// Register the readback observer, replacing any previous one.
    pub fn set_observer(&mut self, sink: impl ReadbackSink + 'static) {
        self.observer = Box::new(sink);
    }

    pub fn set_policy(&mut self, policy: EnginePolicy) {
        tracing::debug!(?policy, "engine policy");
        self.readback
            .set_suppress_duplicates(policy.suppress_duplicate_readback);
        if !policy.warm_up_pass {
            self.state.warm_up_pending = false;
        }
        self.policy = policy;
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn set_icon_count(&mut self, count: usize) {
        self.state.icon_count = count;
    }

    pub fn set_selected_icon(&mut self, selected: Option<usize>) {
        self.state.selected = selected.filter(|&i| i < self.state.icon_count);
    }

    pub fn scroll_position(&self) -> f32 {
        self.state.scroll.position
    }

    pub fn max_position(&self) -> i32 {
        self.state.max_position
    }

    pub fn zoom_target(&self) -> f32 {
        self.state.zoom.target()
    }

    pub fn is_scroll_to_active(&self) -> bool {
        self.state.scroll_to.is_active()
    }

    /// Where the running scroll-to is heading, if one is active.
    pub fn scroll_to_target(&self) -> Option<f32> {
        self.is_scroll_to_active()
            .then(|| self.state.scroll_to.target())
    }

    // ── gestures ────────────────────────────────────────────────

    /// Record a drag sample.  The first sample of a gesture only anchors the
    /// coordinate; later ones move the scroll.
    pub fn on_drag_move(&mut self, x: f32) {
        let state = &mut self.state;
        if state.dragging {
            physics::drag(&mut state.scroll, x - state.last_drag, state.max_position);
        }
        state.dragging = true;
        state.last_drag = x;
        state.scroll_to.cancel();
    }

    /// Release without a fling.  The integrator settles the position.
    pub fn on_touch_up(&mut self) {
        self.state.dragging = false;
    }

    /// Release with `velocity` (drag units / second).
    pub fn on_fling(&mut self, x: f32, velocity: f32) {
        let state = &mut self.state;
        state.dragging = false;
        state.last_drag = x;
        state.scroll_to.cancel();
        physics::fling(&mut state.scroll, velocity, state.max_position);
        tracing::debug!(
            release = velocity,
            launched = state.scroll.velocity,
            position = state.scroll.position,
            "fling"
        );
    }

    /// Ease to `target` over the fixed scroll-to duration.
    pub fn scroll_to(&mut self, target: f32) {
        let state = &mut self.state;
        state.dragging = false;
        state.scroll.velocity = 0.0;
        state.scroll_to.begin(state.scroll.position, target);
        tracing::debug!(from = state.scroll.position, to = target, "scroll to");
    }

    pub fn set_zoom(&mut self, target: f32, animate: bool) {
        self.state.zoom.set(target, animate);
        tracing::debug!(target = self.state.zoom.target(), animate, "set zoom");
        if !animate {
            self.state.blend = self.state.zoom.blend();
            self.state.continuation_latch = true;
            self.emit_readback();
        }
    }

    /// Arm the warm-up pass again, e.g. after the backend was recreated.
    pub fn reset_warm_up(&mut self) {
        self.state.warm_up_pending = self.policy.warm_up_pass;
    }

    // ── frame ───────────────────────────────────────────────────

    /// Advance one frame and draw it into `surface`.  Returns whether the
    /// host should schedule another frame.
    pub fn on_tick(&mut self, surface: &mut dyn Surface) -> bool {
        let dt = self.frame_dt();

        if self.state.zoom.step(dt) {
            self.emit_readback();
        }
        self.state.blend = self.state.zoom.blend();

        if self.state.zoom.is_hidden() && !self.state.warm_up_pending {
            surface.clear(Rgba::TRANSPARENT);
            if !self.state.dragging {
                self.state.scroll.position = 0.0;
            }
            return self.latch(false);
        }
        surface.clear(Rgba::black(self.state.zoom.current()));

        self.state.capacity = GridCapacity::for_viewport(surface.viewport());
        self.state.max_position = self.state.capacity.max_position(self.state.icon_count);
        // The range can shrink under a held drag (rotation, fewer icons).
        let (lo, hi) = physics::bounds(self.state.max_position);
        self.state.scroll.position = self.state.scroll.position.clamp(lo, hi);

        self.update_position(dt);
        self.emit_readback();
        self.draw(surface);

        if self.state.warm_up_pending {
            self.state.warm_up_pending = false;
            tracing::debug!("warm-up pass done");
            return true;
        }

        let moving = self.state.in_motion();
        tracing::trace!(
            dt,
            position = self.state.scroll.position,
            velocity = self.state.scroll.velocity,
            zoom = self.state.zoom.current(),
            moving,
            "tick"
        );
        self.latch(moving)
    }

    fn frame_dt(&mut self) -> f32 {
        let now = self.clock.now();
        let measured = self
            .state
            .last_tick
            .map(|last| now.saturating_sub(last).as_secs_f32());
        self.state.last_tick = Some(now);

        // After a frame that asked for nothing, the gap is idle time.
        let dt = match measured {
            Some(dt) if self.state.continuation_latch && dt > 0.0 => dt,
            _ => IDLE_DT,
        };
        dt.min(MAX_DT)
    }

    fn latch(&mut self, draw: bool) -> bool {
        let previous = std::mem::replace(&mut self.state.continuation_latch, draw);
        if self.policy.extra_final_frame {
            previous || draw
        } else {
            draw
        }
    }

    fn update_position(&mut self, dt: f32) {
        let state = &mut self.state;
        if state.dragging {
            return;
        }
        if state.scroll_to.is_active() {
            let (lo, hi) = physics::bounds(state.max_position);
            state.scroll.position = state.scroll_to.step(dt, lo, hi);
            state.scroll.velocity = 0.0;
            return;
        }
        let forces = physics::sample(state.scroll.position, dt);
        physics::integrate(&mut state.scroll, forces, dt, state.max_position);
    }

    fn emit_readback(&mut self) {
        let snapshot = self.state.snapshot();
        self.readback.emit(snapshot, &mut *self.observer);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let tint = if self.state.warm_up_pending {
            WARM_UP_TINT
        } else {
            Rgba::WHITE
        };
        let params = LayoutParams {
            position: self.state.scroll.position,
            blend: self.state.blend,
            icon_count: self.state.icon_count,
            selected: self.state.selected,
            tint,
        };

        for sprite in grid::layout_grid(&params, self.state.capacity, &*surface) {
            surface.draw(sprite);
        }
        if let Some(size) = surface.texture_size(SpriteKind::HomeButton) {
            let viewport = surface.viewport();
            surface.draw(grid::home_button(viewport, size, self.state.blend, tint));
        }
    }
}

#[cfg(test)]
impl<C: Clock> Engine<C> {
    pub fn scroll_velocity(&self) -> f32 {
        self.state.scroll.velocity
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom.current()
    }

    pub fn animation_blend(&self) -> f32 {
        self.state.blend
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }
}
