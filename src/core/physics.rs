//! Scroll integrator: table-driven page attraction, friction and boundary
//! damping, plus the drag and fling gesture math that feeds it.
//!
//! Positions are measured in pages (one row-group of icons).  The tables are
//! sampled through `frac(position + 0.5)`, so a normalized table position of
//! 0.5 is the page center and 0.0 / 1.0 are the edges between two pages.

// ───────────────────────────────────────── constants ─────────

/// Pull toward the page center, from one page edge to the next.
pub const ATTRACTION_TABLE: [f32; 9] = [
    20.0, 20.0, 20.0, 10.0, -10.0, -20.0, -20.0, -20.0, -20.0, // dup 7
];

/// Velocity loss across a page cell, strongest around the center.
pub const FRICTION_TABLE: [f32; 9] = [
    10.0, 10.0, 11.0, 15.0, 15.0, 11.0, 10.0, 10.0, 10.0, // dup 7
];

/// Interpolation intervals covered by the tables.  Entry 8 duplicates entry
/// 7 so `index + 1` is always in range.
const TABLE_SPAN: f32 = 7.0;

/// Below this speed the centering force always applies.  Above it, only
/// when it opposes the motion, so a strong fling is not fought.
const ASSIST_SPEED: f32 = 4.0;

/// How far past the first / last page the position may peek.
pub const BOUNDARY_PEEK: f32 = 0.49;
const BOUNDARY_DAMPING: f32 = 4.0;
const MAX_BOUNDARY_DAMP: f32 = 0.9;

/// Pages moved per unit of drag coordinate.
pub const DRAG_SENSITIVITY: f32 = 5.2;
const FLING_GAIN: f32 = 4.0;
const FLING_MIN_VELOCITY: f32 = 3.5;
const FLING_CENTER_MODULATION: f32 = 0.45;
/// Release speeds at or below this are treated as "no fling".
const FLING_DEAD_SPEED: f32 = 0.2;

// ───────────────────────────────────────── state ─────────────

/// Position (pages) and velocity (pages / second) of the scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub position: f32,
    pub velocity: f32,
}

/// Fractional part in `[0, 1)`, also for negative inputs.
pub fn frac(x: f32) -> f32 {
    x - x.floor()
}

/// Inclusive position bounds for a grid whose last page is `max_position`.
pub fn bounds(max_position: i32) -> (f32, f32) {
    (-BOUNDARY_PEEK, max_position as f32 + BOUNDARY_PEEK)
}

// ───────────────────────────────────────── table lookup ──────

/// Forces sampled for one tick, already scaled by `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSample {
    /// Normalized position inside the current page cell, `[0, 1)`.
    pub table_pos: f32,
    pub accel: f32,
    pub friction: f32,
}

/// Look up attraction and friction for `position`, linearly interpolated
/// between the two bracketing table entries.
pub fn sample(position: f32, dt: f32) -> PhysicsSample {
    let table_pos = frac(position + 0.5);
    let scaled = table_pos * TABLE_SPAN;
    let index = (scaled as usize).min(TABLE_SPAN as usize);
    let t = scaled - index as f32;

    PhysicsSample {
        table_pos,
        accel: lerp(ATTRACTION_TABLE[index], ATTRACTION_TABLE[index + 1], t) * dt,
        friction: lerp(FRICTION_TABLE[index], FRICTION_TABLE[index + 1], t) * dt,
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ───────────────────────────────────────── integration ───────

/// Advance `state` by one free-running physics step.
pub fn integrate(state: &mut ScrollState, forces: PhysicsSample, dt: f32, max_position: i32) {
    let PhysicsSample {
        table_pos,
        accel,
        friction,
    } = forces;

    if state.velocity.abs() < ASSIST_SPEED || state.velocity * accel < 0.0 {
        state.velocity += accel;
    }

    // Friction shrinks the magnitude but never flips the sign.
    if state.velocity > 0.0 {
        state.velocity = (state.velocity - friction).max(0.0);
    } else {
        state.velocity = (state.velocity + friction).min(0.0);
    }

    // Dead zone: forces are too weak to finish the job, so either snap or
    // crawl toward the center at exactly the friction speed.
    if friction > state.velocity.abs() && friction > accel.abs() {
        let offset = table_pos - 0.5;
        if offset.abs() < friction * dt {
            state.position = state.position.round();
            state.velocity = 0.0;
        } else if offset > 0.0 {
            state.velocity = -friction;
        } else {
            state.velocity = friction;
        }
    }

    let max = max_position as f32;
    if state.position < 0.0 && state.velocity < 0.0 {
        let damp = (1.0 + state.position * BOUNDARY_DAMPING).clamp(0.0, MAX_BOUNDARY_DAMP);
        state.velocity *= damp;
    }
    if state.position > max && state.velocity > 0.0 {
        let damp = (1.0 - (state.position - max) * BOUNDARY_DAMPING).clamp(0.0, MAX_BOUNDARY_DAMP);
        state.velocity *= damp;
    }

    let (lo, hi) = bounds(max_position);
    state.position = (state.position + state.velocity * dt).clamp(lo, hi);
}

// ───────────────────────────────────────── gestures ──────────

/// Apply one drag sample.  `delta` is the change of the drag coordinate
/// since the previous sample; moving the pointer up scrolls forward.
pub fn drag(state: &mut ScrollState, delta: f32, max_position: i32) {
    let (lo, hi) = bounds(max_position);
    state.velocity = 0.0;
    state.position = (state.position - delta * DRAG_SENSITIVITY).clamp(lo, hi);
}

/// Smallest launch speed a real fling gets at `position`.  Slightly lower
/// near a page edge, where less distance remains to the next center.
pub fn fling_floor(position: f32) -> f32 {
    let edge_distance = (frac(position + 0.5) - 0.5).abs();
    FLING_MIN_VELOCITY * (1.0 - edge_distance * FLING_CENTER_MODULATION)
}

/// Launch the scroll from a release `velocity` (drag units / second).
pub fn fling(state: &mut ScrollState, velocity: f32, max_position: i32) {
    state.velocity = -velocity * FLING_GAIN;

    let speed = state.velocity.abs();
    let floor = fling_floor(state.position);
    if speed < floor && speed > FLING_DEAD_SPEED {
        state.velocity = floor.copysign(state.velocity);
    }

    if state.position <= 0.0 {
        state.velocity = state.velocity.max(0.0);
    }
    if state.position > max_position as f32 {
        state.velocity = state.velocity.min(0.0);
    }
}
