//! Core engine – scroll physics, scroll-to and zoom animation, readback and
//! grid layout, driven one frame at a time.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Rendering
//! happens behind the [`surface::Surface`] trait.

pub mod engine;
pub mod grid;
pub mod physics;
pub mod readback;
pub mod scroll_to;
pub mod surface;
pub mod zoom;
