//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::engine::Engine;
use crate::core::readback::{ReadbackPacket, Snapshot};
use crate::ui::grid_widget::{GridFrame, TerminalSurface};

use super::gesture::DragTracker;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Grid,
    SettingsMenu,
}

/// Top-level application state.
pub struct AppState {
    pub engine: Engine,
    /// One label per icon, indexed like the engine's icons.
    pub labels: Vec<String>,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Draw (and tick the engine) on the next frame boundary.
    pub needs_frame: bool,
    /// Repaint the chrome over the last engine frame without advancing it.
    pub needs_repaint: bool,
    /// What the engine returned from its last tick.
    pub animating: bool,
    pub frames_drawn: u64,
    /// Last frame the engine drew, kept for mouse hit testing.
    pub last_frame: GridFrame,
    pub drag: DragTracker,
    /// Latest readback from the engine.
    pub readback: Option<Snapshot>,
}

impl AppState {
    pub fn new(engine: Engine, labels: Vec<String>, config: AppConfig) -> Self {
        Self {
            engine,
            labels,
            config,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
            needs_frame: true,
            needs_repaint: false,
            animating: false,
            frames_drawn: 0,
            last_frame: GridFrame::default(),
            drag: DragTracker::default(),
            readback: None,
        }
    }

    /// Advance the engine one frame into a surface covering `area`.
    pub fn tick_engine(&mut self, area: Rect) {
        let mut surface = TerminalSurface::new(area, &self.labels);
        self.animating = self.engine.on_tick(&mut surface);
        self.needs_frame = self.animating;
        self.frames_drawn = self.frames_drawn.wrapping_add(1);
        self.last_frame = surface.into_frame();
    }

    /// Record a readback packet; the status bar shows it on the next frame
    /// boundary even when the engine is at rest.
    pub fn apply_readback(&mut self, packet: ReadbackPacket) {
        self.readback = Some(packet.unpack());
        self.needs_repaint = true;
    }

    /// Host-side label for an icon, e.g. for status messages.
    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("?")
    }
}
