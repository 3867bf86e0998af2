//! A scrollable, zoomable app grid in the terminal.
//!
//! Drag with the mouse to scroll, release quickly to fling, and press `z`
//! to zoom the grid in and out.  Run with `--help` for the engine switches.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::engine::{Engine, SystemClock};
use crate::core::readback::ReadbackPacket;
use crate::ui::{
    grid_widget::GridWidget, layout::AppLayout, popup, spinner::MotionIndicator, theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scrollable, zoomable app grid")]
struct Cli {
    /// Number of icons in the grid.
    #[arg(long, default_value_t = 60)]
    icons: usize,

    /// Frame interval in milliseconds (overrides the config file).
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,

    /// Skip the invisible warm-up frame at startup.
    #[arg(long = "no-warm-up")]
    no_warm_up: bool,

    /// Stop scheduling frames as soon as motion stops.
    #[arg(long = "no-extra-frame")]
    no_extra_frame: bool,

    /// Push readback every frame, even when nothing changed.
    #[arg(long = "always-readback")]
    always_readback: bool,

    /// Jump between zoom levels instead of animating.
    #[arg(long = "instant-zoom")]
    instant_zoom: bool,
}

impl Cli {
    fn apply(&self, config: &mut config::AppConfig) {
        if let Some(ms) = self.frame_ms {
            config.frame_interval_ms = ms.clamp(crate::config::MIN_FRAME_MS, crate::config::MAX_FRAME_MS);
        }
        if self.no_warm_up {
            config.warm_up_pass = false;
        }
        if self.no_extra_frame {
            config.extra_final_frame = false;
        }
        if self.always_readback {
            config.suppress_duplicate_readback = false;
        }
        if self.instant_zoom {
            config.animate_zoom = false;
        }
    }
}

// ───────────────────────────────────────── drawing ───────────

/// Paint the whole screen.  With `advance`, the engine ticks into the grid
/// area first; otherwise its last frame is painted again.
fn draw(frame: &mut Frame, state: &mut AppState, advance: bool) {
    let layout = AppLayout::from_area(frame.area());

    if advance {
        state.tick_engine(layout.grid_area);
    }
    state.needs_repaint = false;
    frame.render_widget(
        GridWidget::new(&state.last_frame, &state.labels),
        layout.grid_area,
    );
    frame.render_widget(
        MotionIndicator {
            visible: state.animating,
            tick: state.frames_drawn,
        },
        layout.grid_area,
    );

    let status = Paragraph::new(status_line(state)).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    if state.active_view == ActiveView::SettingsMenu {
        frame.render_widget(popup::SettingsPopup { state }, frame.area());
    }
}

fn status_line(state: &AppState) -> String {
    const HINT: &str = "drag/fling · ↑↓ page · ←→ select · z zoom · ? settings · q quit";

    let readback = state
        .readback
        .map(|s| {
            format!(
                " row {:>5.2}  vel {:>5.2}  zoom {:.2} │",
                s.position, s.velocity, s.zoom
            )
        })
        .unwrap_or_default();
    let message = state.status_message.as_deref().unwrap_or(HINT);
    format!("{readback} {message}")
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let mut user_config = config::AppConfig::load();
    cli.apply(&mut user_config);
    tracing::debug!(?user_config, icons = cli.icons, "starting");

    // ── engine ────────────────────────────────────────────────
    let (readback_tx, mut readback_rx) = tokio::sync::mpsc::unbounded_channel::<ReadbackPacket>();
    let mut engine = Engine::new(SystemClock::new(), user_config.policy());
    engine.set_icon_count(cli.icons);
    engine.set_observer(readback_tx);
    // Start hidden and zoom in.
    engine.set_zoom(1.0, user_config.animate_zoom);

    let labels = (1..=cli.icons).map(|i| format!("App {i:02}")).collect();
    let frame_interval = Duration::from_millis(user_config.frame_interval_ms);
    let mut state = AppState::new(engine, labels, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(frame_interval);

    // ── event loop ────────────────────────────────────────────
    // Frames are drawn only on ticks, and only while something asked for one.
    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize => state.needs_frame = true,
                    AppEvent::Tick => {
                        if state.needs_frame || state.needs_repaint {
                            let advance = state.needs_frame;
                            terminal.draw(|frame| draw(frame, &mut state, advance))?;
                        }
                    }
                }
            }

            Some(packet) = readback_rx.recv() => {
                state.apply_readback(packet);
                // Keep the newest value only.
                while let Ok(packet) = readback_rx.try_recv() {
                    state.apply_readback(packet);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_the_config() {
        let cli = Cli::parse_from([
            "app-grid",
            "--icons",
            "12",
            "--frame-ms",
            "500",
            "--no-warm-up",
            "--always-readback",
        ]);
        let mut config = config::AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.icons, 12);
        assert_eq!(config.frame_interval_ms, 100);
        assert!(!config.warm_up_pass);
        assert!(!config.suppress_duplicate_readback);
        assert!(config.extra_final_frame);
        assert!(config.animate_zoom);
    }

    #[test]
    fn status_line_shows_readback_and_hint() {
        let config = config::AppConfig::default();
        let engine = Engine::new(SystemClock::new(), config.policy());
        let mut state = AppState::new(engine, Vec::new(), config);
        assert!(status_line(&state).contains("q quit"));

        state.readback = Some(ReadbackPacket([65536, 0, 32768]).unpack());
        state.status_message = Some("Selected App 03".into());
        let line = status_line(&state);
        assert!(line.contains("row  1.00"));
        assert!(line.contains("zoom 0.50"));
        assert!(line.contains("Selected App 03"));
    }

    #[test]
    fn late_readback_repaints_the_status_without_ticking() {
        let config = config::AppConfig::default();
        let engine = Engine::new(SystemClock::new(), config.policy());
        let mut state = AppState::new(engine, Vec::new(), config);
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 24)).unwrap();

        terminal.draw(|frame| draw(frame, &mut state, true)).unwrap();
        assert_eq!(state.frames_drawn, 1);
        assert!(!state.needs_repaint);

        state.apply_readback(ReadbackPacket([2 * 65536, 0, 65536]));
        assert!(state.needs_repaint);
        terminal.draw(|frame| draw(frame, &mut state, false)).unwrap();

        assert_eq!(state.frames_drawn, 1);
        assert!(!state.needs_repaint);
        let buffer = terminal.backend().buffer();
        let bottom: String = (0..80).map(|x| buffer[(x, 23)].symbol()).collect();
        assert!(bottom.contains("row  2.00"), "{bottom}");
    }
}
