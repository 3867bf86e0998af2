//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::surface::Rgba;

/// Wallpaper shown behind the grid when it is zoomed out.
const WALLPAPER: (f32, f32, f32) = (52.0, 58.0, 78.0);

/// Central theme. Change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── grid ───────────────────────────────────────────────────

    /// Background for a frame cleared to `clear`, blended over the wallpaper.
    pub fn backdrop(clear: Rgba) -> Style {
        let a = clear.a.clamp(0.0, 1.0);
        let mix = |wall: f32, paint: f32| (wall * (1.0 - a) + paint * 255.0 * a) as u8;
        let (r, g, b) = WALLPAPER;
        Style::default().bg(Color::Rgb(mix(r, clear.r), mix(g, clear.g), mix(b, clear.b)))
    }

    pub fn icon_style(depth: f32) -> Style {
        Style::default()
            .fg(fade(Color::Rgb(120, 200, 255), depth))
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(depth: f32) -> Style {
        Style::default().fg(fade(Color::Rgb(230, 230, 230), depth))
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::Rgb(70, 90, 140))
            .add_modifier(Modifier::BOLD)
    }

    pub fn home_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn motion_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}

/// Darken an RGB colour as the grid recedes.
fn fade(color: Color, depth: f32) -> Color {
    let keep = (1.0 - depth).clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * keep) as u8,
            (g as f32 * keep) as u8,
            (b as f32 * keep) as u8,
        ),
        other => other,
    }
}
