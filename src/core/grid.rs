//! Grid capacity and per-frame layout of icons, labels and the home button.
//!
//! One scroll unit is one grid row.  The layout walks a window of rows
//! around the integer part of the scroll position and offsets every row by
//! the fractional part, so rows slide continuously as the position moves.

use super::surface::{Rgba, Sprite, SpriteKind, Surface, TextureSize, Viewport};

const COLUMN_WIDTH: f32 = 120.0;
const ROW_HEIGHT: f32 = 145.0;
const LANDSCAPE_ROW_TRIM: f32 = 12.0;
/// Label center sits this far below the icon center.
const LABEL_DROP: f32 = 64.0;
/// Rows laid out above and below the first visible row.
const ROWS_BEFORE: i64 = 5;
const ROWS_AFTER: i64 = 15;
/// Keeps sprite centers off exact texel boundaries.
const SUBPIXEL: f32 = 0.2;
/// Gap between the portrait home button and the bottom edge.
const HOME_DROP: f32 = 30.0;
const HOME_MARGIN: f32 = 20.0;

// ───────────────────────────────────────── capacity ──────────

/// Columns and visible rows of the grid for the current orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCapacity {
    pub columns: usize,
    pub rows: usize,
}

impl GridCapacity {
    pub const PORTRAIT: GridCapacity = GridCapacity {
        columns: 4,
        rows: 4,
    };
    pub const LANDSCAPE: GridCapacity = GridCapacity {
        columns: 6,
        rows: 3,
    };

    pub fn for_viewport(viewport: Viewport) -> Self {
        if viewport.is_landscape() {
            Self::LANDSCAPE
        } else {
            Self::PORTRAIT
        }
    }

    /// Highest scroll position that still fills the visible rows.
    pub fn max_position(&self, icon_count: usize) -> i32 {
        if self.columns == 0 {
            return 0;
        }
        let lines = icon_count.div_ceil(self.columns);
        i32::try_from(lines.saturating_sub(self.rows)).unwrap_or(i32::MAX)
    }
}

// ───────────────────────────────────────── grid layout ───────

/// Inputs for one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub position: f32,
    pub blend: f32,
    pub icon_count: usize,
    pub selected: Option<usize>,
    pub tint: Rgba,
}

/// Place every icon and label in the row window around `params.position`.
pub fn layout_grid(
    params: &LayoutParams,
    capacity: GridCapacity,
    surface: &dyn Surface,
) -> Vec<Sprite> {
    let viewport = surface.viewport();
    let (row_height, anchor) = if viewport.is_landscape() {
        let row_height = ROW_HEIGHT - LANDSCAPE_ROW_TRIM;
        (row_height, 0.47 * viewport.height + row_height)
    } else {
        (ROW_HEIGHT, 0.5 * viewport.height + 1.5 * ROW_HEIGHT)
    };

    let first_row = params.position.trunc();
    let row_frac = params.position - first_row;
    let columns = capacity.columns as i64;
    let icon_count = params.icon_count as i64;

    // Highlight only when fully zoomed in and the host provides one.
    let highlight = params
        .selected
        .filter(|_| params.blend == 0.0)
        .and_then(|index| {
            let sel = surface.texture_size(SpriteKind::SelectedIcon(index))?;
            let icon = surface.texture_size(SpriteKind::Icon(index))?;
            Some((index, (sel.height - icon.height) * 0.5))
        });

    let mut sprites = Vec::new();
    let mut icon = (first_row as i64 - ROWS_BEFORE) * columns;

    'rows: for row in -ROWS_BEFORE..ROWS_AFTER {
        let y = anchor - (row as f32 - row_frac) * row_height;

        for col in 0..columns {
            if icon >= icon_count {
                break 'rows;
            }
            if icon >= 0 {
                let index = icon as usize;
                let x = COLUMN_WIDTH * col as f32 + COLUMN_WIDTH / 2.0 + SUBPIXEL;
                let sprite = |kind, y| Sprite {
                    kind,
                    x,
                    y,
                    depth: params.blend,
                    tint: params.tint,
                };

                if let Some((selected, lift)) = highlight {
                    if selected == index {
                        sprites.push(sprite(SpriteKind::SelectedIcon(index), y - lift));
                    }
                }
                sprites.push(sprite(SpriteKind::Icon(index), y - SUBPIXEL));
                sprites.push(sprite(SpriteKind::Label(index), y - LABEL_DROP - SUBPIXEL));
            }
            icon += 1;
        }
    }

    sprites
}

// ───────────────────────────────────────── home button ───────

/// Home button placement.  Slides in from the bottom edge (portrait) or
/// the right edge (landscape) as the grid zooms in.
pub fn home_button(viewport: Viewport, size: TextureSize, blend: f32, tint: Rgba) -> Sprite {
    let (w, h) = (viewport.width, viewport.height);
    let (tw, th) = (size.width, size.height);

    let (left, bottom) = if viewport.is_landscape() {
        (w - tw * (1.0 - blend) + HOME_MARGIN, (h - th) * 0.5)
    } else {
        ((w - tw) / 2.0, -blend * th - HOME_DROP)
    };

    Sprite {
        kind: SpriteKind::HomeButton,
        x: left + tw / 2.0,
        y: bottom + th / 2.0,
        depth: blend,
        tint,
    }
}
