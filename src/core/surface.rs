//! Contract with the rendering backend.
//!
//! The engine never touches pixels.  Each frame it asks the surface for the
//! viewport and texture sizes, then hands it a clear color and a list of
//! placed sprites.

/// Drawable area in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black(a: f32) -> Self {
        Self::new(0.0, 0.0, 0.0, a)
    }
}

/// What a sprite shows.  Indices refer to the host's icon list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Icon(usize),
    /// Highlight drawn underneath the selected icon.
    SelectedIcon(usize),
    Label(usize),
    HomeButton,
}

/// One placed sprite.  `(x, y)` is the sprite center in viewport units,
/// origin at the bottom-left, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
    /// Zoom-out blend: 0 when the grid is fully in, 1 when hidden.
    pub depth: f32,
    pub tint: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSize {
    pub width: f32,
    pub height: f32,
}

/// The rendering collaborator.
pub trait Surface {
    fn viewport(&self) -> Viewport;

    /// Size of the texture behind `kind`, or `None` if the host has none
    /// (for example no selected-icon highlight).
    fn texture_size(&self, kind: SpriteKind) -> Option<TextureSize>;

    fn clear(&mut self, color: Rgba);

    fn draw(&mut self, sprite: Sprite);
}
