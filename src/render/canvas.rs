//! Canvas trait and a recording implementation

use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Rect, Vec2};

/// Palette used for debug shapes and screen tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl Color {
    /// RGB triple for this color
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::White => (255, 255, 255),
            Color::Black => (0, 0, 0),
            Color::Red => (220, 40, 40),
            Color::Orange => (255, 140, 40),
            Color::Yellow => (240, 220, 60),
            Color::Green => (60, 200, 90),
            Color::Blue => (60, 110, 230),
            Color::Purple => (150, 60, 190),
            Color::Gray => (130, 130, 130),
        }
    }
}

/// Rendering surface handed to `draw` calls
pub trait Canvas {
    /// Draw a named sprite centered on `at` with the given alpha (0-255)
    fn sprite(&mut self, name: &'static str, at: Vec2, alpha: f32);

    fn rect(&mut self, rect: &Rect, color: Color);

    fn circle(&mut self, circle: &Circle, color: Color);

    /// Boss health bar, `fraction` in 0..=1
    fn health_bar(&mut self, label: &str, fraction: f32);

    /// Whether collision volumes should be drawn too
    fn debug(&self) -> bool {
        false
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite { name: &'static str, at: Vec2, alpha: f32 },
    Rect { rect: Rect, color: Color },
    Circle { circle: Circle, color: Color },
    HealthBar { label: String, fraction: f32 },
}

/// Canvas that records draw calls for a later backend pass
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
    pub debug: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of sprites drawn with the given name
    pub fn count_sprites(&self, name: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Sprite { name: n, .. } if *n == name))
            .count()
    }
}

impl Canvas for DrawList {
    fn sprite(&mut self, name: &'static str, at: Vec2, alpha: f32) {
        self.commands.push(DrawCmd::Sprite { name, at, alpha });
    }

    fn rect(&mut self, rect: &Rect, color: Color) {
        self.commands.push(DrawCmd::Rect { rect: *rect, color });
    }

    fn circle(&mut self, circle: &Circle, color: Color) {
        self.commands.push(DrawCmd::Circle { circle: *circle, color });
    }

    fn health_bar(&mut self, label: &str, fraction: f32) {
        self.commands.push(DrawCmd::HealthBar {
            label: label.to_string(),
            fraction: fraction.clamp(0.0, 1.0),
        });
    }

    fn debug(&self) -> bool {
        self.debug
    }
}
