use anyhow::Result;

use crate::config::Palette;
use crate::grid::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Width and height of a rectangle, in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const CELL: Size = Size { width: 1, height: 1 };
}

/// Draws coloured rectangles onto a frame and flips it.
pub trait Renderer {
    fn clear(&mut self, color: Color) -> Result<()>;
    fn fill_rect(&mut self, at: Position, size: Size, color: Color) -> Result<()>;
    fn stroke_rect(&mut self, at: Position, size: Size, color: Color) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

pub trait Drawable {
    fn draw(&self, renderer: &mut dyn Renderer, palette: &Palette) -> Result<()>;
}
