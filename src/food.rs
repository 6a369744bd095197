use anyhow::Result;
use rand::Rng;

use crate::config::Palette;
use crate::grid::{Grid, Position};
use crate::render::{Drawable, Renderer, Size};

/// The thing the snake eats.
///
/// Relocation picks any cell on the board, including ones currently under
/// the snake's body.
pub struct Food {
    position: Position,
    grid: Grid,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Self {
        let mut food = Food { position: Position::new(0, 0), grid };
        food.relocate(rng);
        food
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = Position::new(
            rng.gen_range(0..self.grid.columns()),
            rng.gen_range(0..self.grid.rows()),
        );
        debug_assert!(self.grid.contains(self.position));
    }

    #[cfg(test)]
    pub fn place_at(&mut self, pos: Position) {
        self.position = pos;
    }
}

impl Drawable for Food {
    fn draw(&self, renderer: &mut dyn Renderer, palette: &Palette) -> Result<()> {
        renderer.fill_rect(self.position, Size::CELL, palette.food)?;
        renderer.stroke_rect(self.position, Size::CELL, palette.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{DrawCall, RecordingRenderer};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn relocation_stays_on_the_board() {
        let grid = Grid::new(640, 480, 20);
        let mut rng = StdRng::seed_from_u64(7);
        let mut food = Food::new(grid, &mut rng);

        for _ in 0..1000 {
            food.relocate(&mut rng);
            assert!(grid.contains(food.position()));
        }
    }

    #[test]
    fn draws_filled_then_outlined() {
        let grid = Grid::new(640, 480, 20);
        let mut food = Food::new(grid, &mut StdRng::seed_from_u64(1));
        food.place_at(Position::new(3, 4));

        let palette = Palette::default();
        let mut renderer = RecordingRenderer::default();
        food.draw(&mut renderer, &palette).unwrap();

        assert_eq!(renderer.calls, vec![
            DrawCall::Fill(Position::new(3, 4), palette.food),
            DrawCall::Stroke(Position::new(3, 4), palette.border),
        ]);
    }
}
