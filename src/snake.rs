use anyhow::Result;
use log::trace;
use rand::{seq::SliceRandom, Rng};

use crate::config::Palette;
use crate::grid::{Grid, Position};
use crate::render::{Drawable, Renderer, Size};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> Position {
        match self {
            Up => Position::new(0, -1),
            Down => Position::new(0, 1),
            Left => Position::new(-1, 0),
            Right => Position::new(1, 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, old_tail: Option<Position> },
    Collided
}

impl MoveResult {
    #[cfg(test)]
    pub fn is_collision(&self) -> bool {
        matches!(self, Collided)
    }
}

pub struct Snake {
    grid: Grid,
    body: Vec<Position>,
    direction: Direction,
    pending: Option<Direction>,
    target_length: usize,
    last: Option<Position>,
}

impl Snake {
    pub fn new(grid: Grid) -> Self {
        Snake {
            grid,
            body: vec![grid.center()],
            direction: Right,
            pending: None,
            target_length: 1,
            last: None,
        }
    }

    /// Head first.
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head_position(&self) -> Position {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Last input before the next tick wins.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    pub fn resolve_direction(&mut self) {
        if let Some(next) = self.pending.take() {
            if next == self.direction.opposite() {
                trace!("ignoring reversal from {:?} to {:?}", self.direction, next);
            } else {
                self.direction = next;
            }
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MoveResult {
        let new_head = self.grid.wrap(self.head_position() + self.direction.delta());

        // The neck (body[1]) can never be hit, so only body[2..] counts.
        if self.body.iter().skip(2).any(|pos| *pos == new_head) {
            self.reset(rng);
            return Collided;
        }

        self.body.insert(0, new_head);

        self.last = if self.body.len() > self.target_length {
            self.body.pop()
        } else {
            None
        };

        Moved { new_head, old_tail: self.last }
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.target_length = 1;
        self.body = vec![self.grid.center()];
        self.direction = *Direction::ALL.choose(rng).unwrap_or(&Right);
        self.pending = None;
        self.last = None;
    }

    #[cfg(test)]
    pub fn with_body(grid: Grid, body: Vec<Position>, direction: Direction) -> Self {
        let target_length = body.len();
        Snake { grid, body, direction, pending: None, target_length, last: None }
    }
}

impl Drawable for Snake {
    fn draw(&self, renderer: &mut dyn Renderer, palette: &Palette) -> Result<()> {
        if let Some(vacated) = self.last {
            renderer.fill_rect(vacated, Size::CELL, palette.background)?;
        }

        for pos in &self.body {
            renderer.fill_rect(*pos, Size::CELL, palette.snake)?;
        }

        Ok(())
    }
}
