use std::ops::Add;

/// A cell coordinate on the board. Origin is the top-left cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

/// Board dimensions in cells. Movement wraps around every edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: i32,
    rows: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        Grid { columns: width / cell_size, rows: height / cell_size }
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn center(&self) -> Position {
        Position::new(self.columns / 2, self.rows / 2)
    }

    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.columns), pos.y.rem_euclid(self.rows))
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.columns).contains(&pos.x) && (0..self.rows).contains(&pos.y)
    }
}
