use std::fmt;

use crate::errors::*;

/// A cell position on a rectangular grid, `x` is the column and `y` the row.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Row major conversion from a one dimensional cell index.
    #[inline]
    pub fn from_row_major_index(index: usize, row_width: usize) -> Cartesian2DCoordinate {
        let x = index % row_width;
        let y = index / row_width;
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// A single step between orthogonally adjacent cells.
///
/// The discriminants are the fixed wire codes used when querying walls and when
/// reporting a solution path: 0 = Right, 1 = Down, 2 = Left, 3 = Up.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

pub static ALL_DIRECTIONS: [Direction; 4] =
    [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

/// The only directions that own a stored wall. Left and Up walls belong to the neighbour.
pub static CANONICAL_WALL_DIRECTIONS: [Direction; 2] = [Direction::Right, Direction::Down];

impl Direction {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Direction> {
        match code {
            0 => Ok(Direction::Right),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Up),
            _ => bail!(ErrorKind::InvalidArgument(format!("direction code {} is not in 0..=3", code))),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    /// Does this direction own a stored wall (right or bottom side of a cell)?
    #[inline]
    pub fn is_canonical_wall(self) -> bool {
        match self {
            Direction::Right | Direction::Down => true,
            Direction::Left | Direction::Up => false,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Up => "Up",
        };
        write!(f, "{}", name)
    }
}
