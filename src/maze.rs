use std::fmt;

use rand::Rng;

use crate::cells::Direction;
use crate::errors::*;
use crate::generators;
use crate::grid::WallGrid;
use crate::pathing;
use crate::units::{Height, Width};

/// A rectangular maze whose longest route to the bottom row can be solved.
///
/// Starts out with no cells. `make_maze` carves a fresh perfect maze, while `with_walls`
/// plus `set_wall` lets a caller copy in an exact maze cell by cell.
#[derive(Debug, Clone)]
pub struct SquareMaze {
    grid: WallGrid,
}

impl Default for SquareMaze {
    fn default() -> SquareMaze {
        SquareMaze { grid: WallGrid::empty() }
    }
}

impl SquareMaze {
    pub fn new() -> SquareMaze {
        SquareMaze::default()
    }

    /// A `width` x `height` maze with every wall standing.
    pub fn with_walls(width: usize, height: usize) -> Result<SquareMaze> {
        Ok(SquareMaze { grid: WallGrid::new(Width(width), Height(height))? })
    }

    /// Throw away the current maze and generate a new `width` x `height` perfect maze.
    ///
    /// The current maze is kept if the dimensions are invalid.
    pub fn make_maze<R: Rng>(&mut self, width: usize, height: usize, rng: &mut R) -> Result<()> {
        let mut grid = WallGrid::new(Width(width), Height(height))?;
        generators::shuffled_kruskal(&mut grid, rng)?;
        self.grid = grid;
        Ok(())
    }

    /// `make_maze` using rejection sampling of walls instead of a shuffled wall list.
    pub fn make_maze_sampled<R: Rng>(&mut self, width: usize, height: usize, rng: &mut R) -> Result<()> {
        let mut grid = WallGrid::new(Width(width), Height(height))?;
        generators::sampled_kruskal(&mut grid, rng)?;
        self.grid = grid;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &WallGrid {
        &self.grid
    }

    #[inline]
    pub fn can_travel(&self, x: u32, y: u32, dir: Direction) -> Result<bool> {
        self.grid.can_travel(x, y, dir)
    }

    #[inline]
    pub fn can_travel_code(&self, x: u32, y: u32, code: u8) -> Result<bool> {
        self.grid.can_travel_code(x, y, code)
    }

    #[inline]
    pub fn set_wall(&mut self, x: u32, y: u32, dir: Direction, exists: bool) -> Result<()> {
        self.grid.set_wall(x, y, dir, exists)
    }

    /// `set_wall` with the direction given as a code, 0 (right) or 1 (down).
    pub fn set_wall_code(&mut self, x: u32, y: u32, code: u8, exists: bool) -> Result<()> {
        let dir = Direction::from_code(code)?;
        self.grid.set_wall(x, y, dir, exists)
    }

    /// Steps from the top left cell to the farthest cell of the bottom row.
    pub fn solve(&self) -> Vec<Direction> {
        pathing::solve(&self.grid)
    }

    /// `solve` as direction codes: 0 = Right, 1 = Down, 2 = Left, 3 = Up.
    pub fn solve_codes(&self) -> Vec<u8> {
        self.solve().into_iter().map(Direction::code).collect()
    }
}

impl fmt::Display for SquareMaze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}
