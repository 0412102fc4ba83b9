//! **square_mazes** generates perfect mazes on rectangular grids and solves them for the
//! longest route from the top left cell to the bottom row.

#[macro_use]
extern crate error_chain;

pub mod cells;
pub mod disjoint_sets;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod maze;
pub mod pathing;
pub mod renderers;
pub mod units;

pub use crate::cells::Direction;
pub use crate::maze::SquareMaze;
