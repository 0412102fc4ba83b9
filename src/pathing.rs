// Breadth first flood fill from the top left cell.
//
// Every passage costs one step, so the first time a cell is reached is along a shortest
// route. A FIFO queue gives the same distances as Dijkstra with a priority queue would,
// without the log factor.

use std::collections::VecDeque;

use log::debug;

use crate::cells::{Cartesian2DCoordinate, Direction};
use crate::grid::{GridDisplay, WallGrid};

pub const ORIGIN_INDEX: usize = 0;

/// Steps from the origin to every cell of a grid, plus the predecessor of each cell on a
/// shortest route back to the origin.
///
/// Cells that cannot be reached have no distance and no predecessor.
#[derive(Debug, Clone)]
pub struct Distances {
    row_width: usize,
    rows: usize,
    distances: Vec<Option<u32>>,
    predecessors: Vec<Option<usize>>,
    max_distance: u32,
}

impl Distances {
    pub fn from_origin(grid: &WallGrid) -> Distances {
        let cells_count = grid.size();
        let mut distances: Vec<Option<u32>> = vec![None; cells_count];
        let mut predecessors: Vec<Option<usize>> = vec![None; cells_count];
        let mut max_distance = 0;

        if cells_count > 0 {
            distances[ORIGIN_INDEX] = Some(0);
            let mut frontier = VecDeque::with_capacity(cells_count);
            frontier.push_back(ORIGIN_INDEX);

            while let Some(cell) = frontier.pop_front() {
                let distance_to_cell = distances[cell].unwrap_or(0);
                if distance_to_cell > max_distance {
                    max_distance = distance_to_cell;
                }

                for (neighbour, _) in grid.open_neighbours(cell) {
                    let via_cell = distance_to_cell + 1;
                    let improves = distances[neighbour].map_or(true, |d| via_cell < d);
                    if improves {
                        distances[neighbour] = Some(via_cell);
                        predecessors[neighbour] = Some(cell);
                        frontier.push_back(neighbour);
                    }
                }
            }
        }

        Distances {
            row_width: grid.width(),
            rows: grid.height(),
            distances,
            predecessors,
            max_distance,
        }
    }

    #[inline(always)]
    pub fn start(&self) -> usize {
        ORIGIN_INDEX
    }

    /// The largest distance to any reachable cell.
    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, index: usize) -> Option<u32> {
        self.distances.get(index).cloned().and_then(|d| d)
    }

    #[inline(always)]
    pub fn predecessor_of(&self, index: usize) -> Option<usize> {
        self.predecessors.get(index).cloned().and_then(|p| p)
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// The cell of the last row farthest from the origin. Ties go to the smallest x.
    ///
    /// When nothing on the last row is reachable this is the first cell of the last row.
    /// None only for a grid without cells.
    pub fn furthest_on_last_row(&self) -> Option<usize> {
        if self.rows == 0 || self.row_width == 0 {
            return None;
        }

        let row_start = (self.rows - 1) * self.row_width;
        let mut furthest = row_start;
        let mut furthest_distance = 0;
        for index in row_start..(row_start + self.row_width) {
            if let Some(distance) = self.distances[index] {
                if distance > furthest_distance {
                    furthest_distance = distance;
                    furthest = index;
                }
            }
        }
        Some(furthest)
    }

    /// Steps to take from the origin to reach `destination` by following predecessors.
    ///
    /// Empty if the destination is the origin, is unreachable or is not on the grid.
    pub fn path_to(&self, destination: usize) -> Vec<Direction> {
        let mut steps = vec![];
        let mut next = destination;
        let mut current = self.predecessor_of(destination);

        while let Some(curr) = current {
            if let Some(dir) = step_direction(curr, next, self.row_width) {
                steps.push(dir);
            }
            next = curr;
            current = self.predecessor_of(curr);
        }

        steps.reverse();
        steps
    }

    /// Cells visited by `path_to`, origin first.
    pub fn cells_on_path_to(&self, destination: usize) -> Vec<usize> {
        if self.distance_from_start_to(destination).is_none() {
            return vec![];
        }
        let mut cells = vec![destination];
        let mut current = self.predecessor_of(destination);
        while let Some(curr) = current {
            cells.push(curr);
            current = self.predecessor_of(curr);
        }
        cells.reverse();
        cells
    }
}

/// Which way `from` has to step to reach the adjacent cell `to`.
///
/// A horizontal step never wraps onto another row. That matters for one cell wide
/// grids, where `+1` and `+row_width` are the same index.
fn step_direction(from: usize, to: usize, row_width: usize) -> Option<Direction> {
    if from + 1 == to && to % row_width != 0 {
        Some(Direction::Right)
    } else if from + row_width == to {
        Some(Direction::Down)
    } else if to + 1 == from && from % row_width != 0 {
        Some(Direction::Left)
    } else if to + row_width == from {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Route from the top left cell to the cell on the bottom row that is farthest from it.
///
/// Meant for perfect mazes, where the route is unique. Empty for a single cell grid.
pub fn solve(grid: &WallGrid) -> Vec<Direction> {
    let distances = Distances::from_origin(grid);
    match distances.furthest_on_last_row() {
        Some(destination) => {
            let path = distances.path_to(destination);
            debug!("solved {}x{} grid: destination cell {} at {} steps, {} of {} cells reachable",
                   grid.width(), grid.height(), destination, path.len(),
                   distances.reachable_count(), grid.size());
            path
        }
        None => vec![],
    }
}

/// Mark the cells a path visits with a dot when rendering a grid as text.
#[derive(Debug)]
pub struct PathDisplay {
    on_path: Vec<bool>,
    start: Option<usize>,
    end: Option<usize>,
}
impl PathDisplay {
    /// `path` is walked from the origin over a grid `row_width` cells wide.
    pub fn new(path: &[Direction], row_width: usize, cells_count: usize) -> Self {
        let mut on_path = vec![false; cells_count];
        let mut current = ORIGIN_INDEX;
        let mut end = None;

        if cells_count > 0 {
            on_path[current] = true;
            end = Some(current);
            for dir in path {
                let coord = Cartesian2DCoordinate::from_row_major_index(current, row_width);
                let next = match *dir {
                    Direction::Right if (coord.x as usize) + 1 < row_width => Some(current + 1),
                    Direction::Down => Some(current + row_width),
                    Direction::Left if coord.x > 0 => Some(current - 1),
                    Direction::Up if current >= row_width => Some(current - row_width),
                    _ => None,
                };
                match next {
                    Some(n) if n < cells_count => {
                        current = n;
                        on_path[current] = true;
                        end = Some(current);
                    }
                    _ => break,
                }
            }
        }

        PathDisplay { on_path, start: end.map(|_| ORIGIN_INDEX), end }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, index: usize) -> String {
        if self.start == Some(index) {
            String::from(" S ")
        } else if self.end == Some(index) {
            String::from(" E ")
        } else if self.on_path.get(index).cloned().unwrap_or(false) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}
