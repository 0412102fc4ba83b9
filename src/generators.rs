use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cells::{Direction, CANONICAL_WALL_DIRECTIONS};
use crate::disjoint_sets::DisjointSets;
use crate::errors::*;
use crate::grid::WallGrid;

/// Carve a perfect maze (a spanning tree of passages) into the grid with randomised
/// Kruskal: every interior wall is listed once, shuffled, then scanned in order. A wall
/// is knocked down only when the cells either side of it are not yet connected.
///
/// Any existing passages are discarded first. The scan stops as soon as
/// `cells - 1` walls are down, and never takes more than one pass over the walls.
pub fn shuffled_kruskal<R: Rng>(grid: &mut WallGrid, rng: &mut R) -> Result<()> {
    grid.reset_walls();

    let cells_count = grid.size();
    let passages_needed = cells_count.saturating_sub(1);
    let mut sets = DisjointSets::new(cells_count);

    let mut walls = interior_walls(grid);
    walls.shuffle(rng);

    let mut passages = 0;
    let mut scanned = 0;
    for (index, dir) in walls {
        if passages == passages_needed {
            break;
        }
        scanned += 1;

        if let Some(neighbour) = grid.neighbour_index(index, dir) {
            if sets.union(index, neighbour)? {
                grid.open_wall(index, dir);
                passages += 1;
            }
        }
    }

    debug!("shuffled kruskal on {}x{} grid: {} passages carved after scanning {} walls",
           grid.width(), grid.height(), passages, scanned);
    Ok(())
}

/// Carve a perfect maze by rejection sampling: repeatedly pick a random cell and a
/// random side (right or bottom) and knock that wall down if it joins two cells that are
/// not yet connected. Samples that point off the grid or would close a loop are thrown
/// away and drawn again.
///
/// Terminates with probability 1, but the number of samples grows as the maze fills up
/// and few useful walls remain. Prefer `shuffled_kruskal`.
pub fn sampled_kruskal<R: Rng>(grid: &mut WallGrid, rng: &mut R) -> Result<()> {
    grid.reset_walls();

    let cells_count = grid.size();
    let passages_needed = cells_count.saturating_sub(1);
    let mut sets = DisjointSets::new(cells_count);

    let mut passages = 0;
    let mut rejected: usize = 0;
    while passages < passages_needed {
        let index = rng.gen_range(0..cells_count);
        let dir = if rng.gen() { Direction::Right } else { Direction::Down };

        match grid.neighbour_index(index, dir) {
            None => {
                trace!("rejected cell {} {}: no neighbour", index, dir);
                rejected += 1;
            }
            Some(neighbour) => {
                if sets.union(index, neighbour)? {
                    grid.open_wall(index, dir);
                    passages += 1;
                } else {
                    trace!("rejected cell {} {}: already connected", index, dir);
                    rejected += 1;
                }
            }
        }
    }

    debug!("sampled kruskal on {}x{} grid: {} passages carved, {} samples rejected",
           grid.width(), grid.height(), passages, rejected);
    Ok(())
}

/// Every wall that has a cell on both sides, as `(cell index, Right or Down)`.
fn interior_walls(grid: &WallGrid) -> Vec<(usize, Direction)> {
    let (w, h) = (grid.width(), grid.height());
    let interior_count = w.saturating_sub(1) * h + w * h.saturating_sub(1);
    let mut walls = Vec::with_capacity(interior_count);

    for index in 0..grid.size() {
        for dir in CANONICAL_WALL_DIRECTIONS.iter() {
            if grid.neighbour_index(index, *dir).is_some() {
                walls.push((index, *dir));
            }
        }
    }
    walls
}
