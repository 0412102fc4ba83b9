use std::fmt;

use bit_set::BitSet;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, Direction, ALL_DIRECTIONS, CANONICAL_WALL_DIRECTIONS};
use crate::errors::*;
use crate::units::{CellsCount, Height, PassagesCount, Width};

pub type NeighbourSmallVec = SmallVec<[(usize, Direction); 4]>;

/// Text rendering hook: what to draw inside the 3 character wide body of a cell.
pub trait GridDisplay {
    fn render_cell_body(&self, index: usize) -> String;
}

/// Wall state of a rectangular grid of cells.
///
/// Only the right and bottom wall of every cell is stored (a member of the bit set
/// means the wall exists). The left and top walls of a cell are the right and bottom
/// walls of its neighbours, and the outer boundary is implicit.
#[derive(Debug, Clone)]
pub struct WallGrid {
    width: usize,
    height: usize,
    right_walls: BitSet,
    bottom_walls: BitSet,
}

impl WallGrid {
    /// A grid where every wall is present, so no cell is reachable from any other.
    pub fn new(width: Width, height: Height) -> Result<WallGrid> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            bail!(ErrorKind::InvalidArgument(format!("grid dimensions must be at least 1x1, got {}x{}", w, h)));
        }
        if w.checked_mul(h).map_or(true, |size| size > u32::max_value() as usize) {
            bail!(ErrorKind::InvalidArgument(format!("grid dimensions {}x{} are too large", w, h)));
        }

        let mut grid = WallGrid {
            width: w,
            height: h,
            right_walls: BitSet::with_capacity(w * h),
            bottom_walls: BitSet::with_capacity(w * h),
        };
        grid.reset_walls();
        Ok(grid)
    }

    /// The 0x0 grid. Every coordinate is out of bounds.
    pub(crate) fn empty() -> WallGrid {
        WallGrid {
            width: 0,
            height: 0,
            right_walls: BitSet::new(),
            bottom_walls: BitSet::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.size())
    }

    /// Put every wall back.
    pub fn reset_walls(&mut self) {
        self.right_walls.clear();
        self.bottom_walls.clear();
        for i in 0..self.size() {
            self.right_walls.insert(i);
            self.bottom_walls.insert(i);
        }
    }

    #[inline]
    pub fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        (x as usize) < self.width && (y as usize) < self.height
    }

    /// Row major index of a cell: `y * width + x`.
    pub fn index(&self, x: u32, y: u32) -> Result<usize> {
        if self.is_valid_coordinate(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(coordinate_out_of_bounds(x, y, self.width, self.height))
        }
    }

    /// Inverse of `index`.
    pub fn coordinate(&self, index: usize) -> Result<Cartesian2DCoordinate> {
        if index < self.size() {
            Ok(Cartesian2DCoordinate::from_row_major_index(index, self.width))
        } else {
            Err(index_out_of_bounds(index, self.size()))
        }
    }

    /// Can we step from cell `(x, y)` in direction `dir`?
    ///
    /// False when stepping off the grid or when a wall is in the way.
    pub fn can_travel(&self, x: u32, y: u32, dir: Direction) -> Result<bool> {
        let index = self.index(x, y)?;
        Ok(self.is_open(index, dir))
    }

    /// `can_travel` taking the integer direction code (0 = Right, 1 = Down, 2 = Left, 3 = Up).
    pub fn can_travel_code(&self, x: u32, y: u32, code: u8) -> Result<bool> {
        let dir = Direction::from_code(code)?;
        self.can_travel(x, y, dir)
    }

    /// Set whether the right (`Direction::Right`) or bottom (`Direction::Down`) wall of
    /// `(x, y)` exists.
    ///
    /// No check is made that the grid is still a tree afterwards.
    pub fn set_wall(&mut self, x: u32, y: u32, dir: Direction, exists: bool) -> Result<()> {
        if !dir.is_canonical_wall() {
            bail!(ErrorKind::InvalidArgument(format!("only Right and Down walls can be set, not {}", dir)));
        }
        let index = self.index(x, y)?;
        self.set_canonical_wall(index, dir, exists);
        Ok(())
    }

    /// Remove the wall on side `dir` of the cell at `index`, which must be a valid index
    /// with a neighbour in that direction.
    pub(crate) fn open_wall(&mut self, index: usize, dir: Direction) {
        debug_assert!(self.neighbour_index(index, dir).is_some());
        match dir {
            Direction::Right | Direction::Down => self.set_canonical_wall(index, dir, false),
            Direction::Left => self.set_canonical_wall(index - 1, Direction::Right, false),
            Direction::Up => self.set_canonical_wall(index - self.width, Direction::Down, false),
        }
    }

    /// Index of the adjacent cell in direction `dir`, None if that is off the grid.
    pub fn neighbour_index(&self, index: usize, dir: Direction) -> Option<usize> {
        if index >= self.size() {
            return None;
        }
        let (x, y) = (index % self.width, index / self.width);
        match dir {
            Direction::Right if x + 1 < self.width => Some(index + 1),
            Direction::Down if y + 1 < self.height => Some(index + self.width),
            Direction::Left if x > 0 => Some(index - 1),
            Direction::Up if y > 0 => Some(index - self.width),
            _ => None,
        }
    }

    /// Cells reachable in one step from the cell at `index` and the direction of that step.
    pub fn open_neighbours(&self, index: usize) -> NeighbourSmallVec {
        ALL_DIRECTIONS.iter()
            .filter(|dir| self.is_open(index, **dir))
            .filter_map(|dir| self.neighbour_index(index, *dir).map(|neighbour| (neighbour, *dir)))
            .collect()
    }

    /// Number of adjacent cell pairs with no wall between them.
    pub fn passages_count(&self) -> PassagesCount {
        PassagesCount(self.iter_passages().count())
    }

    /// Every open adjacency once, as `(cell index, right or bottom neighbour index)`.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = (usize, usize)> + 'a {
        (0..self.size()).flat_map(move |index| {
            CANONICAL_WALL_DIRECTIONS.iter().filter_map(move |dir| {
                if self.is_open(index, *dir) {
                    self.neighbour_index(index, *dir).map(|neighbour| (index, neighbour))
                } else {
                    None
                }
            })
        })
    }

    /// Undirected graph with a node per cell (node index == cell index) and an edge per passage.
    pub fn passage_graph(&self) -> UnGraph<(), ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size().saturating_sub(1));
        for _ in 0..self.size() {
            let _ = graph.add_node(());
        }
        for (a, b) in self.iter_passages() {
            let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width: self.width,
            cells_count: self.size(),
        }
    }

    /// Text rendering with a custom cell body, e.g. to show a path.
    pub fn render_text(&self, display: Option<&dyn GridDisplay>) -> String {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const WALL_UD: &str = "|";
        const BODY: &str = "   ";

        let mut output = String::from(CORNER);
        for _ in 0..self.width {
            output.push_str(WALL_LR_3);
            output.push_str(CORNER);
        }
        output.push('\n');

        for y in 0..self.height {
            let mut middle_section = String::from(WALL_UD);
            let mut bottom_section = String::from(CORNER);

            for x in 0..self.width {
                let index = y * self.width + x;
                let body = display.map_or_else(|| String::from(BODY),
                                               |d| d.render_cell_body(index));
                middle_section.push_str(&body);
                middle_section.push_str(if self.is_open(index, Direction::Right) { " " } else { WALL_UD });

                bottom_section.push_str(if self.is_open(index, Direction::Down) { BODY } else { WALL_LR_3 });
                bottom_section.push_str(CORNER);
            }

            output.push_str(&middle_section);
            output.push('\n');
            output.push_str(&bottom_section);
            output.push('\n');
        }

        output
    }

    fn is_open(&self, index: usize, dir: Direction) -> bool {
        match self.neighbour_index(index, dir) {
            None => false,
            Some(neighbour) => {
                match dir {
                    Direction::Right => !self.right_walls.contains(index),
                    Direction::Down => !self.bottom_walls.contains(index),
                    Direction::Left => !self.right_walls.contains(neighbour),
                    Direction::Up => !self.bottom_walls.contains(neighbour),
                }
            }
        }
    }

    fn set_canonical_wall(&mut self, index: usize, dir: Direction, exists: bool) {
        let walls = match dir {
            Direction::Right => &mut self.right_walls,
            _ => &mut self.bottom_walls,
        };
        if exists {
            let _ = walls.insert(index);
        } else {
            let _ = walls.remove(index);
        }
    }
}

impl fmt::Display for WallGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_text(None))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                     self.row_width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a WallGrid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};

    use super::*;

    fn grid(w: usize, h: usize) -> WallGrid {
        WallGrid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn open_directions(g: &WallGrid, x: u32, y: u32) -> Vec<Direction> {
        ALL_DIRECTIONS.iter()
            .cloned()
            .filter(|dir| g.can_travel(x, y, *dir).unwrap())
            .collect()
    }

    #[test]
    fn zero_dimensions_are_invalid() {
        for &(w, h) in &[(0, 0), (0, 3), (3, 0)] {
            match WallGrid::new(Width(w), Height(h)) {
                Err(Error(ErrorKind::InvalidArgument(_), _)) => {}
                other => panic!("expected invalid argument for {}x{}, got {:?}", w, h, other),
            }
        }
    }

    #[test]
    fn grid_size() {
        let g = grid(10, 4);
        assert_eq!(g.size(), 40);
        assert_eq!(g.cells_count(), CellsCount(40));
        assert_eq!(g.width(), 10);
        assert_eq!(g.height(), 4);
    }

    #[test]
    fn new_grid_has_all_walls() {
        let g = grid(3, 3);
        for coord in g.iter() {
            assert!(open_directions(&g, coord.x, coord.y).is_empty());
        }
        assert_eq!(g.passages_count(), PassagesCount(0));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = grid(3, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1)];
        let indices = coords.iter()
            .map(|coord| g.index(coord.x, coord.y).unwrap())
            .collect::<Vec<usize>>();
        assert_eq!(indices, (0..6).collect::<Vec<usize>>());
        for (i, coord) in coords.iter().enumerate() {
            assert_eq!(g.coordinate(i).unwrap(), *coord);
        }

        assert!(g.index(3, 0).is_err());
        assert!(g.index(0, 2).is_err());
        assert!(g.index(u32::MAX, u32::MAX).is_err());
        match g.coordinate(6) {
            Err(Error(ErrorKind::IndexOutOfBounds(_, _), _)) => {}
            other => panic!("expected an index error, got {:?}", other),
        }
    }

    #[test]
    fn can_travel_rejects_bad_input() {
        let g = grid(2, 2);
        match g.can_travel(2, 0, Direction::Left) {
            Err(Error(ErrorKind::IndexOutOfBounds(_, _), _)) => {}
            other => panic!("expected an index error, got {:?}", other),
        }
        match g.can_travel_code(0, 0, 4) {
            Err(Error(ErrorKind::InvalidArgument(_), _)) => {}
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
        assert_eq!(g.can_travel_code(0, 0, 0).unwrap(), false);
    }

    #[test]
    fn set_wall_only_accepts_right_and_down() {
        let mut g = grid(2, 2);
        for dir in &[Direction::Left, Direction::Up] {
            match g.set_wall(1, 1, *dir, false) {
                Err(Error(ErrorKind::InvalidArgument(_), _)) => {}
                other => panic!("expected an invalid argument error, got {:?}", other),
            }
        }
        match g.set_wall(2, 2, Direction::Right, false) {
            Err(Error(ErrorKind::IndexOutOfBounds(_, _), _)) => {}
            other => panic!("expected an index error, got {:?}", other),
        }
        assert_eq!(g.passages_count(), PassagesCount(0));
    }

    #[test]
    fn walls_are_shared_with_neighbours() {
        let mut g = grid(3, 3);
        g.set_wall(0, 0, Direction::Right, false).unwrap();
        g.set_wall(1, 1, Direction::Down, false).unwrap();

        assert_eq!(open_directions(&g, 0, 0), vec![Direction::Right]);
        assert_eq!(open_directions(&g, 1, 0), vec![Direction::Left]);
        assert_eq!(open_directions(&g, 1, 1), vec![Direction::Down]);
        assert_eq!(open_directions(&g, 1, 2), vec![Direction::Up]);
        assert_eq!(g.passages_count(), PassagesCount(2));
        assert_eq!(g.iter_passages().collect::<Vec<_>>(), vec![(0, 1), (4, 7)]);
    }

    #[test]
    fn boundary_walls_cannot_be_opened() {
        let mut g = grid(2, 2);
        // The stored right wall of the last column and bottom wall of the last row
        // have no neighbour behind them.
        g.set_wall(1, 0, Direction::Right, false).unwrap();
        g.set_wall(0, 1, Direction::Down, false).unwrap();
        assert!(!g.can_travel(1, 0, Direction::Right).unwrap());
        assert!(!g.can_travel(0, 1, Direction::Down).unwrap());
        assert!(!g.can_travel(0, 0, Direction::Left).unwrap());
        assert!(!g.can_travel(0, 0, Direction::Up).unwrap());
        assert_eq!(g.passages_count(), PassagesCount(0));
    }

    #[test]
    fn neighbour_cells() {
        let g = grid(10, 10);
        let check_expected_neighbours = |index: usize, expected: &[usize]| {
            let neighbours = ALL_DIRECTIONS.iter()
                .filter_map(|dir| g.neighbour_index(index, *dir))
                .sorted()
                .collect::<Vec<usize>>();
            let expected = expected.iter().cloned().sorted().collect::<Vec<usize>>();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(0, &[1, 10]);
        check_expected_neighbours(9, &[8, 19]);
        check_expected_neighbours(90, &[80, 91]);
        check_expected_neighbours(99, &[98, 89]);

        // sides
        check_expected_neighbours(1, &[0, 2, 11]);
        check_expected_neighbours(10, &[0, 20, 11]);

        // inside
        check_expected_neighbours(11, &[1, 10, 12, 21]);

        assert_eq!(g.neighbour_index(100, Direction::Left), None);
    }

    #[test]
    fn open_neighbours_follow_passages() {
        let mut g = grid(3, 3);
        g.set_wall(0, 1, Direction::Right, false).unwrap();
        g.set_wall(1, 0, Direction::Down, false).unwrap();
        g.set_wall(1, 1, Direction::Right, false).unwrap();
        g.set_wall(1, 1, Direction::Down, false).unwrap();
        let neighbours = g.open_neighbours(4);
        assert_eq!(&*neighbours,
                   &[(5, Direction::Right), (7, Direction::Down), (3, Direction::Left), (1, Direction::Up)]);
        assert!(g.open_neighbours(0).is_empty());
    }

    #[test]
    fn open_wall_from_either_side() {
        let mut g = grid(2, 2);
        g.open_wall(1, Direction::Left);
        g.open_wall(3, Direction::Up);
        assert!(g.can_travel(0, 0, Direction::Right).unwrap());
        assert!(g.can_travel(1, 0, Direction::Down).unwrap());
        assert_eq!(g.passages_count(), PassagesCount(2));
    }

    #[test]
    fn reset_walls_closes_everything() {
        let mut g = grid(2, 2);
        g.set_wall(0, 0, Direction::Right, false).unwrap();
        g.reset_walls();
        assert_eq!(g.passages_count(), PassagesCount(0));
    }

    #[test]
    fn passage_graph_mirrors_passages() {
        let mut g = grid(2, 2);
        g.set_wall(0, 0, Direction::Down, false).unwrap();
        g.set_wall(0, 1, Direction::Right, false).unwrap();
        let graph = g.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(2)).is_some());
        assert!(graph.find_edge(NodeIndex::new(3), NodeIndex::new(2)).is_some());
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_none());
    }

    #[test]
    fn cell_iter() {
        let g = grid(2, 2);
        assert_eq!(g.iter().len(), 4);
        assert_eq!((&g).into_iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[Cartesian2DCoordinate::new(0, 0),
                     Cartesian2DCoordinate::new(1, 0),
                     Cartesian2DCoordinate::new(0, 1),
                     Cartesian2DCoordinate::new(1, 1)]);
    }

    #[test]
    fn text_display() {
        let mut g = grid(2, 2);
        g.set_wall(0, 0, Direction::Right, false).unwrap();
        g.set_wall(1, 0, Direction::Down, false).unwrap();
        let expected = "+---+---+\n\
                        |       |\n\
                        +---+   +\n\
                        |   |   |\n\
                        +---+---+\n";
        assert_eq!(format!("{}", g), expected);
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let g = WallGrid::empty();
        assert_eq!(g.size(), 0);
        assert!(g.can_travel(0, 0, Direction::Right).is_err());
        assert_eq!(g.iter().count(), 0);
        assert_eq!(format!("{}", g), "+\n");
    }

    #[test]
    fn quickcheck_can_travel_is_idempotent() {
        fn p(w: u8, h: u8, opened: Vec<(u8, u8)>) -> TestResult {
            let (w, h) = (w as usize % 8 + 1, h as usize % 8 + 1);
            let mut g = grid(w, h);
            for &(cell, side) in &opened {
                let index = cell as usize % g.size();
                let coord = g.coordinate(index).unwrap();
                let dir = if side % 2 == 0 { Direction::Right } else { Direction::Down };
                g.set_wall(coord.x, coord.y, dir, false).unwrap();
            }
            let snapshot = |g: &WallGrid| {
                g.iter()
                    .flat_map(|c| ALL_DIRECTIONS.iter().map(move |d| (c, *d)))
                    .map(|(c, d)| g.can_travel(c.x, c.y, d).unwrap())
                    .collect::<Vec<bool>>()
            };
            TestResult::from_bool(snapshot(&g) == snapshot(&g))
        }
        quickcheck(p as fn(u8, u8, Vec<(u8, u8)>) -> TestResult)
    }

    #[test]
    fn quickcheck_set_wall_round_trip() {
        fn p(w: u8, h: u8, walls: Vec<(u8, bool)>, target: u8, target_down: bool) -> TestResult {
            let (w, h) = (w as usize % 8 + 1, h as usize % 8 + 1);
            let mut g = grid(w, h);

            // Arbitrary starting wall state
            for (i, &(cell, exists)) in walls.iter().enumerate() {
                let coord = g.coordinate(cell as usize % g.size()).unwrap();
                let dir = if i % 2 == 0 { Direction::Right } else { Direction::Down };
                g.set_wall(coord.x, coord.y, dir, exists).unwrap();
            }

            let all_queries = |g: &WallGrid| {
                g.iter()
                    .flat_map(|c| ALL_DIRECTIONS.iter().map(move |d| (c, *d)))
                    .map(|(c, d)| g.can_travel(c.x, c.y, d).unwrap())
                    .collect::<Vec<bool>>()
            };

            let target = g.coordinate(target as usize % g.size()).unwrap();
            let dir = if target_down { Direction::Down } else { Direction::Right };
            let index = g.index(target.x, target.y).unwrap();
            let neighbour = g.neighbour_index(index, dir);
            if neighbour.is_none() {
                return TestResult::discard();
            }

            // Open the wall first so that the closing and reopening starts from a known state.
            g.set_wall(target.x, target.y, dir, false).unwrap();
            let before = all_queries(&g);

            g.set_wall(target.x, target.y, dir, true).unwrap();
            let closed = all_queries(&g);
            let changed = before.iter().zip(closed.iter()).filter(|&(b, c)| b != c).count();

            g.set_wall(target.x, target.y, dir, false).unwrap();
            let after = all_queries(&g);

            // Closing one wall changes exactly two queries: one from each side.
            TestResult::from_bool(changed == 2 && after == before &&
                                  g.can_travel(target.x, target.y, dir).unwrap())
        }
        quickcheck(p as fn(u8, u8, Vec<(u8, bool)>, u8, bool) -> TestResult)
    }
}
