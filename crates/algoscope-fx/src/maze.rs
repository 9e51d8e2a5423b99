#![forbid(unsafe_code)]

//! Live maze growth by depth-first backtracking.
//!
//! The generator advances a bounded batch of primitive operations per
//! frame: carve into a random unvisited neighbor, or backtrack one cell
//! when boxed in. When the whole grid is carved it reseeds itself from the
//! current surface dimensions and starts over — exhaustion is a normal
//! state transition, not an error, and the generator never terminally
//! halts.
//!
//! # Invariants
//!
//! - Wall removal is symmetric: a cell lacks its wall on a side exactly
//!   when the adjacent cell lacks the opposing wall.
//! - The carved passages over visited cells always form a spanning tree;
//!   the property tests below check acyclicity with a union-find.

use algoscope_core::color::Rgba;
use algoscope_core::geometry::Rect;
use algoscope_core::rng::UniformSource;
use algoscope_core::surface::Surface;
use algoscope_core::viz::{FrameContext, Visualization};

use bitflags::bitflags;

bitflags! {
    /// Wall sides of one maze cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Walls: u8 {
        /// Wall along the top edge.
        const TOP = 1 << 0;
        /// Wall along the right edge.
        const RIGHT = 1 << 1;
        /// Wall along the bottom edge.
        const BOTTOM = 1 << 2;
        /// Wall along the left edge.
        const LEFT = 1 << 3;
    }
}

impl Walls {
    /// The wall on the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        if self == Self::TOP {
            Self::BOTTOM
        } else if self == Self::BOTTOM {
            Self::TOP
        } else if self == Self::LEFT {
            Self::RIGHT
        } else if self == Self::RIGHT {
            Self::LEFT
        } else {
            self
        }
    }
}

/// The four axis-aligned neighbor offsets with the wall they share.
const NEIGHBOR_SIDES: [(isize, isize, Walls); 4] = [
    (0, -1, Walls::TOP),
    (1, 0, Walls::RIGHT),
    (0, 1, Walls::BOTTOM),
    (-1, 0, Walls::LEFT),
];

/// One cell: wall flags plus a visited mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeCell {
    /// Remaining walls.
    pub walls: Walls,
    /// Whether the depth-first walk has entered this cell.
    pub visited: bool,
}

impl Default for MazeCell {
    fn default() -> Self {
        Self {
            walls: Walls::all(),
            visited: false,
        }
    }
}

/// Dense cell grid, indexed `i + j * cols`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    cols: usize,
    rows: usize,
    cells: Vec<MazeCell>,
}

impl MazeGrid {
    /// Create a fully-walled, unvisited grid.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![MazeCell::default(); cols * rows],
        }
    }

    /// Size a grid from surface dimensions and a cell side length.
    ///
    /// A surface smaller than one cell still yields a 1×1 grid so the
    /// generator always has something to do on a non-empty surface.
    #[must_use]
    pub fn from_surface(width: f64, height: f64, cell_size: f64) -> Self {
        let cols = ((width / cell_size).floor() as usize).max(1);
        let rows = ((height / cell_size).floor() as usize).max(1);
        Self::new(cols, rows)
    }

    /// Column count.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total cell count.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a grid with no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.cols && j < self.rows);
        i + j * self.cols
    }

    /// The cell at `(i, j)`.
    #[inline]
    #[must_use]
    pub fn cell(&self, i: usize, j: usize) -> &MazeCell {
        &self.cells[self.index(i, j)]
    }

    fn cell_mut(&mut self, i: usize, j: usize) -> &mut MazeCell {
        let idx = self.index(i, j);
        &mut self.cells[idx]
    }

    /// Number of visited cells.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    /// Remove the wall between `(i, j)` and its neighbor on `side`,
    /// clearing the opposing wall of the neighbor as well.
    fn carve(&mut self, i: usize, j: usize, side: Walls, ni: usize, nj: usize) {
        self.cell_mut(i, j).walls.remove(side);
        self.cell_mut(ni, nj).walls.remove(side.opposite());
    }
}

/// Outcome of one primitive generator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeStep {
    /// Carved into a fresh neighbor.
    Carved,
    /// Popped the stack back to an earlier cell.
    Backtracked,
    /// The grid was fully carved; a new grid was seeded.
    Reinitialized,
    /// No grid yet (setup has not observed a usable surface).
    Idle,
}

/// Colors for the maze rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazePalette {
    /// Background fill of visited cells.
    pub visited: Rgba,
    /// Wall strokes.
    pub wall: Rgba,
    /// Overlay on the cell the walk currently occupies.
    pub head: Rgba,
}

impl Default for MazePalette {
    fn default() -> Self {
        Self {
            visited: Rgba::rgb(36, 24, 64),
            wall: Rgba::rgb(210, 210, 230),
            head: Rgba::rgb(120, 220, 160),
        }
    }
}

/// Default cell side length in logical units.
pub const DEFAULT_CELL_SIZE: f64 = 15.0;

/// Default primitive operations per frame.
pub const DEFAULT_OPS_PER_FRAME: usize = 20;

/// The live maze visualization.
///
/// Owns the grid, the backtracking stack, and the walk head. State
/// survives resizes as long as the derived grid dimensions are unchanged;
/// otherwise the maze restarts from a fresh seed.
pub struct MazeGenerator {
    grid: MazeGrid,
    stack: Vec<(usize, usize)>,
    current: Option<(usize, usize)>,
    rng: Box<dyn UniformSource>,
    cell_size: f64,
    ops_per_frame: usize,
    palette: MazePalette,
    surface_size: (f64, f64),
}

impl MazeGenerator {
    /// Create a generator with no grid yet; the first frame with a usable
    /// surface seeds it.
    #[must_use]
    pub fn new(rng: Box<dyn UniformSource>) -> Self {
        Self {
            grid: MazeGrid::new(0, 0),
            stack: Vec::new(),
            current: None,
            rng,
            cell_size: DEFAULT_CELL_SIZE,
            ops_per_frame: DEFAULT_OPS_PER_FRAME,
            palette: MazePalette::default(),
            surface_size: (0.0, 0.0),
        }
    }

    /// Set the cell side length (minimum 1 logical unit).
    #[must_use]
    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size.max(1.0);
        self
    }

    /// Set the operation batch size per frame (minimum 1).
    #[must_use]
    pub fn ops_per_frame(mut self, ops: usize) -> Self {
        self.ops_per_frame = ops.max(1);
        self
    }

    /// Set the colors.
    #[must_use]
    pub fn palette(mut self, palette: MazePalette) -> Self {
        self.palette = palette;
        self
    }

    /// The grid, for inspection.
    #[must_use]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// The walk head, if a grid exists.
    #[must_use]
    pub fn head(&self) -> Option<(usize, usize)> {
        self.current
    }

    /// Depth of the backtracking stack.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Rebuild the grid from the given surface size and seed a new walk.
    fn reseed(&mut self, width: f64, height: f64) {
        self.grid = MazeGrid::from_surface(width, height, self.cell_size);
        self.stack.clear();
        let i = self.rng.next_below(self.grid.cols() as u32) as usize;
        let j = self.rng.next_below(self.grid.rows() as u32) as usize;
        self.grid.cell_mut(i, j).visited = true;
        self.current = Some((i, j));
    }

    /// Perform one primitive operation.
    pub fn step(&mut self) -> MazeStep {
        if self.grid.is_empty() {
            return MazeStep::Idle;
        }

        if let Some((i, j)) = self.current {
            let mut candidates = [(0usize, 0usize, Walls::empty()); 4];
            let mut count = 0;
            for (di, dj, side) in NEIGHBOR_SIDES {
                let ni = i as isize + di;
                let nj = j as isize + dj;
                if ni < 0
                    || nj < 0
                    || ni as usize >= self.grid.cols()
                    || nj as usize >= self.grid.rows()
                {
                    continue;
                }
                let (ni, nj) = (ni as usize, nj as usize);
                if !self.grid.cell(ni, nj).visited {
                    candidates[count] = (ni, nj, side);
                    count += 1;
                }
            }

            if count > 0 {
                let pick = self.rng.next_below(count as u32) as usize;
                let (ni, nj, side) = candidates[pick];
                self.grid.cell_mut(ni, nj).visited = true;
                self.stack.push((i, j));
                self.grid.carve(i, j, side, ni, nj);
                self.current = Some((ni, nj));
                return MazeStep::Carved;
            }

            if let Some(previous) = self.stack.pop() {
                self.current = Some(previous);
                return MazeStep::Backtracked;
            }
        }

        // Fully carved (or the head was lost to an exhausted grid):
        // rebuild from the current surface dimensions immediately.
        let (width, height) = self.surface_size;
        self.reseed(width, height);
        MazeStep::Reinitialized
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let size = self.cell_size;
        for j in 0..self.grid.rows() {
            for i in 0..self.grid.cols() {
                let cell = self.grid.cell(i, j);
                if !cell.visited {
                    continue;
                }
                let x = i as f64 * size;
                let y = j as f64 * size;
                surface.fill_rect(Rect::new(x, y, size, size), self.palette.visited);

                let walls = cell.walls;
                if walls.contains(Walls::TOP) {
                    surface.stroke_line((x, y), (x + size, y), 1.0, self.palette.wall);
                }
                if walls.contains(Walls::RIGHT) {
                    surface.stroke_line((x + size, y), (x + size, y + size), 1.0, self.palette.wall);
                }
                if walls.contains(Walls::BOTTOM) {
                    surface.stroke_line((x, y + size), (x + size, y + size), 1.0, self.palette.wall);
                }
                if walls.contains(Walls::LEFT) {
                    surface.stroke_line((x, y), (x, y + size), 1.0, self.palette.wall);
                }
            }
        }

        if let Some((i, j)) = self.current {
            let rect = Rect::new(i as f64 * size, j as f64 * size, size, size).inset(size * 0.2);
            surface.fill_rect(rect, self.palette.head);
        }
    }
}

impl Visualization for MazeGenerator {
    fn name(&self) -> &'static str {
        "maze-growth"
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.surface_size = (width, height);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let next = MazeGrid::from_surface(width, height, self.cell_size);
        // Cell geometry unchanged: the walk survives the resize.
        if next.cols() == self.grid.cols() && next.rows() == self.grid.rows() {
            return;
        }
        self.reseed(width, height);
    }

    fn frame(&mut self, ctx: &FrameContext, surface: &mut dyn Surface) {
        self.surface_size = (ctx.width, ctx.height);
        if ctx.width <= 0.0 || ctx.height <= 0.0 {
            return;
        }
        if self.grid.is_empty() {
            self.reseed(ctx.width, ctx.height);
        }
        for _ in 0..self.ops_per_frame {
            self.step();
        }
        self.draw(surface);
    }
}

impl std::fmt::Debug for MazeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MazeGenerator")
            .field("cols", &self.grid.cols())
            .field("rows", &self.grid.rows())
            .field("visited", &self.grid.visited_count())
            .field("stack_depth", &self.stack.len())
            .field("head", &self.current)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_core::rng::SplitMix64;
    use algoscope_core::surface::HeadlessSurface;
    use proptest::prelude::*;

    fn generator(seed: u64) -> MazeGenerator {
        MazeGenerator::new(Box::new(SplitMix64::new(seed)))
    }

    fn ctx(width: f64, height: f64, frame_index: u64) -> FrameContext {
        FrameContext {
            width,
            height,
            frame_index,
            time_seconds: frame_index as f64 / 60.0,
        }
    }

    /// Union-find acyclicity check over the carved-passage graph.
    fn passages_form_a_forest(grid: &MazeGrid) -> bool {
        let mut parent: Vec<usize> = (0..grid.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for j in 0..grid.rows() {
            for i in 0..grid.cols() {
                // Count each carved edge once, via its right/bottom side.
                let here = i + j * grid.cols();
                if i + 1 < grid.cols() && !grid.cell(i, j).walls.contains(Walls::RIGHT) {
                    let there = (i + 1) + j * grid.cols();
                    let (a, b) = (find(&mut parent, here), find(&mut parent, there));
                    if a == b {
                        return false;
                    }
                    parent[a] = b;
                }
                if j + 1 < grid.rows() && !grid.cell(i, j).walls.contains(Walls::BOTTOM) {
                    let there = i + (j + 1) * grid.cols();
                    let (a, b) = (find(&mut parent, here), find(&mut parent, there));
                    if a == b {
                        return false;
                    }
                    parent[a] = b;
                }
            }
        }
        true
    }

    fn carved_edge_count(grid: &MazeGrid) -> usize {
        let mut missing = 0;
        for j in 0..grid.rows() {
            for i in 0..grid.cols() {
                let walls = grid.cell(i, j).walls;
                missing += 4 - walls.bits().count_ones() as usize;
            }
        }
        // Symmetric removal: every carved passage clears two flags.
        missing / 2
    }

    #[test]
    fn walls_opposite_pairs() {
        assert_eq!(Walls::TOP.opposite(), Walls::BOTTOM);
        assert_eq!(Walls::LEFT.opposite(), Walls::RIGHT);
        assert_eq!(Walls::RIGHT.opposite(), Walls::LEFT);
        assert_eq!(Walls::BOTTOM.opposite(), Walls::TOP);
    }

    #[test]
    fn grid_is_sized_from_surface() {
        let grid = MazeGrid::from_surface(300.0, 150.0, 15.0);
        assert_eq!((grid.cols(), grid.rows()), (20, 10));
    }

    #[test]
    fn tiny_surface_still_yields_one_cell() {
        let grid = MazeGrid::from_surface(4.0, 4.0, 15.0);
        assert_eq!((grid.cols(), grid.rows()), (1, 1));
    }

    #[test]
    fn step_without_grid_is_idle() {
        let mut maze = generator(1);
        assert_eq!(maze.step(), MazeStep::Idle);
    }

    #[test]
    fn first_usable_frame_seeds_the_walk() {
        let mut maze = generator(2);
        let mut surface = HeadlessSurface::new(60.0, 60.0);
        maze.frame(&ctx(60.0, 60.0, 0), &mut surface);
        assert!(!maze.grid().is_empty());
        assert!(maze.head().is_some());
        assert!(maze.grid().visited_count() >= 1);
    }

    #[test]
    fn wall_removal_is_symmetric() {
        let mut maze = generator(3);
        maze.surface_size = (90.0, 90.0);
        maze.reseed(90.0, 90.0);
        for _ in 0..200 {
            maze.step();
        }
        let grid = maze.grid();
        for j in 0..grid.rows() {
            for i in 0..grid.cols() {
                if i + 1 < grid.cols() {
                    assert_eq!(
                        grid.cell(i, j).walls.contains(Walls::RIGHT),
                        grid.cell(i + 1, j).walls.contains(Walls::LEFT),
                        "asymmetric wall between ({i},{j}) and ({},{j})",
                        i + 1
                    );
                }
                if j + 1 < grid.rows() {
                    assert_eq!(
                        grid.cell(i, j).walls.contains(Walls::BOTTOM),
                        grid.cell(i, j + 1).walls.contains(Walls::TOP),
                        "asymmetric wall between ({i},{j}) and ({i},{})",
                        j + 1
                    );
                }
            }
        }
    }

    #[test]
    fn visited_count_is_non_decreasing() {
        let mut maze = generator(4);
        maze.surface_size = (120.0, 120.0);
        maze.reseed(120.0, 120.0);
        let mut previous = maze.grid().visited_count();
        loop {
            if maze.step() == MazeStep::Reinitialized {
                break;
            }
            let visited = maze.grid().visited_count();
            assert!(visited >= previous);
            previous = visited;
        }
    }

    #[test]
    fn exhaustion_within_bounded_operations() {
        let mut maze = generator(5);
        maze.surface_size = (90.0, 60.0);
        maze.reseed(90.0, 60.0);
        let cells = maze.grid().len();

        let mut ops = 0;
        loop {
            ops += 1;
            if maze.step() == MazeStep::Reinitialized {
                break;
            }
            assert!(ops < 2 * cells, "no exhaustion after {ops} operations");
        }
        assert!(ops <= 2 * cells - 1);
        // The reinitialized walk is live again.
        assert!(maze.head().is_some());
        assert_eq!(maze.stack_depth(), 0);
    }

    #[test]
    fn one_by_one_grid_exhausts_immediately() {
        let mut maze = generator(6).cell_size(50.0);
        maze.surface_size = (50.0, 50.0);
        maze.reseed(50.0, 50.0);
        assert_eq!(maze.grid().len(), 1);
        // Seed cell is visited at init; the first operation observes
        // exhaustion and reseeds.
        assert_eq!(maze.step(), MazeStep::Reinitialized);
        assert_eq!(maze.grid().visited_count(), 1);
    }

    #[test]
    fn full_carve_spans_every_cell() {
        let mut maze = generator(7);
        maze.surface_size = (90.0, 90.0);
        maze.reseed(90.0, 90.0);
        let cells = maze.grid().len();

        // Walk until the op just before reinitialization.
        loop {
            let visited = maze.grid().visited_count();
            let edges = carved_edge_count(maze.grid());
            if visited == cells && maze.stack_depth() == 0 {
                // Spanning tree: n - 1 edges over n cells, acyclic.
                assert_eq!(edges, cells - 1);
                assert!(passages_form_a_forest(maze.grid()));
                break;
            }
            maze.step();
        }
    }

    #[test]
    fn resize_with_same_geometry_preserves_state() {
        let mut maze = generator(8);
        let mut surface = HeadlessSurface::new(150.0, 150.0);
        maze.frame(&ctx(150.0, 150.0, 0), &mut surface);
        let visited_before = maze.grid().visited_count();
        assert!(visited_before > 1);

        // A few logical units of change that keep cols/rows identical.
        maze.resize(152.0, 151.0);
        assert_eq!(maze.grid().visited_count(), visited_before);
    }

    #[test]
    fn resize_with_new_geometry_rebuilds() {
        let mut maze = generator(9);
        let mut surface = HeadlessSurface::new(150.0, 150.0);
        maze.frame(&ctx(150.0, 150.0, 0), &mut surface);
        assert!(maze.grid().visited_count() > 1);

        maze.resize(600.0, 600.0);
        assert_eq!(maze.grid().cols(), 40);
        // Fresh walk: only the new seed is visited.
        assert_eq!(maze.grid().visited_count(), 1);
        assert_eq!(maze.stack_depth(), 0);
    }

    #[test]
    fn zero_area_frame_draws_nothing() {
        let mut maze = generator(10);
        let mut surface = HeadlessSurface::new(0.0, 0.0);
        maze.frame(&ctx(0.0, 0.0, 0), &mut surface);
        assert!(surface.ops().is_empty());
        assert!(maze.grid().is_empty());
    }

    #[test]
    fn visited_cells_render_fill_and_head_overlay() {
        let mut maze = generator(11);
        let mut surface = HeadlessSurface::new(60.0, 60.0);
        maze.frame(&ctx(60.0, 60.0, 0), &mut surface);

        let visited = maze.grid().visited_count();
        // One fill per visited cell plus the head overlay.
        assert_eq!(surface.fill_count(), visited + 1);
        assert!(surface.line_count() > 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn passages_stay_acyclic_under_any_seed(
            seed: u64,
            width in 30.0f64..200.0,
            height in 30.0f64..200.0,
            ops in 1usize..600
        ) {
            let mut maze = generator(seed);
            maze.surface_size = (width, height);
            maze.reseed(width, height);
            for _ in 0..ops {
                maze.step();
            }
            prop_assert!(passages_form_a_forest(maze.grid()));
            // Visited cells and carved passages stay in lockstep while a
            // single walk is live (reseeding resets both).
            let visited = maze.grid().visited_count();
            let edges = carved_edge_count(maze.grid());
            prop_assert_eq!(edges, visited.saturating_sub(1));
        }
    }
}
