// Board engine: cell grid, mine placement, adjacency counts, reveal rules
// The flood fill is a bounded FIFO traversal over the grid graph

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::xtm_coord::{neighbors, validate};
use crate::xtm_error::{GameError, Result};

/// A single cell on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Number of mined cells among the in-bounds 8-neighbors (0-8).
    pub adjacent_mines: u8,
    /// Whether the cell has been revealed; never reverts within a round.
    pub revealed: bool,
    /// Player mark; toggled freely while unrevealed, forced off on reset.
    pub marked: bool,
    /// Whether the cell holds a mine; fixed for the duration of a round.
    pub has_mine: bool,
}

/// The mine field: exclusive owner of the cell grid plus the round
/// bookkeeping the controller reads to decide wins and losses.
///
/// `hidden_count` starts at `width * height` on reset and is decremented
/// exactly once per non-mine cell the first time it is revealed; mines
/// never decrement it, so `hidden_count == mine_count` means every safe
/// cell has been revealed.
#[derive(Debug)]
pub struct Board {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    fill: f64,
    mine_count: usize,
    hidden_count: usize,
    rng: StdRng,
}

impl Board {
    /// Create an uninitialized board; call [`reset`](Board::reset) to place
    /// mines. `fill` is the probability that any given cell holds a mine.
    pub fn new(width: usize, height: usize, fill: f64) -> Result<Board> {
        Board::with_rng(width, height, fill, StdRng::from_entropy())
    }

    /// Like [`new`](Board::new), but with a fixed seed so mine layouts are
    /// reproducible.
    pub fn with_seed(width: usize, height: usize, fill: f64, seed: u64) -> Result<Board> {
        Board::with_rng(width, height, fill, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, fill: f64, rng: StdRng) -> Result<Board> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize { width, height });
        }
        if !(0.0..=1.0).contains(&fill) {
            return Err(GameError::InvalidFillRatio { fill });
        }
        Ok(Board {
            cells: vec![Cell::default(); width * height],
            width,
            height,
            fill,
            mine_count: 0,
            hidden_count: 0,
            rng,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total mines placed this round.
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Cells not yet revealed through the safe-reveal path; mines stay
    /// counted here for the whole round.
    pub fn hidden_count(&self) -> usize {
        self.hidden_count
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Start a fresh round: clear every cell, then roll an independent
    /// Bernoulli trial per cell for mine placement, bumping the adjacency
    /// counts of each mined cell's neighbors as it lands. A round with
    /// zero mines, or with nothing but mines, is legal.
    pub fn reset(&mut self) {
        self.mine_count = 0;
        self.hidden_count = self.width * self.height;
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if self.rng.gen_bool(self.fill) {
                    let idx = self.index(x, y);
                    self.cells[idx].has_mine = true;
                    self.mine_count += 1;
                    for (nx, ny) in neighbors(x, y, self.width, self.height) {
                        let nidx = self.index(nx, ny);
                        self.cells[nidx].adjacent_mines += 1;
                    }
                }
            }
        }
        debug!(
            "board reset: {} mines on {}x{} (fill {})",
            self.mine_count, self.width, self.height, self.fill
        );
    }

    /// Read a cell's state. Fails on out-of-range coordinates.
    pub fn cell_at(&self, x: usize, y: usize) -> Result<Cell> {
        validate(x, y, self.width, self.height)?;
        Ok(self.cells[self.index(x, y)])
    }

    /// Read-only view of the grid, one row at a time, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Reveal the cell at `(x, y)`. Already-revealed cells are a no-op.
    /// A cell with no mine and no adjacent mines triggers the flood fill;
    /// anything else reveals just that one cell. Marks are not consulted
    /// here; the controller decides whether marked cells may be revealed.
    pub fn reveal(&mut self, x: usize, y: usize) -> Result<()> {
        validate(x, y, self.width, self.height)?;
        let cell = self.cells[self.index(x, y)];
        if cell.revealed {
            return Ok(());
        }
        if cell.adjacent_mines == 0 && !cell.has_mine {
            self.flood_reveal(x, y);
        } else {
            self.reveal_single(x, y);
        }
        Ok(())
    }

    /// Flip the mark on an unrevealed cell; revealed cells are a no-op.
    pub fn toggle_mark(&mut self, x: usize, y: usize) -> Result<()> {
        validate(x, y, self.width, self.height)?;
        let idx = self.index(x, y);
        if self.cells[idx].revealed {
            return Ok(());
        }
        self.cells[idx].marked = !self.cells[idx].marked;
        Ok(())
    }

    /// Show every mine, whatever its current state; used to display the
    /// full layout after a loss. Leaves `hidden_count` untouched.
    pub fn reveal_mines(&mut self) {
        for cell in &mut self.cells {
            if cell.has_mine {
                cell.revealed = true;
            }
        }
    }

    fn reveal_single(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        if cell.revealed {
            return;
        }
        cell.revealed = true;
        // revealed mines never count toward the hidden tally
        if !cell.has_mine {
            self.hidden_count -= 1;
        }
    }

    /// Breadth-first reveal across the connected zero-count region.
    ///
    /// The queue is seeded with the triggering cell; every dequeued cell is
    /// revealed at most once, and neighbors are enqueued only from cells
    /// with a zero adjacency count, so the expansion stops at the numbered
    /// boundary and the traversal is bounded by the grid size. Mines never
    /// enter this path: a zero-count cell has no mined neighbor to enqueue.
    fn flood_reveal(&mut self, x: usize, y: usize) {
        let mut queue = VecDeque::new();
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            let idx = self.index(cx, cy);

            // the same cell can be queued by several neighbors before
            // being processed; reveal it once
            if self.cells[idx].revealed {
                continue;
            }

            self.cells[idx].revealed = true;
            self.hidden_count -= 1;

            if self.cells[idx].adjacent_mines != 0 {
                continue;
            }

            for (nx, ny) in neighbors(cx, cy, self.width, self.height) {
                if !self.cells[self.index(nx, ny)].revealed {
                    queue.push_back((nx, ny));
                }
            }
        }
    }
}
