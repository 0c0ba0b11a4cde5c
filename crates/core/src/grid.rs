//! Grid module - token storage and the match/cascade engine
//!
//! The grid is a `width x height` board stored as a flat row-major array of
//! cells (`row * width + col`). Row 0 is the top; gravity pulls towards the
//! last row.
//!
//! One player action is resolved by the controller as:
//!
//! 1. [`Grid::swap`] the two cells
//! 2. [`Grid::find_matches`] seeded at both cells (revert the swap on `None`)
//! 3. [`Grid::remove_matches`], then [`Grid::settle_and_refill`]
//! 4. [`Grid::find_matches`] seeded at every settled token, back to 3 until `None`
//! 5. [`Grid::count_possible_matches`], which rebuilds the board when it is stuck

use crate::config::GridConfig;
use crate::error::GridError;
use crate::matcher::{self, ColorBoard};
use crate::rng::SimpleRng;
use crate::token::{Cell, Token, TokenId};
use crate::types::{Position, PowerUp};

/// One connected set of matched tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Tokens that will be deleted.
    pub tokens: Vec<Token>,
    /// The last-moved token, kept alive and tagged as a power-up.
    pub promoted: Option<Token>,
}

impl Match {
    /// Number of tokens deleted by this match (the promoted survivor excluded).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Size of the match as detected, survivor included.
    pub fn original_len(&self) -> usize {
        self.tokens.len() + usize::from(self.promoted.is_some())
    }

    pub fn contains(&self, position: Position) -> bool {
        self.promoted.iter().chain(&self.tokens).any(|t| t.position() == position)
    }
}

/// A power-up token to be created where a qualifying match was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerUpRequest {
    pub position: Position,
    pub color: u8,
    pub kind: PowerUp,
}

/// A token that moved down or was spawned by [`Grid::settle_and_refill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    /// Token as it rests now (its `row` equals `target_row`).
    pub token: Token,
    /// Row the token starts from; spawned tokens start one row above their target.
    pub from_row: isize,
    pub target_row: usize,
    pub spawned: bool,
}

impl Fall {
    pub fn position(&self) -> Position {
        Position::new(self.target_row, self.token.col)
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    num_colors: u8,
    num_varieties: u8,
    cells: Vec<Cell>,
    rng: SimpleRng,
    next_id: u32,
    /// Matches found by the last `find_matches`, consumed by `remove_matches`.
    matches: Vec<Match>,
    regenerations: u32,
}

impl Grid {
    /// Create a grid filled with a random, match-free layout
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let mut grid = Self::empty(config);
        grid.initialize();
        Ok(grid)
    }

    /// Create a grid from a hand-built color layout (`layout[row][col]`).
    ///
    /// The layout decides the dimensions; `config.width`/`config.height` are
    /// ignored. Runs in the layout are kept as they are.
    pub fn from_layout<R: AsRef<[u8]>>(config: GridConfig, layout: &[R]) -> Result<Self, GridError> {
        let height = layout.len();
        let width = layout.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let config = GridConfig {
            width,
            height,
            ..config
        };
        config.validate()?;

        let mut grid = Self::empty(config);
        for (row, colors) in layout.iter().enumerate() {
            let colors = colors.as_ref();
            if colors.len() != width {
                return Err(GridError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    colors.len(),
                    width
                )));
            }
            for (col, &color) in colors.iter().enumerate() {
                if color >= grid.num_colors {
                    return Err(GridError::InvalidLayout(format!(
                        "color {} at ({}, {}) is outside 0..{}",
                        color, row, col, grid.num_colors
                    )));
                }
                let token = grid.spawn_token(row, col, color);
                let idx = grid.idx(row, col);
                grid.cells[idx] = Some(token);
            }
        }
        Ok(grid)
    }

    fn empty(config: GridConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            num_colors: config.num_colors,
            num_varieties: config.num_varieties,
            cells: vec![None; config.width * config.height],
            rng: SimpleRng::new(config.seed),
            next_id: 0,
            matches: Vec::new(),
            regenerations: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Number of times the board was rebuilt because no move was left
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }

    /// Flat row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Matches stored by the last `find_matches` call and not yet removed
    pub fn pending_matches(&self) -> &[Match] {
        &self.matches
    }

    #[inline(always)]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Flat index of `position`, or `InvalidPosition`
    fn index(&self, position: Position) -> Result<usize, GridError> {
        if position.row >= self.height || position.col >= self.width {
            return Err(GridError::InvalidPosition {
                position,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.idx(position.row, position.col))
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.height && position.col < self.width
    }

    /// Token at `position` (`Ok(None)` for an empty cell)
    pub fn token_at(&self, position: Position) -> Result<Cell, GridError> {
        self.index(position).map(|idx| self.cells[idx])
    }

    /// Colors as `rows[row][col]`, `None` for empty cells
    pub fn color_rows(&self) -> Vec<Vec<Option<u8>>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.map(|t| t.color)).collect())
            .collect()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    fn spawn_token(&mut self, row: usize, col: usize, color: u8) -> Token {
        let id = TokenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let variant = self.rng.variant(self.num_varieties);
        Token::new(id, row, col, color, variant)
    }

    /// Would `color` at (row, col) complete a run with the cells above or to the left?
    fn creates_run(&self, row: usize, col: usize, color: u8) -> bool {
        let same = |r: usize, c: usize| self.color_at(self.idx(r, c)) == Some(color);
        (row >= 2 && same(row - 1, col) && same(row - 2, col))
            || (col >= 2 && same(row, col - 1) && same(row, col - 2))
    }

    /// Fill every cell row-major with a color that does not complete a run.
    fn initialize(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.matches.clear();

        for row in 0..self.height {
            for col in 0..self.width {
                let mut color = self.rng.color(self.num_colors);
                while self.creates_run(row, col, color) {
                    color = self.rng.color(self.num_colors);
                }
                let token = self.spawn_token(row, col, color);
                let idx = self.idx(row, col);
                self.cells[idx] = Some(token);
            }
        }
    }

    /// Replace the whole board with a fresh match-free layout (new level)
    pub fn reset(&mut self) {
        self.initialize();
    }

    /// Rebuild a board that has no legal move left
    pub fn regenerate(&mut self) {
        self.regenerations += 1;
        self.initialize();
    }

    /// Exchange two cells, keeping each token's row/col in sync.
    ///
    /// Adjacency is the caller's concern.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        let (ia, ib) = (self.index(a)?, self.index(b)?);
        self.cells.swap(ia, ib);
        for (idx, pos) in [(ia, a), (ib, b)] {
            if let Some(token) = self.cells[idx].as_mut() {
                token.row = pos.row;
                token.col = pos.col;
            }
        }
        Ok(())
    }

    pub fn set_visible(&mut self, position: Position, visible: bool) -> Result<(), GridError> {
        let idx = self.index(position)?;
        if let Some(token) = self.cells[idx].as_mut() {
            token.visible = visible;
        }
        Ok(())
    }

    /// Empty the given cells and return the tokens that were there.
    ///
    /// Every position is checked before anything is removed.
    pub fn clear_cells(&mut self, positions: &[Position]) -> Result<Vec<Token>, GridError> {
        let indices = positions
            .iter()
            .map(|&p| self.index(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(indices
            .into_iter()
            .filter_map(|idx| self.cells[idx].take())
            .collect())
    }

    /// Detect matches seeded at `seeds`.
    ///
    /// When `last_moved` is given, the match containing that cell with at
    /// least 4 tokens keeps the token alive: it is taken out of the match and
    /// tagged `RowColClear` (4) or `ColorClear` (5+). The result is stored
    /// for [`Grid::remove_matches`].
    pub fn find_matches(
        &mut self,
        seeds: &[Position],
        last_moved: Option<Position>,
    ) -> Result<Option<Vec<Match>>, GridError> {
        let seeds = seeds
            .iter()
            .map(|&p| self.index(p))
            .collect::<Result<Vec<_>, _>>()?;
        let last_moved = last_moved.map(|p| self.index(p)).transpose()?;

        let groups = matcher::discover(&*self, &seeds);

        let mut matches = Vec::with_capacity(groups.len());
        for members in groups {
            let promote = last_moved.filter(|idx| {
                PowerUp::for_match_len(members.len()).is_some() && members.contains(idx)
            });

            let mut promoted = None;
            if let Some(idx) = promote {
                if let Some(token) = self.cells[idx].as_mut() {
                    token.power_up = PowerUp::for_match_len(members.len());
                    promoted = Some(*token);
                }
            }

            let tokens = members
                .into_iter()
                .filter(|&idx| Some(idx) != promote)
                .filter_map(|idx| self.cells[idx])
                .collect();
            matches.push(Match { tokens, promoted });
        }

        self.matches = matches;
        if self.matches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.matches.clone()))
        }
    }

    /// Delete the pending matches and create the earned power-ups.
    ///
    /// A promoted token becomes a power-up only when it sits at `last_moved`;
    /// otherwise it is deleted with the rest of its match. Without pending
    /// matches this does nothing.
    pub fn remove_matches(&mut self, last_moved: Option<Position>) -> Vec<PowerUpRequest> {
        let matches = std::mem::take(&mut self.matches);
        let mut requests: Vec<PowerUpRequest> = Vec::new();

        for m in &matches {
            if let Some(survivor) = m.promoted {
                let position = survivor.position();
                if last_moved == Some(position) && requests.iter().all(|r| r.position != position) {
                    requests.push(PowerUpRequest {
                        position,
                        color: survivor.color,
                        kind: survivor.power_up,
                    });
                } else {
                    self.remove_token(&survivor);
                }
            }
            for token in &m.tokens {
                if requests.iter().any(|r| r.position == token.position()) {
                    continue;
                }
                self.remove_token(token);
            }
        }

        for request in &requests {
            let Position { row, col } = request.position;
            let mut token = self.spawn_token(row, col, request.color);
            token.power_up = request.kind;
            let idx = self.idx(row, col);
            self.cells[idx] = Some(token);
        }

        requests
    }

    /// Empty the cell of `token` if that token still occupies it
    fn remove_token(&mut self, token: &Token) {
        if !self.contains(token.position()) {
            return;
        }
        let idx = self.idx(token.row, token.col);
        if self.cells[idx].map(|t| t.id) == Some(token.id) {
            self.cells[idx] = None;
        }
    }

    /// Let tokens fall into empty cells below them, then refill from the top.
    ///
    /// Columns are compacted bottom-up with a write pointer. Remaining empty
    /// cells (all at the top) get new random tokens that start one row above
    /// their target. Returns every token that moved or spawned.
    pub fn settle_and_refill(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();

        for col in 0..self.width {
            let mut write_row = self.height;
            for read_row in (0..self.height).rev() {
                let read_idx = self.idx(read_row, col);
                let Some(mut token) = self.cells[read_idx] else {
                    continue;
                };
                write_row -= 1;
                if write_row == read_row {
                    continue;
                }
                self.cells[read_idx] = None;
                token.row = write_row;
                let write_idx = self.idx(write_row, col);
                self.cells[write_idx] = Some(token);
                falls.push(Fall {
                    token,
                    from_row: read_row as isize,
                    target_row: write_row,
                    spawned: false,
                });
            }
        }

        for col in 0..self.width {
            for row in 0..self.height {
                let idx = self.idx(row, col);
                if self.cells[idx].is_some() {
                    continue;
                }
                let color = self.rng.color(self.num_colors);
                let token = self.spawn_token(row, col, color);
                self.cells[idx] = Some(token);
                falls.push(Fall {
                    token,
                    from_row: row as isize - 1,
                    target_row: row,
                    spawned: true,
                });
            }
        }

        falls
    }

    /// Is there any run of 3+ equal colors anywhere on the board?
    pub fn has_run(&self) -> bool {
        (0..self.height).any(|row| self.line_has_run((0..self.width).map(|col| self.idx(row, col))))
            || (0..self.width).any(|col| self.line_has_run((0..self.height).map(|row| self.idx(row, col))))
    }

    fn line_has_run(&self, line: impl Iterator<Item = usize>) -> bool {
        let mut previous = None;
        let mut count = 0;
        for idx in line {
            let color = self.color_at(idx);
            if color.is_some() && color == previous {
                count += 1;
                if count >= 3 {
                    return true;
                }
            } else {
                count = 1;
            }
            previous = color;
        }
        false
    }

    /// Every adjacent pair whose swap leaves a run somewhere on the board.
    ///
    /// The board is scanned as a whole after each trial swap, so a run that
    /// already exists elsewhere counts for every pair.
    pub fn possible_swaps(&mut self) -> Vec<(Position, Position)> {
        let mut swaps = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let here = self.idx(row, col);
                let neighbors = [
                    (col + 1 < self.width).then(|| Position::new(row, col + 1)),
                    (row + 1 < self.height).then(|| Position::new(row + 1, col)),
                ];
                for other in neighbors.into_iter().flatten() {
                    let there = self.idx(other.row, other.col);
                    self.cells.swap(here, there);
                    if self.has_run() {
                        swaps.push((Position::new(row, col), other));
                    }
                    self.cells.swap(here, there);
                }
            }
        }
        swaps
    }

    /// Count the swaps that produce a match, rebuilding the board until there is one.
    pub fn count_possible_matches(&mut self) -> usize {
        loop {
            let count = self.possible_swaps().len();
            if count > 0 {
                return count;
            }
            self.regenerate();
        }
    }

    /// Tokens hit by activating `token`; the grid is left untouched.
    ///
    /// - `RowColClear`: every other token in its row and its column
    /// - `ColorClear`: every other token of its color
    pub fn activate_power_up(&self, token: &Token) -> Result<Vec<Token>, GridError> {
        let origin = token.position();
        self.index(origin)?;

        let hit: Vec<Token> = match token.power_up {
            PowerUp::None => Vec::new(),
            PowerUp::RowColClear => {
                let row = (0..self.width)
                    .filter(|&col| col != origin.col)
                    .filter_map(|col| self.cells[self.idx(origin.row, col)]);
                let column = (0..self.height)
                    .filter(|&row| row != origin.row)
                    .filter_map(|row| self.cells[self.idx(row, origin.col)]);
                row.chain(column).collect()
            }
            PowerUp::ColorClear => self
                .cells
                .iter()
                .flatten()
                .filter(|t| t.color == token.color && t.position() != origin)
                .copied()
                .collect(),
        };
        Ok(hit)
    }
}

impl ColorBoard for Grid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_at(&self, idx: usize) -> Option<u8> {
        self.cells.get(idx).copied().flatten().map(|t| t.color)
    }
}
