//! Session module - drives one game on top of the grid engine
//!
//! The session plays the controller role: it validates swap requests, reverts
//! swaps that match nothing, runs cascades to a fixed point, scores them, and
//! tracks the level goal and countdown. Every call resolves completely before
//! returning, so a new action can never start in the middle of a cascade.

use crate::config::GridConfig;
use crate::error::GridError;
use crate::grid::{Fall, Grid, Match, PowerUpRequest};
use crate::scoring::{clear_score, goal_for_level, matches_score};
use crate::snapshot::GridSnapshot;
use crate::token::Token;
use crate::types::{CoreLastEvent, Position, LEVEL_TIME_MS};

/// One match → remove → settle round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// Matches resolved in this round (empty for a power-up blast).
    pub matches: Vec<Match>,
    pub power_ups: Vec<PowerUpRequest>,
    /// Tokens deleted from the board.
    pub cleared: Vec<Token>,
    pub falls: Vec<Fall>,
    pub score_delta: u32,
}

/// Everything that happened while resolving one player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub steps: Vec<CascadeStep>,
    pub score_delta: u32,
    pub possible_moves: usize,
    pub board_regenerated: bool,
}

impl CascadeReport {
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn power_ups(&self) -> impl Iterator<Item = &PowerUpRequest> {
        self.steps.iter().flat_map(|s| s.power_ups.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No match: the two tokens were put back.
    Reverted,
    Resolved(CascadeReport),
}

impl SwapOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SwapOutcome::Resolved(_))
    }

    pub fn report(&self) -> Option<&CascadeReport> {
        match self {
            SwapOutcome::Resolved(report) => Some(report),
            SwapOutcome::Reverted => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    score: u32,
    level: u32,
    goal: u32,
    timer_ms: u32,
    possible_moves: usize,
    game_over: bool,
    /// Last resolved action (consumed by observers).
    last_event: Option<CoreLastEvent>,
}

impl Session {
    /// Start level 1 on a fresh random board
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::new(config)?))
    }

    /// Start level 1 on an existing board
    pub fn from_grid(mut grid: Grid) -> Self {
        let possible_moves = grid.count_possible_matches();
        Self {
            grid,
            score: 0,
            level: 1,
            goal: goal_for_level(1),
            timer_ms: LEVEL_TIME_MS,
            possible_moves,
            game_over: false,
            last_event: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    pub fn possible_moves(&self) -> usize {
        self.possible_moves
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Take the last action event (if any).
    pub fn take_last_event(&mut self) -> Option<CoreLastEvent> {
        self.last_event.take()
    }

    /// Swap `from` with its neighbor `to`; `to` is where the dragged token lands.
    pub fn try_swap(&mut self, from: Position, to: Position) -> Result<SwapOutcome, GridError> {
        if self.game_over {
            return Err(GridError::GameOver);
        }
        self.grid.token_at(from)?;
        self.grid.token_at(to)?;
        if !from.is_adjacent(to) {
            return Err(GridError::NotAdjacent { a: from, b: to });
        }

        self.grid.swap(from, to)?;
        let Some(matches) = self.grid.find_matches(&[to, from], Some(to))? else {
            self.grid.swap(from, to)?;
            self.last_event = Some(CoreLastEvent::default());
            return Ok(SwapOutcome::Reverted);
        };

        let report = self.cascade(matches, Some(to), Vec::new())?;
        Ok(SwapOutcome::Resolved(report))
    }

    /// Fire the power-up at `position`.
    ///
    /// The hit tokens and the power-up itself are deleted and scored, then
    /// the board settles and cascades like after a swap.
    pub fn activate(&mut self, position: Position) -> Result<CascadeReport, GridError> {
        if self.game_over {
            return Err(GridError::GameOver);
        }
        let token = self
            .grid
            .token_at(position)?
            .filter(Token::is_power_up)
            .ok_or(GridError::NotAPowerUp(position))?;

        let mut hit = self.grid.activate_power_up(&token)?;
        hit.push(token);
        let positions: Vec<Position> = hit.iter().map(Token::position).collect();
        let cleared = self.grid.clear_cells(&positions)?;

        let score_delta = clear_score(cleared.len());
        self.score = self.score.saturating_add(score_delta);
        let falls = self.grid.settle_and_refill();
        let seeds: Vec<Position> = falls.iter().map(Fall::position).collect();

        let blast = CascadeStep {
            matches: Vec::new(),
            power_ups: Vec::new(),
            cleared,
            falls,
            score_delta,
        };

        match self.grid.find_matches(&seeds, None)? {
            Some(matches) => self.cascade(matches, None, vec![blast]),
            None => Ok(self.finish(vec![blast])),
        }
    }

    /// Resolve matches until the board is stable.
    fn cascade(
        &mut self,
        mut matches: Vec<Match>,
        mut last_moved: Option<Position>,
        mut steps: Vec<CascadeStep>,
    ) -> Result<CascadeReport, GridError> {
        loop {
            let score_delta = matches_score(&matches);
            let power_ups = self.grid.remove_matches(last_moved);
            let cleared = cleared_tokens(&matches, &power_ups);
            let falls = self.grid.settle_and_refill();
            self.score = self.score.saturating_add(score_delta);

            let seeds: Vec<Position> = falls.iter().map(Fall::position).collect();
            steps.push(CascadeStep {
                matches,
                power_ups,
                cleared,
                falls,
                score_delta,
            });
            last_moved = None;

            match self.grid.find_matches(&seeds, None)? {
                Some(next) => matches = next,
                None => break,
            }
        }

        Ok(self.finish(steps))
    }

    fn finish(&mut self, steps: Vec<CascadeStep>) -> CascadeReport {
        let regenerations = self.grid.regenerations();
        self.possible_moves = self.grid.count_possible_matches();
        let board_regenerated = self.grid.regenerations() > regenerations;

        let score_delta = steps
            .iter()
            .map(|s| s.score_delta)
            .fold(0u32, u32::saturating_add);

        self.last_event = Some(CoreLastEvent {
            accepted: true,
            cascade_depth: steps.len() as u32,
            matches: steps.iter().map(|s| s.matches.len() as u32).sum(),
            tokens_cleared: steps.iter().map(|s| s.cleared.len() as u32).sum(),
            power_ups_created: steps.iter().map(|s| s.power_ups.len() as u32).sum(),
            score_delta,
            board_regenerated,
        });

        CascadeReport {
            steps,
            score_delta,
            possible_moves: self.possible_moves,
            board_regenerated,
        }
    }

    /// Advance the level clock.
    ///
    /// Reaching the goal starts the next level on a new board (score is kept);
    /// running out of time ends the game. Returns true if the level or the
    /// game state changed.
    ///
    /// The goal is only checked here: a swap that reaches it leaves `level`
    /// unchanged until the next tick.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.game_over {
            return false;
        }

        if self.score >= self.goal {
            self.advance_level();
            return true;
        }

        self.timer_ms = self.timer_ms.saturating_sub(elapsed_ms);
        if self.timer_ms == 0 {
            self.game_over = true;
            return true;
        }
        false
    }

    fn advance_level(&mut self) {
        self.level += 1;
        self.goal = goal_for_level(self.level);
        self.timer_ms = LEVEL_TIME_MS;
        self.grid.reset();
        self.possible_moves = self.grid.count_possible_matches();
    }

    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.clear();
        out.width = self.grid.width();
        out.height = self.grid.height();
        for cell in self.grid.cells() {
            out.colors.push(cell.map(|t| t.color));
            out.power_ups.push(cell.map(|t| t.power_up).unwrap_or_default());
        }
        out.score = self.score;
        out.level = self.level;
        out.goal = self.goal;
        out.timer_ms = self.timer_ms;
        out.possible_moves = self.possible_moves;
        out.regenerations = self.grid.regenerations();
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut snap = GridSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

/// Tokens a round actually deleted: every matched token plus survivors
/// that did not turn into a power-up.
fn cleared_tokens(matches: &[Match], power_ups: &[PowerUpRequest]) -> Vec<Token> {
    let mut cleared = Vec::new();
    for m in matches {
        cleared.extend_from_slice(&m.tokens);
        if let Some(survivor) = m.promoted {
            if power_ups.iter().all(|p| p.position != survivor.position()) {
                cleared.push(survivor);
            }
        }
    }
    cleared
}
