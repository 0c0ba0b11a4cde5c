//! Protocol module - JSON message types for headless controllers
//!
//! Line-delimited JSON. Every message has `type` and `seq`.
//!
//! ```text
//! Client -> Sim: {"type":"command","seq":1,"action":"swap","from":[3,3],"to":[3,4]}
//! Client -> Sim: {"type":"command","seq":2,"action":"activate","at":[5,4]}
//! Sim -> Client: {"type":"result","seq":1,"accepted":true,"score_delta":150,...}
//! Sim -> Client: {"type":"observation","seq":2,"board":{...},"score":150,...}
//! Sim -> Client: {"type":"error","seq":3,"code":"not_adjacent","message":"..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{CascadeReport, GridError, GridSnapshot, PowerUpRequest};
use crate::types::{CoreLastEvent, Position, PowerUp};

// ============== Client -> Sim Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// `[row, col]` on the wire
pub type Coord = [usize; 2];

pub fn to_position(coord: Coord) -> Position {
    Position::new(coord[0], coord[1])
}

pub fn to_coord(position: Position) -> Coord {
    [position.row, position.col]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CommandAction {
    /// Drag the token at `from` onto its neighbor `to`.
    Swap { from: Coord, to: Coord },
    /// Fire the power-up at `at`.
    Activate { at: Coord },
    /// Let `ms` milliseconds of level time pass.
    Tick { ms: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    #[serde(flatten)]
    pub action: CommandAction,
}

// ============== Sim -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "result")]
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpLower {
    None,
    RowColClear,
    ColorClear,
}

impl From<PowerUp> for PowerUpLower {
    fn from(value: PowerUp) -> Self {
        match value {
            PowerUp::None => PowerUpLower::None,
            PowerUp::RowColClear => PowerUpLower::RowColClear,
            PowerUp::ColorClear => PowerUpLower::ColorClear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    /// `cells[row][col]` color, `null` for an empty cell
    pub cells: Vec<Vec<Option<u8>>>,
    /// Cells holding a power-up
    pub power_ups: Vec<PowerUpView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub at: Coord,
    pub color: u8,
    pub kind: PowerUpLower,
}

impl From<&PowerUpRequest> for PowerUpView {
    fn from(value: &PowerUpRequest) -> Self {
        Self {
            at: to_coord(value.position),
            color: value.color,
            kind: value.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub accepted: bool,
    pub cascade_depth: u32,
    pub matches: u32,
    pub tokens_cleared: u32,
    pub power_ups_created: u32,
    pub score_delta: u32,
    pub board_regenerated: bool,
}

impl From<CoreLastEvent> for LastEvent {
    fn from(e: CoreLastEvent) -> Self {
        Self {
            accepted: e.accepted,
            cascade_depth: e.cascade_depth,
            matches: e.matches,
            tokens_cleared: e.tokens_cleared,
            power_ups_created: e.power_ups_created,
            score_delta: e.score_delta,
            board_regenerated: e.board_regenerated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub board: BoardView,
    pub score: u32,
    pub level: u32,
    pub goal: u32,
    pub timer_ms: u32,
    pub possible_moves: usize,
    pub regenerations: u32,
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_event: Option<LastEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub matches: Vec<usize>,
    pub cleared: usize,
    pub fallen: usize,
    pub spawned: usize,
    pub score_delta: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    pub msg_type: ResultType,
    pub seq: u64,
    pub accepted: bool,
    pub score_delta: u32,
    pub steps: Vec<StepView>,
    pub power_ups: Vec<PowerUpView>,
    pub possible_moves: usize,
    pub board_regenerated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: String,
    pub message: String,
}

// ============== Builders ==============

pub fn create_observation(
    seq: u64,
    snap: &GridSnapshot,
    last_event: Option<CoreLastEvent>,
) -> ObservationMessage {
    let cells = (0..snap.height)
        .map(|row| (0..snap.width).map(|col| snap.color(row, col)).collect())
        .collect();

    let power_ups = snap
        .power_ups
        .iter()
        .enumerate()
        .filter(|(_, kind)| kind.is_some())
        .filter_map(|(idx, &kind)| {
            let (row, col) = (idx / snap.width, idx % snap.width);
            snap.color(row, col).map(|color| PowerUpView {
                at: [row, col],
                color,
                kind: kind.into(),
            })
        })
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        board: BoardView {
            width: snap.width,
            height: snap.height,
            cells,
            power_ups,
        },
        score: snap.score,
        level: snap.level,
        goal: snap.goal,
        timer_ms: snap.timer_ms,
        possible_moves: snap.possible_moves,
        regenerations: snap.regenerations,
        game_over: snap.game_over,
        last_event: last_event.map(Into::into),
    }
}

pub fn create_result(seq: u64, report: &CascadeReport) -> ResultMessage {
    let steps = report
        .steps
        .iter()
        .map(|step| StepView {
            matches: step.matches.iter().map(|m| m.original_len()).collect(),
            cleared: step.cleared.len(),
            fallen: step.falls.iter().filter(|f| !f.spawned).count(),
            spawned: step.falls.iter().filter(|f| f.spawned).count(),
            score_delta: step.score_delta,
        })
        .collect();

    ResultMessage {
        msg_type: ResultType::Result,
        seq,
        accepted: true,
        score_delta: report.score_delta,
        steps,
        power_ups: report.power_ups().map(PowerUpView::from).collect(),
        possible_moves: report.possible_moves,
        board_regenerated: report.board_regenerated,
    }
}

pub fn create_rejected(seq: u64, possible_moves: usize) -> ResultMessage {
    ResultMessage {
        msg_type: ResultType::Result,
        seq,
        accepted: false,
        score_delta: 0,
        steps: Vec::new(),
        power_ups: Vec::new(),
        possible_moves,
        board_regenerated: false,
    }
}

pub fn error_code(err: &GridError) -> &'static str {
    match err {
        GridError::InvalidPosition { .. } => "invalid_position",
        GridError::NotAdjacent { .. } => "not_adjacent",
        GridError::NotAPowerUp(_) => "not_a_power_up",
        GridError::InvalidLayout(_) => "invalid_layout",
        GridError::InvalidConfig(_) => "invalid_config",
        GridError::GameOver => "game_over",
    }
}

pub fn create_error(seq: u64, code: &str, message: impl Into<String>) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code: code.to_string(),
        message: message.into(),
    }
}
