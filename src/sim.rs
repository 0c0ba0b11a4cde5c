//! Headless simulator - drives a [`Session`] without any presentation layer
//!
//! Two modes:
//! - **autoplay** (default): fires any power-up on the board, otherwise plays
//!   the first swap that makes a match, for a fixed number of moves
//! - **commands** (`--stdin`): reads [`CommandMessage`] lines and answers each
//!
//! Every action is followed by an observation, so the output stream is a
//! complete structured log of the game.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::core::{GridConfig, Session, SwapOutcome};
use crate::protocol::{
    create_error, create_observation, create_rejected, create_result, error_code, to_coord,
    to_position, CommandAction, CommandMessage,
};

/// Simulated level time consumed by one autoplay move
pub const DEFAULT_MOVE_MS: u32 = 1000;

pub const DEFAULT_MOVES: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub moves: u32,
    pub move_ms: u32,
    pub stdin: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            moves: DEFAULT_MOVES,
            move_ms: DEFAULT_MOVE_MS,
            stdin: false,
        }
    }
}

/// Parse command line flags on top of `base` (usually [`GridConfig::from_env`]).
pub fn parse_sim_args(args: &[String], base: GridConfig) -> Result<SimConfig> {
    let mut config = SimConfig {
        grid: base,
        ..SimConfig::default()
    };

    fn value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
        let raw = args
            .get(i)
            .ok_or_else(|| anyhow!("missing value for {}", flag))?;
        raw.parse::<T>()
            .map_err(|_| anyhow!("invalid {} value: {}", flag, raw))
    }

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--moves" => {
                i += 1;
                config.moves = value(args, i, "--moves")?;
            }
            "--seed" => {
                i += 1;
                config.grid.seed = value(args, i, "--seed")?;
            }
            "--width" => {
                i += 1;
                config.grid.width = value(args, i, "--width")?;
            }
            "--height" => {
                i += 1;
                config.grid.height = value(args, i, "--height")?;
            }
            "--colors" => {
                i += 1;
                config.grid.num_colors = value(args, i, "--colors")?;
            }
            "--move-ms" => {
                i += 1;
                config.move_ms = value(args, i, "--move-ms")?;
            }
            "--stdin" => config.stdin = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    config.grid.validate()?;
    Ok(config)
}

fn emit<W: Write, T: Serialize>(out: &mut W, msg: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, msg)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Next move for autoplay: a power-up if one is on the board, else the first matching swap.
pub fn choose_move(session: &mut Session) -> Option<CommandAction> {
    let power_up = session
        .grid()
        .cells()
        .iter()
        .flatten()
        .find(|t| t.is_power_up())
        .map(|t| t.position());
    if let Some(at) = power_up {
        return Some(CommandAction::Activate { at: to_coord(at) });
    }

    session
        .grid_mut()
        .possible_swaps()
        .first()
        .map(|&(from, to)| CommandAction::Swap {
            from: to_coord(from),
            to: to_coord(to),
        })
}

/// Apply one command and write its answer plus a fresh observation.
pub fn apply_command<W: Write>(session: &mut Session, cmd: &CommandMessage, out: &mut W) -> Result<()> {
    let applied = match cmd.action {
        CommandAction::Swap { from, to } => session
            .try_swap(to_position(from), to_position(to))
            .map(|outcome| match outcome {
                SwapOutcome::Resolved(report) => Some(create_result(cmd.seq, &report)),
                SwapOutcome::Reverted => Some(create_rejected(cmd.seq, session.possible_moves())),
            }),
        CommandAction::Activate { at } => session
            .activate(to_position(at))
            .map(|report| Some(create_result(cmd.seq, &report))),
        CommandAction::Tick { ms } => {
            session.tick(ms);
            Ok(None)
        }
    };

    match applied {
        Ok(Some(result)) => emit(out, &result)?,
        Ok(None) => {}
        Err(e) => return emit(out, &create_error(cmd.seq, error_code(&e), e.to_string())),
    }

    let event = session.take_last_event();
    emit(out, &create_observation(cmd.seq, &session.snapshot(), event))
}

/// Play `config.moves` moves on its own, ticking `config.move_ms` after each.
pub fn run_autoplay<W: Write>(session: &mut Session, config: &SimConfig, out: &mut W) -> Result<u32> {
    emit(out, &create_observation(0, &session.snapshot(), None))?;

    let mut played = 0u32;
    for seq in 1..=u64::from(config.moves) {
        if session.game_over() {
            break;
        }
        let Some(action) = choose_move(session) else {
            break;
        };
        let cmd = CommandMessage {
            msg_type: Default::default(),
            seq,
            action,
        };
        apply_command(session, &cmd, out)?;
        played += 1;

        if session.tick(config.move_ms) && !session.game_over() {
            eprintln!(
                "[match3-sim] level {} reached at score {}",
                session.level(),
                session.score()
            );
        }
    }

    Ok(played)
}

/// Answer command lines from `input` until EOF. Malformed lines get an error message.
pub fn run_commands<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    emit(out, &create_observation(0, &session.snapshot(), None))?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CommandMessage>(&line) {
            Ok(cmd) => apply_command(session, &cmd, out)?,
            Err(e) => emit(out, &create_error(0, "invalid_command", e.to_string()))?,
        }
    }
    Ok(())
}

/// Build the session a run starts from.
pub fn new_session(config: &SimConfig) -> Result<Session> {
    Session::new(config.grid).map_err(|e| anyhow!("cannot create board: {}", e))
}
