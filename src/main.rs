//! Headless match-3 runner (default binary).
//!
//! Prints line-delimited JSON to stdout: an observation of the starting board,
//! then a result and an observation per move. Configuration comes from
//! `MATCH3_*` environment variables, overridden by flags:
//!
//! ```text
//! match3-sim [--moves N] [--seed S] [--width W] [--height H] [--colors C] [--move-ms MS] [--stdin]
//! ```

use std::io::{self, BufWriter, Write};

use anyhow::Result;

use match3::core::GridConfig;
use match3::sim::{new_session, parse_sim_args, run_autoplay, run_commands};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_sim_args(&args, GridConfig::from_env())?;
    let mut session = new_session(&config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if config.stdin {
        let stdin = io::stdin();
        run_commands(&mut session, stdin.lock(), &mut out)?;
    } else {
        let played = run_autoplay(&mut session, &config, &mut out)?;
        eprintln!(
            "[match3-sim] {} moves, score {}, level {}, {} regenerations",
            played,
            session.score(),
            session.level(),
            session.grid().regenerations()
        );
    }

    out.flush()?;
    Ok(())
}
