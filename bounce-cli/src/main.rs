//! Bounce scenario driver
//!
//! Replays a script of commands against a fresh game and reports the return
//! code of each one, then dumps the final position.
//!
//! Usage:
//!   bounce --script scenario.txt
//!   bounce --json < scenario.txt
//!   RUST_LOG=bounce_core=debug bounce --script scenario.txt

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use bounce_core::{Command, Game, ReturnCode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Options {
    script: Option<String>,
    json: bool,
    quiet: bool,
    stop_on_error: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  bounce [--script FILE] [--json] [--quiet] [--stop-on-error]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --script <file>     Read commands from a file (default: stdin)");
    eprintln!("  --json              Print the final snapshot as JSON");
    eprintln!("  --quiet             Only print the final position");
    eprintln!("  --stop-on-error     Abort on the first command not returning OK");
    eprintln!();
    eprintln!("Commands, one per line ('#' starts a comment):");
    eprintln!("  place <1|2|3> <S|N> <column>");
    eprintln!("  pick <S|N> <line> <column>");
    eprintln!("  move <G|S|N|E|W>");
    eprintln!("  swap <line> <column>");
    eprintln!("  cancel");
    eprintln!("  undo");
}

/// Returns None when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--script" => {
                i += 1;
                let path = args.get(i).context("--script needs a file name")?;
                opts.script = Some(path.clone());
            }
            "--json" => opts.json = true,
            "--quiet" => opts.quiet = true,
            "--stop-on-error" => opts.stop_on_error = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }
    Ok(Some(opts))
}

fn read_script(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read script {}", path))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read script from stdin")?;
            Ok(text)
        }
    }
}

/// Replays every command of `text`, writing one line per command.
fn run(text: &str, opts: &Options, out: &mut impl Write) -> Result<Game> {
    let mut game = Game::new();
    let mut played = 0;
    let mut rejected = 0;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let Some(command) = Command::parse_line(line)
            .with_context(|| format!("line {}: cannot parse '{}'", number, line.trim()))?
        else {
            continue;
        };

        let code = ReturnCode::from(game.apply(&command));
        played += 1;
        debug!(line = number, %command, %code, "applied");
        if code != ReturnCode::Ok {
            rejected += 1;
            if opts.stop_on_error {
                bail!("line {}: '{}' returned {}", number, command, code);
            }
        }
        if !opts.quiet {
            writeln!(out, "{:<20} {}", command.to_string(), code)?;
        }
    }

    info!(played, rejected, "script finished");
    if !opts.quiet {
        writeln!(out, "{} commands, {} rejected", played, rejected)?;
        writeln!(out)?;
    }
    Ok(game)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err);
        }
    };

    let text = read_script(opts.script.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let game = run(&text, &opts, &mut out)?;

    if opts.json {
        let json = serde_json::to_string_pretty(&game.snapshot())
            .context("failed to serialize snapshot")?;
        writeln!(out, "{}", json)?;
    } else {
        writeln!(out, "{}", game)?;
    }
    Ok(())
}
