//! Interactive explorer: adjust the controls from stdin and watch the
//! summary re-settle after every accepted change.
//!
//! # Commands
//!
//! - `n <value>` — set sample size
//! - `sigma <value>` — set noise sigma
//! - `show` — print the current summary
//! - `state` — print per-cell states and recompute counts
//! - `help` — show this list
//! - `quit` — exit

use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use tracing::error;

use covary_explorer::session::cells;
use covary_explorer::{Session, SessionError};

#[derive(Parser, Debug)]
#[command(name = "explore")]
#[command(about = "Interactively adjust the controls and watch the report re-settle")]
struct Args {}

const HELP: &str = "\
commands:
  n <value>      set sample size
  sigma <value>  set noise sigma
  show           print the current summary
  state          print per-cell states and recompute counts
  help           show this list
  quit           exit";

fn main() {
    covary_tools::init_logging();

    let _args = Args::parse();

    let mut session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            error!("failed to build session: {e}");
            process::exit(1);
        }
    };

    println!("{}", session.report().to_text());
    println!("type 'help' for commands");

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("covary> ");
        if io::stdout().flush().is_err() {
            break;
        }

        input.clear();
        match stdin.lock().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut parts = input.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => println!("{HELP}"),
            "show" => println!("{}", session.report().to_text()),
            "state" => {
                for cell in cells::ALL {
                    let state = session
                        .cell_state(cell)
                        .map(|s| format!("{s:?}"))
                        .unwrap_or_else(|| "?".to_string());
                    println!("{cell:<14} {state:<9} runs={}", session.cell_runs(cell));
                }
            }
            "n" | "sigma" => {
                let Some(raw) = parts.next() else {
                    println!("usage: {command} <value>");
                    continue;
                };
                let value: f64 = match raw.parse() {
                    Ok(v) => v,
                    Err(_) => {
                        println!("not a number: {raw}");
                        continue;
                    }
                };
                let result = if command == "n" {
                    session.set_sample_size(value)
                } else {
                    session.set_noise_sigma(value)
                };
                match result {
                    Ok(settled) => {
                        println!("{}", session.report().to_text());
                        println!("({} cells recomputed)", settled.recomputed.len());
                    }
                    Err(SessionError::OutOfRange(e)) => println!("rejected: {e}"),
                    Err(e) => {
                        error!("session error: {e}");
                        process::exit(1);
                    }
                }
            }
            other => println!("unknown command: {other} (try 'help')"),
        }
    }
}
