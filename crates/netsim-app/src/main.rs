//! netsim console entry point.
//!
//! Reads lines from stdin and feeds them to the attached device's CLI.
//! Lines starting with `:` drive the console itself (see `:help`).

mod commands;

use std::io::{self, BufRead, Write};

use anyhow::Result;

use commands::{ConsoleCommand, Outcome};

const DEFAULT_LAB: &str = "routing-basics";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve lab from CLI arg, NETSIM_LAB env var, or the default built-in.
    let lab_name = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("NETSIM_LAB").ok())
        .unwrap_or_else(|| DEFAULT_LAB.to_string());
    let lab = netsim_lab::resolve_lab(&lab_name)?;
    log::info!("Loaded lab: {} ({} tasks)", lab.name, lab.tasks.len());

    let mut console = lab.console()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", lab.name);
    if !lab.description.is_empty() {
        println!("{}", lab.description);
    }

    let mut pending = String::new();
    loop {
        let prompt = console.prompt().unwrap_or_else(|_| "netsim>".to_string());
        write!(stdout, "{prompt} {pending}")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let typed = line.trim_end_matches(['\r', '\n']);
        // Recalled or completed text is prefixed to what the operator typed,
        // unless they typed another console command.
        let line = if typed.trim_start().starts_with(':') {
            typed.to_string()
        } else {
            format!("{pending}{typed}")
        };
        pending.clear();

        if let Some(cmd) = ConsoleCommand::parse(&line) {
            match commands::run(cmd, &mut console, &lab) {
                Ok(Outcome::Print(text)) if text.is_empty() => {},
                Ok(Outcome::Print(text)) => println!("{text}"),
                Ok(Outcome::Edit(text)) => pending = text,
                Ok(Outcome::Quit) => break,
                Err(e) => {
                    log::warn!("{e}");
                    println!("{e}");
                },
            }
            continue;
        }

        match console.submit(&line) {
            Ok(out) if out.is_empty() => {},
            Ok(out) => println!("{out}"),
            Err(e) => println!("{e} (use :connect <device>)"),
        }
    }

    log::info!("{}", lab.progress(console.network()));
    Ok(())
}
