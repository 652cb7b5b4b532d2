use netsim_lab::Lab;
use netsim_terminal::Console;
use netsim_types::error::Result;

/// A `:`-prefixed console command, handled outside the device CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Connect(&'a str),
    Devices,
    Complete(&'a str),
    Prev,
    Next,
    History,
    Progress,
    Snapshot,
    Quit,
    Help,
    Unknown(&'a str),
}

impl<'a> ConsoleCommand<'a> {
    /// Parse a line; `None` if it is not a console command.
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.trim_start().strip_prefix(':')?;
        let (word, arg) = match rest.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (rest, ""),
        };
        let cmd = match word {
            "connect" | "c" if !arg.is_empty() => Self::Connect(arg),
            "devices" | "d" => Self::Devices,
            "complete" | "tab" => Self::Complete(arg),
            "prev" | "up" => Self::Prev,
            "next" | "down" => Self::Next,
            "history" => Self::History,
            "progress" | "p" => Self::Progress,
            "snapshot" => Self::Snapshot,
            "quit" | "q" => Self::Quit,
            "help" | "h" => Self::Help,
            _ => Self::Unknown(rest),
        };
        Some(cmd)
    }
}

/// What the REPL should do after a console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    /// Put the text back on the input line (history recall, completion).
    Edit(String),
    Quit,
}

const HELP: &str = "\
:connect <device>   attach to a device
:devices            list devices
:complete <text>    tab-complete in the current mode
:prev / :next       recall history
:history            show this device's history
:progress           lab task status
:snapshot           network state as JSON
:quit               leave";

pub fn run(cmd: ConsoleCommand<'_>, console: &mut Console, lab: &Lab) -> Result<Outcome> {
    let out = match cmd {
        ConsoleCommand::Connect(device) => {
            console.attach(device)?;
            Outcome::Print(format!("Connected to {device}"))
        },
        ConsoleCommand::Devices => {
            let attached = console.session().map(|s| s.device().to_string());
            let lines: Vec<String> = console
                .network()
                .devices()
                .map(|d| {
                    let mark = if attached.as_deref() == Some(d.name()) { '*' } else { ' ' };
                    format!("{mark} {:<8} {:<8} {}", d.name(), d.hostname(), d.mode())
                })
                .collect();
            Outcome::Print(lines.join("\n"))
        },
        ConsoleCommand::Complete(partial) => Outcome::Edit(console.complete(partial)?),
        ConsoleCommand::Prev => Outcome::Edit(console.recall_previous()?),
        ConsoleCommand::Next => Outcome::Edit(console.recall_next()?),
        ConsoleCommand::History => {
            let device = console
                .session()
                .map(|s| s.device().to_string())
                .unwrap_or_default();
            let lines: Vec<String> = console
                .history(&device)
                .map(|h| {
                    h.entries()
                        .iter()
                        .enumerate()
                        .map(|(i, l)| format!("{:>4}  {l}", i + 1))
                        .collect()
                })
                .unwrap_or_default();
            Outcome::Print(lines.join("\n"))
        },
        ConsoleCommand::Progress => {
            let net = console.network();
            let mut lines: Vec<String> = lab
                .tasks
                .iter()
                .map(|t| {
                    let mark = if t.is_done(net) { 'x' } else { ' ' };
                    format!("[{mark}] {}", t.description)
                })
                .collect();
            lines.push(lab.progress(net).to_string());
            Outcome::Print(lines.join("\n"))
        },
        ConsoleCommand::Snapshot => Outcome::Print(console.network().to_json()?),
        ConsoleCommand::Quit => Outcome::Quit,
        ConsoleCommand::Help => Outcome::Print(HELP.to_string()),
        ConsoleCommand::Unknown(text) => {
            Outcome::Print(format!("Unknown console command :{text} (try :help)"))
        },
    };
    Ok(out)
}
