//! Command grammar: the legal token paths per mode.
//!
//! One table drives resolution, tab completion, and `?` help, so the three
//! can never disagree about what a mode accepts.

use std::fmt;

use netsim_types::error::CliError;
use netsim_types::mode::Mode;

/// One position in a command path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal keyword. Input matches when it is a non-empty,
    /// case-sensitive prefix of the keyword.
    Keyword(&'static str),
    /// A user-supplied value such as an address or interface name.
    /// Any input token fills it.
    Arg(&'static str),
}

impl Token {
    pub fn accepts(self, input: &str) -> bool {
        match self {
            Token::Keyword(kw) => !input.is_empty() && kw.starts_with(input),
            Token::Arg(_) => true,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(kw) => f.write_str(kw),
            Token::Arg(name) => write!(f, "<{name}>"),
        }
    }
}

/// What a resolved command does. The interpreter decides whether the
/// action is legal in the mode it was resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
    ConfigureTerminal,
    ShowIpInterfaceBrief,
    ShowInterface,
    ShowRunningConfig,
    Ping,
    Hostname,
    Interface,
    IpAddress,
    NoIpAddress,
    Shutdown,
    NoShutdown,
    Exit,
    End,
    Reload,
}

/// A fully spelled command: its tokens and the action it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPath {
    pub tokens: &'static [Token],
    pub action: Action,
}

impl CommandPath {
    /// Whether `input` is a prefix-match of this path.
    ///
    /// The path must be at least as long as the input, and each input token
    /// must be accepted by the path token at the same position.
    pub fn matches(&self, input: &[&str]) -> bool {
        self.tokens.len() >= input.len()
            && input
                .iter()
                .zip(self.tokens)
                .all(|(word, token)| token.accepts(word))
    }

    /// Collect the values typed for each argument slot.
    ///
    /// Keywords left off the end are implied, but a missing argument makes
    /// the command incomplete.
    pub fn arguments<'a>(&self, input: &[&'a str]) -> Result<Vec<&'a str>, CliError> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| matches!(token, Token::Arg(_)))
            .map(|(idx, _)| input.get(idx).copied().ok_or(CliError::Incomplete))
            .collect()
    }

    /// Space-joined canonical spelling, e.g. `ip address <ip>`.
    pub fn spelling(&self) -> String {
        self.tokens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of matching input tokens against a mode's paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unique(&'static CommandPath),
    Ambiguous,
    None,
}

// ---------------------------------------------------------------------------
// Standard tables
// ---------------------------------------------------------------------------

use Token::{Arg, Keyword as Kw};

const fn path(tokens: &'static [Token], action: Action) -> CommandPath {
    CommandPath { tokens, action }
}

const USER: &[CommandPath] = &[path(&[Kw("enable")], Action::Enable)];

const PRIVILEGED: &[CommandPath] = &[
    path(&[Kw("configure"), Kw("terminal")], Action::ConfigureTerminal),
    path(
        &[Kw("show"), Kw("ip"), Kw("interface"), Kw("brief")],
        Action::ShowIpInterfaceBrief,
    ),
    path(&[Kw("show"), Kw("interface"), Arg("name")], Action::ShowInterface),
    path(&[Kw("show"), Kw("running-config")], Action::ShowRunningConfig),
    path(&[Kw("ping"), Arg("ip")], Action::Ping),
    path(&[Kw("hostname"), Arg("name")], Action::Hostname),
    path(&[Kw("disable")], Action::Disable),
    path(&[Kw("exit")], Action::Exit),
    path(&[Kw("reload")], Action::Reload),
];

const GLOBAL_CONFIG: &[CommandPath] = &[
    path(&[Kw("interface"), Arg("name")], Action::Interface),
    path(&[Kw("hostname"), Arg("name")], Action::Hostname),
    path(&[Kw("exit")], Action::Exit),
    path(&[Kw("end")], Action::End),
];

const INTERFACE_CONFIG: &[CommandPath] = &[
    path(&[Kw("ip"), Kw("address"), Arg("ip")], Action::IpAddress),
    path(&[Kw("no"), Kw("shutdown")], Action::NoShutdown),
    path(&[Kw("no"), Kw("ip"), Kw("address")], Action::NoIpAddress),
    path(&[Kw("shutdown")], Action::Shutdown),
    path(&[Kw("exit")], Action::Exit),
    path(&[Kw("end")], Action::End),
];

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

/// Per-mode command tables with the matching algorithms over them.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    tables: [&'static [CommandPath]; 4],
}

impl Grammar {
    /// The built-in router/switch command set.
    pub const STANDARD: Grammar = Grammar {
        tables: [USER, PRIVILEGED, GLOBAL_CONFIG, INTERFACE_CONFIG],
    };

    /// Build a grammar from explicit tables, indexed in [`Mode::ALL`] order.
    pub const fn from_tables(tables: [&'static [CommandPath]; 4]) -> Self {
        Self { tables }
    }

    /// Paths legal in `mode`, in declaration order.
    pub fn paths(&self, mode: Mode) -> &'static [CommandPath] {
        match mode {
            Mode::User => self.tables[0],
            Mode::Privileged => self.tables[1],
            Mode::GlobalConfig => self.tables[2],
            Mode::InterfaceConfig => self.tables[3],
        }
    }

    fn candidates<'a>(
        &self,
        mode: Mode,
        input: &'a [&'a str],
    ) -> impl Iterator<Item = &'static CommandPath> + 'a {
        self.paths(mode).iter().filter(move |p| p.matches(input))
    }

    /// Match input tokens against the paths of `mode`.
    ///
    /// Abbreviations must be unambiguous: two or more candidates is an
    /// error, never a guess.
    pub fn resolve(&self, mode: Mode, input: &[&str]) -> Resolution {
        let mut found = self.candidates(mode, input);
        match (found.next(), found.next()) {
            (None, _) => Resolution::None,
            (Some(path), None) => Resolution::Unique(path),
            (Some(_), Some(_)) => Resolution::Ambiguous,
        }
    }

    /// Extend a line by one resolved token.
    ///
    /// Typed keywords are expanded to their full spelling and typed
    /// arguments kept as-is. The next keyword is appended; an argument slot
    /// is left for the user to type. Lines that do not resolve uniquely
    /// come back unchanged.
    pub fn autocomplete(&self, mode: Mode, line: &str) -> String {
        let input: Vec<&str> = line.split_whitespace().collect();
        if input.is_empty() {
            return line.to_string();
        }
        let Resolution::Unique(path) = self.resolve(mode, &input) else {
            return line.to_string();
        };
        let take = (input.len() + 1).min(path.tokens.len());
        let mut words = Vec::with_capacity(take);
        for (idx, token) in path.tokens[..take].iter().enumerate() {
            match (*token, input.get(idx).copied()) {
                (Token::Keyword(kw), _) => words.push(kw),
                (Token::Arg(_), Some(typed)) => words.push(typed),
                (Token::Arg(_), None) => break,
            }
        }
        words.join(" ")
    }

    /// Distinct tokens that may follow `prefix`, in table order.
    ///
    /// Argument slots are shown as `<name>`. An empty result means nothing
    /// can follow.
    pub fn suggest_next(&self, mode: Mode, prefix: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for path in self.candidates(mode, prefix) {
            if let Some(next) = path.tokens.get(prefix.len()) {
                let text = next.to_string();
                if !out.contains(&text) {
                    out.push(text);
                }
            }
        }
        out
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::STANDARD
    }
}
