//! Line history, recall, and the per-device console sessions.

use netsim_net::NetworkRegistry;
use netsim_types::error::{NetsimError, Result};

use crate::interpreter::Interpreter;

/// Default number of history entries kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Submitted lines plus a recall cursor.
///
/// The cursor ranges over `0..=len`; `len` is the fresh, empty line.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// A history that keeps at most `limit` lines, dropping the oldest.
    /// A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Append a line and park the cursor on the fresh line.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
    }

    /// Step back one entry, stopping at the oldest.
    pub fn older(&mut self) -> &str {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Step forward one entry, stopping at the fresh line.
    pub fn newer(&mut self) -> &str {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Line under the cursor; empty on the fresh line.
    pub fn current(&self) -> &str {
        self.entries.get(self.cursor).map_or("", String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// One operator's view of one device: history and completion over the
/// interpreter.
#[derive(Debug, Clone)]
pub struct Session {
    device: String,
    history: History,
}

impl Session {
    pub fn new(device: impl Into<String>, history_limit: usize) -> Self {
        Self {
            device: device.into(),
            history: History::new(history_limit),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record a non-blank line, then execute it.
    pub fn submit(&mut self, interp: &Interpreter, net: &mut NetworkRegistry, line: &str) -> String {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        self.history.push(trimmed);
        interp.execute(net, &self.device, trimmed)
    }

    /// Tab completion in the device's current mode.
    pub fn complete(&self, interp: &Interpreter, net: &NetworkRegistry, line: &str) -> String {
        match net.device(&self.device) {
            Some(dev) => interp.grammar().autocomplete(dev.mode(), line),
            None => line.to_string(),
        }
    }

    pub fn recall_previous(&mut self) -> &str {
        self.history.older()
    }

    pub fn recall_next(&mut self) -> &str {
        self.history.newer()
    }

    pub fn prompt(&self, net: &NetworkRegistry) -> String {
        net.device(&self.device)
            .map(|d| d.prompt())
            .unwrap_or_else(|| format!("{}>", self.device))
    }
}

/// The interactive surface: owns the network and one session per device,
/// with one device attached at a time.
#[derive(Debug)]
pub struct Console {
    net: NetworkRegistry,
    interp: Interpreter,
    sessions: Vec<Session>,
    attached: Option<usize>,
    history_limit: usize,
}

impl Console {
    pub fn new(net: NetworkRegistry, interp: Interpreter) -> Self {
        Self {
            net,
            interp,
            sessions: Vec::new(),
            attached: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap for histories created after this call.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn network(&self) -> &NetworkRegistry {
        &self.net
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    /// Attach to a device, like opening its console line.
    ///
    /// The device drops back to user mode. Its history survives detaching
    /// and re-attaching.
    pub fn attach(&mut self, device: &str) -> Result<()> {
        self.net.require_mut(device)?.enter_user();
        let idx = match self.sessions.iter().position(|s| s.device == device) {
            Some(idx) => idx,
            None => {
                self.sessions.push(Session::new(device, self.history_limit));
                self.sessions.len() - 1
            },
        };
        self.attached = Some(idx);
        log::info!("attached to {device}");
        Ok(())
    }

    /// The attached session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.attached.and_then(|idx| self.sessions.get(idx))
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.attached
            .and_then(|idx| self.sessions.get_mut(idx))
            .ok_or(NetsimError::NotAttached)
    }

    /// History for a device, whether attached or not.
    pub fn history(&self, device: &str) -> Option<&History> {
        self.sessions
            .iter()
            .find(|s| s.device == device)
            .map(Session::history)
    }

    pub fn submit(&mut self, line: &str) -> Result<String> {
        let idx = self.attached.ok_or(NetsimError::NotAttached)?;
        let session = self
            .sessions
            .get_mut(idx)
            .ok_or(NetsimError::NotAttached)?;
        Ok(session.submit(&self.interp, &mut self.net, line))
    }

    pub fn complete(&self, line: &str) -> Result<String> {
        let session = self.session().ok_or(NetsimError::NotAttached)?;
        Ok(session.complete(&self.interp, &self.net, line))
    }

    pub fn recall_previous(&mut self) -> Result<String> {
        Ok(self.session_mut()?.recall_previous().to_string())
    }

    pub fn recall_next(&mut self) -> Result<String> {
        Ok(self.session_mut()?.recall_next().to_string())
    }

    /// Prompt of the attached device.
    pub fn prompt(&self) -> Result<String> {
        let session = self.session().ok_or(NetsimError::NotAttached)?;
        Ok(session.prompt(&self.net))
    }
}
