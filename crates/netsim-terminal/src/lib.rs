//! Command interpreter and terminal subsystem.
//!
//! The grammar is a static per-mode table of token paths. The interpreter
//! resolves each line against the table for the device's current mode and
//! dispatches on the resolved action. Sessions add history recall and tab
//! completion on top, and the console ties sessions to a network.

pub mod grammar;
mod interpreter;
mod session;


/// Per-mode command tables and the matching algorithms.
pub use grammar::Grammar;
/// Modal command interpreter.
pub use interpreter::Interpreter;
/// Reply text for a `?` query with nothing to suggest.
pub use interpreter::NO_FURTHER_OPTIONS;
/// Network plus one session per device, one attached at a time.
pub use session::Console;
/// Default number of lines a session remembers.
pub use session::DEFAULT_HISTORY_LIMIT;
/// Submitted lines with a recall cursor.
pub use session::History;
/// History and completion for one device.
pub use session::Session;
