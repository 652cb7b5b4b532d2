//! Labs: a topology of devices and links plus the exercise tasks checked
//! against it.
//!
//! Labs are TOML documents, either built in or loaded from disk. Tasks are
//! declarative checks run against a read-only network, so the interpreter
//! never needs to know about them.

pub mod builtin;
mod lab;
mod task;

/// Device entry in a lab file.
pub use lab::DeviceDef;
/// A parsed lab definition.
pub use lab::Lab;
/// Tunables from a lab's `[settings]` table.
pub use lab::LabSettings;
/// Resolve a built-in lab name or a TOML path.
pub use lab::resolve_lab;
/// Declarative condition over a network.
pub use task::Check;
/// Passed/total task counts.
pub use task::Progress;
/// One exercise task.
pub use task::Task;
