//! Network registry: the set of simulated devices and the links drawn
//! between them, plus the flat reachability lookup behind `ping`.

mod registry;

/// An undirected link between two device names.
pub use registry::Link;
/// Serializable view of the whole network.
pub use registry::NetworkSnapshot;
/// Owner of every device in a simulated network.
pub use registry::NetworkRegistry;
/// Outcome of a reachability query.
pub use registry::PingReply;
