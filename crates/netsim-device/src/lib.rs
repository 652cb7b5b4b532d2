//! Device model.
//!
//! A [`Device`] holds one simulated router or switch: its hostname, an
//! ordered interface table, and the command mode it is currently in. The
//! interpreter mutates it only through the primitives defined here, which
//! keep the "active interface iff interface-config mode" invariant.

mod device;
mod interface;

/// One simulated network device.
pub use device::Device;
/// Construction-time device flavor (controls seeded interfaces).
pub use device::DeviceKind;
/// Serializable read-only view of a device.
pub use device::DeviceSnapshot;
/// A row of `show ip interface brief`.
pub use interface::BriefRow;
/// A single configurable interface.
pub use interface::Interface;
