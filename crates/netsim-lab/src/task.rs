//! Exercise tasks and progress.

use std::fmt;

use netsim_device::Interface;
use netsim_net::NetworkRegistry;
use serde::Deserialize;

/// A condition over the network, evaluated read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// The interface is administratively up.
    InterfaceUp { device: String, interface: String },
    /// The interface has an address.
    InterfaceAddressed { device: String, interface: String },
    /// The interface has an address and is up.
    InterfaceConfigured { device: String, interface: String },
    /// The device's hostname equals the given text.
    Hostname { device: String, hostname: String },
    /// `ping <address>` from the device would get a reply.
    Reachable { from: String, address: String },
}

impl Check {
    pub fn passes(&self, net: &NetworkRegistry) -> bool {
        match self {
            Check::InterfaceUp { device, interface } => {
                with_interface(net, device, interface, |i| i.admin_up)
            },
            Check::InterfaceAddressed { device, interface } => {
                with_interface(net, device, interface, |i| i.ip_address.is_some())
            },
            Check::InterfaceConfigured { device, interface } => {
                with_interface(net, device, interface, |i| {
                    i.admin_up && i.ip_address.is_some()
                })
            },
            Check::Hostname { device, hostname } => net
                .device(device)
                .is_some_and(|d| d.hostname() == hostname),
            Check::Reachable { from, address } => net.is_reachable(from, address),
        }
    }

    /// Device the check is about.
    pub fn device(&self) -> &str {
        match self {
            Check::InterfaceUp { device, .. }
            | Check::InterfaceAddressed { device, .. }
            | Check::InterfaceConfigured { device, .. }
            | Check::Hostname { device, .. } => device.as_str(),
            Check::Reachable { from, .. } => from.as_str(),
        }
    }
}

fn with_interface(
    net: &NetworkRegistry,
    device: &str,
    interface: &str,
    pred: impl Fn(&Interface) -> bool,
) -> bool {
    net.device(device)
        .and_then(|d| d.interface(interface))
        .is_some_and(pred)
}

/// One exercise step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub description: String,
    pub check: Check,
}

impl Task {
    pub fn is_done(&self, net: &NetworkRegistry) -> bool {
        self.check.passes(net)
    }
}

/// How many tasks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub passed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(tasks: &[Task], net: &NetworkRegistry) -> Self {
        Self {
            passed: tasks.iter().filter(|t| t.is_done(net)).count(),
            total: tasks.len(),
        }
    }

    /// Rounded percentage. A lab with no tasks counts as complete.
    pub fn percent(self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.passed as f64 / self.total as f64 * 100.0).round();
        pct as u32
    }

    pub fn is_complete(self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Completed: {}%", self.percent())
    }
}
