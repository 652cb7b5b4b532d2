//! Device state, mode transitions, and text rendering.

use std::fmt::Write as _;

use netsim_types::error::CliError;
use netsim_types::mode::Mode;
use serde::{Deserialize, Serialize};

use crate::interface::{BriefRow, Interface};

/// Construction-time device flavor.
///
/// The kind only decides which interfaces exist when the device is created;
/// every kind accepts the same commands afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Router,
    Switch,
    /// No seeded interfaces.
    Bare,
}

impl DeviceKind {
    /// Interfaces seeded at creation.
    pub fn default_interfaces(self) -> &'static [&'static str] {
        match self {
            DeviceKind::Router => &["Gig0/0"],
            DeviceKind::Switch => &["Fa0/1"],
            DeviceKind::Bare => &[],
        }
    }
}

/// Mode plus the interface being configured.
///
/// Carrying the interface index inside the interface-config variant makes
/// "active interface set iff in interface-config mode" hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeState {
    User,
    Privileged,
    GlobalConfig,
    InterfaceConfig(usize),
}

/// One simulated router or switch.
#[derive(Debug, Clone)]
pub struct Device {
    name: String,
    hostname: String,
    kind: DeviceKind,
    interfaces: Vec<Interface>,
    state: ModeState,
}

impl Device {
    /// Create a device in user mode with the kind's default interfaces.
    ///
    /// `name` is the registry key and also the initial hostname.
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        let name = name.into();
        let interfaces = kind
            .default_interfaces()
            .iter()
            .map(|n| Interface::new(*n))
            .collect();
        Self {
            hostname: name.clone(),
            name,
            kind,
            interfaces,
            state: ModeState::User,
        }
    }

    /// Create a device and seed additional interfaces after the kind's defaults.
    ///
    /// Names already present (case-insensitively) are skipped.
    pub fn with_interfaces<I, S>(name: impl Into<String>, kind: DeviceKind, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut device = Self::new(name, kind);
        for iface in extra {
            let iface = iface.into();
            if device.find(&iface).is_none() {
                device.interfaces.push(Interface::new(iface));
            }
        }
        device
    }

    /// Registry key. Unaffected by `hostname` changes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            ModeState::User => Mode::User,
            ModeState::Privileged => Mode::Privileged,
            ModeState::GlobalConfig => Mode::GlobalConfig,
            ModeState::InterfaceConfig(_) => Mode::InterfaceConfig,
        }
    }

    /// Current prompt, e.g. `R1(config-if)#`.
    pub fn prompt(&self) -> String {
        self.mode().prompt(&self.hostname)
    }

    // -- Interface table --

    /// Interfaces in insertion order.
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Look up an interface by name, ignoring ASCII case.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.find(name).map(|idx| &self.interfaces[idx])
    }

    /// The interface being configured, if in interface-config mode.
    pub fn active_interface(&self) -> Option<&Interface> {
        match self.state {
            ModeState::InterfaceConfig(idx) => self.interfaces.get(idx),
            _ => None,
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.interfaces.iter().position(|i| i.is_named(name))
    }

    fn active_mut(&mut self) -> Result<&mut Interface, CliError> {
        match self.state {
            ModeState::InterfaceConfig(idx) => self
                .interfaces
                .get_mut(idx)
                .ok_or(CliError::NoActiveInterface),
            _ => Err(CliError::NoActiveInterface),
        }
    }

    // -- Mode transitions --

    pub fn enter_user(&mut self) {
        self.state = ModeState::User;
    }

    pub fn enter_privileged(&mut self) {
        self.state = ModeState::Privileged;
    }

    pub fn enter_global_config(&mut self) {
        self.state = ModeState::GlobalConfig;
    }

    /// Select `name` for configuration, creating it if the device lacks it.
    ///
    /// An existing interface is matched case-insensitively and keeps its
    /// original spelling.
    pub fn enter_interface_config(&mut self, name: &str) -> &Interface {
        let idx = match self.find(name) {
            Some(idx) => idx,
            None => {
                log::debug!("{}: creating interface {name}", self.name);
                self.interfaces.push(Interface::new(name));
                self.interfaces.len() - 1
            },
        };
        self.state = ModeState::InterfaceConfig(idx);
        &self.interfaces[idx]
    }

    /// Select an interface that must already exist.
    pub fn enter_existing_interface(&mut self, name: &str) -> Result<&Interface, CliError> {
        let idx = self
            .find(name)
            .ok_or_else(|| CliError::InvalidTarget(format!("interface {name}")))?;
        self.state = ModeState::InterfaceConfig(idx);
        Ok(&self.interfaces[idx])
    }

    /// Drop one mode level. User mode is the floor.
    pub fn exit_mode(&mut self) -> Mode {
        self.state = match self.state {
            ModeState::InterfaceConfig(_) => ModeState::GlobalConfig,
            ModeState::GlobalConfig => ModeState::Privileged,
            ModeState::Privileged | ModeState::User => ModeState::User,
        };
        self.mode()
    }

    // -- Active interface mutation --

    /// Assign an address to the active interface and return it.
    pub fn set_active_interface_address(&mut self, addr: &str) -> Result<&str, CliError> {
        let iface = self.active_mut()?;
        iface.ip_address = Some(addr.to_string());
        Ok(iface.address_or_unassigned())
    }

    pub fn clear_active_interface_address(&mut self) -> Result<(), CliError> {
        self.active_mut()?.ip_address = None;
        Ok(())
    }

    pub fn set_active_interface_up(&mut self, up: bool) -> Result<(), CliError> {
        self.active_mut()?.admin_up = up;
        Ok(())
    }

    // -- Rendering --

    /// Rows of `show ip interface brief`, in interface order.
    ///
    /// The iterator borrows the device and can be cloned to restart.
    pub fn brief(&self) -> impl Iterator<Item = BriefRow<'_>> + Clone + '_ {
        self.interfaces.iter().map(Interface::brief_row)
    }

    /// `show ip interface brief` as aligned text with a header row.
    pub fn render_brief(&self) -> String {
        let mut out = format!("{:<22} {:<15} {}", "Interface", "IP-Address", "Status");
        for row in self.brief() {
            let _ = write!(out, "\n{:<22} {:<15} {}", row.name, row.address, row.status);
        }
        out
    }

    /// `show running-config`.
    ///
    /// Down interfaces carry an explicit ` shutdown` line so the output is
    /// complete enough to replay.
    pub fn render_running_config(&self) -> String {
        let mut lines = vec![format!("hostname {}", self.hostname)];
        for iface in &self.interfaces {
            lines.push(format!("interface {}", iface.name));
            if let Some(addr) = &iface.ip_address {
                lines.push(format!(" ip address {addr}"));
            }
            lines.push(if iface.admin_up {
                " no shutdown".to_string()
            } else {
                " shutdown".to_string()
            });
            lines.push(" exit".to_string());
        }
        lines.join("\n")
    }

    /// `show interface <name>`.
    pub fn render_interface(&self, name: &str) -> Result<String, CliError> {
        let iface = self
            .interface(name)
            .ok_or_else(|| CliError::InvalidTarget(format!("interface {name}")))?;
        let state = if iface.admin_up {
            "up"
        } else {
            "administratively down"
        };
        Ok(format!(
            "{} is {state}\n  Internet address is {}",
            iface.name,
            iface.address_or_unassigned()
        ))
    }

    /// Read-only serializable copy of this device.
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            name: self.name.clone(),
            hostname: self.hostname.clone(),
            kind: self.kind,
            mode: self.mode(),
            active_interface: self.active_interface().map(|i| i.name.clone()),
            interfaces: self.interfaces.clone(),
        }
    }
}

/// Serializable copy of a device's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub hostname: String,
    pub kind: DeviceKind,
    pub mode: Mode,
    pub active_interface: Option<String>,
    pub interfaces: Vec<Interface>,
}
