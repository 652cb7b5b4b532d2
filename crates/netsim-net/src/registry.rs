//! Device ownership, links, and reachability.

use std::fmt;

use netsim_device::{Device, DeviceSnapshot};
use netsim_types::error::{NetsimError, Result};
use serde::{Deserialize, Serialize};

/// An undirected link between two devices, by registry name.
///
/// Links are kept for topology display only; reachability ignores them.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Link {
    pub a: String,
    pub b: String,
}

impl Link {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Whether `name` is one of the endpoints.
    pub fn touches(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// Result of a `ping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingReply {
    Reply(String),
    Unreachable(String),
}

impl PingReply {
    pub fn is_reply(&self) -> bool {
        matches!(self, PingReply::Reply(_))
    }
}

impl fmt::Display for PingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingReply::Reply(ip) => write!(f, "Reply from {ip}: bytes=32 time=1ms TTL=64"),
            PingReply::Unreachable(ip) => write!(f, "Destination {ip} unreachable"),
        }
    }
}

/// Owner of every device in one simulated network.
///
/// Devices keep their insertion order for display.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    devices: Vec<Device>,
    links: Vec<Link>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device, replacing any device registered under the same name.
    ///
    /// Returns the replaced device.
    pub fn add_device(&mut self, device: Device) -> Option<Device> {
        match self.devices.iter().position(|d| d.name() == device.name()) {
            Some(idx) => {
                log::warn!("replacing device {}", device.name());
                Some(std::mem::replace(&mut self.devices[idx], device))
            },
            None => {
                self.devices.push(device);
                None
            },
        }
    }

    /// Record a link. Endpoint validity is the caller's concern; duplicate
    /// links (in either direction) are ignored.
    pub fn connect(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let link = Link::new(a, b);
        if !self.links.contains(&link) {
            self.links.push(link);
        }
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name() == name)
    }

    pub fn device_mut(&mut self, name: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.name() == name)
    }

    /// Like [`device_mut`](Self::device_mut) but with an error for unknown
    /// names.
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Device> {
        self.device_mut(name)
            .ok_or_else(|| NetsimError::UnknownDevice(name.to_string()))
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(Device::name)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Whether any device other than `from` has an up interface holding `addr`.
    pub fn is_reachable(&self, from: &str, addr: &str) -> bool {
        self.devices
            .iter()
            .filter(|d| d.name() != from)
            .flat_map(|d| d.interfaces())
            .any(|i| i.answers(addr))
    }

    /// Flat reachability check behind the `ping` command.
    pub fn ping(&self, from: &str, addr: &str) -> PingReply {
        if self.is_reachable(from, addr) {
            PingReply::Reply(addr.to_string())
        } else {
            PingReply::Unreachable(addr.to_string())
        }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            devices: self.devices.iter().map(Device::snapshot).collect(),
            links: self.links.clone(),
        }
    }

    /// Pretty-printed JSON snapshot for external consumers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

/// Serializable copy of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub devices: Vec<DeviceSnapshot>,
    pub links: Vec<Link>,
}
