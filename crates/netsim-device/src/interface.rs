//! Interfaces and the rows rendered from them.

use serde::{Deserialize, Serialize};

/// A configurable interface on a device.
///
/// Address and administrative state are independent: an interface may be
/// up with no address, or addressed while shut down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub admin_up: bool,
}

impl Interface {
    /// A new interface: no address, administratively down.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip_address: None,
            admin_up: false,
        }
    }

    /// Address text as shown by `show` commands.
    pub fn address_or_unassigned(&self) -> &str {
        self.ip_address.as_deref().unwrap_or("unassigned")
    }

    pub fn status(&self) -> &'static str {
        if self.admin_up { "up" } else { "down" }
    }

    /// Whether this interface answers for `addr` (configured and up).
    pub fn answers(&self, addr: &str) -> bool {
        self.admin_up && self.ip_address.as_deref() == Some(addr)
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub(crate) fn brief_row(&self) -> BriefRow<'_> {
        BriefRow {
            name: &self.name,
            address: self.address_or_unassigned(),
            status: self.status(),
        }
    }
}

/// A row of `show ip interface brief`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BriefRow<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_interface_defaults() {
        let i = Interface::new("Gig0/0");
        assert_eq!(i.name, "Gig0/0");
        assert!(i.ip_address.is_none());
        assert!(!i.admin_up);
        assert_eq!(i.address_or_unassigned(), "unassigned");
        assert_eq!(i.status(), "down");
    }

    #[test]
    fn answers_requires_address_and_up() {
        let mut i = Interface::new("Gig0/0");
        assert!(!i.answers("10.0.0.1"));
        i.ip_address = Some("10.0.0.1".into());
        assert!(!i.answers("10.0.0.1"));
        i.admin_up = true;
        assert!(i.answers("10.0.0.1"));
        assert!(!i.answers("10.0.0.2"));
    }

    #[test]
    fn up_without_address_is_allowed() {
        let mut i = Interface::new("Fa0/1");
        i.admin_up = true;
        assert_eq!(i.status(), "up");
        assert_eq!(i.address_or_unassigned(), "unassigned");
    }

    #[test]
    fn name_match_ignores_case() {
        let i = Interface::new("Gig0/0");
        assert!(i.is_named("gig0/0"));
        assert!(i.is_named("GIG0/0"));
        assert!(!i.is_named("gig0/1"));
    }

    #[test]
    fn deserialize_with_defaults() {
        let i: Interface = serde_json::from_str(r#"{"name":"eth0"}"#).unwrap();
        assert_eq!(i, Interface::new("eth0"));
    }
}
