//! Lab loading from TOML.

use std::collections::HashSet;
use std::path::Path;

use netsim_device::{Device, DeviceKind};
use netsim_net::NetworkRegistry;
use netsim_terminal::{Console, DEFAULT_HISTORY_LIMIT, Interpreter};
use netsim_types::error::{NetsimError, Result};
use serde::Deserialize;

use crate::task::{Progress, Task};

/// A device entry (`[[device]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceDef {
    pub name: String,
    #[serde(default)]
    pub kind: DeviceKind,
    /// Interfaces seeded after the kind's defaults.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl DeviceDef {
    pub fn build(&self) -> Device {
        Device::with_interfaces(&self.name, self.kind, self.interfaces.iter().cloned())
    }
}

/// Lab-wide tunables (`[settings]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabSettings {
    /// Only allow configuring interfaces the device already has.
    #[serde(default)]
    pub strict_interfaces: bool,
    /// Lines remembered per device session.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            strict_interfaces: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A parsed lab: topology, settings, and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lab {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: LabSettings,
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceDef>,
    #[serde(default)]
    pub links: Vec<(String, String)>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<Task>,
}

impl Lab {
    /// Parse and validate a lab document.
    pub fn from_toml(doc: &str) -> Result<Self> {
        let lab: Lab =
            toml::from_str(doc).map_err(|e| NetsimError::Config(format!("lab: {e}")))?;
        lab.validate()?;
        Ok(lab)
    }

    /// Load a lab from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let doc = std::fs::read_to_string(path)
            .map_err(|e| NetsimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&doc)
    }

    /// Reject duplicate device names and links or tasks naming devices
    /// the lab does not define.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for dev in &self.devices {
            if !names.insert(dev.name.as_str()) {
                return Err(NetsimError::Config(format!(
                    "lab {}: duplicate device {}",
                    self.name, dev.name
                )));
            }
        }
        for (a, b) in &self.links {
            for end in [a, b] {
                if !names.contains(end.as_str()) {
                    return Err(NetsimError::Config(format!(
                        "lab {}: link {a}-{b} names unknown device {end}",
                        self.name
                    )));
                }
            }
        }
        for task in &self.tasks {
            let dev = task.check.device();
            if !names.contains(dev) {
                return Err(NetsimError::Config(format!(
                    "lab {}: task {:?} names unknown device {dev}",
                    self.name, task.description
                )));
            }
        }
        Ok(())
    }

    /// Fresh network with every device in its initial state.
    pub fn build(&self) -> NetworkRegistry {
        let mut net = NetworkRegistry::new();
        for def in &self.devices {
            net.add_device(def.build());
        }
        for (a, b) in &self.links {
            net.connect(a, b);
        }
        log::info!(
            "Built lab {} ({} devices, {} links)",
            self.name,
            net.len(),
            net.links().len()
        );
        net
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new().strict_interfaces(self.settings.strict_interfaces)
    }

    /// Console over a fresh network, attached to the first device.
    pub fn console(&self) -> Result<Console> {
        let mut console = Console::new(self.build(), self.interpreter())
            .with_history_limit(self.settings.history_limit);
        if let Some(first) = self.devices.first() {
            console.attach(&first.name)?;
        }
        Ok(console)
    }

    pub fn progress(&self, net: &NetworkRegistry) -> Progress {
        Progress::of(&self.tasks, net)
    }
}

/// Resolve a lab from a built-in name or a path to a TOML file.
pub fn resolve_lab(name_or_path: &str) -> Result<Lab> {
    if let Some(doc) = crate::builtin::lookup(name_or_path) {
        return Lab::from_toml(doc);
    }
    let path = Path::new(name_or_path);
    if path.is_file() {
        return Lab::from_file(path);
    }
    Err(NetsimError::Config(format!(
        "unknown lab {name_or_path:?} (built-in: {})",
        crate::builtin::names().collect::<Vec<_>>().join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use netsim_types::mode::Mode;

    use super::*;
    use crate::task::Check;

    const SAMPLE: &str = r#"
name = "Sample"
description = "Router and switch"
links = [["R1", "S1"]]

[settings]
strict_interfaces = true

[[device]]
name = "R1"
kind = "router"
interfaces = ["Gig0/1"]

[[device]]
name = "S1"
kind = "switch"

[[task]]
description = "R1 Gig0/1 up"
check = { type = "interface_up", device = "R1", interface = "Gig0/1" }
"#;

    #[test]
    fn parse_sample() {
        let lab = Lab::from_toml(SAMPLE).unwrap();
        assert_eq!(lab.name, "Sample");
        assert!(lab.settings.strict_interfaces);
        assert_eq!(lab.settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(lab.devices.len(), 2);
        assert_eq!(lab.devices[1].kind, DeviceKind::Switch);
        assert_eq!(lab.links, vec![("R1".to_string(), "S1".to_string())]);
        assert_eq!(
            lab.tasks[0].check,
            Check::InterfaceUp {
                device: "R1".into(),
                interface: "Gig0/1".into()
            }
        );
    }

    #[test]
    fn minimal_lab_uses_defaults() {
        let lab = Lab::from_toml("name = \"Empty\"").unwrap();
        assert!(lab.devices.is_empty());
        assert_eq!(lab.settings, LabSettings::default());
        assert!(lab.build().is_empty());
        assert_eq!(lab.progress(&lab.build()).percent(), 100);
    }

    #[test]
    fn device_kind_defaults_to_router() {
        let lab = Lab::from_toml("name = \"x\"\n[[device]]\nname = \"R1\"\n").unwrap();
        assert_eq!(lab.devices[0].kind, DeviceKind::Router);
    }

    #[test]
    fn build_seeds_interfaces_and_links() {
        let lab = Lab::from_toml(SAMPLE).unwrap();
        let net = lab.build();
        let r1 = net.device("R1").unwrap();
        let names: Vec<&str> = r1.interfaces().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Gig0/0", "Gig0/1"]);
        assert_eq!(net.device("S1").unwrap().interfaces()[0].name, "Fa0/1");
        assert_eq!(net.links().len(), 1);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = Lab::from_toml("name = [[[").unwrap_err();
        match err {
            NetsimError::Config(msg) => assert!(msg.starts_with("lab:")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_name_is_rejected() {
        assert!(Lab::from_toml("[[device]]\nname = \"R1\"\n").is_err());
    }

    #[test]
    fn unknown_link_endpoint_rejected() {
        let doc = "name = \"x\"\nlinks = [[\"R1\", \"R2\"]]\n[[device]]\nname = \"R1\"\n";
        let err = Lab::from_toml(doc).unwrap_err().to_string();
        assert!(err.contains("unknown device R2"), "{err}");
    }

    #[test]
    fn duplicate_device_rejected() {
        let doc = "name = \"x\"\n[[device]]\nname = \"R1\"\n[[device]]\nname = \"R1\"\n";
        let err = Lab::from_toml(doc).unwrap_err().to_string();
        assert!(err.contains("duplicate device R1"), "{err}");
    }

    #[test]
    fn task_for_unknown_device_rejected() {
        let doc = r#"
name = "x"
[[device]]
name = "R1"
[[task]]
description = "ghost"
check = { type = "hostname", device = "R7", hostname = "G" }
"#;
        assert!(Lab::from_toml(doc).is_err());
    }

    #[test]
    fn console_attaches_first_device_with_settings() {
        let lab = Lab::from_toml(SAMPLE).unwrap();
        let mut console = lab.console().unwrap();
        assert_eq!(console.prompt().unwrap(), "R1>");
        console.submit("en").unwrap();
        console.submit("conf t").unwrap();
        // Strict interfaces come from [settings].
        assert_eq!(console.submit("int Gig7/7").unwrap(), "% Invalid interface Gig7/7");
        console.submit("int gig0/1").unwrap();
        console.submit("no shut").unwrap();
        assert_eq!(
            console.network().device("R1").unwrap().mode(),
            Mode::InterfaceConfig
        );
        assert!(lab.progress(console.network()).is_complete());
    }

    #[test]
    fn console_uses_history_limit_setting() {
        let doc = "name = \"x\"\n[settings]\nhistory_limit = 2\n[[device]]\nname = \"R1\"\n";
        let lab = Lab::from_toml(doc).unwrap();
        let mut console = lab.console().unwrap();
        for line in ["en", "conf t", "exit", "disable"] {
            console.submit(line).unwrap();
        }
        let history = console.history("R1").unwrap();
        assert_eq!(history.entries(), ["exit", "disable"]);
    }

    #[test]
    fn from_file_and_resolve_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let lab = Lab::from_file(file.path()).unwrap();
        assert_eq!(lab.name, "Sample");
        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(resolve_lab(&path).unwrap(), lab);
    }

    #[test]
    fn from_missing_file_is_config_error() {
        let err = Lab::from_file(Path::new("/nonexistent/lab.toml")).unwrap_err();
        assert!(matches!(err, NetsimError::Config(_)));
    }

    #[test]
    fn resolve_builtin_and_unknown() {
        assert_eq!(resolve_lab("routing-basics").unwrap().name, "Routing Basics");
        let err = resolve_lab("no-such-lab").unwrap_err().to_string();
        assert!(err.contains("routing-basics"), "{err}");
    }
}
