//! Command modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The privilege/configuration context of a device.
///
/// Variants are declared in escalation order, so the derived `Ord` gives
/// `User < Privileged < GlobalConfig < InterfaceConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    User,
    Privileged,
    GlobalConfig,
    InterfaceConfig,
}

impl Mode {
    /// All modes, lowest first.
    pub const ALL: [Mode; 4] = [
        Mode::User,
        Mode::Privileged,
        Mode::GlobalConfig,
        Mode::InterfaceConfig,
    ];

    /// Text appended to the hostname to form the prompt.
    pub fn prompt_suffix(self) -> &'static str {
        match self {
            Mode::User => ">",
            Mode::Privileged => "#",
            Mode::GlobalConfig => "(config)#",
            Mode::InterfaceConfig => "(config-if)#",
        }
    }

    /// Build the full prompt for a hostname.
    pub fn prompt(self, hostname: &str) -> String {
        format!("{hostname}{}", self.prompt_suffix())
    }

    /// Short name, as used in serialized snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Mode::User => "user",
            Mode::Privileged => "privileged",
            Mode::GlobalConfig => "global_config",
            Mode::InterfaceConfig => "interface_config",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
