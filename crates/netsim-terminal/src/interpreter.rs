//! The modal command interpreter.
//!
//! `execute` takes one raw line for one device, resolves it against the
//! grammar for the device's current mode, applies the side effect, and
//! returns the text to show. Every failure is a `%` line and leaves the
//! device untouched.

use std::net::Ipv4Addr;

use netsim_device::Device;
use netsim_net::NetworkRegistry;
use netsim_types::error::CliError;
use netsim_types::mode::Mode;

use crate::grammar::{Action, Grammar, Resolution};

/// Reply to a `?` query that has nothing to offer.
pub const NO_FURTHER_OPTIONS: &str = "No further options.";

/// Stateless interpreter: all state lives in the devices it is handed.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    grammar: Grammar,
    strict_interfaces: bool,
}

impl Interpreter {
    /// Interpreter over the standard grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter over a custom grammar.
    pub fn with_grammar(grammar: Grammar) -> Self {
        Self {
            grammar,
            strict_interfaces: false,
        }
    }

    /// When set, `interface <name>` only selects interfaces the device
    /// already has instead of creating new ones.
    pub fn strict_interfaces(mut self, strict: bool) -> Self {
        self.strict_interfaces = strict;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Run one line on `device` and return the response text.
    ///
    /// An empty string means success with nothing to print.
    pub fn execute(&self, net: &mut NetworkRegistry, device: &str, line: &str) -> String {
        self.try_execute(net, device, line)
            .unwrap_or_else(|e| e.to_string())
    }

    /// Like [`execute`](Self::execute) but keeps failures typed.
    pub fn try_execute(
        &self,
        net: &mut NetworkRegistry,
        device: &str,
        line: &str,
    ) -> Result<String, CliError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(String::new());
        }

        let Some(mode) = net.device(device).map(Device::mode) else {
            log::warn!("command for unknown device {device}");
            return Err(CliError::InvalidTarget(format!("device {device}")));
        };

        if let Some(query) = line.strip_suffix('?') {
            let prefix: Vec<&str> = query.split_whitespace().collect();
            let next = self.grammar.suggest_next(mode, &prefix);
            return Ok(if next.is_empty() {
                NO_FURTHER_OPTIONS.to_string()
            } else {
                next.join(" ")
            });
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let path = match self.grammar.resolve(mode, &tokens) {
            Resolution::Unique(path) => path,
            Resolution::Ambiguous => return Err(CliError::Ambiguous),
            Resolution::None => return Err(CliError::Unresolved),
        };
        let args = path.arguments(&tokens)?;
        log::debug!("{device} {mode:?}: {line:?} -> {}", path.spelling());

        // Reachability only reads the registry, so it runs before the
        // device is borrowed mutably.
        if (mode, path.action) == (Mode::Privileged, Action::Ping) {
            let target = parse_address(first(&args)?)?;
            return Ok(net.ping(device, target).to_string());
        }

        let dev = net
            .device_mut(device)
            .ok_or_else(|| CliError::InvalidTarget(format!("device {device}")))?;
        let reply = self.apply(dev, mode, path.action, &args)?;
        if dev.mode() != mode {
            log::info!("{device}: {mode} -> {}", dev.mode());
        }
        Ok(reply)
    }

    fn apply(
        &self,
        dev: &mut Device,
        mode: Mode,
        action: Action,
        args: &[&str],
    ) -> Result<String, CliError> {
        match (mode, action) {
            (Mode::User, Action::Enable) => {
                dev.enter_privileged();
                Ok("Entered privileged mode".to_string())
            },
            (Mode::Privileged, Action::Disable | Action::Exit) => {
                dev.enter_user();
                Ok("Exited privileged mode".to_string())
            },
            (Mode::Privileged, Action::ConfigureTerminal) => {
                dev.enter_global_config();
                Ok("Entered configuration mode".to_string())
            },
            (Mode::Privileged, Action::ShowIpInterfaceBrief) => Ok(dev.render_brief()),
            (Mode::Privileged, Action::ShowRunningConfig) => Ok(dev.render_running_config()),
            (Mode::Privileged, Action::ShowInterface) => dev.render_interface(first(args)?),
            (Mode::Privileged | Mode::GlobalConfig, Action::Hostname) => {
                dev.set_hostname(first(args)?);
                Ok(String::new())
            },
            (Mode::GlobalConfig, Action::Interface) => {
                let name = first(args)?;
                let iface = if self.strict_interfaces {
                    dev.enter_existing_interface(name)?
                } else {
                    dev.enter_interface_config(name)
                };
                Ok(format!(
                    "Entered interface configuration mode ({})",
                    iface.name
                ))
            },
            (Mode::GlobalConfig, Action::Exit) => {
                dev.exit_mode();
                Ok("Exited config mode".to_string())
            },
            (Mode::GlobalConfig | Mode::InterfaceConfig, Action::End) => {
                dev.enter_privileged();
                Ok(String::new())
            },
            (Mode::InterfaceConfig, Action::IpAddress) => {
                let addr = parse_address(first(args)?)?;
                let name = active_name(dev)?;
                let assigned = dev.set_active_interface_address(addr)?;
                Ok(format!("IP address {assigned} assigned to {name}"))
            },
            (Mode::InterfaceConfig, Action::NoIpAddress) => {
                dev.clear_active_interface_address()?;
                Ok(format!("IP address removed from {}", active_name(dev)?))
            },
            (Mode::InterfaceConfig, Action::NoShutdown) => {
                dev.set_active_interface_up(true)?;
                Ok(format!("{} is now up", active_name(dev)?))
            },
            (Mode::InterfaceConfig, Action::Shutdown) => {
                dev.set_active_interface_up(false)?;
                Ok(format!("{} is now administratively down", active_name(dev)?))
            },
            (Mode::InterfaceConfig, Action::Exit) => {
                dev.exit_mode();
                Ok("Exited interface mode".to_string())
            },
            _ => Err(CliError::NotImplemented),
        }
    }
}

fn first<'a>(args: &[&'a str]) -> Result<&'a str, CliError> {
    args.first().copied().ok_or(CliError::Incomplete)
}

fn active_name(dev: &Device) -> Result<String, CliError> {
    dev.active_interface()
        .map(|i| i.name.clone())
        .ok_or(CliError::NoActiveInterface)
}

/// Accept dotted-quad IPv4 text, returned as typed.
fn parse_address(text: &str) -> Result<&str, CliError> {
    text.parse::<Ipv4Addr>()
        .map(|_| text)
        .map_err(|_| CliError::InvalidTarget(format!("address {text}")))
}

#[cfg(test)]
mod tests {
    use netsim_device::DeviceKind;

    use super::*;
    use crate::grammar::{CommandPath, Token};

    fn single(kind: DeviceKind) -> NetworkRegistry {
        let mut net = NetworkRegistry::new();
        net.add_device(Device::new("R1", kind));
        net
    }

    fn run(net: &mut NetworkRegistry, lines: &[&str]) -> Vec<String> {
        let interp = Interpreter::new();
        lines.iter().map(|l| interp.execute(net, "R1", l)).collect()
    }

    fn mode(net: &NetworkRegistry) -> Mode {
        net.device("R1").unwrap().mode()
    }

    #[test]
    fn empty_and_blank_lines_are_noops() {
        let mut net = single(DeviceKind::Router);
        assert_eq!(run(&mut net, &["", "   ", "\t"]), vec!["", "", ""]);
        assert_eq!(mode(&net), Mode::User);
    }

    #[test]
    fn enable_and_configure() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "conf t"]);
        assert_eq!(out[0], "Entered privileged mode");
        assert_eq!(out[1], "Entered configuration mode");
        assert_eq!(mode(&net), Mode::GlobalConfig);
    }

    #[test]
    fn implied_trailing_keywords() {
        let mut net = single(DeviceKind::Router);
        run(&mut net, &["enable", "conf"]);
        assert_eq!(mode(&net), Mode::GlobalConfig);
    }

    #[test]
    fn ambiguous_command() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["enable", "sh"]);
        assert_eq!(out[1], "% Ambiguous command");
        assert_eq!(mode(&net), Mode::Privileged);
    }

    #[test]
    fn wrong_mode_is_invalid_input() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["show ip interface brief"]);
        assert_eq!(out[0], "% Invalid input detected at '^' marker.");
    }

    #[test]
    fn missing_arguments_are_incomplete() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "ping", "hostname", "conf t", "int", "hostname"]);
        assert_eq!(out[1], "% Incomplete command.");
        assert_eq!(out[2], "% Incomplete command.");
        assert_eq!(out[4], "% Incomplete command.");
        assert_eq!(out[5], "% Incomplete command.");
        assert_eq!(mode(&net), Mode::GlobalConfig);

        let out = run(&mut net, &["int Gig0/0", "ip address"]);
        assert_eq!(out[1], "% Incomplete command.");
        assert!(net.device("R1").unwrap().interfaces()[0].ip_address.is_none());
    }

    #[test]
    fn interface_configuration_flow() {
        let mut net = single(DeviceKind::Router);
        let out = run(
            &mut net,
            &["en", "conf t", "int g0/0", "ip address 10.0.0.1", "no shutdown"],
        );
        assert_eq!(out[2], "Entered interface configuration mode (g0/0)");
        assert!(out[3].contains("10.0.0.1"));
        assert_eq!(out[4], "g0/0 is now up");
        assert_eq!(mode(&net), Mode::InterfaceConfig);

        let dev = net.device("R1").unwrap();
        // Router seeds Gig0/0; g0/0 is a distinct new interface name.
        assert_eq!(dev.interfaces().len(), 2);
        assert_eq!(dev.active_interface().unwrap().name, "g0/0");
    }

    #[test]
    fn interface_lookup_ignores_case() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "conf t", "int GIG0/0"]);
        assert_eq!(out[2], "Entered interface configuration mode (Gig0/0)");
        assert_eq!(net.device("R1").unwrap().interfaces().len(), 1);
    }

    #[test]
    fn strict_interfaces_reject_unknown_names() {
        let mut net = single(DeviceKind::Router);
        let interp = Interpreter::new().strict_interfaces(true);
        for line in ["en", "conf t"] {
            interp.execute(&mut net, "R1", line);
        }
        assert_eq!(
            interp.execute(&mut net, "R1", "int Gig9/9"),
            "% Invalid interface Gig9/9"
        );
        assert_eq!(mode(&net), Mode::GlobalConfig);
        assert_eq!(
            interp.execute(&mut net, "R1", "int gig0/0"),
            "Entered interface configuration mode (Gig0/0)"
        );
    }

    #[test]
    fn exit_walks_down_one_level() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "conf t", "int Gig0/0", "exit"]);
        assert_eq!(out[3], "Exited interface mode");
        assert_eq!(mode(&net), Mode::GlobalConfig);
        assert!(net.device("R1").unwrap().active_interface().is_none());

        let out = run(&mut net, &["exit"]);
        assert_eq!(out[0], "Exited config mode");
        assert_eq!(mode(&net), Mode::Privileged);

        let out = run(&mut net, &["exit"]);
        assert_eq!(out[0], "Exited privileged mode");
        assert_eq!(mode(&net), Mode::User);
    }

    #[test]
    fn exit_from_user_mode_stays_in_user_mode() {
        let mut net = single(DeviceKind::Router);
        for _ in 0..5 {
            let out = run(&mut net, &["exit"]);
            assert!(out[0].starts_with('%'));
            assert_eq!(mode(&net), Mode::User);
        }
    }

    #[test]
    fn end_returns_to_privileged() {
        let mut net = single(DeviceKind::Router);
        run(&mut net, &["en", "conf t", "int Gig0/0", "end"]);
        assert_eq!(mode(&net), Mode::Privileged);
        assert!(net.device("R1").unwrap().active_interface().is_none());
    }

    #[test]
    fn disable_returns_to_user() {
        let mut net = single(DeviceKind::Router);
        run(&mut net, &["en", "disable"]);
        assert_eq!(mode(&net), Mode::User);
    }

    #[test]
    fn hostname_in_privileged_and_config() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "hostname Edge"]);
        assert_eq!(out[1], "");
        assert_eq!(net.device("R1").unwrap().prompt(), "Edge#");
        run(&mut net, &["conf t", "host Core"]);
        assert_eq!(net.device("R1").unwrap().prompt(), "Core(config)#");
        // The registry key does not follow the hostname.
        assert!(net.device("Core").is_none());
    }

    #[test]
    fn shutdown_and_address_removal() {
        let mut net = single(DeviceKind::Router);
        let out = run(
            &mut net,
            &[
                "en",
                "conf t",
                "int Gig0/0",
                "ip address 10.1.1.1",
                "no shut",
                "shutdown",
                "no ip address",
            ],
        );
        assert_eq!(out[5], "Gig0/0 is now administratively down");
        assert_eq!(out[6], "IP address removed from Gig0/0");
        let iface = &net.device("R1").unwrap().interfaces()[0];
        assert!(!iface.admin_up);
        assert!(iface.ip_address.is_none());
    }

    #[test]
    fn invalid_address_is_rejected_without_mutation() {
        let mut net = single(DeviceKind::Router);
        let out = run(
            &mut net,
            &["en", "conf t", "int Gig0/0", "ip address 300.1.1.1", "ip address 10.0.0"],
        );
        assert_eq!(out[3], "% Invalid address 300.1.1.1");
        assert_eq!(out[4], "% Invalid address 10.0.0");
        assert!(net.device("R1").unwrap().interfaces()[0].ip_address.is_none());
    }

    #[test]
    fn show_commands() {
        let mut net = single(DeviceKind::Router);
        run(
            &mut net,
            &["en", "conf t", "int Gig0/0", "ip address 10.0.0.1", "no shut", "end"],
        );
        let out = run(&mut net, &["sh ip int br", "sh run", "sh int gig0/0", "sh int Gig5/5"]);
        assert!(out[0].contains("Gig0/0"));
        assert!(out[0].contains("10.0.0.1"));
        assert!(out[1].contains(" ip address 10.0.0.1"));
        assert!(out[1].contains(" no shutdown"));
        assert!(out[2].starts_with("Gig0/0 is up"));
        assert_eq!(out[3], "% Invalid interface Gig5/5");
    }

    #[test]
    fn ping_requires_valid_address() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "ping not-an-ip", "ping 10.0.0.9"]);
        assert_eq!(out[1], "% Invalid address not-an-ip");
        assert_eq!(out[2], "Destination 10.0.0.9 unreachable");
    }

    #[test]
    fn reload_is_not_implemented() {
        let mut net = single(DeviceKind::Router);
        let out = run(&mut net, &["en", "reload"]);
        assert_eq!(out[1], "% Command not implemented");
        assert_eq!(mode(&net), Mode::Privileged);
    }

    #[test]
    fn action_outside_its_mode_is_not_implemented() {
        const USER: &[CommandPath] = &[CommandPath {
            tokens: &[Token::Keyword("shutdown")],
            action: Action::Shutdown,
        }];
        let interp = Interpreter::with_grammar(Grammar::from_tables([USER, &[], &[], &[]]));
        let mut net = single(DeviceKind::Router);
        assert_eq!(
            interp.try_execute(&mut net, "R1", "shut"),
            Err(CliError::NotImplemented)
        );
    }

    #[test]
    fn help_queries() {
        let mut net = single(DeviceKind::Router);
        assert_eq!(run(&mut net, &["?"])[0], "enable");
        assert_eq!(run(&mut net, &["enable?"])[0], NO_FURTHER_OPTIONS);
        run(&mut net, &["en"]);
        assert_eq!(run(&mut net, &["show ?"])[0], "ip interface running-config");
        run(&mut net, &["conf t"]);
        assert_eq!(run(&mut net, &["int?"])[0], "<name>");
        assert_eq!(mode(&net), Mode::GlobalConfig);
    }

    #[test]
    fn unknown_device() {
        let mut net = single(DeviceKind::Router);
        let interp = Interpreter::new();
        assert_eq!(interp.execute(&mut net, "R9", "en"), "% Invalid device R9");
        // Blank lines never look the device up.
        assert_eq!(interp.execute(&mut net, "R9", "  "), "");
    }

    #[test]
    fn failures_leave_state_untouched() {
        let mut net = single(DeviceKind::Router);
        run(&mut net, &["en", "conf t", "int Gig0/0", "ip address 10.0.0.1"]);
        let before = net.device("R1").unwrap().snapshot();
        let out = run(&mut net, &["e", "bogus", "ip address", "ip address x", "no"]);
        assert!(out.iter().all(|o| o.starts_with('%')), "{out:?}");
        assert_eq!(net.device("R1").unwrap().snapshot(), before);
    }
}
