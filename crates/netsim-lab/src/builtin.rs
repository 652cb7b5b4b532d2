//! Built-in lab definitions.
//!
//! Each lab is an embedded TOML document, so the simulator is usable
//! without any lab files on disk.

use netsim_types::error::{NetsimError, Result};

use crate::lab::Lab;

// ---------------------------------------------------------------------------
// Routing basics: two routers on one link.
// ---------------------------------------------------------------------------

const ROUTING_BASICS: &str = r#"
name = "Routing Basics"
description = "Address both ends of a router-to-router link and bring it up."
links = [["R1", "R2"]]

[[device]]
name = "R1"
kind = "router"

[[device]]
name = "R2"
kind = "router"

[[task]]
description = "Configure IP on R1 and enable interface"
check = { type = "interface_configured", device = "R1", interface = "Gig0/0" }

[[task]]
description = "Configure IP on R2 and enable interface"
check = { type = "interface_configured", device = "R2", interface = "Gig0/0" }
"#;

// ---------------------------------------------------------------------------
// Router-switch: routers at either end of a switch chain.
// ---------------------------------------------------------------------------

const ROUTER_SWITCH: &str = r#"
name = "Basic Router-Switch Network"
description = "Two routers joined through a pair of switches."
links = [["R1", "S1"], ["S1", "S2"], ["S2", "R2"]]

[[device]]
name = "R1"
kind = "router"

[[device]]
name = "S1"
kind = "switch"

[[device]]
name = "S2"
kind = "switch"

[[device]]
name = "R2"
kind = "router"

[[task]]
description = "Configure IP on R1 Gig0/0 and bring it up"
check = { type = "interface_configured", device = "R1", interface = "Gig0/0" }

[[task]]
description = "Configure IP on R2 Gig0/0 and bring it up"
check = { type = "interface_configured", device = "R2", interface = "Gig0/0" }
"#;

// ---------------------------------------------------------------------------
// VLAN basics: two switches, bring up the access ports.
// ---------------------------------------------------------------------------

const VLAN_BASICS: &str = r#"
name = "Basic VLAN Setup"
description = "Bring up the access port on both switches."
links = [["S1", "S2"]]

[[device]]
name = "S1"
kind = "switch"

[[device]]
name = "S2"
kind = "switch"

[[task]]
description = "Bring up interface Fa0/1 on S1"
check = { type = "interface_up", device = "S1", interface = "Fa0/1" }

[[task]]
description = "Bring up interface Fa0/1 on S2"
check = { type = "interface_up", device = "S2", interface = "Fa0/1" }
"#;

const BUILTINS: &[(&str, &str)] = &[
    ("routing-basics", ROUTING_BASICS),
    ("router-switch", ROUTER_SWITCH),
    ("vlan-basics", VLAN_BASICS),
];

/// Raw TOML of a built-in lab.
pub fn lookup(name: &str) -> Option<&'static str> {
    BUILTINS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, doc)| *doc)
}

/// Names of all built-in labs.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Load a built-in lab by name.
pub fn load_builtin(name: &str) -> Result<Lab> {
    let doc = lookup(name)
        .ok_or_else(|| NetsimError::Config(format!("unknown built-in lab: {name}")))?;
    Lab::from_toml(doc)
}
