//! Foundation types for netsim.
//!
//! This crate contains the types shared by every netsim crate: the command
//! mode ladder a device moves through and the error types for both
//! configuration failures and user-visible command errors.

pub mod error;
pub mod mode;
