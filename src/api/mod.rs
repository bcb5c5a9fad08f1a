//! Client side of the capture server's HTTP interface.

pub mod client;
pub mod endpoints;
