//! Command layer - wires config, ports, and use cases together

pub mod deploy;
pub mod remove;
