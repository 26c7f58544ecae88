//! Domain layer - release model and the ports the pipeline drives

pub mod ports;
pub mod release;

pub use release::{current_link_target, release_path, shared_link_target, Release, TagGenerator};
