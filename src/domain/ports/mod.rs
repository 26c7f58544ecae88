//! Domain ports - interfaces the pipeline consumes
//!
//! Concrete implementations live in the infrastructure layer.

pub mod archiver;
pub mod deploy_events;
pub mod remote;

pub use archiver::{ArchiveError, ArchiveInfo, ArchiveSpec, Archiver};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use remote::{ExecOutput, RemoteConnector, RemoteControl, RemoteError, RemoteSession};
