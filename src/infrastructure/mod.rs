//! Infrastructure layer - concrete port implementations

pub mod archive;
pub mod events;
pub mod remote;

pub use archive::{archiver_for, TarArchiver, ZipArchiver};
pub use events::JsonEventSink;
pub use remote::{SshConnector, SshSession};
