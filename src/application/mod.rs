//! Application layer - use cases and the hook surface

pub mod context;
pub mod deploy;
pub mod hooks;
pub mod remove;

pub use context::HookContext;
pub use deploy::{DeployReport, DeployUseCase};
pub use hooks::{CommandList, Hook, HookPhase, HookSet};
pub use remove::RemoveUseCase;
