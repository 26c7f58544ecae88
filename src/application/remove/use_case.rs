//! Remove Use Case
//!
//! The teardown pipeline: connect, recursively delete the entire deploy
//! root, close. Shares the deploy pipeline's failure policy: abort on
//! first error, best-effort close, error returned to the caller.

use crate::config::Options;
use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteConnector, RemoteSession};
use crate::error::{GantryError, GantryResult};

pub struct RemoveUseCase<C>
where
    C: RemoteConnector,
{
    options: Options,
    connector: C,
    events: Box<dyn DeployEventSink>,
}

impl<C> RemoveUseCase<C>
where
    C: RemoteConnector,
{
    pub fn new(options: Options, connector: C, events: Box<dyn DeployEventSink>) -> Self {
        Self {
            options,
            connector,
            events,
        }
    }

    /// Delete the deploy root (releases, shared folder, current link).
    pub fn execute(&self) -> GantryResult<()> {
        let mut session = self
            .connector
            .connect()
            .map_err(|e| GantryError::Connection {
                host: self.options.host.clone(),
                message: e.to_string(),
            })?;
        self.events.on_event(DeployEvent::Connected {
            host: self.options.host.clone(),
        });

        self.events.on_event(DeployEvent::StageStarted {
            stage: "remove-deploy-root",
        });
        if let Err(e) = session.remove_tree(&self.options.deploy_path) {
            let error = GantryError::RemoteCommand {
                command: format!("rm -rf {}", self.options.deploy_path),
                stderr: e.to_string(),
            };
            self.events.on_event(DeployEvent::Failed {
                stage: "remove-deploy-root",
                error: error.to_string(),
            });
            let _ = session.close();
            return Err(error);
        }
        self.events.on_event(DeployEvent::StageCompleted {
            stage: "remove-deploy-root",
        });

        session.close().map_err(|e| GantryError::RemoteCommand {
            command: "close".to_string(),
            stderr: e.to_string(),
        })?;
        self.events.on_event(DeployEvent::Closed);
        Ok(())
    }
}
