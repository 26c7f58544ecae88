//! Hook Context
//!
//! The read-only snapshot handed to user hooks. Hooks see the validated
//! options, the release being deployed, the event sink, and the
//! *restricted* remote surface - never the raw session, so a hook cannot
//! close the connection or trigger retention out of order.

use crate::config::Options;
use crate::domain::ports::{DeployEventSink, RemoteControl};
use crate::domain::Release;

pub struct HookContext<'a> {
    options: &'a Options,
    release: &'a Release,
    remote: &'a mut dyn RemoteControl,
    events: &'a dyn DeployEventSink,
}

impl<'a> HookContext<'a> {
    pub fn new(
        options: &'a Options,
        release: &'a Release,
        remote: &'a mut dyn RemoteControl,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            options,
            release,
            remote,
            events,
        }
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn release(&self) -> &Release {
        self.release
    }

    pub fn remote(&mut self) -> &mut dyn RemoteControl {
        self.remote
    }

    pub fn events(&self) -> &dyn DeployEventSink {
        self.events
    }

    /// Compatibility alias from the pre-0.3 context shape.
    #[deprecated(since = "0.3.0", note = "use release().path instead")]
    pub fn release_dir(&self) -> &str {
        &self.release.path
    }

    /// Compatibility alias from the pre-0.3 context shape.
    #[deprecated(since = "0.3.0", note = "use release().tag instead")]
    pub fn release_name(&self) -> &str {
        &self.release.tag
    }
}
