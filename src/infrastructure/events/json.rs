//! NDJSON event sink for CI
//!
//! One JSON object per line on stdout; consumers can follow the pipeline
//! without scraping human output.

use serde_json::json;

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct JsonEventSink;

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let value = match event {
            DeployEvent::Connected { host } => json!({
                "event": "connected",
                "host": host,
            }),
            DeployEvent::StageStarted { stage } => json!({
                "event": "stage_started",
                "stage": stage,
            }),
            DeployEvent::StageCompleted { stage } => json!({
                "event": "stage_completed",
                "stage": stage,
            }),
            DeployEvent::Compressed {
                archive,
                size,
                digest,
            } => json!({
                "event": "compressed",
                "archive": archive,
                "size": size,
                "digest": digest,
            }),
            DeployEvent::ReleaseCreated { tag, path } => json!({
                "event": "release_created",
                "tag": tag,
                "path": path,
            }),
            DeployEvent::CommandExecuted { command } => json!({
                "event": "command_executed",
                "command": command,
            }),
            DeployEvent::SharedLinkUpdated { link, target } => json!({
                "event": "shared_link_updated",
                "link": link,
                "target": target,
            }),
            DeployEvent::CurrentSwitched { tag } => json!({
                "event": "current_switched",
                "tag": tag,
            }),
            DeployEvent::Pruned { deleted } => json!({
                "event": "pruned",
                "deleted": deleted,
            }),
            DeployEvent::LocalArchiveDeleted { archive } => json!({
                "event": "local_archive_deleted",
                "archive": archive,
            }),
            DeployEvent::Closed => json!({
                "event": "closed",
            }),
            DeployEvent::Completed { tag } => json!({
                "event": "completed",
                "tag": tag,
            }),
            DeployEvent::Failed { stage, error } => json!({
                "event": "failed",
                "stage": stage,
                "error": error,
            }),
        };
        println!("{}", value);
    }
}
