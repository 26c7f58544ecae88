//! Deploy Use Case
//!
//! The deployment pipeline state machine: a fixed, ordered array of stage
//! descriptors driven by one loop. Each stage is a function from the
//! shared pipeline state to a result; the driver runs stages strictly in
//! sequence, skips a stage only when its predicate says so (a skipped
//! stage issues zero remote calls and zero events), aborts on the first
//! error with a best-effort session close, and returns the error to the
//! caller.
//!
//! Ordering carries the safety invariants: the release directory exists
//! before any transfer, unpack completes before any symlink can reference
//! its contents, and the new release is live before retention cleanup
//! runs, so a crash mid-cleanup never removes the active release.

use std::path::PathBuf;

use crate::application::context::HookContext;
use crate::application::hooks::{HookPhase, HookSet};
use crate::config::{ArchiveKind, DeployMode, Options};
use crate::domain::ports::{
    ArchiveInfo, ArchiveSpec, Archiver, DeployEvent, DeployEventSink, RemoteConnector,
    RemoteControl, RemoteError, RemoteSession,
};
use crate::domain::{current_link_target, shared_link_target, Release, TagGenerator};
use crate::error::{GantryError, GantryResult};

use super::result::DeployReport;

/// One stage of the pipeline, in driver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Connect,
    BeforeDeployHook,
    BeforeDeployCommands,
    Compress,
    CreateReleaseFolder,
    UploadArchive,
    SynchronizeTree,
    UnpackArchive,
    BeforeLinkHook,
    BeforeLinkCommands,
    UpdateSharedSymlinks,
    CreateFolders,
    MakeWritable,
    MakeExecutable,
    SwapCurrentLink,
    AfterDeployHook,
    AfterDeployCommands,
    PruneReleases,
    DeleteLocalArchive,
    Close,
}

impl Stage {
    /// The fixed stage sequence. Stage n+1 starts only after stage n
    /// returned Ok.
    const SEQUENCE: [Stage; 20] = [
        Stage::Connect,
        Stage::BeforeDeployHook,
        Stage::BeforeDeployCommands,
        Stage::Compress,
        Stage::CreateReleaseFolder,
        Stage::UploadArchive,
        Stage::SynchronizeTree,
        Stage::UnpackArchive,
        Stage::BeforeLinkHook,
        Stage::BeforeLinkCommands,
        Stage::UpdateSharedSymlinks,
        Stage::CreateFolders,
        Stage::MakeWritable,
        Stage::MakeExecutable,
        Stage::SwapCurrentLink,
        Stage::AfterDeployHook,
        Stage::AfterDeployCommands,
        Stage::PruneReleases,
        Stage::DeleteLocalArchive,
        Stage::Close,
    ];

    fn name(self) -> &'static str {
        match self {
            Stage::Connect => "connect",
            Stage::BeforeDeployHook => "before-deploy-hook",
            Stage::BeforeDeployCommands => "before-deploy-commands",
            Stage::Compress => "compress",
            Stage::CreateReleaseFolder => "create-release-folder",
            Stage::UploadArchive => "upload-archive",
            Stage::SynchronizeTree => "synchronize-tree",
            Stage::UnpackArchive => "unpack-archive",
            Stage::BeforeLinkHook => "before-link-hook",
            Stage::BeforeLinkCommands => "before-link-commands",
            Stage::UpdateSharedSymlinks => "update-shared-symlinks",
            Stage::CreateFolders => "create-folders",
            Stage::MakeWritable => "make-writable",
            Stage::MakeExecutable => "make-executable",
            Stage::SwapCurrentLink => "swap-current-link",
            Stage::AfterDeployHook => "after-deploy-hook",
            Stage::AfterDeployCommands => "after-deploy-commands",
            Stage::PruneReleases => "prune-releases",
            Stage::DeleteLocalArchive => "delete-local-archive",
            Stage::Close => "close",
        }
    }
}

/// Pipeline-internal mutable state. Never exposed to hooks.
struct PipelineState<S: RemoteSession> {
    session: Option<S>,
    release: Release,
    archive: Option<ArchiveInfo>,
    pruned: Vec<String>,
}

impl<S: RemoteSession> PipelineState<S> {
    fn session(&mut self) -> GantryResult<&mut S> {
        self.session.as_mut().ok_or_else(|| GantryError::Connection {
            host: String::new(),
            message: "session not established".to_string(),
        })
    }
}

/// Deploy use case - drives one release through the pipeline.
///
/// Parameterized by its ports (remote connector, archiver), allowing for
/// easy testing and different transports.
pub struct DeployUseCase<C, A>
where
    C: RemoteConnector,
    A: Archiver,
{
    options: Options,
    hooks: HookSet,
    connector: C,
    archiver: A,
    events: Box<dyn DeployEventSink>,
    tags: TagGenerator,
}

impl<C, A> DeployUseCase<C, A>
where
    C: RemoteConnector,
    A: Archiver,
{
    pub fn new(
        options: Options,
        hooks: HookSet,
        connector: C,
        archiver: A,
        events: Box<dyn DeployEventSink>,
    ) -> Self {
        Self {
            options,
            hooks,
            connector,
            archiver,
            events,
            tags: TagGenerator::new(),
        }
    }

    /// Execute the deploy pipeline.
    ///
    /// On failure the session is closed best-effort (unless the failure
    /// was the connect itself) and the error is returned to the caller.
    pub fn execute(&self) -> GantryResult<DeployReport> {
        let tag = self.tags.next();
        let mut state: PipelineState<C::Session> = PipelineState {
            session: None,
            release: Release::new(&self.options.deploy_path, &self.options.releases_folder, tag),
            archive: None,
            pruned: Vec::new(),
        };

        for stage in Stage::SEQUENCE {
            if self.should_skip(stage) {
                continue;
            }

            self.events.on_event(DeployEvent::StageStarted {
                stage: stage.name(),
            });

            if let Err(error) = self.run_stage(stage, &mut state) {
                self.events.on_event(DeployEvent::Failed {
                    stage: stage.name(),
                    error: error.to_string(),
                });
                if !error.is_connection_failure() {
                    if let Some(session) = state.session.as_mut() {
                        // Best effort; the stage error stays the primary one
                        let _ = session.close();
                    }
                }
                return Err(error);
            }

            self.events.on_event(DeployEvent::StageCompleted {
                stage: stage.name(),
            });
        }

        self.events.on_event(DeployEvent::Completed {
            tag: state.release.tag.clone(),
        });

        Ok(DeployReport {
            release: state.release,
            archive: state.archive,
            pruned: state.pruned,
        })
    }

    /// Skip predicates. A skipped stage must be a pure no-op.
    fn should_skip(&self, stage: Stage) -> bool {
        let opts = &self.options;
        match stage {
            Stage::Compress | Stage::UploadArchive | Stage::UnpackArchive => {
                opts.mode != DeployMode::Archive
            }
            Stage::SynchronizeTree => opts.mode != DeployMode::Synchronize,
            Stage::BeforeDeployHook => self.hooks.hook(HookPhase::BeforeDeploy).is_none(),
            Stage::BeforeDeployCommands => self.hooks.commands(HookPhase::BeforeDeploy).is_none(),
            Stage::BeforeLinkHook => self.hooks.hook(HookPhase::BeforeLink).is_none(),
            Stage::BeforeLinkCommands => self.hooks.commands(HookPhase::BeforeLink).is_none(),
            Stage::AfterDeployHook => self.hooks.hook(HookPhase::AfterDeploy).is_none(),
            Stage::AfterDeployCommands => self.hooks.commands(HookPhase::AfterDeploy).is_none(),
            Stage::UpdateSharedSymlinks => opts.share.is_empty(),
            Stage::CreateFolders => opts.create.is_empty(),
            Stage::MakeWritable => opts.make_writable.is_empty(),
            Stage::MakeExecutable => opts.make_executable.is_empty(),
            Stage::DeleteLocalArchive => {
                opts.mode != DeployMode::Archive || !opts.delete_local_archive
            }
            _ => false,
        }
    }

    fn run_stage(&self, stage: Stage, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        match stage {
            Stage::Connect => self.connect(state),
            Stage::BeforeDeployHook => self.run_hook(HookPhase::BeforeDeploy, state),
            Stage::BeforeDeployCommands => self.run_commands(HookPhase::BeforeDeploy, state),
            Stage::Compress => self.compress(state),
            Stage::CreateReleaseFolder => self.create_release_folder(state),
            Stage::UploadArchive => self.upload_archive(state),
            Stage::SynchronizeTree => self.synchronize_tree(state),
            Stage::UnpackArchive => self.unpack_archive(state),
            Stage::BeforeLinkHook => self.run_hook(HookPhase::BeforeLink, state),
            Stage::BeforeLinkCommands => self.run_commands(HookPhase::BeforeLink, state),
            Stage::UpdateSharedSymlinks => self.update_shared_symlinks(state),
            Stage::CreateFolders => self.create_folders(state),
            Stage::MakeWritable => self.make_writable(state),
            Stage::MakeExecutable => self.make_executable(state),
            Stage::SwapCurrentLink => self.swap_current_link(state),
            Stage::AfterDeployHook => self.run_hook(HookPhase::AfterDeploy, state),
            Stage::AfterDeployCommands => self.run_commands(HookPhase::AfterDeploy, state),
            Stage::PruneReleases => self.prune_releases(state),
            Stage::DeleteLocalArchive => self.delete_local_archive(state),
            Stage::Close => self.close(state),
        }
    }

    fn connect(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let session = self
            .connector
            .connect()
            .map_err(|e| GantryError::Connection {
                host: self.options.host.clone(),
                message: e.to_string(),
            })?;
        state.session = Some(session);
        self.events.on_event(DeployEvent::Connected {
            host: self.options.host.clone(),
        });
        Ok(())
    }

    fn run_hook(&self, phase: HookPhase, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let PipelineState {
            session, release, ..
        } = state;
        let session = session.as_mut().ok_or_else(|| GantryError::Connection {
            host: self.options.host.clone(),
            message: "session not established".to_string(),
        })?;
        let mut ctx = HookContext::new(&self.options, release, session, self.events.as_ref());
        self.hooks.run_hook(phase, &mut ctx)
    }

    fn run_commands(
        &self,
        phase: HookPhase,
        state: &mut PipelineState<C::Session>,
    ) -> GantryResult<()> {
        let PipelineState {
            session, release, ..
        } = state;
        let session = session.as_mut().ok_or_else(|| GantryError::Connection {
            host: self.options.host.clone(),
            message: "session not established".to_string(),
        })?;
        let mut ctx = HookContext::new(&self.options, release, session, self.events.as_ref());
        self.hooks.run_commands(phase, &mut ctx)
    }

    fn compress(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let spec = ArchiveSpec {
            source: self.options.source.clone(),
            archive_name: self.archiver.archive_file_name(&self.options.archive_name),
            exclude: self.options.exclude.clone(),
        };
        let info = self
            .archiver
            .compress(&spec)
            .map_err(|e| GantryError::Archive(e.to_string()))?;
        self.events.on_event(DeployEvent::Compressed {
            archive: info.path.display().to_string(),
            size: info.size_description(),
            digest: info.digest.clone(),
        });
        state.archive = Some(info);
        Ok(())
    }

    fn create_release_folder(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let path = state.release.path.clone();
        let tag = state.release.tag.clone();
        state
            .session()?
            .create_folder(&path)
            .map_err(|e| self.remote_error(e))?;
        self.events
            .on_event(DeployEvent::ReleaseCreated { tag, path });
        Ok(())
    }

    fn upload_archive(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let archive = state.archive.clone().ok_or_else(|| {
            GantryError::Archive("no archive produced before upload".to_string())
        })?;
        let release_path = state.release.path.clone();
        state
            .session()?
            .upload(&archive.path, &release_path)
            .map_err(|e| GantryError::Upload {
                local: archive.path.clone(),
                message: e.to_string(),
            })
    }

    fn synchronize_tree(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let release_path = state.release.path.clone();
        let synced = self.options.synchronized_root();
        state
            .session()?
            .synchronize(&self.options.source, &release_path, &synced)
            .map_err(|e| match e {
                RemoteError::Transfer(message) => GantryError::Upload {
                    local: self.options.source.clone(),
                    message,
                },
                other => self.remote_error(other),
            })
    }

    fn unpack_archive(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let archive = state.archive.clone().ok_or_else(|| {
            GantryError::Archive("no archive produced before unpack".to_string())
        })?;
        let archive_file = archive
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| GantryError::Archive("archive has no file name".to_string()))?;
        let release_path = state.release.path.clone();
        let remote_archive = format!("{}/{}", release_path, archive_file);

        let commands = match self.options.archive_type {
            ArchiveKind::Tar => vec![
                format!("tar xzf {} -C {}", remote_archive, release_path),
                format!("rm {}", remote_archive),
            ],
            ArchiveKind::Zip => vec![
                format!("unzip -q {} -d {}", remote_archive, release_path),
                format!("rm {}", remote_archive),
            ],
        };

        state
            .session()?
            .exec_multiple(&commands)
            .map_err(|e| self.remote_error(e))
    }

    fn update_shared_symlinks(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let release_path = state.release.path.clone();
        for (folder_key, target) in &self.options.share {
            let link_path = format!("{}/{}", release_path, target.symlink);
            let link_target =
                shared_link_target(&self.options.shared_folder, &target.symlink, folder_key);

            state
                .session()?
                .create_symlink(&link_target, &link_path)
                .map_err(|e| self.remote_error(e))?;

            // chmod only when a mode was explicitly configured
            if let Some(mode) = &target.mode {
                state
                    .session()?
                    .chmod(&link_path, mode)
                    .map_err(|e| self.remote_error(e))?;
            }

            self.events.on_event(DeployEvent::SharedLinkUpdated {
                link: link_path,
                target: link_target,
            });
        }
        Ok(())
    }

    fn create_folders(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let release_path = state.release.path.clone();
        for folder in &self.options.create {
            let path = format!("{}/{}", release_path, folder);
            state
                .session()?
                .create_folder(&path)
                .map_err(|e| self.remote_error(e))?;
        }
        Ok(())
    }

    fn make_writable(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let release_path = state.release.path.clone();
        for dir in &self.options.make_writable {
            let path = format!("{}/{}", release_path, dir);
            state
                .session()?
                .chmod(&path, "ug+w")
                .map_err(|e| self.remote_error(e))?;
        }
        Ok(())
    }

    fn make_executable(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let release_path = state.release.path.clone();
        for file in &self.options.make_executable {
            let path = format!("{}/{}", release_path, file);
            state
                .session()?
                .chmod(&path, "ug+x")
                .map_err(|e| self.remote_error(e))?;
        }
        Ok(())
    }

    fn swap_current_link(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let target = current_link_target(&self.options.releases_folder, &state.release.tag);
        let link_path = self.options.current_link_path();
        let tag = state.release.tag.clone();
        state
            .session()?
            .create_symlink(&target, &link_path)
            .map_err(|e| self.remote_error(e))?;
        self.events.on_event(DeployEvent::CurrentSwitched { tag });
        Ok(())
    }

    fn prune_releases(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        let root = self.options.releases_root();
        let keep = self.options.releases_to_keep;
        let deleted = state
            .session()?
            .prune_old_releases(&root, keep)
            .map_err(|e| self.remote_error(e))?;
        if !deleted.is_empty() {
            self.events.on_event(DeployEvent::Pruned {
                deleted: deleted.clone(),
            });
        }
        state.pruned = deleted;
        Ok(())
    }

    fn delete_local_archive(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        if let Some(archive) = state.archive.as_ref() {
            std::fs::remove_file(&archive.path)?;
            self.events.on_event(DeployEvent::LocalArchiveDeleted {
                archive: archive.path.display().to_string(),
            });
        }
        Ok(())
    }

    fn close(&self, state: &mut PipelineState<C::Session>) -> GantryResult<()> {
        state
            .session()?
            .close()
            .map_err(|e| self.remote_error(e))?;
        self.events.on_event(DeployEvent::Closed);
        Ok(())
    }

    fn remote_error(&self, error: RemoteError) -> GantryError {
        match error {
            RemoteError::Connection(message) => GantryError::Connection {
                host: self.options.host.clone(),
                message,
            },
            RemoteError::CommandFailed { command, stderr } => {
                GantryError::RemoteCommand { command, stderr }
            }
            RemoteError::Transfer(message) => GantryError::Upload {
                local: PathBuf::new(),
                message,
            },
        }
    }
}
