//! Hook & middleware execution
//!
//! Two extensibility kinds run at fixed pipeline checkpoints: a hook (a
//! function over the read-only context) and a command-list middleware
//! (static, or derived from the context exactly once per phase). Each
//! phase pairs one hook with one middleware, back to back; command
//! execution is strictly sequential and stops at the first failure.

use crate::domain::ports::DeployEvent;
use crate::error::{GantryError, GantryResult};

use super::context::HookContext;

/// A user hook. Returning Err aborts the pipeline at this checkpoint.
pub type Hook = Box<dyn Fn(&mut HookContext) -> Result<(), String>>;

/// Pipeline checkpoints that accept hooks and middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    BeforeDeploy,
    BeforeLink,
    AfterDeploy,
}

impl HookPhase {
    pub fn name(self) -> &'static str {
        match self {
            Self::BeforeDeploy => "before-deploy",
            Self::BeforeLink => "before-link",
            Self::AfterDeploy => "after-deploy",
        }
    }
}

/// Command-list middleware: a fixed list, or a function of the context.
///
/// Dynamic lists are resolved exactly once per phase, at execution time,
/// with the release already in context.
pub enum CommandList {
    Static(Vec<String>),
    Dynamic(Box<dyn Fn(&HookContext) -> Vec<String>>),
}

impl CommandList {
    fn resolve(&self, ctx: &HookContext) -> Vec<String> {
        match self {
            Self::Static(commands) => commands.clone(),
            Self::Dynamic(f) => f(ctx),
        }
    }
}

/// The six extension slots of a pipeline run.
#[derive(Default)]
pub struct HookSet {
    before_deploy: Option<Hook>,
    before_deploy_execute: Option<CommandList>,
    before_link: Option<Hook>,
    before_link_execute: Option<CommandList>,
    after_deploy: Option<Hook>,
    after_deploy_execute: Option<CommandList>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_deploy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HookContext) -> Result<(), String> + 'static,
    {
        self.before_deploy = Some(Box::new(hook));
        self
    }

    pub fn on_before_deploy_execute(mut self, commands: CommandList) -> Self {
        self.before_deploy_execute = Some(commands);
        self
    }

    pub fn on_before_link<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HookContext) -> Result<(), String> + 'static,
    {
        self.before_link = Some(Box::new(hook));
        self
    }

    pub fn on_before_link_execute(mut self, commands: CommandList) -> Self {
        self.before_link_execute = Some(commands);
        self
    }

    pub fn on_after_deploy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HookContext) -> Result<(), String> + 'static,
    {
        self.after_deploy = Some(Box::new(hook));
        self
    }

    pub fn on_after_deploy_execute(mut self, commands: CommandList) -> Self {
        self.after_deploy_execute = Some(commands);
        self
    }

    pub fn hook(&self, phase: HookPhase) -> Option<&Hook> {
        match phase {
            HookPhase::BeforeDeploy => self.before_deploy.as_ref(),
            HookPhase::BeforeLink => self.before_link.as_ref(),
            HookPhase::AfterDeploy => self.after_deploy.as_ref(),
        }
    }

    pub fn commands(&self, phase: HookPhase) -> Option<&CommandList> {
        match phase {
            HookPhase::BeforeDeploy => self.before_deploy_execute.as_ref(),
            HookPhase::BeforeLink => self.before_link_execute.as_ref(),
            HookPhase::AfterDeploy => self.after_deploy_execute.as_ref(),
        }
    }

    /// Run the hook registered for `phase`, if any.
    pub fn run_hook(&self, phase: HookPhase, ctx: &mut HookContext) -> GantryResult<()> {
        if let Some(hook) = self.hook(phase) {
            hook(ctx).map_err(|message| GantryError::Hook {
                phase: phase.name().to_string(),
                message,
            })?;
        }
        Ok(())
    }

    /// Resolve and execute the middleware registered for `phase`, if any.
    ///
    /// An empty resolved list issues zero remote calls and zero events.
    pub fn run_commands(&self, phase: HookPhase, ctx: &mut HookContext) -> GantryResult<()> {
        let Some(list) = self.commands(phase) else {
            return Ok(());
        };

        let commands = list.resolve(ctx);
        for command in commands {
            ctx.remote()
                .exec(&command)
                .map_err(|e| GantryError::RemoteCommand {
                    command: command.clone(),
                    stderr: e.to_string(),
                })?;
            if ctx.events().wants_detailed_events() {
                ctx.events()
                    .on_event(DeployEvent::CommandExecuted { command });
            }
        }
        Ok(())
    }
}
