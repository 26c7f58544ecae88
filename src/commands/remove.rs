//! `gantry remove` command

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::application::RemoveUseCase;
use crate::config;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{JsonEventSink, SshConnector};
use crate::state::DeployLock;
use crate::ui::ConsoleEventSink;

pub fn run(config_path: &Path, json: bool, verbose: u8, yes: bool) -> Result<()> {
    let (options, _warnings) = config::load_options(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if !yes {
        bail!(
            "this deletes {} on {} entirely; re-run with --yes to confirm",
            options.deploy_path,
            options.host
        );
    }

    let _lock = DeployLock::acquire(Path::new("."))?;

    let sink: Box<dyn DeployEventSink> = if json {
        Box::new(JsonEventSink)
    } else {
        Box::new(ConsoleEventSink::new(verbose > 0 || options.debug))
    };

    let host = options.host.clone();
    let deploy_path = options.deploy_path.clone();
    let connector = SshConnector::new(host.clone());
    let use_case = RemoveUseCase::new(options, connector, sink);

    use_case.execute()?;

    if !json {
        println!("Removed {} from {}", deploy_path, host);
    }

    Ok(())
}
