//! `gantry deploy` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::{DeployUseCase, HookSet};
use crate::config;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{archiver_for, JsonEventSink, SshConnector};
use crate::state::DeployLock;
use crate::ui::ConsoleEventSink;

pub fn run(config_path: &Path, json: bool, verbose: u8) -> Result<()> {
    let (options, warnings) = config::load_options(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if !json {
        for warning in &warnings {
            eprintln!(
                "warning: unknown configuration key '{}' in {}",
                warning.key,
                warning.file.display()
            );
        }
    }

    let _lock = DeployLock::acquire(Path::new("."))?;

    let sink: Box<dyn DeployEventSink> = if json {
        Box::new(JsonEventSink)
    } else {
        Box::new(ConsoleEventSink::new(verbose > 0 || options.debug))
    };

    let connector = SshConnector::new(options.host.clone());
    let archiver = archiver_for(options.archive_type);
    let use_case = DeployUseCase::new(options, HookSet::new(), connector, archiver, sink);

    let report = use_case.execute()?;

    if !json {
        println!(
            "\nRelease {} is live ({} pruned)",
            report.release.tag,
            report.pruned_count()
        );
    }

    Ok(())
}
