//! Console event sink
//!
//! Line-oriented progress output. Color is applied only when stdout is a
//! terminal and GANTRY_NO_COLOR is unset; stage-level chatter appears
//! only in verbose mode.

use crossterm::style::{style, Color, Stylize};
use is_terminal::IsTerminal;

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct ConsoleEventSink {
    color: bool,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn new(verbose: bool) -> Self {
        let color =
            std::io::stdout().is_terminal() && std::env::var_os("GANTRY_NO_COLOR").is_none();
        Self { color, verbose }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Connected { host } => {
                println!("{} {}", self.paint("→", Color::Cyan), host);
            }
            DeployEvent::StageStarted { stage } => {
                if self.verbose {
                    println!("  … {}", stage);
                }
            }
            DeployEvent::StageCompleted { stage } => {
                if self.verbose {
                    println!("  {} {}", self.paint("✓", Color::Green), stage);
                }
            }
            DeployEvent::Compressed {
                archive,
                size,
                digest,
            } => {
                println!(
                    "{} {} ({}, {})",
                    self.paint("✓", Color::Green),
                    archive,
                    size,
                    digest
                );
            }
            DeployEvent::ReleaseCreated { tag, path } => {
                println!("{} release {} at {}", self.paint("✓", Color::Green), tag, path);
            }
            DeployEvent::CommandExecuted { command } => {
                if self.verbose {
                    println!("  $ {}", command);
                }
            }
            DeployEvent::SharedLinkUpdated { link, target } => {
                if self.verbose {
                    println!("  {} {} -> {}", self.paint("↪", Color::Cyan), link, target);
                }
            }
            DeployEvent::CurrentSwitched { tag } => {
                println!("{} current -> {}", self.paint("✓", Color::Green), tag);
            }
            DeployEvent::Pruned { deleted } => {
                println!(
                    "{} pruned {} old release(s): {}",
                    self.paint("✓", Color::Green),
                    deleted.len(),
                    deleted.join(", ")
                );
            }
            DeployEvent::LocalArchiveDeleted { archive } => {
                if self.verbose {
                    println!("  removed {}", archive);
                }
            }
            DeployEvent::Closed => {
                if self.verbose {
                    println!("  connection closed");
                }
            }
            DeployEvent::Completed { tag } => {
                println!("{} deployed {}", self.paint("✓", Color::Green), tag);
            }
            DeployEvent::Failed { stage, error } => {
                eprintln!("{} {} failed: {}", self.paint("✗", Color::Red), stage, error);
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
