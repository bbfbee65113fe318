//! The build/run pipeline.
//!
//! One invocation resolves its target once and then runs a straight line of
//! blocking steps. Any failure aborts the rest:
//!
//! - `build`: cargo -> publish to `build/EFI/BOOT`
//! - `run`: QEMU

use std::fmt;
use std::str::FromStr;

use crate::artifact;
use crate::config::Layout;
use crate::error::{Error, Result};
use crate::flags::FlagOverride;
use crate::process::Runner;
use crate::qemu;
use crate::target::{resolve_names, TargetDescriptor};
use crate::toolchain;
use crate::Timer;

/// What the invocation does with the resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    Run,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Build, Action::Run];

    pub fn name(self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::Run => "run",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| Error::InvalidCombination {
                kind: "action",
                value: s.to_string(),
                supported: Self::ALL.iter().map(|a| a.name()).collect(),
            })
    }
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: Action,
    pub descriptor: TargetDescriptor,
    pub overrides: FlagOverride,
}

impl Request {
    /// Validate command-line names: action, then architecture, then configuration.
    pub fn parse(
        action: &str,
        arch: &str,
        config: &str,
        overrides: FlagOverride,
        layout: &Layout,
    ) -> Result<Self> {
        let action: Action = action.parse()?;
        let descriptor = resolve_names(arch, config, layout)?;
        Ok(Self {
            action,
            descriptor,
            overrides,
        })
    }
}

/// Execute `request`, spawning every subprocess through `runner`.
pub fn execute(request: &Request, layout: &Layout, runner: &mut dyn Runner) -> Result<()> {
    let descriptor = &request.descriptor;

    match request.action {
        Action::Build => {
            println!(
                "=== Building iron ({} {}) ===\n",
                descriptor.arch(),
                descriptor.config()
            );

            let t = Timer::start("Toolchain");
            toolchain::build(descriptor, &request.overrides, layout, runner)?;
            t.finish();

            println!("\nPublishing to boot media...");
            artifact::publish(&descriptor.artifact_path(), descriptor, layout)?;

            println!("\nNext: iron-build run {} {}", descriptor.arch(), descriptor.config());
        }
        Action::Run => {
            println!(
                "=== Running iron ({} {}) ===\n",
                descriptor.arch(),
                descriptor.config()
            );

            let t = Timer::start("QEMU");
            let result = qemu::launch(descriptor, runner);
            t.finish();
            result?;
        }
    }

    Ok(())
}
