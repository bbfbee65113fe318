//! Build and QEMU runner for the iron UEFI application.
//!
//! Resolves an (architecture, configuration) pair into a [`TargetDescriptor`],
//! drives cargo with a hermetic flag environment, publishes the binary into a
//! UEFI boot-media layout and boots it under QEMU.

use std::time::Instant;

pub mod artifact;
pub mod config;
pub mod error;
pub mod flags;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod qemu;
pub mod target;
pub mod toolchain;

pub use error::{Error, Result};
pub use flags::FlagOverride;
pub use pipeline::{execute, Action, Request};
pub use target::{Architecture, BuildConfiguration, TargetDescriptor};

/// Wall-clock timer for a pipeline step.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Print the elapsed time.
    pub fn finish(self) {
        let secs = self.start.elapsed().as_secs_f64();
        if secs >= 60.0 {
            println!("  [{}] {:.1}m", self.label, secs / 60.0);
        } else {
            println!("  [{}] {:.1}s", self.label, secs);
        }
    }
}
