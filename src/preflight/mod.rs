//! Preflight checks for iron build and run prerequisites.
//!
//! Validates what an action needs BEFORE any subprocess is spawned, so a
//! missing tool or firmware image is reported with a fix instead of a
//! cryptic spawn or QEMU error.
//!
//! # Checks Performed
//!
//! - **Host tools**: `cargo` for build, the architecture's `qemu-system-*` for run
//! - **Firmware**: OVMF code/vars (x86, x64) or the BIOS image (aa64), run only
//!
//! # Usage
//!
//! ```rust,ignore
//! use iron_build::preflight::PreflightChecker;
//!
//! let report = PreflightChecker::new(&layout).run_for(&descriptor, action);
//! if !report.is_ok() {
//!     report.print_summary();
//!     std::process::exit(1);
//! }
//! ```

mod firmware;
mod host_tools;

pub use firmware::check_firmware;
pub use host_tools::check_host_tools;

use std::ffi::OsString;

use crate::config::Layout;
use crate::pipeline::Action;
use crate::target::TargetDescriptor;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Create a failing check result.
    pub fn fail(
        name: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

/// All checks run for one invocation.
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Check if all preflight checks passed.
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Get all failing checks.
    pub fn errors(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Print a summary of the preflight checks.
    pub fn print_summary(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let status = if check.passed { "[OK]" } else { "[FAIL]" };
            println!("{} {}: {}", status, check.name, check.message);
            if let Some(suggestion) = &check.suggestion {
                println!("     Suggestion: {}", suggestion);
            }
        }

        println!();
        if self.is_ok() {
            println!("All preflight checks passed ({}/{})", self.passed_count(), self.checks.len());
        } else {
            println!(
                "Preflight checks failed: {} of {} passed",
                self.passed_count(),
                self.checks.len()
            );
            for check in self.errors() {
                println!("  - {}", check.name);
            }
        }
    }
}

/// Preflight checker for one workspace.
pub struct PreflightChecker<'a> {
    layout: &'a Layout,
    search_path: Option<OsString>,
}

impl<'a> PreflightChecker<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            search_path: None,
        }
    }

    /// Look tools up in `paths` instead of `$PATH`.
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    /// Run the checks `action` needs for `descriptor`.
    pub fn run_for(&self, descriptor: &TargetDescriptor, action: Action) -> PreflightReport {
        let mut report = PreflightReport::default();

        report.checks.extend(check_host_tools(
            descriptor,
            action,
            self.search_path.as_deref(),
        ));

        if action == Action::Run {
            report.checks.extend(check_firmware(descriptor, self.layout));
        }

        report
    }
}
