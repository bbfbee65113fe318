//! Host tool validation.
//!
//! Checks that the external programs an action spawns are on `PATH` and
//! executable.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::CheckResult;
use crate::pipeline::Action;
use crate::target::TargetDescriptor;

/// Check the tools `action` will spawn for `descriptor`.
///
/// `search_path` replaces `$PATH` when given.
pub fn check_host_tools(
    descriptor: &TargetDescriptor,
    action: Action,
    search_path: Option<&OsStr>,
) -> Vec<CheckResult> {
    match action {
        Action::Build => vec![check_tool(
            "cargo",
            "Build the iron package",
            "Install a Rust toolchain: https://rustup.rs",
            search_path,
        )],
        Action::Run => vec![check_tool(
            descriptor.emulator(),
            "Emulate the target machine",
            "Install QEMU: sudo dnf install qemu-system (or your distro's qemu-system package)",
            search_path,
        )],
    }
}

fn locate(tool: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    match search_path {
        Some(paths) => which::which_in(tool, Some(paths), Path::new(".")).ok(),
        None => which::which(tool).ok(),
    }
}

fn check_tool(
    tool: &str,
    purpose: &str,
    install_cmd: &str,
    search_path: Option<&OsStr>,
) -> CheckResult {
    match locate(tool, search_path) {
        Some(path) => CheckResult::pass(
            format!("{} tool", tool),
            format!("Found at {} ({})", path.display(), purpose),
        ),
        None => CheckResult::fail(
            format!("{} tool", tool),
            format!("Not found (needed for: {})", purpose),
            install_cmd,
        ),
    }
}
