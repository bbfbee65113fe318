//! Compiler/linker flag composition and the hermetic build environment.
//!
//! The overrides are the only source of rustc flags for a build: flag
//! variables inherited from the calling shell are cleared on the child, so
//! identical overrides always yield an identical cargo command.
//!
//! Flags reach cargo through `CARGO_ENCODED_RUSTFLAGS` (0x1f separated) so a
//! multi-word linker value stays inside its one `-Clink-args=` argument.

use crate::config::Layout;
use crate::process::Invocation;

/// Whitespace-split flag variable; cleared on the child.
pub const RUSTFLAGS_ENV: &str = "RUSTFLAGS";

/// Flag variable cargo reads before any other; carries the overrides.
pub const ENCODED_RUSTFLAGS_ENV: &str = "CARGO_ENCODED_RUSTFLAGS";

/// Config-style flag variable; removed from the child.
pub const BUILD_RUSTFLAGS_ENV: &str = "CARGO_BUILD_RUSTFLAGS";

/// Separator between arguments in [`ENCODED_RUSTFLAGS_ENV`].
pub const ENCODED_SEPARATOR: &str = "\x1f";

/// Search path for custom target specifications.
pub const TARGET_PATH_ENV: &str = "RUST_TARGET_PATH";

/// Caller-supplied flags, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverride {
    /// Passed to rustc, split on whitespace.
    pub compiler: Option<String>,
    /// Wrapped whole in a single `-Clink-args=` argument.
    pub linker: Option<String>,
}

impl FlagOverride {
    pub fn new(compiler: Option<String>, linker: Option<String>) -> Self {
        Self { compiler, linker }
    }
}

/// rustc arguments for `overrides`, in order.
///
/// Compiler flags always come first, then the link-args segment. Blank values
/// count as absent.
pub fn rustc_args(overrides: &FlagOverride) -> Vec<String> {
    let mut args: Vec<String> = non_blank(&overrides.compiler)
        .map(|compiler| compiler.split_whitespace().map(String::from).collect())
        .unwrap_or_default();

    if let Some(linker) = non_blank(&overrides.linker) {
        args.push(format!("-Clink-args={}", linker));
    }

    args
}

/// Compose the rustc flag string for `overrides`, for display.
pub fn compose(overrides: &FlagOverride) -> String {
    rustc_args(overrides).join(" ")
}

/// Encode `overrides` for [`ENCODED_RUSTFLAGS_ENV`].
pub fn encode(overrides: &FlagOverride) -> String {
    rustc_args(overrides).join(ENCODED_SEPARATOR)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Apply the hermetic build environment to a toolchain invocation.
///
/// Carries `overrides` in `CARGO_ENCODED_RUSTFLAGS` (possibly empty), clears
/// `RUSTFLAGS`, drops `CARGO_BUILD_RUSTFLAGS` and points `RUST_TARGET_PATH` at
/// the workspace root.
pub fn apply_hermetic_env(
    invocation: Invocation,
    overrides: &FlagOverride,
    layout: &Layout,
) -> Invocation {
    invocation
        .env_remove(BUILD_RUSTFLAGS_ENV)
        .env(RUSTFLAGS_ENV, "")
        .env(ENCODED_RUSTFLAGS_ENV, encode(overrides))
        .env(TARGET_PATH_ENV, layout.root().display().to_string())
}
