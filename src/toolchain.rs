//! Cargo invocation for the iron package.

use crate::config::{Layout, PACKAGE};
use crate::error::{Error, Result};
use crate::flags::{apply_hermetic_env, compose, FlagOverride};
use crate::process::{Invocation, Runner};
use crate::target::TargetDescriptor;

/// The cargo invocation that builds (or tests) `descriptor`.
///
/// Runs from the workspace root with the hermetic flag environment applied.
pub fn build_invocation(
    descriptor: &TargetDescriptor,
    overrides: &FlagOverride,
    layout: &Layout,
) -> Invocation {
    let invocation = Invocation::new("cargo")
        .args(descriptor.toolchain_mode().cargo_args())
        .args(["--target", descriptor.target_triple()])
        .args(["--package", PACKAGE])
        .current_dir(layout.root());

    apply_hermetic_env(invocation, overrides, layout)
}

/// Run cargo for `descriptor` and wait for it to finish.
pub fn build(
    descriptor: &TargetDescriptor,
    overrides: &FlagOverride,
    layout: &Layout,
    runner: &mut dyn Runner,
) -> Result<()> {
    let invocation = build_invocation(descriptor, overrides, layout);

    println!("Building {} ({})...", PACKAGE, descriptor.config());
    println!("  Target:  {}", descriptor.target_triple());
    println!("  Output:  {}", descriptor.build_output_dir().display());
    println!("  Flags:   {}", compose(overrides));
    println!("  Command: {}", invocation);

    let code = runner.run(&invocation)?;
    if code != 0 {
        return Err(Error::ToolchainFailure { code });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use crate::target::{Architecture, BuildConfiguration};

    fn invocation(config: BuildConfiguration, overrides: &FlagOverride) -> Invocation {
        let layout = Layout::new("/ws");
        let d = TargetDescriptor::resolve(Architecture::X64, config, &layout);
        build_invocation(&d, overrides, &layout)
    }

    #[test]
    fn test_release_command() {
        let inv = invocation(BuildConfiguration::Release, &FlagOverride::default());
        assert_eq!(inv.program(), "cargo");
        assert_eq!(
            inv.get_args(),
            &[
                "build",
                "--release",
                "--target",
                "x86_64-unknown-uefi",
                "--package",
                "iron"
            ]
        );
        assert_eq!(inv.get_current_dir(), Some(std::path::Path::new("/ws")));
    }

    #[test]
    fn test_test_config_runs_cargo_test() {
        let inv = invocation(BuildConfiguration::Test, &FlagOverride::default());
        assert_eq!(inv.get_args()[0], "test");
    }

    #[test]
    fn test_profile_configs() {
        let inv = invocation(BuildConfiguration::Profiling, &FlagOverride::default());
        assert_eq!(&inv.get_args()[..2], &["build", "--profile=profiling"]);
    }

    #[test]
    fn test_flags_reach_child_env() {
        let overrides = FlagOverride::new(Some("-a".into()), Some("-x".into()));
        let inv = invocation(BuildConfiguration::Debug, &overrides);
        assert_eq!(
            inv.env_value("CARGO_ENCODED_RUSTFLAGS"),
            Some("-a\x1f-Clink-args=-x")
        );
        assert_eq!(inv.env_value("RUSTFLAGS"), Some(""));
        assert_eq!(inv.env_value("RUST_TARGET_PATH"), Some("/ws"));
    }

    #[test]
    fn test_identical_overrides_identical_commands() {
        let overrides = FlagOverride::new(Some("-Copt-level=s".into()), None);
        assert_eq!(
            invocation(BuildConfiguration::Optimized, &overrides),
            invocation(BuildConfiguration::Optimized, &overrides)
        );
    }

    #[test]
    fn test_failure_carries_exit_code() {
        let layout = Layout::new("/ws");
        let d = TargetDescriptor::resolve(Architecture::Aa64, BuildConfiguration::Debug, &layout);
        let mut runner = RecordingRunner::exiting_with(101);

        let err = build(&d, &FlagOverride::default(), &layout, &mut runner).unwrap_err();
        assert!(matches!(err, Error::ToolchainFailure { code: 101 }));
        assert_eq!(runner.calls.len(), 1);
    }
}
