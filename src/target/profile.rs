//! Build configurations and how each one drives cargo.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How cargo is invoked for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainMode {
    /// `cargo test`
    Test,
    /// `cargo build`
    Build,
    /// `cargo build --release`
    Release,
    /// `cargo build --profile=<name>`
    Profile(&'static str),
}

impl ToolchainMode {
    /// Leading cargo arguments (subcommand plus profile selection).
    pub fn cargo_args(self) -> Vec<String> {
        match self {
            ToolchainMode::Test => vec!["test".into()],
            ToolchainMode::Build => vec!["build".into()],
            ToolchainMode::Release => vec!["build".into(), "--release".into()],
            ToolchainMode::Profile(name) => vec!["build".into(), format!("--profile={name}")],
        }
    }
}

/// Build configuration selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildConfiguration {
    Test,
    Debug,
    Release,
    Profiling,
    Optimized,
    DebugOptimized,
}

impl BuildConfiguration {
    /// Every configuration, in CLI order.
    pub const ALL: [BuildConfiguration; 6] = [
        BuildConfiguration::Test,
        BuildConfiguration::Debug,
        BuildConfiguration::Release,
        BuildConfiguration::Profiling,
        BuildConfiguration::Optimized,
        BuildConfiguration::DebugOptimized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildConfiguration::Test => "test",
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
            BuildConfiguration::Profiling => "profiling",
            BuildConfiguration::Optimized => "optimized",
            BuildConfiguration::DebugOptimized => "debug_optimized",
        }
    }

    /// Subdirectory of `target/<triple>/` cargo writes to.
    pub fn output_subdir(self) -> &'static str {
        match self {
            BuildConfiguration::Test | BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
            BuildConfiguration::Profiling => "profiling",
            BuildConfiguration::Optimized => "lto-release",
            BuildConfiguration::DebugOptimized => "lto-debug",
        }
    }

    pub fn toolchain_mode(self) -> ToolchainMode {
        match self {
            BuildConfiguration::Test => ToolchainMode::Test,
            BuildConfiguration::Debug => ToolchainMode::Build,
            BuildConfiguration::Release => ToolchainMode::Release,
            BuildConfiguration::Profiling => ToolchainMode::Profile("profiling"),
            BuildConfiguration::Optimized => ToolchainMode::Profile("lto-release"),
            BuildConfiguration::DebugOptimized => ToolchainMode::Profile("lto-debug"),
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildConfiguration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::InvalidCombination {
                kind: "configuration",
                value: s.to_string(),
                supported: Self::ALL.iter().map(|c| c.name()).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_subdirs() {
        let table: Vec<_> = BuildConfiguration::ALL
            .iter()
            .map(|c| (c.name(), c.output_subdir()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("test", "debug"),
                ("debug", "debug"),
                ("release", "release"),
                ("profiling", "profiling"),
                ("optimized", "lto-release"),
                ("debug_optimized", "lto-debug"),
            ]
        );
    }

    #[test]
    fn test_test_and_debug_differ_only_in_mode() {
        let test = BuildConfiguration::Test;
        let debug = BuildConfiguration::Debug;
        assert_eq!(test.output_subdir(), debug.output_subdir());
        assert_eq!(test.toolchain_mode().cargo_args(), vec!["test"]);
        assert_eq!(debug.toolchain_mode().cargo_args(), vec!["build"]);
    }

    #[test]
    fn test_profile_args() {
        assert_eq!(
            BuildConfiguration::Release.toolchain_mode().cargo_args(),
            vec!["build", "--release"]
        );
        assert_eq!(
            BuildConfiguration::Optimized.toolchain_mode().cargo_args(),
            vec!["build", "--profile=lto-release"]
        );
        assert_eq!(
            BuildConfiguration::DebugOptimized.toolchain_mode().cargo_args(),
            vec!["build", "--profile=lto-debug"]
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "fast".parse::<BuildConfiguration>().unwrap_err();
        assert!(err.to_string().contains("Unknown configuration 'fast'"));
        assert!(err.to_string().contains("debug_optimized"));
    }
}
