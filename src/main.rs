//! iron build CLI
//!
//! Builds the iron UEFI application for x86, x64 or aa64 and runs it in QEMU.
//!
//! # Usage
//!
//! ```bash
//! # Build for x86_64 in release mode and publish to build/EFI/BOOT
//! iron-build build x64 release
//!
//! # Extra compiler and linker flags
//! iron-build build aa64 debug -rf "-C debuginfo=2" -lf "--gc-sections"
//!
//! # Boot the published binary under UEFI firmware
//! iron-build run x64 release
//! ```
//!
//! The exit code is the exit code of the last subprocess (cargo on build, QEMU
//! on run). Unknown action/arch/config values exit with 1 before anything is
//! spawned.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;

use iron_build::config::Layout;
use iron_build::preflight::PreflightChecker;
use iron_build::process::SystemRunner;
use iron_build::{execute, Error, FlagOverride, Request};

#[derive(Parser, Debug)]
#[command(name = "iron-build")]
#[command(version, about = "Build script for iron", long_about = None)]
#[command(override_usage = "iron-build <action> <arch> <config> [options]")]
struct Cli {
    /// The action to perform: build, run
    action: String,

    /// The architecture to build for: x86, x64, aa64
    arch: String,

    /// The configuration to build: test, debug, release, profiling, optimized, debug_optimized
    config: String,

    /// Linker flags, wrapped in -Clink-args= (also -lf)
    #[arg(long = "linkerflags", allow_hyphen_values = true)]
    linker_flags: Option<String>,

    /// Rust compiler flags (also -rf)
    #[arg(long = "rustflags", allow_hyphen_values = true)]
    rust_flags: Option<String>,
}

/// Map the two-letter short options onto their long forms.
///
/// `-lf VALUE` and `-lf=VALUE` are both accepted.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_str().and_then(expand_short).unwrap_or(arg))
        .collect()
}

fn expand_short(arg: &str) -> Option<OsString> {
    const SHORT: &[(&str, &str)] = &[("-lf", "--linkerflags"), ("-rf", "--rustflags")];

    SHORT.iter().find_map(|&(short, long)| {
        if arg == short {
            return Some(OsString::from(long));
        }
        arg.strip_prefix(short)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| OsString::from(format!("{}={}", long, value)))
    })
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => match e.downcast_ref::<Error>() {
            Some(err) if matches!(err, Error::InvalidCombination { .. }) => {
                println!("{}", err);
                err.exit_code()
            }
            Some(err) => {
                eprintln!("Error: {:#}", e);
                err.exit_code()
            }
            None => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let layout = Layout::from_env_or(cwd);

    let request = Request::parse(
        &cli.action,
        &cli.arch,
        &cli.config,
        FlagOverride::new(cli.rust_flags, cli.linker_flags),
        &layout,
    )?;

    let report = PreflightChecker::new(&layout).run_for(&request.descriptor, request.action);
    if !report.is_ok() {
        report.print_summary();
        anyhow::bail!("preflight checks failed");
    }

    execute(&request, &layout, &mut SystemRunner)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_positionals() {
        let cli = parse(&["iron-build", "build", "x64", "release"]);
        assert_eq!(cli.action, "build");
        assert_eq!(cli.arch, "x64");
        assert_eq!(cli.config, "release");
        assert!(cli.linker_flags.is_none());
        assert!(cli.rust_flags.is_none());
    }

    #[test]
    fn test_two_letter_shorts() {
        let cli = parse(&[
            "iron-build", "build", "aa64", "debug", "-lf", "-x", "-rf", "-C opt-level=3",
        ]);
        assert_eq!(cli.linker_flags.as_deref(), Some("-x"));
        assert_eq!(cli.rust_flags.as_deref(), Some("-C opt-level=3"));
    }

    #[test]
    fn test_short_with_equals() {
        let cli = parse(&["iron-build", "build", "x86", "test", "-rf=-Cpanic=abort"]);
        assert_eq!(cli.rust_flags.as_deref(), Some("-Cpanic=abort"));
    }

    #[test]
    fn test_long_flags() {
        let cli = parse(&[
            "iron-build", "build", "x64", "debug", "--linkerflags", "/DEBUG", "--rustflags=-a",
        ]);
        assert_eq!(cli.linker_flags.as_deref(), Some("/DEBUG"));
        assert_eq!(cli.rust_flags.as_deref(), Some("-a"));
    }

    #[test]
    fn test_unknown_values_reach_library() {
        // clap accepts any string; the library rejects it with the choices list
        let cli = parse(&["iron-build", "run", "arm", "debug"]);
        assert_eq!(cli.arch, "arm");
    }
}
