//! Error types for the iron build pipeline.

use std::path::PathBuf;

/// Errors that can abort an invocation.
///
/// Every variant is fatal: the pipeline never retries and never continues
/// past a failed step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An action, architecture or configuration outside its supported set.
    #[error("Unknown {kind} '{value}'\nSupported {kind}s: {}", .supported.join(", "))]
    InvalidCombination {
        /// Which input was rejected ("action", "architecture", "configuration").
        kind: &'static str,
        /// The value as given on the command line.
        value: String,
        /// Every accepted value, in table order.
        supported: Vec<&'static str>,
    },

    /// The toolchain exited non-zero.
    #[error("toolchain failed with exit code {code}")]
    ToolchainFailure {
        /// Exit code of the toolchain process.
        code: i32,
    },

    /// The toolchain succeeded but left no binary where one was expected.
    #[error("build artifact not found at {}", .path.display())]
    MissingArtifact {
        /// Expected toolchain output.
        path: PathBuf,
    },

    /// The emulator exited non-zero.
    #[error("emulator exited with code {code}")]
    EmulatorFailure {
        /// Exit code of the emulator process.
        code: i32,
    },

    /// A firmware image required by the architecture is absent.
    #[error("firmware image not found at {}", .path.display())]
    MissingFirmware {
        /// Expected firmware image.
        path: PathBuf,
    },

    /// An external process could not be started at all.
    #[error("failed to run {program}. Is it installed?")]
    Spawn {
        /// Program that failed to spawn.
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error while publishing.
    #[error("I/O error at {}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code for this failure.
    ///
    /// Subprocess failures propagate the subprocess's own code verbatim.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolchainFailure { code } | Error::EmulatorFailure { code } => *code,
            _ => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
