//! External process invocation.
//!
//! Every subprocess the pipeline starts (cargo, QEMU) is first described as an
//! [`Invocation`] and then handed to a [`Runner`]. The invocation is plain data,
//! so the exact command line and environment can be printed and inspected
//! before anything is spawned.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::error::{Error, Result};

/// One change applied to the child's inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Set(String, String),
    Remove(String),
}

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    env: Vec<EnvChange>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvChange::Set(key.into(), value.into()));
        self
    }

    pub fn env_remove(mut self, key: impl Into<String>) -> Self {
        self.env.push(EnvChange::Remove(key.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_env(&self) -> &[EnvChange] {
        &self.env
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Value the child will see for `key`, if this invocation sets it.
    ///
    /// Later changes win over earlier ones.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env.iter().rev().find_map(|change| match change {
            EnvChange::Set(k, v) if k == key => Some(Some(v.as_str())),
            EnvChange::Remove(k) if k == key => Some(None),
            _ => None,
        })?
    }

    /// Build the `std::process::Command` for this invocation.
    ///
    /// stdio is inherited so the child owns the controlling terminal.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for change in &self.env {
            match change {
                EnvChange::Set(k, v) => {
                    cmd.env(k, v);
                }
                EnvChange::Remove(k) => {
                    cmd.env_remove(k);
                }
            }
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.env {
            if let EnvChange::Set(k, v) = change {
                write!(f, "{}={:?} ", k, v)?;
            }
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs an invocation to completion.
pub trait Runner {
    /// Spawn `invocation`, block until it exits, and return its exit code.
    fn run(&mut self, invocation: &Invocation) -> Result<i32>;
}

/// Runner backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32> {
        let status = invocation
            .to_command()
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;
        Ok(exit_code(status))
    }
}

/// Exit code of a finished process, using the shell convention for signals.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Runner that records invocations instead of spawning them.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub calls: Vec<Invocation>,
        pub exit_code: i32,
    }

    impl RecordingRunner {
        pub fn exiting_with(exit_code: i32) -> Self {
            Self {
                calls: Vec::new(),
                exit_code,
            }
        }
    }

    impl Runner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation) -> Result<i32> {
            self.calls.push(invocation.clone());
            Ok(self.exit_code)
        }
    }
}
