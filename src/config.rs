//! Workspace layout and fixed build constants.
//!
//! Every path the pipeline touches is derived from a single workspace root:
//!
//! ```text
//! <root>/
//!   qemu_boot/                      firmware images (OVMF / BIOS)
//!   target/<triple>/<subdir>/       toolchain output
//!   build/                          boot-media directory mounted by QEMU
//!     EFI/BOOT/<boot file>
//!     startup.nsh
//! ```
//!
//! # Example
//!
//! ```rust
//! use iron_build::config::Layout;
//!
//! let layout = Layout::new("/work/iron");
//! assert!(layout.boot_dir().ends_with("build/EFI/BOOT"));
//! ```

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the workspace root.
pub const WORKSPACE_ENV: &str = "IRON_WORKSPACE";

/// Memory handed to the emulated machine.
pub const QEMU_SYSTEM_MEMORY: &str = "256M";

/// Directory (under the workspace) holding firmware images.
pub const QEMU_BOOT_MEDIA_DIR: &str = "qemu_boot";

/// Boot-media directory (under the workspace) mounted as a FAT drive.
pub const BUILD_DIR: &str = "build";

/// Cargo package built by the toolchain step.
pub const PACKAGE: &str = "iron";

/// File the toolchain produces for [`PACKAGE`].
pub const ARTIFACT_FILENAME: &str = "iron.efi";

/// UEFI shell script run automatically at boot.
pub const STARTUP_SCRIPT: &str = "startup.nsh";

/// Suffix appended to the firmware-interface arch name to form the triple.
pub const TARGET_SUFFIX: &str = "-unknown-uefi";

/// Prefix of every emulator binary name.
pub const QEMU_PREFIX: &str = "qemu-system-";

/// Filesystem layout of one iron workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at `$IRON_WORKSPACE`, or at `fallback` when unset or empty.
    pub fn from_env_or(fallback: impl Into<PathBuf>) -> Self {
        match env::var_os(WORKSPACE_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::new(fallback),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Boot-media root (`build/`).
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// Canonical UEFI removable-media directory (`build/EFI/BOOT`).
    pub fn boot_dir(&self) -> PathBuf {
        self.build_dir().join("EFI").join("BOOT")
    }

    /// Location of the startup script.
    pub fn startup_script(&self) -> PathBuf {
        self.build_dir().join(STARTUP_SCRIPT)
    }

    /// Directory holding firmware images.
    pub fn firmware_dir(&self) -> PathBuf {
        self.root.join(QEMU_BOOT_MEDIA_DIR)
    }

    /// Cargo output directory for a triple and profile subdirectory.
    pub fn cargo_output_dir(&self, triple: &str, subdir: &str) -> PathBuf {
        self.root.join("target").join(triple).join(subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/ws");
        assert_eq!(layout.build_dir(), PathBuf::from("/ws/build"));
        assert_eq!(layout.boot_dir(), PathBuf::from("/ws/build/EFI/BOOT"));
        assert_eq!(layout.startup_script(), PathBuf::from("/ws/build/startup.nsh"));
        assert_eq!(layout.firmware_dir(), PathBuf::from("/ws/qemu_boot"));
        assert_eq!(
            layout.cargo_output_dir("x86_64-unknown-uefi", "release"),
            PathBuf::from("/ws/target/x86_64-unknown-uefi/release")
        );
    }

    #[test]
    fn test_memory_is_fixed() {
        assert_eq!(QEMU_SYSTEM_MEMORY, "256M");
    }
}
