//! Resolution of an (architecture, configuration) pair into everything the
//! toolchain and emulator steps need.

use std::path::{Path, PathBuf};

use super::{Architecture, BuildConfiguration, ToolchainMode};
use crate::config::{Layout, ARTIFACT_FILENAME, QEMU_PREFIX, TARGET_SUFFIX};
use crate::error::Result;
use crate::qemu;

/// Fully resolved target. Built once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    arch: Architecture,
    config: BuildConfiguration,
    target_triple: String,
    build_output_dir: PathBuf,
    emulator: String,
    emulator_args: Vec<String>,
}

impl TargetDescriptor {
    /// Resolve `arch` and `config` against a workspace layout.
    ///
    /// Pure: identical inputs always produce identical descriptors.
    pub fn resolve(arch: Architecture, config: BuildConfiguration, layout: &Layout) -> Self {
        let target_triple = format!("{}{}", arch.uefi_arch(), TARGET_SUFFIX);
        let build_output_dir = layout.cargo_output_dir(&target_triple, config.output_subdir());

        Self {
            arch,
            config,
            emulator: format!("{}{}", QEMU_PREFIX, arch.qemu_arch()),
            emulator_args: qemu::emulator_args(arch, layout),
            target_triple,
            build_output_dir,
        }
    }

    pub fn arch(&self) -> Architecture {
        self.arch
    }

    pub fn config(&self) -> BuildConfiguration {
        self.config
    }

    /// e.g. `x86_64-unknown-uefi`
    pub fn target_triple(&self) -> &str {
        &self.target_triple
    }

    /// Directory cargo writes this target's output to.
    pub fn build_output_dir(&self) -> &Path {
        &self.build_output_dir
    }

    /// Where the toolchain leaves the binary to publish.
    pub fn artifact_path(&self) -> PathBuf {
        self.build_output_dir.join(ARTIFACT_FILENAME)
    }

    pub fn toolchain_mode(&self) -> ToolchainMode {
        self.config.toolchain_mode()
    }

    /// Emulator binary, e.g. `qemu-system-x86_64`.
    pub fn emulator(&self) -> &str {
        &self.emulator
    }

    /// Emulator arguments in the order they must be passed.
    pub fn emulator_args(&self) -> &[String] {
        &self.emulator_args
    }

    pub fn boot_file(&self) -> &'static str {
        self.arch.boot_file()
    }

    /// Firmware images the emulator will load for this target.
    pub fn firmware_paths(&self, layout: &Layout) -> Vec<PathBuf> {
        let dir = layout.firmware_dir();
        self.arch
            .firmware()
            .files()
            .into_iter()
            .map(|file| dir.join(file))
            .collect()
    }
}

/// Resolve command-line names, rejecting anything outside the supported sets.
///
/// The architecture is validated before the configuration.
pub fn resolve_names(arch: &str, config: &str, layout: &Layout) -> Result<TargetDescriptor> {
    let arch: Architecture = arch.parse()?;
    let config: BuildConfiguration = config.parse()?;
    Ok(TargetDescriptor::resolve(arch, config, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn layout() -> Layout {
        Layout::new("/ws")
    }

    #[test]
    fn test_all_pairs_resolve() {
        let expected_subdir = |c: BuildConfiguration| match c {
            BuildConfiguration::Test | BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
            BuildConfiguration::Profiling => "profiling",
            BuildConfiguration::Optimized => "lto-release",
            BuildConfiguration::DebugOptimized => "lto-debug",
        };

        let mut count = 0;
        for arch in Architecture::ALL {
            for config in BuildConfiguration::ALL {
                let d = TargetDescriptor::resolve(arch, config, &layout());
                let triple = format!("{}-unknown-uefi", arch.uefi_arch());
                assert_eq!(d.target_triple(), triple);
                assert_eq!(
                    d.build_output_dir(),
                    Path::new("/ws/target").join(&triple).join(expected_subdir(config))
                );
                assert_eq!(d.emulator(), format!("qemu-system-{}", arch.qemu_arch()));
                assert!(!d.emulator_args().is_empty());
                count += 1;
            }
        }
        assert_eq!(count, 18);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = TargetDescriptor::resolve(Architecture::Aa64, BuildConfiguration::Profiling, &layout());
        let b = TargetDescriptor::resolve(Architecture::Aa64, BuildConfiguration::Profiling, &layout());
        assert_eq!(a, b);
    }

    #[test]
    fn test_triples() {
        let triple = |arch| {
            TargetDescriptor::resolve(arch, BuildConfiguration::Debug, &layout())
                .target_triple()
                .to_string()
        };
        assert_eq!(triple(Architecture::X86), "i686-unknown-uefi");
        assert_eq!(triple(Architecture::X64), "x86_64-unknown-uefi");
        assert_eq!(triple(Architecture::Aa64), "aarch64-unknown-uefi");
    }

    #[test]
    fn test_artifact_path() {
        let d = TargetDescriptor::resolve(Architecture::X64, BuildConfiguration::Release, &layout());
        assert_eq!(
            d.artifact_path(),
            PathBuf::from("/ws/target/x86_64-unknown-uefi/release/iron.efi")
        );
        assert_eq!(d.boot_file(), "BOOTX64.EFI");
    }

    #[test]
    fn test_firmware_paths() {
        let x86 = TargetDescriptor::resolve(Architecture::X86, BuildConfiguration::Debug, &layout());
        assert_eq!(
            x86.firmware_paths(&layout()),
            vec![
                PathBuf::from("/ws/qemu_boot/edk2-i386-code.fd"),
                PathBuf::from("/ws/qemu_boot/edk2-i386-vars.fd"),
            ]
        );
        let aa64 = TargetDescriptor::resolve(Architecture::Aa64, BuildConfiguration::Debug, &layout());
        assert_eq!(
            aa64.firmware_paths(&layout()),
            vec![PathBuf::from("/ws/qemu_boot/QEMU_EFI_aarch64.fd")]
        );
    }

    #[test]
    fn test_resolve_names_rejects_unknown() {
        let err = resolve_names("arm", "debug", &layout()).unwrap_err();
        assert!(matches!(err, Error::InvalidCombination { kind: "architecture", .. }));

        let err = resolve_names("x64", "fast", &layout()).unwrap_err();
        assert!(matches!(err, Error::InvalidCombination { kind: "configuration", .. }));
    }
}
