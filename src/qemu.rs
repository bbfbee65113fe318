//! QEMU runner for iron.
//!
//! Boots the published boot-media directory under UEFI firmware. The argument
//! list is a shared base followed by the architecture's own flags:
//!
//! | Arch     | Machine                 | Firmware              | Exit channel     |
//! |----------|-------------------------|-----------------------|------------------|
//! | x86, x64 | q35 + std VGA, cpu max  | OVMF code/vars pflash | `isa-debug-exit` |
//! | aa64     | virt, cortex-a76        | `-bios` image         | semihosting      |
//!
//! The guest reports pass/fail through the exit channel, so QEMU's exit code is
//! the run's result.

use std::path::{Path, PathBuf};

use crate::config::{Layout, QEMU_SYSTEM_MEMORY};
use crate::error::{Error, Result};
use crate::process::{Invocation, Runner};
use crate::target::{Architecture, Firmware, TargetDescriptor};

/// Builder for QEMU argument lists.
struct QemuBuilder {
    boot_media: PathBuf,
    memory: String,
    machine: &'static [&'static str],
    firmware: Vec<String>,
    exit: &'static [&'static str],
}

impl QemuBuilder {
    fn new(boot_media: PathBuf) -> Self {
        Self {
            boot_media,
            memory: QEMU_SYSTEM_MEMORY.to_string(),
            machine: &[],
            firmware: Vec::new(),
            exit: &[],
        }
    }

    fn machine(mut self, flags: &'static [&'static str]) -> Self {
        self.machine = flags;
        self
    }

    fn firmware(mut self, firmware: Firmware, dir: &Path) -> Self {
        self.firmware = match firmware {
            Firmware::Pflash { code, vars } => vec![
                "-drive".into(),
                format!("if=pflash,format=raw,readonly=on,file={}", dir.join(code).display()),
                "-drive".into(),
                format!("if=pflash,format=raw,file={}", dir.join(vars).display()),
            ],
            Firmware::Bios(bios) => vec!["-bios".into(), dir.join(bios).display().to_string()],
        };
        self
    }

    fn exit_channel(mut self, flags: &'static [&'static str]) -> Self {
        self.exit = flags;
        self
    }

    fn build(self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            // Default devices only slow down boot
            "-nodefaults".into(),
            "-m".into(),
            self.memory,
            "-drive".into(),
            format!("format=raw,file=fat:rw:{}", self.boot_media.display()),
            // OVMF wires UEFI stdin/stdout to the first serial port
            "-serial".into(),
            "stdio".into(),
            "-monitor".into(),
            "vc:1024x768".into(),
        ];

        args.extend(self.machine.iter().map(|s| s.to_string()));
        args.extend(self.firmware);
        args.extend(self.exit.iter().map(|s| s.to_string()));
        args
    }
}

/// Emulator arguments for `arch`, in the order QEMU must receive them.
pub fn emulator_args(arch: Architecture, layout: &Layout) -> Vec<String> {
    QemuBuilder::new(layout.build_dir())
        .machine(arch.machine_flags())
        .firmware(arch.firmware(), &layout.firmware_dir())
        .exit_channel(arch.exit_flags())
        .build()
}

/// The QEMU invocation for a resolved target.
pub fn launch_invocation(descriptor: &TargetDescriptor) -> Invocation {
    Invocation::new(descriptor.emulator()).args(descriptor.emulator_args().iter().cloned())
}

/// Run the target in QEMU and wait for it to exit.
///
/// A non-zero exit becomes [`Error::EmulatorFailure`] carrying QEMU's code.
pub fn launch(descriptor: &TargetDescriptor, runner: &mut dyn Runner) -> Result<()> {
    let invocation = launch_invocation(descriptor);

    println!("Running iron in QEMU...");
    println!("  Emulator: {}", descriptor.emulator());
    println!("  Command:  {}", invocation);

    let code = runner.run(&invocation)?;
    if code != 0 {
        return Err(Error::EmulatorFailure { code });
    }
    Ok(())
}
