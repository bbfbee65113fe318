//! Supported CPU architectures and their per-architecture constants.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Firmware images an architecture boots with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firmware {
    /// OVMF split into a read-only code image and a writable vars image,
    /// both mounted as persistent flash.
    Pflash {
        code: &'static str,
        vars: &'static str,
    },
    /// A single image passed with `-bios`.
    Bios(&'static str),
}

impl Firmware {
    /// File names of every image this firmware needs, in mount order.
    pub fn files(&self) -> Vec<&'static str> {
        match *self {
            Firmware::Pflash { code, vars } => vec![code, vars],
            Firmware::Bios(bios) => vec![bios],
        }
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86,
    X64,
    Aa64,
}

impl Architecture {
    /// Every architecture, in CLI order.
    pub const ALL: [Architecture; 3] = [Architecture::X86, Architecture::X64, Architecture::Aa64];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Aa64 => "aa64",
        }
    }

    /// Suffix of the `qemu-system-*` binary.
    pub fn qemu_arch(self) -> &'static str {
        match self {
            Architecture::X86 => "i386",
            Architecture::X64 => "x86_64",
            Architecture::Aa64 => "aarch64",
        }
    }

    /// Arch component of the UEFI target triple.
    pub fn uefi_arch(self) -> &'static str {
        match self {
            Architecture::X86 => "i686",
            Architecture::X64 => "x86_64",
            Architecture::Aa64 => "aarch64",
        }
    }

    /// Removable-media boot file name the firmware looks for.
    pub fn boot_file(self) -> &'static str {
        match self {
            Architecture::X86 => "BOOT.EFI",
            Architecture::X64 => "BOOTX64.EFI",
            Architecture::Aa64 => "BOOTAA64.EFI",
        }
    }

    pub fn firmware(self) -> Firmware {
        match self {
            Architecture::X86 => Firmware::Pflash {
                code: "edk2-i386-code.fd",
                vars: "edk2-i386-vars.fd",
            },
            Architecture::X64 => Firmware::Pflash {
                code: "OVMF_CODE-pure-efi.fd",
                vars: "OVMF_VARS-pure-efi.fd",
            },
            // aa64 firmware ships as one image, not a 64MB pflash pair
            Architecture::Aa64 => Firmware::Bios("QEMU_EFI_aarch64.fd"),
        }
    }

    /// Machine, display and CPU flags placed before the firmware flags.
    #[rustfmt::skip]
    pub fn machine_flags(self) -> &'static [&'static str] {
        match self {
            Architecture::X86 | Architecture::X64 => &[
                "-vga", "std",
                "-machine", "pc-q35-2.10,accel=tcg",
                "-cpu", "max",
            ],
            Architecture::Aa64 => &[
                "-machine", "virt",
                "-cpu", "cortex-a76",
            ],
        }
    }

    /// Flags wiring up the channel the guest uses to report pass/fail.
    ///
    /// x86 guests write to the isa-debug-exit port; aa64 has no such device
    /// and uses semihosting instead.
    pub fn exit_flags(self) -> &'static [&'static str] {
        match self {
            Architecture::X86 | Architecture::X64 => {
                &["-device", "isa-debug-exit,iobase=0xf4,iosize=0x04"]
            }
            Architecture::Aa64 => &["-semihosting"],
        }
    }

    fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| Error::InvalidCombination {
                kind: "architecture",
                value: s.to_string(),
                supported: Self::supported(),
            })
    }
}
