//! Firmware image validation.
//!
//! x86 and x64 need an OVMF code/vars pair; aa64 needs a single BIOS image.

use super::CheckResult;
use crate::config::Layout;
use crate::target::TargetDescriptor;

/// Check that every firmware image the target boots with is present.
pub fn check_firmware(descriptor: &TargetDescriptor, layout: &Layout) -> Vec<CheckResult> {
    descriptor
        .firmware_paths(layout)
        .into_iter()
        .map(|path| {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = format!("{} firmware", file);

            if path.is_file() {
                CheckResult::pass(name, format!("Found at {}", path.display()))
            } else {
                CheckResult::fail(
                    name,
                    format!("Not found at {}", path.display()),
                    format!(
                        "Copy the {} firmware image into {}",
                        descriptor.arch(),
                        layout.firmware_dir().display()
                    ),
                )
            }
        })
        .collect()
}
