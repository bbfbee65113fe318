//! Publishing the built binary into the boot-media directory.
//!
//! Produces the layout UEFI firmware boots from removable media:
//!
//! ```text
//! build/
//!   EFI/BOOT/<boot file>    copy of the toolchain output
//!   startup.nsh             \EFI\BOOT\<boot file>
//! ```
//!
//! Boot files left over from a different architecture are not removed.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use crate::config::Layout;
use crate::error::{Error, Result};
use crate::target::TargetDescriptor;

/// UEFI shell script that launches `boot_file` from the boot directory.
pub fn startup_script_contents(boot_file: &str) -> String {
    format!("\\EFI\\BOOT\\{}", boot_file)
}

/// Copy `source` into the boot-media layout and write the startup script.
///
/// Existing files are overwritten. Returns the path of the published binary.
pub fn publish(source: &Path, descriptor: &TargetDescriptor, layout: &Layout) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(Error::MissingArtifact {
            path: source.to_path_buf(),
        });
    }

    let boot_dir = layout.boot_dir();
    fs::create_dir_all(&boot_dir).map_err(|e| Error::io(&boot_dir, e))?;

    let output = boot_dir.join(descriptor.boot_file());
    copy_preserving_times(source, &output)?;

    let script = layout.startup_script();
    fs::write(&script, startup_script_contents(descriptor.boot_file()))
        .map_err(|e| Error::io(&script, e))?;

    println!("  Published: {}", output.display());
    println!("  Startup:   {}", script.display());

    Ok(output)
}

/// `fs::copy` keeps permissions; carry the access/modification times over too.
fn copy_preserving_times(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|e| Error::io(dest, e))?;

    let meta = fs::metadata(source).map_err(|e| Error::io(source, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }

    File::options()
        .write(true)
        .open(dest)
        .and_then(|f| f.set_times(times))
        .map_err(|e| Error::io(dest, e))
}
