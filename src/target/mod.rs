//! Target resolution.
//!
//! - `arch` - the three supported CPU architectures
//! - `profile` - the six build configurations
//! - `descriptor` - the resolved [`TargetDescriptor`]

pub mod arch;
pub mod descriptor;
pub mod profile;

pub use arch::{Architecture, Firmware};
pub use descriptor::{resolve_names, TargetDescriptor};
pub use profile::{BuildConfiguration, ToolchainMode};
