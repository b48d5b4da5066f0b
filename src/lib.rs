//! Detects the running kernel's version, either by running `uname -r` or by
//! calling `uname(2)` directly, and parses the release string into its
//! numeric components. The [`cache`] module wraps either source so repeated
//! lookups stop spawning processes.

pub mod cache;
pub mod dependencies;
pub mod uname;
pub mod version;

pub use cache::{FetchOnce, TtlCache, DEFAULT_TTL};
pub use uname::{ReleaseSource, UnameCommand, Utsname};
pub use version::{VersionError, VersionInfo};

/// Returns the kernel version reported by `uname -r`.
pub fn kernel_version() -> Result<VersionInfo, VersionError> {
    UnameCommand.version()
}

/// Returns the kernel version from the `uname(2)` system call, without
/// spawning a process.
pub fn kernel_version_syscall() -> Result<VersionInfo, VersionError> {
    Utsname.version()
}
