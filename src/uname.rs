use std::{io, mem::MaybeUninit};

use libc::c_char;

use crate::{
    dependencies::Dependency,
    version::{VersionError, VersionInfo},
};

/// A way to obtain the raw kernel release string.
///
/// Implementations differ only in where the string comes from; parsing is
/// shared. Wrap a source in [`crate::cache::FetchOnce`] or
/// [`crate::cache::TtlCache`] to avoid re-acquiring on every call.
pub trait ReleaseSource {
    /// Acquires the raw release string, e.g. `5.10.0-generic`.
    fn raw_release(&self) -> Result<String, VersionError>;

    /// Acquires the release string and parses it into a [`VersionInfo`].
    fn version(&self) -> Result<VersionInfo, VersionError> {
        self.raw_release()?.parse()
    }
}

/// Obtains the kernel release by running the `uname` command.
///
/// Spawns a child process on every acquisition, which is why the caching
/// wrappers exist.
pub struct UnameCommand;

impl ReleaseSource for UnameCommand {
    fn raw_release(&self) -> Result<String, VersionError> {
        kernel_release()
    }
}

/// Obtains the kernel release from the `uname(2)` system call, without
/// spawning a process.
pub struct Utsname;

impl ReleaseSource for Utsname {
    fn raw_release(&self) -> Result<String, VersionError> {
        kernel_release_syscall()
    }
}

// Grab the kernel release using the `uname` command
pub fn kernel_release() -> Result<String, VersionError> {
    Dependency::Uname
        .cmd()
        .arg("-r")
        .output_and_check()
        .map_err(VersionError::Execution)
}

/// Grabs the kernel release from the `uname(2)` system call.
pub fn kernel_release_syscall() -> Result<String, VersionError> {
    let mut buf = MaybeUninit::<libc::utsname>::zeroed();
    // SAFETY: uname(2) only writes into the buffer it is handed.
    if unsafe { libc::uname(buf.as_mut_ptr()) } != 0 {
        return Err(VersionError::SystemCall(io::Error::last_os_error()));
    }
    let buf = unsafe { buf.assume_init() };
    Ok(release_from_bytes(&buf.release))
}

/// Converts the fixed-size release buffer of a `utsname` into a string,
/// stopping at the first NUL. Neither the NUL nor anything after it makes it
/// into the result.
pub fn release_from_bytes(release: &[c_char]) -> String {
    release
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8 as char)
        .collect()
}
