use std::{fmt, io, str::FromStr};

use crate::dependencies::DependencyError;

/// Errors produced while acquiring or parsing the kernel version.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// The `uname -r` command could not be run or exited unsuccessfully.
    #[error("failed to run command uname -r")]
    Execution(#[source] Box<DependencyError>),

    /// The `uname(2)` system call failed.
    #[error("uname system call failed")]
    SystemCall(#[source] io::Error),

    /// The release string did not contain three integer components.
    #[error("can't parse kernel version, release: '{release}'")]
    Parse { release: String },
}

/// Parsed kernel release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version of the kernel (e.g. 4.1.2-generic -> 4)
    pub kernel: u32,
    /// Major revision of the kernel (e.g. 4.1.2-generic -> 1)
    pub major: u32,
    /// Minor revision of the kernel (e.g. 4.1.2-generic -> 2)
    pub minor: u32,
    /// Flavor of the kernel (e.g. 4.1.2-generic -> generic)
    pub flavor: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            self.kernel, self.major, self.minor, self.flavor
        )
    }
}

impl FromStr for VersionInfo {
    type Err = VersionError;

    /// Parses a release string with `%d.%d.%d-%s` semantics: three integers
    /// separated by dots, then an optional dash-prefixed flavor token running
    /// up to the first whitespace. The three integers are required; the
    /// flavor is not. Anything past the flavor token is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_release(s).ok_or_else(|| VersionError::Parse {
            release: s.to_string(),
        })
    }
}

fn parse_release(s: &str) -> Option<VersionInfo> {
    let rest = s.trim_start();
    let (kernel, rest) = scan_u32(rest)?;
    let rest = rest.strip_prefix('.')?;
    let (major, rest) = scan_u32(rest)?;
    let rest = rest.strip_prefix('.')?;
    let (minor, rest) = scan_u32(rest)?;

    // A character that breaks the pattern here ends the match with the three
    // integers already accepted, so the flavor just comes up empty.
    let flavor = match rest.strip_prefix('-') {
        Some(tail) => tail.split_whitespace().next().unwrap_or("").to_string(),
        None => String::new(),
    };

    Some(VersionInfo {
        kernel,
        major,
        minor,
        flavor,
    })
}

/// Scans a run of ASCII digits off the front of `s`.
fn scan_u32(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}
