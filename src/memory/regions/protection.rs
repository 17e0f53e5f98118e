//! Region permission flags and the executable-region policy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a mapping is shared with other processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sharing {
    Private,
    Shared,
    Unknown,
}

/// Read/write/execute permissions of a mapped region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
    pub sharing: Sharing,
}

impl Permissions {
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        Permissions {
            read,
            write,
            execute,
            sharing: Sharing::Unknown,
        }
    }

    /// Parses a procfs token such as `r-xp` or `rw-s`
    pub fn parse_procfs(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        if bytes.len() != 4 {
            return None;
        }

        let flag = |b: u8, set: u8| match b {
            b'-' => Some(false),
            b if b == set => Some(true),
            _ => None,
        };

        let sharing = match bytes[3] {
            b'p' => Sharing::Private,
            b's' => Sharing::Shared,
            _ => return None,
        };

        Some(Permissions {
            read: flag(bytes[0], b'r')?,
            write: flag(bytes[1], b'w')?,
            execute: flag(bytes[2], b'x')?,
            sharing,
        })
    }

    /// Parses the current protection of a vmmap `cur/max` token such as `r-x/rwx`
    pub fn parse_vmmap(token: &str) -> Option<Self> {
        let current = token.split('/').next()?;
        let bytes = current.as_bytes();
        if bytes.len() != 3 {
            return None;
        }

        let flag = |b: u8, set: u8| match b {
            b'-' => Some(false),
            b if b == set => Some(true),
            _ => None,
        };

        Some(Permissions::new(
            flag(bytes[0], b'r')?,
            flag(bytes[1], b'w')?,
            flag(bytes[2], b'x')?,
        ))
    }

    /// The coarse `r-x` rule: readable and executable, not writable
    pub fn is_read_execute(&self) -> bool {
        self.read && !self.write && self.execute
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.read, 'r'),
            flag(self.write, 'w'),
            flag(self.execute, 'x')
        )?;
        match self.sharing {
            Sharing::Private => write!(f, "p"),
            Sharing::Shared => write!(f, "s"),
            Sharing::Unknown => Ok(()),
        }
    }
}

/// Which permission combinations count as "executable"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutablePolicy {
    /// Only `r-x` regions; write+execute mappings are left out
    #[default]
    ReadExecute,
    /// Any region with the execute bit, including `--x` and `rwx`
    AnyExecute,
}

impl ExecutablePolicy {
    pub fn matches(&self, permissions: &Permissions) -> bool {
        match self {
            ExecutablePolicy::ReadExecute => permissions.is_read_execute(),
            ExecutablePolicy::AnyExecute => permissions.execute,
        }
    }
}
