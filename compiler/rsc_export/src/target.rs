//! Target runtime API generation.

use std::fmt;

/// API level the generated code targets.
///
/// `Development` is newer than every numbered level.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Default)]
pub enum TargetApi {
    Level(u32),
    #[default]
    Development,
}

/// The requested API level predates the first supported release.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("target API {0} is not supported (minimum is {min})", min = TargetApi::MIN)]
pub struct UnsupportedTargetApi(pub u32);

impl TargetApi {
    /// Oldest supported API level.
    pub const MIN: u32 = 11;
    pub const ICS: u32 = 14;
    /// First level with the `in, out, usrData, x, y` kernel convention
    /// accepted in any combination.
    pub const JB: u32 = 16;

    /// Validate a numbered level.
    pub fn level(level: u32) -> Result<Self, UnsupportedTargetApi> {
        if level < Self::MIN {
            return Err(UnsupportedTargetApi(level));
        }
        Ok(TargetApi::Level(level))
    }

    /// Numeric level; `Development` sorts above every release.
    pub const fn number(self) -> u32 {
        match self {
            TargetApi::Level(n) => n,
            TargetApi::Development => u32::MAX,
        }
    }

    pub const fn supports_reduce(self) -> bool {
        matches!(self, TargetApi::Development)
    }

    /// Below JB only strict-prefix ForEach signatures are accepted.
    pub const fn is_legacy_foreach(self) -> bool {
        self.number() < Self::JB
    }

    /// From JB on, any void function taking a pointer first is a kernel.
    pub const fn infers_foreach(self) -> bool {
        self.number() >= Self::JB
    }
}

impl fmt::Display for TargetApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetApi::Level(n) => write!(f, "{n}"),
            TargetApi::Development => f.write_str("development"),
        }
    }
}

#[cfg(test)]
mod tests;
