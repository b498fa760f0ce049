//! Identity of a guarded callable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names the method a contract is attached to.
///
/// Instance methods display as `Owner#name`, class-level (singleton)
/// methods as `Owner.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub singleton: bool,
}

impl MethodRef {
    /// An instance method `owner#name`.
    pub fn instance(owner: impl Into<String>, name: impl Into<String>) -> Self {
        MethodRef {
            owner: owner.into(),
            name: name.into(),
            singleton: false,
        }
    }

    /// A class-level method `owner.name`.
    pub fn singleton(owner: impl Into<String>, name: impl Into<String>) -> Self {
        MethodRef {
            owner: owner.into(),
            name: name.into(),
            singleton: true,
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.singleton { '.' } else { '#' };
        write!(f, "{}{}{}", self.owner, sep, self.name)
    }
}
