//! Closed vocabularies used by phase, agent and synchronization declarations.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A value drawn from a fixed set of lowercase terms.
pub trait PolicyTerm: FromStr + Copy {
    /// Every accepted spelling, in declaration order.
    const ALLOWED: &'static [&'static str];

    /// Returns the canonical spelling of the term.
    fn as_str(self) -> &'static str;
}

/// Returned when a string is not a member of a [`PolicyTerm`] vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTerm(pub String);

/// Whether a phase or agent may produce side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffects {
    /// Writes outside the pipeline are permitted.
    Allowed,
    /// The actor must stay side-effect free.
    Forbidden,
}

impl PolicyTerm for SideEffects {
    const ALLOWED: &'static [&'static str] = &["allowed", "forbidden"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Forbidden => "forbidden",
        }
    }
}

impl FromStr for SideEffects {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allowed" => Ok(Self::Allowed),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(UnknownTerm(other.to_owned())),
        }
    }
}

/// Memory tier a phase may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryScope {
    /// Scratch memory discarded after the phase.
    Draft,
    /// Mutable task memory.
    Working,
    /// Memory may be read but never written.
    Readonly,
}

impl PolicyTerm for MemoryScope {
    const ALLOWED: &'static [&'static str] = &["draft", "working", "readonly"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Working => "working",
            Self::Readonly => "readonly",
        }
    }
}

impl FromStr for MemoryScope {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "working" => Ok(Self::Working),
            "readonly" => Ok(Self::Readonly),
            other => Err(UnknownTerm(other.to_owned())),
        }
    }
}

/// Carrier declared by a synchronization message contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// In-process hand-off.
    Internal,
    /// Model Context Protocol channel.
    Mcp,
    /// Anything leaving the hub.
    External,
}

impl PolicyTerm for Transport {
    const ALLOWED: &'static [&'static str] = &["internal", "mcp", "external"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Mcp => "mcp",
            Self::External => "external",
        }
    }
}

impl FromStr for Transport {
    type Err = UnknownTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Self::Internal),
            "mcp" => Ok(Self::Mcp),
            "external" => Ok(Self::External),
            other => Err(UnknownTerm(other.to_owned())),
        }
    }
}

macro_rules! display_term {
    ($($ty:ty),+) => {
        $(impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_term!(SideEffects, MemoryScope, Transport);
