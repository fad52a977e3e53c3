//! Type-safe recipe vocabulary for HCL builds
//!
//! Every variant, backend, protocol and log level the recipe knows about is a
//! Rust enum, so precedence tables and dependency rules are checked at compile
//! time instead of being matched as strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Recipe revision whose tables drive a resolution.
///
/// The four revisions disagree on backend precedence and on whether the
/// transport protocol is tied to the thallium backend. All of them stay
/// selectable so existing build configurations keep resolving the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaVersion {
    /// thallium only, protocol coupled to thallium
    V1,
    /// thallium → rpclib → ucx, logging variants appear
    V2,
    /// rpclib → ucx → thallium
    V3,
    /// rpclib → ucx → thallium, protocol decoupled, rpclib/verbs conflict
    #[default]
    V4,
}

impl SchemaVersion {
    /// The most recent revision of the recipe.
    pub const LATEST: Self = Self::V4;
}

/// A named boolean build option exposed to the package consumer.
///
/// The string form is the name used on the command line and in config
/// files (`+cpp-logger`, `"cpp-logger": true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Variant {
    Thallium,
    Rpclib,
    Ucx,
    Ofi,
    Verbs,
    Tcp,
    Uct,
    CppLogger,
    Verbose,
    Debug,
    Dlp,
}

impl Variant {
    /// Whether the variant takes part in backend or protocol selection.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            Self::Thallium
                | Self::Rpclib
                | Self::Ucx
                | Self::Ofi
                | Self::Verbs
                | Self::Tcp
                | Self::Uct
        )
    }
}

/// Communication/RPC substrate, emitted as `HCL_COMMUNICATION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Backend {
    Thallium,
    Rpclib,
    Ucx,
}

impl Backend {
    /// The variant that enables this backend.
    pub fn variant(&self) -> Variant {
        match self {
            Self::Thallium => Variant::Thallium,
            Self::Rpclib => Variant::Rpclib,
            Self::Ucx => Variant::Ucx,
        }
    }
}

/// Transport beneath a backend, emitted as `HCL_COMMUNICATION_PROTOCOL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Verbs,
    Ofi,
    Ucx,
}

/// Logger verbosity, emitted as `HCL_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
}
