//! Declarative recipe tables.
//!
//! Each [`Schema`] is one revision of the HCL package recipe: where to fetch
//! it, which versions exist, which variants a consumer may toggle, which
//! packages those variants pull in, which combinations are forbidden, and the
//! precedence tables the resolver walks.
//!
//! All tables are `'static` immutable data. Nothing here is mutated at
//! runtime, so resolution stays a pure function of its input.
//!
//! # Revisions
//!
//! | Rev | Backend order           | Protocol                         |
//! |-----|-------------------------|----------------------------------|
//! | v1  | thallium                | coupled to thallium: ofi, ucx    |
//! | v2  | thallium, rpclib, ucx   | coupled to thallium: ofi, ucx    |
//! | v3  | rpclib, ucx, thallium   | coupled to thallium: ofi, ucx    |
//! | v4  | rpclib, ucx, thallium   | decoupled: tcp, verbs, uct       |

mod revisions;

use std::fmt;

use crate::types::{Backend, Protocol, SchemaVersion, Variant};
use crate::variant_set::VariantSet;

pub use revisions::{V1, V2, V3, V4};

/// Look up the tables for a recipe revision.
pub fn schema(version: SchemaVersion) -> &'static Schema {
    match version {
        SchemaVersion::V1 => &V1,
        SchemaVersion::V2 => &V2,
        SchemaVersion::V3 => &V3,
        SchemaVersion::V4 => &V4,
    }
}

/// One revision of the recipe.
#[derive(Debug)]
pub struct Schema {
    pub version: SchemaVersion,
    /// Tarball URL of the default branch.
    pub url: &'static str,
    /// Git remote used for branch and tag checkouts.
    pub git: &'static str,
    pub versions: &'static [VersionDecl],
    pub variants: &'static [VariantDecl],
    pub dependencies: &'static [DependencyRule],
    pub conflicts: &'static [ConflictRule],
    /// Backend variants in priority order; first enabled wins.
    pub backend_order: &'static [(Variant, Backend)],
    /// Backend emitted when no backend variant is enabled.
    pub fallback_backend: Backend,
    pub protocol: ProtocolPolicy,
}

impl Schema {
    /// Declaration for `variant`, if this revision exposes it.
    pub fn variant(&self, variant: Variant) -> Option<&'static VariantDecl> {
        self.variants.iter().find(|decl| decl.variant == variant)
    }

    /// Whether this revision exposes `variant` at all.
    pub fn declares(&self, variant: Variant) -> bool {
        self.variant(variant).is_some()
    }

    /// Declaration looked up by its consumer-facing name.
    pub fn variant_by_name(&self, name: &str) -> Option<&'static VariantDecl> {
        let variant: Variant = name.parse().ok()?;
        self.variant(variant)
    }
}

/// A fetchable version of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionDecl {
    pub name: &'static str,
    pub source: VersionSource,
}

/// Where a version's sources come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Tip of a branch; not reproducible.
    Branch(&'static str),
    /// A release tag pinned to a commit.
    Tag {
        tag: &'static str,
        commit: &'static str,
    },
}

impl fmt::Display for VersionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            VersionSource::Branch(branch) => write!(f, "{} (branch {})", self.name, branch),
            VersionSource::Tag { tag, commit } => {
                write!(f, "{} (tag {}, commit {})", self.name, tag, commit)
            }
        }
    }
}

/// A variant as exposed to the package consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDecl {
    pub variant: Variant,
    pub default: bool,
    pub description: &'static str,
}

/// Activation condition over a [`VariantSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Always,
    Enabled(Variant),
    AllOf(&'static [Variant]),
    AnyOf(&'static [Variant]),
}

impl Predicate {
    pub fn holds(&self, variants: &VariantSet) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Enabled(v) => variants.is_enabled(*v),
            Predicate::AllOf(vs) => vs.iter().all(|v| variants.is_enabled(*v)),
            Predicate::AnyOf(vs) => vs.iter().any(|v| variants.is_enabled(*v)),
        }
    }
}

/// Spack-style `when=` rendering: `+thallium+ofi`, `+ucx|+uct`.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => Ok(()),
            Predicate::Enabled(v) => write!(f, "+{}", v),
            Predicate::AllOf(vs) => vs.iter().try_for_each(|v| write!(f, "+{}", v)),
            Predicate::AnyOf(vs) => {
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "+{}", v)?;
                }
                Ok(())
            }
        }
    }
}

/// A package pulled into the host package manager's graph when `when` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRule {
    pub package: &'static str,
    /// Version range in Spack syntax (`0.11.3:`); empty means any version.
    pub version: &'static str,
    /// Variant/parameter qualifiers on the dependency itself (`~cereal`, `+ofi`).
    pub qualifiers: &'static str,
    pub when: Predicate,
}

impl DependencyRule {
    /// The dependency as a single Spack spec string, without the `when` clause.
    pub fn spec(&self) -> String {
        let mut spec = self.package.to_string();
        if !self.version.is_empty() {
            spec.push('@');
            spec.push_str(self.version);
        }
        if !self.qualifiers.is_empty() {
            if self.qualifiers.starts_with(['+', '~']) {
                spec.push_str(self.qualifiers);
            } else {
                spec.push(' ');
                spec.push_str(self.qualifiers);
            }
        }
        spec
    }
}

/// Two predicates that must never hold together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictRule {
    pub first: Predicate,
    pub second: Predicate,
    pub message: &'static str,
}

impl ConflictRule {
    pub fn violated_by(&self, variants: &VariantSet) -> bool {
        self.first.holds(variants) && self.second.holds(variants)
    }
}

/// How the transport protocol flag is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPolicy {
    /// A protocol flag is emitted only when `backend` was selected and one of
    /// `order` is enabled.
    Coupled {
        backend: Backend,
        order: &'static [(Variant, Protocol)],
    },
    /// Exactly one protocol flag is always emitted.
    Decoupled {
        order: &'static [(Variant, Protocol)],
        fallback: Protocol,
    },
}
