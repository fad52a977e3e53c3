//! Variant Resolver
//!
//! Translates a [`VariantSet`] into the CMake definitions for the HCL build
//! and the package dependencies the selection activates.
//!
//! # Design
//!
//! - **Tables, not branches**: precedence comes from the schema's ordered
//!   slices; the resolver only walks them
//! - **First match wins**: several enabled backends is a tie-break, never an error
//! - **Pure logic**: no I/O, no side effects; identical input gives identical output
//! - **Atomic**: a conflict aborts before any flag is produced
//! - **Fallback is a selection**: when no backend is enabled, the fallback
//!   backend's variant is switched on before conflict and dependency rules run
//!
//! # Resolution Rules
//!
//! | Definition                   | Resolved From |
//! |------------------------------|---------------|
//! | `CMAKE_INSTALL_PREFIX`       | caller's install prefix, always |
//! | `HCL_COMMUNICATION`          | first enabled backend, else schema fallback; always |
//! | `HCL_COMMUNICATION_PROTOCOL` | protocol policy (coupled or decoupled) |
//! | `HCL_LOGGING`                | `+cpp-logger` |
//! | `HCL_LOG_LEVEL`              | debug → verbose → warn, when the schema has log level variants |
//! | `HCL_PROFILER`               | `+dlp` |

use serde::Serialize;
use tracing::debug;

use crate::error::{RecipeError, Result};
use crate::flags::{
    FlagList, CMAKE_INSTALL_PREFIX, HCL_COMMUNICATION, HCL_COMMUNICATION_PROTOCOL, HCL_LOGGING,
    HCL_LOG_LEVEL, HCL_PROFILER,
};
use crate::schema::{ProtocolPolicy, Schema};
use crate::types::{Backend, LogLevel, Protocol, SchemaVersion, Variant};
use crate::variant_set::VariantSet;

/// A dependency activated by the selection, for the host package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveDependency {
    pub package: String,
    /// Spack version range; empty means any version.
    pub version: String,
    /// Full spec string, e.g. `mochi-thallium@0.11.3:~cereal`.
    pub spec: String,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub schema: SchemaVersion,
    pub backend: Backend,
    pub protocol: Option<Protocol>,
    pub flags: FlagList,
    pub dependencies: Vec<ActiveDependency>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a variant selection into build definitions and dependencies.
///
/// Steps, in order:
/// 1. Backend: first enabled in priority order, else the fallback, whose
///    variant is then treated as enabled
/// 2. Conflict rules: the first violated rule aborts with its message
/// 3. `CMAKE_INSTALL_PREFIX`, `HCL_COMMUNICATION`
/// 4. Protocol: per the schema's protocol policy
/// 5. Auxiliary flags: logging, log level, profiler
/// 6. Dependency rules whose predicate holds, in table order
///
/// # Errors
///
/// [`RecipeError::ConfigurationConflict`] carrying the violated rule's
/// diagnostic. Nothing else fails.
pub fn resolve(variants: &VariantSet, prefix: &str) -> Result<Resolution> {
    let schema = variants.schema();
    debug!(schema = %schema.version, variants = %variants, "resolving");

    let backend = select_backend(schema, variants);
    let effective = effective_variants(variants, backend);
    check_conflicts(schema, &effective)?;

    let mut flags = FlagList::new();
    flags.push(CMAKE_INSTALL_PREFIX, prefix);
    flags.push(HCL_COMMUNICATION, backend.to_string());

    let protocol = select_protocol(schema, &effective, backend);
    if let Some(protocol) = protocol {
        flags.push(HCL_COMMUNICATION_PROTOCOL, protocol.to_string());
    }

    if variants.is_enabled(Variant::CppLogger) {
        flags.push(HCL_LOGGING, "CPP_LOGGER");
    }
    if let Some(level) = select_log_level(schema, variants) {
        flags.push(HCL_LOG_LEVEL, level.to_string());
    }
    if variants.is_enabled(Variant::Dlp) {
        flags.push(HCL_PROFILER, "DLIO_PROFILER");
    }

    let dependencies = active_dependencies(schema, &effective);
    debug!(
        %backend,
        protocol = ?protocol,
        flags = flags.as_slice().len(),
        dependencies = dependencies.len(),
        "resolved"
    );

    Ok(Resolution {
        schema: schema.version,
        backend,
        protocol,
        flags,
        dependencies,
    })
}

fn check_conflicts(schema: &Schema, variants: &VariantSet) -> Result<()> {
    match schema.conflicts.iter().find(|rule| rule.violated_by(variants)) {
        Some(rule) => {
            debug!(first = %rule.first, second = %rule.second, "conflict rule violated");
            Err(RecipeError::conflict(rule.message))
        }
        None => Ok(()),
    }
}

/// First enabled backend in priority order, else the schema's fallback.
pub fn select_backend(schema: &Schema, variants: &VariantSet) -> Backend {
    schema
        .backend_order
        .iter()
        .find(|(variant, _)| variants.is_enabled(*variant))
        .map(|(_, backend)| *backend)
        .unwrap_or(schema.fallback_backend)
}

/// The selection as built: `variants` with the resolved backend switched on.
fn effective_variants(variants: &VariantSet, backend: Backend) -> VariantSet {
    let variant = backend.variant();
    if variants.is_enabled(variant) {
        return variants.clone();
    }
    debug!(%backend, "no backend enabled, using fallback");
    variants.clone().with(variant, true)
}

/// Protocol for `backend` under the schema's policy.
///
/// Coupled policies yield `None` unless `backend` is the coupled backend and
/// a protocol variant is enabled. Decoupled policies always yield a protocol.
pub fn select_protocol(schema: &Schema, variants: &VariantSet, backend: Backend) -> Option<Protocol> {
    let first_enabled = |order: &[(Variant, Protocol)]| {
        order
            .iter()
            .find(|(variant, _)| variants.is_enabled(*variant))
            .map(|(_, protocol)| *protocol)
    };
    match schema.protocol {
        ProtocolPolicy::Coupled { backend: coupled, order } => {
            if backend == coupled {
                first_enabled(order)
            } else {
                None
            }
        }
        ProtocolPolicy::Decoupled { order, fallback } => Some(first_enabled(order).unwrap_or(fallback)),
    }
}

/// debug → verbose → warn. `None` when the schema has no log level variants.
pub fn select_log_level(schema: &Schema, variants: &VariantSet) -> Option<LogLevel> {
    if !schema.declares(Variant::Debug) && !schema.declares(Variant::Verbose) {
        return None;
    }
    let level = if variants.is_enabled(Variant::Debug) {
        LogLevel::Debug
    } else if variants.is_enabled(Variant::Verbose) {
        LogLevel::Info
    } else {
        LogLevel::default()
    };
    Some(level)
}

fn active_dependencies(schema: &Schema, variants: &VariantSet) -> Vec<ActiveDependency> {
    schema
        .dependencies
        .iter()
        .filter(|rule| rule.when.holds(variants))
        .map(|rule| ActiveDependency {
            package: rule.package.to_string(),
            version: rule.version.to_string(),
            spec: rule.spec(),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
