//! The four revisions of the HCL recipe.

use super::{
    ConflictRule, DependencyRule, Predicate, ProtocolPolicy, Schema, VariantDecl, VersionDecl,
    VersionSource,
};
use crate::types::{Backend, Protocol, SchemaVersion, Variant};

const URL: &str = "https://github.com/HDFGroup/hcl/tarball/master";
const GIT: &str = "https://github.com/HDFGroup/hcl.git";

// ============================================================================
// Shared tables
// ============================================================================

const RELEASES: &[VersionDecl] = &[
    VersionDecl {
        name: "develop",
        source: VersionSource::Branch("develop"),
    },
    VersionDecl {
        name: "0.0.1",
        source: VersionSource::Tag {
            tag: "0.0.1",
            commit: "4647b14a11cd0650eb26c0eafcc22968b54c4f53",
        },
    },
    VersionDecl {
        name: "0.0.2",
        source: VersionSource::Tag {
            tag: "0.0.2",
            commit: "cc9ced060536ccab32dfc53cff83ac8a09c120f5",
        },
    },
];

const RELEASES_WITH_MASTER: &[VersionDecl] = &[
    VersionDecl {
        name: "master",
        source: VersionSource::Branch("master"),
    },
    RELEASES[0],
    RELEASES[1],
    RELEASES[2],
];

const THALLIUM_BACKEND: VariantDecl = VariantDecl {
    variant: Variant::Thallium,
    default: true,
    description: "Enable thallium based RPC communication",
};

const RPCLIB_BACKEND: VariantDecl = VariantDecl {
    variant: Variant::Rpclib,
    default: true,
    description: "Enable rpclib based RPC communication",
};

const UCX_BACKEND: VariantDecl = VariantDecl {
    variant: Variant::Ucx,
    default: false,
    description: "Enable UCX based communication",
};

const OFI_PROTOCOL: VariantDecl = VariantDecl {
    variant: Variant::Ofi,
    default: false,
    description: "Enable Verbs protocol",
};

const CPP_LOGGER: VariantDecl = VariantDecl {
    variant: Variant::CppLogger,
    default: false,
    description: "Enable logging through cpp-logger",
};

const VERBOSE: VariantDecl = VariantDecl {
    variant: Variant::Verbose,
    default: false,
    description: "Enable info level logging",
};

const DEBUG: VariantDecl = VariantDecl {
    variant: Variant::Debug,
    default: false,
    description: "Enable debug level logging",
};

const MPI: DependencyRule = DependencyRule {
    package: "mpi",
    version: "",
    qualifiers: "",
    when: Predicate::Always,
};

const BOOST: DependencyRule = DependencyRule {
    package: "boost",
    version: "1.71.0:",
    qualifiers: "",
    when: Predicate::Always,
};

const MOCHI_THALLIUM: DependencyRule = DependencyRule {
    package: "mochi-thallium",
    version: "0.11.3:",
    qualifiers: "~cereal",
    when: Predicate::Enabled(Variant::Thallium),
};

const RPCLIB: DependencyRule = DependencyRule {
    package: "rpclib",
    version: "2.3.0",
    qualifiers: "",
    when: Predicate::Enabled(Variant::Rpclib),
};

const CPP_LOGGER_DEP: DependencyRule = DependencyRule {
    package: "cpp-logger",
    version: "0.0.1",
    qualifiers: "",
    when: Predicate::Enabled(Variant::CppLogger),
};

/// Protocol dependencies shared by the thallium-coupled revisions.
const COUPLED_TRANSPORT_DEPS: [DependencyRule; 4] = [
    DependencyRule {
        package: "mercury",
        version: "2.3.1",
        qualifiers: "+ofi",
        when: Predicate::AllOf(&[Variant::Thallium, Variant::Ofi]),
    },
    DependencyRule {
        package: "mercury",
        version: "2.3.1",
        qualifiers: "+ucx",
        when: Predicate::AllOf(&[Variant::Thallium, Variant::Ucx]),
    },
    DependencyRule {
        package: "libfabric",
        version: "",
        qualifiers: "fabrics=rxm,sockets,tcp",
        when: Predicate::AllOf(&[Variant::Thallium, Variant::Ofi]),
    },
    DependencyRule {
        package: "ucx",
        version: "1.13.1:",
        qualifiers: "",
        when: Predicate::Enabled(Variant::Ucx),
    },
];

const COUPLED_PROTOCOLS: ProtocolPolicy = ProtocolPolicy::Coupled {
    backend: Backend::Thallium,
    order: &[(Variant::Ofi, Protocol::Ofi), (Variant::Ucx, Protocol::Ucx)],
};

// ============================================================================
// v1: thallium only
// ============================================================================

pub static V1: Schema = Schema {
    version: SchemaVersion::V1,
    url: URL,
    git: GIT,
    versions: RELEASES,
    variants: &[
        THALLIUM_BACKEND,
        // backs the fallback backend when thallium is off
        VariantDecl {
            default: false,
            ..RPCLIB_BACKEND
        },
        OFI_PROTOCOL,
        VariantDecl {
            variant: Variant::Ucx,
            default: false,
            description: "Enable UCX protocol",
        },
    ],
    dependencies: &[
        MPI,
        MOCHI_THALLIUM,
        RPCLIB,
        COUPLED_TRANSPORT_DEPS[0],
        COUPLED_TRANSPORT_DEPS[1],
        COUPLED_TRANSPORT_DEPS[2],
        BOOST,
        COUPLED_TRANSPORT_DEPS[3],
    ],
    conflicts: &[],
    backend_order: &[(Variant::Thallium, Backend::Thallium)],
    fallback_backend: Backend::Rpclib,
    protocol: COUPLED_PROTOCOLS,
};

// ============================================================================
// v2: rpclib and ucx backends, thallium first
// ============================================================================

pub static V2: Schema = Schema {
    version: SchemaVersion::V2,
    url: URL,
    git: GIT,
    versions: RELEASES_WITH_MASTER,
    variants: &[
        THALLIUM_BACKEND,
        RPCLIB_BACKEND,
        UCX_BACKEND,
        OFI_PROTOCOL,
        CPP_LOGGER,
        DEBUG,
    ],
    dependencies: &[
        MPI,
        BOOST,
        MOCHI_THALLIUM,
        RPCLIB,
        COUPLED_TRANSPORT_DEPS[0],
        COUPLED_TRANSPORT_DEPS[1],
        COUPLED_TRANSPORT_DEPS[2],
        COUPLED_TRANSPORT_DEPS[3],
        CPP_LOGGER_DEP,
    ],
    conflicts: &[],
    backend_order: &[
        (Variant::Thallium, Backend::Thallium),
        (Variant::Rpclib, Backend::Rpclib),
        (Variant::Ucx, Backend::Ucx),
    ],
    fallback_backend: Backend::Rpclib,
    protocol: COUPLED_PROTOCOLS,
};

// ============================================================================
// v3: rpclib first, verbose logging
// ============================================================================

pub static V3: Schema = Schema {
    version: SchemaVersion::V3,
    url: URL,
    git: GIT,
    versions: RELEASES_WITH_MASTER,
    variants: &[
        RPCLIB_BACKEND,
        UCX_BACKEND,
        THALLIUM_BACKEND,
        OFI_PROTOCOL,
        VariantDecl {
            default: true,
            ..CPP_LOGGER
        },
        VERBOSE,
        DEBUG,
    ],
    dependencies: &[
        MPI,
        BOOST,
        RPCLIB,
        MOCHI_THALLIUM,
        COUPLED_TRANSPORT_DEPS[0],
        COUPLED_TRANSPORT_DEPS[1],
        COUPLED_TRANSPORT_DEPS[2],
        COUPLED_TRANSPORT_DEPS[3],
        CPP_LOGGER_DEP,
    ],
    conflicts: &[],
    backend_order: &[
        (Variant::Rpclib, Backend::Rpclib),
        (Variant::Ucx, Backend::Ucx),
        (Variant::Thallium, Backend::Thallium),
    ],
    fallback_backend: Backend::Rpclib,
    protocol: COUPLED_PROTOCOLS,
};

// ============================================================================
// v4: protocol decoupled from backend
// ============================================================================

pub static V4: Schema = Schema {
    version: SchemaVersion::V4,
    url: URL,
    git: GIT,
    versions: RELEASES_WITH_MASTER,
    variants: &[
        RPCLIB_BACKEND,
        UCX_BACKEND,
        THALLIUM_BACKEND,
        VariantDecl {
            variant: Variant::Tcp,
            default: true,
            description: "Use the TCP protocol",
        },
        VariantDecl {
            variant: Variant::Verbs,
            default: false,
            description: "Use the Verbs protocol through libfabric",
        },
        VariantDecl {
            variant: Variant::Uct,
            default: false,
            description: "Use the UCX (UCT) protocol",
        },
        VariantDecl {
            default: true,
            ..CPP_LOGGER
        },
        VERBOSE,
        DEBUG,
        VariantDecl {
            variant: Variant::Dlp,
            default: false,
            description: "Enable profiling through dlio-profiler",
        },
    ],
    dependencies: &[
        MPI,
        BOOST,
        RPCLIB,
        MOCHI_THALLIUM,
        DependencyRule {
            package: "mercury",
            version: "2.3.1",
            qualifiers: "+ofi",
            when: Predicate::AllOf(&[Variant::Thallium, Variant::Verbs]),
        },
        DependencyRule {
            package: "mercury",
            version: "2.3.1",
            qualifiers: "+ucx",
            when: Predicate::AllOf(&[Variant::Thallium, Variant::Uct]),
        },
        DependencyRule {
            package: "libfabric",
            version: "",
            qualifiers: "fabrics=rxm,sockets,tcp,verbs",
            when: Predicate::Enabled(Variant::Verbs),
        },
        DependencyRule {
            package: "ucx",
            version: "1.13.1:",
            qualifiers: "",
            when: Predicate::AnyOf(&[Variant::Ucx, Variant::Uct]),
        },
        CPP_LOGGER_DEP,
        DependencyRule {
            package: "py-dlio-profiler-py",
            version: "0.0.3:",
            qualifiers: "",
            when: Predicate::Enabled(Variant::Dlp),
        },
    ],
    conflicts: &[ConflictRule {
        first: Predicate::Enabled(Variant::Rpclib),
        second: Predicate::Enabled(Variant::Verbs),
        message: "RPC lib only supports tcp protocol",
    }],
    backend_order: &[
        (Variant::Rpclib, Backend::Rpclib),
        (Variant::Ucx, Backend::Ucx),
        (Variant::Thallium, Backend::Thallium),
    ],
    fallback_backend: Backend::Rpclib,
    protocol: ProtocolPolicy::Decoupled {
        order: &[
            (Variant::Tcp, Protocol::Tcp),
            (Variant::Verbs, Protocol::Verbs),
            (Variant::Uct, Protocol::Ucx),
        ],
        fallback: Protocol::Tcp,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_declares_thallium_and_fallback() {
        let names: Vec<String> = V1.variants.iter().map(|d| d.variant.to_string()).collect();
        assert_eq!(names, vec!["thallium", "rpclib", "ofi", "ucx"]);
        assert!(V1.variant(Variant::Thallium).unwrap().default);
        assert!(!V1.variant(Variant::Rpclib).unwrap().default);
        assert!(!V1.variant(Variant::Ofi).unwrap().default);
        assert!(V1.conflicts.is_empty());
        assert_eq!(V1.versions.len(), 3);
    }

    #[test]
    fn test_later_revisions_enable_several_backends_by_default() {
        for schema in [&V2, &V3, &V4] {
            let enabled = schema
                .backend_order
                .iter()
                .filter(|(v, _)| schema.variant(*v).is_some_and(|d| d.default))
                .count();
            assert!(enabled > 1, "{} should default several backends on", schema.version);
        }
    }

    #[test]
    fn test_backend_precedence_reorders_after_v2() {
        assert_eq!(V2.backend_order[0].1, Backend::Thallium);
        assert_eq!(V3.backend_order[0].1, Backend::Rpclib);
        assert_eq!(V4.backend_order[0].1, Backend::Rpclib);
    }

    #[test]
    fn test_only_v4_declares_rpclib_verbs_conflict() {
        assert_eq!(V4.conflicts.len(), 1);
        assert_eq!(V4.conflicts[0].message, "RPC lib only supports tcp protocol");
        assert!(V2.conflicts.is_empty() && V3.conflicts.is_empty());
    }

    #[test]
    fn test_fallback_backend_is_declared_with_dependency() {
        for schema in [&V1, &V2, &V3, &V4] {
            let variant = schema.fallback_backend.variant();
            assert!(schema.declares(variant), "{} must declare {}", schema.version, variant);
            assert!(
                schema
                    .dependencies
                    .iter()
                    .any(|rule| rule.when == Predicate::Enabled(variant)),
                "{} has no dependency for {}",
                schema.version,
                variant
            );
        }
    }

    #[test]
    fn test_shared_release_tags_are_pinned() {
        for schema in [&V1, &V2, &V3, &V4] {
            let tagged = schema
                .versions
                .iter()
                .filter(|v| matches!(v.source, VersionSource::Tag { .. }))
                .count();
            assert_eq!(tagged, 2);
        }
    }
}
