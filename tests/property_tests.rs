//! Property-Based Tests for hcl-recipe
//!
//! Uses proptest to check resolution invariants over arbitrary selections:
//! - Exactly one backend flag, at most one protocol flag
//! - Conflicting selections fail atomically with the rule's message
//! - The resolved backend, fallback included, obeys conflict and dependency rules
//! - Resolution is deterministic
//! - Selection parsing never panics

use proptest::prelude::*;

use hcl_recipe::flags::{HCL_COMMUNICATION, HCL_COMMUNICATION_PROTOCOL, HCL_LOG_LEVEL};
use hcl_recipe::schema::ProtocolPolicy;
use hcl_recipe::{
    parse_selection, resolve, Backend, Protocol, RecipeError, SchemaVersion, Variant, VariantSet,
};

/// Strategy for generating recipe revisions
fn schema_strategy() -> impl Strategy<Value = SchemaVersion> {
    prop_oneof![
        Just(SchemaVersion::V1),
        Just(SchemaVersion::V2),
        Just(SchemaVersion::V3),
        Just(SchemaVersion::V4),
    ]
}

/// Strategy for a random on/off state of every variant a revision declares
fn states_for(version: SchemaVersion) -> impl Strategy<Value = VariantSet> {
    let decls = hcl_recipe::schema(version).variants;
    prop::collection::vec(any::<bool>(), decls.len()).prop_map(move |states| {
        decls
            .iter()
            .zip(states)
            .fold(VariantSet::defaults(version), |set, (decl, on)| {
                set.with(decl.variant, on)
            })
    })
}

/// Strategy for a revision plus a random selection over its variants
fn variant_set_strategy() -> impl Strategy<Value = VariantSet> {
    schema_strategy().prop_flat_map(states_for)
}

/// Latest revision with rpclib and verbs forced on, everything else random
fn conflicting_set_strategy() -> impl Strategy<Value = VariantSet> {
    states_for(SchemaVersion::V4)
        .prop_map(|set| set.with(Variant::Rpclib, true).with(Variant::Verbs, true))
}

/// Any revision with every backend variant switched off
fn no_backend_strategy() -> impl Strategy<Value = VariantSet> {
    variant_set_strategy().prop_map(|set| {
        let order = set.schema().backend_order;
        order
            .iter()
            .fold(set, |set, (variant, _)| set.with(*variant, false))
    })
}

fn backend_package(backend: Backend) -> &'static str {
    match backend {
        Backend::Thallium => "mochi-thallium",
        Backend::Rpclib => "rpclib",
        Backend::Ucx => "ucx",
    }
}

/// The selection with the fallback backend switched on when nothing else is
fn effective(variants: &VariantSet) -> VariantSet {
    let schema = variants.schema();
    if schema.backend_order.iter().any(|(v, _)| variants.is_enabled(*v)) {
        variants.clone()
    } else {
        variants.clone().with(schema.fallback_backend.variant(), true)
    }
}

fn has_conflict(variants: &VariantSet) -> bool {
    let effective = effective(variants);
    variants
        .schema()
        .conflicts
        .iter()
        .any(|rule| rule.violated_by(&effective))
}

proptest! {
    /// Non-conflicting selections emit exactly one backend and at most one protocol flag
    #[test]
    fn resolution_flag_cardinality(variants in variant_set_strategy()) {
        prop_assume!(!has_conflict(&variants));
        let resolution = resolve(&variants, "/opt/hcl").unwrap();

        prop_assert_eq!(resolution.flags.count(HCL_COMMUNICATION), 1);
        prop_assert!(resolution.flags.count(HCL_COMMUNICATION_PROTOCOL) <= 1);
        prop_assert!(resolution.flags.count(HCL_LOG_LEVEL) <= 1);

        if matches!(variants.schema().protocol, ProtocolPolicy::Decoupled { .. }) {
            prop_assert_eq!(resolution.flags.count(HCL_COMMUNICATION_PROTOCOL), 1);
        }
    }

    /// Conflicting selections fail with the rule's diagnostic and produce no flags
    #[test]
    fn conflicts_fail_atomically(variants in conflicting_set_strategy()) {
        prop_assert!(has_conflict(&variants));
        match resolve(&variants, "/opt/hcl") {
            Err(RecipeError::ConfigurationConflict(message)) => {
                prop_assert!(variants.schema().conflicts.iter().any(|r| r.message == message));
            }
            other => prop_assert!(false, "expected conflict, got {:?}", other),
        }
    }

    /// RPCLIB never runs over verbs, and the backend's package is always pulled in
    #[test]
    fn resolved_backend_is_consistent(variants in variant_set_strategy()) {
        if let Ok(resolution) = resolve(&variants, "/opt/hcl") {
            if resolution.backend == Backend::Rpclib {
                prop_assert_ne!(resolution.protocol, Some(Protocol::Verbs));
            }
            let package = backend_package(resolution.backend);
            prop_assert!(
                resolution.dependencies.iter().any(|d| d.package == package),
                "{} missing for {}", package, variants
            );
        }
    }

    /// With no backend enabled the fallback is held to the same rules
    #[test]
    fn fallback_backend_is_consistent(variants in no_backend_strategy()) {
        let fallback = variants.schema().fallback_backend;
        match resolve(&variants, "/opt/hcl") {
            Ok(resolution) => {
                prop_assert_eq!(resolution.backend, fallback);
                prop_assert!(!has_conflict(&variants));
                prop_assert!(resolution.dependencies.iter().any(|d| d.package == backend_package(fallback)));
                if fallback == Backend::Rpclib {
                    prop_assert_ne!(resolution.protocol, Some(Protocol::Verbs));
                }
            }
            Err(RecipeError::ConfigurationConflict(_)) => prop_assert!(has_conflict(&variants)),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// Resolving the same selection twice gives byte-identical flags
    #[test]
    fn resolution_is_deterministic(variants in variant_set_strategy(), prefix in "/[a-z0-9/]{0,20}") {
        let first = resolve(&variants, &prefix);
        let second = resolve(&variants, &prefix);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.flags.to_strings(), b.flags.to_strings()),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "resolution outcome changed between calls"),
        }
    }

    /// The prefix definition always comes first and carries the prefix verbatim
    #[test]
    fn prefix_flag_first(variants in variant_set_strategy(), prefix in "/[a-z0-9/._-]{0,30}") {
        if let Ok(resolution) = resolve(&variants, &prefix) {
            let first = resolution.flags.iter().next().unwrap();
            prop_assert_eq!(first.to_string(), format!("CMAKE_INSTALL_PREFIX={}", prefix));
        }
    }

    /// Active dependencies are exactly the rules whose predicate holds on the effective selection
    #[test]
    fn dependencies_match_predicates(variants in variant_set_strategy()) {
        if let Ok(resolution) = resolve(&variants, "/opt/hcl") {
            let effective = effective(&variants);
            let expected: Vec<String> = variants
                .schema()
                .dependencies
                .iter()
                .filter(|rule| rule.when.holds(&effective))
                .map(|rule| rule.spec())
                .collect();
            let actual: Vec<String> = resolution.dependencies.iter().map(|d| d.spec.clone()).collect();
            prop_assert_eq!(expected, actual);
        }
    }
}

// =============================================================================
// Selection parsing
// =============================================================================

proptest! {
    /// Arbitrary strings don't crash selection parsing
    #[test]
    fn parse_selection_doesnt_crash(s in ".*") {
        let _ = parse_selection(&s);
    }

    /// Well-formed sigil selections parse to one pair per name
    #[test]
    fn sigil_selections_parse(pairs in prop::collection::vec(("[a-z][a-z0-9-]{0,10}", any::<bool>()), 1..6)) {
        let input: String = pairs
            .iter()
            .map(|(name, on)| format!("{}{}", if *on { '+' } else { '~' }, name))
            .collect();
        let parsed = parse_selection(&input).unwrap();
        prop_assert_eq!(parsed, pairs);
    }

    /// Unknown names never change the variant set
    #[test]
    fn unknown_names_ignored(version in schema_strategy(), name in "zz[a-z]{1,8}", on in any::<bool>()) {
        let set = VariantSet::from_selections(version, [(name.as_str(), on)]);
        prop_assert_eq!(set, VariantSet::defaults(version));
    }
}
