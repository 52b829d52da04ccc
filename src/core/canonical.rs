//! Reference canonicalization
//!
//! A deploy lockfile is consumed from inside the target workspace, where the
//! project root no longer exists. References the target resolves to itself
//! by its project-relative path (`workspace:apps/web`) would dangle there, so
//! they are rewritten to the portable self reference `workspace:.`. The
//! rewrite covers package references, descriptor ranges, and the dependency
//! ranges recorded on each package.
//!
//! References to *other* deploy targets are left exactly as resolved. Those
//! workspaces ship their own lockfiles; this one only describes the target.

use std::collections::BTreeSet;

use crate::config::defaults::SELF_REFERENCE;
use crate::core::resolver::ResolvedGraph;

/// Counters for one canonicalization pass, logged per target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalizeStats {
    /// Package references rewritten to `workspace:.`
    pub rewritten_references: usize,
    /// Descriptor and dependency ranges rewritten to `workspace:.`
    pub rewritten_ranges: usize,
    /// References to sibling deploy targets, passed through verbatim
    pub sibling_references: usize,
}

/// Rewrite the target's own workspace references to the portable form.
///
/// `target_reference` is the target's `workspace:<rel-path>` reference;
/// `deploy_references` holds the references of every deploy target of the
/// current run. Applying the pass twice is a no-op: the portable form never
/// equals a project-relative reference for a non-root target, and for the
/// root target the rewrite is the identity to begin with.
pub fn canonicalize(
    graph: &mut ResolvedGraph,
    target_reference: &str,
    deploy_references: &BTreeSet<String>,
) -> CanonicalizeStats {
    let mut stats = CanonicalizeStats::default();

    for record in &mut graph.records {
        if record.reference == target_reference {
            record.reference = SELF_REFERENCE.to_string();
            stats.rewritten_references += 1;
        } else if deploy_references.contains(&record.reference) {
            // Sibling deploy target reached through a dependency edge. Its
            // reference stays project-relative.
            stats.sibling_references += 1;
        }

        for range in record.dependencies.values_mut() {
            if range.as_str() == target_reference {
                *range = SELF_REFERENCE.to_string();
                stats.rewritten_ranges += 1;
            }
        }
    }

    for resolution in &mut graph.resolutions {
        if resolution.descriptor.range == target_reference {
            resolution.descriptor.range = SELF_REFERENCE.to_string();
            stats.rewritten_ranges += 1;
        }
        if resolution.reference == target_reference {
            resolution.reference = SELF_REFERENCE.to_string();
        }
    }

    tracing::debug!(
        reference = target_reference,
        references = stats.rewritten_references,
        ranges = stats.rewritten_ranges,
        siblings = stats.sibling_references,
        "canonicalized workspace references"
    );
    stats
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::core::resolver::{Descriptor, PackageRecord, Resolution};

    fn record(name: &str, version: &str, reference: &str, deps: &[(&str, &str)]) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: version.to_string(),
            reference: reference.to_string(),
            checksum: None,
            dependencies: deps
                .iter()
                .map(|(n, r)| ((*n).to_string(), (*r).to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn resolution(name: &str, range: &str, reference: &str) -> Resolution {
        Resolution {
            descriptor: Descriptor::new(name, range),
            reference: reference.to_string(),
        }
    }

    fn web_graph() -> ResolvedGraph {
        ResolvedGraph {
            records: vec![
                record(
                    "web",
                    "1.0.0",
                    "workspace:apps/web",
                    &[("shared", "workspace:libs/shared"), ("lodash", "^4.17.0")],
                ),
                record("shared", "2.0.0", "workspace:libs/shared", &[]),
                record("lodash", "4.17.21", "4.17.21", &[]),
            ],
            resolutions: vec![
                resolution("web", "workspace:apps/web", "workspace:apps/web"),
                resolution("shared", "workspace:libs/shared", "workspace:libs/shared"),
                resolution("lodash", "^4.17.0", "4.17.21"),
            ],
        }
    }

    #[test]
    fn rewrites_target_self_references() {
        let mut graph = web_graph();
        let deploy_refs = BTreeSet::from(["workspace:apps/web".to_string()]);

        let stats = canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);

        assert_eq!(stats.rewritten_references, 1);
        assert_eq!(graph.records[0].reference, "workspace:.");
        assert_eq!(graph.resolutions[0].descriptor.range, "workspace:.");
        assert_eq!(graph.resolutions[0].reference, "workspace:.");
    }

    #[test]
    fn leaves_non_target_workspace_references_alone() {
        let mut graph = web_graph();
        let deploy_refs = BTreeSet::from(["workspace:apps/web".to_string()]);

        canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);

        assert_eq!(graph.records[1].reference, "workspace:libs/shared");
        assert_eq!(
            graph.records[0].dependencies["shared"],
            "workspace:libs/shared"
        );
        assert_eq!(graph.resolutions[1].descriptor.range, "workspace:libs/shared");
    }

    #[test]
    fn leaves_registry_references_alone() {
        let mut graph = web_graph();
        let deploy_refs = BTreeSet::from(["workspace:apps/web".to_string()]);

        canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);

        assert_eq!(graph.records[2].reference, "4.17.21");
        assert_eq!(graph.resolutions[2].descriptor.range, "^4.17.0");
    }

    #[test]
    fn rewrites_dependency_ranges_pointing_at_target() {
        let mut graph = ResolvedGraph {
            records: vec![
                record("api", "1.0.0", "workspace:apps/api", &[]),
                record(
                    "plugin",
                    "0.5.0",
                    "workspace:libs/plugin",
                    &[("api", "workspace:apps/api")],
                ),
            ],
            resolutions: vec![
                resolution("api", "workspace:apps/api", "workspace:apps/api"),
                resolution("plugin", "workspace:libs/plugin", "workspace:libs/plugin"),
                resolution("api", "workspace:apps/api", "workspace:apps/api"),
            ],
        };
        let deploy_refs = BTreeSet::from(["workspace:apps/api".to_string()]);

        let stats = canonicalize(&mut graph, "workspace:apps/api", &deploy_refs);

        assert_eq!(graph.records[1].dependencies["api"], "workspace:.");
        assert!(stats.rewritten_ranges >= 2);
    }

    #[test]
    fn counts_sibling_deploy_references_without_touching_them() {
        let mut graph = ResolvedGraph {
            records: vec![
                record(
                    "web",
                    "1.0.0",
                    "workspace:apps/web",
                    &[("api", "workspace:apps/api")],
                ),
                record("api", "1.1.0", "workspace:apps/api", &[]),
            ],
            resolutions: vec![
                resolution("web", "workspace:apps/web", "workspace:apps/web"),
                resolution("api", "workspace:apps/api", "workspace:apps/api"),
            ],
        };
        let deploy_refs = BTreeSet::from([
            "workspace:apps/web".to_string(),
            "workspace:apps/api".to_string(),
        ]);

        let stats = canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);

        assert_eq!(stats.sibling_references, 1);
        assert_eq!(graph.records[1].reference, "workspace:apps/api");
        assert_eq!(graph.records[0].dependencies["api"], "workspace:apps/api");
    }

    #[test]
    fn applying_twice_changes_nothing_more() {
        let mut graph = web_graph();
        let deploy_refs = BTreeSet::from(["workspace:apps/web".to_string()]);

        canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);
        let first: Vec<String> = graph.records.iter().map(|r| r.resolution()).collect();

        let stats = canonicalize(&mut graph, "workspace:apps/web", &deploy_refs);
        let second: Vec<String> = graph.records.iter().map(|r| r.resolution()).collect();

        assert_eq!(first, second);
        assert_eq!(stats.rewritten_references, 0);
        assert_eq!(stats.rewritten_ranges, 0);
    }

    fn any_reference() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("workspace:apps/web".to_string()),
            Just("workspace:apps/api".to_string()),
            Just("workspace:libs/shared".to_string()),
            Just("workspace:.".to_string()),
            Just("4.17.21".to_string()),
            Just("^4.17.0".to_string()),
        ]
    }

    fn any_graph() -> impl Strategy<Value = ResolvedGraph> {
        let records = prop::collection::vec(
            (
                "[a-d]{1,3}",
                any_reference(),
                prop::collection::btree_map("[a-d]{1,3}", any_reference(), 0..3),
            )
                .prop_map(|(name, reference, dependencies)| PackageRecord {
                    name,
                    version: "1.0.0".to_string(),
                    reference,
                    checksum: None,
                    dependencies,
                }),
            0..4,
        );
        let resolutions = prop::collection::vec(
            ("[a-d]{1,3}", any_reference(), any_reference()).prop_map(
                |(name, range, reference)| Resolution {
                    descriptor: Descriptor::new(&name, &range),
                    reference,
                },
            ),
            0..4,
        );
        (records, resolutions)
            .prop_map(|(records, resolutions)| ResolvedGraph { records, resolutions })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// A second pass over an already canonicalized graph is the identity
        /// and, for a non-root target, rewrites nothing.
        #[test]
        fn prop_second_pass_is_the_identity(
            mut graph in any_graph(),
            target in any_reference(),
            deploy in prop::collection::btree_set(any_reference(), 0..3),
        ) {
            canonicalize(&mut graph, &target, &deploy);
            let once = graph.clone();

            let stats = canonicalize(&mut graph, &target, &deploy);

            prop_assert_eq!(&graph, &once);
            if target != "workspace:." {
                prop_assert_eq!(stats.rewritten_references, 0);
                prop_assert_eq!(stats.rewritten_ranges, 0);
            }
        }
    }
}
