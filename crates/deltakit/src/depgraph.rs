//! Dependency graph resolution for service ordering
//!
//! Builds a directed graph from service `depends_on` edges restricted to the
//! entities in the action set, then orders it with an iterative Kahn's
//! algorithm. Edges to dependencies absent from the set are ignored - an
//! absent dependency is assumed already satisfied or unaffected.

use crate::snapshot::Entity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A dependency cycle that had to be broken to produce a linear order.
///
/// Non-fatal: execution proceeds with a deterministic break, but the cycle
/// members are surfaced so the operator can see the ordering is best-effort.
/// `members` names the services on the cycle itself; services merely blocked
/// behind it are not listed, and disjoint cycles warn separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWarning {
    pub members: Vec<String>,
}

impl std::fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dependency cycle among: {}", self.members.join(", "))
    }
}

/// Linear orderings of a set of services
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Every dependency precedes its dependents
    pub start_order: Vec<String>,
    pub warnings: Vec<CycleWarning>,
}

impl Resolution {
    /// Every service precedes its dependencies - the reverse of start order
    pub fn stop_order(&self) -> Vec<String> {
        self.start_order.iter().rev().cloned().collect()
    }
}

/// Order service entities so dependencies start before their dependents.
///
/// Input order is the delta order and doubles as the tie-break: when several
/// services are ready, the one that appeared earliest wins (then name, for
/// stability against equal positions). Repeated runs on identical input
/// produce identical orderings.
///
/// A cycle is broken by force-releasing the cycle member with the lowest
/// tie-break key; that member's cycle is reported in a [`CycleWarning`].
pub fn resolve(services: &[&Entity]) -> Resolution {
    // Insertion order preserves delta order for the tie-break.
    let mut deps: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for entity in services {
        let in_set = entity
            .depends_on
            .iter()
            .map(String::as_str)
            .filter(|dep| services.iter().any(|e| e.name == *dep))
            .collect();
        deps.insert(entity.name.as_str(), in_set);
    }

    let mut in_degree: HashMap<&str, usize> =
        deps.iter().map(|(name, d)| (*name, d.len())).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, d) in &deps {
        for dep in d {
            dependents.entry(*dep).or_default().push(*name);
        }
    }

    let mut start_order = Vec::with_capacity(deps.len());
    let mut warnings = Vec::new();
    let mut remaining = deps.len();

    while remaining > 0 {
        let next = deps
            .keys()
            .filter(|name| in_degree.get(*name).is_some_and(|d| *d == 0))
            .min_by_key(|name| (deps.get_index_of(*name), **name))
            .copied();

        let name = match next {
            Some(name) => name,
            None => {
                // Every remaining service is blocked: there is a cycle. The
                // blocked set also holds services that merely depend on one,
                // so the warning is narrowed to the cycle itself: the victim
                // is the lowest-keyed service that can reach itself, and the
                // members are the services on a dependency path both from
                // and to it.
                let mut blocked: Vec<&str> = deps
                    .keys()
                    .filter(|name| in_degree.get(*name).is_some_and(|d| *d > 0))
                    .copied()
                    .collect();
                blocked.sort_by_key(|name| (deps.get_index_of(name), *name));
                let blocked_set: HashSet<&str> = blocked.iter().copied().collect();

                let victim = blocked
                    .iter()
                    .find(|name| {
                        reach(name, &blocked_set, |n| edges_of(&deps, n)).contains(*name)
                    })
                    .copied()
                    .unwrap_or(blocked[0]);
                let forward = reach(victim, &blocked_set, |n| edges_of(&deps, n));
                let backward = reach(victim, &blocked_set, |n| {
                    dependents.get(n).cloned().unwrap_or_default()
                });
                warnings.push(CycleWarning {
                    members: blocked
                        .iter()
                        .filter(|n| forward.contains(**n) && backward.contains(**n))
                        .map(ToString::to_string)
                        .collect(),
                });

                in_degree.insert(victim, 0);
                victim
            }
        };

        in_degree.remove(name);
        start_order.push(name.to_string());
        remaining -= 1;

        if let Some(down) = dependents.get(name) {
            for dependent in down {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree = degree.saturating_sub(1);
                }
            }
        }
    }

    Resolution {
        start_order,
        warnings,
    }
}

fn edges_of<'a>(deps: &IndexMap<&'a str, Vec<&'a str>>, name: &str) -> Vec<&'a str> {
    deps.get(name).cloned().unwrap_or_default()
}

/// Services reachable from `from` along `edges`, restricted to the blocked
/// set. `from` itself is included only when a path leads back to it.
fn reach<'a>(
    from: &str,
    blocked: &HashSet<&'a str>,
    mut edges: impl FnMut(&str) -> Vec<&'a str>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    let mut stack = edges(from);
    while let Some(node) = stack.pop() {
        if blocked.contains(node) && seen.insert(node) {
            stack.extend(edges(node));
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ServiceState;
    use std::collections::BTreeSet;

    fn svc(name: &str, deps: &[&str]) -> Entity {
        Entity::service(
            name,
            ServiceState::Running,
            deps.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
        )
    }

    fn order(entities: &[Entity]) -> Resolution {
        let refs: Vec<&Entity> = entities.iter().collect();
        resolve(&refs)
    }

    #[test]
    fn dependencies_start_first() {
        let entities = vec![svc("s2", &["s1"]), svc("s1", &[])];
        let res = order(&entities);
        assert_eq!(res.start_order, vec!["s1", "s2"]);
        assert_eq!(res.stop_order(), vec!["s2", "s1"]);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn absent_dependencies_are_ignored() {
        let entities = vec![svc("s1", &["not-in-set"])];
        let res = order(&entities);
        assert_eq!(res.start_order, vec!["s1"]);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn ties_break_by_input_order() {
        let entities = vec![svc("zeta", &[]), svc("alpha", &[]), svc("mid", &["zeta"])];
        let res = order(&entities);
        assert_eq!(res.start_order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn diamond_orders_root_first_and_join_last() {
        let entities = vec![
            svc("d", &["b", "c"]),
            svc("b", &["a"]),
            svc("c", &["a"]),
            svc("a", &[]),
        ];
        let res = order(&entities);
        assert_eq!(res.start_order[0], "a");
        assert_eq!(res.start_order[3], "d");
    }

    #[test]
    fn cycle_is_broken_with_warning() {
        let entities = vec![svc("a", &["b"]), svc("b", &["a"]), svc("c", &[])];
        let res = order(&entities);

        assert_eq!(res.start_order.len(), 3);
        assert_eq!(res.warnings.len(), 1);
        assert_eq!(res.warnings[0].members, vec!["a", "b"]);
        // Break victim is the earliest blocked member.
        assert_eq!(
            res.start_order,
            vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn cycle_warning_excludes_mere_dependents() {
        // c depends on the a<->b cycle without being part of it.
        let entities = vec![svc("c", &["a"]), svc("a", &["b"]), svc("b", &["a"])];
        let res = order(&entities);

        assert_eq!(res.warnings.len(), 1);
        assert_eq!(res.warnings[0].members, vec!["a", "b"]);
        // Breaking a releases both c and b; c comes first by input order.
        assert_eq!(res.start_order, vec!["a", "c", "b"]);
    }

    #[test]
    fn disjoint_cycles_warn_separately() {
        let entities = vec![
            svc("a", &["b"]),
            svc("b", &["a"]),
            svc("c", &["d"]),
            svc("d", &["c"]),
        ];
        let res = order(&entities);

        assert_eq!(res.warnings.len(), 2);
        assert_eq!(res.warnings[0].members, vec!["a", "b"]);
        assert_eq!(res.warnings[1].members, vec!["c", "d"]);
        assert_eq!(res.start_order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let entities = vec![
            svc("w", &[]),
            svc("x", &["w"]),
            svc("y", &["w"]),
            svc("z", &["x", "y"]),
        ];
        let first = order(&entities);
        let second = order(&entities);
        assert_eq!(first.start_order, second.start_order);
    }
}
