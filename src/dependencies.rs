// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::notify::{source_tree, NotifySource};
use crate::utils::remove_all;

use core::cmp::Ordering;

use tracing::{debug, trace};

/// Link every notify property to the sources nested inside its expression.
///
/// When the value of a property changes, every source whose owner expression contains
/// that property must be re-subscribed, and the bindings of those sources are written
/// by the nested sources' own update methods. Such bindings are removed from the
/// property's `set_bindings`.
///
/// Sources are visited in descending order of their owner key, so that nested sources
/// have their dependents attached before the sources containing them. A nested source
/// already reachable through an attached dependent is not attached again.
pub fn resolve_dependencies(sources: &mut [NotifySource]) {
    let owner_keys: Vec<String> = sources
        .iter()
        .map(|s| s.expression.strip_parens_and_casts().key().to_string())
        .collect();

    let mut order: Vec<usize> = (0..sources.len()).collect();
    order.sort_by(|a, b| match owner_keys[*b].cmp(&owner_keys[*a]) {
        Ordering::Equal => a.cmp(b),
        o => o,
    });

    let mut edges = 0;
    for si in order {
        for pi in 0..sources[si].properties.len() {
            let prop_key = sources[si].properties[pi].expression.key().to_string();
            let nested: Vec<usize> = (0..sources.len())
                .filter(|g| *g != si)
                .filter(|g| {
                    sources[*g]
                        .expression
                        .strip_parens_and_casts()
                        .contains_key(&prop_key)
                })
                .collect();

            for g in nested {
                let reachable =
                    source_tree(sources, &sources[si].properties[pi].dependent_sources);
                let covered: Vec<usize> = sources[g]
                    .properties
                    .iter()
                    .flat_map(|p| p.bindings.iter().copied())
                    .collect();

                let prop = &mut sources[si].properties[pi];
                if !reachable.contains(&g) {
                    trace!(
                        property = prop.expression.key(),
                        dependent = g,
                        "attached dependent source"
                    );
                    prop.dependent_sources.push(g);
                    edges += 1;
                }
                remove_all(&mut prop.set_bindings, &covered);
            }
        }
    }

    debug!(edges, "resolved notify source dependencies");
}
