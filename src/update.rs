// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::binding::Bind;
use crate::cse::{group_expressions, LocalVariable};
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::notify::{source_bindings, source_tree, NotifySource};
use crate::utils::remove_all;

use core::cmp::Reverse;

use tracing::debug;

/// Name of the parameter of update methods that receive the new value of an
/// observed expression.
pub const VALUE_PARAMETER: &str = "value";

/// Assignment of an expression to the target of a binding.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct PropertySet {
    /// Index of the binding whose target is assigned.
    pub binding: usize,
    pub expression: ExprRef,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct ExpressionGroup {
    /// Locals in declaration order.
    pub local_variables: Vec<LocalVariable>,
    pub set_expressions: Vec<PropertySet>,
}

/// A notify source as seen from one update method.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct SourceSnapshot {
    pub source: usize,
    /// The owner expression rewritten in terms of the method's locals and parameters.
    pub source_expression: ExprRef,
}

/// A notify property as seen from one update method.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct PropertySnapshot {
    pub source: usize,
    /// Position of the property within its source.
    pub property: usize,
    pub source_expression: ExprRef,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct UpdateMethodData {
    pub parameters: Vec<ExprRef>,
    pub expressions: ExpressionGroup,
    /// Sources refreshed by calling their own update method.
    pub update_notify_sources: Vec<SourceSnapshot>,
    /// Properties refreshed by calling their own update method.
    pub update_notify_properties: Vec<PropertySnapshot>,
    /// Sources whose change events are subscribed to directly by this method.
    pub set_event_handlers: Vec<SourceSnapshot>,
}

/// Synthesize one update method.
///
/// * `bindings` - bindings to be written; those written by nested update methods are
///   removed from it.
/// * `notify_sources` - sources available for subscription in this method.
/// * `notify_source` - the source whose properties this method refreshes, for
///   per-source methods.
/// * `replaced` - expression received as the `value` parameter.
pub fn create_update_method(
    provider: &dyn TypeProvider,
    sources: &[NotifySource],
    binds: &[Bind],
    bindings: &mut Vec<usize>,
    notify_sources: &[usize],
    notify_source: Option<usize>,
    replaced: Option<&ExprRef>,
) -> UpdateMethodData {
    let value = replaced.map(|r| Expr::variable(VALUE_PARAMETER, r.ty().clone()));
    let replace = |e: &ExprRef| match (replaced, &value) {
        (Some(old), Some(new)) => e.clone_replace(old, new),
        _ => e.clone(),
    };

    let inotify = TypeInfo::new(INOTIFY_PROPERTY_CHANGED);
    let mut sources1 = notify_sources.to_vec();

    // Sources refreshed as a whole, largest first.
    let mut sources2: Vec<usize> = sources1
        .iter()
        .copied()
        .filter(|s| {
            sources[*s].properties.len() > 1
                && provider.is_assignable(&inotify, sources[*s].expression.ty())
        })
        .collect();
    sources2.sort_by_key(|s| Reverse(source_bindings(&sources[*s]).len()));

    let mut update_sources = vec![];
    while !sources2.is_empty() {
        let s = sources2.remove(0);
        update_sources.push(s);

        let tree = source_tree(sources, &[s]);
        remove_all(&mut sources2, &tree);
        remove_all(&mut sources1, &tree);
        remove_all(bindings, &source_bindings(&sources[s]));
    }

    let mut candidates: Vec<usize> = sources1.clone();
    if let Some(s) = notify_source {
        candidates.push(s);
    }
    let mut props: Vec<(usize, usize)> = candidates
        .iter()
        .flat_map(|s| (0..sources[*s].properties.len()).map(move |p| (*s, p)))
        .collect();
    props.sort_by_key(|(s, p)| {
        let prop = &sources[*s].properties[*p];
        (
            Reverse(prop.bindings.len()),
            Reverse(source_tree(sources, &prop.dependent_sources).len()),
        )
    });

    let mut update_props = vec![];
    while !props.is_empty() {
        let (s, p) = props.remove(0);
        update_props.push((s, p));

        let prop = &sources[s].properties[p];
        remove_all(bindings, &prop.bindings);
        props.retain(|(s2, p2)| {
            !sources[*s2].properties[*p2]
                .bindings
                .iter()
                .any(|b| prop.bindings.contains(b))
        });
        remove_all(
            &mut sources1,
            &source_tree(sources, &prop.dependent_sources),
        );
    }

    // Expressions grouped together: direct assignments, then the owners of the
    // sources and properties with their own update methods, then the owners of the
    // sources subscribed to here.
    let mut sets: Vec<PropertySet> = bindings
        .iter()
        .filter_map(|b| {
            binds[*b].source_expression.as_ref().map(|e| PropertySet {
                binding: *b,
                expression: replace(e),
            })
        })
        .collect();
    let direct = sets.len();

    let representative = |s: usize| -> usize {
        sources[s]
            .properties
            .first()
            .and_then(|p| p.bindings.first())
            .copied()
            .unwrap_or_default()
    };
    for s in update_sources
        .iter()
        .chain(update_props.iter().map(|(s, _)| s))
        .chain(sources1.iter())
    {
        sets.push(PropertySet {
            binding: representative(*s),
            expression: replace(&sources[*s].expression),
        });
    }

    let mut exprs: Vec<ExprRef> = sets.iter().map(|s| s.expression.clone()).collect();
    let local_variables = group_expressions(&mut exprs);
    let mut rewritten = exprs.into_iter();
    for set in sets.iter_mut() {
        if let Some(e) = rewritten.next() {
            set.expression = e;
        }
    }

    let mut owners = sets.split_off(direct).into_iter().map(|s| s.expression);
    let update_notify_sources = update_sources
        .iter()
        .zip(owners.by_ref())
        .map(|(s, e)| SourceSnapshot {
            source: *s,
            source_expression: e,
        })
        .collect();
    let update_notify_properties = update_props
        .iter()
        .zip(owners.by_ref())
        .map(|((s, p), e)| PropertySnapshot {
            source: *s,
            property: *p,
            source_expression: e,
        })
        .collect();
    let set_event_handlers = sources1
        .iter()
        .zip(owners)
        .map(|(s, e)| SourceSnapshot {
            source: *s,
            source_expression: e,
        })
        .collect();

    debug!(
        assignments = sets.len(),
        locals = local_variables.len(),
        "synthesized update method"
    );

    UpdateMethodData {
        parameters: value.into_iter().collect(),
        expressions: ExpressionGroup {
            local_variables,
            set_expressions: sets,
        },
        update_notify_sources,
        update_notify_properties,
        set_event_handlers,
    }
}
