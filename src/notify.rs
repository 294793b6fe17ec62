// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Discovery of change-notification sources.
//!
//! Every member or element access in an observed binding is a candidate. Candidates
//! that may raise notifications are grouped by their owner expression into
//! [`NotifySource`]s and, within a source, by the observed member into
//! [`NotifyProperty`]s.

use crate::ast::*;
use crate::binding::Bind;
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::update::UpdateMethodData;
use crate::utils::{push_distinct, select_tree};

use alloc::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

/// Code name and notification name suffix used for indexers.
pub const INDEXER_NAME: &str = "Item";
pub const INDEXER_CHANGED_NAME: &str = "Item[]";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct NotifySource {
    /// The owner expression whose members are observed.
    pub expression: ExprRef,
    /// Working copy of `expression` as rewritten by the root update method.
    pub source_expression: ExprRef,
    pub properties: Vec<NotifyProperty>,
    /// Update method refreshing every property of the source at once.
    pub update_method: Option<UpdateMethodData>,
    /// Subscribe to the generic `PropertyChanged` only after checking that the owner
    /// actually implements `INotifyPropertyChanged`.
    pub check_inotify: bool,
    pub index: usize,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct NotifyProperty {
    /// Index of the owning source.
    pub source: usize,
    /// Observed property, or the indexer.
    pub member: MemberInfo,
    pub property_names: Vec<String>,
    pub property_code_name: String,
    pub expression: ExprRef,
    pub source_expression: ExprRef,
    /// Bindings (by index) reading this property.
    pub bindings: Vec<usize>,
    /// Bindings still written by this property's own update method.
    pub set_bindings: Vec<usize>,
    /// Sources nested inside this property's expression.
    pub dependent_sources: Vec<usize>,
    pub update_method: Option<UpdateMethodData>,
}

impl NotifyProperty {
    pub fn is_indexer(&self) -> bool {
        self.expression.is_element_access()
    }
}

/// Sources in `roots` and every source transitively reachable through the dependents
/// of their properties.
pub fn source_tree(sources: &[NotifySource], roots: &[usize]) -> Vec<usize> {
    select_tree(roots, |s| {
        sources[s]
            .properties
            .iter()
            .flat_map(|p| p.dependent_sources.iter().copied())
            .collect()
    })
}

/// Distinct bindings referencing any property of `source`.
pub fn source_bindings(source: &NotifySource) -> Vec<usize> {
    let mut bindings = vec![];
    for b in source.properties.iter().flat_map(|p| p.bindings.iter()) {
        push_distinct(&mut bindings, *b);
    }
    bindings
}

fn has_backing_member(provider: &dyn TypeProvider, ty: &TypeInfo, name: &str) -> bool {
    provider
        .find_member(ty, &format!("{name}Property"))
        .is_some()
}

/// Decide whether a member or element access can raise change notifications.
///
/// `Some(true)` and `Some(false)` are definite. `None` means the owner might notify,
/// and must be subscribed to through the generic interface after a runtime check.
pub fn check_notifiable(
    provider: &dyn TypeProvider,
    expr: &Expr,
    dependency_object_type: Option<&TypeInfo>,
) -> Option<bool> {
    let (owner, member, marker) = expr.notifiable_parts()?;
    if marker == Some(false) {
        return Some(false);
    }

    let ty = owner.ty();
    if ty.is_array() {
        return Some(false);
    }

    let is_dependency =
        dependency_object_type.is_some_and(|d| provider.is_assignable(d, ty));
    let is_inotify = provider.is_assignable(&TypeInfo::new(INOTIFY_PROPERTY_CHANGED), ty);
    let observable = is_dependency || is_inotify;

    // A sealed class that is not observable can never notify.
    if !observable && !provider.is_interface(ty) && provider.is_sealed(ty) {
        return Some(false);
    }

    if !matches!(expr.kind(), ExprKind::Member { .. }) {
        return match marker {
            Some(true) if is_inotify => Some(true),
            Some(true) => None,
            _ => Some(false),
        };
    }

    if member.is_static {
        return Some(false);
    }

    if marker.is_none() {
        match member.read_only_attribute() {
            Some(true) => return if is_inotify { Some(true) } else { None },
            None if member.is_property() && member.is_read_only => return Some(false),
            _ => (),
        }
        if !member.is_property() || !observable {
            return Some(false);
        }
    } else if !observable {
        return None;
    }

    // Dependency objects notify only through a `<Name>Property` backing member.
    if !is_inotify && !has_backing_member(provider, ty, &member.name) {
        return Some(false);
    }

    Some(true)
}

struct Candidate {
    bind: usize,
    expr: ExprRef,
    notify: Option<bool>,
}

/// Group the notifiable sub-expressions of all observed bindings.
///
/// Sources are ordered by their owner key and numbered in that order. Bindings are
/// identified by their position in `binds`.
pub fn get_notify_sources(
    provider: &dyn TypeProvider,
    binds: &[Bind],
    dependency_object_type: Option<&TypeInfo>,
) -> Vec<NotifySource> {
    let mut groups: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
    for (idx, bind) in binds.iter().enumerate() {
        if bind.site.target_event.is_some() || !bind.mode.observes_source() {
            continue;
        }
        let Some(source) = &bind.source_expression else {
            continue;
        };
        for node in source.enumerate_tree() {
            let Some((owner, _, _)) = node.notifiable_parts() else {
                continue;
            };
            let notify = check_notifiable(provider, &node, dependency_object_type);
            if notify == Some(false) {
                continue;
            }
            groups
                .entry(owner.key().to_string())
                .or_default()
                .push(Candidate {
                    bind: idx,
                    expr: node.clone(),
                    notify,
                });
        }
    }

    let mut sources: Vec<NotifySource> = vec![];
    for candidates in groups.into_values() {
        let index = sources.len();
        let Some((owner, _, _)) = candidates[0].expr.notifiable_parts() else {
            continue;
        };
        let owner = owner.clone();

        let mut by_member: IndexMap<(bool, String), Vec<&Candidate>> = IndexMap::new();
        for c in &candidates {
            if let Some((_, member, _)) = c.expr.notifiable_parts() {
                let key = if c.expr.is_element_access() {
                    (true, INDEXER_NAME.to_string())
                } else {
                    (false, member.name.to_string())
                };
                by_member.entry(key).or_default().push(c);
            }
        }

        let properties = by_member
            .into_iter()
            .filter_map(|((indexer, code_name), group)| {
                let first = group[0];
                let (_, member, _) = first.expr.notifiable_parts()?;
                let mut bindings = vec![];
                for c in &group {
                    push_distinct(&mut bindings, c.bind);
                }
                let mut property_names = vec![code_name.clone()];
                if indexer {
                    property_names.push(INDEXER_CHANGED_NAME.to_string());
                }
                Some(NotifyProperty {
                    source: index,
                    member: member.clone(),
                    property_names,
                    property_code_name: code_name,
                    expression: first.expr.clone(),
                    source_expression: first.expr.clone(),
                    set_bindings: bindings.clone(),
                    bindings,
                    dependent_sources: vec![],
                    update_method: None,
                })
            })
            .collect();

        sources.push(NotifySource {
            expression: owner.clone(),
            source_expression: owner,
            properties,
            update_method: None,
            check_inotify: candidates.iter().any(|c| c.notify.is_none()),
            index,
        });
    }

    debug!(count = sources.len(), "found notify sources");
    sources
}
