// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::binding::{Bind, TargetObject};
use crate::metadata::{EventInfo, MemberInfo};
use crate::utils::push_distinct;
use crate::*;

use indexmap::IndexMap;

/// One write-back handler: all bindings of a target object triggered by the same
/// event or dependency property.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct TwoWayBindingData {
    pub object: TargetObject,
    /// Indexes of the bindings written back by the handler.
    pub bindings: Vec<usize>,
    /// Explicit trigger events. Empty for dependency property triggers.
    pub target_changed_events: Vec<EventInfo>,
    pub dependency_property: Option<MemberInfo>,
    pub index: usize,
}

/// Group the write-back bindings into handlers.
///
/// Groups triggered by explicit `UpdateSourceEventNames` events come first, keyed by
/// target object and event name, followed by groups keyed by target object and
/// dependency property. Bindings with neither trigger get no handler.
pub fn group_two_way_bindings(binds: &[Bind]) -> Vec<TwoWayBindingData> {
    let mut explicit: IndexMap<(Rc<str>, Rc<str>), TwoWayBindingData> = IndexMap::new();
    let mut implicit: IndexMap<(Rc<str>, Rc<str>), TwoWayBindingData> = IndexMap::new();

    let new_group = |b: &Bind| TwoWayBindingData {
        object: b.site.object.clone(),
        bindings: vec![],
        target_changed_events: vec![],
        dependency_property: None,
        index: 0,
    };

    for (idx, b) in binds.iter().enumerate() {
        if !b.mode.writes_back() {
            continue;
        }
        if !b.update_source_events.is_empty() {
            for event in &b.update_source_events {
                let group = explicit
                    .entry((b.site.object.name.clone(), event.name.clone()))
                    .or_insert_with(|| new_group(b));
                push_distinct(&mut group.target_changed_events, event.clone());
                push_distinct(&mut group.bindings, idx);
            }
        } else if let Some(dp) = &b.dependency_property {
            let group = implicit
                .entry((b.site.object.name.clone(), dp.name.clone()))
                .or_insert_with(|| TwoWayBindingData {
                    dependency_property: Some(dp.clone()),
                    ..new_group(b)
                });
            push_distinct(&mut group.bindings, idx);
        }
    }

    explicit
        .into_values()
        .chain(implicit.into_values())
        .enumerate()
        .map(|(index, group)| TwoWayBindingData { index, ..group })
        .collect()
}
