// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::binding::*;
use crate::dependencies::resolve_dependencies;
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::notify::{get_notify_sources, NotifySource};
use crate::two_way::{group_two_way_bindings, TwoWayBindingData};
use crate::update::{create_update_method, UpdateMethodData};

use alloc::collections::BTreeSet;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compiled bindings of one scope.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct BindingsData {
    pub data_type: TypeInfo,
    pub target_type: Option<TypeInfo>,
    pub bindings: Vec<Bind>,
    pub notify_sources: Vec<NotifySource>,
    pub two_way_events: Vec<TwoWayBindingData>,
    /// Root method setting every binding.
    pub update_method: UpdateMethodData,
}

impl BindingsData {
    /// Bindings written by the root update method directly.
    pub fn root_assignments(&self) -> impl Iterator<Item = &Bind> {
        self.update_method
            .expressions
            .set_expressions
            .iter()
            .map(|s| &self.bindings[s.binding])
    }
}

/// Set the implicit write-back trigger of a binding targeting a dependency object.
///
/// The trigger is the static `<Member>Property` member of the target object's type.
pub fn resolve_dependency_property(
    provider: &dyn TypeProvider,
    bind: &mut Bind,
    dependency_object_type: &TypeInfo,
) {
    if !bind.mode.writes_back()
        || !bind.update_source_events.is_empty()
        || bind.site.target_event.is_some()
        || !provider.is_assignable(dependency_object_type, &bind.site.object.ty)
    {
        return;
    }
    let name = format!("{}Property", bind.site.member_name);
    bind.dependency_property = provider
        .find_member(&bind.site.object.ty, &name)
        .filter(|m| m.is_static);
}

/// Analyze a set of parsed bindings and synthesize their update methods.
///
/// Bindings are numbered in the given order.
pub fn create_bindings_data(
    provider: &dyn TypeProvider,
    mut binds: Vec<Bind>,
    target_type: Option<TypeInfo>,
    data_type: TypeInfo,
    dependency_object_type: Option<&TypeInfo>,
) -> BindingsData {
    for (i, b) in binds.iter_mut().enumerate() {
        b.index = i;
        if let Some(dot) = dependency_object_type {
            resolve_dependency_property(provider, b, dot);
        }
    }

    let mut sources = get_notify_sources(provider, &binds, dependency_object_type);
    resolve_dependencies(&mut sources);

    let inotify = TypeInfo::new(INOTIFY_PROPERTY_CHANGED);
    for si in 0..sources.len() {
        let source = &sources[si];
        if source.properties.len() > 1 && provider.is_assignable(&inotify, source.expression.ty())
        {
            let mut bindings = crate::notify::source_bindings(source);
            let method = create_update_method(
                provider,
                &sources,
                &binds,
                &mut bindings,
                &[],
                Some(si),
                Some(&source.source_expression),
            );
            sources[si].update_method = Some(method);
        }

        for pi in 0..sources[si].properties.len() {
            let prop = &sources[si].properties[pi];
            let mut set_bindings = prop.set_bindings.clone();
            let method = create_update_method(
                provider,
                &sources,
                &binds,
                &mut set_bindings,
                &prop.dependent_sources,
                None,
                Some(&sources[si].expression),
            );
            let prop = &mut sources[si].properties[pi];
            prop.set_bindings = set_bindings;
            prop.update_method = Some(method);
        }
    }

    let mut root_bindings: Vec<usize> = binds
        .iter()
        .filter(|b| b.site.target_event.is_none() && b.mode != BindingMode::OneWayToSource)
        .map(|b| b.index)
        .collect();
    let all_sources: Vec<usize> = (0..sources.len()).collect();
    let update_method = create_update_method(
        provider,
        &sources,
        &binds,
        &mut root_bindings,
        &all_sources,
        None,
        None,
    );
    for snapshot in update_method
        .update_notify_sources
        .iter()
        .chain(update_method.set_event_handlers.iter())
    {
        sources[snapshot.source].source_expression = snapshot.source_expression.clone();
    }

    let two_way_events = group_two_way_bindings(&binds);

    debug!(
        bindings = binds.len(),
        notify_sources = sources.len(),
        two_way_events = two_way_events.len(),
        "created bindings data"
    );

    BindingsData {
        data_type,
        target_type,
        bindings: binds,
        notify_sources: sources,
        two_way_events,
        update_method,
    }
}

/// Options of a [`BindingCompiler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Name of the variable holding the data root in generated code.
    pub data_root: String,
    /// Mode of bindings without `Mode`, `BindBack` or `UpdateSourceEventNames`.
    pub default_mode: BindingMode,
    /// Interface implemented by value converters.
    pub converter_type: Option<String>,
    /// Base type of objects notifying through dependency properties.
    pub dependency_object_type: Option<String>,
    /// Every binding must declare its `DataType`.
    pub require_data_type: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            data_root: "dataRoot".to_string(),
            default_mode: BindingMode::OneTime,
            converter_type: None,
            dependency_object_type: None,
            require_data_type: false,
        }
    }
}

impl CompilerOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Compiles the bindings of one scope, such as one view.
///
/// ```ignore
/// let registry = TypeRegistry::from_json_str(types)?;
/// let mut compiler = BindingCompiler::new(&registry, "App.MainViewModel", "App.MainPage")?;
/// compiler.add_binding(BindingSite::new(label, "Text", string_type, "Person.Name, Mode=OneWay"))?;
/// let data = compiler.compile();
/// ```
pub struct BindingCompiler<'a> {
    provider: &'a dyn TypeProvider,
    options: CompilerOptions,
    data_type: TypeInfo,
    target_type: TypeInfo,
    converter_type: Option<TypeInfo>,
    dependency_object_type: Option<TypeInfo>,
    binds: Vec<Bind>,
    local_index: usize,
    namespaces: BTreeSet<String>,
}

impl<'a> BindingCompiler<'a> {
    pub fn new(provider: &'a dyn TypeProvider, data_type: &str, target_type: &str) -> Result<Self> {
        Self::with_options(provider, data_type, target_type, CompilerOptions::default())
    }

    pub fn with_options(
        provider: &'a dyn TypeProvider,
        data_type: &str,
        target_type: &str,
        options: CompilerOptions,
    ) -> Result<Self> {
        let resolve = |name: &str| {
            provider
                .resolve_type(name, &[])
                .ok_or_else(|| anyhow!("unknown type `{name}`"))
        };
        let data_type = resolve(data_type)?;
        let target_type = resolve(target_type)?;
        let converter_type = options.converter_type.as_deref().map(resolve).transpose()?;
        let dependency_object_type = options
            .dependency_object_type
            .as_deref()
            .map(resolve)
            .transpose()?;

        Ok(Self {
            provider,
            options,
            data_type,
            target_type,
            converter_type,
            dependency_object_type,
            binds: vec![],
            local_index: 0,
            namespaces: BTreeSet::new(),
        })
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Parse the declaration of `site` and add the binding to the scope.
    pub fn add_binding(&mut self, site: BindingSite) -> Result<&Bind> {
        let ctx = BindingContext {
            provider: self.provider,
            source_type: self.data_type.clone(),
            target_type: self.target_type.clone(),
            data_root_name: self.options.data_root.clone(),
            default_mode: self.options.default_mode,
            converter_type: self.converter_type.clone(),
            require_data_type: self.options.require_data_type,
        };
        let bind = match parse_bind(&site, &ctx, &mut self.local_index) {
            Ok(bind) => bind,
            Err(e) => bail!(
                "{}.{}: {}",
                site.object.name,
                site.member_name,
                e.message_for(&site.value)
            ),
        };
        self.namespaces
            .extend(bind.namespaces.iter().map(|n| n.clr_namespace.clone()));
        self.binds.push(bind);
        Ok(&self.binds[self.binds.len() - 1])
    }

    pub fn bindings(&self) -> &[Bind] {
        &self.binds
    }

    /// CLR namespaces referenced by the expressions parsed so far.
    pub fn namespaces(&self) -> &BTreeSet<String> {
        &self.namespaces
    }

    /// Number of fallback locals allocated so far.
    pub fn local_count(&self) -> usize {
        self.local_index
    }

    pub fn compile(self) -> BindingsData {
        create_bindings_data(
            self.provider,
            self.binds,
            Some(self.target_type),
            self.data_type,
            self.dependency_object_type.as_ref(),
        )
    }
}
