// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type metadata consumed by the binding compiler.
//!
//! The compiler never inspects assemblies itself. Everything it needs to know about
//! the host type system goes through the [`TypeProvider`] trait. [`TypeRegistry`] is
//! an in-memory provider populated from serde-deserialized type descriptions.

use crate::*;

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod well_known {
    pub const OBJECT: &str = "System.Object";
    pub const STRING: &str = "System.String";
    pub const BOOLEAN: &str = "System.Boolean";
    pub const CHAR: &str = "System.Char";
    pub const INT32: &str = "System.Int32";
    pub const INT64: &str = "System.Int64";
    pub const SINGLE: &str = "System.Single";
    pub const DOUBLE: &str = "System.Double";
    pub const DECIMAL: &str = "System.Decimal";
    pub const VOID: &str = "System.Void";
    pub const TYPE: &str = "System.Type";
    pub const EVENT_HANDLER: &str = "System.EventHandler";
    pub const TASK: &str = "System.Threading.Tasks.Task";
    pub const INOTIFY_PROPERTY_CHANGED: &str = "System.ComponentModel.INotifyPropertyChanged";
    pub const READ_ONLY_ATTRIBUTE: &str = "System.ComponentModel.ReadOnlyAttribute";

    /// Pseudo type of the `null` literal.
    pub const NULL: &str = "<null>";
}

use well_known::*;

lazy_static! {
    static ref TYPE_ALIASES: BTreeMap<&'static str, &'static str> = {
        let mut m = BTreeMap::new();
        m.insert("object", OBJECT);
        m.insert("string", STRING);
        m.insert("bool", BOOLEAN);
        m.insert("char", CHAR);
        m.insert("int", INT32);
        m.insert("long", INT64);
        m.insert("float", SINGLE);
        m.insert("double", DOUBLE);
        m.insert("decimal", DECIMAL);
        m
    };

    // Implicit numeric conversions: source -> targets.
    static ref NUMERIC_WIDENING: BTreeMap<&'static str, &'static [&'static str]> = {
        let mut m: BTreeMap<&'static str, &'static [&'static str]> = BTreeMap::new();
        m.insert(CHAR, &[INT32, INT64, SINGLE, DOUBLE, DECIMAL]);
        m.insert(INT32, &[INT64, SINGLE, DOUBLE, DECIMAL]);
        m.insert(INT64, &[SINGLE, DOUBLE, DECIMAL]);
        m.insert(SINGLE, &[DOUBLE]);
        m
    };
}

/// Look up the full type name for a keyword alias such as `int`.
pub fn type_alias(name: &str) -> Option<&'static str> {
    TYPE_ALIASES.get(name).copied()
}

/// Reference to a resolved type. Arrays are spelled `T[]`; a trailing `?` marks the
/// reference as nullable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeInfo {
    name: Rc<str>,
    nullable: bool,
}

impl TypeInfo {
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        match name.strip_suffix('?') {
            Some(n) => Self {
                name: n.into(),
                nullable: true,
            },
            None => Self {
                name: name.into(),
                nullable: false,
            },
        }
    }

    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    pub fn null() -> Self {
        Self::new(NULL)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self {
            name: self.name.clone(),
            nullable,
        }
    }

    pub fn is_null(&self) -> bool {
        &*self.name == NULL
    }

    pub fn is(&self, name: &str) -> bool {
        &*self.name == name
    }

    pub fn is_array(&self) -> bool {
        self.name.ends_with("[]")
    }

    pub fn element_type(&self) -> Option<TypeInfo> {
        self.name.strip_suffix("[]").map(TypeInfo::new)
    }

    pub fn array_of(&self) -> TypeInfo {
        TypeInfo::new(&format!("{}[]", self.name))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(&*self.name, INT32 | INT64 | SINGLE | DOUBLE | DECIMAL | CHAR)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for TypeInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TypeInfo::new(&s))
    }
}

fn void_type() -> TypeInfo {
    TypeInfo::new(VOID)
}

fn event_handler_type() -> TypeInfo {
    TypeInfo::new(EVENT_HANDLER)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberKind {
    Property,
    Field,
    Method,
}

/// A resolved property, field or method.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct MemberInfo {
    pub name: Rc<str>,
    pub kind: MemberKind,
    pub declaring_type: TypeInfo,
    /// Property/field type, or method return type.
    pub ty: TypeInfo,
    pub is_static: bool,
    /// Get-only property.
    pub is_read_only: bool,
    pub parameters: Rc<[ParameterInfo]>,
    pub attributes: Rc<[AttributeInfo]>,
}

impl MemberInfo {
    /// A private field synthesized by the compiler (e.g. an injected resource).
    pub fn field(name: &str, declaring_type: TypeInfo, ty: TypeInfo) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            declaring_type,
            ty,
            is_static: false,
            is_read_only: false,
            parameters: Rc::from(Vec::new()),
            attributes: Rc::from(Vec::new()),
        }
    }

    pub fn is_property(&self) -> bool {
        self.kind == MemberKind::Property
    }

    pub fn is_indexer(&self) -> bool {
        self.kind == MemberKind::Property && !self.parameters.is_empty()
    }

    pub fn attribute(&self, type_name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.type_name == type_name)
    }

    /// Value of `[ReadOnly(x)]`, if the attribute is present.
    pub fn read_only_attribute(&self) -> Option<bool> {
        self.attribute(READ_ONLY_ATTRIBUTE)
            .map(|a| a.args.first().and_then(|v| v.as_bool()).unwrap_or(true))
    }

    fn required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.optional).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct EventInfo {
    pub name: Rc<str>,
    pub declaring_type: TypeInfo,
    pub handler_type: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub readonly: bool,
    /// Non-empty for indexers.
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default = "void_type")]
    pub returns: TypeInfo,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub name: String,
    #[serde(default = "event_handler_type")]
    pub handler: TypeInfo,
}

/// Description of one type, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub sealed: bool,
    #[serde(default)]
    pub base: Option<TypeInfo>,
    #[serde(default)]
    pub interfaces: Vec<TypeInfo>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

impl TypeDef {
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            sealed: matches!(kind, TypeKind::Struct | TypeKind::Enum),
            base: None,
            interfaces: vec![],
            properties: vec![],
            fields: vec![],
            methods: vec![],
            events: vec![],
        }
    }

    fn type_info(&self) -> TypeInfo {
        TypeInfo::new(&self.name)
    }

    fn property_info(&self, p: &PropertyDef) -> MemberInfo {
        MemberInfo {
            name: p.name.as_str().into(),
            kind: MemberKind::Property,
            declaring_type: self.type_info(),
            ty: p.ty.clone(),
            is_static: p.is_static,
            is_read_only: p.readonly,
            parameters: p.parameters.clone().into(),
            attributes: p.attributes.clone().into(),
        }
    }

    fn field_info(&self, f: &FieldDef) -> MemberInfo {
        MemberInfo {
            name: f.name.as_str().into(),
            kind: MemberKind::Field,
            declaring_type: self.type_info(),
            ty: f.ty.clone(),
            is_static: f.is_static,
            is_read_only: false,
            parameters: Rc::from(Vec::new()),
            attributes: f.attributes.clone().into(),
        }
    }

    fn method_info(&self, m: &MethodDef) -> MemberInfo {
        MemberInfo {
            name: m.name.as_str().into(),
            kind: MemberKind::Method,
            declaring_type: self.type_info(),
            ty: m.returns.clone(),
            is_static: m.is_static,
            is_read_only: true,
            parameters: m.parameters.clone().into(),
            attributes: Rc::from(Vec::new()),
        }
    }
}

/// A markup namespace declaration visible at a binding site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(rename = "namespace")]
    pub clr_namespace: String,
}

impl Namespace {
    pub fn new(prefix: Option<&str>, clr_namespace: &str) -> Self {
        Self {
            prefix: prefix.map(|p| p.to_string()),
            clr_namespace: clr_namespace.to_string(),
        }
    }
}

/// Source of type, member, event and attribute information.
///
/// Implementors only have to supply [`TypeProvider::type_def`]; everything else has a
/// default implementation walking base types and interfaces.
pub trait TypeProvider {
    fn type_def(&self, name: &str) -> Option<&TypeDef>;

    /// Resolve a type name against the in-scope namespaces. Returns the namespace
    /// through which the name was found, if any.
    fn find_type<'n>(
        &self,
        name: &str,
        namespaces: &'n [Namespace],
    ) -> Option<(TypeInfo, Option<&'n Namespace>)> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return self
                .find_type(element, namespaces)
                .map(|(t, ns)| (t.array_of(), ns));
        }
        if let Some(alias) = type_alias(name) {
            return Some((TypeInfo::new(alias), None));
        }
        if let Some((prefix, local)) = name.split_once(':') {
            let ns = namespaces
                .iter()
                .find(|n| n.prefix.as_deref() == Some(prefix.trim()))?;
            let full = format!("{}.{}", ns.clr_namespace, local.trim());
            return self
                .type_def(&full)
                .map(|def| (TypeInfo::new(&def.name), Some(ns)));
        }
        if let Some(def) = self.type_def(name) {
            return Some((TypeInfo::new(&def.name), None));
        }
        for ns in namespaces.iter().filter(|n| n.prefix.is_none()) {
            let full = format!("{}.{}", ns.clr_namespace, name);
            if let Some(def) = self.type_def(&full) {
                return Some((TypeInfo::new(&def.name), Some(ns)));
            }
        }
        let system = format!("System.{name}");
        self.type_def(&system)
            .map(|def| (TypeInfo::new(&def.name), None))
    }

    fn resolve_type(&self, name: &str, namespaces: &[Namespace]) -> Option<TypeInfo> {
        self.find_type(name, namespaces).map(|(t, _)| t)
    }

    /// The type itself followed by its base classes, ending with `System.Object`.
    fn base_chain(&self, ty: &TypeInfo) -> Vec<TypeInfo> {
        let mut chain = vec![ty.with_nullable(false)];
        let mut current = self.type_def(ty.name());
        while let Some(def) = current {
            match &def.base {
                Some(base) if !chain.iter().any(|t| t.is(base.name())) => {
                    chain.push(base.with_nullable(false));
                    current = self.type_def(base.name());
                }
                _ => break,
            }
        }
        if !chain.iter().any(|t| t.is(OBJECT)) {
            chain.push(TypeInfo::object());
        }
        chain
    }

    /// Every type `ty` converts to by reference: base classes and all interfaces.
    fn supertypes(&self, ty: &TypeInfo) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue = vec![ty.with_nullable(false)];
        while let Some(t) = queue.pop() {
            if !seen.insert(t.name().to_string()) {
                continue;
            }
            if let Some(def) = self.type_def(t.name()) {
                if let Some(base) = &def.base {
                    queue.push(base.clone());
                }
                queue.extend(def.interfaces.iter().cloned());
            }
        }
        seen.insert(OBJECT.to_string());
        seen
    }

    fn is_interface(&self, ty: &TypeInfo) -> bool {
        matches!(self.type_def(ty.name()), Some(def) if def.kind == TypeKind::Interface)
    }

    fn is_enum(&self, ty: &TypeInfo) -> bool {
        matches!(self.type_def(ty.name()), Some(def) if def.kind == TypeKind::Enum)
    }

    fn is_value_type(&self, ty: &TypeInfo) -> bool {
        matches!(
            self.type_def(ty.name()),
            Some(def) if matches!(def.kind, TypeKind::Struct | TypeKind::Enum)
        )
    }

    fn is_sealed(&self, ty: &TypeInfo) -> bool {
        if ty.is_array() {
            return true;
        }
        match self.type_def(ty.name()) {
            Some(def) => def.sealed || matches!(def.kind, TypeKind::Struct | TypeKind::Enum),
            None => false,
        }
    }

    /// Whether a value of type `source` can be assigned to a location of type `target`.
    fn is_assignable(&self, target: &TypeInfo, source: &TypeInfo) -> bool {
        if source.is_null() {
            return !self.is_value_type(target) || target.is_nullable();
        }
        if target.is(OBJECT) {
            return true;
        }
        if target.is(source.name()) {
            return !(source.is_nullable() && !target.is_nullable() && self.is_value_type(target));
        }
        if let Some(widened) = NUMERIC_WIDENING.get(source.name()) {
            if widened.contains(&target.name()) {
                return true;
            }
        }
        if let (Some(te), Some(se)) = (target.element_type(), source.element_type()) {
            return !self.is_value_type(&se) && self.is_assignable(&te, &se);
        }
        self.supertypes(source).contains(target.name())
    }

    /// Non-indexer property or field named `name`, searching base types and, for
    /// interfaces, inherited interfaces.
    fn find_member(&self, ty: &TypeInfo, name: &str) -> Option<MemberInfo> {
        if ty.is_array() {
            return (name == "Length").then(|| MemberInfo {
                name: "Length".into(),
                kind: MemberKind::Property,
                declaring_type: ty.with_nullable(false),
                ty: TypeInfo::new(INT32),
                is_static: false,
                is_read_only: true,
                parameters: Rc::from(Vec::new()),
                attributes: Rc::from(Vec::new()),
            });
        }
        for t in self.lookup_order(ty) {
            let Some(def) = self.type_def(&t) else {
                continue;
            };
            if let Some(p) = def
                .properties
                .iter()
                .find(|p| p.name == name && p.parameters.is_empty())
            {
                return Some(def.property_info(p));
            }
            if let Some(f) = def.fields.iter().find(|f| f.name == name) {
                return Some(def.field_info(f));
            }
        }
        None
    }

    fn find_indexer(&self, ty: &TypeInfo) -> Option<MemberInfo> {
        if let Some(element) = ty.element_type() {
            return Some(MemberInfo {
                name: "Item".into(),
                kind: MemberKind::Property,
                declaring_type: ty.with_nullable(false),
                ty: element,
                is_static: false,
                is_read_only: false,
                parameters: vec![ParameterInfo {
                    name: "index".to_string(),
                    ty: TypeInfo::new(INT32),
                    optional: false,
                }]
                .into(),
                attributes: Rc::from(Vec::new()),
            });
        }
        for t in self.lookup_order(ty) {
            let Some(def) = self.type_def(&t) else {
                continue;
            };
            if let Some(p) = def.properties.iter().find(|p| !p.parameters.is_empty()) {
                return Some(def.property_info(p));
            }
        }
        None
    }

    fn find_methods(&self, ty: &TypeInfo, name: &str) -> Vec<MemberInfo> {
        let mut methods = vec![];
        for t in self.lookup_order(ty) {
            if let Some(def) = self.type_def(&t) {
                methods.extend(
                    def.methods
                        .iter()
                        .filter(|m| m.name == name)
                        .map(|m| def.method_info(m)),
                );
            }
        }
        methods
    }

    /// Pick the first overload whose parameters accept `args`.
    fn resolve_method(&self, ty: &TypeInfo, name: &str, args: &[TypeInfo]) -> Option<MemberInfo> {
        self.find_methods(ty, name).into_iter().find(|m| {
            args.len() >= m.required_parameters()
                && args.len() <= m.parameters.len()
                && m.parameters
                    .iter()
                    .zip(args)
                    .all(|(p, a)| self.is_assignable(&p.ty, a))
        })
    }

    fn find_event(&self, ty: &TypeInfo, name: &str) -> Option<EventInfo> {
        for t in self.lookup_order(ty) {
            if let Some(def) = self.type_def(&t) {
                if let Some(e) = def.events.iter().find(|e| e.name == name) {
                    return Some(EventInfo {
                        name: e.name.as_str().into(),
                        declaring_type: def.type_info(),
                        handler_type: e.handler.clone(),
                    });
                }
            }
        }
        None
    }

    /// Order in which member lookups visit types.
    fn lookup_order(&self, ty: &TypeInfo) -> Vec<String> {
        if self.is_interface(ty) {
            self.supertypes(ty).into_iter().collect()
        } else {
            self.base_chain(ty)
                .into_iter()
                .map(|t| t.name().to_string())
                .collect()
        }
    }
}

/// Serialized form of a registry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

/// In-memory [`TypeProvider`] preloaded with the well-known system types.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for def in system_types() {
            registry.types.insert(def.name.clone(), def);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    pub fn add_type(&mut self, def: TypeDef) -> Result<()> {
        if self.types.contains_key(&def.name) {
            bail!("type {} is already registered", def.name);
        }
        self.types.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn add_config(&mut self, config: RegistryConfig) -> Result<()> {
        for def in config.types {
            self.add_type(def)?;
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        let mut registry = Self::new();
        registry.add_config(config)?;
        Ok(registry)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RegistryConfig = serde_yaml::from_str(yaml)?;
        let mut registry = Self::new();
        registry.add_config(config)?;
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeProvider for TypeRegistry {
    fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }
}

fn system_types() -> Vec<TypeDef> {
    let mut object = TypeDef::new(OBJECT, TypeKind::Class);
    object.methods.push(MethodDef {
        name: "ToString".to_string(),
        returns: TypeInfo::new(STRING),
        is_static: false,
        parameters: vec![],
    });

    let mut string = TypeDef::new(STRING, TypeKind::Class);
    string.sealed = true;
    string.properties.push(PropertyDef {
        name: "Length".to_string(),
        ty: TypeInfo::new(INT32),
        is_static: false,
        readonly: true,
        parameters: vec![],
        attributes: vec![],
    });
    string.properties.push(PropertyDef {
        name: "Chars".to_string(),
        ty: TypeInfo::new(CHAR),
        is_static: false,
        readonly: true,
        parameters: vec![ParameterInfo {
            name: "index".to_string(),
            ty: TypeInfo::new(INT32),
            optional: false,
        }],
        attributes: vec![],
    });

    let mut inotify = TypeDef::new(INOTIFY_PROPERTY_CHANGED, TypeKind::Interface);
    inotify.events.push(EventDef {
        name: "PropertyChanged".to_string(),
        handler: TypeInfo::new("System.ComponentModel.PropertyChangedEventHandler"),
    });

    let mut handler = TypeDef::new(EVENT_HANDLER, TypeKind::Class);
    handler.sealed = true;

    let mut types = vec![
        object,
        string,
        inotify,
        handler,
        TypeDef::new(TYPE, TypeKind::Class),
        TypeDef::new(TASK, TypeKind::Class),
    ];
    for name in [BOOLEAN, CHAR, INT32, INT64, SINGLE, DOUBLE, DECIMAL, VOID] {
        types.push(TypeDef::new(name, TypeKind::Struct));
    }
    types
}
