// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Ahead-of-time compiler for typed data-binding expressions.
//!
//! A binding declaration such as `Person.Name, Mode=OneWay` is parsed into a typed
//! expression tree, analyzed for change-notification sources and turned into a set
//! of update procedures that recompute target properties when their data changes.

extern crate alloc;

pub(crate) use alloc::rc::Rc;

mod ast;
mod binding;
mod compiler;
mod cse;
mod dependencies;
mod error;
mod lexer;
mod metadata;
mod notify;
mod parser;
mod two_way;
mod update;
mod utils;

pub use binding::{Bind, BindingContext, BindingMode, BindingSite, Resource, TargetObject};
pub use compiler::{create_bindings_data, BindingCompiler, BindingsData, CompilerOptions};
pub use error::{ErrorKind, ParseError, ParseResult};
pub use metadata::{
    EventInfo, MemberInfo, MemberKind, Namespace, TypeDef, TypeInfo, TypeKind, TypeProvider,
    TypeRegistry,
};
pub use notify::{NotifyProperty, NotifySource};
pub use two_way::TwoWayBindingData;
pub use update::{PropertySet, UpdateMethodData};

/// Items in `unstable` are likely to change.
pub mod unstable {
    pub use crate::ast::*;
    pub use crate::binding::parse_bind;
    pub use crate::cse::*;
    pub use crate::dependencies::*;
    pub use crate::lexer::*;
    pub use crate::metadata::*;
    pub use crate::notify::*;
    pub use crate::parser::*;
    pub use crate::two_way::*;
    pub use crate::update::*;
    pub use crate::utils::*;
}

#[cfg(test)]
mod tests;
