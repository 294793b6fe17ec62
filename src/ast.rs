// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::metadata::*;
use crate::*;

use core::{cmp, fmt, ops::Deref};

pub struct NodeRef<T> {
    r: Rc<T>,
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self { r: self.r.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.r.as_ref().fmt(f)
    }
}

impl<T> cmp::PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.r).eq(&Rc::as_ptr(&other.r))
    }
}

impl<T> cmp::Eq for NodeRef<T> {}

impl<T> Deref for NodeRef<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.r
    }
}

impl<T> AsRef<T> for NodeRef<T> {
    fn as_ref(&self) -> &T {
        self.deref()
    }
}

impl<T> NodeRef<T> {
    pub fn new(t: T) -> Self {
        Self { r: Rc::new(t) }
    }
}

#[cfg(feature = "ast")]
impl<T: serde::Serialize> serde::Serialize for NodeRef<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.r.as_ref().serialize(serializer)
    }
}

pub type Ref<T> = NodeRef<T>;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum Constant {
    Null,
    Bool(bool),
    /// Numeric literal as written, including any type suffix.
    Number(String),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Right operand is only evaluated depending on the left one.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum ExprKind {
    Constant(Constant),

    Variable {
        name: Rc<str>,
    },

    /// Reference to a type, used as the target of static member access.
    Type,

    Member {
        target: Ref<Expr>,
        member: MemberInfo,
        /// `Some(true)` forced with `\`, `Some(false)` suppressed with `/`.
        notify: Option<bool>,
        null_conditional: bool,
    },

    ElementAccess {
        target: Ref<Expr>,
        indexer: MemberInfo,
        args: Vec<Ref<Expr>>,
        notify: Option<bool>,
    },

    Call {
        target: Ref<Expr>,
        method: MemberInfo,
        args: Vec<Ref<Expr>>,
        null_conditional: bool,
    },

    Cast {
        expr: Ref<Expr>,
    },

    Paren {
        expr: Ref<Expr>,
    },

    Unary {
        op: UnaryOp,
        expr: Ref<Expr>,
    },

    Binary {
        op: BinaryOp,
        lhs: Ref<Expr>,
        rhs: Ref<Expr>,
    },

    Conditional {
        test: Ref<Expr>,
        if_true: Ref<Expr>,
        if_false: Ref<Expr>,
    },

    Coalesce {
        lhs: Ref<Expr>,
        rhs: Ref<Expr>,
    },

    New {
        args: Vec<Ref<Expr>>,
    },

    Typeof {
        operand: TypeInfo,
    },

    /// `template` holds `{0}` style placeholders, one per argument.
    InterpolatedString {
        template: Rc<str>,
        args: Vec<Ref<Expr>>,
    },

    Default,

    /// Evaluates `expr`, yielding `fallback` when the evaluation fails.
    Fallback {
        expr: Ref<Expr>,
        fallback: Ref<Expr>,
        local_index: usize,
    },
}

/// A typed expression node. Nodes are immutable; `key` is computed once and
/// identifies the node structurally.
#[derive(Debug)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Expr {
    kind: ExprKind,
    ty: TypeInfo,
    key: Rc<str>,
}

pub type ExprRef = Ref<Expr>;

impl Expr {
    pub fn new(kind: ExprKind, ty: TypeInfo) -> ExprRef {
        let key = render(&kind, &ty).into();
        Ref::new(Expr { kind, ty, key })
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn ty(&self) -> &TypeInfo {
        &self.ty
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn null() -> ExprRef {
        Self::new(ExprKind::Constant(Constant::Null), TypeInfo::null())
    }

    pub fn variable(name: &str, ty: TypeInfo) -> ExprRef {
        Self::new(ExprKind::Variable { name: name.into() }, ty)
    }

    pub fn type_ref(ty: TypeInfo) -> ExprRef {
        Self::new(ExprKind::Type, ty)
    }

    pub fn member(target: ExprRef, member: MemberInfo, notify: Option<bool>) -> ExprRef {
        let ty = member.ty.clone();
        Self::new(
            ExprKind::Member {
                target,
                member,
                notify,
                null_conditional: false,
            },
            ty,
        )
    }

    pub fn call(target: ExprRef, method: MemberInfo, args: Vec<ExprRef>) -> ExprRef {
        let ty = method.ty.clone();
        Self::new(
            ExprKind::Call {
                target,
                method,
                args,
                null_conditional: false,
            },
            ty,
        )
    }

    pub fn cast(expr: ExprRef, ty: TypeInfo) -> ExprRef {
        Self::new(ExprKind::Cast { expr }, ty)
    }

    pub fn typeof_(operand: TypeInfo) -> ExprRef {
        Self::new(ExprKind::Typeof { operand }, TypeInfo::new(well_known::TYPE))
    }

    pub fn coalesce(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        let ty = lhs.ty().with_nullable(false);
        Self::new(ExprKind::Coalesce { lhs, rhs }, ty)
    }

    pub fn fallback(expr: ExprRef, fallback: ExprRef, local_index: usize) -> ExprRef {
        let ty = expr.ty().clone();
        Self::new(
            ExprKind::Fallback {
                expr,
                fallback,
                local_index,
            },
            ty,
        )
    }

    pub fn interpolated_string(template: &str, args: Vec<ExprRef>) -> ExprRef {
        Self::new(
            ExprKind::InterpolatedString {
                template: template.into(),
                args,
            },
            TypeInfo::new(well_known::STRING),
        )
    }

    /// Immediate sub-expressions, left to right.
    pub fn children(&self) -> Vec<&ExprRef> {
        match &self.kind {
            ExprKind::Constant(_) | ExprKind::Variable { .. } | ExprKind::Type => vec![],
            ExprKind::Typeof { .. } | ExprKind::Default => vec![],
            ExprKind::Member { target, .. } => vec![target],
            ExprKind::ElementAccess { target, args, .. } | ExprKind::Call { target, args, .. } => {
                let mut v = vec![target];
                v.extend(args.iter());
                v
            }
            ExprKind::Cast { expr } | ExprKind::Paren { expr } | ExprKind::Unary { expr, .. } => {
                vec![expr]
            }
            ExprKind::Binary { lhs, rhs, .. } | ExprKind::Coalesce { lhs, rhs } => vec![lhs, rhs],
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => vec![test, if_true, if_false],
            ExprKind::New { args } | ExprKind::InterpolatedString { args, .. } => {
                args.iter().collect()
            }
            ExprKind::Fallback { expr, fallback, .. } => vec![expr, fallback],
        }
    }

    /// Sub-expressions that are always evaluated when this node is evaluated.
    pub fn eager_children(&self) -> Vec<&ExprRef> {
        match &self.kind {
            ExprKind::Binary { op, lhs, .. } if op.is_short_circuit() => vec![lhs],
            ExprKind::Coalesce { lhs, .. } => vec![lhs],
            ExprKind::Conditional { test, .. } => vec![test],
            ExprKind::Fallback { .. } => vec![],
            _ => self.children(),
        }
    }

    fn map_children(&self, f: &mut dyn FnMut(&ExprRef) -> ExprRef) -> ExprKind {
        match &self.kind {
            ExprKind::Constant(_)
            | ExprKind::Variable { .. }
            | ExprKind::Type
            | ExprKind::Typeof { .. }
            | ExprKind::Default => self.kind.clone(),
            ExprKind::Member {
                target,
                member,
                notify,
                null_conditional,
            } => ExprKind::Member {
                target: f(target),
                member: member.clone(),
                notify: *notify,
                null_conditional: *null_conditional,
            },
            ExprKind::ElementAccess {
                target,
                indexer,
                args,
                notify,
            } => {
                let args = map_vec(args, f);
                ExprKind::ElementAccess {
                    target: f(target),
                    indexer: indexer.clone(),
                    args,
                    notify: *notify,
                }
            }
            ExprKind::Call {
                target,
                method,
                args,
                null_conditional,
            } => {
                let args = map_vec(args, f);
                ExprKind::Call {
                    target: f(target),
                    method: method.clone(),
                    args,
                    null_conditional: *null_conditional,
                }
            }
            ExprKind::Cast { expr } => ExprKind::Cast { expr: f(expr) },
            ExprKind::Paren { expr } => ExprKind::Paren { expr: f(expr) },
            ExprKind::Unary { op, expr } => ExprKind::Unary {
                op: *op,
                expr: f(expr),
            },
            ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
                op: *op,
                lhs: f(lhs),
                rhs: f(rhs),
            },
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => ExprKind::Conditional {
                test: f(test),
                if_true: f(if_true),
                if_false: f(if_false),
            },
            ExprKind::Coalesce { lhs, rhs } => ExprKind::Coalesce {
                lhs: f(lhs),
                rhs: f(rhs),
            },
            ExprKind::New { args } => ExprKind::New {
                args: map_vec(args, f),
            },
            ExprKind::InterpolatedString { template, args } => {
                let args = map_vec(args, f);
                ExprKind::InterpolatedString {
                    template: template.clone(),
                    args,
                }
            }
            ExprKind::Fallback {
                expr,
                fallback,
                local_index,
            } => ExprKind::Fallback {
                expr: f(expr),
                fallback: f(fallback),
                local_index: *local_index,
            },
        }
    }

    /// For member and element access: the owner expression, the observed member and
    /// the explicit notification marker.
    pub fn notifiable_parts(&self) -> Option<(&ExprRef, &MemberInfo, Option<bool>)> {
        match &self.kind {
            ExprKind::Member {
                target,
                member,
                notify,
                ..
            } => Some((target, member, *notify)),
            ExprKind::ElementAccess {
                target,
                indexer,
                notify,
                ..
            } => Some((target, indexer, *notify)),
            _ => None,
        }
    }

    pub fn is_element_access(&self) -> bool {
        matches!(self.kind, ExprKind::ElementAccess { .. })
    }

    /// Whether the expression can be the target of a write-back.
    pub fn is_settable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Member { .. } | ExprKind::Call { .. } | ExprKind::ElementAccess { .. }
        )
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key() == key || self.children().iter().any(|c| c.contains_key(key))
    }
}

impl Ref<Expr> {
    /// Pre-order list of this node and all of its descendants.
    pub fn enumerate_tree(&self) -> Vec<ExprRef> {
        let mut nodes = vec![];
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            for child in node.children().into_iter().rev() {
                stack.push(child.clone());
            }
            nodes.push(node);
        }
        nodes
    }

    /// Copy of this tree with every sub-tree structurally equal to `old` replaced by `new`.
    pub fn clone_replace(&self, old: &Expr, new: &ExprRef) -> ExprRef {
        self.replace_key(old.key(), new)
    }

    pub fn replace_key(&self, old_key: &str, new: &ExprRef) -> ExprRef {
        if self.key() == old_key {
            return new.clone();
        }
        if !self.contains_key(old_key) {
            return self.clone();
        }
        let kind = self.map_children(&mut |c| c.replace_key(old_key, new));
        Expr::new(kind, self.ty().clone())
    }

    /// The expression with enclosing parentheses and casts removed.
    pub fn strip_parens_and_casts(&self) -> ExprRef {
        match self.kind() {
            ExprKind::Paren { expr } | ExprKind::Cast { expr } => expr.strip_parens_and_casts(),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn map_vec(v: &[ExprRef], f: &mut dyn FnMut(&ExprRef) -> ExprRef) -> Vec<ExprRef> {
    v.iter().map(|a| f(a)).collect()
}

fn join(args: &[ExprRef]) -> String {
    args.iter()
        .map(|a| a.key().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render(kind: &ExprKind, ty: &TypeInfo) -> String {
    match kind {
        ExprKind::Constant(c) => match c {
            Constant::Null => "null".to_string(),
            Constant::Bool(b) => b.to_string(),
            Constant::Number(n) => n.clone(),
            Constant::String(s) => format!("{s:?}"),
        },
        ExprKind::Variable { name } => name.to_string(),
        ExprKind::Type => ty.name().to_string(),
        ExprKind::Member {
            target,
            member,
            null_conditional,
            ..
        } => {
            let sep = if *null_conditional { "?." } else { "." };
            format!("{}{sep}{}", target.key(), member.name)
        }
        ExprKind::ElementAccess { target, args, .. } => {
            format!("{}[{}]", target.key(), join(args))
        }
        ExprKind::Call {
            target,
            method,
            args,
            null_conditional,
        } => {
            let sep = if *null_conditional { "?." } else { "." };
            format!("{}{sep}{}({})", target.key(), method.name, join(args))
        }
        ExprKind::Cast { expr } => format!("(({}){})", ty, expr.key()),
        ExprKind::Paren { expr } => format!("({})", expr.key()),
        ExprKind::Unary { op, expr } => match op {
            UnaryOp::Not => format!("(!{})", expr.key()),
            UnaryOp::Negate => format!("(-{})", expr.key()),
        },
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({} {} {})", lhs.key(), op.symbol(), rhs.key())
        }
        ExprKind::Conditional {
            test,
            if_true,
            if_false,
        } => format!("({} ? {} : {})", test.key(), if_true.key(), if_false.key()),
        ExprKind::Coalesce { lhs, rhs } => format!("({} ?? {})", lhs.key(), rhs.key()),
        ExprKind::New { args } => format!("new {}({})", ty.name(), join(args)),
        ExprKind::Typeof { operand } => format!("typeof({})", operand.name()),
        ExprKind::InterpolatedString { template, args } => {
            let mut text = template.replace('"', "\\\"");
            for (i, arg) in args.iter().enumerate() {
                text = text.replace(&format!("{{{i}"), &format!("{{{}", arg.key()));
            }
            format!("$\"{text}\"")
        }
        ExprKind::Default => format!("default({ty})"),
        ExprKind::Fallback {
            expr,
            fallback,
            local_index,
        } => format!("fallback{local_index}({}, {})", expr.key(), fallback.key()),
    }
}
