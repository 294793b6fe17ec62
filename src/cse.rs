// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Common-subexpression elimination over the assignments of one update method.

use crate::ast::*;
use crate::metadata::MemberKind;
use crate::*;

use indexmap::IndexMap;
use tracing::trace;

/// A local variable holding a hoisted sub-expression.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct LocalVariable {
    pub name: Rc<str>,
    pub expression: ExprRef,
    /// Reference to the variable, as substituted into the rewritten expressions.
    pub variable: ExprRef,
}

/// Nodes never worth a local of their own.
fn is_trivial(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Constant(_)
        | ExprKind::Variable { .. }
        | ExprKind::Type
        | ExprKind::Default
        | ExprKind::Typeof { .. }
        | ExprKind::Paren { .. } => true,
        ExprKind::Member { member, .. } => {
            matches!(member.kind, MemberKind::Field | MemberKind::Method)
        }
        _ => false,
    }
}

struct Occurrences {
    expr: ExprRef,
    count: usize,
    nullable: bool,
}

fn count(expr: &ExprRef, counts: &mut IndexMap<Rc<str>, Occurrences>) {
    if !is_trivial(expr) {
        let entry = counts
            .entry(expr.key().into())
            .or_insert_with(|| Occurrences {
                expr: expr.clone(),
                count: 0,
                nullable: false,
            });
        entry.count += 1;
        entry.nullable |= expr.ty().is_nullable();
    }
    // Only positions that are always evaluated can share a value.
    for child in expr.eager_children() {
        count(child, counts);
    }
}

/// Hoist repeated sub-expressions of `exprs` into local variables.
///
/// The most frequent sub-expression is hoisted first. On ties the one occurring inside
/// the others wins, so the pieces of an expression are extracted before the expression
/// containing them, and unrelated ties go to the smaller key. Every
/// occurrence, including those inside already created locals, is replaced by the new
/// variable, and a local is declared before the first local that uses it. The process
/// repeats until nothing is shared.
pub fn group_expressions(exprs: &mut [ExprRef]) -> Vec<LocalVariable> {
    let mut locals: Vec<LocalVariable> = vec![];
    loop {
        let mut counts = IndexMap::new();
        for e in exprs.iter().chain(locals.iter().map(|l| &l.expression)) {
            count(e, &mut counts);
        }

        let Some(top) = counts.values().map(|o| o.count).max().filter(|c| *c > 1) else {
            break;
        };
        let tied: Vec<&Occurrences> = counts.values().filter(|o| o.count == top).collect();
        let Some(best) = tied
            .iter()
            .filter(|o| {
                !tied
                    .iter()
                    .any(|i| i.expr.key() != o.expr.key() && o.expr.contains_key(i.expr.key()))
            })
            .min_by_key(|o| o.expr.key().to_string())
        else {
            break;
        };

        let name: Rc<str> = format!("value{}", locals.len() + 1).into();
        let ty = best.expr.ty().with_nullable(best.nullable);
        let variable = Expr::variable(&name, ty);
        let key = best.expr.key();

        for e in exprs.iter_mut() {
            *e = e.replace_key(key, &variable);
        }
        for l in locals.iter_mut() {
            l.expression = l.expression.replace_key(key, &variable);
        }

        trace!(local = %name, expression = key, count = best.count, "hoisted subexpression");

        let position = locals
            .iter()
            .position(|l| l.expression.contains_key(variable.key()))
            .unwrap_or(locals.len());
        locals.insert(
            position,
            LocalVariable {
                name,
                expression: best.expr.clone(),
                variable,
            },
        );
    }
    locals
}
