// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parser for binding expressions.
//!
//! Identifiers are resolved while parsing, so every node of the produced tree carries
//! its semantic type. Parsing stops at the first token that cannot continue the
//! expression (typically the `,` separating the next named binding argument) and the
//! position of that token is reported back to the caller.

use crate::ast::*;
use crate::error::*;
use crate::lexer::*;
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::utils::push_distinct;

/// Result of parsing one binding expression.
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    pub expr: ExprRef,
    /// Namespaces through which types were resolved.
    pub namespaces: Vec<Namespace>,
    /// Byte offset of the first token not consumed by the expression.
    pub end: usize,
}

const OPERATOR_KEYWORDS: [&str; 8] = ["and", "or", "eq", "ne", "lt", "le", "gt", "ge"];

/// Parse `text` as an expression evaluated against a root object.
///
/// `root_name` names the variable holding the root object of type `root_type`; with
/// `static_root` the root is the type itself and only static members resolve on it.
/// `expected_type` is the type of the target member; enum members of that type may be
/// referenced by bare name. With `validate_end` the whole text must be consumed.
///
/// Error positions count characters of `text`.
#[allow(clippy::too_many_arguments)]
pub fn parse_expression(
    provider: &dyn TypeProvider,
    root_type: &TypeInfo,
    root_name: &str,
    text: &str,
    expected_type: Option<&TypeInfo>,
    static_root: bool,
    validate_end: bool,
    namespaces: &[Namespace],
) -> ParseResult<ParsedExpression> {
    parse_expression_bytes(
        provider,
        root_type,
        root_name,
        text,
        expected_type,
        static_root,
        validate_end,
        namespaces,
    )
    .map_err(|e| e.in_chars(text))
}

/// [`parse_expression`] reporting byte offsets, for callers that keep scanning `text`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn parse_expression_bytes(
    provider: &dyn TypeProvider,
    root_type: &TypeInfo,
    root_name: &str,
    text: &str,
    expected_type: Option<&TypeInfo>,
    static_root: bool,
    validate_end: bool,
    namespaces: &[Namespace],
) -> ParseResult<ParsedExpression> {
    let root = if static_root {
        Expr::type_ref(root_type.clone())
    } else {
        Expr::variable(root_name, root_type.clone())
    };
    let mut parser = Parser::new(provider, root, text, expected_type.cloned(), namespaces)?;
    let expr = parser.parse()?;
    if validate_end && parser.tok.0 != TokenKind::Eof {
        return Err(parser.tok.1.error(
            ErrorKind::Syntax,
            format!("unexpected `{}`", parser.tok.1.text(text)),
        ));
    }
    Ok(ParsedExpression {
        expr,
        namespaces: parser.used_namespaces,
        end: parser.tok.1.start,
    })
}

#[derive(Clone)]
pub struct Parser<'source> {
    source: &'source str,
    lexer: Lexer<'source>,
    tok: Token,
    provider: &'source dyn TypeProvider,
    root: ExprRef,
    expected_type: Option<TypeInfo>,
    namespaces: &'source [Namespace],
    used_namespaces: Vec<Namespace>,
}

impl<'source> Parser<'source> {
    pub fn new(
        provider: &'source dyn TypeProvider,
        root: ExprRef,
        source: &'source str,
        expected_type: Option<TypeInfo>,
        namespaces: &'source [Namespace],
    ) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let tok = lexer.next_token()?;
        Ok(Self {
            source,
            lexer,
            tok,
            provider,
            root,
            expected_type,
            namespaces,
            used_namespaces: vec![],
        })
    }

    pub fn token_text(&self) -> &'source str {
        match self.tok.0 {
            TokenKind::Symbol | TokenKind::Number | TokenKind::Ident => self.tok.1.text(self.source),
            TokenKind::String | TokenKind::Eof => "",
        }
    }

    fn next_token(&mut self) -> ParseResult<()> {
        self.tok = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, text: &str, context: &str) -> ParseResult<()> {
        if self.token_text() == text {
            self.next_token()
        } else {
            Err(self
                .tok
                .1
                .error(ErrorKind::Syntax, format!("expecting `{text}` {context}")))
        }
    }

    fn is_symbol(&self, text: &str) -> bool {
        self.tok.0 == TokenKind::Symbol && self.token_text() == text
    }

    fn is_keyword(&self, text: &str) -> bool {
        self.tok.0 == TokenKind::Ident && self.token_text() == text
    }

    fn starts_operand(&self) -> bool {
        match self.tok.0 {
            TokenKind::Number | TokenKind::String => true,
            TokenKind::Ident => !OPERATOR_KEYWORDS.contains(&self.token_text()),
            TokenKind::Symbol => matches!(self.token_text(), "(" | "!"),
            TokenKind::Eof => false,
        }
    }

    pub fn parse(&mut self) -> ParseResult<ExprRef> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> ParseResult<ExprRef> {
        let test = self.parse_coalesce()?;
        if !self.is_symbol("?") {
            return Ok(test);
        }
        let span = self.tok.1;
        self.next_token()?;
        let if_true = self.parse_conditional()?;
        self.expect(":", "in conditional expression")?;
        let if_false = self.parse_conditional()?;

        if !test.ty().is(BOOLEAN) {
            return Err(span.error(
                ErrorKind::Semantic,
                format!("Cannot implicitly convert type '{}' to '{BOOLEAN}'.", test.ty()),
            ));
        }
        let (a, b) = (if_true.ty(), if_false.ty());
        let ty = if a.is(b.name()) {
            a.with_nullable(a.is_nullable() || b.is_nullable())
        } else if a.is_null() {
            b.with_nullable(true)
        } else if b.is_null() {
            a.with_nullable(true)
        } else if self.provider.is_assignable(a, b) {
            a.clone()
        } else if self.provider.is_assignable(b, a) {
            b.clone()
        } else {
            return Err(span.error(
                ErrorKind::Semantic,
                format!(
                    "Type of conditional expression cannot be determined because there is no implicit conversion between '{a}' and '{b}'."
                ),
            ));
        };
        Ok(Expr::new(
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            },
            ty,
        ))
    }

    fn parse_coalesce(&mut self) -> ParseResult<ExprRef> {
        let lhs = self.parse_or()?;
        if !self.is_symbol("??") {
            return Ok(lhs);
        }
        let span = self.tok.1;
        self.next_token()?;
        let rhs = self.parse_coalesce()?;

        let (l, r) = (lhs.ty(), rhs.ty());
        let incompatible = || {
            span.error(
                ErrorKind::Semantic,
                format!("Operator '??' cannot be applied to operands of type '{l}' and '{r}'."),
            )
        };
        if self.provider.is_value_type(l) && !l.is_nullable() {
            return Err(incompatible());
        }
        let ty = if r.is_null() {
            l.clone()
        } else if self.provider.is_assignable(&l.with_nullable(false), r) {
            l.with_nullable(r.is_nullable())
        } else if self.provider.is_assignable(r, &l.with_nullable(false)) {
            r.clone()
        } else {
            return Err(incompatible());
        };
        Ok(Expr::new(ExprKind::Coalesce { lhs, rhs }, ty))
    }

    fn parse_or(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_and()?;
        while self.is_symbol("||") || self.is_keyword("or") {
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_and()?;
            expr = self.binary(BinaryOp::Or, expr, rhs, span)?;
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_equality()?;
        while self.is_symbol("&&") || self.is_keyword("and") {
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_equality()?;
            expr = self.binary(BinaryOp::And, expr, rhs, span)?;
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_relational()?;
        loop {
            let op = match (self.tok.0, self.token_text()) {
                (TokenKind::Symbol, "==") | (TokenKind::Ident, "eq") => BinaryOp::Eq,
                (TokenKind::Symbol, "!=") | (TokenKind::Ident, "ne") => BinaryOp::Ne,
                _ => return Ok(expr),
            };
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_relational()?;
            expr = self.binary(op, expr, rhs, span)?;
        }
    }

    fn parse_relational(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match (self.tok.0, self.token_text()) {
                (TokenKind::Symbol, "<") | (TokenKind::Ident, "lt") => BinaryOp::Lt,
                (TokenKind::Symbol, "<=") | (TokenKind::Ident, "le") => BinaryOp::Le,
                (TokenKind::Symbol, ">") | (TokenKind::Ident, "gt") => BinaryOp::Gt,
                (TokenKind::Symbol, ">=") | (TokenKind::Ident, "ge") => BinaryOp::Ge,
                _ => return Ok(expr),
            };
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_additive()?;
            expr = self.binary(op, expr, rhs, span)?;
        }
    }

    fn parse_additive(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match (self.tok.0, self.token_text()) {
                (TokenKind::Symbol, "+") => BinaryOp::Add,
                (TokenKind::Symbol, "-") => BinaryOp::Sub,
                _ => return Ok(expr),
            };
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_multiplicative()?;
            expr = self.binary(op, expr, rhs, span)?;
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<ExprRef> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match (self.tok.0, self.token_text()) {
                (TokenKind::Symbol, "*") => BinaryOp::Mul,
                (TokenKind::Symbol, "%") => BinaryOp::Mod,
                _ => return Ok(expr),
            };
            let span = self.tok.1;
            self.next_token()?;
            let rhs = self.parse_unary()?;
            expr = self.binary(op, expr, rhs, span)?;
        }
    }

    fn parse_unary(&mut self) -> ParseResult<ExprRef> {
        let span = self.tok.1;
        if self.is_symbol("!") || self.is_keyword("not") {
            self.next_token()?;
            let expr = self.parse_unary()?;
            if !expr.ty().is(BOOLEAN) {
                return Err(span.error(
                    ErrorKind::Semantic,
                    format!("Operator '!' cannot be applied to operand of type '{}'.", expr.ty()),
                ));
            }
            let ty = expr.ty().clone();
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    expr,
                },
                ty,
            ));
        }
        if self.is_symbol("-") {
            self.next_token()?;
            if self.tok.0 == TokenKind::Number {
                let number = self.parse_primary()?;
                if let ExprKind::Constant(Constant::Number(n)) = number.kind() {
                    return Ok(Expr::new(
                        ExprKind::Constant(Constant::Number(format!("-{n}"))),
                        number.ty().clone(),
                    ));
                }
            }
            let expr = self.parse_unary()?;
            if !expr.ty().is_numeric() {
                return Err(span.error(
                    ErrorKind::Semantic,
                    format!("Operator '-' cannot be applied to operand of type '{}'.", expr.ty()),
                ));
            }
            let ty = expr.ty().clone();
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Negate,
                    expr,
                },
                ty,
            ));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_args(&mut self, close: &str) -> ParseResult<Vec<ExprRef>> {
        let mut args = vec![];
        if self.token_text() != close {
            args.push(self.parse_conditional()?);
            while self.is_symbol(",") {
                self.next_token()?;
                args.push(self.parse_conditional()?);
            }
        }
        self.expect(close, "after arguments")?;
        Ok(args)
    }

    fn parse_postfix(&mut self, mut expr: ExprRef) -> ParseResult<ExprRef> {
        loop {
            let (notify, null_conditional) = match (self.tok.0, self.token_text()) {
                (TokenKind::Symbol, ".") => (None, false),
                (TokenKind::Symbol, "?.") => (None, true),
                (TokenKind::Symbol, "\\") => (Some(true), false),
                (TokenKind::Symbol, "/") => (Some(false), false),
                (TokenKind::Symbol, "[") => {
                    expr = self.parse_element_access(expr, None)?;
                    continue;
                }
                _ => return Ok(expr),
            };
            self.next_token()?;

            if notify.is_some() && self.is_symbol("[") {
                expr = self.parse_element_access(expr, notify)?;
                continue;
            }

            let span = self.tok.1;
            if self.tok.0 != TokenKind::Ident {
                return Err(span.error(ErrorKind::Syntax, "expecting member name"));
            }
            let name = self.token_text();
            self.next_token()?;

            expr = if self.is_symbol("(") {
                self.parse_call(expr, name, span, null_conditional)?
            } else {
                self.member_access(expr, name, span, notify, null_conditional)?
            };
        }
    }

    fn parse_element_access(
        &mut self,
        target: ExprRef,
        notify: Option<bool>,
    ) -> ParseResult<ExprRef> {
        let span = self.tok.1;
        self.expect("[", "in element access")?;
        let args = self.parse_args("]")?;

        let Some(indexer) = self.provider.find_indexer(target.ty()) else {
            return Err(span.error(
                ErrorKind::Resolution,
                format!(
                    "Cannot apply indexing with [] to an expression of type '{}'.",
                    target.ty()
                ),
            ));
        };
        let accepted = args.len() == indexer.parameters.len()
            && indexer
                .parameters
                .iter()
                .zip(args.iter())
                .all(|(p, a)| self.provider.is_assignable(&p.ty, a.ty()));
        if !accepted {
            return Err(span.error(
                ErrorKind::Resolution,
                format!("The indexer of type '{}' does not accept these arguments.", target.ty()),
            ));
        }
        let ty = indexer.ty.clone();
        Ok(Expr::new(
            ExprKind::ElementAccess {
                target,
                indexer,
                args,
                notify,
            },
            ty,
        ))
    }

    fn parse_call(
        &mut self,
        target: ExprRef,
        name: &str,
        span: Span,
        null_conditional: bool,
    ) -> ParseResult<ExprRef> {
        self.expect("(", "in method call")?;
        let args = self.parse_args(")")?;
        let arg_types: Vec<TypeInfo> = args.iter().map(|a| a.ty().clone()).collect();
        let type_target = matches!(target.kind(), ExprKind::Type);

        let Some(method) = self
            .provider
            .resolve_method(target.ty(), name, &arg_types)
            .filter(|m| m.is_static || !type_target)
        else {
            let message = if self.provider.find_methods(target.ty(), name).is_empty() {
                format!("The type {} does not have method '{name}'.", target.ty())
            } else {
                format!(
                    "No overload for method '{name}' of type {} takes {} matching arguments.",
                    target.ty(),
                    args.len()
                )
            };
            return Err(span.error(ErrorKind::Resolution, message));
        };

        let target = if method.is_static && !type_target {
            Expr::type_ref(method.declaring_type.clone())
        } else {
            target
        };
        let mut ty = method.ty.clone();
        if null_conditional {
            ty = ty.with_nullable(true);
        }
        Ok(Expr::new(
            ExprKind::Call {
                target,
                method,
                args,
                null_conditional,
            },
            ty,
        ))
    }

    fn member_access(
        &mut self,
        target: ExprRef,
        name: &str,
        span: Span,
        notify: Option<bool>,
        null_conditional: bool,
    ) -> ParseResult<ExprRef> {
        let is_static = matches!(target.kind(), ExprKind::Type);
        let Some(member) = self
            .provider
            .find_member(target.ty(), name)
            .filter(|m| m.is_static == is_static)
        else {
            return Err(span.error(
                ErrorKind::Resolution,
                format!(
                    "The type {} does not have property or field '{name}'.",
                    target.ty()
                ),
            ));
        };
        let mut ty = member.ty.clone();
        if null_conditional {
            ty = ty.with_nullable(true);
        }
        Ok(Expr::new(
            ExprKind::Member {
                target,
                member,
                notify,
                null_conditional,
            },
            ty,
        ))
    }

    fn parse_number(&mut self) -> ParseResult<ExprRef> {
        let text = self.token_text();
        let ty = match text.chars().last() {
            Some('f' | 'F') => SINGLE,
            Some('d' | 'D') => DOUBLE,
            Some('m' | 'M') => DECIMAL,
            Some('l' | 'L') => INT64,
            _ if text.contains('.') => DOUBLE,
            _ => INT32,
        };
        self.next_token()?;
        Ok(Expr::new(
            ExprKind::Constant(Constant::Number(text.to_string())),
            TypeInfo::new(ty),
        ))
    }

    /// Try to read a type name at the current token: `prefix:Name`, a keyword alias, or
    /// a possibly dotted type name. The parser state is left untouched on failure.
    fn try_parse_type_name(&mut self) -> ParseResult<Option<TypeInfo>> {
        if self.tok.0 != TokenKind::Ident {
            return Ok(None);
        }
        let state = self.clone();
        let mut name = self.token_text().to_string();
        self.next_token()?;

        if self.is_symbol(":") {
            self.next_token()?;
            if self.tok.0 != TokenKind::Ident {
                *self = state;
                return Ok(None);
            }
            name = format!("{name}:{}", self.token_text());
            self.next_token()?;
            return match self.resolve_type(&name) {
                Some(ty) => Ok(Some(ty)),
                None => {
                    *self = state;
                    Ok(None)
                }
            };
        }

        let mut found = self.resolve_type(&name).map(|ty| (ty, self.clone()));
        while self.is_symbol(".") {
            self.next_token()?;
            if self.tok.0 != TokenKind::Ident {
                break;
            }
            name = format!("{name}.{}", self.token_text());
            self.next_token()?;
            if let Some(ty) = self.resolve_type(&name) {
                found = Some((ty, self.clone()));
            }
        }
        match found {
            Some((ty, after)) => {
                *self = after;
                Ok(Some(ty))
            }
            None => {
                *self = state;
                Ok(None)
            }
        }
    }

    fn resolve_type(&mut self, name: &str) -> Option<TypeInfo> {
        let (ty, ns) = self.provider.find_type(name, self.namespaces)?;
        if let Some(ns) = ns {
            push_distinct(&mut self.used_namespaces, ns.clone());
        }
        Some(ty)
    }

    fn parse_type_operand(&mut self, keyword: &str) -> ParseResult<TypeInfo> {
        self.expect("(", &format!("after `{keyword}`"))?;
        let span = self.tok.1;
        let Some(ty) = self.try_parse_type_name()? else {
            return Err(span.error(ErrorKind::Resolution, "expecting type name"));
        };
        self.expect(")", &format!("after `{keyword}` operand"))?;
        Ok(ty)
    }

    fn parse_paren_or_cast(&mut self) -> ParseResult<ExprRef> {
        let state = self.clone();
        self.next_token()?;
        if let Some(ty) = self.try_parse_type_name()? {
            if self.is_symbol(")") {
                self.next_token()?;
                if self.starts_operand() {
                    let expr = self.parse_unary()?;
                    return Ok(Expr::cast(expr, ty));
                }
            }
        }

        // Not a cast.
        *self = state;
        self.next_token()?;
        let expr = self.parse_conditional()?;
        self.expect(")", "to close parenthesized expression")?;
        let ty = expr.ty().clone();
        Ok(Expr::new(ExprKind::Paren { expr }, ty))
    }

    fn parse_identifier(&mut self) -> ParseResult<ExprRef> {
        let span = self.tok.1;
        let name = self.token_text();

        match name {
            "null" => {
                self.next_token()?;
                return Ok(Expr::null());
            }
            "true" | "false" => {
                self.next_token()?;
                return Ok(Expr::new(
                    ExprKind::Constant(Constant::Bool(name == "true")),
                    TypeInfo::new(BOOLEAN),
                ));
            }
            "this" => {
                self.next_token()?;
                return Ok(self.root.clone());
            }
            "typeof" => {
                self.next_token()?;
                let ty = self.parse_type_operand(name)?;
                return Ok(Expr::typeof_(ty));
            }
            "default" => {
                self.next_token()?;
                let ty = self.parse_type_operand(name)?;
                return Ok(Expr::new(ExprKind::Default, ty));
            }
            "new" => {
                self.next_token()?;
                let type_span = self.tok.1;
                let Some(ty) = self.try_parse_type_name()? else {
                    return Err(type_span.error(ErrorKind::Resolution, "expecting type name"));
                };
                self.expect("(", "after type in object creation")?;
                let args = self.parse_args(")")?;
                return Ok(Expr::new(ExprKind::New { args }, ty));
            }
            _ => (),
        }

        // Members of the root object take precedence over type names.
        let root = self.root.clone();
        let root_is_type = matches!(root.kind(), ExprKind::Type);
        let state = self.clone();
        self.next_token()?;
        // `name:` is a type prefix only for a declared prefix; otherwise the `:` belongs
        // to a conditional expression.
        let is_prefix = self.is_symbol(":")
            && self
                .namespaces
                .iter()
                .any(|n| n.prefix.as_deref() == Some(name));
        if self.is_symbol("(") {
            if !self.provider.find_methods(root.ty(), name).is_empty() {
                return self.parse_call(root, name, span, false);
            }
        } else if !is_prefix {
            if let Some(member) = self
                .provider
                .find_member(root.ty(), name)
                .filter(|m| m.is_static || !root_is_type)
            {
                let target = if member.is_static {
                    Expr::type_ref(member.declaring_type.clone())
                } else {
                    root
                };
                return Ok(Expr::member(target, member, None));
            }
        }
        *self = state;

        if let Some(ty) = self.try_parse_type_name()? {
            return Ok(Expr::type_ref(ty));
        }

        if let Some(expected) = self.expected_type.clone() {
            if self.provider.is_enum(&expected) {
                if let Some(field) = self
                    .provider
                    .find_member(&expected, name)
                    .filter(|m| m.is_static)
                {
                    self.next_token()?;
                    return Ok(Expr::member(
                        Expr::type_ref(expected.with_nullable(false)),
                        field,
                        None,
                    ));
                }
            }
        }

        Err(span.error(
            ErrorKind::Resolution,
            format!(
                "The type {} does not have property or method '{name}'.",
                self.root.ty()
            ),
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<ExprRef> {
        match self.tok.0 {
            TokenKind::Number => self.parse_number(),
            TokenKind::String => {
                let value = unescape(self.tok.1.text(self.source));
                self.next_token()?;
                Ok(Expr::new(
                    ExprKind::Constant(Constant::String(value)),
                    TypeInfo::new(STRING),
                ))
            }
            TokenKind::Ident => self.parse_identifier(),
            TokenKind::Symbol if self.token_text() == "(" => self.parse_paren_or_cast(),
            _ => Err(self.tok.1.error(ErrorKind::Syntax, "expecting expression")),
        }
    }

    fn numeric_result(&self, l: &TypeInfo, r: &TypeInfo) -> TypeInfo {
        let name = [DECIMAL, DOUBLE, SINGLE, INT64]
            .into_iter()
            .find(|n| l.is(n) || r.is(n))
            .unwrap_or(INT32);
        TypeInfo::new(name).with_nullable(l.is_nullable() || r.is_nullable())
    }

    fn binary(
        &self,
        op: BinaryOp,
        lhs: ExprRef,
        rhs: ExprRef,
        span: Span,
    ) -> ParseResult<ExprRef> {
        let (l, r) = (lhs.ty(), rhs.ty());
        let numeric = l.is_numeric() && r.is_numeric();
        let ty = match op {
            BinaryOp::Add if l.is(STRING) || r.is(STRING) => Some(TypeInfo::new(STRING)),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Mod if numeric => {
                Some(self.numeric_result(l, r))
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge if numeric => {
                Some(TypeInfo::new(BOOLEAN))
            }
            BinaryOp::Eq | BinaryOp::Ne
                if numeric
                    || self.provider.is_assignable(l, r)
                    || self.provider.is_assignable(r, l) =>
            {
                Some(TypeInfo::new(BOOLEAN))
            }
            BinaryOp::And | BinaryOp::Or if l.is(BOOLEAN) && r.is(BOOLEAN) => {
                Some(TypeInfo::new(BOOLEAN))
            }
            _ => None,
        };
        match ty {
            Some(ty) => Ok(Expr::new(ExprKind::Binary { op, lhs, rhs }, ty)),
            None => Err(span.error(
                ErrorKind::Semantic,
                format!(
                    "Operator '{}' cannot be applied to operands of type '{l}' and '{r}'.",
                    op.symbol()
                ),
            )),
        }
    }
}
