// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::error::*;
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::parser::parse_expression_bytes;
use crate::utils::push_distinct;
use crate::*;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Variable through which resource fields of the target root are reached.
pub const TARGET_ROOT: &str = "_targetRoot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingMode {
    #[default]
    OneTime,
    OneWay,
    OneWayToSource,
    TwoWay,
}

impl BindingMode {
    /// Whether target changes are written back to the source.
    pub fn writes_back(&self) -> bool {
        matches!(self, BindingMode::TwoWay | BindingMode::OneWayToSource)
    }

    /// Whether source changes are observed.
    pub fn observes_source(&self) -> bool {
        matches!(self, BindingMode::OneWay | BindingMode::TwoWay)
    }
}

impl FromStr for BindingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OneTime" => Ok(BindingMode::OneTime),
            "OneWay" => Ok(BindingMode::OneWay),
            "OneWayToSource" => Ok(BindingMode::OneWayToSource),
            "TwoWay" => Ok(BindingMode::TwoWay),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Object in the markup that owns a bound member. Objects are identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct TargetObject {
    pub name: Rc<str>,
    pub ty: TypeInfo,
}

impl TargetObject {
    pub fn new(name: &str, ty: TypeInfo) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One member assignment in the markup whose value is a binding declaration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct BindingSite {
    /// Raw declaration, e.g. `Person.Name, Mode=OneWay`.
    pub value: String,
    pub object: TargetObject,
    pub member_name: String,
    pub member_type: TypeInfo,
    pub namespaces: Vec<Namespace>,
    /// Set when the bound member is an event; the binding then supplies a handler.
    pub target_event: Option<EventInfo>,
}

impl BindingSite {
    pub fn new(object: TargetObject, member_name: &str, member_type: TypeInfo, value: &str) -> Self {
        Self {
            value: value.to_string(),
            object,
            member_name: member_name.to_string(),
            member_type,
            namespaces: vec![],
            target_event: None,
        }
    }

    pub fn with_namespaces(mut self, namespaces: Vec<Namespace>) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn with_target_event(mut self, event: EventInfo) -> Self {
        self.target_event = Some(event);
        self
    }
}

/// Everything outside the site itself that parsing a binding depends on.
pub struct BindingContext<'a> {
    pub provider: &'a dyn TypeProvider,
    /// Type of the data root the paths are resolved against.
    pub source_type: TypeInfo,
    /// Type of the markup root (the class the bindings are generated into).
    pub target_type: TypeInfo,
    pub data_root_name: String,
    pub default_mode: BindingMode,
    /// Interface implemented by value converters; required for `Converter`.
    pub converter_type: Option<TypeInfo>,
    /// The site is inside a template, so `DataType` must be given.
    pub require_data_type: bool,
}

/// A `{StaticResource name}` reference, injected as a field of the target root.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Resource {
    pub name: String,
    pub ty: TypeInfo,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Bind {
    pub site: BindingSite,
    pub data_type: Option<TypeInfo>,
    pub data_type_set: bool,
    pub expression: Option<ExprRef>,
    pub bind_back_expression: Option<ExprRef>,
    pub converter: Option<ExprRef>,
    pub converter_parameter: Option<ExprRef>,
    pub fallback_value: Option<ExprRef>,
    pub target_null_value: Option<ExprRef>,
    pub string_format: Option<String>,
    pub mode: BindingMode,
    pub is_items_source: bool,
    pub update_source_events: Vec<EventInfo>,
    pub resources: Vec<Resource>,
    /// Namespaces through which types in the expressions were resolved.
    pub namespaces: Vec<Namespace>,
    /// The path with converter, target-null value, fallback and format applied.
    pub source_expression: Option<ExprRef>,
    /// Backing member used as implicit write-back trigger.
    pub dependency_property: Option<MemberInfo>,
    pub index: usize,
}

impl Bind {
    /// The expression assigned on write-back.
    pub fn write_target(&self) -> Option<&ExprRef> {
        self.bind_back_expression.as_ref().or(self.expression.as_ref())
    }
}

/// Cursor over a declaration string.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Recognize `Name =` at the cursor, where `=` does not start `==`.
    /// Returns the name and the offset of the value that follows.
    fn named_segment(&self) -> Option<(&'a str, usize)> {
        let rest = self.rest();
        let name_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let after_name = &rest[name_len..];
        let after_ws = after_name.trim_start();
        let tail = after_ws.strip_prefix('=')?;
        if tail.starts_with('=') {
            return None;
        }
        let value = tail.trim_start();
        if value.is_empty() {
            return None;
        }
        let value_pos = self.pos + (rest.len() - value.len());
        Some((&rest[..name_len], value_pos))
    }

    /// Value up to the next comma. The cursor moves past the comma.
    fn simple_value(&mut self) -> (&'a str, usize) {
        let rest = self.rest();
        let (raw, consumed) = match rest.find(',') {
            Some(p) => (&rest[..p], p + 1),
            None => (rest, rest.len()),
        };
        let start = self.pos + (raw.len() - raw.trim_start().len());
        self.pos += consumed;
        (raw.trim(), start)
    }

    /// Format value: a single-quoted literal, or everything up to the first comma that
    /// is neither escaped nor inside braces.
    fn format_value(&mut self) -> ParseResult<String> {
        let mut rest = self.rest();
        if let Some(stripped) = rest.strip_prefix("{}") {
            self.pos += 2;
            rest = stripped;
        }

        if let Some(quoted) = rest.strip_prefix('\'') {
            let Some(end) = quoted.find('\'') else {
                return Err(ParseError::at(
                    ErrorKind::Syntax,
                    "unmatched quote in StringFormat",
                    self.pos,
                    1,
                ));
            };
            let value = quoted[..end].to_string();
            self.pos += end + 2;
            self.skip_ws();
            if self.rest().starts_with(',') {
                self.pos += 1;
            }
            return Ok(value);
        }

        let mut depth = 0usize;
        let mut escaped = false;
        let mut end = rest.len();
        for (i, ch) in rest.char_indices() {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    end = i;
                    break;
                }
                _ => (),
            }
        }
        let value = rest[..end].trim_end().to_string();
        self.pos += (end + 1).min(rest.len());
        Ok(value)
    }

    /// `{StaticResource name}` at the cursor.
    fn static_resource(&self) -> Option<(&'a str, usize)> {
        let inner = self.rest().strip_prefix('{')?.trim_start();
        let inner = inner.strip_prefix("StaticResource")?;
        if !inner.starts_with(char::is_whitespace) {
            return None;
        }
        let inner = inner.trim_start();
        let name_len = inner
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(inner.len());
        let close = inner[name_len..].trim_start();
        if name_len == 0 || !close.starts_with('}') {
            return None;
        }
        let consumed = self.rest().len() - close.len() + 1;
        Some((&inner[..name_len], consumed))
    }
}

/// Value of the last `DataType=` segment, up to the next comma.
fn find_data_type(text: &str) -> Option<&str> {
    let mut found = None;
    let mut search = 0;
    while let Some(p) = text[search..].find("DataType") {
        let start = search + p;
        let after = text[start + "DataType".len()..].trim_start();
        if let Some(tail) = after.strip_prefix('=') {
            if !tail.starts_with('=') {
                found = Some(tail);
            }
        }
        search = start + "DataType".len();
    }
    let value = found?;
    let value = match value.find(',') {
        Some(p) => &value[..p],
        None => value,
    };
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Build a string-format template with a single `{0}` placeholder.
pub fn format_template(format: &str) -> String {
    if let Some(open) = format.rfind("{0") {
        let after = &format[open + 2..];
        if let Some(close) = after.find('}') {
            let spec = &after[..close];
            if spec.is_empty() || spec.starts_with(':') {
                return format.to_string();
            }
        }
    }
    format!("{{0:{format}}}")
}

/// Parse the declaration of one binding site.
///
/// `local_index` numbers the fallback wrappers of the enclosing scope and is advanced
/// for every fallback created. Error positions count characters of the declaration.
pub fn parse_bind(
    site: &BindingSite,
    ctx: &BindingContext,
    local_index: &mut usize,
) -> ParseResult<Bind> {
    parse_bind_bytes(site, ctx, local_index).map_err(|e| e.in_chars(site.value.trim_end()))
}

fn parse_bind_bytes(
    site: &BindingSite,
    ctx: &BindingContext,
    local_index: &mut usize,
) -> ParseResult<Bind> {
    let provider = ctx.provider;
    let text = site.value.trim_end();
    if text.trim().is_empty() {
        return Err(ParseError::syntax("Missing expression."));
    }

    let mut source_type = ctx.source_type.clone();
    let mut data_type = None;
    let mut data_type_set = false;
    match find_data_type(text) {
        Some(name) => {
            data_type = provider.resolve_type(name, &site.namespaces);
            data_type_set = true;
            if data_type.is_none() && ctx.require_data_type {
                return Err(ParseError::resolution(format!(
                    "DataType '{name}' cannot be resolved."
                )));
            }
            source_type = data_type.clone().unwrap_or_else(|| ctx.target_type.clone());
        }
        None if ctx.require_data_type => {
            return Err(ParseError::resolution(
                "DataType is unknown. It must be specified when binding inside a template.",
            ));
        }
        None => (),
    }

    let mut expression: Option<ExprRef> = None;
    let mut expression_pos = 0;
    let mut bind_back_expression: Option<ExprRef> = None;
    let mut converter = None;
    let mut converter_parameter = None;
    let mut fallback_value = None;
    let mut target_null_value = None;
    let mut string_format = None;
    let mut explicit_mode: Option<BindingMode> = None;
    let mut implied_two_way = false;
    let mut is_items_source = false;
    let mut update_source_events: Vec<EventInfo> = vec![];
    let mut resources = vec![];
    let mut namespaces = vec![];

    let mut scanner = Scanner::new(text);
    loop {
        scanner.skip_ws();
        if scanner.at_end() {
            break;
        }
        let segment_pos = scanner.pos;

        let name = match scanner.named_segment() {
            Some((name, value_pos)) => {
                if name == "Path" && expression.is_some() {
                    return Err(ParseError::at(
                        ErrorKind::Syntax,
                        "Syntax error.",
                        segment_pos,
                        name.len(),
                    ));
                }
                scanner.pos = value_pos;
                name
            }
            None if expression.is_none() => "Path",
            None => {
                return Err(ParseError::at(ErrorKind::Syntax, "Syntax error.", segment_pos, 1));
            }
        };

        match name {
            "Path" | "BindBack" | "Converter" | "ConverterParameter" | "FallbackValue"
            | "TargetNullValue" => {
                let value_pos = scanner.pos;
                let resource = match name {
                    "Path" | "BindBack" => None,
                    _ => scanner.static_resource(),
                };
                let expr = match resource {
                    Some((resource_name, consumed)) => {
                        let resource_type = match name {
                            "Converter" => ctx.converter_type.clone().ok_or_else(|| {
                                ParseError::at(
                                    ErrorKind::Resolution,
                                    "No converter type is configured.",
                                    value_pos,
                                    consumed,
                                )
                            })?,
                            "FallbackValue" | "TargetNullValue" => site.member_type.clone(),
                            _ => TypeInfo::object(),
                        };
                        resources.push(Resource {
                            name: resource_name.to_string(),
                            ty: resource_type.clone(),
                        });
                        scanner.pos += consumed;
                        let field = MemberInfo::field(
                            resource_name,
                            ctx.target_type.clone(),
                            resource_type,
                        );
                        let root = Expr::variable(TARGET_ROOT, ctx.target_type.clone());
                        Expr::member(root, field, None)
                    }
                    None => {
                        let parsed = parse_expression_bytes(
                            provider,
                            &source_type,
                            &ctx.data_root_name,
                            scanner.rest(),
                            Some(&site.member_type),
                            false,
                            false,
                            &site.namespaces,
                        )
                        .map_err(|e| e.offset(value_pos))?;
                        for ns in parsed.namespaces {
                            push_distinct(&mut namespaces, ns);
                        }
                        scanner.pos += parsed.end;
                        parsed.expr
                    }
                };

                scanner.skip_ws();
                if scanner.rest().starts_with(',') {
                    scanner.pos += 1;
                } else if !scanner.at_end() {
                    return Err(ParseError::at(
                        ErrorKind::Syntax,
                        "Syntax error.",
                        scanner.pos,
                        1,
                    ));
                }

                match name {
                    "Path" => {
                        expression = Some(expr);
                        expression_pos = value_pos;
                    }
                    "BindBack" => {
                        bind_back_expression = Some(expr);
                        implied_two_way = true;
                    }
                    "Converter" => converter = Some(expr),
                    "ConverterParameter" => converter_parameter = Some(expr),
                    "FallbackValue" => fallback_value = Some(expr),
                    _ => target_null_value = Some(expr),
                }
            }
            "StringFormat" => string_format = Some(scanner.format_value()?),
            "Mode" | "UpdateSourceEventNames" | "DataType" | "IsItemsSource" => {
                let (value, value_pos) = scanner.simple_value();
                match name {
                    "Mode" => match value.parse::<BindingMode>() {
                        Ok(mode) => explicit_mode = Some(mode),
                        Err(_) => {
                            let mut msg = format!("Mode is invalid: {value}.");
                            if expression.is_none() {
                                msg += " Use 'eq' instead of '=' to compare 'Mode' in expression.";
                            }
                            return Err(ParseError::at(
                                ErrorKind::Semantic,
                                msg,
                                value_pos,
                                value.len(),
                            ));
                        }
                    },
                    "IsItemsSource" => match parse_bool(value) {
                        Some(b) => is_items_source = b,
                        None => {
                            return Err(ParseError::at(
                                ErrorKind::Semantic,
                                format!("Invalid boolean value: {value}"),
                                value_pos,
                                value.len(),
                            ));
                        }
                    },
                    "UpdateSourceEventNames" => {
                        for event_name in value.split('|').map(str::trim) {
                            let Some(event) = provider.find_event(&site.object.ty, event_name)
                            else {
                                return Err(ParseError::at(
                                    ErrorKind::Resolution,
                                    format!(
                                        "The type {} does not have event {event_name}.",
                                        site.object.ty
                                    ),
                                    value_pos,
                                    value.len(),
                                ));
                            };
                            push_distinct(&mut update_source_events, event);
                        }
                        implied_two_way = true;
                    }
                    // Resolved before scanning.
                    _ => (),
                }
            }
            _ => {
                return Err(ParseError::at(
                    ErrorKind::Syntax,
                    format!("Property {name} is not valid for a binding."),
                    segment_pos,
                    name.len(),
                ));
            }
        }
    }

    let mode = match (&expression, &bind_back_expression) {
        (None, None) => {
            return Err(ParseError::semantic(
                "Missing Path or BindBack expression.",
            ));
        }
        (None, Some(_)) => match explicit_mode {
            None | Some(BindingMode::OneWayToSource) => BindingMode::OneWayToSource,
            Some(_) => return Err(ParseError::semantic("Missing expression.")),
        },
        (Some(_), _) => match (explicit_mode, implied_two_way) {
            (Some(mode), _) => mode,
            (None, true) => BindingMode::TwoWay,
            (None, false) => ctx.default_mode,
        },
    };

    if mode.writes_back() {
        let target = bind_back_expression.as_ref().or(expression.as_ref());
        if !target.map(|e| e.is_settable()).unwrap_or(false) {
            let err = ParseError::semantic(
                "The expression must be settable for TwoWay or OneWayToSource bindings.",
            );
            return Err(if bind_back_expression.is_none() {
                err.with_span(expression_pos, text.len() - expression_pos)
            } else {
                err
            });
        }
    }

    if is_items_source && expression.is_none() {
        return Err(ParseError::semantic(
            "IsItemsSource cannot be used for OneWayToSource bindings.",
        ));
    }

    let mut source_expression = expression.clone();
    if let Some(path) = source_expression.take() {
        let mut expr = path;

        if let Some(converter) = &converter {
            let Some(convert) = provider
                .find_methods(converter.ty(), "Convert")
                .into_iter()
                .next()
            else {
                return Err(ParseError::resolution(format!(
                    "The type {} does not have method 'Convert'.",
                    converter.ty()
                )));
            };
            let parameter = converter_parameter.clone().unwrap_or_else(Expr::null);
            expr = Expr::call(
                converter.clone(),
                convert,
                vec![
                    expr,
                    Expr::typeof_(site.member_type.clone()),
                    parameter,
                    Expr::null(),
                ],
            );
            if !site.member_type.is(OBJECT) {
                expr = Expr::cast(expr, site.member_type.clone());
            }
        }

        if let Some(target_null) = &target_null_value {
            expr = Expr::coalesce(expr, target_null.clone());
        }

        if let Some(fallback) = &fallback_value {
            if !provider.is_assignable(&TypeInfo::new(TASK), expr.ty()) {
                expr = Expr::fallback(expr, fallback.clone(), *local_index);
                *local_index += 1;
            }
        }

        if let Some(format) = &string_format {
            expr = Expr::interpolated_string(&format_template(format), vec![expr]);
        }

        source_expression = Some(expr);
    }

    debug!(
        member = %site.member_name,
        object = %site.object.name,
        %mode,
        "parsed binding"
    );

    Ok(Bind {
        site: site.clone(),
        data_type,
        data_type_set,
        expression,
        bind_back_expression,
        converter,
        converter_parameter,
        fallback_value,
        target_null_value,
        string_format,
        mode,
        is_items_source,
        update_source_events,
        resources,
        namespaces,
        source_expression,
        dependency_property: None,
        index: 0,
    })
}
