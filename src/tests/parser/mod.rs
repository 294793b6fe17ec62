// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::error::*;
use crate::metadata::well_known::*;
use crate::metadata::*;
use crate::parser::*;
use crate::tests::common::*;

use anyhow::{bail, Result};

fn check(provider: &dyn TypeProvider, text: &str, key: &str, ty: &str) -> Result<()> {
    let expr = parse(provider, text)?;
    assert_eq!(expr.key(), key, "key of `{text}`");
    assert_eq!(expr.ty().to_string(), ty, "type of `{text}`");
    Ok(())
}

fn check_error(provider: &dyn TypeProvider, text: &str, kind: ErrorKind, msg: &str, pos: usize) {
    match parse(provider, text) {
        Ok(e) => panic!("`{text}` parsed as `{}`", e.key()),
        Err(e) => {
            assert_eq!(e.kind, kind, "{}", e.message_for(text));
            assert!(e.message.contains(msg), "{}", e.message_for(text));
            assert_eq!(e.position, Some(pos), "{}", e.message_for(text));
        }
    }
}

#[test]
fn member_paths() -> Result<()> {
    let r = registry()?;
    check(&r, "Person.Name", "dataRoot.Person.Name", STRING)?;
    check(&r, "Person.Address.City", "dataRoot.Person.Address.City", STRING)?;
    check(&r, "this.Count", "dataRoot.Count", INT32)?;
    check(&r, "Tags.Length", "dataRoot.Tags.Length", INT32)?;
    check(&r, "Items[0].Name", "dataRoot.Items[0].Name", STRING)?;
    check(&r, "Tags[1]", "dataRoot.Tags[1]", STRING)?;
    Ok(())
}

#[test]
fn null_conditional_members_are_nullable() -> Result<()> {
    let r = registry()?;
    check(
        &r,
        "Person?.Address?.City",
        "dataRoot.Person?.Address?.City",
        "System.String?",
    )?;
    check(&r, "Person?.Age", "dataRoot.Person?.Age", "System.Int32?")
}

#[test]
fn notification_markers() -> Result<()> {
    let r = registry()?;
    let forced = parse(&r, r"Plain\Value")?;
    let suppressed = parse(&r, "Person/Name")?;

    // Markers do not take part in the structural key.
    assert_eq!(forced.key(), "dataRoot.Plain.Value");
    assert_eq!(suppressed.key(), "dataRoot.Person.Name");

    match (forced.notifiable_parts(), suppressed.notifiable_parts()) {
        (Some((_, _, Some(true))), Some((_, _, Some(false)))) => (),
        _ => bail!("markers not recorded"),
    }

    let indexer = parse(&r, r"Items\[0]")?;
    assert!(indexer.is_element_access());
    assert!(matches!(indexer.notifiable_parts(), Some((_, _, Some(true)))));
    Ok(())
}

#[test]
fn literals() -> Result<()> {
    let r = registry()?;
    check(&r, "'text'", "\"text\"", STRING)?;
    check(&r, "\"text\"", "\"text\"", STRING)?;
    check(&r, "42", "42", INT32)?;
    check(&r, "-5", "-5", INT32)?;
    check(&r, "1.5", "1.5", DOUBLE)?;
    check(&r, "2.5f", "2.5f", SINGLE)?;
    check(&r, "10m", "10m", DECIMAL)?;
    check(&r, "true", "true", BOOLEAN)?;
    check(&r, "null", "null", NULL)
}

#[test]
fn operators() -> Result<()> {
    let r = registry()?;
    check(&r, "Count + 1", "(dataRoot.Count + 1)", INT32)?;
    check(&r, "Count * 2 + 1", "((dataRoot.Count * 2) + 1)", INT32)?;
    check(&r, "Amount * 2", "(dataRoot.Amount * 2)", "System.Double?")?;
    check(&r, "Title + Count", "(dataRoot.Title + dataRoot.Count)", STRING)?;
    check(
        &r,
        "Count gt 5 and Enabled",
        "((dataRoot.Count > 5) && dataRoot.Enabled)",
        BOOLEAN,
    )?;
    check(
        &r,
        "Count >= 1 || not Enabled",
        "((dataRoot.Count >= 1) || (!dataRoot.Enabled))",
        BOOLEAN,
    )?;
    check(&r, "Title eq null", "(dataRoot.Title == null)", BOOLEAN)?;
    check(&r, "-Count", "(-dataRoot.Count)", INT32)?;
    check(&r, "(Count)", "(dataRoot.Count)", INT32)
}

#[test]
fn conditional_and_coalesce() -> Result<()> {
    let r = registry()?;
    check(
        &r,
        "Enabled ? 'yes' : 'no'",
        "(dataRoot.Enabled ? \"yes\" : \"no\")",
        STRING,
    )?;
    check(
        &r,
        "Enabled ? Title : null",
        "(dataRoot.Enabled ? dataRoot.Title : null)",
        "System.String?",
    )?;
    // A bare member before the `:` of a conditional is not a type prefix.
    check(
        &r,
        "Enabled ? Count : 0",
        "(dataRoot.Enabled ? dataRoot.Count : 0)",
        INT32,
    )?;
    check(
        &r,
        "Enabled ? Title : Value",
        "(dataRoot.Enabled ? dataRoot.Title : dataRoot.Value)",
        STRING,
    )?;
    check(&r, "Title ?? 'none'", "(dataRoot.Title ?? \"none\")", STRING)?;
    check(&r, "Amount ?? 0", "(dataRoot.Amount ?? 0)", DOUBLE)
}

#[test]
fn methods_and_types() -> Result<()> {
    let r = registry()?;
    check(&r, "Format(Count)", "dataRoot.Format(dataRoot.Count)", STRING)?;
    check(
        &r,
        "Join(Title, Person.Name)",
        "dataRoot.Join(dataRoot.Title, dataRoot.Person.Name)",
        STRING,
    )?;
    check(&r, "Max(Count, 3)", "App.ViewModel.Max(dataRoot.Count, 3)", INT32)?;
    check(&r, "Count.ToString()", "dataRoot.Count.ToString()", STRING)?;
    check(&r, "(object)Count", "((System.Object)dataRoot.Count)", OBJECT)?;
    check(&r, "typeof(string)", "typeof(System.String)", TYPE)?;
    check(&r, "default(int)", "default(System.Int32)", INT32)?;
    check(&r, "App.Status.Active", "App.Status.Active", "App.Status")?;
    check(
        &r,
        "Status == App.Status.Inactive",
        "(dataRoot.Status == App.Status.Inactive)",
        BOOLEAN,
    )
}

#[test]
fn prefixed_types() -> Result<()> {
    let r = registry()?;
    let namespaces = [Namespace::new(Some("ui"), "UI")];
    let parsed = parse_expression(
        &r,
        &view_model(),
        DATA_ROOT,
        "ui:TextBox.TextProperty",
        None,
        false,
        true,
        &namespaces,
    )?;
    assert_eq!(parsed.expr.key(), "UI.TextBox.TextProperty");
    assert_eq!(parsed.namespaces, namespaces.to_vec());
    Ok(())
}

#[test]
fn enum_members_of_expected_type() -> Result<()> {
    let r = registry()?;
    let status = TypeInfo::new("App.Status");
    let parsed = parse_expression(
        &r,
        &view_model(),
        DATA_ROOT,
        "Active",
        Some(&status),
        false,
        true,
        &[],
    )?;
    assert_eq!(parsed.expr.key(), "App.Status.Active");
    assert!(parsed.expr.ty().is("App.Status"));

    // Without the expected type the name is unknown.
    check_error(&r, "Active", ErrorKind::Resolution, "'Active'", 0);
    Ok(())
}

#[test]
fn stops_at_top_level_comma() -> Result<()> {
    let r = registry()?;
    let text = "Join(Title, Value), Mode=OneWay";
    let parsed = parse_expression(&r, &view_model(), DATA_ROOT, text, None, false, false, &[])?;
    assert_eq!(parsed.expr.key(), "dataRoot.Join(dataRoot.Title, dataRoot.Value)");
    assert_eq!(parsed.end, 18);
    assert_eq!(&text[parsed.end..], ", Mode=OneWay");
    Ok(())
}

#[test]
fn static_root() -> Result<()> {
    let r = registry()?;
    let parsed = parse_expression(
        &r,
        &view_model(),
        DATA_ROOT,
        "Max(1, 2)",
        None,
        true,
        true,
        &[],
    )?;
    assert_eq!(parsed.expr.key(), "App.ViewModel.Max(1, 2)");

    // Instance members are not reachable from a type.
    let err = parse_expression(&r, &view_model(), DATA_ROOT, "Count", None, true, true, &[])
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resolution);
    Ok(())
}

#[test]
fn resolution_errors() -> Result<()> {
    let r = registry()?;
    check_error(
        &r,
        "Foo",
        ErrorKind::Resolution,
        "The type App.ViewModel does not have property or method 'Foo'.",
        0,
    );
    check_error(
        &r,
        "Person.Foo",
        ErrorKind::Resolution,
        "does not have property or field 'Foo'",
        7,
    );
    check_error(&r, "Format('x')", ErrorKind::Resolution, "No overload", 0);
    check_error(&r, "Person.Bar()", ErrorKind::Resolution, "does not have method 'Bar'", 7);
    check_error(&r, "Person[0]", ErrorKind::Resolution, "Cannot apply indexing", 6);
    Ok(())
}

#[test]
fn semantic_errors() -> Result<()> {
    let r = registry()?;
    check_error(
        &r,
        "Count && Enabled",
        ErrorKind::Semantic,
        "Operator '&&' cannot be applied to operands of type 'System.Int32' and 'System.Boolean'.",
        6,
    );
    check_error(&r, "!Count", ErrorKind::Semantic, "Operator '!'", 0);
    check_error(&r, "Count ?? 1", ErrorKind::Semantic, "Operator '??'", 6);
    check_error(&r, "Count ? 1 : 2", ErrorKind::Semantic, "Cannot implicitly convert", 6);
    check_error(&r, "Enabled ? 1 : 'a'", ErrorKind::Semantic, "no implicit conversion", 8);
    Ok(())
}

#[test]
fn syntax_errors() -> Result<()> {
    let r = registry()?;
    check_error(&r, "Person.", ErrorKind::Syntax, "expecting member name", 7);
    check_error(&r, "(Count", ErrorKind::Syntax, "expecting `)`", 6);
    check_error(&r, "Count Title", ErrorKind::Syntax, "unexpected `Title`", 6);
    check_error(&r, "+", ErrorKind::Syntax, "expecting expression", 0);
    Ok(())
}

#[test]
fn error_positions_count_characters() -> Result<()> {
    let r = registry()?;
    let text = "'ééé' + Nope";
    check_error(&r, text, ErrorKind::Resolution, "'Nope'", 8);
    let Err(e) = parse(&r, text) else {
        panic!("`{text}` parsed");
    };
    assert_eq!(e.length, 4);
    assert!(e.message_for(text).ends_with(&format!("\n  | {}^^^^", " ".repeat(8))));
    Ok(())
}

#[test]
fn clone_replace_rewrites_matching_subtrees() -> Result<()> {
    let r = registry()?;
    let expr = parse(&r, "Person.Name + Person.Address.City")?;
    let person = parse(&r, "Person")?;
    let value = Expr::variable("value", TypeInfo::new("App.Person"));

    let replaced = expr.clone_replace(&person, &value);
    assert_eq!(replaced.key(), "(value.Name + value.Address.City)");
    // The original tree is untouched.
    assert_eq!(expr.key(), "(dataRoot.Person.Name + dataRoot.Person.Address.City)");
    Ok(())
}

#[test]
fn enumerate_tree_is_pre_order() -> Result<()> {
    let r = registry()?;
    let expr = parse(&r, "Person.Name + Count")?;
    let keys: Vec<String> = expr
        .enumerate_tree()
        .iter()
        .map(|e| e.key().to_string())
        .collect();
    assert_eq!(
        keys,
        [
            "(dataRoot.Person.Name + dataRoot.Count)",
            "dataRoot.Person.Name",
            "dataRoot.Person",
            "dataRoot",
            "dataRoot.Count",
            "dataRoot",
        ]
    );
    Ok(())
}
