// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::*;
use crate::cse::*;
use crate::tests::common::*;

use anyhow::Result;

fn group(texts: &[&str]) -> Result<(Vec<String>, Vec<(String, String)>)> {
    let r = registry()?;
    let mut exprs = texts
        .iter()
        .map(|t| parse(&r, t))
        .collect::<Result<Vec<ExprRef>, _>>()?;
    let locals = group_expressions(&mut exprs);
    Ok((
        exprs.iter().map(|e| e.key().to_string()).collect(),
        locals
            .iter()
            .map(|l| (l.name.to_string(), l.expression.key().to_string()))
            .collect(),
    ))
}

fn local(name: &str, expr: &str) -> (String, String) {
    (name.to_string(), expr.to_string())
}

#[test]
fn shared_owner_is_hoisted() -> Result<()> {
    // `dataRoot.Person` and `dataRoot.Person.Address` are both used twice; the inner one
    // is hoisted first and the outer one is declared below it.
    let (exprs, locals) = group(&["Person.Address.City", "Person.Address.Street"])?;
    assert_eq!(
        locals,
        [
            local("value1", "dataRoot.Person"),
            local("value2", "value1.Address"),
        ]
    );
    assert_eq!(exprs, ["value2.City", "value2.Street"]);
    Ok(())
}

#[test]
fn unrelated_ties_go_to_the_smaller_key() -> Result<()> {
    let (exprs, locals) = group(&[
        "Plain.Value",
        "Plain.Value + Title",
        "Person.Name",
        "Person.Name",
    ])?;
    assert_eq!(
        locals,
        [
            local("value1", "dataRoot.Person"),
            local("value2", "dataRoot.Plain"),
            local("value3", "value1.Name"),
            local("value4", "value2.Value"),
        ]
    );
    assert_eq!(exprs, ["value4", "(value4 + dataRoot.Title)", "value3", "value3"]);
    Ok(())
}

#[test]
fn most_frequent_first() -> Result<()> {
    let (exprs, locals) = group(&[
        "Person.Address.City",
        "Person.Address.Street",
        "Person.Name",
    ])?;
    assert_eq!(
        locals,
        [
            local("value1", "dataRoot.Person"),
            local("value2", "value1.Address"),
        ]
    );
    assert_eq!(exprs, ["value2.City", "value2.Street", "value1.Name"]);
    Ok(())
}

#[test]
fn nullable_occurrences_make_the_local_nullable() -> Result<()> {
    let r = registry()?;
    let mut exprs = vec![
        parse(&r, "Person?.Address?.City")?,
        parse(&r, "Person?.Address?.Street")?,
    ];
    let locals = group_expressions(&mut exprs);
    assert_eq!(locals.len(), 2);
    assert_eq!(locals[0].expression.key(), "dataRoot.Person");
    assert_eq!(locals[1].expression.key(), "value1?.Address");
    assert!(locals[1].variable.ty().is_nullable());
    assert_eq!(exprs[0].key(), "value2?.City");
    Ok(())
}

#[test]
fn conditionally_evaluated_operands_are_not_shared() -> Result<()> {
    let (exprs, locals) = group(&["Enabled ? Person.Name : Title", "Person.Name"])?;
    assert!(locals.is_empty());
    assert_eq!(exprs[1], "dataRoot.Person.Name");

    let (_, locals) = group(&["Enabled && Person.Name == Title", "Person.Name"])?;
    assert!(locals.is_empty());

    // The left operand is always evaluated.
    let (_, locals) = group(&["Person.Name ?? Title", "Person.Name"])?;
    assert_eq!(
        locals,
        [
            local("value1", "dataRoot.Person"),
            local("value2", "value1.Name"),
        ]
    );
    Ok(())
}

#[test]
fn trivial_expressions_are_not_hoisted() -> Result<()> {
    let (_, locals) = group(&["counter + 1", "counter + 2"])?;
    assert!(locals.is_empty());

    let (_, locals) = group(&["'a' + Title", "'a' + Value"])?;
    assert!(locals.is_empty());
    Ok(())
}

#[test]
fn grouping_is_idempotent() -> Result<()> {
    let r = registry()?;
    let mut exprs = vec![
        parse(&r, "Person.Address.City")?,
        parse(&r, "Person.Address.Street")?,
    ];
    let first = group_expressions(&mut exprs);
    assert_eq!(first.len(), 2);
    let again = group_expressions(&mut exprs);
    assert!(again.is_empty());
    assert_eq!(exprs[0].key(), "value2.City");
    Ok(())
}
