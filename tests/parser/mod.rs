// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use test_generator::test_resources;
use xbind::{unstable::*, *};

macro_rules! my_assert_eq {
    ($left:expr, $right:expr, $($arg:tt)+) => {
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    return Err(anyhow!("mismatch:\nleft  = {}\nright = {}\n{}",
                                       &$left, &$right, format_args!($($arg)+)));
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    expr: String,
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    expected_type: Option<String>,
    #[serde(default, rename = "static")]
    static_root: bool,
    #[serde(default)]
    namespaces: Vec<Namespace>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default, rename = "type")]
    ty: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    position: Option<usize>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {file}");

    let registry = TypeRegistry::from_yaml_str(&std::fs::read_to_string("tests/types.yaml")?)?;
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    for case in &test.cases {
        print!("\ncase {} ", case.note);
        match parse_case(&registry, case) {
            Ok(parsed) => {
                if let Some(e) = &case.error {
                    bail!("error `{}` not raised by parser.", e);
                }
                if let Some(key) = &case.key {
                    my_assert_eq!(parsed.expr.key(), key.as_str(), "key of `{}`", case.expr);
                }
                if let Some(ty) = &case.ty {
                    my_assert_eq!(parsed.expr.ty().to_string(), *ty, "type of `{}`", case.expr);
                }
            }
            Err(actual) => match &case.error {
                Some(expected) => {
                    let message = actual.message_for(&case.expr);
                    if !message.contains(expected) {
                        bail!(
                            "Error message\n`{}\n`\ndoes not contain `{}`",
                            message,
                            expected
                        );
                    }
                    if let Some(position) = case.position {
                        my_assert_eq!(
                            actual.position.unwrap_or_default(),
                            position,
                            "position of error in `{}`",
                            case.expr
                        );
                    }
                    println!("{message}");
                }
                _ => bail!("{}", actual.message_for(&case.expr)),
            },
        }

        println!("passed");
    }

    println!("{} cases passed.", test.cases.len());
    Ok(())
}

fn parse_case(registry: &TypeRegistry, case: &TestCase) -> ParseResult<ParsedExpression> {
    let root = TypeInfo::new(case.root.as_deref().unwrap_or("App.ViewModel"));
    let expected = case.expected_type.as_deref().map(TypeInfo::new);
    parse_expression(
        registry,
        &root,
        "dataRoot",
        &case.expr,
        expected.as_ref(),
        case.static_root,
        true,
        &case.namespaces,
    )
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/parser/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
