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

fn default_object() -> String {
    "label".to_string()
}

fn default_object_type() -> String {
    "UI.Label".to_string()
}

fn default_member() -> String {
    "Text".to_string()
}

fn default_member_type() -> String {
    "System.String".to_string()
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct Site {
    #[serde(default = "default_object")]
    object: String,
    #[serde(default = "default_object_type", rename = "type")]
    object_type: String,
    #[serde(default = "default_member")]
    member: String,
    #[serde(default = "default_member_type")]
    member_type: String,
    value: String,
    #[serde(default)]
    namespaces: Vec<Namespace>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Default)]
#[serde(deny_unknown_fields, default)]
struct Method {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sets: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    handlers: Vec<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct Property {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    names: Option<Vec<String>>,
    bindings: Vec<usize>,
    set_bindings: Vec<usize>,
    #[serde(default)]
    dependents: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<Method>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct Source {
    expression: String,
    source_expression: String,
    #[serde(default)]
    check_inotify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<Method>,
    properties: Vec<Property>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct TwoWay {
    object: String,
    #[serde(default)]
    events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dependency_property: Option<String>,
    bindings: Vec<usize>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Default)]
#[serde(deny_unknown_fields, default)]
struct Want {
    modes: Option<Vec<String>>,
    notify_sources: Option<Vec<Source>>,
    root: Option<Method>,
    two_way: Option<Vec<TwoWay>>,
    namespaces: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    #[serde(default)]
    data_type: Option<String>,
    #[serde(default)]
    options: Option<CompilerOptions>,
    bindings: Vec<Site>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    want: Want,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn method(m: &UpdateMethodData) -> Method {
    Method {
        parameters: m.parameters.iter().map(|p| p.key().to_string()).collect(),
        locals: m
            .expressions
            .local_variables
            .iter()
            .map(|l| format!("{} = {}", l.name, l.expression.key()))
            .collect(),
        sets: m
            .expressions
            .set_expressions
            .iter()
            .map(|s| format!("{}: {}", s.binding, s.expression.key()))
            .collect(),
        sources: m
            .update_notify_sources
            .iter()
            .map(|s| format!("{}: {}", s.source, s.source_expression.key()))
            .collect(),
        properties: m
            .update_notify_properties
            .iter()
            .map(|p| format!("{}.{}: {}", p.source, p.property, p.source_expression.key()))
            .collect(),
        handlers: m
            .set_event_handlers
            .iter()
            .map(|s| format!("{}: {}", s.source, s.source_expression.key()))
            .collect(),
    }
}

/// Render the sources of `data`, leaving out what the expected sources do not mention.
fn sources(data: &BindingsData, expected: &[Source]) -> Vec<Source> {
    data.notify_sources
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let expected = expected.get(i);
            Source {
                expression: s.expression.key().to_string(),
                source_expression: s.source_expression.key().to_string(),
                check_inotify: s.check_inotify,
                method: s.update_method.as_ref().map(method),
                properties: s
                    .properties
                    .iter()
                    .enumerate()
                    .map(|(j, p)| {
                        let expected = expected.and_then(|e| e.properties.get(j));
                        let names = expected.and_then(|e| e.names.as_ref());
                        let with_method = expected.is_some_and(|e| e.method.is_some());
                        Property {
                            name: p.property_code_name.clone(),
                            names: names.map(|_| p.property_names.clone()),
                            bindings: p.bindings.clone(),
                            set_bindings: p.set_bindings.clone(),
                            dependents: p.dependent_sources.clone(),
                            method: p
                                .update_method
                                .as_ref()
                                .filter(|_| with_method)
                                .map(method),
                        }
                    })
                    .collect(),
            }
        })
        .collect()
}

fn two_way(data: &BindingsData) -> Vec<TwoWay> {
    data.two_way_events
        .iter()
        .map(|g| TwoWay {
            object: g.object.name.to_string(),
            events: g
                .target_changed_events
                .iter()
                .map(|e| e.name.to_string())
                .collect(),
            dependency_property: g.dependency_property.as_ref().map(|m| m.name.to_string()),
            bindings: g.bindings.clone(),
        })
        .collect()
}

fn compile_case(registry: &TypeRegistry, case: &TestCase) -> Result<(BindingsData, Vec<String>)> {
    let data_type = case.data_type.as_deref().unwrap_or("App.ViewModel");
    let options = case.options.clone().unwrap_or_default();
    let mut compiler = BindingCompiler::with_options(registry, data_type, "App.MainPage", options)?;
    for site in &case.bindings {
        let object = TargetObject::new(&site.object, TypeInfo::new(&site.object_type));
        compiler.add_binding(
            BindingSite::new(
                object,
                &site.member,
                TypeInfo::new(&site.member_type),
                &site.value,
            )
            .with_namespaces(site.namespaces.clone()),
        )?;
    }
    let namespaces = compiler.namespaces().iter().cloned().collect();
    Ok((compiler.compile(), namespaces))
}

fn check(case: &TestCase, data: &BindingsData, namespaces: Vec<String>) -> Result<()> {
    let want = &case.want;
    if let Some(modes) = &want.modes {
        let actual: Vec<String> = data.bindings.iter().map(|b| b.mode.to_string()).collect();
        my_assert_eq!(actual.join(", "), modes.join(", "), "modes");
    }
    if let Some(expected) = &want.notify_sources {
        my_assert_eq!(
            serde_yaml::to_string(&sources(data, expected))?,
            serde_yaml::to_string(expected)?,
            "notify sources"
        );
    }
    if let Some(expected) = &want.root {
        my_assert_eq!(
            serde_yaml::to_string(&method(&data.update_method))?,
            serde_yaml::to_string(expected)?,
            "root update method"
        );
    }
    if let Some(expected) = &want.two_way {
        my_assert_eq!(
            serde_yaml::to_string(&two_way(data))?,
            serde_yaml::to_string(expected)?,
            "two way bindings"
        );
    }
    if let Some(expected) = &want.namespaces {
        my_assert_eq!(namespaces.join(", "), expected.join(", "), "namespaces");
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {file}");

    let registry = TypeRegistry::from_yaml_str(&std::fs::read_to_string("tests/types.yaml")?)?;
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    for case in &test.cases {
        print!("\ncase {} ", case.note);
        match compile_case(&registry, case) {
            Ok((data, namespaces)) => {
                if let Some(e) = &case.error {
                    bail!("error `{}` not raised by compiler.", e);
                }
                check(case, &data, namespaces)?;
            }
            Err(actual) => match &case.error {
                Some(expected) => {
                    let actual = actual.to_string();
                    if !actual.contains(expected) {
                        bail!(
                            "Error message\n`{}\n`\ndoes not contain `{}`",
                            actual,
                            expected
                        );
                    }
                    println!("{actual}");
                }
                _ => return Err(actual),
            },
        }

        println!("passed");
    }

    println!("{} cases passed.", test.cases.len());
    Ok(())
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

#[test_resources("tests/compiler/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
