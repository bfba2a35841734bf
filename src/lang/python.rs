//! Python front-end: extraction of top-level functions and classes from
//! a tree-sitter parse.

use std::collections::BTreeSet;

use tree_sitter::Node;

use super::rules::{LangRules, body_metrics, contains_kind, node_text, statement_count};
use super::{ClassSummary, FunctionSummary, MethodSummary};

const RULES: LangRules = LangRules {
    branch_kinds: &["if_statement", "case_clause", "conditional_expression"],
    loop_kinds: &["for_statement", "while_statement"],
    except_kinds: &["except_clause"],
    nesting_kinds: &[
        "if_statement",
        "elif_clause",
        "for_statement",
        "while_statement",
        "try_statement",
        "with_statement",
        "match_statement",
    ],
    hybrid_kinds: &["elif_clause"],
    else_kinds: &["else_clause"],
    bool_op_kind: "boolean_operator",
    bool_op_tokens: &["and", "or"],
    skip_kinds: &["function_definition", "class_definition", "lambda"],
    else_if_is_hybrid: false,
};

/// Node kinds that make a method "have logic" for the anemic analysis:
/// control flow, loops, exception handling, resource blocks.
const LOGIC_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "with_statement",
    "match_statement",
    "raise_statement",
];

pub(crate) fn extract(root: Node, source: &str) -> (Vec<FunctionSummary>, Vec<ClassSummary>) {
    let mut functions = Vec::new();
    let mut classes = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let (node, decorators) = unwrap_decorated(child, source);
        match node.kind() {
            "function_definition" => {
                if let Some(f) = function_summary(node, source) {
                    functions.push(f);
                }
            }
            "class_definition" => {
                if let Some(c) = class_summary(node, source, &decorators) {
                    classes.push(c);
                }
            }
            _ => {}
        }
    }

    (functions, classes)
}

/// Peel a `decorated_definition` down to its definition, collecting
/// decorator texts (without the `@`).
fn unwrap_decorated<'a>(node: Node<'a>, source: &str) -> (Node<'a>, Vec<String>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(node_text(child, source).trim_start_matches('@').to_string());
        }
    }
    let inner = node
        .child_by_field_name("definition")
        .unwrap_or(node);
    (inner, decorators)
}

fn function_summary(node: Node, source: &str) -> Option<FunctionSummary> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let body = node.child_by_field_name("body")?;
    Some(FunctionSummary {
        name,
        line: node.start_position().row + 1,
        length: node.end_position().row - node.start_position().row + 1,
        metrics: body_metrics(body, source, &RULES),
    })
}

fn class_summary(node: Node, source: &str, _decorators: &[String]) -> Option<ClassSummary> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let body = node.child_by_field_name("body")?;

    let mut fields: BTreeSet<String> = BTreeSet::new();
    let mut methods: Vec<MethodSummary> = Vec::new();

    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        let (member, decorators) = unwrap_decorated(child, source);
        match member.kind() {
            // Class attribute: `x = 0` or `x: int = 0` at class level.
            "expression_statement" => {
                if let Some(assignment) = member.child(0).filter(|n| n.kind() == "assignment")
                    && let Some(left) = assignment.child_by_field_name("left")
                    && left.kind() == "identifier"
                {
                    fields.insert(node_text(left, source).to_string());
                }
            }
            "function_definition" => {
                if let Some(m) = method_summary(member, source, &decorators) {
                    if m.function.name == "__init__" {
                        collect_ctor_fields(member, source, &mut fields);
                    }
                    methods.push(m);
                }
            }
            _ => {}
        }
    }

    Some(ClassSummary {
        name,
        line: node.start_position().row + 1,
        fields,
        methods,
    })
}

fn method_summary(node: Node, source: &str, decorators: &[String]) -> Option<MethodSummary> {
    let function = function_summary(node, source)?;
    let body = node.child_by_field_name("body")?;

    let name = function.name.clone();
    let is_dunder = name.starts_with("__") && name.ends_with("__") && name.len() > 4;
    let is_property = decorators.iter().any(|d| {
        d == "property"
            || d == "cached_property"
            || d.ends_with(".setter")
            || d.ends_with(".getter")
            || d.ends_with(".deleter")
    });
    let has_logic = contains_kind(body, LOGIC_KINDS, RULES.skip_kinds);

    let mut accessed_fields = BTreeSet::new();
    collect_self_accesses(body, source, &mut accessed_fields);

    Some(MethodSummary {
        is_dunder,
        is_property,
        is_accessor: accessor_shape(&name, body, source, has_logic),
        has_logic,
        accessed_fields,
        function,
    })
}

/// Getter/setter shape: no logic and either a `get_`/`set_` name over a
/// tiny body, or a single return-of-attribute / attribute-assignment.
fn accessor_shape(name: &str, body: Node, source: &str, has_logic: bool) -> bool {
    if has_logic {
        return false;
    }
    let stmts = statement_count(body);
    if (name.starts_with("get_") || name.starts_with("set_")) && stmts <= 2 {
        return true;
    }
    if stmts != 1 {
        return false;
    }
    let Some(stmt) = body.named_child(0) else {
        return false;
    };
    match stmt.kind() {
        "return_statement" => stmt
            .named_child(0)
            .is_some_and(|v| v.kind() == "attribute" && is_self_attribute(v, source)),
        "expression_statement" => stmt.child(0).is_some_and(|e| {
            e.kind() == "assignment"
                && e.child_by_field_name("left")
                    .is_some_and(|l| l.kind() == "attribute" && is_self_attribute(l, source))
        }),
        _ => false,
    }
}

fn is_self_attribute(attribute: Node, source: &str) -> bool {
    attribute
        .child_by_field_name("object")
        .is_some_and(|o| o.kind() == "identifier" && node_text(o, source) == "self")
}

/// `self.x = …` assignments anywhere in the constructor body.
fn collect_ctor_fields(init: Node, source: &str, fields: &mut BTreeSet<String>) {
    let Some(body) = init.child_by_field_name("body") else {
        return;
    };
    collect_assigned_attributes(body, source, fields);
}

fn collect_assigned_attributes(node: Node, source: &str, fields: &mut BTreeSet<String>) {
    if node.kind() == "assignment"
        && let Some(left) = node.child_by_field_name("left")
        && left.kind() == "attribute"
        && is_self_attribute(left, source)
        && let Some(attr) = left.child_by_field_name("attribute")
    {
        fields.insert(node_text(attr, source).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if RULES.skip_kinds.contains(&child.kind()) {
            continue;
        }
        collect_assigned_attributes(child, source, fields);
    }
}

/// Every `self.x` read or write in a method body.
fn collect_self_accesses(node: Node, source: &str, fields: &mut BTreeSet<String>) {
    if node.kind() == "attribute"
        && is_self_attribute(node, source)
        && let Some(attr) = node.child_by_field_name("attribute")
    {
        fields.insert(node_text(attr, source).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if RULES.skip_kinds.contains(&child.kind()) {
            continue;
        }
        collect_self_accesses(child, source, fields);
    }
}

#[cfg(test)]
#[path = "python_test.rs"]
mod tests;
