//! TypeScript/JavaScript front-end, via the external TypeScript grammar.
//!
//! Covers `function` declarations, arrow/function-expression consts at
//! the top level, and classes with field definitions and methods.

use std::collections::BTreeSet;

use tree_sitter::Node;

use super::rules::{LangRules, body_metrics, contains_kind, node_text, statement_count};
use super::{ClassSummary, FunctionSummary, MethodSummary};

const RULES: LangRules = LangRules {
    branch_kinds: &["if_statement", "switch_case", "ternary_expression"],
    loop_kinds: &[
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
    ],
    except_kinds: &["catch_clause"],
    nesting_kinds: &[
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
        "try_statement",
        "switch_statement",
    ],
    hybrid_kinds: &[],
    else_kinds: &["else_clause"],
    bool_op_kind: "binary_expression",
    bool_op_tokens: &["&&", "||", "??"],
    skip_kinds: &[
        "function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "generator_function_declaration",
        "arrow_function",
        "class_declaration",
        "class",
        "method_definition",
    ],
    else_if_is_hybrid: true,
};

/// Logic kinds for the anemic analysis (control flow, loops, exceptions).
const LOGIC_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "try_statement",
    "switch_statement",
    "throw_statement",
];

pub(crate) fn extract(root: Node, source: &str) -> (Vec<FunctionSummary>, Vec<ClassSummary>) {
    let mut functions = Vec::new();
    let mut classes = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        // `export function f()…` / `export class C…`
        let node = if child.kind() == "export_statement" {
            child.child_by_field_name("declaration").unwrap_or(child)
        } else {
            child
        };
        collect_top_level(node, source, &mut functions, &mut classes);
    }

    (functions, classes)
}

fn collect_top_level(
    node: Node,
    source: &str,
    functions: &mut Vec<FunctionSummary>,
    classes: &mut Vec<ClassSummary>,
) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(f) = function_summary(node, source, None) {
                functions.push(f);
            }
        }
        "class_declaration" => {
            if let Some(c) = class_summary(node, source) {
                classes.push(c);
            }
        }
        // `const f = () => …` / `const f = function …`
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(value) = declarator.child_by_field_name("value") else {
                    continue;
                };
                if matches!(
                    value.kind(),
                    "arrow_function" | "function_expression" | "function" | "generator_function"
                ) && let Some(name_node) = declarator.child_by_field_name("name")
                    && let Some(f) =
                        function_summary(value, source, Some(node_text(name_node, source)))
                {
                    functions.push(f);
                }
            }
        }
        _ => {}
    }
}

fn function_summary(node: Node, source: &str, name_override: Option<&str>) -> Option<FunctionSummary> {
    let name = match name_override {
        Some(n) => n.to_string(),
        None => node_text(node.child_by_field_name("name")?, source).to_string(),
    };
    // Arrow functions may have an expression body instead of a block.
    let body = node.child_by_field_name("body")?;
    Some(FunctionSummary {
        name,
        line: node.start_position().row + 1,
        length: node.end_position().row - node.start_position().row + 1,
        metrics: body_metrics(body, source, &RULES),
    })
}

fn class_summary(node: Node, source: &str) -> Option<ClassSummary> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let body = node.child_by_field_name("body")?;

    let mut fields: BTreeSet<String> = BTreeSet::new();
    let mut methods: Vec<MethodSummary> = Vec::new();

    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "public_field_definition" | "field_definition" => {
                if let Some(name_node) = member.child_by_field_name("name") {
                    fields.insert(node_text(name_node, source).to_string());
                }
            }
            "method_definition" => {
                if let Some(m) = method_summary(member, source) {
                    if m.function.name == "constructor" {
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

fn method_summary(node: Node, source: &str) -> Option<MethodSummary> {
    let function = function_summary(node, source, None)?;
    let body = node.child_by_field_name("body")?;

    let name = function.name.clone();
    let is_ctor = name == "constructor";
    // `get x() {…}` / `set x(v) {…}` accessors carry a bare keyword child.
    let is_property = {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|c| matches!(c.kind(), "get" | "set"))
    };
    let has_logic = contains_kind(body, LOGIC_KINDS, RULES.skip_kinds);

    let mut accessed_fields = BTreeSet::new();
    collect_this_accesses(body, source, &mut accessed_fields);

    Some(MethodSummary {
        is_dunder: is_ctor,
        is_property,
        is_accessor: accessor_shape(&name, body, source, has_logic),
        has_logic,
        accessed_fields,
        function,
    })
}

/// Getter/setter shape: no logic and either a `get`/`set`-prefixed name
/// over a tiny body, or a single return / assignment of a `this.` member.
fn accessor_shape(name: &str, body: Node, source: &str, has_logic: bool) -> bool {
    if has_logic {
        return false;
    }
    let stmts = statement_count(body);
    if (name.starts_with("get") || name.starts_with("set")) && stmts <= 2 {
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
            .is_some_and(|v| v.kind() == "member_expression" && is_this_member(v)),
        "expression_statement" => stmt.child(0).is_some_and(|e| {
            e.kind() == "assignment_expression"
                && e.child_by_field_name("left")
                    .is_some_and(|l| l.kind() == "member_expression" && is_this_member(l))
        }),
        _ => false,
    }
}

fn is_this_member(member: Node) -> bool {
    member
        .child_by_field_name("object")
        .is_some_and(|o| o.kind() == "this")
}

/// `this.x = …` assignments anywhere in the constructor body.
fn collect_ctor_fields(ctor: Node, source: &str, fields: &mut BTreeSet<String>) {
    let Some(body) = ctor.child_by_field_name("body") else {
        return;
    };
    collect_assigned_members(body, source, fields);
}

fn collect_assigned_members(node: Node, source: &str, fields: &mut BTreeSet<String>) {
    if node.kind() == "assignment_expression"
        && let Some(left) = node.child_by_field_name("left")
        && left.kind() == "member_expression"
        && is_this_member(left)
        && let Some(prop) = left.child_by_field_name("property")
    {
        fields.insert(node_text(prop, source).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if RULES.skip_kinds.contains(&child.kind()) {
            continue;
        }
        collect_assigned_members(child, source, fields);
    }
}

/// Every `this.x` read or write in a method body.
fn collect_this_accesses(node: Node, source: &str, fields: &mut BTreeSet<String>) {
    if node.kind() == "member_expression"
        && is_this_member(node)
        && let Some(prop) = node.child_by_field_name("property")
    {
        fields.insert(node_text(prop, source).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if RULES.skip_kinds.contains(&child.kind()) {
            continue;
        }
        collect_this_accesses(child, source, fields);
    }
}

#[cfg(test)]
#[path = "typescript_test.rs"]
mod tests;
