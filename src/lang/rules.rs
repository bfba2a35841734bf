//! Grammar-driven complexity walker shared by both front-ends.
//!
//! Each language contributes node-kind tables; the walker turns a
//! function body into `BodyMetrics`. Conventions: cyclomatic counts every
//! branch point plus each short-circuit operator; cognitive follows the
//! SonarSource rules (+1 per structure, +nesting when nested, hybrids
//! like `elif`/`else if` +1 flat, +1 per boolean-operator alternation);
//! nested function and class definitions are skipped entirely.

use tree_sitter::Node;

/// Metric counts for one function body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyMetrics {
    /// 1 + branch constructs + short-circuit operators. Always ≥ 1.
    pub cyclomatic: usize,
    pub cognitive: usize,
    /// Deepest static nesting of conditionals/loops/with/try.
    pub max_nesting: usize,
    /// Branch constructs alone (conditionals, loops, cases, ternaries).
    pub branches: usize,
    /// Exception handler clauses.
    pub except_paths: usize,
}

/// Node-kind tables for one grammar.
pub(crate) struct LangRules {
    /// Conditionals, cases, ternaries: +1 cyclomatic, cognitive structure.
    pub branch_kinds: &'static [&'static str],
    pub loop_kinds: &'static [&'static str],
    /// Exception handler clauses (except/catch).
    pub except_kinds: &'static [&'static str],
    /// Kinds that deepen `max_nesting` when entered.
    pub nesting_kinds: &'static [&'static str],
    /// Hybrid conditionals (`elif`): +1 cyclomatic, +1 flat cognitive.
    pub hybrid_kinds: &'static [&'static str],
    pub else_kinds: &'static [&'static str],
    /// Short-circuit operator node kind plus its operator spellings.
    pub bool_op_kind: &'static str,
    pub bool_op_tokens: &'static [&'static str],
    /// Nested definitions: skipped, not analyzed, not counted.
    pub skip_kinds: &'static [&'static str],
    /// `if` directly under an else clause is an `else if` hybrid
    /// (brace languages; Python spells it `elif`).
    pub else_if_is_hybrid: bool,
}

pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Compute metrics for a function body subtree.
pub(crate) fn body_metrics(body: Node, source: &str, rules: &LangRules) -> BodyMetrics {
    let mut metrics = BodyMetrics {
        cyclomatic: 1,
        ..BodyMetrics::default()
    };
    walk_children(body, source, rules, 0, 0, &mut metrics);
    metrics
}

/// True when a subtree contains any of `kinds`, without descending into
/// nested definitions. Used for logic detection in method bodies.
pub(crate) fn contains_kind(node: Node, kinds: &[&str], skip: &[&str]) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if skip.contains(&child.kind()) {
            continue;
        }
        if kinds.contains(&child.kind()) || contains_kind(child, kinds, skip) {
            return true;
        }
    }
    false
}

/// Count statement-level children of a body node, ignoring punctuation.
pub(crate) fn statement_count(body: Node) -> usize {
    let mut cursor = body.walk();
    body.named_children(&mut cursor).count()
}

fn walk_children(
    node: Node,
    source: &str,
    rules: &LangRules,
    cog_depth: usize,
    nest_depth: usize,
    metrics: &mut BodyMetrics,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, rules, cog_depth, nest_depth, metrics);
    }
}

fn visit(
    node: Node,
    source: &str,
    rules: &LangRules,
    cog_depth: usize,
    nest_depth: usize,
    metrics: &mut BodyMetrics,
) {
    let kind = node.kind();
    if rules.skip_kinds.contains(&kind) {
        return;
    }

    if kind == rules.bool_op_kind && is_bool_op(node, source, rules) {
        let mut ops: Vec<&str> = Vec::new();
        let mut operands: Vec<Node> = Vec::new();
        flatten_bool_chain(node, source, rules, &mut ops, &mut operands);
        metrics.cyclomatic += ops.len();
        metrics.cognitive += operator_runs(&ops);
        for operand in operands {
            visit(operand, source, rules, cog_depth, nest_depth, metrics);
        }
        return;
    }

    let nests = rules.nesting_kinds.contains(&kind);
    let entered_nest = if nests { nest_depth + 1 } else { nest_depth };
    if nests {
        metrics.max_nesting = metrics.max_nesting.max(entered_nest);
    }

    let is_hybrid = rules.hybrid_kinds.contains(&kind)
        || (rules.else_if_is_hybrid
            && kind == "if_statement"
            && node
                .parent()
                .is_some_and(|p| rules.else_kinds.contains(&p.kind())));

    if is_hybrid {
        // Hybrid (`elif` / `else if`): +1 flat, body at the same
        // cognitive depth as the matching `if` body.
        metrics.cyclomatic += 1;
        metrics.branches += 1;
        metrics.cognitive += 1;
        walk_children(node, source, rules, cog_depth, entered_nest, metrics);
    } else if rules.branch_kinds.contains(&kind) || rules.loop_kinds.contains(&kind) {
        metrics.cyclomatic += 1;
        metrics.branches += 1;
        metrics.cognitive += 1 + cog_depth;
        walk_children(node, source, rules, cog_depth + 1, entered_nest, metrics);
    } else if rules.except_kinds.contains(&kind) {
        metrics.cyclomatic += 1;
        metrics.except_paths += 1;
        metrics.cognitive += 1 + cog_depth;
        walk_children(node, source, rules, cog_depth + 1, entered_nest, metrics);
    } else if rules.else_kinds.contains(&kind) {
        // An else that only wraps an `else if` is counted by the hybrid,
        // and keeps the chain at the original if's body depth.
        let wraps_if = rules.else_if_is_hybrid && has_direct_child(node, "if_statement");
        if !wraps_if {
            metrics.cognitive += 1;
        }
        // The else body sits at the same cognitive depth as the if body;
        // the depth bump already happened when entering the if.
        walk_children(node, source, rules, cog_depth, entered_nest, metrics);
    } else {
        walk_children(node, source, rules, cog_depth, entered_nest, metrics);
    }
}

fn has_direct_child(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == kind)
}

fn is_bool_op(node: Node, source: &str, rules: &LangRules) -> bool {
    node.child_by_field_name("operator")
        .is_some_and(|op| rules.bool_op_tokens.contains(&node_text(op, source)))
}

/// Flatten a short-circuit chain in source order, collecting operator
/// spellings and the non-boolean operand subtrees.
fn flatten_bool_chain<'a>(
    node: Node<'a>,
    source: &str,
    rules: &LangRules,
    ops: &mut Vec<&'a str>,
    operands: &mut Vec<Node<'a>>,
) {
    if node.kind() == rules.bool_op_kind && is_bool_op(node, source, rules) {
        let (Some(left), Some(op), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            operands.push(node);
            return;
        };
        flatten_bool_chain(left, source, rules, ops, operands);
        // Operator spellings are static strings in both grammars.
        ops.push(op.kind());
        flatten_bool_chain(right, source, rules, ops, operands);
    } else {
        operands.push(node);
    }
}

/// Number of maximal runs of identical operators: `a && b && c` → 1,
/// `a && b || c` → 2.
fn operator_runs(ops: &[&str]) -> usize {
    if ops.is_empty() {
        return 0;
    }
    1 + ops.windows(2).filter(|w| w[0] != w[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_runs_counts_alternations() {
        assert_eq!(operator_runs(&[]), 0);
        assert_eq!(operator_runs(&["and"]), 1);
        assert_eq!(operator_runs(&["and", "and"]), 1);
        assert_eq!(operator_runs(&["and", "or"]), 2);
        assert_eq!(operator_runs(&["and", "or", "or", "and"]), 3);
    }
}
