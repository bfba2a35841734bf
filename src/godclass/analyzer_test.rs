use std::collections::BTreeSet;

use super::*;
use crate::lang::{BodyMetrics, FunctionSummary, Language, MethodSummary, parse_module};

fn method(name: &str, cyclomatic: usize, accessed: &[&str]) -> MethodSummary {
    MethodSummary {
        function: FunctionSummary {
            name: name.to_string(),
            line: 1,
            length: 5,
            metrics: BodyMetrics {
                cyclomatic,
                ..BodyMetrics::default()
            },
        },
        is_dunder: false,
        is_property: false,
        is_accessor: false,
        has_logic: cyclomatic > 1,
        accessed_fields: accessed.iter().map(|s| s.to_string()).collect(),
    }
}

fn class(name: &str, methods: Vec<MethodSummary>, fields: &[&str]) -> ClassSummary {
    ClassSummary {
        name: name.to_string(),
        line: 1,
        fields: fields.iter().map(|s| s.to_string()).collect(),
        methods,
    }
}

fn module(path: &str, classes: Vec<ClassSummary>) -> SourceModule {
    SourceModule {
        path: path.to_string(),
        language: Language::Python,
        functions: Vec::new(),
        classes,
    }
}

/// 20 methods with cyclomatic 3 (WMC 60), 15 fields, and each method
/// touching its own private field — no shared usage between any pair.
fn god_class() -> ClassSummary {
    let fields: Vec<String> = (0..15).map(|i| format!("f{i}")).collect();
    let field_refs: Vec<&str> = fields.iter().map(|s| s.as_str()).collect();
    // m0..m14 each touch a distinct field; m15..m19 touch none, so no
    // pair ever shares a field.
    let mut methods: Vec<MethodSummary> = (0..15)
        .map(|i| {
            let field = format!("f{i}");
            method(&format!("m{i}"), 3, &[field.as_str()])
        })
        .collect();
    for i in 15..20 {
        let mut m = method(&format!("m{i}"), 3, &[]);
        m.accessed_fields = BTreeSet::new();
        methods.push(m);
    }
    class("Everything", methods, &field_refs)
}

fn small_class(name: &str) -> ClassSummary {
    class(
        name,
        vec![method("a", 1, &["x"]), method("b", 1, &["x"])],
        &["x"],
    )
}

#[test]
fn god_class_is_flagged() {
    let modules = vec![module(
        "app.py",
        vec![god_class(), small_class("Tidy"), small_class("Neat")],
    )];
    let report = analyze(&modules);

    let god = report.classes.iter().find(|c| c.name == "Everything").unwrap();
    assert_eq!(god.method_count, 20);
    assert_eq!(god.field_count, 15);
    assert_eq!(god.wmc, 60);
    assert_eq!(god.tcc, 0.0, "no pair shares a field");
    assert!(god.gcs > 0.6);
    assert!(god.flagged);

    let tidy = report.classes.iter().find(|c| c.name == "Tidy").unwrap();
    assert_eq!(tidy.tcc, 1.0);
    assert!(!tidy.flagged);

    assert_eq!(report.flagged_count, 1);
    assert_eq!(report.classes[0].name, "Everything", "sorted by GCS");
}

#[test]
fn tcc_is_one_when_no_pair_qualifies() {
    // Methods that never touch fields cannot form qualifying pairs.
    let c = class(
        "Stateless",
        vec![method("a", 2, &[]), method("b", 2, &[])],
        &["unused"],
    );
    let report = analyze(&[module("s.py", vec![c])]);
    assert_eq!(report.classes[0].tcc, 1.0);
}

#[test]
fn gcs_stays_in_unit_interval() {
    let modules = vec![module(
        "app.py",
        vec![god_class(), small_class("Tidy")],
    )];
    for c in analyze(&modules).classes {
        assert!((0.0..=1.0).contains(&c.gcs), "{}: {}", c.name, c.gcs);
        assert!((0.0..=1.0).contains(&c.tcc));
    }
}

#[test]
fn cohesive_parsed_class_has_high_tcc() {
    let m = parse_module(
        "counter.py",
        b"class Counter:\n    def __init__(self):\n        self.count = 0\n\n    def bump(self):\n        if True:\n            self.count += 1\n\n    def reset(self):\n        if self.count:\n            self.count = 0\n",
    )
    .unwrap();
    let report = analyze(&[m]);
    assert_eq!(report.classes[0].tcc, 1.0, "all methods share `count`");
}

#[test]
fn empty_input_degrades_to_empty_report() {
    let report = analyze(&[]);
    assert!(report.classes.is_empty());
}
