use crate::lang::parse_module;

fn parse(source: &str) -> crate::lang::SourceModule {
    parse_module("m.py", source.as_bytes()).unwrap()
}

#[test]
fn simple_function_has_cyclomatic_one() {
    let m = parse("def f():\n    return 1\n");
    let f = &m.functions[0];
    assert_eq!(f.name, "f");
    assert_eq!(f.line, 1);
    assert_eq!(f.metrics.cyclomatic, 1);
    assert_eq!(f.metrics.cognitive, 0);
    assert_eq!(f.metrics.max_nesting, 0);
}

#[test]
fn if_with_short_circuit() {
    let m = parse("def f(x):\n    if x > 0 and x < 10:\n        return 1\n    return 0\n");
    let f = &m.functions[0];
    // 1 base + if + one `and`
    assert_eq!(f.metrics.cyclomatic, 3);
    // +1 structure, +1 operator sequence
    assert_eq!(f.metrics.cognitive, 2);
    assert_eq!(f.metrics.branches, 1);
    assert_eq!(f.metrics.max_nesting, 1);
}

#[test]
fn operator_alternation_costs_extra() {
    let a = parse("def f(x, y, z):\n    if x and y and z:\n        return 1\n");
    let b = parse("def f(x, y, z):\n    if x and y or z:\n        return 1\n");
    assert_eq!(a.functions[0].metrics.cognitive + 1, b.functions[0].metrics.cognitive);
    // Same path count either way
    assert_eq!(a.functions[0].metrics.cyclomatic, b.functions[0].metrics.cyclomatic);
}

#[test]
fn elif_chain_counts_flat_for_cognitive() {
    let m = parse(
        "def g(x):\n    if x == 1:\n        return 'a'\n    elif x == 2:\n        return 'b'\n    else:\n        return 'c'\n",
    );
    let f = &m.functions[0];
    assert_eq!(f.metrics.cyclomatic, 3); // base + if + elif
    assert_eq!(f.metrics.cognitive, 3); // if +1, elif +1, else +1
    // elif counts as nested for the nesting measure
    assert_eq!(f.metrics.max_nesting, 2);
}

#[test]
fn nesting_penalizes_cognitive_and_tracks_depth() {
    let m = parse(
        "def h(items):\n    for item in items:\n        if item:\n            with open(item) as fh:\n                try:\n                    fh.read()\n                except OSError:\n                    pass\n",
    );
    let f = &m.functions[0];
    assert_eq!(f.metrics.cyclomatic, 4); // base + for + if + except
    assert_eq!(f.metrics.cognitive, 6); // for:1, if:2, except:3
    assert_eq!(f.metrics.max_nesting, 4); // for > if > with > try
    assert_eq!(f.metrics.except_paths, 1);
    assert_eq!(f.metrics.branches, 2);
}

#[test]
fn ternary_is_a_branch() {
    let m = parse("def t(x):\n    return 1 if x else 2\n");
    assert_eq!(m.functions[0].metrics.cyclomatic, 2);
    assert_eq!(m.functions[0].metrics.branches, 1);
}

#[test]
fn nested_definitions_are_skipped() {
    let m = parse(
        "def outer():\n    def inner(x):\n        if x:\n            return 1\n    return inner\n",
    );
    assert_eq!(m.functions.len(), 1, "inner must not be reported");
    assert_eq!(m.functions[0].name, "outer");
    assert_eq!(m.functions[0].metrics.cyclomatic, 1, "inner's if must not count");
}

#[test]
fn decorated_top_level_function_is_found() {
    let m = parse("@cached\ndef f():\n    return 1\n");
    assert_eq!(m.functions.len(), 1);
    assert_eq!(m.functions[0].name, "f");
}

const ACCOUNT: &str = "\
class Account:
    kind = \"basic\"

    def __init__(self, owner):
        self.owner = owner
        self.balance = 0

    @property
    def display(self):
        return self.owner

    def get_balance(self):
        return self.balance

    def deposit(self, amount):
        if amount <= 0:
            raise ValueError(\"bad amount\")
        self.balance += amount
";

#[test]
fn class_fields_from_attributes_and_ctor() {
    let m = parse(ACCOUNT);
    assert_eq!(m.classes.len(), 1);
    let c = &m.classes[0];
    assert_eq!(c.name, "Account");
    let fields: Vec<&str> = c.fields.iter().map(|s| s.as_str()).collect();
    assert_eq!(fields, vec!["balance", "kind", "owner"]);
}

#[test]
fn method_classification_flags() {
    let m = parse(ACCOUNT);
    let c = &m.classes[0];
    let by_name = |name: &str| c.methods.iter().find(|m| m.function.name == name).unwrap();

    let init = by_name("__init__");
    assert!(init.is_dunder);

    let display = by_name("display");
    assert!(display.is_property);
    assert!(display.is_accessor, "single return self.x is accessor-shaped");
    assert!(!display.has_logic);

    let getter = by_name("get_balance");
    assert!(getter.is_accessor);
    assert!(!getter.is_dunder);

    let deposit = by_name("deposit");
    assert!(deposit.has_logic);
    assert!(!deposit.is_accessor);
    assert_eq!(deposit.function.metrics.cyclomatic, 2);
}

#[test]
fn method_field_accesses_are_collected() {
    let m = parse(ACCOUNT);
    let c = &m.classes[0];
    let deposit = c
        .methods
        .iter()
        .find(|m| m.function.name == "deposit")
        .unwrap();
    assert!(deposit.accessed_fields.contains("balance"));
    assert!(!deposit.accessed_fields.contains("owner"));
}

#[test]
fn module_with_only_statements_has_no_summaries() {
    let m = parse("x = 1\nprint(x)\n");
    assert!(m.functions.is_empty());
    assert!(m.classes.is_empty());
}
