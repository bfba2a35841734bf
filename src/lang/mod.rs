//! AST front-ends for the structural analyzers.
//!
//! Two tree-sitter grammars — Python (canonical) and TypeScript/JavaScript
//! (secondary) — are normalized into the same structural summaries:
//! top-level functions and classes with their direct methods, per-body
//! complexity metrics, declared fields, and field-access sets. The
//! complexity/anemic/god-class pipelines only ever see these summaries,
//! never grammar nodes.

mod python;
mod rules;
mod typescript;

use std::collections::BTreeSet;

use tree_sitter::Parser;

pub use rules::BodyMetrics;

/// Supported source languages, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    TypeScript,
}

impl Language {
    pub fn detect(path: &str) -> Option<Self> {
        let ext = std::path::Path::new(path).extension()?.to_str()?;
        match ext {
            "py" | "pyi" => Some(Language::Python),
            "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Language::TypeScript),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::language(),
            Language::TypeScript => tree_sitter_typescript::language_typescript(),
        }
    }
}

/// A function (or method) body reduced to its metric counts.
#[derive(Debug, Clone)]
pub struct FunctionSummary {
    pub name: String,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Declaration-to-end line span.
    pub length: usize,
    pub metrics: BodyMetrics,
}

/// A method with the classification bits the anemic/god-class analyzers
/// consume.
#[derive(Debug, Clone)]
pub struct MethodSummary {
    pub function: FunctionSummary,
    /// Python dunder (`__init__`), or a TS constructor.
    pub is_dunder: bool,
    /// `@property`-style decorated, or a TS get/set accessor.
    pub is_property: bool,
    /// Recognized getter/setter shape (trivial body around one field).
    pub is_accessor: bool,
    /// Body contains control flow, a loop, exception handling, or a
    /// resource block.
    pub has_logic: bool,
    /// Names accessed through `self.`/`this.` in the body.
    pub accessed_fields: BTreeSet<String>,
}

/// A class with declared fields and direct methods.
#[derive(Debug, Clone)]
pub struct ClassSummary {
    pub name: String,
    pub line: usize,
    /// Declared class attributes plus constructor self-assignments.
    pub fields: BTreeSet<String>,
    pub methods: Vec<MethodSummary>,
}

/// Structural summary of one source file.
#[derive(Debug, Clone)]
pub struct SourceModule {
    pub path: String,
    pub language: Language,
    /// Top-level functions only; nested definitions are skipped.
    pub functions: Vec<FunctionSummary>,
    pub classes: Vec<ClassSummary>,
}

/// Parse a source file into its structural summary.
///
/// Returns `None` for unsupported extensions, undecodable bytes, or a
/// grammar failure — callers warn and skip, they never fail the run.
pub fn parse_module(path: &str, bytes: &[u8]) -> Option<SourceModule> {
    let language = Language::detect(path)?;
    let source = std::str::from_utf8(bytes).ok()?;

    let mut parser = Parser::new();
    parser.set_language(&language.grammar()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();

    let (functions, classes) = match language {
        Language::Python => python::extract(root, source),
        Language::TypeScript => typescript::extract(root, source),
    };

    Some(SourceModule {
        path: path.to_string(),
        language,
        functions,
        classes,
    })
}

/// Dotted module token used for textual reference counting, e.g.
/// `src/models/user.py` → `src.models.user`, `web/api.ts` → `web/api`.
pub fn module_token(path: &str, language: Language) -> String {
    let stem = path
        .rsplit_once('.')
        .map(|(head, _)| head)
        .unwrap_or(path);
    match language {
        Language::Python => stem.replace('/', "."),
        Language::TypeScript => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_languages_by_extension() {
        assert_eq!(Language::detect("a/b.py"), Some(Language::Python));
        assert_eq!(Language::detect("a/b.tsx"), Some(Language::TypeScript));
        assert_eq!(Language::detect("a/b.mjs"), Some(Language::TypeScript));
        assert_eq!(Language::detect("a/b.rs"), None);
        assert_eq!(Language::detect("Makefile"), None);
    }

    #[test]
    fn module_tokens() {
        assert_eq!(
            module_token("src/models/user.py", Language::Python),
            "src.models.user"
        );
        assert_eq!(
            module_token("web/api/client.ts", Language::TypeScript),
            "web/api/client"
        );
    }

    #[test]
    fn unsupported_or_binary_input_is_none() {
        assert!(parse_module("a.rs", b"fn main() {}").is_none());
        assert!(parse_module("a.py", &[0xff, 0xfe, 0x00]).is_none());
    }

    #[test]
    fn parses_a_trivial_module_per_language() {
        let py = parse_module("m.py", b"def f():\n    return 1\n").unwrap();
        assert_eq!(py.functions.len(), 1);
        assert_eq!(py.functions[0].name, "f");

        let ts = parse_module("m.ts", b"function f() { return 1; }\n").unwrap();
        assert_eq!(ts.functions.len(), 1);
        assert_eq!(ts.functions[0].name, "f");
    }
}
