//! Static outline of a Python module
//!
//! Parses the source with tree-sitter and recovers the classes defined when
//! the module is imported, along with `from ... import X as Y` aliases.
//! Nothing is executed. Function and class bodies are not entered; module
//! level `if`/`try`/`with` blocks are.

use std::collections::HashMap;

use thiserror::Error;
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("python grammar could not be loaded: {0}")]
    Grammar(String),

    #[error("source could not be parsed")]
    Unparsable,

    #[error("line {line}: invalid syntax")]
    Syntax { line: usize },
}

/// A class statement executed at import time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    /// Base expressions as dotted names, e.g. `wpilib.TimedRobot`
    pub bases: Vec<String>,
    /// Line of the `class` keyword
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleOutline {
    /// In definition order; a name may appear more than once
    pub classes: Vec<ClassDef>,
    /// alias -> imported name
    pub aliases: HashMap<String, String>,
}

impl ModuleOutline {
    /// The class name a base expression refers to.
    ///
    /// Dotted bases resolve to their last segment; bare names have
    /// `from m import Name as Alias` undone.
    pub fn resolve<'a>(&'a self, base: &'a str) -> &'a str {
        match base.rsplit_once('.') {
            Some((_, last)) => last,
            None => self.aliases.get(base).map_or(base, String::as_str),
        }
    }
}

pub fn outline(source: &str) -> Result<ModuleOutline, OutlineError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| OutlineError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or(OutlineError::Unparsable)?;
    let root = tree.root_node();

    if root.has_error() {
        let line = first_error(root).map_or(1, |node| node.start_position().row + 1);
        return Err(OutlineError::Syntax { line });
    }

    let mut outline = ModuleOutline::default();
    collect(root, source.as_bytes(), &mut outline);
    Ok(outline)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(Node::has_error)
        .find_map(first_error)
}

fn collect(scope: Node<'_>, src: &[u8], outline: &mut ModuleOutline) {
    for node in named_children(scope) {
        match node.kind() {
            "class_definition" => outline.classes.extend(class_def(node, src)),
            "decorated_definition" => {
                if let Some(def) = node
                    .child_by_field_name("definition")
                    .filter(|def| def.kind() == "class_definition")
                {
                    outline.classes.extend(class_def(def, src));
                }
            }
            "import_from_statement" => record_aliases(node, src, &mut outline.aliases),
            "if_statement" | "elif_clause" | "else_clause" | "try_statement"
            | "except_clause" | "finally_clause" | "with_statement" | "block" => {
                collect(node, src, outline);
            }
            _ => {}
        }
    }
}

fn class_def(node: Node<'_>, src: &[u8]) -> Option<ClassDef> {
    let name = text(node.child_by_field_name("name")?, src)?;
    // Keyword arguments such as `metaclass=` are not bases
    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| {
            named_children(args)
                .into_iter()
                .filter_map(|arg| dotted(arg, src))
                .collect()
        })
        .unwrap_or_default();

    Some(ClassDef {
        name,
        bases,
        line: node.start_position().row + 1,
    })
}

fn record_aliases(node: Node<'_>, src: &[u8], aliases: &mut HashMap<String, String>) {
    let mut cursor = node.walk();
    for imported in node.children_by_field_name("name", &mut cursor) {
        if imported.kind() != "aliased_import" {
            continue;
        }
        let name = imported
            .child_by_field_name("name")
            .and_then(|name| dotted(name, src));
        let alias = imported
            .child_by_field_name("alias")
            .and_then(|alias| text(alias, src));
        if let (Some(name), Some(alias)) = (name, alias) {
            let target = name.rsplit_once('.').map_or(name.as_str(), |(_, last)| last);
            aliases.insert(alias, target.to_string());
        }
    }
}

/// `a.b.c` for names, attribute chains and subscripted generics; `None`
/// for anything else.
fn dotted(node: Node<'_>, src: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => text(node, src),
        "attribute" => {
            let object = dotted(node.child_by_field_name("object")?, src)?;
            let attribute = text(node.child_by_field_name("attribute")?, src)?;
            Some(format!("{object}.{attribute}"))
        }
        "dotted_name" => named_children(node)
            .into_iter()
            .map(|part| text(part, src))
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(".")),
        "subscript" => dotted(node.child_by_field_name("value")?, src),
        _ => None,
    }
}

fn text(node: Node<'_>, src: &[u8]) -> Option<String> {
    node.utf8_text(src).ok().map(str::to_string)
}
