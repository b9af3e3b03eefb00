//! Java source parsing on top of tree-sitter.
//!
//! Lowers a compilation unit into a [`SourceUnit`]: the package name plus every
//! class and interface declared in the file, nested and local ones included.
//! Enums, records and annotation types are skipped but searched for nested
//! declarations.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tree_sitter::{Node, Parser};

use crate::model::{
    Annotation, DeclaredType, MethodDeclaration, Parameter, SourceUnit, TypeKind, TypeReference,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load the Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

pub fn parse_file(path: &Path, lenient: bool) -> Result<SourceUnit, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // invalid UTF-8 (e.g. a Latin-1 comment) is replaced, not rejected
    let source = String::from_utf8_lossy(&bytes);
    parse_source(&source, path, lenient)
}

/// Parses `source`. Unless `lenient` is set, a tree containing error or
/// missing nodes is rejected.
pub fn parse_source(source: &str, path: &Path, lenient: bool) -> Result<SourceUnit, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_java::LANGUAGE.into())?;
    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() && !lenient {
        let (line, column) = first_error(&root)
            .map(|node| {
                let pos = node.start_position();
                (pos.row + 1, pos.column + 1)
            })
            .unwrap_or((1, 1));
        return Err(ParseError::Syntax { line, column });
    }

    let bytes = source.as_bytes();
    let mut package = None;
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let pkg = extract_package(&child, bytes);
            if !pkg.is_empty() {
                package = Some(pkg);
            }
        }
    }

    let mut types = Vec::new();
    collect_types(&root, bytes, &mut types);

    Ok(SourceUnit {
        path: path.to_path_buf(),
        package,
        types,
    })
}

fn first_error<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find_map(|child| first_error(&child))
}

fn extract_package(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
            return compact(node_text(&child, source));
        }
    }
    String::new()
}

fn collect_types(node: &Node, source: &[u8], out: &mut Vec<DeclaredType>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let declared = match child.kind() {
            "class_declaration" => declared_type(&child, source, TypeKind::Class),
            "interface_declaration" => declared_type(&child, source, TypeKind::Interface),
            _ => None,
        };
        if let Some(declared) = declared {
            out.push(declared);
        }
        collect_types(&child, source, out);
    }
}

fn declared_type(node: &Node, source: &[u8], kind: TypeKind) -> Option<DeclaredType> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .filter(|n| !n.is_empty())?;

    let implemented = match kind {
        TypeKind::Class => node
            .child_by_field_name("interfaces")
            .map(|interfaces| extract_interfaces(&interfaces, source))
            .unwrap_or_default(),
        TypeKind::Interface => Vec::new(),
    };

    let methods = node
        .child_by_field_name("body")
        .map(|body| extract_methods(&body, source))
        .unwrap_or_default();

    Some(DeclaredType {
        name,
        kind,
        annotations: extract_annotations(node, source),
        methods,
        implemented,
    })
}

/// Annotations from the `modifiers` child plus any written directly on the
/// node (method headers allow `<T> @A Type m()`).
fn extract_annotations(node: &Node, source: &[u8]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifiers" => {
                let mut inner = child.walk();
                for modifier in child.children(&mut inner) {
                    if let Some(a) = annotation(&modifier, source) {
                        annotations.push(a);
                    }
                }
            }
            _ => {
                if let Some(a) = annotation(&child, source) {
                    annotations.push(a);
                }
            }
        }
    }
    annotations
}

fn annotation(node: &Node, source: &[u8]) -> Option<Annotation> {
    match node.kind() {
        "marker_annotation" | "annotation" => {
            let name = compact(node_text(&node.child_by_field_name("name")?, source));
            if name.is_empty() {
                None
            } else {
                Some(Annotation::new(name))
            }
        }
        _ => None,
    }
}

fn extract_interfaces(node: &Node, source: &[u8]) -> Vec<TypeReference> {
    let mut refs = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "type_list" {
            continue;
        }
        let mut inner = child.walk();
        for ty in child.named_children(&mut inner) {
            if let Some(r) = type_reference(&ty, source) {
                refs.push(r);
            }
        }
    }
    refs
}

fn type_reference(node: &Node, source: &[u8]) -> Option<TypeReference> {
    match node.kind() {
        "type_identifier" | "scoped_type_identifier" => TypeReference::parse(node_text(node, source)),
        "generic_type" => {
            let mut cursor = node.walk();
            let base = node.named_children(&mut cursor).next()?;
            type_reference(&base, source)
        }
        "annotated_type" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).last()?;
            type_reference(&inner, source)
        }
        _ => None,
    }
}

fn extract_methods(body: &Node, source: &[u8]) -> Vec<MethodDeclaration> {
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if child.kind() == "method_declaration"
            && let Some(method) = method_declaration(&child, source)
        {
            methods.push(method);
        }
    }
    methods
}

fn method_declaration(node: &Node, source: &[u8]) -> Option<MethodDeclaration> {
    let name = node_text(&node.child_by_field_name("name")?, source).to_string();
    let mut return_type = print_type(node_text(&node.child_by_field_name("type")?, source));
    if let Some(dims) = node.child_by_field_name("dimensions") {
        return_type.push_str(&print_type(node_text(&dims, source)));
    }

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(&params, source))
        .unwrap_or_default();

    Some(MethodDeclaration {
        name,
        return_type,
        parameters,
        annotations: extract_annotations(node, source),
    })
}

fn extract_parameters(node: &Node, source: &[u8]) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let parameter = match child.kind() {
            "formal_parameter" => formal_parameter(&child, source),
            "spread_parameter" => spread_parameter(&child, source),
            // receiver parameters (`Foo this`) are not real arguments
            _ => None,
        };
        if let Some(p) = parameter {
            parameters.push(p);
        }
    }
    parameters
}

fn formal_parameter(node: &Node, source: &[u8]) -> Option<Parameter> {
    let mut type_expr = print_type(node_text(&node.child_by_field_name("type")?, source));
    if let Some(dims) = node.child_by_field_name("dimensions") {
        type_expr.push_str(&print_type(node_text(&dims, source)));
    }
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    Some(Parameter { name, type_expr })
}

fn spread_parameter(node: &Node, source: &[u8]) -> Option<Parameter> {
    let mut ty = None;
    let mut name = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "modifiers" => {}
            "variable_declarator" => {
                name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_default();
            }
            _ if ty.is_none() => ty = Some(print_type(node_text(&child, source))),
            _ => {}
        }
    }
    // varargs record the element type, as `String` for `String... tags`
    Some(Parameter {
        name,
        type_expr: ty?,
    })
}

/// Prints a type expression with normalized spacing:
/// `Map<String ,  List<Long> >` becomes `Map<String, List<Long>>`.
pub fn print_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        match ch {
            '<' | '>' | '[' | ']' | '.' => out.push(ch),
            ',' => out.push_str(", "),
            _ => {
                if pending_space && !out.is_empty() && !out.ends_with([' ', '<', '[', '.']) {
                    out.push(' ');
                }
                out.push(ch);
            }
        }
        pending_space = false;
    }
    out.trim_end().to_string()
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn parse(source: &str) -> SourceUnit {
        parse_source(source, Path::new("Test.java"), false).unwrap()
    }

    #[test]
    fn parses_controller_with_annotations_and_methods() {
        let unit = parse(indoc! {r#"
            package com.acme.web;

            import org.springframework.web.bind.annotation.*;

            @RestController
            @RequestMapping("/users")
            public class UserController implements UserApi, com.acme.api.AuditApi<User> {
                @GetMapping("/{id}")
                public User getUser(@PathVariable Long id) {
                    return null;
                }

                @org.springframework.web.bind.annotation.PostMapping
                public void save(@RequestBody Map<String ,  List<Long> > body, String... tags) {
                }

                public UserController() {}
            }
        "#});

        assert_eq!(unit.package.as_deref(), Some("com.acme.web"));
        assert_eq!(unit.package_prefix(), "com.acme.web.");
        assert_eq!(unit.types.len(), 1);

        let ty = &unit.types[0];
        assert_eq!(ty.name, "UserController");
        assert_eq!(ty.kind, TypeKind::Class);
        let names: Vec<&str> = ty.annotations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["RestController", "RequestMapping"]);
        assert_eq!(
            ty.implemented,
            vec![
                TypeReference::simple("UserApi"),
                TypeReference {
                    qualifier: Some("com.acme.api".to_string()),
                    name: "AuditApi".to_string(),
                },
            ]
        );

        assert_eq!(ty.methods.len(), 2);
        let get = &ty.methods[0];
        assert_eq!(get.name, "getUser");
        assert_eq!(get.return_type, "User");
        assert_eq!(get.parameters[0].type_expr, "Long");
        assert_eq!(get.parameters[0].name, "id");
        assert_eq!(get.annotations[0].name, "GetMapping");

        let save = &ty.methods[1];
        assert!(save.returns_void());
        assert_eq!(
            save.annotations[0].name,
            "org.springframework.web.bind.annotation.PostMapping"
        );
        let types: Vec<&str> = save.parameters.iter().map(|p| p.type_expr.as_str()).collect();
        assert_eq!(types, vec!["Map<String, List<Long>>", "String"]);
    }

    #[test]
    fn parses_interfaces_and_nested_types() {
        let unit = parse(indoc! {r#"
            public interface UserApi {
                @GetMapping
                ResponseD find(Long id);

                interface Nested {
                    void ping();
                }
            }

            class Holder {
                static class Inner {}
                enum Mode { A; class InEnum {} }
            }
        "#});

        assert!(unit.package.is_none());
        let names: Vec<(&str, TypeKind)> = unit.types.iter().map(|t| (t.name.as_str(), t.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("UserApi", TypeKind::Interface),
                ("Nested", TypeKind::Interface),
                ("Holder", TypeKind::Class),
                ("Inner", TypeKind::Class),
                ("InEnum", TypeKind::Class),
            ]
        );
        let api = &unit.types[0];
        assert_eq!(api.methods.len(), 1);
        assert_eq!(api.methods[0].return_type, "ResponseD");
        assert!(api.implemented.is_empty());
    }

    #[test]
    fn array_dimensions_are_part_of_the_type() {
        let unit = parse(indoc! {r#"
            class A {
                int[] [] grid(String names[], byte[] raw) { return null; }
            }
        "#});
        let m = &unit.types[0].methods[0];
        assert_eq!(m.return_type, "int[][]");
        let types: Vec<&str> = m.parameters.iter().map(|p| p.type_expr.as_str()).collect();
        assert_eq!(types, vec!["String[]", "byte[]"]);
    }

    #[test]
    fn syntax_errors_are_rejected_unless_lenient() {
        let broken = "class A {\n  void m( {\n}\n";
        let err = parse_source(broken, Path::new("A.java"), false).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));

        let unit = parse_source(broken, Path::new("A.java"), true).unwrap();
        assert_eq!(unit.path, PathBuf::from("A.java"));
    }

    #[test]
    fn non_utf8_bytes_in_comments_are_tolerated() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("C.java");
        let mut content = b"// caf".to_vec();
        content.push(0xE9);
        content.extend_from_slice(
            b"\n@RestController class C { @GetMapping User get() { return null; } }\n",
        );
        std::fs::write(&path, content)?;

        let unit = parse_file(&path, false)?;
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name, "C");
        assert_eq!(unit.types[0].methods[0].return_type, "User");
        Ok(())
    }

    #[test]
    fn varargs_keep_the_element_type() {
        let unit = parse("@RestController class C { @PostMapping void tag(String... tags) {} }");
        let p = &unit.types[0].methods[0].parameters[0];
        assert_eq!(p.type_expr, "String");
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = parse_file(Path::new("/definitely/not/here/A.java"), false).unwrap_err();
        assert!(matches!(err, ParseError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here/A.java"));
    }

    #[test]
    fn print_type_normalizes_spacing() {
        assert_eq!(print_type("List < ? extends  Dto >"), "List<? extends Dto>");
        assert_eq!(print_type("java.util . List<String>"), "java.util.List<String>");
        assert_eq!(print_type("Map<K,V>"), "Map<K, V>");
        assert_eq!(print_type("void"), "void");
    }
}
