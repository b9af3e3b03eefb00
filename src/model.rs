//! Owned view of the Java declarations the analyzer reads.
//!
//! The parser lowers each file into a [`SourceUnit`]; everything downstream
//! only borrows from it.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// An annotation as written at its use site, e.g. `RestController` or
/// `org.springframework.web.bind.annotation.RestController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub annotations: Vec<Annotation>,
}

impl MethodDeclaration {
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }
}

/// A reference to an implemented interface: `a.b.Api<T>` becomes qualifier
/// `a.b` and name `Api`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    pub qualifier: Option<String>,
    pub name: String,
}

impl TypeReference {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// Parses a written type reference, dropping whitespace and generic
    /// arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let mut depth = 0usize;
        let mut erased = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                c if c.is_whitespace() => {}
                c if depth == 0 => erased.push(c),
                _ => {}
            }
        }

        let erased = erased.trim_matches('.');
        if erased.is_empty() {
            return None;
        }

        Some(match erased.rsplit_once('.') {
            Some((qualifier, name)) => Self {
                qualifier: Some(qualifier.to_string()),
                name: name.to_string(),
            },
            None => Self::simple(erased),
        })
    }

    pub fn qualified_key(&self) -> String {
        match self.qualifier.as_deref() {
            Some(q) if !q.is_empty() => format!("{q}.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    pub kind: TypeKind,
    pub annotations: Vec<Annotation>,
    pub methods: Vec<MethodDeclaration>,
    /// `implements` clause of a class. Always empty for interfaces.
    pub implemented: Vec<TypeReference>,
}

impl DeclaredType {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// Declarations found in one source file, nested types included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: Option<String>,
    pub types: Vec<DeclaredType>,
}

impl SourceUnit {
    /// `"com.acme."` for a packaged file, `""` otherwise.
    pub fn package_prefix(&self) -> String {
        package_prefix(self.package.as_deref())
    }
}

pub fn package_prefix(package: Option<&str>) -> String {
    match package {
        Some(pkg) if !pkg.is_empty() => format!("{pkg}."),
        _ => String::new(),
    }
}
