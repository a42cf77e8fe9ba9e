//! Structural extraction of field declarations from type definitions.
//!
//! This is pattern matching over source text, not parsing. It recognises
//! Java-style classes and Rust structs well enough to list the declared
//! fields of plain data types.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;

static JAVA_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("Invalid class regex"));

static JAVA_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"package\s+([\w.]+);").expect("Invalid package regex"));

/// Access modifier, optional `final`/`static`, type, name, semicolon.
static JAVA_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:private|protected|public)\s+(?:final\s+|static\s+)*([\w<>.,?\s\[\]]+)\s+([a-zA-Z0-9_]+);",
    )
    .expect("Invalid field regex")
});

static RUST_STRUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+(\w+)[^{;(]*\{")
        .expect("Invalid struct regex")
});

static RUST_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:r#)?([A-Za-z_]\w*)\s*:\s*(.+?)\s*,?\s*(?://.*)?$")
        .expect("Invalid struct field regex")
});

/// Source language of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    Java,
    Rust,
}

impl SourceSyntax {
    /// Syntax implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "java" => Some(Self::Java),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Guesses the syntax from the content.
    pub fn sniff(content: &str) -> Option<Self> {
        if JAVA_CLASS.is_match(content) {
            Some(Self::Java)
        } else if RUST_STRUCT.is_match(content) {
            Some(Self::Rust)
        } else {
            None
        }
    }
}

impl fmt::Display for SourceSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Java => f.write_str("java"),
            Self::Rust => f.write_str("rust"),
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub type_name: String,
    pub name: String,
}

impl FieldDecl {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}

/// Name and fields of one extracted type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOutline {
    /// Qualified name as written in mapping configurations.
    pub name: String,
    pub syntax: SourceSyntax,
    pub fields: Vec<FieldDecl>,
}

/// Reads and extracts a type definition file.
pub fn extract_file(path: &Path) -> Result<TypeOutline, ExtractError> {
    let content = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let syntax = SourceSyntax::from_path(path).or_else(|| SourceSyntax::sniff(&content));
    let outline = syntax
        .and_then(|syntax| extract_str(&content, syntax))
        .ok_or_else(|| ExtractError::NoTypeDefinition {
            path: path.to_path_buf(),
        })?;
    debug!(
        path = %path.display(),
        syntax = %outline.syntax,
        type_name = %outline.name,
        fields = outline.fields.len(),
        "type definition extracted"
    );
    Ok(outline)
}

/// Extracts a type definition from source text. `None` if no type is found.
pub fn extract_str(content: &str, syntax: SourceSyntax) -> Option<TypeOutline> {
    match syntax {
        SourceSyntax::Java => extract_java(content),
        SourceSyntax::Rust => extract_rust(content),
    }
}

fn extract_java(content: &str) -> Option<TypeOutline> {
    let class = JAVA_CLASS.captures(content)?.get(1)?.as_str();
    let name = match JAVA_PACKAGE.captures(content).and_then(|caps| caps.get(1)) {
        Some(package) => format!("{}.{class}", package.as_str()),
        None => class.to_string(),
    };
    let fields = JAVA_FIELD
        .captures_iter(content)
        .map(|caps| FieldDecl::new(&caps[1], &caps[2]))
        .collect();
    Some(TypeOutline {
        name,
        syntax: SourceSyntax::Java,
        fields,
    })
}

/// First struct with named fields. Only lines directly inside the struct
/// body are considered.
fn extract_rust(content: &str) -> Option<TypeOutline> {
    let caps = RUST_STRUCT.captures(content)?;
    let name = caps.get(1)?.as_str().to_string();
    let body_start = caps.get(0)?.end();
    let body = struct_body(&content[body_start..]);

    let fields = RUST_FIELD
        .captures_iter(body)
        .map(|caps| FieldDecl::new(&caps[2], &caps[1]))
        .collect();
    Some(TypeOutline {
        name,
        syntax: SourceSyntax::Rust,
        fields,
    })
}

/// Text up to the brace closing an already opened block.
fn struct_body(rest: &str) -> &str {
    let mut depth = 1_usize;
    for (index, ch) in rest.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..index];
                }
            }
            _ => {}
        }
    }
    rest
}
