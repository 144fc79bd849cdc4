use crate::discovery::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HTTP verbs recognized in route declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    All,
}

impl HttpMethod {
    /// Parse a verb case-insensitively; anything outside the whitelist is rejected
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            "ALL" => Some(HttpMethod::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::All => "ALL",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Web framework a route idiom belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Flask,
    Spring,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Express => "express",
            Framework::Flask => "flask",
            Framework::Spring => "spring",
        }
    }
}

/// A single textual occurrence of a name within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSite {
    /// 1-based line number
    pub line: usize,
    /// 1-based column (byte offset within the line)
    pub column: usize,
}

/// An HTTP route declaration found in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeEndpoint {
    pub language: Language,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub snippet: String,
    pub method: HttpMethod,
    pub route: String,
    pub handler_name: Option<String>,
    pub framework_hint: Framework,
    pub confidence: f64,
}

/// A named function declaration found in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeFunction {
    pub language: Language,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub snippet: String,
    pub function_name: String,
    pub is_exported: bool,
    /// Occurrences of the name in the enclosing file, declaration excluded
    pub references: Vec<ReferenceSite>,
    pub confidence: f64,
}

/// Either kind of extracted code construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CodeItem {
    Endpoint(CodeEndpoint),
    Function(CodeFunction),
}

impl CodeItem {
    pub fn file(&self) -> &Path {
        match self {
            CodeItem::Endpoint(e) => &e.file,
            CodeItem::Function(f) => &f.file,
        }
    }

    pub fn start_line(&self) -> usize {
        match self {
            CodeItem::Endpoint(e) => e.start_line,
            CodeItem::Function(f) => f.start_line,
        }
    }

    pub fn end_line(&self) -> usize {
        match self {
            CodeItem::Endpoint(e) => e.end_line,
            CodeItem::Function(f) => f.end_line,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            CodeItem::Endpoint(_) => "endpoint",
            CodeItem::Function(_) => "function",
        }
    }

    /// Short label: `GET /users/:id` for endpoints, the name for functions
    pub fn label(&self) -> String {
        match self {
            CodeItem::Endpoint(e) => format!("{} {}", e.method, e.route),
            CodeItem::Function(f) => f.function_name.clone(),
        }
    }
}
