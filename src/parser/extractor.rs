use super::common::{CodeEndpoint, CodeFunction};
use super::idioms::{Idiom, IdiomMatch, Recognizer};
use super::references::find_references;
use crate::discovery::Language;
use regex::Regex;
use std::path::Path;

/// Result of extracting a single line
///
/// A line can produce both an endpoint and a function; both are kept.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineExtraction {
    pub endpoint: Option<CodeEndpoint>,
    pub function: Option<CodeFunction>,
}

impl LineExtraction {
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.function.is_none()
    }
}

/// Everything extracted from one file
#[derive(Debug, Default, Clone)]
pub struct FileExtraction {
    pub endpoints: Vec<CodeEndpoint>,
    pub functions: Vec<CodeFunction>,
}

/// Line-oriented extractor for endpoints and functions
///
/// Holds compiled recognizers and is cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    endpoint_recognizers: Vec<Recognizer>,
    function_recognizers: Vec<Recognizer>,
    export_marker: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            endpoint_recognizers: Idiom::ENDPOINTS.iter().map(|i| Recognizer::new(*i)).collect(),
            function_recognizers: Idiom::FUNCTIONS.iter().map(|i| Recognizer::new(*i)).collect(),
            export_marker: Regex::new(r"\bexport\b").expect("export marker regex is valid"),
        }
    }

    /// Extract from one line; `content` is the whole file, used for references
    pub fn extract_line(
        &self,
        line: &str,
        line_number: usize,
        file: &Path,
        language: Language,
        content: &str,
    ) -> LineExtraction {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineExtraction::default();
        }

        LineExtraction {
            endpoint: self.extract_endpoint(trimmed, line_number, file, language),
            function: self.extract_function(trimmed, line_number, file, language, content),
        }
    }

    /// Extract every line of a file
    pub fn extract_file(&self, file: &Path, language: Language, content: &str) -> FileExtraction {
        let mut extraction = FileExtraction::default();

        for (index, line) in content.lines().enumerate() {
            let found = self.extract_line(line, index + 1, file, language, content);
            extraction.endpoints.extend(found.endpoint);
            extraction.functions.extend(found.function);
        }

        extraction
    }

    fn extract_endpoint(
        &self,
        trimmed: &str,
        line_number: usize,
        file: &Path,
        language: Language,
    ) -> Option<CodeEndpoint> {
        self.endpoint_recognizers.iter().find_map(|recognizer| {
            match recognizer.recognize(trimmed)? {
                IdiomMatch::Endpoint {
                    method,
                    route,
                    handler_name,
                    framework,
                } => Some(CodeEndpoint {
                    language,
                    file: file.to_path_buf(),
                    start_line: line_number,
                    end_line: line_number,
                    snippet: trimmed.to_string(),
                    method,
                    route,
                    handler_name,
                    framework_hint: framework,
                    confidence: recognizer.idiom().confidence(),
                }),
                IdiomMatch::Function { .. } => None,
            }
        })
    }

    fn extract_function(
        &self,
        trimmed: &str,
        line_number: usize,
        file: &Path,
        language: Language,
        content: &str,
    ) -> Option<CodeFunction> {
        if !language.is_script() {
            return None;
        }

        self.function_recognizers.iter().find_map(|recognizer| {
            match recognizer.recognize(trimmed)? {
                IdiomMatch::Function { name } => Some(CodeFunction {
                    language,
                    file: file.to_path_buf(),
                    start_line: line_number,
                    end_line: line_number,
                    snippet: trimmed.to_string(),
                    is_exported: self.export_marker.is_match(trimmed),
                    references: find_references(&name, content),
                    function_name: name,
                    confidence: recognizer.idiom().confidence(),
                }),
                IdiomMatch::Endpoint { .. } => None,
            }
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
