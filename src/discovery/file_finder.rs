use crate::config::Config;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Source language, determined by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Ruby,
    Php,
    Go,
    CSharp,
    Cpp,
    C,
    Rust,
    Kotlin,
    Scala,
    Swift,
}

impl Language {
    /// Determine the language from a path's extension (case-sensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "jsx" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "go" => Some(Language::Go),
            "cs" => Some(Language::CSharp),
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "rs" => Some(Language::Rust),
            "kt" => Some(Language::Kotlin),
            "scala" => Some(Language::Scala),
            "swift" => Some(Language::Swift),
            _ => None,
        }
    }

    /// Languages whose function declarations the extractor understands
    pub fn is_script(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Go => "go",
            Language::CSharp => "csharp",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Rust => "rust",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::Swift => "swift",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a discovered source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file, rooted at the scanned directory
    pub path: PathBuf,

    /// Language of the file
    pub language: Language,
}

impl SourceFile {
    pub fn new(path: PathBuf, language: Language) -> Self {
        Self { path, language }
    }

    /// Read the full file as UTF-8
    pub fn read_contents(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// File finder for discovering source files in a repository
pub struct FileFinder {
    excluded_dirs: Arc<HashSet<String>>,
    respect_gitignore: bool,
}

impl FileFinder {
    pub fn new(config: &Config) -> Self {
        Self {
            excluded_dirs: Arc::new(config.exclude.iter().cloned().collect()),
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Whether a directory with this name is never descended into
    pub fn is_skipped_dir(excluded: &HashSet<String>, name: &str) -> bool {
        name.starts_with('.') || excluded.contains(name)
    }

    /// Find all source files under `root`
    pub fn find_files(&self, root: &Path) -> Vec<SourceFile> {
        debug!("Scanning for files in: {}", root.display());

        let excluded = Arc::clone(&self.excluded_dirs);
        let root_path = root.to_path_buf();

        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(false)
            .parents(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir || entry.path() == root_path {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !Self::is_skipped_dir(&excluded, &name)
            })
            .build();

        let files: Vec<SourceFile> = walker
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Walk error (continuing): {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let language = Language::from_path(path)?;

                trace!("Found {}: {}", language, path.display());
                Some(SourceFile::new(path.to_path_buf(), language))
            })
            .collect();

        debug!("Found {} files", files.len());
        files
    }
}
