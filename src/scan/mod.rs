//! Repository scanning: discovery plus per-file extraction in parallel

use crate::config::Config;
use crate::discovery::{FileFinder, SourceFile};
use crate::parser::{CodeEndpoint, CodeFunction, Extractor, FileExtraction};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything extracted from one repository walk
#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    /// Ordered by (file, line)
    pub endpoints: Vec<CodeEndpoint>,
    /// Ordered by (file, line)
    pub functions: Vec<CodeFunction>,
    pub files_scanned: usize,
    /// Files that could not be read as UTF-8 text
    pub files_skipped: usize,
}

/// Walks a repository and runs the extractor over every source file
pub struct RepositoryScanner {
    finder: FileFinder,
    extractor: Extractor,
    progress: Option<ProgressBar>,
}

impl RepositoryScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            finder: FileFinder::new(config),
            extractor: Extractor::new(),
            progress: None,
        }
    }

    /// Tick `progress` once per processed file
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn scan(&self, root: &Path) -> ScanResult {
        let files = self.finder.find_files(root);
        info!("Found {} source files to scan", files.len());

        if let Some(pb) = &self.progress {
            pb.set_length(files.len() as u64);
        }

        let results: Vec<Option<FileExtraction>> = files
            .par_iter()
            .map(|file| {
                let extraction = self.scan_file(file);
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
                extraction
            })
            .collect();

        let mut result = ScanResult::default();
        for extraction in results {
            match extraction {
                Some(found) => {
                    result.files_scanned += 1;
                    result.endpoints.extend(found.endpoints);
                    result.functions.extend(found.functions);
                }
                None => result.files_skipped += 1,
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        result
            .endpoints
            .sort_by(|a, b| (&a.file, a.start_line).cmp(&(&b.file, b.start_line)));
        result
            .functions
            .sort_by(|a, b| (&a.file, a.start_line).cmp(&(&b.file, b.start_line)));

        info!(
            "Extracted {} endpoints and {} functions from {} files ({} skipped)",
            result.endpoints.len(),
            result.functions.len(),
            result.files_scanned,
            result.files_skipped
        );

        result
    }

    fn scan_file(&self, file: &SourceFile) -> Option<FileExtraction> {
        let contents = match file.read_contents() {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Skipping {}: {}", file.path.display(), e);
                return None;
            }
        };

        let extraction = self
            .extractor
            .extract_file(&file.path, file.language, &contents);
        debug!(
            "{}: {} endpoints, {} functions",
            file.path.display(),
            extraction.endpoints.len(),
            extraction.functions.len()
        );
        Some(extraction)
    }
}
