//! Text extraction collaborator: file in, plain text out.
//!
//! PDFs are extracted by running Poppler's `pdftotext` as a bounded,
//! synchronous subprocess. Two strategies exist: `Fast` (default output
//! mode, fine for single-column documents) and `Layout` (`-layout`, which
//! preserves column structure for old two-column reporter scans). Plain
//! `.txt` files are read directly and ignore the strategy.

use std::path::Path;
use std::process::Command;

use crate::error::ExtractError;

/// PDF extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Default pdftotext output; fast, good for simple layouts
    #[default]
    Fast,
    /// `pdftotext -layout`; preserves multi-column structure
    Layout,
}

impl Strategy {
    /// Stable tag used in CLI flags and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fast => "fast",
            Strategy::Layout => "layout",
        }
    }
}

/// Result of a successful text extraction.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Extracted plain text
    pub text: String,
    /// Number of pages covered by `text`
    pub page_count: usize,
}

/// Extracts plain text from document files.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    strategy: Strategy,
}

impl TextExtractor {
    /// Create an extractor with the given PDF strategy.
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Extensions this extractor understands.
    pub fn supports(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some(ext) if ext.eq_ignore_ascii_case("pdf") || ext.eq_ignore_ascii_case("txt")
        )
    }

    /// Extract text from a file, reading at most `max_pages` pages when set.
    ///
    /// Any failure (missing file, missing tool, tool error, empty output) is
    /// reported as an `ExtractError`; callers treat it as a terminal failure
    /// for that document, not a crash.
    pub fn extract(
        &self,
        path: &Path,
        max_pages: Option<usize>,
    ) -> Result<ExtractedText, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => self.extract_plain(path),
            "pdf" => self.extract_pdf(path, max_pages),
            other => Err(ExtractError::UnsupportedFormat(other.to_string())),
        }
    }

    fn extract_plain(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyText(path.to_path_buf()));
        }
        tracing::debug!(file = %path.display(), chars = text.len(), "read plain text");
        Ok(ExtractedText {
            text,
            page_count: 1,
        })
    }

    fn extract_pdf(
        &self,
        path: &Path,
        max_pages: Option<usize>,
    ) -> Result<ExtractedText, ExtractError> {
        let tool = which::which("pdftotext")
            .map_err(|_| ExtractError::MissingTool("pdftotext".to_string()))?;

        let mut cmd = Command::new(tool);
        if let Strategy::Layout = self.strategy {
            cmd.arg("-layout");
        }
        if let Some(last) = max_pages {
            cmd.args(["-l", &last.to_string()]);
        }
        // "-" writes to stdout
        cmd.arg(path).arg("-");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(ExtractError::ExtractionFailed {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyText(path.to_path_buf()));
        }

        // pdftotext separates pages with form feeds.
        let page_count = text.split('\u{c}').filter(|p| !p.trim().is_empty()).count();

        tracing::debug!(
            file = %path.display(),
            strategy = self.strategy.as_str(),
            pages = page_count,
            chars = text.len(),
            "extracted pdf text"
        );

        Ok(ExtractedText {
            text,
            page_count: page_count.max(1),
        })
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Strategy::Fast)
    }
}
