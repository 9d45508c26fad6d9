//! Where script material comes from: a text file, a PDF or a web page.

pub mod pdf_text;
pub mod web;

use crate::error::{DialogcastError, Result};
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A place to pull source text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Url(reqwest::Url),
    Pdf(PathBuf),
    Text(PathBuf),
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Url(url) => write!(f, "URL {url}"),
            ContentSource::Pdf(path) => write!(f, "PDF {}", path.display()),
            ContentSource::Text(path) => write!(f, "text file {}", path.display()),
        }
    }
}

/// An `http` or `https` URL with a host.
pub fn parse_url(input: &str) -> Option<reqwest::Url> {
    let url = reqwest::Url::parse(input.trim()).ok()?;
    let web_scheme = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (web_scheme && has_host).then_some(url)
}

impl ContentSource {
    /// Classify a command-line argument.
    ///
    /// URLs win; otherwise a `.pdf` extension (any case) picks the PDF
    /// reader and everything else is read as text.
    pub fn detect(input: &str) -> Self {
        if let Some(url) = parse_url(input) {
            return ContentSource::Url(url);
        }
        let path = PathBuf::from(input);
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            ContentSource::Pdf(path)
        } else {
            ContentSource::Text(path)
        }
    }

    fn name(&self) -> String {
        match self {
            ContentSource::Url(url) => url.to_string(),
            ContentSource::Pdf(path) | ContentSource::Text(path) => path.display().to_string(),
        }
    }

    /// Pull the raw text out of the source.
    ///
    /// Fails with `SourceExtraction` when nothing but whitespace comes
    /// back.
    pub async fn extract(&self, http: &reqwest::Client) -> Result<String> {
        info!("Extracting content from {self}");
        let text = match self {
            ContentSource::Url(url) => web::fetch_article(http, url).await?,
            ContentSource::Pdf(path) => {
                require_file(path)?;
                pdf_text::extract_pdf_text(path)?
            }
            ContentSource::Text(path) => {
                require_file(path)?;
                fs::read_to_string(path).map_err(|e| DialogcastError::SourceExtraction {
                    source_name: self.name(),
                    message: e.to_string(),
                })?
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(DialogcastError::SourceExtraction {
                source_name: self.name(),
                message: "no content extracted".to_string(),
            });
        }
        info!("Extracted {} characters", text.chars().count());
        Ok(text.to_string())
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DialogcastError::InputNotFound {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_http_and_https_urls() {
        assert!(matches!(
            ContentSource::detect("https://example.com/post"),
            ContentSource::Url(_)
        ));
        assert!(matches!(
            ContentSource::detect("http://example.com"),
            ContentSource::Url(_)
        ));
    }

    #[test]
    fn test_non_web_schemes_are_paths() {
        assert_eq!(
            ContentSource::detect("ftp://example.com/file.txt"),
            ContentSource::Text(PathBuf::from("ftp://example.com/file.txt"))
        );
        assert!(parse_url("mailto:someone@example.com").is_none());
        assert!(parse_url("file:///etc/hosts").is_none());
    }

    #[test]
    fn test_detect_pdf_by_extension() {
        assert_eq!(
            ContentSource::detect("paper.PDF"),
            ContentSource::Pdf(PathBuf::from("paper.PDF"))
        );
        assert_eq!(
            ContentSource::detect("notes.txt"),
            ContentSource::Text(PathBuf::from("notes.txt"))
        );
        assert_eq!(
            ContentSource::detect("README"),
            ContentSource::Text(PathBuf::from("README"))
        );
    }

    #[test]
    fn test_display_names_kind() {
        assert_eq!(
            ContentSource::Text(PathBuf::from("a.txt")).to_string(),
            "text file a.txt"
        );
        assert_eq!(
            ContentSource::detect("https://example.com/x").to_string(),
            "URL https://example.com/x"
        );
    }

    #[tokio::test]
    async fn test_extract_text_file_trims() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\n\n  Some article text.\n\n").unwrap();

        let source = ContentSource::Text(file.path().to_path_buf());
        let text = source.extract(&reqwest::Client::new()).await.unwrap();
        assert_eq!(text, "Some article text.");
    }

    #[tokio::test]
    async fn test_extract_blank_file_is_no_content() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"   \n\t\n").unwrap();

        let source = ContentSource::Text(file.path().to_path_buf());
        match source.extract(&reqwest::Client::new()).await {
            Err(DialogcastError::SourceExtraction { message, .. }) => {
                assert_eq!(message, "no content extracted");
            }
            other => panic!("Expected SourceExtraction, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_input_not_found() {
        let source = ContentSource::detect("/tmp/dialogcast_missing_source_4242.txt");
        let result = source.extract(&reqwest::Client::new()).await;
        assert!(matches!(result, Err(DialogcastError::InputNotFound { .. })));
    }

    #[tokio::test]
    async fn test_extract_unreachable_url_is_extraction_error() {
        let source = ContentSource::detect("http://127.0.0.1:1/article");
        let result = source.extract(&reqwest::Client::new()).await;
        assert!(matches!(
            result,
            Err(DialogcastError::SourceExtraction { .. })
        ));
    }
}
