//! Article text from a web page.
//!
//! A regex pass over the HTML, not a DOM parser: good enough for the
//! readable body of typical article pages.

use crate::error::{DialogcastError, Result};
use log::debug;
use regex::{Captures, Regex};

/// Blocks whose contents are never article text.
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form",
];

const USER_AGENT: &str = concat!("dialogcast/", env!("CARGO_PKG_VERSION"));

/// Download `url` and extract its readable text.
pub async fn fetch_article(http: &reqwest::Client, url: &reqwest::Url) -> Result<String> {
    let extraction_error = |message: String| DialogcastError::SourceExtraction {
        source_name: url.to_string(),
        message,
    };

    let response = http
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|e| extraction_error(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(extraction_error(format!("server returned status {status}")));
    }

    let html = response
        .text()
        .await
        .map_err(|e| extraction_error(format!("failed to read body: {e}")))?;
    debug!("Fetched {} bytes of HTML from {}", html.len(), url);

    let extractor = HtmlExtractor::new().map_err(|e| extraction_error(e.to_string()))?;
    Ok(extractor.extract(&html))
}

/// Compiled patterns for pulling paragraphs out of HTML.
pub struct HtmlExtractor {
    article: Regex,
    body: Regex,
    comment: Regex,
    dropped: Vec<Regex>,
    block: Regex,
    tag: Regex,
    entity: Regex,
    spaces: Regex,
}

impl HtmlExtractor {
    pub fn new() -> std::result::Result<Self, regex::Error> {
        let dropped = DROPPED_TAGS
            .iter()
            .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            article: Regex::new(r"(?is)<article\b[^>]*>(.*?)</article\s*>")?,
            body: Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>")?,
            comment: Regex::new(r"(?s)<!--.*?-->")?,
            dropped,
            block: Regex::new(
                r"(?is)<(?:p|h[1-6]|li|blockquote|pre)\b[^>]*>(.*?)</(?:p|h[1-6]|li|blockquote|pre)\s*>",
            )?,
            tag: Regex::new(r"(?s)<[^>]*>")?,
            entity: Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);")?,
            spaces: Regex::new(r"\s+")?,
        })
    }

    /// Readable text, one paragraph per line.
    ///
    /// Prefers the first `<article>`, then `<body>`, then the whole
    /// document. Falls back to tag-stripped text when no paragraph
    /// elements are present.
    pub fn extract(&self, html: &str) -> String {
        let region = self
            .article
            .captures(html)
            .or_else(|| self.body.captures(html))
            .and_then(|c| c.get(1))
            .map_or(html, |m| m.as_str());

        let mut cleaned = self.comment.replace_all(region, "").into_owned();
        for pattern in &self.dropped {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }

        let paragraphs: Vec<String> = self
            .block
            .captures_iter(&cleaned)
            .filter_map(|c| c.get(1))
            .map(|m| self.inline_text(m.as_str()))
            .filter(|p| !p.is_empty())
            .collect();

        if !paragraphs.is_empty() {
            return paragraphs.join("\n");
        }

        let stripped = self.tag.replace_all(&cleaned, "\n");
        stripped
            .lines()
            .map(|line| self.inline_text(line))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn inline_text(&self, fragment: &str) -> String {
        let without_tags = self.tag.replace_all(fragment, " ");
        let decoded = self.decode_entities(&without_tags);
        self.spaces.replace_all(&decoded, " ").trim().to_string()
    }

    /// Decode named and numeric character references.
    pub fn decode_entities(&self, text: &str) -> String {
        self.entity
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                decode_entity(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(hex) = name
        .strip_prefix("#x")
        .or_else(|| name.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from);
    }

    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "copy" => "\u{A9}",
        _ => return None,
    };
    Some(decoded.to_string())
}
