//! Start/end marker lines.
//!
//! A marker is described by a template with a single `{path}` placeholder,
//! e.g. `/* ===== START: {path} ===== */`. The literal text around the
//! placeholder is matched exactly and the whole line must match; the path in
//! between is captured and trimmed.

use crate::{ArchiveError, Result};
use regex::Regex;

/// Placeholder that marks where the file path goes in a template.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Default start marker template.
pub const DEFAULT_START_TEMPLATE: &str = "/* ===== START: {path} ===== */";

/// Default end marker template.
pub const DEFAULT_END_TEMPLATE: &str = "/* ===== END: {path} ===== */";

/// Which side of an entry a marker delimits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

/// A precompiled whole-line marker matcher.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    template: String,
    prefix: String,
    suffix: String,
    regex: Regex,
}

impl MarkerPattern {
    /// Compile a marker from a template containing exactly one `{path}`.
    pub fn from_template(template: &str) -> Result<Self> {
        let mut parts = template.split(PATH_PLACEHOLDER);
        let (prefix, suffix) = match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) => (prefix, suffix),
            (_, None, _) => {
                return Err(ArchiveError::Template {
                    template: template.to_string(),
                    reason: format!("missing {PATH_PLACEHOLDER} placeholder"),
                })
            }
            _ => {
                return Err(ArchiveError::Template {
                    template: template.to_string(),
                    reason: format!("{PATH_PLACEHOLDER} must appear exactly once"),
                })
            }
        };

        if prefix.trim().is_empty() && suffix.trim().is_empty() {
            return Err(ArchiveError::Template {
                template: template.to_string(),
                reason: "template has no literal text around the path".to_string(),
            });
        }

        let regex = Regex::new(&format!(
            "^{}(.*?){}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ))?;

        Ok(Self {
            template: template.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            regex,
        })
    }

    /// The template this pattern was built from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Match a single line (without its terminator) and return the trimmed path.
    pub fn matches<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }

    /// Render the marker line for `path`.
    pub fn render(&self, path: &str) -> String {
        format!("{}{}{}", self.prefix, path, self.suffix)
    }
}

/// The start pattern plus an optional end pattern.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    pub start: MarkerPattern,
    /// `None` means entries run until the next start marker or end of stream.
    pub end: Option<MarkerPattern>,
}

impl MarkerSet {
    /// Build a set from templates.
    pub fn from_templates(start: &str, end: Option<&str>) -> Result<Self> {
        let start = MarkerPattern::from_template(start)?;
        let end = end.map(MarkerPattern::from_template).transpose()?;

        if let Some(end) = &end {
            if end.template == start.template {
                return Err(ArchiveError::Template {
                    template: end.template.clone(),
                    reason: "start and end templates are identical".to_string(),
                });
            }
        }

        Ok(Self { start, end })
    }

    /// Drop end-marker recognition.
    pub fn without_end(mut self) -> Self {
        self.end = None;
        self
    }

    /// Classify a line as a start or end marker.
    ///
    /// Start markers win if a line somehow matches both.
    pub fn classify<'a>(&self, line: &'a str) -> Option<(MarkerKind, &'a str)> {
        if let Some(path) = self.start.matches(line) {
            return Some((MarkerKind::Start, path));
        }
        self.end
            .as_ref()
            .and_then(|end| end.matches(line))
            .map(|path| (MarkerKind::End, path))
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            start: MarkerPattern::from_template(DEFAULT_START_TEMPLATE)
                .expect("default start template is valid"),
            end: Some(
                MarkerPattern::from_template(DEFAULT_END_TEMPLATE)
                    .expect("default end template is valid"),
            ),
        }
    }
}
