//! Boundary extraction — locating component headers and their content
//!
//! A component is written `Tag[Suffix][Annotation](Content)` or
//! `Tag[Suffix][Annotation]{Content}`. The header (tag, suffix and
//! annotation up to the opening delimiter) is matched with one regex for
//! all tags; the content is delimited by balanced counting from there.
//!
//! Property variants share the bare tag and carry the property marker as
//! a suffix segment (`Bdir,p`, `Bdir1,p`, `A,p1`), so a request for `Bdir`
//! never captures `Bdir,p` and vice versa.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::component::ComponentType;
use crate::config::{ANNOTATION_CLOSE, ANNOTATION_OPEN, PROPERTY_MARKER, SUFFIX_SEPARATOR};
use crate::error::{ParseError, Result};
use crate::parser::combination::Delimiters;
use crate::parser::scanner::Span;

fn header_pattern() -> String {
    let symbols = ComponentType::base_symbols().join("|");
    let open = regex::escape(&ANNOTATION_OPEN.to_string());
    let close = regex::escape(&ANNOTATION_CLOSE.to_string());
    format!(
        r"\b(?P<symbol>{symbols})(?P<suffix>(?:[0-9A-Z_][0-9A-Za-z_]*)?(?:,[0-9A-Za-z_]+)*)(?P<annotation>{open}[^{open}{close}]*{close})?(?P<open>[({{])"
    )
}

/// Any component header, anywhere
static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&header_pattern()).expect("component header pattern is valid"));

/// Header ending exactly at the end of the haystack
static HEADER_AT_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{}$", header_pattern())).expect("component header pattern is valid")
});

/// Header starting exactly at the start of the haystack
static HEADER_AT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", header_pattern())).expect("component header pattern is valid")
});

/// Matched component header
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub component: ComponentType,
    pub suffix: Option<String>,
    /// Annotation including its brackets, e.g. `[dir]`
    pub annotation: Option<String>,
    /// Byte offset of the first tag character
    pub start: usize,
    /// Byte offset of the opening delimiter
    pub open: usize,
    pub delimiter: char,
}

impl Header {
    fn from_captures(caps: &Captures, base: usize) -> Option<Header> {
        let symbol = caps.name("symbol")?;
        let open = caps.name("open")?;
        let raw_suffix = caps.name("suffix").map(|m| m.as_str()).unwrap_or_default();
        let (property, suffix) = split_suffix(raw_suffix);
        let component = ComponentType::from_symbol(symbol.as_str(), property)?;
        Some(Header {
            component,
            suffix,
            annotation: caps.name("annotation").map(|m| m.as_str().to_string()),
            start: base + symbol.start(),
            open: base + open.start(),
            delimiter: open.as_str().chars().next()?,
        })
    }
}

/// One occurrence of a component, delimiters included in `raw`
#[derive(Debug, Clone, PartialEq)]
pub struct RawComponent {
    pub header: Header,
    /// Byte offset of the matching closing delimiter
    pub close: usize,
    /// Full text from tag to closing delimiter
    pub raw: String,
    /// Content including the enclosing delimiters
    pub body: String,
}

/// Split a raw suffix into (is-property, cleaned suffix).
///
/// The property marker is a non-leading segment `p`, optionally followed
/// by digits that continue the suffix (`,p1`).
pub fn split_suffix(raw: &str) -> (bool, Option<String>) {
    let mut segments = raw.split(SUFFIX_SEPARATOR);
    let mut kept: Vec<&str> = Vec::new();
    let mut property = false;

    if let Some(first) = segments.next() {
        if !first.is_empty() {
            kept.push(first);
        }
    }
    for segment in segments {
        let rest = segment.strip_prefix(PROPERTY_MARKER);
        match rest {
            Some(digits) if !property && digits.chars().all(|c| c.is_ascii_digit()) => {
                property = true;
                if !digits.is_empty() {
                    kept.push(digits);
                }
            }
            _ => kept.push(segment),
        }
    }

    let suffix = kept.join(&SUFFIX_SEPARATOR.to_string());
    (property, (!suffix.is_empty()).then_some(suffix))
}

/// Offset of the delimiter closing the one opened at `open`
pub fn matching_close(text: &str, open: usize, delimiters: Delimiters) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        if ch == delimiters.open() {
            depth += 1;
        } else if ch == delimiters.close() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open + i);
            }
        }
    }
    None
}

/// All component headers in `text`, in textual order
pub fn find_headers(text: &str) -> Vec<Header> {
    HEADER
        .captures_iter(text)
        .filter_map(|caps| Header::from_captures(&caps, 0))
        .collect()
}

/// Header whose opening delimiter sits at `open`, if any
pub fn header_before(text: &str, open: usize) -> Option<Header> {
    let end = open + 1;
    if end > text.len() || !text.is_char_boundary(end) {
        return None;
    }
    let caps = HEADER_AT_END.captures(&text[..end])?;
    Header::from_captures(&caps, 0)
}

/// If `text` is exactly one tagged brace block (`Cac1{...}`), return its header and interior
pub fn tagged_block(text: &str) -> Option<(Header, &str)> {
    let trimmed = text.trim();
    let offset = text.len() - text.trim_start().len();
    let caps = HEADER_AT_START.captures(trimmed)?;
    let header = Header::from_captures(&caps, 0)?;
    if header.delimiter != Delimiters::Braces.open() {
        return None;
    }
    let close = matching_close(trimmed, header.open, Delimiters::Braces)?;
    if close + 1 != trimmed.len() {
        return None;
    }
    let inner = &text[offset + header.open + 1..offset + close];
    Some((header, inner))
}

/// Extract every occurrence of `component` delimited by `delimiters`.
///
/// An empty result means the component is absent; the caller decides
/// whether that matters.
pub fn extract_components(
    text: &str,
    component: ComponentType,
    delimiters: Delimiters,
) -> Result<Vec<RawComponent>> {
    let mut found = Vec::new();
    for header in find_headers(text) {
        if header.component != component || header.delimiter != delimiters.open() {
            continue;
        }
        let close = matching_close(text, header.open, delimiters).ok_or_else(|| {
            ParseError::UnterminatedComponent {
                component: component.to_string(),
                span: Span::at(text, header.start),
            }
        })?;
        tracing::trace!(
            component = %component,
            start = header.start,
            close,
            "Extracted component boundary"
        );
        found.push(RawComponent {
            raw: text[header.start..=close].to_string(),
            body: text[header.open..=close].to_string(),
            close,
            header,
        });
    }
    Ok(found)
}
