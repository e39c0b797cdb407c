//! Require-directive header parsing.
//!
//! A directive header is the leading run of blank and comment lines of a
//! script or stylesheet. Lines of the form below inside it name the files to
//! include ahead of the file's own body:
//!
//! ```text
//! //= require lib/jquery          (js, scss, sass)
//! #= require lib/util             (coffee)
//! /*
//!  *= require reset
//!  */                             (css)
//! /*= require "grid.css" */       (any stylesheet)
//! ```
//!
//! The header ends at the first line that is neither blank nor a comment.

use std::sync::OnceLock;

use regex::Regex;

use super::AssetKind;

/// A parsed directive header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveHeader {
    /// Required paths, in file order.
    pub requires: Vec<String>,
    /// Byte length of the header (the body starts here).
    pub len: usize,
}

impl DirectiveHeader {
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty()
    }
}

fn require_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?://|#|/\*|\*)=\s*require\s+["']?([\w./\-]+)["']?\s*(?:\*/)?\s*$"#)
            .unwrap()
    })
}

/// Parse the directive header at the top of `content`.
pub fn parse_header(content: &str, kind: AssetKind) -> DirectiveHeader {
    let line_comment = kind.directive_comment();
    let mut header = DirectiveHeader::default();
    let mut in_block = false;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        let is_header_line = if in_block {
            true
        } else {
            trimmed.is_empty() || trimmed.starts_with(line_comment) || trimmed.starts_with("/*")
        };
        if !is_header_line {
            break;
        }

        if let Some(caps) = require_pattern().captures(trimmed) {
            header.requires.push(caps[1].to_string());
        }

        if trimmed.starts_with("/*") {
            in_block = true;
        }
        if in_block && trimmed.ends_with("*/") {
            in_block = false;
        }

        offset += line.len();
    }

    if !header.requires.is_empty() {
        header.len = offset;
    }
    header
}

/// Whether `content` starts with at least one require directive.
pub fn has_directives(content: &str, kind: AssetKind) -> bool {
    !parse_header(content, kind).is_empty()
}

/// `content` without its directive header.
///
/// Files without directives are returned whole, comments included.
pub fn strip_header(content: &str, kind: AssetKind) -> &str {
    &content[parse_header(content, kind).len..]
}
