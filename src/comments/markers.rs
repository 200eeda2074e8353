//! Flow marker vocabulary

use once_cell::sync::Lazy;
use regex::Regex;

/// Markers identifying a comment as Flow-specific.
///
/// Longer variants come first so that `@flow strict-local` is listed before
/// its `@flow` prefix; matching is by substring so order does not change the
/// outcome.
pub const FLOW_MARKERS: [&str; 7] = [
    "@flow strict-local",
    "@flow strict",
    "@flow",
    "$FlowFixMe",
    "$FlowIssue",
    "$FlowExpectedError",
    "$FlowIgnore",
];

/// Flow directive that disables checking for a file
pub const NOFLOW_DIRECTIVE: &str = "@noflow";

/// TypeScript equivalent of [`NOFLOW_DIRECTIVE`]
pub const TS_NOCHECK_DIRECTIVE: &str = "@ts-nocheck";

/// Whitespace with at most one `*`, i.e. an empty JSDoc continuation line
static BLANK_DOC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*?\s*$").unwrap());

/// Check whether `text` contains any Flow marker
pub fn contains_marker(text: &str) -> bool {
    FLOW_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Check whether `line` is blank apart from an optional single asterisk
pub fn is_blank_doc_line(line: &str) -> bool {
    BLANK_DOC_LINE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_marker() {
        assert!(contains_marker(" @flow"));
        assert!(contains_marker(" @flow strict-local"));
        assert!(contains_marker("$FlowFixMe[incompatible-type] bad cast"));
        assert!(contains_marker("prefix $FlowExpectedError suffix"));
        assert!(!contains_marker(" @noflow"));
        assert!(!contains_marker(" just a comment"));
        assert!(!contains_marker(" FlowFixMe without sigil"));
    }

    #[test]
    fn test_is_blank_doc_line() {
        assert!(is_blank_doc_line(""));
        assert!(is_blank_doc_line("   "));
        assert!(is_blank_doc_line(" * "));
        assert!(is_blank_doc_line("\t*"));
        assert!(!is_blank_doc_line(" ** "));
        assert!(!is_blank_doc_line(" * text"));
        assert!(!is_blank_doc_line("/"));
    }
}
