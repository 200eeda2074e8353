//! Printing a [`SyntaxTree`] back to source text
//!
//! Only attached comments are rewritten. Every other byte of the original
//! source is copied through, so formatting and unattached comments survive.

use std::collections::HashMap;

use super::{Comment, SyntaxTree};

/// A replacement of `start..end` in the original source
#[derive(Debug, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

impl SyntaxTree {
    /// Render the source with the current comment lists applied
    pub fn print(&self) -> String {
        let source = self.source_text();
        let surviving: HashMap<(u32, u32), &Comment> = self
            .comments()
            .map(|comment| ((comment.span.start, comment.span.end), comment))
            .collect();

        let mut edits: Vec<Edit> = Vec::new();
        let mut removed: Vec<(usize, usize)> = Vec::new();
        for span in self.attached_spans() {
            let (start, end) = (span.start as usize, span.end as usize);
            match surviving.get(&(span.start, span.end)) {
                Some(comment) => {
                    let rendered = comment.render();
                    if source.get(start..end) != Some(rendered.as_str()) {
                        edits.push(Edit {
                            start,
                            end,
                            text: rendered,
                        });
                    }
                }
                None => match removed.last_mut() {
                    // Removed comments separated only by spaces go as one run
                    Some(last) if is_horizontal_gap(source, last.1, start) => last.1 = end,
                    _ => removed.push((start, end)),
                },
            }
        }

        edits.extend(removed.into_iter().map(|(start, end)| {
            let (start, end) = removal_range(source, start, end);
            Edit {
                start,
                end,
                text: String::new(),
            }
        }));

        apply_edits(source, edits)
    }
}

fn is_horizontal_gap(source: &str, start: usize, end: usize) -> bool {
    start <= end
        && source.as_bytes()[start..end]
            .iter()
            .all(|b| *b == b' ' || *b == b'\t')
}

/// Range to delete for a removed comment at `start..end`
///
/// A comment alone on its line takes the whole line with it. Otherwise the
/// horizontal whitespace separating it from the surrounding code goes too.
fn removal_range(source: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = source.as_bytes();
    let is_blank = |b: &u8| *b == b' ' || *b == b'\t';

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i);
    let blank_before = bytes[line_start..start].iter().all(is_blank);
    let blank_after = bytes[end..line_end]
        .iter()
        .all(|b| is_blank(b) || *b == b'\r');

    match (blank_before, blank_after) {
        (true, true) => (line_start, (line_end + 1).min(source.len())),
        (true, false) => {
            let trailing = bytes[end..line_end].iter().take_while(|b| is_blank(b)).count();
            (start, end + trailing)
        }
        (false, _) => {
            let leading = bytes[line_start..start]
                .iter()
                .rev()
                .take_while(|b| is_blank(b))
                .count();
            (start - leading, end)
        }
    }
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.start, edit.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        // Neighbouring removals may claim the same whitespace
        let start = edit.start.max(cursor);
        if start > edit.end {
            continue;
        }
        output.push_str(&source[cursor..start]);
        output.push_str(&edit.text);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);
    output
}
