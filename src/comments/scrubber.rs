//! Flow comment scrubber
//!
//! Rewrites the comment list of every statement in the program body and in
//! every block body:
//!
//! 1. comments mentioning a Flow marker lose every line containing a marker
//!    and every blank JSDoc continuation line; what survives is re-headed
//!    with a `*` line, or the comment is dropped when nothing survives
//! 2. empty comments are dropped
//! 3. `@noflow` becomes `@ts-nocheck`
//!
//! Comments without a marker pass through untouched, and statements without
//! a comment list keep having none.

use oxc_span::SourceType;
use serde::Serialize;

use super::markers::{contains_marker, is_blank_doc_line, NOFLOW_DIRECTIVE, TS_NOCHECK_DIRECTIVE};
use crate::error::Result;
use crate::tree::{BodyVisitor, Comment, Statement, SyntaxTree};

/// Counters describing what one scrubbing pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrubStats {
    pub bodies_visited: usize,
    pub statements_visited: usize,
    pub comments_removed: usize,
    pub comments_rewritten: usize,
    pub directives_translated: usize,
}

impl ScrubStats {
    /// Whether the pass changed any comment
    pub fn changed(&self) -> bool {
        self.comments_removed + self.comments_rewritten + self.directives_translated > 0
    }

    /// Add the counters of another pass
    pub fn merge(&mut self, other: &ScrubStats) {
        self.bodies_visited += other.bodies_visited;
        self.statements_visited += other.statements_visited;
        self.comments_removed += other.comments_removed;
        self.comments_rewritten += other.comments_rewritten;
        self.directives_translated += other.directives_translated;
    }
}

/// Removes Flow markers from the comments of a [`SyntaxTree`]
#[derive(Debug, Default)]
pub struct CommentScrubber {
    stats: ScrubStats,
}

impl CommentScrubber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scrub every program and block body of `tree` in place
    ///
    /// The tree is validated before anything is touched; a malformed tree is
    /// returned unchanged together with the error.
    pub fn process(tree: &mut SyntaxTree) -> Result<ScrubStats> {
        let mut scrubber = Self::new();
        tree.accept(&mut scrubber)?;
        log::debug!("Scrub pass finished: {:?}", scrubber.stats);
        Ok(scrubber.stats)
    }

    fn scrub_body(&mut self, statements: &mut [Statement]) {
        self.stats.bodies_visited += 1;
        if statements.is_empty() {
            return;
        }

        for stmt in statements.iter_mut() {
            self.stats.statements_visited += 1;
            if let Some(comments) = stmt.comments.take() {
                stmt.comments = Some(scrub_list(comments, &mut self.stats));
            }
        }
    }
}

impl BodyVisitor for CommentScrubber {
    fn visit_program(&mut self, statements: &mut [Statement]) {
        self.scrub_body(statements);
    }

    fn visit_block(&mut self, statements: &mut [Statement]) {
        self.scrub_body(statements);
    }
}

/// Parse `source_text`, scrub it and print the result
pub fn scrub_source(source_text: &str, source_type: SourceType) -> Result<(String, ScrubStats)> {
    let mut tree = SyntaxTree::parse(source_text, source_type)?;
    let stats = CommentScrubber::process(&mut tree)?;
    Ok((tree.print(), stats))
}

/// Scrub one statement's comment list; an absent list stays absent
pub fn scrub_comments(comments: Option<Vec<Comment>>) -> Option<Vec<Comment>> {
    comments.map(|list| scrub_list(list, &mut ScrubStats::default()))
}

fn scrub_list(comments: Vec<Comment>, stats: &mut ScrubStats) -> Vec<Comment> {
    comments
        .into_iter()
        .filter_map(|comment| {
            let marked = contains_marker(&comment.value);
            let scrubbed = scrub_comment(comment);
            match (&scrubbed, marked) {
                (None, _) => stats.comments_removed += 1,
                (Some(_), true) => stats.comments_rewritten += 1,
                (Some(_), false) => {}
            }
            scrubbed
        })
        .map(|comment| {
            if !comment.value.contains(NOFLOW_DIRECTIVE) {
                return comment;
            }
            stats.directives_translated += 1;
            let value = comment.value.replace(NOFLOW_DIRECTIVE, TS_NOCHECK_DIRECTIVE);
            Comment { value, ..comment }
        })
        .collect()
}

/// Strip Flow marker lines from one comment
///
/// Returns `None` when the comment ends up empty and must be removed.
pub fn scrub_comment(comment: Comment) -> Option<Comment> {
    if !contains_marker(&comment.value) {
        return (!comment.value.is_empty()).then_some(comment);
    }

    let kept: Vec<&str> = comment
        .value
        .split('\n')
        .filter(|line| !contains_marker(line))
        .filter(|line| !is_blank_doc_line(line))
        .collect();
    // Kept lines still end in `\r` for CRLF sources, so joining on `\n` is enough
    let text = kept.join("\n");
    let text = text.trim_end();

    if text.trim().is_empty() {
        log::trace!("Removing Flow comment at {:?}", comment.span);
        return None;
    }

    let newline = if comment.value.contains("\r\n") { "\r\n" } else { "\n" };
    let value = format!("*{}{}", newline, text);
    Some(Comment { value, ..comment })
}
