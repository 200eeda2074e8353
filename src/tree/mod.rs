//! Statement-level comment model
//!
//! A [`SyntaxTree`] is a flattened view of a parsed program: the top-level
//! program body plus every nested block body, each holding its direct child
//! statements and the comments attached to them. Comments are owned by exactly
//! one statement; everything except their `value` is opaque metadata.

pub mod builder;
pub mod printer;

use oxc_span::Span;
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Comment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Single line comment //
    Line,
    /// Block comment /* */
    Block,
}

impl From<oxc_ast::CommentKind> for CommentKind {
    fn from(kind: oxc_ast::CommentKind) -> Self {
        match kind {
            oxc_ast::CommentKind::Line => CommentKind::Line,
            _ => CommentKind::Block,
        }
    }
}

impl CommentKind {
    /// Length of the opening and closing delimiters
    pub fn delimiter_len(self) -> (u32, u32) {
        match self {
            CommentKind::Line => (2, 0),
            CommentKind::Block => (2, 2),
        }
    }
}

/// Position of comment relative to the statement owning it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPosition {
    /// Comments before the statement
    Leading,
    /// Comments after the statement on the same line
    Trailing,
}

/// A comment attached to a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Text between the delimiters
    pub value: String,
    pub kind: CommentKind,
    pub position: CommentPosition,
    /// Span of the comment in the original source, delimiters included
    pub span: Span,
    /// Start offset of the statement owning this comment
    pub attached_to: u32,
}

impl Comment {
    pub fn new(
        value: impl Into<String>,
        kind: CommentKind,
        position: CommentPosition,
        span: Span,
        attached_to: u32,
    ) -> Self {
        Self {
            value: value.into(),
            kind,
            position,
            span,
            attached_to,
        }
    }

    /// Source form of the comment, delimiters included
    pub fn render(&self) -> String {
        match self.kind {
            CommentKind::Line => format!("//{}", self.value),
            CommentKind::Block => format!("/*{}*/", self.value),
        }
    }
}

/// A direct child statement of a program or block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub span: Span,
    /// `None` when no comment list exists, which is distinct from an empty list
    pub comments: Option<Vec<Comment>>,
}

impl Statement {
    pub fn new(span: Span, comments: Option<Vec<Comment>>) -> Self {
        Self { span, comments }
    }
}

/// Kind of node owning a statement body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Top-level program
    Program,
    /// Block statement, including function bodies
    Block,
}

/// Ordered statements of one program or block node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub kind: BodyKind,
    pub span: Span,
    pub statements: Vec<Statement>,
}

impl Body {
    pub fn new(kind: BodyKind, span: Span, statements: Vec<Statement>) -> Self {
        Self {
            kind,
            span,
            statements,
        }
    }
}

/// Callbacks invoked for every body of a [`SyntaxTree`]
pub trait BodyVisitor {
    /// Called once with the top-level program body
    fn visit_program(&mut self, statements: &mut [Statement]);

    /// Called once per block body, nested blocks included
    fn visit_block(&mut self, statements: &mut [Statement]);
}

/// Program body and nested block bodies of one source file
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source_text: String,
    bodies: Vec<Body>,
    /// Spans of every comment attached when the tree was built
    attached_spans: Vec<Span>,
}

impl SyntaxTree {
    /// Create a tree from already collected bodies
    pub fn new(source_text: impl Into<String>, bodies: Vec<Body>) -> Self {
        let mut attached_spans: Vec<Span> = bodies
            .iter()
            .flat_map(|body| body.statements.iter())
            .flat_map(|stmt| stmt.comments.iter().flatten())
            .map(|comment| comment.span)
            .collect();
        attached_spans.sort_by_key(|span| (span.start, span.end));

        Self {
            source_text: source_text.into(),
            bodies,
            attached_spans,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Spans of the comments attached when the tree was built
    pub fn attached_spans(&self) -> &[Span] {
        &self.attached_spans
    }

    /// Iterate over every statement of every body
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.bodies.iter().flat_map(|body| body.statements.iter())
    }

    /// Iterate over every comment currently attached to a statement
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.statements()
            .flat_map(|stmt| stmt.comments.iter().flatten())
    }

    /// Check the attachment invariants the scrubber relies on
    pub fn validate(&self) -> Result<()> {
        let source_len = self.source_text.len() as u32;
        let mut seen = HashSet::new();

        for body in &self.bodies {
            for stmt in &body.statements {
                if stmt.span.start > stmt.span.end || stmt.span.end > source_len {
                    return Err(Error::malformed(format!(
                        "statement span {}..{} is outside the source ({} bytes)",
                        stmt.span.start, stmt.span.end, source_len
                    )));
                }

                for comment in stmt.comments.iter().flatten() {
                    self.validate_comment(comment, stmt)?;
                    if !seen.insert((comment.span.start, comment.span.end)) {
                        return Err(Error::malformed(format!(
                            "comment at {}..{} is attached to more than one statement",
                            comment.span.start, comment.span.end
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_comment(&self, comment: &Comment, owner: &Statement) -> Result<()> {
        let span = comment.span;
        let (open, close) = comment.kind.delimiter_len();

        let opener = match comment.kind {
            CommentKind::Line => "//",
            CommentKind::Block => "/*",
        };
        let addresses_comment = span.start <= span.end
            && span.end - span.start >= open + close
            && self
                .source_text
                .get(span.start as usize..span.end as usize)
                .is_some_and(|text| text.starts_with(opener));

        if !addresses_comment {
            return Err(Error::malformed(format!(
                "comment span {}..{} does not address a comment in the source",
                span.start, span.end
            )));
        }

        if comment.attached_to != owner.span.start {
            return Err(Error::malformed(format!(
                "comment at {}..{} is attached to offset {} but owned by the statement at {}",
                span.start, span.end, comment.attached_to, owner.span.start
            )));
        }

        Ok(())
    }

    /// Validate the tree, then dispatch every body to `visitor`
    ///
    /// Nothing is mutated when validation fails.
    pub fn accept<V: BodyVisitor>(&mut self, visitor: &mut V) -> Result<()> {
        self.validate()?;

        for body in &mut self.bodies {
            match body.kind {
                BodyKind::Program => visitor.visit_program(&mut body.statements),
                BodyKind::Block => visitor.visit_block(&mut body.statements),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_comment(source: &str, comment: Comment, stmt_start: u32) -> SyntaxTree {
        let stmt = Statement::new(
            Span::new(stmt_start, source.len() as u32),
            Some(vec![comment]),
        );
        SyntaxTree::new(
            source,
            vec![Body::new(
                BodyKind::Program,
                Span::new(0, source.len() as u32),
                vec![stmt],
            )],
        )
    }

    #[test]
    fn test_comment_render() {
        let line = Comment::new(
            " @flow",
            CommentKind::Line,
            CommentPosition::Leading,
            Span::new(0, 8),
            9,
        );
        assert_eq!(line.render(), "// @flow");
        let block = Comment {
            value: "*\n * Docs\n ".to_string(),
            kind: CommentKind::Block,
            ..line.clone()
        };
        assert_eq!(block.render(), "/**\n * Docs\n */");
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        let source = "// @flow\nfoo();";
        let comment = Comment::new(
            " @flow",
            CommentKind::Line,
            CommentPosition::Leading,
            Span::new(0, 8),
            9,
        );
        let tree = tree_with_comment(source, comment, 9);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.attached_spans(), &[Span::new(0, 8)]);
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_comment() {
        let source = "foo();";
        let comment = Comment::new(
            " @flow",
            CommentKind::Line,
            CommentPosition::Leading,
            Span::new(0, 40),
            0,
        );
        let tree = tree_with_comment(source, comment, 0);
        assert!(matches!(tree.validate(), Err(Error::MalformedInput { .. })));
    }

    #[test]
    fn test_validate_rejects_mismatched_attachment() {
        let source = "// @flow\nfoo();";
        let comment = Comment::new(
            " @flow",
            CommentKind::Line,
            CommentPosition::Leading,
            Span::new(0, 8),
            3,
        );
        let tree = tree_with_comment(source, comment, 9);
        assert!(matches!(tree.validate(), Err(Error::MalformedInput { .. })));
    }

    struct CountingVisitor {
        programs: usize,
        blocks: usize,
    }

    impl BodyVisitor for CountingVisitor {
        fn visit_program(&mut self, _statements: &mut [Statement]) {
            self.programs += 1;
        }

        fn visit_block(&mut self, _statements: &mut [Statement]) {
            self.blocks += 1;
        }
    }

    #[test]
    fn test_accept_dispatches_by_kind() {
        let mut tree = SyntaxTree::new(
            "{}{}",
            vec![
                Body::new(BodyKind::Program, Span::new(0, 4), Vec::new()),
                Body::new(BodyKind::Block, Span::new(0, 2), Vec::new()),
                Body::new(BodyKind::Block, Span::new(2, 4), Vec::new()),
            ],
        );
        let mut visitor = CountingVisitor {
            programs: 0,
            blocks: 0,
        };
        tree.accept(&mut visitor).unwrap();
        assert_eq!(visitor.programs, 1);
        assert_eq!(visitor.blocks, 2);
    }

    #[test]
    fn test_accept_does_not_visit_malformed_tree() {
        let source = "foo();";
        let comment = Comment::new(
            " x",
            CommentKind::Block,
            CommentPosition::Leading,
            Span::new(0, 2),
            0,
        );
        let mut tree = tree_with_comment(source, comment, 0);
        let mut visitor = CountingVisitor {
            programs: 0,
            blocks: 0,
        };
        assert!(tree.accept(&mut visitor).is_err());
        assert_eq!(visitor.programs, 0);
    }
}
