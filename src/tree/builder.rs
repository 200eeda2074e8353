//! Building a [`SyntaxTree`] from source text
//!
//! The source is parsed with oxc. Program, block and function bodies are
//! collected with a [`Visit`] pass, then oxc's comment list is distributed
//! onto the body statements: leading comments by their `attached_to` offset,
//! trailing comments by the statement they directly follow on the same line.
//! A comment trailing the `{` of a block leads the block's first statement.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, BlockStatement, Directive, FunctionBody, Program,
    Statement as AstStatement,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use std::collections::HashMap;
use std::path::Path;

use super::{Body, BodyKind, Comment, CommentKind, CommentPosition, Statement, SyntaxTree};
use crate::error::{Error, Result};

/// Pick the source type for a file, falling back to JSX-enabled JavaScript
pub fn source_type_for(path: &Path, force_typescript: bool) -> SourceType {
    if force_typescript {
        return SourceType::tsx();
    }
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::jsx())
}

/// Collects the statement spans of every body in pre-order
#[derive(Default)]
struct BodyCollector {
    bodies: Vec<(BodyKind, Span, Vec<Span>)>,
}

impl BodyCollector {
    fn push_body(
        &mut self,
        kind: BodyKind,
        span: Span,
        directives: &[Directive<'_>],
        statements: &[AstStatement<'_>],
    ) {
        let spans = directives
            .iter()
            .map(|directive| directive.span)
            .chain(statements.iter().map(|stmt| stmt.span()))
            .collect();
        self.bodies.push((kind, span, spans));
    }
}

impl<'a> Visit<'a> for BodyCollector {
    fn visit_program(&mut self, it: &Program<'a>) {
        self.push_body(BodyKind::Program, it.span, &it.directives, &it.body);
        walk::walk_program(self, it);
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        self.push_body(BodyKind::Block, it.span, &[], &it.body);
        walk::walk_block_statement(self, it);
    }

    fn visit_function_body(&mut self, it: &FunctionBody<'a>) {
        self.push_body(BodyKind::Block, it.span, &it.directives, &it.statements);
        walk::walk_function_body(self, it);
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        if !it.expression {
            walk::walk_arrow_function_expression(self, it);
            return;
        }
        // `() => expr` has a synthetic body that is not a block
        self.visit_formal_parameters(&it.params);
        self.visit_statements(&it.body.statements);
    }
}

impl SyntaxTree {
    /// Parse `source_text` and attach its comments to body statements
    pub fn parse(source_text: &str, source_type: SourceType) -> Result<Self> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source_text, source_type).parse();

        if let Some(error) = ret.errors.first() {
            return Err(Error::parse(error.to_string()));
        }
        if ret.panicked {
            return Err(Error::parse("parser aborted without a diagnostic"));
        }

        let mut collector = BodyCollector::default();
        collector.visit_program(&ret.program);

        let mut by_start: HashMap<u32, (usize, usize)> = HashMap::new();
        let mut by_end: HashMap<u32, (usize, usize)> = HashMap::new();
        let mut bodies: Vec<Body> = Vec::with_capacity(collector.bodies.len());

        for (body_index, (kind, span, spans)) in collector.bodies.into_iter().enumerate() {
            let statements = spans
                .into_iter()
                .enumerate()
                .map(|(stmt_index, stmt_span)| {
                    by_start
                        .entry(stmt_span.start)
                        .or_insert((body_index, stmt_index));
                    by_end
                        .entry(stmt_span.end)
                        .or_insert((body_index, stmt_index));
                    Statement::new(stmt_span, None)
                })
                .collect();
            bodies.push(Body::new(kind, span, statements));
        }

        let mut attached = 0usize;
        for comment in ret.program.comments.iter() {
            let position = match comment.position {
                oxc_ast::CommentPosition::Leading => CommentPosition::Leading,
                oxc_ast::CommentPosition::Trailing => CommentPosition::Trailing,
            };
            let owner = match position {
                CommentPosition::Leading => by_start
                    .get(&comment.attached_to)
                    .map(|&owner| (owner, position)),
                CommentPosition::Trailing => {
                    let code_end = preceding_code_end(source_text, comment.span.start);
                    match by_end.get(&code_end) {
                        Some(&owner) => Some((owner, position)),
                        // `{ // comment` leads the first statement of the block
                        None if opens_block(source_text, code_end) => by_start
                            .get(&following_code_start(source_text, comment.span.end))
                            .map(|&owner| (owner, CommentPosition::Leading)),
                        None => None,
                    }
                }
            };
            let Some(((body_index, stmt_index), position)) = owner else {
                continue;
            };

            let kind = CommentKind::from(comment.kind);
            let value = comment_value(source_text, comment.span, kind)?;
            let stmt = &mut bodies[body_index].statements[stmt_index];
            let attached_to = stmt.span.start;
            stmt.comments
                .get_or_insert_with(Vec::new)
                .push(Comment::new(value, kind, position, comment.span, attached_to));
            attached += 1;
        }

        log::debug!(
            "Collected {} bodies, attached {} of {} comments",
            bodies.len(),
            attached,
            ret.program.comments.len()
        );

        Ok(SyntaxTree::new(source_text, bodies))
    }
}

/// Offset just past the code preceding `offset` on the same line
fn preceding_code_end(source_text: &str, offset: u32) -> u32 {
    let prefix = &source_text.as_bytes()[..offset as usize];
    let skipped = prefix
        .iter()
        .rev()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    offset - skipped as u32
}

/// Whether the code ending at `code_end` is an opening brace
fn opens_block(source_text: &str, code_end: u32) -> bool {
    code_end > 0 && source_text.as_bytes()[code_end as usize - 1] == b'{'
}

/// Offset of the first non-whitespace byte at or after `offset`
fn following_code_start(source_text: &str, offset: u32) -> u32 {
    let skipped = source_text.as_bytes()[offset as usize..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    offset + skipped as u32
}

/// Text of a comment without its delimiters
fn comment_value(source_text: &str, span: Span, kind: CommentKind) -> Result<String> {
    let (open, close) = kind.delimiter_len();
    let start = (span.start + open) as usize;
    let end = span.end.saturating_sub(close) as usize;
    source_text
        .get(start..end)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::malformed(format!(
                "comment span {}..{} is not a valid slice of the source",
                span.start, span.end
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, SourceType::mjs()).unwrap()
    }

    #[test]
    fn test_collects_program_and_nested_blocks() {
        let tree = parse("function f() {\n  if (x) {\n    y();\n  }\n}\n{ }\n");
        let kinds: Vec<BodyKind> = tree.bodies().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BodyKind::Program,
                BodyKind::Block,
                BodyKind::Block,
                BodyKind::Block
            ]
        );
        assert_eq!(tree.bodies()[0].statements.len(), 2);
        assert!(tree.bodies()[3].statements.is_empty());
    }

    #[test]
    fn test_expression_arrow_body_is_not_a_block() {
        let tree = parse("const f = () => 1;\nconst g = () => { return 2; };\n");
        assert_eq!(tree.bodies().len(), 2);
        assert_eq!(tree.bodies()[1].statements.len(), 1);
    }

    #[test]
    fn test_attaches_leading_comments() {
        let source = "// @flow\n/* two */\nfoo();\nbar();\n";
        let tree = parse(source);
        let stmts = &tree.bodies()[0].statements;
        let comments = stmts[0].comments.as_ref().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].value, " @flow");
        assert_eq!(comments[0].kind, CommentKind::Line);
        assert_eq!(comments[1].value, " two ");
        assert_eq!(comments[1].kind, CommentKind::Block);
        assert_eq!(comments[1].attached_to, stmts[0].span.start);
        assert!(stmts[1].comments.is_none());
    }

    #[test]
    fn test_attaches_trailing_comment_on_same_line() {
        let tree = parse("foo(); // $FlowFixMe\nbar();\n");
        let stmts = &tree.bodies()[0].statements;
        let comments = stmts[0].comments.as_ref().unwrap();
        assert_eq!(comments[0].position, CommentPosition::Trailing);
        assert_eq!(comments[0].value, " $FlowFixMe");
    }

    #[test]
    fn test_comment_after_opening_brace_leads_first_statement() {
        let tree = parse("function f() { // $FlowFixMe\n  foo();\n}\n");
        let stmts = &tree.bodies()[1].statements;
        let comments = stmts[0].comments.as_ref().unwrap();
        assert_eq!(comments[0].value, " $FlowFixMe");
        assert_eq!(comments[0].position, CommentPosition::Leading);
        assert_eq!(comments[0].attached_to, stmts[0].span.start);
    }

    #[test]
    fn test_comment_after_brace_of_empty_block_is_unattached() {
        let tree = parse("if (a) { // $FlowFixMe\n}\n");
        assert!(tree.comments().next().is_none());
    }

    #[test]
    fn test_attaches_comments_to_directives() {
        let tree = parse("/* @flow */\n'use strict';\nfoo();\n");
        let stmts = &tree.bodies()[0].statements;
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].comments.is_some());
    }

    #[test]
    fn test_parse_error() {
        let result = SyntaxTree::parse("function (", SourceType::mjs());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_source_type_for() {
        assert!(source_type_for(Path::new("a.ts"), false).is_typescript());
        assert!(source_type_for(Path::new("a.js"), true).is_typescript());
        assert!(!source_type_for(Path::new("a.js"), false).is_typescript());
    }
}
