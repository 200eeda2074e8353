//! flow-comment-scrub: strips Flow annotation comments from JavaScript sources
//!
//! This library parses JavaScript with oxc, attaches leading comments to the
//! statements of the program body and of every block body, removes the Flow
//! markers (`@flow`, `$FlowFixMe`, ...) from those comments and translates
//! `@noflow` into `@ts-nocheck`. The rewritten source keeps every other byte.

pub mod cli;
pub mod comments;
pub mod error;
pub mod tree;

pub use comments::{scrub_source, CommentScrubber, ScrubStats};
pub use error::{Error as ScrubError, Result as ScrubResult};
pub use tree::{Body, BodyKind, BodyVisitor, Comment, CommentKind, Statement, SyntaxTree};
