//! Flow comment removal
//!
//! This module holds the fixed Flow marker vocabulary and the scrubber that
//! rewrites statement comment lists against it.

pub mod markers;
pub mod scrubber;

pub use markers::{contains_marker, is_blank_doc_line, FLOW_MARKERS};
pub use scrubber::{scrub_comment, scrub_comments, scrub_source, CommentScrubber, ScrubStats};
