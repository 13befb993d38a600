//! Conditional request evaluation.
//!
//! # Rules
//! - Reads: `If-None-Match` equal to the current ETag suppresses the body.
//! - Writes: `If-Match` must be present and equal to the current ETag.
//!   A missing `If-Match` is treated as a mismatch.
//! - Creates and deletes are unconditional and never reach the evaluator.

use super::counter::ETag;

/// Outcome of evaluating `If-None-Match` on a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDecision {
    /// Send the representation along with its ETag.
    Send,
    /// The client already holds the current version.
    NotModified,
}

/// Outcome of evaluating `If-Match` on an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Proceed,
    Conflict,
}

/// Evaluate a read against the stored version.
pub fn check_read(current: ETag, if_none_match: Option<&str>) -> ReadDecision {
    match if_none_match {
        Some(seen) if !seen.is_empty() && current.matches(seen) => ReadDecision::NotModified,
        _ => ReadDecision::Send,
    }
}

/// Evaluate an update against the stored version.
pub fn check_write(current: ETag, if_match: Option<&str>) -> WriteDecision {
    match if_match {
        Some(expected) if current.matches(expected) => WriteDecision::Proceed,
        _ => WriteDecision::Conflict,
    }
}
