//! Resource handlers.
//!
//! Each handler parses the path, decodes the body, and hands the request to
//! the store in a single call; the store performs lookup, precondition
//! evaluation, mutation and version stamping atomically.

pub mod items;
pub mod lists;
