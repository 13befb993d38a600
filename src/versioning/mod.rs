//! Version tokens and conditional request evaluation.
//!
//! # Data Flow
//! ```text
//! write committed
//!     → counter.rs (issue next ETag: item → list → collection)
//!
//! request with If-Match / If-None-Match
//!     → conditional.rs (compare against stored ETag)
//!     → proceed | not modified | conflict
//! ```
//!
//! # Design Decisions
//! - ETags are bare decimal integers, compared as literal strings
//! - One counter per store; values are never reused and never decrease
//! - The evaluator is a pure function shared by every read and write path

pub mod conditional;
pub mod counter;

pub use conditional::{check_read, check_write, ReadDecision, WriteDecision};
pub use counter::{ETag, VersionCounter};
