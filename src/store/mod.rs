//! In-memory shopping list store.
//!
//! # Data Flow
//! ```text
//! handler
//!     → ShoppingStore (one lock per operation)
//!     → lookup list / item
//!     → versioning::conditional (If-Match / If-None-Match)
//!     → mutate
//!     → commit (stamp item, then list, then collection)
//! ```
//!
//! # Design Decisions
//! - A single mutex guards lists, identifier allocation, the version counter
//!   and the collection ETag, so every request is one atomic unit
//! - Every check runs before any write; failed requests leave no trace
//! - List identifiers are allocated monotonically and never reused
//! - Reads return owned snapshots taken under the lock

pub mod collection;
pub mod error;
pub mod model;

pub use collection::ShoppingStore;
pub use error::{StoreError, StoreResult};
pub use model::{
    Conditional, Created, Item, ItemDraft, ListDraft, ListId, ListPatch, ShoppingList,
};
