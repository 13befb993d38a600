//! Store error definitions.

use thiserror::Error;

use crate::store::model::ListId;
use crate::versioning::ETag;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No list with this identifier.
    #[error("Shopping list {0} does not exist")]
    ListNotFound(ListId),

    /// The list exists but holds no item with this name.
    #[error("Item '{name}' does not exist in shopping list {list}")]
    ItemNotFound { list: ListId, name: String },

    /// Item creation with a name already present in the list.
    #[error("An item named '{name}' already exists in shopping list {list}")]
    NameConflict { list: ListId, name: String },

    /// `If-Match` was missing or did not equal the stored version.
    #[error("Version conflict: current version is {current}, If-Match was {supplied:?}")]
    VersionConflict {
        current: ETag,
        supplied: Option<String>,
    },
}

impl StoreError {
    /// True for the not-found family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ListNotFound(_) | StoreError::ItemNotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
