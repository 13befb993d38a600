//! Store records and operation inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::versioning::ETag;

/// Identifier of a shopping list within the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListId(pub u64);

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ListId)
    }
}

/// An entry in a shopping list, keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub quantity: i64,
    pub status: String,
    pub etag: ETag,
}

/// A shopping list and the items it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    pub description: String,
    pub date: String,
    pub items: BTreeMap<String, Item>,
    pub etag: ETag,
}

impl ShoppingList {
    /// Build an unstamped list from a draft; `commit` assigns the versions.
    pub(crate) fn from_draft(draft: ListDraft) -> Self {
        Self {
            description: draft.description,
            date: draft.date,
            items: materialize(draft.items),
            etag: ETag::INITIAL,
        }
    }
}

/// Item fields supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub quantity: i64,
    pub status: String,
}

/// A complete list representation supplied by a client (create / replace).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDraft {
    pub description: String,
    pub date: String,
    pub items: BTreeMap<String, ItemDraft>,
}

/// A partial list update. `None` fields keep their stored value; `Some(items)`
/// replaces the whole item map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub description: Option<String>,
    pub date: Option<String>,
    pub items: Option<BTreeMap<String, ItemDraft>>,
}

/// Identifier and version handed back after a list is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
    pub id: ListId,
    pub etag: ETag,
}

/// Result of a conditional read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional<T> {
    /// Current representation and the ETag it was read at.
    Modified { etag: ETag, body: T },
    /// `If-None-Match` matched the current version.
    NotModified,
}

impl<T> Conditional<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Conditional<U> {
        match self {
            Conditional::Modified { etag, body } => Conditional::Modified { etag, body: f(body) },
            Conditional::NotModified => Conditional::NotModified,
        }
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, Conditional::NotModified)
    }
}

pub(crate) fn materialize(drafts: BTreeMap<String, ItemDraft>) -> BTreeMap<String, Item> {
    drafts
        .into_iter()
        .map(|(name, draft)| {
            let item = Item {
                name: name.clone(),
                quantity: draft.quantity,
                status: draft.status,
                etag: ETag::INITIAL,
            };
            (name, item)
        })
        .collect()
}
