//! Wire representations.
//!
//! Field names are PascalCase on the wire; lower-case spellings are accepted
//! on input. Unknown fields are ignored and ETags are never serialized.

use std::collections::BTreeMap;

use axum::body::Bytes;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::response::ApiError;
use crate::store::{Item, ItemDraft, ListDraft, ListPatch, ShoppingList};

/// Decode a JSON request body. Empty or malformed bodies, and any top-level
/// value other than an object, are client errors.
pub fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(ApiError::MalformedBody)?;
    if !value.is_object() {
        return Err(ApiError::MalformedBody(serde_json::Error::custom(
            "request body must be a JSON object",
        )));
    }
    T::deserialize(value).map_err(ApiError::MalformedBody)
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = String::deserialize(deserializer)?;
    if name.is_empty() {
        return Err(D::Error::custom("item name must not be empty"));
    }
    Ok(name)
}

/// Item fields as sent by clients (item PUT, and entries of a list's `Items`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemBody {
    #[serde(rename = "Quantity", alias = "quantity", default)]
    pub quantity: i64,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
}

impl From<ItemBody> for ItemDraft {
    fn from(body: ItemBody) -> Self {
        ItemDraft {
            quantity: body.quantity,
            status: body.status,
        }
    }
}

/// Item creation body; the name becomes the item's key.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItemBody {
    #[serde(rename = "Name", alias = "name", deserialize_with = "non_empty")]
    pub name: String,
    #[serde(rename = "Quantity", alias = "quantity", default)]
    pub quantity: i64,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
}

impl NewItemBody {
    pub fn into_parts(self) -> (String, ItemDraft) {
        let draft = ItemDraft {
            quantity: self.quantity,
            status: self.status,
        };
        (self.name, draft)
    }
}

/// Full list body (POST and PUT).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBody {
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
    #[serde(rename = "Date", alias = "date", default)]
    pub date: String,
    #[serde(rename = "Items", alias = "items", default)]
    pub items: Option<BTreeMap<String, ItemBody>>,
}

impl From<ListBody> for ListDraft {
    fn from(body: ListBody) -> Self {
        ListDraft {
            description: body.description,
            date: body.date,
            items: drafts(body.items.unwrap_or_default()),
        }
    }
}

/// Partial list body (PATCH). Absent or null fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPatchBody {
    #[serde(rename = "Description", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "Date", alias = "date", default)]
    pub date: Option<String>,
    #[serde(rename = "Items", alias = "items", default)]
    pub items: Option<BTreeMap<String, ItemBody>>,
}

impl From<ListPatchBody> for ListPatch {
    fn from(body: ListPatchBody) -> Self {
        ListPatch {
            description: body.description,
            date: body.date,
            items: body.items.map(drafts),
        }
    }
}

fn drafts(items: BTreeMap<String, ItemBody>) -> BTreeMap<String, ItemDraft> {
    items
        .into_iter()
        .map(|(name, body)| (name, ItemDraft::from(body)))
        .collect()
}

/// Outgoing item representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Status")]
    pub status: String,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            quantity: item.quantity,
            status: item.status,
        }
    }
}

impl From<&ItemDraft> for ItemView {
    fn from(draft: &ItemDraft) -> Self {
        Self {
            quantity: draft.quantity,
            status: draft.status.clone(),
        }
    }
}

/// Outgoing list representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Items")]
    pub items: BTreeMap<String, ItemView>,
}

impl From<ShoppingList> for ListView {
    fn from(list: ShoppingList) -> Self {
        Self {
            description: list.description,
            date: list.date,
            items: list
                .items
                .into_iter()
                .map(|(name, item)| (name, ItemView::from(item)))
                .collect(),
        }
    }
}

impl From<&ListDraft> for ListView {
    fn from(draft: &ListDraft) -> Self {
        Self {
            description: draft.description.clone(),
            date: draft.date.clone(),
            items: draft
                .items
                .iter()
                .map(|(name, item)| (name.clone(), ItemView::from(item)))
                .collect(),
        }
    }
}

/// Items keyed by name, the shape of every item response.
pub fn items_by_name(items: impl IntoIterator<Item = Item>) -> BTreeMap<String, ItemView> {
    items
        .into_iter()
        .map(|item| (item.name.clone(), ItemView::from(item)))
        .collect()
}
