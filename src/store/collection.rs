//! The shopping list collection and its version cascade.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;
use crate::store::error::{StoreError, StoreResult};
use crate::store::model::{
    materialize, Conditional, Created, Item, ItemDraft, ListDraft, ListId, ListPatch,
    ShoppingList,
};
use crate::versioning::{check_read, check_write, ETag, ReadDecision, VersionCounter, WriteDecision};

/// What a write touched, from the most specific resource outwards.
#[derive(Debug, Clone, Copy)]
enum Touched<'a> {
    /// A list was removed; only the collection version moves.
    Collection,
    /// The list's own fields, or its item set, changed.
    List(ListId),
    /// The list was (re)populated; every item it holds is stamped too.
    Contents(ListId),
    /// A single item was written.
    Item(ListId, &'a str),
}

/// Everything guarded by the store lock.
#[derive(Debug)]
struct Collection {
    lists: BTreeMap<ListId, ShoppingList>,
    next_id: u64,
    counter: VersionCounter,
    etag: ETag,
}

impl Collection {
    fn new() -> Self {
        Self {
            lists: BTreeMap::new(),
            next_id: 1,
            counter: VersionCounter::new(),
            etag: ETag::INITIAL,
        }
    }

    fn list(&self, id: ListId) -> StoreResult<&ShoppingList> {
        self.lists.get(&id).ok_or(StoreError::ListNotFound(id))
    }

    fn list_mut(&mut self, id: ListId) -> StoreResult<&mut ShoppingList> {
        self.lists.get_mut(&id).ok_or(StoreError::ListNotFound(id))
    }

    fn allocate_id(&mut self) -> ListId {
        let id = ListId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Stamp fresh versions on everything a write touched: item(s) first,
    /// then the owning list, then the collection. Returns the version of the
    /// most specific resource touched.
    ///
    /// This is the only place versions are assigned.
    fn commit(&mut self, touched: Touched<'_>) -> StoreResult<ETag> {
        let stamped = match touched {
            Touched::Collection => None,
            Touched::List(id) => {
                let list = self.lists.get_mut(&id).ok_or(StoreError::ListNotFound(id))?;
                list.etag = self.counter.next();
                Some(list.etag)
            }
            Touched::Contents(id) => {
                let list = self.lists.get_mut(&id).ok_or(StoreError::ListNotFound(id))?;
                for item in list.items.values_mut() {
                    item.etag = self.counter.next();
                }
                list.etag = self.counter.next();
                Some(list.etag)
            }
            Touched::Item(id, name) => {
                let list = self.lists.get_mut(&id).ok_or(StoreError::ListNotFound(id))?;
                let item = list.items.get_mut(name).ok_or_else(|| StoreError::ItemNotFound {
                    list: id,
                    name: name.to_string(),
                })?;
                item.etag = self.counter.next();
                let item_etag = item.etag;
                list.etag = self.counter.next();
                Some(item_etag)
            }
        };

        self.etag = self.counter.next();
        Ok(stamped.unwrap_or(self.etag))
    }
}

fn require_match(current: ETag, if_match: Option<&str>) -> StoreResult<()> {
    match check_write(current, if_match) {
        WriteDecision::Proceed => Ok(()),
        WriteDecision::Conflict => Err(StoreError::VersionConflict {
            current,
            supplied: if_match.map(str::to_string),
        }),
    }
}

fn conditional<T>(current: ETag, if_none_match: Option<&str>, body: impl FnOnce() -> T) -> Conditional<T> {
    match check_read(current, if_none_match) {
        ReadDecision::Send => Conditional::Modified { etag: current, body: body() },
        ReadDecision::NotModified => Conditional::NotModified,
    }
}

/// A thread-safe handle to one independent shopping list collection.
///
/// Cloning the handle shares the underlying collection.
#[derive(Debug, Clone)]
pub struct ShoppingStore {
    inner: Arc<Mutex<Collection>>,
}

impl Default for ShoppingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingStore {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Collection::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Collection> {
        // Writes validate before mutating, so a poisoned guard still holds
        // consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current version of the whole collection.
    pub fn collection_etag(&self) -> ETag {
        self.lock().etag
    }

    /// Number of lists in the collection.
    pub fn len(&self) -> usize {
        self.lock().lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========== Reads ==========

    /// Snapshot of every list, validated against the collection version.
    pub fn lists(&self, if_none_match: Option<&str>) -> Conditional<BTreeMap<ListId, ShoppingList>> {
        let collection = self.lock();
        conditional(collection.etag, if_none_match, || collection.lists.clone())
    }

    /// Snapshot of one list.
    pub fn list(&self, id: ListId, if_none_match: Option<&str>) -> StoreResult<Conditional<ShoppingList>> {
        let collection = self.lock();
        let list = collection.list(id)?;
        Ok(conditional(list.etag, if_none_match, || list.clone()))
    }

    /// Items of one list, optionally restricted to an exact `status`.
    ///
    /// Validated against the owning list's version.
    pub fn items(
        &self,
        id: ListId,
        status: Option<&str>,
        if_none_match: Option<&str>,
    ) -> StoreResult<Conditional<Vec<Item>>> {
        let collection = self.lock();
        let list = collection.list(id)?;
        Ok(conditional(list.etag, if_none_match, || {
            list.items
                .values()
                .filter(|item| status.map_or(true, |wanted| item.status == wanted))
                .cloned()
                .collect()
        }))
    }

    /// Snapshot of one item.
    pub fn item(&self, id: ListId, name: &str, if_none_match: Option<&str>) -> StoreResult<Conditional<Item>> {
        let collection = self.lock();
        let item = collection
            .list(id)?
            .items
            .get(name)
            .ok_or_else(|| StoreError::ItemNotFound { list: id, name: name.to_string() })?;
        Ok(conditional(item.etag, if_none_match, || item.clone()))
    }

    // ========== List writes ==========

    /// Add a list under a freshly allocated identifier.
    pub fn create_list(&self, draft: ListDraft) -> StoreResult<Created> {
        let mut collection = self.lock();
        let id = collection.allocate_id();
        collection.lists.insert(id, ShoppingList::from_draft(draft));
        let etag = collection.commit(Touched::Contents(id))?;
        metrics::record_list_count(collection.lists.len());
        Ok(Created { id, etag })
    }

    /// Replace a list wholesale. Requires `If-Match` on the list version.
    pub fn replace_list(&self, id: ListId, draft: ListDraft, if_match: Option<&str>) -> StoreResult<ETag> {
        let mut collection = self.lock();
        require_match(collection.list(id)?.etag, if_match)?;
        collection.lists.insert(id, ShoppingList::from_draft(draft));
        collection.commit(Touched::Contents(id))
    }

    /// Overwrite only the supplied fields. Supplied items replace the whole
    /// item map and are all stamped afresh.
    pub fn patch_list(&self, id: ListId, patch: ListPatch, if_match: Option<&str>) -> StoreResult<ETag> {
        let mut collection = self.lock();
        let list = collection.list_mut(id)?;
        require_match(list.etag, if_match)?;

        if let Some(description) = patch.description {
            list.description = description;
        }
        if let Some(date) = patch.date {
            list.date = date;
        }
        let touched = match patch.items {
            Some(items) => {
                list.items = materialize(items);
                Touched::Contents(id)
            }
            None => Touched::List(id),
        };
        collection.commit(touched)
    }

    /// Remove a list and all its items.
    pub fn delete_list(&self, id: ListId) -> StoreResult<()> {
        let mut collection = self.lock();
        collection.lists.remove(&id).ok_or(StoreError::ListNotFound(id))?;
        collection.commit(Touched::Collection)?;
        metrics::record_list_count(collection.lists.len());
        Ok(())
    }

    // ========== Item writes ==========

    /// Add an item whose name is not yet used in the list.
    pub fn create_item(&self, id: ListId, name: &str, draft: ItemDraft) -> StoreResult<ETag> {
        let mut collection = self.lock();
        let list = collection.list_mut(id)?;
        if list.items.contains_key(name) {
            return Err(StoreError::NameConflict { list: id, name: name.to_string() });
        }
        list.items.insert(
            name.to_string(),
            Item {
                name: name.to_string(),
                quantity: draft.quantity,
                status: draft.status,
                etag: ETag::INITIAL,
            },
        );
        collection.commit(Touched::Item(id, name))
    }

    /// Replace an item. Requires `If-Match` on the item version.
    pub fn update_item(&self, id: ListId, name: &str, draft: ItemDraft, if_match: Option<&str>) -> StoreResult<ETag> {
        let mut collection = self.lock();
        let item = collection
            .list_mut(id)?
            .items
            .get_mut(name)
            .ok_or_else(|| StoreError::ItemNotFound { list: id, name: name.to_string() })?;
        require_match(item.etag, if_match)?;
        item.quantity = draft.quantity;
        item.status = draft.status;
        collection.commit(Touched::Item(id, name))
    }

    /// Remove an item from its list.
    pub fn delete_item(&self, id: ListId, name: &str) -> StoreResult<()> {
        let mut collection = self.lock();
        collection
            .list_mut(id)?
            .items
            .remove(name)
            .ok_or_else(|| StoreError::ItemNotFound { list: id, name: name.to_string() })?;
        collection.commit(Touched::List(id))?;
        Ok(())
    }
}
