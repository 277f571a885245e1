//! Ordered, key-unique collection of properties.

use crate::base::modelerror::ModelError;
use crate::collection::property::{json_type, PropertyDescriptor, PropertyKind};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Cow;

/// Construction input: nothing, one value, or an ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub enum ListInput<T> {
    Absent,
    Single(T),
    Sequence(Vec<T>),
}

impl<T> Default for ListInput<T> {
    fn default() -> Self {
        ListInput::Absent
    }
}

impl<T> From<Vec<T>> for ListInput<T> {
    fn from(values: Vec<T>) -> Self {
        ListInput::Sequence(values)
    }
}

impl<T> From<Option<T>> for ListInput<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ListInput::Single(value),
            None => ListInput::Absent,
        }
    }
}

impl<T> ListInput<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListInput::Absent => Vec::new(),
            ListInput::Single(value) => vec![value],
            ListInput::Sequence(values) => values,
        }
    }
}

/// What [`PropertyList::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Options for [`PropertyList::to_object`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectOptions {
    /// Only include members that are not disabled.
    pub enabled: bool,
    /// Lowercase keys in the output.
    pub ignore_case: bool,
}

/// An ordered sequence of members of kind `T`, indexed by key.
///
/// Insertion order is kept. A key that is already present is replaced in its
/// current slot instead of being appended again, so at most one member per key
/// survives every mutation. Lookup and membership are O(1).
///
/// Not synchronized; callers sharing a list across threads serialize access
/// themselves.
#[derive(Debug, Clone)]
pub struct PropertyList<T: PropertyKind> {
    members: IndexMap<String, T>,
}

impl<T: PropertyKind> Default for PropertyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PropertyKind + PartialEq> PartialEq for PropertyList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

fn index_key<T: PropertyKind>(key: &str) -> Cow<'_, str> {
    if T::INDEX_CASE_INSENSITIVE {
        Cow::Owned(key.to_lowercase())
    } else {
        Cow::Borrowed(key)
    }
}

impl<T: PropertyKind> PropertyList<T> {
    pub fn new() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }

    /// Build from already-typed members.
    ///
    /// Duplicate keys keep the slot of their first occurrence and the value of
    /// their last.
    pub fn from_input(input: ListInput<T>) -> Self {
        let mut list = Self::new();
        list.add_input(input);
        list
    }

    /// Build from plain descriptors, coercing each to `T`.
    pub fn from_descriptors(input: ListInput<PropertyDescriptor>) -> Result<Self, ModelError> {
        let mut list = Self::new();
        list.add_descriptors(input)?;
        Ok(list)
    }

    /// Build from JSON: `null`, a single object, an array of objects, or a raw
    /// string in the member kind's own grammar.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let members = match value {
            Value::Null => Vec::new(),
            Value::String(raw) => T::from_raw(&raw)?,
            Value::Object(_) => vec![T::from_descriptor(PropertyDescriptor::from_value(
                value, T::KIND,
            )?)?],
            Value::Array(values) => values
                .into_iter()
                .map(|v| PropertyDescriptor::from_value(v, T::KIND).and_then(T::from_descriptor))
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(ModelError::invalid_construction(
                    T::KIND,
                    format!("cannot build a list from {}", json_type(&other)),
                ))
            }
        };
        Ok(members.into_iter().collect())
    }

    /// Append `item`, or replace the member with the same key in place.
    pub fn add(&mut self, item: T) {
        let key = index_key::<T>(item.key()).into_owned();
        match self.members.entry(key) {
            Entry::Occupied(mut slot) => {
                tracing::trace!(kind = T::KIND, key = %slot.key(), "replacing member in place");
                slot.insert(item);
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }

    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.add(item);
        }
    }

    /// `add` for every value of `input`; `Absent` is a no-op.
    pub fn add_input(&mut self, input: ListInput<T>) {
        self.add_all(input.into_vec());
    }

    /// Coerce and add descriptors. Nothing is added if any descriptor fails.
    pub fn add_descriptors(
        &mut self,
        input: ListInput<PropertyDescriptor>,
    ) -> Result<(), ModelError> {
        let members = input
            .into_vec()
            .into_iter()
            .map(T::from_descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        self.add_all(members);
        Ok(())
    }

    /// Insert at the front, or replace the member with the same key in place.
    pub fn prepend(&mut self, item: T) {
        let key = index_key::<T>(item.key()).into_owned();
        if let Some(existing) = self.members.get_mut(&key) {
            *existing = item;
        } else {
            self.members.shift_insert(0, key, item);
        }
    }

    /// Insert if the key is absent, else overwrite the existing member with the
    /// fields the descriptor carries (always the value). Position is kept.
    pub fn upsert(
        &mut self,
        descriptor: Option<PropertyDescriptor>,
    ) -> Result<Option<UpsertOutcome>, ModelError> {
        let Some(descriptor) = descriptor else {
            return Ok(None);
        };
        let key = descriptor
            .key
            .as_deref()
            .map(|k| index_key::<T>(k).into_owned())
            .ok_or_else(|| ModelError::invalid_construction(T::KIND, "descriptor has no key"))?;

        if let Some(existing) = self.members.get_mut(&key) {
            existing.update(descriptor)?;
            return Ok(Some(UpsertOutcome::Updated));
        }
        self.add(T::from_descriptor(descriptor)?);
        Ok(Some(UpsertOutcome::Inserted))
    }

    /// Typed upsert: only the value of an existing member is overwritten.
    pub fn upsert_item(&mut self, item: T) -> UpsertOutcome {
        let key = index_key::<T>(item.key()).into_owned();
        match self.members.get_mut(&key) {
            Some(existing) => {
                existing.replace_value(item);
                UpsertOutcome::Updated
            }
            None => {
                self.members.insert(key, item);
                UpsertOutcome::Inserted
            }
        }
    }

    /// Remove the member with `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.members.shift_remove(index_key::<T>(key).as_ref())
    }

    /// Remove the first member matching `predicate`.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self.members.values().position(|m| predicate(m))?;
        self.members.shift_remove_index(index).map(|(_, member)| member)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn populate<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.add_all(items);
    }

    /// Clear, then populate.
    pub fn repopulate<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.clear();
        self.populate(items);
    }

    /// Bring every member of `source` into this list. Existing keys are
    /// replaced in their slot, new keys appended in source order. With `prune`,
    /// keys absent from `source` are dropped.
    pub fn assimilate(&mut self, source: &PropertyList<T>, prune: bool) {
        if prune {
            self.members.retain(|key, _| source.members.contains_key(key));
        }
        for member in source.iter() {
            self.add(member.clone());
        }
    }

    /// Visit every member with its index, in order.
    pub fn each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, usize),
    {
        for (index, member) in self.members.values().enumerate() {
            visitor(member, index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.values()
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.members.get(index_key::<T>(key).as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.members.get_mut(index_key::<T>(key).as_ref())
    }

    pub fn has(&self, key: &str) -> bool {
        self.members.contains_key(index_key::<T>(key).as_ref())
    }

    pub fn idx(&self, index: usize) -> Option<&T> {
        self.members.get_index(index).map(|(_, member)| member)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.members.get_index_of(index_key::<T>(key).as_ref())
    }

    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.members.values().find(|m| predicate(m))
    }

    pub fn filter<F>(&self, mut predicate: F) -> Vec<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.members.values().filter(|m| predicate(m)).collect()
    }

    /// Snapshot of every member as a plain descriptor, disabled ones included.
    pub fn all(&self) -> Vec<PropertyDescriptor> {
        self.members.values().map(T::to_descriptor).collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.all().into_iter().map(PropertyDescriptor::into_value).collect())
    }

    /// Key to value mapping. A later member wins if two keys collide after
    /// case folding.
    pub fn to_object(&self, options: ObjectOptions) -> IndexMap<String, Value> {
        let mut object = IndexMap::with_capacity(self.members.len());
        for member in self.members.values() {
            if options.enabled && member.is_disabled() {
                continue;
            }
            let key = if options.ignore_case {
                member.key().to_lowercase()
            } else {
                member.key().to_string()
            };
            object.insert(key, member.to_descriptor().value);
        }
        object
    }
}

impl<T: PropertyKind> FromIterator<T> for PropertyList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add_all(iter);
        list
    }
}

impl<T: PropertyKind> Extend<T> for PropertyList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T: PropertyKind> IntoIterator for &'a PropertyList<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.values()
    }
}
