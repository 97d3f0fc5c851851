//! Indexed, ordered collection of entities.
//!
//! The repository owns its entities in an id index and keeps a separate
//! ordered sequence of ids. Sorting reorders the sequence only; the index is
//! never touched, and both always agree on membership.

use std::collections::HashMap;

use stockroom_core::Entity;

/// Catalogue fields a repository can sort, search, and total by.
pub trait Catalogued: Entity {
    fn name(&self) -> &str;
    fn category(&self) -> &str;
    fn unit_price(&self) -> f64;
    fn quantity(&self) -> i32;

    /// Derived monetary value of the entity's stock.
    fn total_value(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct Repository<T: Entity> {
    order: Vec<T::Id>,
    index: HashMap<T::Id, T>,
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert at the end of the ordered sequence and index by id.
    ///
    /// An entity already stored under the same id is displaced (removed from
    /// the sequence) and returned, so duplicate ids never coexist.
    pub fn add(&mut self, entity: T) -> Option<T> {
        let id = entity.id();
        let displaced = self.remove(id);
        self.order.push(id);
        self.index.insert(id, entity);
        displaced
    }

    /// Remove the entity with `id` from both the sequence and the index.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let removed = self.index.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn find_by_id(&self, id: T::Id) -> Option<&T> {
        self.index.get(&id)
    }

    pub fn find_by_id_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.index.get_mut(&id)
    }

    /// Entities in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.index.get(id))
    }

    pub fn find_all(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Entities matching `pred`, preserving relative order.
    pub fn filter<P>(&self, mut pred: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|entity| pred(*entity)).collect()
    }

    pub fn max_id(&self) -> Option<T::Id> {
        self.index.keys().copied().max()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Stable reorder of the sequence by `compare`.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> core::cmp::Ordering,
    {
        let index = &self.index;
        self.order.sort_by(|a, b| match (index.get(a), index.get(b)) {
            (Some(a), Some(b)) => compare(a, b),
            _ => core::cmp::Ordering::Equal,
        });
    }
}

impl<T: Catalogued> Repository<T> {
    pub fn sort_by_name(&mut self) {
        self.sort_by(|a, b| a.name().cmp(b.name()));
    }

    pub fn sort_by_price(&mut self) {
        self.sort_by(|a, b| a.unit_price().total_cmp(&b.unit_price()));
    }

    pub fn sort_by_quantity(&mut self) {
        self.sort_by(|a, b| a.quantity().cmp(&b.quantity()));
    }

    pub fn sort_by_category(&mut self) {
        self.sort_by(|a, b| a.category().cmp(b.category()));
    }

    /// Case-insensitive substring match on name.
    pub fn search_by_name(&self, needle: &str) -> Vec<&T> {
        let needle = needle.to_lowercase();
        self.filter(|e| e.name().to_lowercase().contains(&needle))
    }

    /// Exact match on category.
    pub fn search_by_category(&self, category: &str) -> Vec<&T> {
        self.filter(|e| e.category() == category)
    }

    pub fn total_value(&self) -> f64 {
        self.iter().map(Catalogued::total_value).sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.iter().map(|e| i64::from(e.quantity())).sum()
    }
}
