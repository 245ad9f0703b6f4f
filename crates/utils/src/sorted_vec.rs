use std::{cmp::Ordering, mem, ops::Index};

/// A vector that is always sorted
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SortedVec<T: Ord> {
    items: Vec<T>,
}

impl<'a, T: Ord + Clone> SortedVec<T> {
    pub fn from_unsorted(items: &'a [T]) -> SortedVec<T> {
        let mut items = items.to_vec();
        items.sort();
        SortedVec { items }
    }
}

impl<T: Ord> SortedVec<T> {
    pub fn new() -> SortedVec<T> {
        SortedVec { items: Vec::new() }
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<T> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Binary search with a comparator that must agree with the sort order
    pub fn find_by<F>(&self, f: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let pos = self.items.binary_search_by(f).ok()?;
        self.items.get(pos)
    }

    pub fn insert(&mut self, item: T) {
        let pos = match self.items.binary_search(&item) {
            Ok(pos) | Err(pos) => pos,
        };
        self.items.insert(pos, item);
    }

    /// Merge another sorted vector into this one. Equal items from `other`
    /// are placed after the existing ones.
    pub fn merge(&mut self, other: SortedVec<T>) {
        let cap = self.items.len() + other.items.len();
        let old = mem::replace(&mut self.items, Vec::with_capacity(cap));

        let mut old = old.into_iter().peekable();
        let mut new = other.items.into_iter().peekable();

        loop {
            let take_old = match (old.peek(), new.peek()) {
                (Some(a), Some(b)) => a <= b,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            let next = if take_old { old.next() } else { new.next() };
            self.items.extend(next);
        }
    }
}

impl<T: Ord> Index<usize> for SortedVec<T> {
    type Output = T;

    fn index(&self, i: usize) -> &Self::Output {
        &self.items[i]
    }
}

impl<T: Ord + Clone> From<&[T]> for SortedVec<T> {
    fn from(arr: &[T]) -> Self {
        Self::from_unsorted(arr)
    }
}

impl<T: Ord> From<Vec<T>> for SortedVec<T> {
    fn from(mut items: Vec<T>) -> Self {
        items.sort();
        SortedVec { items }
    }
}

impl<T: Ord> From<T> for SortedVec<T> {
    fn from(value: T) -> Self {
        SortedVec { items: vec![value] }
    }
}

impl<'a, T: Ord> IntoIterator for &'a SortedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
