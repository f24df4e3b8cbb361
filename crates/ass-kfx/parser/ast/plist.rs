//! Ordered unit collections with empty-unit filtering

use core::ops::{Deref, DerefMut};

use super::units::TextUnit;

/// Ordered list of words, syllables or characters
///
/// Derefs to a slice. [`PList::strip_empty`] drops units with blank text or
/// a non-positive duration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PList<T> {
    items: Vec<T>,
}

impl<T> PList<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove every unit
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: TextUnit> PList<T> {
    /// Drop empty units in place
    pub fn strip_empty(&mut self) {
        self.items.retain(|unit| !unit.is_empty_unit());
    }

    /// Copy without empty units
    #[must_use]
    pub fn stripped(&self) -> Self
    where
        T: Clone,
    {
        self.items
            .iter()
            .filter(|unit| !unit.is_empty_unit())
            .cloned()
            .collect()
    }
}

impl<T> Default for PList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for PList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for PList<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> From<Vec<T>> for PList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for PList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for PList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PList<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
