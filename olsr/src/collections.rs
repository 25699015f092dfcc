//! Bounded collections.
//!
//! Node tables have a hard capacity taken from [`NodeConfig`](crate::config::NodeConfig).
//! Pushing past it is reported to the caller instead of trapping or evicting,
//! so the owning table can turn it into a [`CapacityExceeded`](crate::Error)
//! for its own table.

use core::ops::Deref;

/// Returned by [`BoundedVec::try_push`] when the vector is full.
///
/// Carries the rejected value back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Full<T>(pub T);

/// A `Vec` that refuses to grow past a fixed capacity.
///
/// Storage is allocated lazily, so a mostly-empty table stays small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T> {
    inner: Vec<T>,
    max_capacity: usize,
}

impl<T> BoundedVec<T> {
    /// Create an empty vector holding at most `max_capacity` elements.
    pub fn with_max_capacity(max_capacity: usize) -> Self {
        Self {
            inner: Vec::new(),
            max_capacity,
        }
    }

    /// Append a value, or hand it back if the vector is full.
    pub fn try_push(&mut self, value: T) -> Result<(), Full<T>> {
        if self.inner.len() >= self.max_capacity {
            return Err(Full(value));
        }
        self.inner.push(value);
        Ok(())
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.max_capacity
    }

    /// Remove every element. Capacity limit is unchanged.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<T> Deref for BoundedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.inner
    }
}

impl<'a, T> IntoIterator for &'a BoundedVec<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
