//! Arrays indexed from a base value
//!
//! Every per-vertex and per-edge array of the library is addressed with the numbering of the
//! structure that owns it: graphs read with base 1 are indexed from 1, induced subgraphs from
//! the base of their parent, and so on. Instead of offsetting a pointer by the base value, a
//! [`BasedVec`] carries its base next to the data and translates on every access. Dropping the
//! owning structure releases all of its arrays at once.

use std::ops::{Index, IndexMut, Range};

use crate::defs::Gnum;
use crate::error::Result;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct BasedVec<T> {
    base: Gnum,
    data: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for BasedVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.base)?;
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T> BasedVec<T> {
    pub fn new(base: Gnum, data: Vec<T>) -> Self {
        Self { base, data }
    }

    /// Empty array able to hold `cap` items without reallocating, or `OutOfMemory`
    pub fn try_with_capacity(base: Gnum, cap: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(cap)?;
        Ok(Self { base, data })
    }

    #[inline]
    pub fn base(&self) -> Gnum {
        self.base
    }

    /// One past the last valid index
    #[inline]
    pub fn end(&self) -> Gnum {
        self.base + self.data.len() as Gnum
    }

    #[inline]
    pub fn range(&self) -> Range<Gnum> {
        self.base..self.end()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.data.push(item);
    }

    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
    }

    /// Remaining capacity of the underlying storage
    pub fn spare(&self) -> usize {
        self.data.capacity() - self.data.len()
    }

    #[inline]
    pub fn get(&self, idx: Gnum) -> Option<&T> {
        if idx < self.base {
            return None;
        }
        self.data.get((idx - self.base) as usize)
    }

    /// Same data seen with another base value
    pub fn rebased(self, base: Gnum) -> Self {
        Self { base, data: self.data }
    }

    /// Index/value pairs, indices in the numbering of the array
    pub fn enumerate(&self) -> impl Iterator<Item = (Gnum, &T)> + '_ {
        let base = self.base;
        self.data.iter().enumerate().map(move |(i, v)| (base + i as Gnum, v))
    }
}

impl<T: Clone> BasedVec<T> {
    pub fn from_elem(base: Gnum, item: T, len: usize) -> Self {
        Self { base, data: vec![item; len] }
    }

    /// Same as [`BasedVec::from_elem`], reporting allocation failure
    pub fn try_from_elem(base: Gnum, item: T, len: usize) -> Result<Self> {
        let mut this = Self::try_with_capacity(base, len)?;
        this.data.resize(len, item);
        Ok(this)
    }

    pub fn fill(&mut self, item: T) {
        self.data.fill(item);
    }

    pub fn resize(&mut self, len: usize, item: T) {
        self.data.resize(len, item);
    }

    /// Copy of the items with indices in `range`, keeping their numbering
    pub fn sub(&self, range: Range<Gnum>) -> Self {
        Self { base: range.start, data: self[range].to_vec() }
    }
}

impl<T> Index<Gnum> for BasedVec<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, idx: Gnum) -> &T {
        debug_assert!(idx >= self.base, "index {idx} below base {}", self.base);
        &self.data[(idx - self.base) as usize]
    }
}

impl<T> IndexMut<Gnum> for BasedVec<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, idx: Gnum) -> &mut T {
        debug_assert!(idx >= self.base, "index {idx} below base {}", self.base);
        &mut self.data[(idx - self.base) as usize]
    }
}

impl<T> Index<Range<Gnum>> for BasedVec<T> {
    type Output = [T];

    #[inline]
    #[track_caller]
    fn index(&self, r: Range<Gnum>) -> &[T] {
        &self.data[(r.start - self.base) as usize..(r.end - self.base) as usize]
    }
}

impl<T> IndexMut<Range<Gnum>> for BasedVec<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, r: Range<Gnum>) -> &mut [T] {
        &mut self.data[(r.start - self.base) as usize..(r.end - self.base) as usize]
    }
}

impl<'a, T> IntoIterator for &'a BasedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Vector able to hold `cap` items, or `OutOfMemory`
pub fn try_vec<T>(cap: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(cap)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn based_indexing() {
        let mut v = BasedVec::new(1, vec![10, 20, 30]);
        assert_eq!(v[1], 10);
        assert_eq!(v[3], 30);
        assert_eq!(v.end(), 4);
        assert_eq!(&v[2..4], &[20, 30]);
        v[2] = 21;
        assert_eq!(v.as_slice(), &[10, 21, 30]);
        assert_eq!(v.get(0), None);
        assert_eq!(v.get(4), None);
        assert_eq!(v.enumerate().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn sub_keeps_numbering() {
        let v = BasedVec::new(0, vec![5, 6, 7, 8]);
        let s = v.sub(1..3);
        assert_eq!(s.base(), 1);
        assert_eq!(s[2], 7);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn reserve_reports_capacity() {
        let v: BasedVec<Gnum> = BasedVec::try_with_capacity(0, 16).unwrap();
        assert!(v.spare() >= 16);
        assert!(try_vec::<u8>(usize::MAX).is_err());
    }
}
