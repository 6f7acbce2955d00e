use std::{fmt, iter::FromIterator, rc::Rc};

use itertools::Itertools;

use crate::error::SequenceError;

/// Immutable snapshot of a fully evaluated sequence. Clones share storage.
pub struct MaterializedSequence<T> {
    values: Rc<[T]>,
}

impl<T> MaterializedSequence<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Known up front; never re-runs anything.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T, SequenceError> {
        self.values.get(index).ok_or(SequenceError::Index {
            index,
            len: self.values.len(),
        })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> Clone for MaterializedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for MaterializedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: fmt::Debug> fmt::Debug for MaterializedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:?}]", self.values.iter().format(", "))
    }
}

impl<T> From<Vec<T>> for MaterializedSequence<T> {
    fn from(values: Vec<T>) -> Self {
        Self {
            values: Rc::from(values),
        }
    }
}

impl<T> FromIterator<T> for MaterializedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a MaterializedSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Clone> IntoIterator for MaterializedSequence<T> {
    type Item = T;
    type IntoIter = MaterializedIter<T>;

    fn into_iter(self) -> MaterializedIter<T> {
        MaterializedIter {
            seq: self.values,
            next_idx: 0,
        }
    }
}

/// Owning cursor over a snapshot, handing out clones.
pub struct MaterializedIter<T> {
    seq: Rc<[T]>,
    next_idx: usize,
}

impl<T: Clone> Iterator for MaterializedIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let res = self.seq.get(self.next_idx)?.clone();
        self.next_idx += 1;
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.seq.len() - self.next_idx;
        (left, Some(left))
    }
}

impl<T: Clone> ExactSizeIterator for MaterializedIter<T> {}
