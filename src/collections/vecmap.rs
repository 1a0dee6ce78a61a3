use serde::{Deserialize, Serialize};
use std::iter::FromIterator;
use tracing::error;

use crate::sdk::api::{SessionError, SessionResult};

use super::TypedUsize;

/// An append-ordered sequence keyed by `TypedUsize<K>`.
/// Position in the vec *is* the key; entries are never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VecMap<K, V>(Vec<V>, std::marker::PhantomData<TypedUsize<K>>);

impl<K, V> VecMap<K, V> {
    pub fn from_vec(vec: Vec<V>) -> Self {
        Self(vec, std::marker::PhantomData)
    }

    pub fn get(&self, index: TypedUsize<K>) -> SessionResult<&V> {
        self.0.get(index.as_usize()).ok_or_else(|| {
            error!("index {} out of bounds {}", index, self.0.len());
            SessionError::Fatal
        })
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> VecMapIter<K, std::slice::Iter<V>> {
        VecMapIter::new(self.0.iter())
    }
}

impl<K, V> IntoIterator for VecMap<K, V> {
    type Item = (TypedUsize<K>, <std::vec::IntoIter<V> as Iterator>::Item);
    type IntoIter = VecMapIter<K, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        VecMapIter::new(self.0.into_iter())
    }
}

/// impl IntoIterator for &VecMap as suggested here: https://doc.rust-lang.org/std/iter/index.html#iterating-by-reference
impl<'a, K, V> IntoIterator for &'a VecMap<K, V> {
    type Item = (TypedUsize<K>, <std::slice::Iter<'a, V> as Iterator>::Item);
    type IntoIter = VecMapIter<K, std::slice::Iter<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<V> for VecMap<K, V> {
    fn from_iter<Iter: IntoIterator<Item = V>>(iter: Iter) -> Self {
        Self::from_vec(Vec::from_iter(iter))
    }
}

/// Yields `(TypedUsize<K>, item)` pairs: [`std::iter::Enumerate`] with the
/// position lifted into the map's key type.
pub struct VecMapIter<K, I> {
    iter: std::iter::Enumerate<I>,
    marker: std::marker::PhantomData<TypedUsize<K>>,
}

impl<K, I: Iterator> VecMapIter<K, I> {
    fn new(iter: I) -> Self {
        Self {
            iter: iter.enumerate(),
            marker: std::marker::PhantomData,
        }
    }
}

impl<K, I> Iterator for VecMapIter<K, I>
where
    I: Iterator,
{
    type Item = (TypedUsize<K>, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, value) = self.iter.next()?;
        Some((TypedUsize::from_usize(index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
