use serde::{Deserialize, Serialize};

/// A `usize` tagged with the index family it belongs to,
/// so that a registry slot index cannot be confused with any other counter.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))] // disable serde trait bounds on `K`: https://serde.rs/attr-bound.html
pub struct TypedUsize<K>(usize, std::marker::PhantomData<K>);

impl<K> TypedUsize<K> {
    pub fn from_usize(index: usize) -> Self {
        TypedUsize(index, std::marker::PhantomData)
    }
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

// manual impls: `K` is a phantom marker, so none of these may bound it
impl<K> Clone for TypedUsize<K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for TypedUsize<K> {}
impl<K> PartialEq for TypedUsize<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<K> Eq for TypedUsize<K> {}

impl<K> std::fmt::Display for TypedUsize<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
