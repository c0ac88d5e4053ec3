//! Failure outcomes of dictionary operations.

use std::rc::Rc;

/// Error returned by [`ChainDict`](crate::ChainDict) operations.
///
/// A failed operation never changes the dictionary. Variants that name a key
/// hold a share of it, so the caller can inspect or reuse it.
#[derive(Debug, thiserror::Error)]
pub enum DictError<K: ?Sized> {
    /// The key is not hashable under the dictionary's hashing contract.
    #[error("unhashable key")]
    Unhashable(Rc<K>),

    /// No entry with a matching cached hash exists.
    #[error("key not found")]
    KeyNotFound(Rc<K>),

    /// The node arena is full; no node was created.
    #[error("cannot allocate dictionary node: limit of {limit} nodes reached")]
    AllocationFailure { limit: usize },
}

impl<K: ?Sized> DictError<K> {
    /// The key share carried by this error, if any.
    pub fn key(&self) -> Option<&Rc<K>> {
        match self {
            DictError::Unhashable(k) | DictError::KeyNotFound(k) => Some(k),
            DictError::AllocationFailure { .. } => None,
        }
    }

    pub fn into_key(self) -> Option<Rc<K>> {
        match self {
            DictError::Unhashable(k) | DictError::KeyNotFound(k) => Some(k),
            DictError::AllocationFailure { .. } => None,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, DictError::KeyNotFound(_))
    }

    pub fn is_unhashable(&self) -> bool {
        matches!(self, DictError::Unhashable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_accessors() {
        let k: Rc<str> = Rc::from("missing");
        let e = DictError::KeyNotFound(k.clone());
        assert!(e.is_key_not_found());
        assert!(!e.is_unhashable());
        assert_eq!(e.key().map(|k| &**k), Some("missing"));
        assert_eq!(Rc::strong_count(&k), 2);
        drop(e);
        assert_eq!(Rc::strong_count(&k), 1);

        let e: DictError<str> = DictError::AllocationFailure { limit: 4 };
        assert!(e.key().is_none());
        assert!(e.into_key().is_none());
    }

    #[test]
    fn display_and_debug() {
        let e: DictError<str> = DictError::Unhashable(Rc::from("s"));
        assert_eq!(e.to_string(), "unhashable key");
        assert_eq!(format!("{:?}", e), "Unhashable(\"s\")");
        let e: DictError<str> = DictError::AllocationFailure { limit: 2 };
        assert_eq!(
            e.to_string(),
            "cannot allocate dictionary node: limit of 2 nodes reached"
        );
    }
}
