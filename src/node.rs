//! Node: one key/value slot of the chain.

use std::rc::Rc;

slotmap::new_key_type! {
    /// Arena index of a node. Only the chain links hold these.
    pub(crate) struct NodeKey;
}

pub(crate) struct Node<K: ?Sized, V: ?Sized> {
    pub(crate) key: Rc<K>,
    // Hash of `key` when it was stored; never recomputed.
    pub(crate) hash: u64,
    pub(crate) value: Rc<V>,
    pub(crate) next: Option<NodeKey>,
}

impl<K: ?Sized, V: ?Sized> Node<K, V> {
    /// Build a node from shares the caller already acquired. `hash` must be
    /// the hashing contract's result for `key`.
    pub(crate) fn new(key: Rc<K>, hash: u64, value: Rc<V>, next: Option<NodeKey>) -> Self {
        Self {
            key,
            hash,
            value,
            next,
        }
    }

    /// Release this node's key and value shares. Does not touch `next`; the
    /// rest of the chain is the dictionary's business.
    ///
    /// Call only once the node is out of the chain: dropping the last share
    /// of either object runs its destructor.
    pub(crate) fn destroy(self) {
        let Node { key, value, .. } = self;
        drop(key);
        drop(value);
    }
}
