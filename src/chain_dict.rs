//! ChainDict: sequential-search dictionary over a singly linked chain of nodes.

use crate::config::ChainConfig;
use crate::error::DictError;
use crate::hashing::{KeyHasher, StdKeyHasher, Unhashable};
use crate::node::{Node, NodeKey};
use crate::reentrancy::DebugReentrancy;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use log::{debug, trace};
use slotmap::SlotMap;
use std::rc::Rc;

/// Dictionary of shared keys to shared values, stored as a chain of nodes
/// searched front to back.
///
/// Entries are identified by the cached hash of their key alone: two keys
/// with the same hash are the same entry. New entries go to the front, so
/// iteration yields the most recently inserted entry first.
pub struct ChainDict<K: ?Sized, V: ?Sized, H = StdKeyHasher> {
    hasher: H,
    head: Option<NodeKey>,
    size: usize,
    pub(crate) nodes: SlotMap<NodeKey, Node<K, V>>,
    max_nodes: usize,
    initial_capacity: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainDict<K, V>
where
    K: ?Sized + Hash,
    V: ?Sized,
{
    pub fn new() -> Self {
        Self::with_hasher(StdKeyHasher::default())
    }
}

impl<K, V> Default for ChainDict<K, V>
where
    K: ?Sized + Hash,
    V: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized, V: ?Sized, H> ChainDict<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_config(ChainConfig::default(), hasher)
    }

    pub fn with_config(config: ChainConfig, hasher: H) -> Self {
        Self {
            hasher,
            head: None,
            size: 0,
            nodes: SlotMap::with_capacity_and_key(config.initial_capacity),
            max_nodes: config.effective_max_nodes(),
            initial_capacity: config.initial_capacity,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of entries. O(1).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The hashing contract this dictionary was built with.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Entries in chain order, most recently inserted first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
            remaining: self.size,
        }
    }

    /// Drop every entry, releasing each key and value share exactly once.
    ///
    /// The whole chain is detached before the first share is released, so
    /// destructors of stored objects only ever see an empty dictionary. The
    /// arena is rebuilt with the configured initial capacity.
    pub fn clear(&mut self) {
        let fresh = SlotMap::with_capacity_and_key(self.initial_capacity);
        self.release_all(fresh);
    }

    fn release_all(&mut self, fresh: SlotMap<NodeKey, Node<K, V>>) {
        let (mut detached, mut cur) = {
            let _g = self.reentrancy.enter("clear");
            self.size = 0;
            (core::mem::replace(&mut self.nodes, fresh), self.head.take())
        };

        let mut released = 0usize;
        while let Some(at) = cur {
            let Some(node) = detached.remove(at) else {
                break;
            };
            cur = node.next;
            node.destroy();
            released += 1;
        }
        debug_assert!(detached.is_empty(), "nodes unreachable from head");
        if released > 0 {
            debug!("chain dict: released {released} nodes");
        }
    }

    fn find(&self, hash: u64) -> Option<NodeKey> {
        let mut cur = self.head;
        while let Some(at) = cur {
            let node = &self.nodes[at];
            if node.hash == hash {
                return Some(at);
            }
            cur = node.next;
        }
        None
    }
}

impl<K, V, H> ChainDict<K, V, H>
where
    K: ?Sized,
    V: ?Sized,
    H: KeyHasher<K>,
{
    fn hash_of(&self, key: &Rc<K>) -> Result<u64, DictError<K>> {
        self.hasher.hash_key(&**key).map_err(|Unhashable| {
            debug!("chain dict: unhashable key");
            DictError::Unhashable(Rc::clone(key))
        })
    }

    /// A new share of the value stored under `key`.
    pub fn get(&self, key: &Rc<K>) -> Result<Rc<V>, DictError<K>> {
        let _g = self.reentrancy.enter("get");
        let hash = self.hash_of(key)?;
        match self.find(hash) {
            Some(at) => Ok(Rc::clone(&self.nodes[at].value)),
            None => {
                debug!("chain dict: get missed hash {hash:#018x}");
                Err(DictError::KeyNotFound(Rc::clone(key)))
            }
        }
    }

    pub fn contains(&self, key: &Rc<K>) -> Result<bool, DictError<K>> {
        let _g = self.reentrancy.enter("contains");
        let hash = self.hash_of(key)?;
        Ok(self.find(hash).is_some())
    }

    /// Insert or overwrite. Takes ownership of both shares.
    ///
    /// On overwrite the stored key stays; `key` and the previous value are
    /// released after the new value is in place. On failure the dictionary
    /// is unchanged and `value` is released.
    pub fn set(&mut self, key: Rc<K>, value: Rc<V>) -> Result<(), DictError<K>> {
        if let Some(displaced) = self.store(key, value)? {
            let (unused_key, old_value) = displaced;
            drop(unused_key);
            drop(old_value);
        }
        Ok(())
    }

    /// Remove the entry whose cached hash matches `key`'s hash.
    pub fn delete(&mut self, key: &Rc<K>) -> Result<(), DictError<K>> {
        let node = self.unlink(key)?;
        node.destroy();
        Ok(())
    }

    /// Assign-subscript: `Some(value)` sets, `None` deletes.
    pub fn assign(&mut self, key: Rc<K>, value: Option<Rc<V>>) -> Result<(), DictError<K>> {
        match value {
            Some(value) => self.set(key, value),
            None => self.delete(&key),
        }
    }

    // Returns the shares displaced by an overwrite so the caller releases
    // them outside the guard.
    fn store(
        &mut self,
        key: Rc<K>,
        value: Rc<V>,
    ) -> Result<Option<(Rc<K>, Rc<V>)>, DictError<K>> {
        let _g = self.reentrancy.enter("set");
        let hash = match self.hasher.hash_key(&*key) {
            Ok(hash) => hash,
            Err(Unhashable) => {
                debug!("chain dict: unhashable key");
                return Err(DictError::Unhashable(key));
            }
        };

        if let Some(at) = self.find(hash) {
            let old = core::mem::replace(&mut self.nodes[at].value, value);
            trace!("chain dict: overwrote value at hash {hash:#018x}");
            return Ok(Some((key, old)));
        }

        if self.size >= self.max_nodes {
            debug!(
                "chain dict: node limit {} reached, refusing insert",
                self.max_nodes
            );
            return Err(DictError::AllocationFailure {
                limit: self.max_nodes,
            });
        }

        let at = self.nodes.insert(Node::new(key, hash, value, self.head));
        self.head = Some(at);
        self.size += 1;
        trace!(
            "chain dict: pushed node at hash {hash:#018x}, len {}",
            self.size
        );
        Ok(None)
    }

    fn unlink(&mut self, key: &Rc<K>) -> Result<Node<K, V>, DictError<K>> {
        let _g = self.reentrancy.enter("delete");
        let hash = self.hash_of(key)?;
        let not_found = || {
            debug!("chain dict: delete missed hash {hash:#018x}");
            DictError::KeyNotFound(Rc::clone(key))
        };

        let Some(head) = self.head else {
            return Err(not_found());
        };

        if self.nodes[head].hash == hash {
            let node = self
                .nodes
                .remove(head)
                .expect("head must refer to a live node");
            match node.next {
                Some(next) => {
                    self.head = Some(next);
                    self.size -= 1;
                }
                None => {
                    // Last node: the count can only have been 1.
                    self.head = None;
                    self.size = 0;
                }
            }
            trace!("chain dict: unlinked head at hash {hash:#018x}");
            return Ok(node);
        }

        let mut before = head;
        let mut cur = self.nodes[head].next;
        while let Some(at) = cur {
            let next = self.nodes[at].next;
            if self.nodes[at].hash == hash {
                self.nodes[before].next = next;
                let node = self
                    .nodes
                    .remove(at)
                    .expect("linked node must be live");
                self.size -= 1;
                trace!("chain dict: unlinked node at hash {hash:#018x}");
                return Ok(node);
            }
            before = at;
            cur = next;
        }

        Err(not_found())
    }
}

impl<K: ?Sized, V: ?Sized, H> Drop for ChainDict<K, V, H> {
    fn drop(&mut self) {
        debug_assert_eq!(self.reentrancy.running(), None);
        self.release_all(SlotMap::with_key());
    }
}

impl<K, V, H> fmt::Debug for ChainDict<K, V, H>
where
    K: ?Sized + fmt::Debug,
    V: ?Sized + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `ChainDict` entries, most recently inserted first.
pub struct Iter<'a, K: ?Sized, V: ?Sized> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    cur: Option<NodeKey>,
    remaining: usize,
}

impl<'a, K: ?Sized, V: ?Sized> Iterator for Iter<'a, K, V> {
    type Item = (&'a Rc<K>, &'a Rc<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.cur?];
        self.cur = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: ?Sized, V: ?Sized> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: ?Sized, V: ?Sized> FusedIterator for Iter<'_, K, V> {}

impl<'a, K: ?Sized, V: ?Sized, H> IntoIterator for &'a ChainDict<K, V, H> {
    type Item = (&'a Rc<K>, &'a Rc<V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
