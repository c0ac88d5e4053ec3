//! chain-dict: a single-threaded dictionary of reference-counted keys and
//! values, stored as a singly linked chain and searched sequentially.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container whose node lifecycle and share
//!   ownership are explicit and easy to audit, rather than a fast one.
//! - Layers:
//!   - `Node`: one slot holding a key share, a value share, the key's cached
//!     hash and the arena index of the next node.
//!   - `ChainDict<K, V, H>`: owns the head of the chain, the node arena and
//!     the element count; exposes get/set/delete/contains/len.
//!   - `KeyHasher<K>`: the fallible hashing contract of the embedding
//!     environment. `StdKeyHasher` covers every `K: Hash`.
//!
//! Identity
//! - Entries are matched by cached hash only. There is no key equality check
//!   after a hash match, so keys whose hashes collide address the same entry.
//!   Supply a collision-free `KeyHasher` if distinct keys must stay distinct.
//!
//! Ownership
//! - Keys and values are `Rc` shares. `set` consumes the caller's shares;
//!   `get` hands out a new value share; errors that name a key carry a share
//!   of it.
//! - Overwrite stores the new value before the old one is released. Removal
//!   unlinks a node before releasing its shares. Teardown detaches the whole
//!   chain first. A destructor run by a released share therefore never sees
//!   a half-updated chain.
//!
//! Storage
//! - Nodes live in a `slotmap::SlotMap`; `head`/`next` are arena indices.
//!   The arena recycles freed slots and teardown is a loop, not recursion.
//! - New nodes are pushed at the head: iteration is most recent first.
//! - `ChainConfig::max_nodes` bounds the arena. Inserting past it fails with
//!   `DictError::AllocationFailure` and changes nothing.
//!
//! Constraints and non-goals
//! - Single-threaded: `!Send`/`!Sync` through `Rc`.
//! - O(n) lookups by design; no buckets, resizing or rehashing.
//! - Debug builds detect nested entry into the same dictionary (for example
//!   from a `KeyHasher` that calls back into it) and panic.

mod chain_dict;
mod chain_dict_proptest;
mod config;
mod error;
mod hashing;
mod node;
mod reentrancy;

// Public surface
pub use chain_dict::{ChainDict, Iter};
pub use config::ChainConfig;
pub use error::DictError;
pub use hashing::{KeyHasher, StdKeyHasher, Unhashable};
