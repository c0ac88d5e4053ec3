//! Construction-time settings for [`ChainDict`](crate::ChainDict).

/// Sizing knobs for the node arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChainConfig {
    /// Upper bound on live nodes. Inserting a new key past this bound fails
    /// with [`DictError::AllocationFailure`](crate::DictError::AllocationFailure).
    pub max_nodes: usize,
    /// Node slots reserved up front.
    pub initial_capacity: usize,
}

impl ChainConfig {
    /// Most nodes the arena can index. Slot 0 is reserved by the arena, so
    /// one 32-bit index is never handed out.
    pub const ARENA_CAPACITY: usize = u32::MAX as usize - 1;

    pub const DEFAULT_MAX_NODES: usize = Self::ARENA_CAPACITY;

    /// Node bound actually enforced: `max_nodes`, capped at
    /// [`ARENA_CAPACITY`](Self::ARENA_CAPACITY).
    pub fn effective_max_nodes(&self) -> usize {
        self.max_nodes.min(Self::ARENA_CAPACITY)
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_nodes: Self::DEFAULT_MAX_NODES,
            initial_capacity: 0,
        }
    }
}
