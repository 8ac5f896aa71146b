//! Pending requests on the content side: correlation index → input element.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::dom::FileInput;
use crate::protocol::RequestIndex;

/// Tracks which input each in-flight request belongs to.
///
/// Indices start at 1 and only grow, so an index is never handed out twice
/// for the lifetime of the registry. Inputs are held weakly: a registry
/// entry never keeps a detached element alive.
pub struct RequestRegistry {
    next_index: RequestIndex,
    pending: HashMap<RequestIndex, Weak<dyn FileInput>>,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self {
            next_index: 1,
            pending: HashMap::new(),
        }
    }
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next index to `input` and record it as pending.
    pub fn register(&mut self, input: &Arc<dyn FileInput>) -> RequestIndex {
        let index = self.next_index;
        self.next_index += 1;
        self.pending.insert(index, Arc::downgrade(input));
        index
    }

    /// Remove the entry for `index` and return its input if it is still alive.
    pub fn take(&mut self, index: RequestIndex) -> Option<Arc<dyn FileInput>> {
        self.pending.remove(&index)?.upgrade()
    }

    pub fn is_pending(&self, index: RequestIndex) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop entries whose input element no longer exists. Cancelled requests
    /// never get a reply, so this is the only way their entries go away.
    pub fn prune_detached(&mut self) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, input| input.strong_count() > 0);
        before - self.pending.len()
    }
}
