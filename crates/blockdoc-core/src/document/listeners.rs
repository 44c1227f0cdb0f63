//! Change listeners
//!
//! Listeners are plain callbacks keyed by a generated [`ListenerId`]. They
//! receive the affected block id, its own checksum and its compound
//! checksum, in registration order.

use blockdoc_core_types::{BlockId, ListenerId};

/// Callback invoked after every successful mutating document operation
pub type Listener = Box<dyn FnMut(&BlockId, &str, &str)>;

/// Ordered listener registry
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<(ListenerId, Listener)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.entries.push((id.clone(), listener));
        id
    }

    /// Unregister a listener, returning whether it was present
    pub fn remove(&mut self, id: &ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify(&mut self, block_id: &BlockId, crc: &str, compound_crc: &str) {
        for (_, listener) in self.entries.iter_mut() {
            listener(block_id, crc, compound_crc);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}
