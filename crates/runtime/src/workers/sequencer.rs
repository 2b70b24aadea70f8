//! Ordered fan-in over unordered decode completions.

use std::collections::BTreeMap;

use pack_core::ContentDescriptor;

/// Buffers decode results by resolved position and releases them strictly in
/// order.
///
/// Decode tasks finish in whatever order the pool schedules them; the merge
/// step must observe the resolver's order exactly, or duplicate-id and
/// dangling-reference errors stop being reproducible. `accept` returns the
/// run of batches that became mergeable, which is empty until the next
/// expected position arrives.
#[derive(Debug)]
pub struct MergeSequencer {
    next: usize,
    total: usize,
    buffered: BTreeMap<usize, Vec<ContentDescriptor>>,
}

impl MergeSequencer {
    pub fn new(total: usize) -> Self {
        Self {
            next: 0,
            total,
            buffered: BTreeMap::new(),
        }
    }

    /// Accepts one completed decode and returns every batch now ready to
    /// merge, in position order.
    pub fn accept(
        &mut self,
        position: usize,
        batch: Vec<ContentDescriptor>,
    ) -> Vec<(usize, Vec<ContentDescriptor>)> {
        debug_assert!(position < self.total);
        self.buffered.insert(position, batch);

        let mut ready = Vec::new();
        while let Some(batch) = self.buffered.remove(&self.next) {
            ready.push((self.next, batch));
            self.next += 1;
        }
        ready
    }

    /// True once every position has been accepted and released.
    pub fn is_drained(&self) -> bool {
        self.next == self.total && self.buffered.is_empty()
    }
}
