use crate::{error::QueueError, types::NodeId};
use std::cmp::Ordering;

/// A min-priority queue over node ids with in-place key decrease.
///
/// Internally this is a binary heap of node ids plus a position table, so
/// that [`MinQueue::decrease_key`] can find a queued node in O(1) and sift
/// it up in O(log n).
///
/// Keys may only ever decrease while a node is queued, which is all a
/// relaxation-based shortest path pass needs.
///
/// Equal keys leave the queue in FIFO order: every entry carries the
/// sequence number of its first [`MinQueue::enqueue`], and a decrease
/// keeps that number.
#[derive(Debug)]
pub struct MinQueue {
    /// Heap-ordered node ids.
    heap: Vec<NodeId>,
    /// `pos[id]` is the heap slot of `id`, or `None` if not queued.
    pos: Vec<Option<usize>>,
    /// `keys[id]` is `(key, insertion sequence)`.
    keys: Vec<(f32, u64)>,
    next_seq: u64,
}

impl MinQueue {
    /// Creates an empty queue able to hold node ids `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            pos: vec![None; capacity],
            keys: vec![(f32::INFINITY, 0); capacity],
            next_seq: 0,
        }
    }

    /// Inserts `id` with priority `key`.
    ///
    /// ### Panics
    /// Panics if `id` is not below the capacity given at construction.
    pub fn enqueue(&mut self, id: NodeId, key: f32) -> Result<(), QueueError> {
        if self.pos[id].is_some() {
            return Err(QueueError::AlreadyQueued(id));
        }
        self.keys[id] = (key, self.next_seq);
        self.next_seq += 1;

        let slot = self.heap.len();
        self.heap.push(id);
        self.pos[id] = Some(slot);
        self.sift_up(slot);
        Ok(())
    }

    /// Lowers the key of a queued node and moves it towards the front.
    pub fn decrease_key(&mut self, id: NodeId, key: f32) -> Result<(), QueueError> {
        let slot = self.pos[id].ok_or(QueueError::NotQueued(id))?;
        let old = self.keys[id].0;
        if key > old {
            return Err(QueueError::KeyIncreased { node: id, old, new: key });
        }
        self.keys[id].0 = key;
        self.sift_up(slot);
        Ok(())
    }

    /// Removes and returns the node with the smallest key, with that key.
    pub fn dequeue_min(&mut self) -> Result<(NodeId, f32), QueueError> {
        let last = self.heap.pop().ok_or(QueueError::Empty)?;
        let top = if self.heap.is_empty() {
            last
        } else {
            let top = std::mem::replace(&mut self.heap[0], last);
            self.pos[last] = Some(0);
            self.sift_down(0);
            top
        };
        self.pos[top] = None;
        Ok((top, self.keys[top].0))
    }

    /// Smallest queued key, if any.
    pub fn peek_key(&self) -> Option<f32> {
        self.heap.first().map(|&id| self.keys[id].0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.pos.get(id).is_some_and(|p| p.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        let (ka, sa) = self.keys[a];
        let (kb, sb) = self.keys[b];
        match ka.total_cmp(&kb) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => sa < sb,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i]] = Some(i);
        self.pos[self.heap[j]] = Some(j);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(self.heap[slot], self.heap[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < n && self.less(self.heap[left], self.heap[smallest]) {
                smallest = left;
            }
            if right < n && self.less(self.heap[right], self.heap[smallest]) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut MinQueue) -> Vec<NodeId> {
        let mut out = Vec::new();
        while !q.is_empty() {
            out.push(q.dequeue_min().unwrap().0);
        }
        out
    }

    #[test]
    fn dequeues_in_ascending_key_order() {
        let mut q = MinQueue::with_capacity(5);
        q.enqueue(0, 3.0).unwrap();
        q.enqueue(1, 1.0).unwrap();
        q.enqueue(2, 4.0).unwrap();
        q.enqueue(3, 0.5).unwrap();
        q.enqueue(4, 2.0).unwrap();

        assert_eq!(q.len(), 5);
        assert_eq!(q.peek_key(), Some(0.5));
        assert_eq!(drain(&mut q), vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn infinite_keys_sort_last() {
        let mut q = MinQueue::with_capacity(3);
        q.enqueue(0, f32::INFINITY).unwrap();
        q.enqueue(1, 7.0).unwrap();
        q.enqueue(2, f32::INFINITY).unwrap();

        assert_eq!(drain(&mut q), vec![1, 0, 2]);
    }

    #[test]
    fn equal_keys_come_out_fifo() {
        let mut q = MinQueue::with_capacity(4);
        for id in [2, 0, 3, 1] {
            q.enqueue(id, 1.0).unwrap();
        }
        assert_eq!(drain(&mut q), vec![2, 0, 3, 1]);
    }

    #[test]
    fn decrease_key_moves_node_forward() {
        let mut q = MinQueue::with_capacity(4);
        for id in 0..4 {
            q.enqueue(id, f32::INFINITY).unwrap();
        }
        q.decrease_key(3, 2.0).unwrap();
        q.decrease_key(1, 5.0).unwrap();
        q.decrease_key(1, 1.0).unwrap();

        assert_eq!(q.dequeue_min().unwrap(), (1, 1.0));
        assert_eq!(q.dequeue_min().unwrap(), (3, 2.0));
        // Remaining infinite keys keep their insertion order.
        assert_eq!(drain(&mut q), vec![0, 2]);
    }

    #[test]
    fn decreased_key_keeps_fifo_position_among_equals() {
        let mut q = MinQueue::with_capacity(3);
        q.enqueue(0, 1.0).unwrap();
        q.enqueue(1, 1.0).unwrap();
        q.enqueue(2, 9.0).unwrap();

        // Node 2 was enqueued last, so it loses ties with 0 and 1.
        q.decrease_key(2, 1.0).unwrap();
        assert_eq!(drain(&mut q), vec![0, 1, 2]);
    }

    #[test]
    fn dequeue_on_empty_queue_fails() {
        let mut q = MinQueue::with_capacity(1);
        assert_eq!(q.dequeue_min(), Err(QueueError::Empty));

        q.enqueue(0, 1.0).unwrap();
        q.dequeue_min().unwrap();
        assert_eq!(q.dequeue_min(), Err(QueueError::Empty));
        assert!(q.is_empty());
    }

    #[test]
    fn misuse_is_reported() {
        let mut q = MinQueue::with_capacity(2);
        q.enqueue(0, 1.0).unwrap();

        assert_eq!(q.enqueue(0, 2.0), Err(QueueError::AlreadyQueued(0)));
        assert_eq!(q.decrease_key(1, 0.0), Err(QueueError::NotQueued(1)));
        assert_eq!(
            q.decrease_key(0, 3.0),
            Err(QueueError::KeyIncreased {
                node: 0,
                old: 1.0,
                new: 3.0
            })
        );

        // A dequeued node is no longer queued.
        q.dequeue_min().unwrap();
        assert!(!q.contains(0));
        assert_eq!(q.decrease_key(0, 0.0), Err(QueueError::NotQueued(0)));
    }

    #[test]
    #[should_panic]
    fn enqueue_beyond_capacity_panics() {
        let mut q = MinQueue::with_capacity(1);
        let _ = q.enqueue(1, 0.0);
    }
}
