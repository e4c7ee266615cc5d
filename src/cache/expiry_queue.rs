//! Expiry Queue Module
//!
//! Indexed binary min-heap ordered by absolute expiry time. Each element
//! remembers its heap position, so arbitrary removal and rescheduling by
//! handle stay O(log n) while peeking the next expiry is O(1).

use std::time::Instant;

use crate::cache::arena::{Arena, Handle};

#[derive(Debug)]
struct Node<T> {
    value: T,
    /// Current index into `ExpiryQueue::heap`
    position: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    expire_at: Instant,
    /// Breaks ties between equal deadlines, earlier scheduling first
    sequence: u64,
    handle: Handle,
}

impl Slot {
    fn precedes(&self, other: &Slot) -> bool {
        (self.expire_at, self.sequence) < (other.expire_at, other.sequence)
    }
}

// == Expiry Queue ==
#[derive(Debug)]
pub struct ExpiryQueue<T> {
    nodes: Arena<Node<T>>,
    heap: Vec<Slot>,
    sequence: u64,
}

impl<T> ExpiryQueue<T> {
    // == Constructor ==
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            sequence: 0,
        }
    }

    // == Push ==
    /// Schedules `value` to expire at `expire_at`.
    pub fn push(&mut self, value: T, expire_at: Instant) -> Handle {
        let position = self.heap.len();
        let handle = self.nodes.insert(Node { value, position });
        let sequence = self.next_sequence();

        self.heap.push(Slot {
            expire_at,
            sequence,
            handle,
        });
        self.sift_up(position);
        handle
    }

    // == Peek ==
    /// Handle and deadline of the element closest to expiry.
    pub fn peek(&self) -> Option<(Handle, Instant)> {
        self.heap.first().map(|slot| (slot.handle, slot.expire_at))
    }

    // == Accessors ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes.get(handle).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes.get_mut(handle).map(|node| &mut node.value)
    }

    pub fn expire_at(&self, handle: Handle) -> Option<Instant> {
        let node = self.nodes.get(handle)?;
        Some(self.heap[node.position].expire_at)
    }

    // == Reschedule ==
    /// Moves an element to a new deadline, earlier or later.
    ///
    /// Returns `false` if the handle is stale.
    pub fn reschedule(&mut self, handle: Handle, expire_at: Instant) -> bool {
        let Some(position) = self.nodes.get(handle).map(|node| node.position) else {
            return false;
        };
        let sequence = self.next_sequence();

        let slot = &mut self.heap[position];
        slot.expire_at = expire_at;
        slot.sequence = sequence;
        self.restore(position);
        true
    }

    // == Remove ==
    /// Takes an arbitrary element out of the queue.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let position = self.nodes.get(handle)?.position;
        let last = self.heap.len() - 1;

        self.swap(position, last);
        self.heap.pop();
        if position < self.heap.len() {
            self.restore(position);
        }

        self.nodes.remove(handle).map(|node| node.value)
    }

    // == Pop Expired ==
    /// Removes and returns the nearest element if its deadline is at or before `now`.
    pub fn pop_expired(&mut self, now: Instant) -> Option<T> {
        let (handle, expire_at) = self.peek()?;
        if expire_at > now {
            return None;
        }
        self.remove(handle)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.heap.clear();
    }

    // == Heap Maintenance ==
    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        for position in [a, b] {
            let handle = self.heap[position].handle;
            if let Some(node) = self.nodes.get_mut(handle) {
                node.position = position;
            }
        }
    }

    /// Re-establishes heap order around a slot whose key changed.
    fn restore(&mut self, position: usize) {
        let position = self.sift_up(position);
        self.sift_down(position);
    }

    fn sift_up(&mut self, mut position: usize) -> usize {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.heap[position].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
        position
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut first = position;

            if left < len && self.heap[left].precedes(&self.heap[first]) {
                first = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[first]) {
                first = right;
            }
            if first == position {
                break;
            }
            self.swap(position, first);
            position = first;
        }
    }

    /// Panics unless every node's recorded position points back at its own
    /// slot and every parent precedes its children.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (position, slot) in self.heap.iter().enumerate() {
            let node = self.nodes.get(slot.handle).expect("live handle");
            assert_eq!(node.position, position);
            if position > 0 {
                let parent = &self.heap[(position - 1) / 2];
                assert!(!slot.precedes(parent));
            }
        }
        assert_eq!(self.nodes.len(), self.heap.len());
    }
}
