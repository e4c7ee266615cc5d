//! Slot Arena Module
//!
//! Dense storage for records addressed by generation-checked handles.
//! Every ordering structure in the crate (recency list, frequency buckets,
//! expiry heap) links its nodes through these handles instead of pointers.

// == Handle ==
/// Opaque reference to a slot in an [`Arena`].
///
/// A handle stops resolving as soon as its slot is freed, even if the slot is
/// later reused for another value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

// == Arena ==
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots, reused LIFO
    free: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    // == Constructor ==
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    // == Insert ==
    /// Stores a value and returns the handle addressing it.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    // == Get ==
    /// Returns the value behind a live handle, `None` for stale handles.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    // == Remove ==
    /// Frees the slot behind `handle` and returns its value.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    // == Clear ==
    /// Drops every value and invalidates all outstanding handles.
    ///
    /// Allocated slots are kept for reuse.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free = (0..self.slots.len()).rev().collect();
        self.len = 0;
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
