//! Linked List Module
//!
//! Intrusive doubly-linked list whose nodes live in an [`Arena`] and are
//! chained through [`Handle`]s. Splicing is O(1) in every direction.

use crate::cache::arena::{Arena, Handle};

// == Links ==
/// Neighbour handles embedded in every list node.
#[derive(Debug, Default, Clone, Copy)]
pub struct Links {
    pub prev: Option<Handle>,
    pub next: Option<Handle>,
}

/// Implemented by arena values that can be threaded onto a [`List`].
pub trait Linked {
    fn links(&self) -> &Links;
    fn links_mut(&mut self) -> &mut Links;
}

fn links_mut<T: Linked>(arena: &mut Arena<T>, handle: Handle) -> Option<&mut Links> {
    arena.get_mut(handle).map(|node| node.links_mut())
}

// == List ==
/// Head/tail bookkeeping for one sequence of linked nodes.
///
/// A node must belong to at most one list at a time.
#[derive(Debug, Default)]
pub struct List {
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    pub fn push_front<T: Linked>(&mut self, arena: &mut Arena<T>, handle: Handle) {
        let old_head = self.head;
        match links_mut(arena, handle) {
            Some(links) => {
                *links = Links {
                    prev: None,
                    next: old_head,
                }
            }
            None => return,
        }

        match old_head.and_then(|head| links_mut(arena, head)) {
            Some(head_links) => head_links.prev = Some(handle),
            None => self.tail = Some(handle),
        }

        self.head = Some(handle);
        self.len += 1;
    }

    // == Insert After ==
    /// Places `handle` directly behind `anchor`, which must be in this list.
    pub fn insert_after<T: Linked>(&mut self, arena: &mut Arena<T>, anchor: Handle, handle: Handle) {
        let next = match arena.get(anchor) {
            Some(node) => node.links().next,
            None => return,
        };
        match links_mut(arena, handle) {
            Some(links) => {
                *links = Links {
                    prev: Some(anchor),
                    next,
                }
            }
            None => return,
        }

        if let Some(anchor_links) = links_mut(arena, anchor) {
            anchor_links.next = Some(handle);
        }
        match next.and_then(|next| links_mut(arena, next)) {
            Some(next_links) => next_links.prev = Some(handle),
            None => self.tail = Some(handle),
        }

        self.len += 1;
    }

    // == Unlink ==
    /// Detaches `handle` from the list. The node itself stays in the arena.
    pub fn unlink<T: Linked>(&mut self, arena: &mut Arena<T>, handle: Handle) {
        let Links { prev, next } = match links_mut(arena, handle) {
            Some(links) => std::mem::take(links),
            None => return,
        };

        match prev.and_then(|prev| links_mut(arena, prev)) {
            Some(prev_links) => prev_links.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| links_mut(arena, next)) {
            Some(next_links) => next_links.prev = prev,
            None => self.tail = prev,
        }

        self.len -= 1;
    }

    // == Accessors ==
    pub fn front(&self) -> Option<Handle> {
        self.head
    }

    pub fn back(&self) -> Option<Handle> {
        self.tail
    }

    /// Successor of `handle` in this list.
    pub fn next<T: Linked>(&self, arena: &Arena<T>, handle: Handle) -> Option<Handle> {
        arena.get(handle).and_then(|node| node.links().next)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
