//! Sibling list - an ordered container with O(1) handle-based mutation
//!
//! Nodes live in a slot arena owned by the list. A [`Handle`] addresses one
//! node and carries the slot generation it was issued for, so a handle to a
//! deleted node is detected instead of aliasing whatever reuses the slot.
//!
//! Invariants:
//! - `head.prev` and `tail.next` are `None`
//! - `len` equals the number of nodes reachable forward from `head`
//! - the links are acyclic and `prev`/`next` agree pairwise

use crate::errors::{BlockDocError, Result};

/// Stable reference to one node of a [`List`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index inside the owning list
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued for
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn stale(&self) -> BlockDocError {
        BlockDocError::StaleListHandle {
            index: self.index,
            generation: self.generation,
        }
    }
}

/// A payload plus its neighbour links
#[derive(Debug, Clone)]
pub struct ListNode<T> {
    value: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

impl<T> ListNode<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn prev(&self) -> Option<Handle> {
        self.prev
    }

    pub fn next(&self) -> Option<Handle> {
        self.next
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<ListNode<T>>,
}

/// Doubly linked list with arena-backed nodes
#[derive(Debug, Clone)]
pub struct List<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Create a list holding a single value
    pub fn with_value(value: T) -> (Self, Handle) {
        let mut list = Self::new();
        let handle = list.insert_at_tail(value);
        (list, handle)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    /// Check whether `handle` refers to a live node of this list
    pub fn contains(&self, handle: Handle) -> bool {
        self.node(handle).is_some()
    }

    /// Look up the node behind a handle
    pub fn node(&self, handle: Handle) -> Option<&ListNode<T>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut ListNode<T>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.node(handle).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.node_mut(handle).map(|node| &mut node.value)
    }

    /// Handle of the node after `handle`, if any
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.next)
    }

    /// Handle of the node before `handle`, if any
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.prev)
    }

    fn check(&self, handle: Handle) -> Result<()> {
        if self.contains(handle) {
            Ok(())
        } else {
            Err(handle.stale())
        }
    }

    fn allocate(&mut self, value: T) -> Handle {
        let node = ListNode {
            value,
            prev: None,
            next: None,
        };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(node.value)
    }

    fn set_prev(&mut self, handle: Handle, prev: Option<Handle>) {
        if let Some(node) = self.node_mut(handle) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, handle: Handle, next: Option<Handle>) {
        if let Some(node) = self.node_mut(handle) {
            node.next = next;
        }
    }

    /// Detach a live node from its neighbours, patching head/tail.
    /// The node stays allocated and `len` is untouched.
    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = match self.node(handle) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        self.set_prev(handle, None);
        self.set_next(handle, None);
    }

    /// Link a detached node between `prev` and `next`, which must be adjacent
    /// (or boundaries).
    fn link_between(&mut self, handle: Handle, prev: Option<Handle>, next: Option<Handle>) {
        self.set_prev(handle, prev);
        self.set_next(handle, next);

        match prev {
            Some(p) => self.set_next(p, Some(handle)),
            None => self.head = Some(handle),
        }
        match next {
            Some(n) => self.set_prev(n, Some(handle)),
            None => self.tail = Some(handle),
        }
    }

    pub fn insert_at_head(&mut self, value: T) -> Handle {
        let handle = self.allocate(value);
        let head = self.head;
        self.link_between(handle, None, head);
        self.len += 1;
        handle
    }

    pub fn insert_at_tail(&mut self, value: T) -> Handle {
        let handle = self.allocate(value);
        let tail = self.tail;
        self.link_between(handle, tail, None);
        self.len += 1;
        handle
    }

    /// Insert `value` immediately before `reference`
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if `reference` is not a live node of this list.
    pub fn insert_before(&mut self, reference: Handle, value: T) -> Result<Handle> {
        self.check(reference)?;
        let prev = self.prev(reference);
        let handle = self.allocate(value);
        self.link_between(handle, prev, Some(reference));
        self.len += 1;
        Ok(handle)
    }

    /// Insert `value` immediately after `reference`
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if `reference` is not a live node of this list.
    pub fn insert_after(&mut self, reference: Handle, value: T) -> Result<Handle> {
        self.check(reference)?;
        let next = self.next(reference);
        let handle = self.allocate(value);
        self.link_between(handle, Some(reference), next);
        self.len += 1;
        Ok(handle)
    }

    /// Remove a node and return its payload
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if `handle` is not a live node of this list.
    pub fn delete(&mut self, handle: Handle) -> Result<T> {
        self.check(handle)?;
        self.unlink(handle);
        let value = self.release(handle).ok_or_else(|| handle.stale())?;
        self.len -= 1;
        Ok(value)
    }

    /// Exchange the positions of two nodes without moving their payloads
    ///
    /// Both handles stay valid and keep pointing at the same payloads.
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if either handle is not a live node of this list.
    pub fn swap(&mut self, a: Handle, b: Handle) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Ok(());
        }

        // Two relinks cover the adjacent cases too: when `b` directly follows
        // `a` the anchor is `b` itself and the second move is a no-op.
        let anchor = self.next(a);
        self.move_after(a, b)?;
        match anchor {
            Some(anchor) => self.move_before(b, anchor)?,
            None => {
                self.unlink(b);
                let tail = self.tail;
                self.link_between(b, tail, None);
            }
        }
        Ok(())
    }

    /// Relink `node` directly before `location`; no-op when they are the same
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if either handle is not a live node of this list.
    pub fn move_before(&mut self, node: Handle, location: Handle) -> Result<()> {
        self.check(node)?;
        self.check(location)?;
        if node == location {
            return Ok(());
        }

        self.unlink(node);
        let prev = self.prev(location);
        self.link_between(node, prev, Some(location));
        Ok(())
    }

    /// Relink `node` directly after `location`; no-op when they are the same
    ///
    /// # Errors
    ///
    /// Returns `StaleListHandle` if either handle is not a live node of this list.
    pub fn move_after(&mut self, node: Handle, location: Handle) -> Result<()> {
        self.check(node)?;
        self.check(location)?;
        if node == location {
            return Ok(());
        }

        self.unlink(node);
        let next = self.next(location);
        self.link_between(node, Some(location), next);
        Ok(())
    }

    /// Reverse the list in place, O(n)
    pub fn reverse(&mut self) {
        let mut current = self.head;
        while let Some(handle) = current {
            match self.node_mut(handle) {
                Some(node) => {
                    std::mem::swap(&mut node.prev, &mut node.next);
                    // after the flip, the old `next` lives in `prev`
                    current = node.prev;
                }
                None => break,
            }
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    /// Drop every node. All previously issued handles become stale.
    ///
    /// O(capacity): each occupied slot is visited once so its payload drops
    /// now and its generation moves past every outstanding handle.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Forward iterator over payloads
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            handles: self.handles(),
        }
    }

    /// Forward iterator over node handles
    pub fn handles(&self) -> Handles<'_, T> {
        Handles {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for value in iter {
            list.insert_at_tail(value);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the handles of a [`List`], head to tail
pub struct Handles<'a, T> {
    list: &'a List<T>,
    next: Option<Handle>,
    remaining: usize,
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        // `remaining` bounds the walk even if links were ever corrupted
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.next = self.list.next(current);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Iterator over the payloads of a [`List`], head to tail
pub struct Iter<'a, T> {
    list: &'a List<T>,
    handles: Handles<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.handles.next()?;
        self.list.get(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}
