//! Arena-backed doubly-linked record list
//!
//! Nodes live in a contiguous slot vector and link to their neighbours by
//! slot index, so the list has no reference cycles and no unsafe code.
//! Freed slots are reused by later insertions.

use std::fmt;

use crate::error::{TallyError, TallyResult};

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An unbounded ordered container with positional access
///
/// Invariants:
/// - `len` equals the number of nodes reachable from `head` to `tail`
/// - the head node has no `prev` and the tail node has no `next`
/// - `head == tail` for a one-element list, both `None` when empty
#[derive(Clone)]
pub struct RecordList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordList<T> {
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

    /// Number of records in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a record before the current head
    pub fn push_front(&mut self, value: T) {
        let slot = self.alloc(Node {
            value,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
    }

    /// Insert a record after the current tail
    pub fn push_back(&mut self, value: T) {
        let slot = self.alloc(Node {
            value,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(old_tail) => self.node_mut(old_tail).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Insert a record so that it ends up at position `index`
    ///
    /// `index == len` appends; anything larger is an index error.
    pub fn insert(&mut self, index: usize, value: T) -> TallyResult<()> {
        if index == self.len {
            self.push_back(value);
            return Ok(());
        }

        let next = self.slot_at(index)?;
        let prev = self.node(next).prev;
        let slot = self.alloc(Node {
            value,
            prev,
            next: Some(next),
        });

        self.node_mut(next).prev = Some(slot);
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the head record, `None` when empty
    pub fn pop_front(&mut self) -> Option<T> {
        let slot = self.head?;
        Some(self.unlink(slot))
    }

    /// Remove and return the tail record, `None` when empty
    pub fn pop_back(&mut self) -> Option<T> {
        let slot = self.tail?;
        Some(self.unlink(slot))
    }

    /// Get the record at `index`
    pub fn get(&self, index: usize) -> TallyResult<&T> {
        let slot = self.slot_at(index)?;
        Ok(&self.node(slot).value)
    }

    /// Get a mutable reference to the record at `index`
    pub fn get_mut(&mut self, index: usize) -> TallyResult<&mut T> {
        let slot = self.slot_at(index)?;
        Ok(&mut self.node_mut(slot).value)
    }

    /// Replace the record at `index`, returning the previous value
    pub fn set(&mut self, index: usize, value: T) -> TallyResult<T> {
        let slot = self.slot_at(index)?;
        Ok(std::mem::replace(&mut self.node_mut(slot).value, value))
    }

    /// Remove the record at `index` and re-link its neighbours
    pub fn remove(&mut self, index: usize) -> TallyResult<T> {
        let slot = self.slot_at(index)?;
        Ok(self.unlink(slot))
    }

    /// Exchange the records at positions `a` and `b`; links are untouched
    pub fn swap(&mut self, a: usize, b: usize) -> TallyResult<()> {
        let slot_a = self.slot_at(a)?;
        let slot_b = self.slot_at(b)?;
        if slot_a == slot_b {
            return Ok(());
        }

        let (low, high) = if slot_a < slot_b {
            (slot_a, slot_b)
        } else {
            (slot_b, slot_a)
        };
        let (left, right) = self.slots.split_at_mut(high);
        match (left[low].as_mut(), right[0].as_mut()) {
            (Some(x), Some(y)) => std::mem::swap(&mut x.value, &mut y.value),
            _ => unreachable!("linked slot is vacant"),
        }
        Ok(())
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate from head to tail
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn unlink(&mut self, slot: usize) -> T {
        let node = self.slots[slot]
            .take()
            .unwrap_or_else(|| unreachable!("linked slot is vacant"));

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        self.len -= 1;
        node.value
    }

    /// Walk from the head to the slot holding position `index`
    fn slot_at(&self, index: usize) -> TallyResult<usize> {
        if index >= self.len {
            return Err(TallyError::index(index, self.len));
        }

        let mut cursor = self.head;
        for _ in 0..index {
            cursor = cursor.and_then(|slot| self.node(slot).next);
        }
        cursor.ok_or_else(|| TallyError::index(index, self.len))
    }

    fn node(&self, slot: usize) -> &Node<T> {
        self.slots[slot]
            .as_ref()
            .unwrap_or_else(|| unreachable!("linked slot is vacant"))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<T> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("linked slot is vacant"))
    }
}

impl<T: fmt::Debug> fmt::Debug for RecordList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RecordList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for RecordList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for RecordList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over a [`RecordList`]
pub struct Iter<'a, T> {
    list: &'a RecordList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.node(slot);
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
