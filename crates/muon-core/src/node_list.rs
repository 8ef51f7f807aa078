//! Circular ordered list with stable slots.
//!
//! Every ordered collection in the window manager (windows on a monitor,
//! in particular) is a [`NodeList`]. Elements are small copyable handles;
//! the list stores them in a slot arena linked through indices, with a
//! sentinel slot at index 0. Insert, remove and the one-step rotations are
//! O(1), and `next`/`prev` wrap around the sentinel.

use std::collections::HashMap;
use std::hash::Hash;

const HEAD: usize = 0;

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone)]
pub struct NodeList<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    slots: HashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> Default for NodeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> NodeList<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                value: None,
                prev: HEAD,
                next: HEAD,
            }],
            free: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, value: T) -> bool {
        self.slots.contains_key(&value)
    }

    pub fn first(&self) -> Option<T> {
        self.nodes[self.nodes[HEAD].next].value
    }

    pub fn last(&self) -> Option<T> {
        self.nodes[self.nodes[HEAD].prev].value
    }

    /// Insert at the front. Returns `false` if the value is already present.
    pub fn push_front(&mut self, value: T) -> bool {
        self.insert_at(HEAD, value)
    }

    /// Append at the back. Returns `false` if the value is already present.
    pub fn push_back(&mut self, value: T) -> bool {
        let last = self.nodes[HEAD].prev;
        self.insert_at(last, value)
    }

    /// Insert directly after `anchor`. Returns `false` if `anchor` is not in
    /// the list or `value` already is.
    pub fn insert_after(&mut self, anchor: T, value: T) -> bool {
        match self.slots.get(&anchor) {
            Some(&slot) => self.insert_at(slot, value),
            None => false,
        }
    }

    pub fn remove(&mut self, value: T) -> bool {
        let Some(slot) = self.slots.remove(&value) else {
            return false;
        };
        self.unlink(slot);
        self.nodes[slot].value = None;
        self.free.push(slot);
        true
    }

    pub fn move_to_front(&mut self, value: T) -> bool {
        self.relink(value, HEAD)
    }

    pub fn move_to_back(&mut self, value: T) -> bool {
        let Some(&slot) = self.slots.get(&value) else {
            return false;
        };
        let last = self.nodes[HEAD].prev;
        if last == slot {
            return true;
        }
        self.unlink(slot);
        self.link_after(last, slot);
        true
    }

    /// The element after `value`, wrapping from last to first. A single
    /// element is its own successor.
    pub fn next(&self, value: T) -> Option<T> {
        let slot = *self.slots.get(&value)?;
        let mut next = self.nodes[slot].next;
        if next == HEAD {
            next = self.nodes[HEAD].next;
        }
        self.nodes[next].value
    }

    /// The element before `value`, wrapping from first to last.
    pub fn prev(&self, value: T) -> Option<T> {
        let slot = *self.slots.get(&value)?;
        let mut prev = self.nodes[slot].prev;
        if prev == HEAD {
            prev = self.nodes[HEAD].prev;
        }
        self.nodes[prev].value
    }

    /// Move `value` one position toward the back. The last element wraps
    /// around to the front.
    pub fn shift(&mut self, value: T) {
        let Some(&slot) = self.slots.get(&value) else {
            return;
        };
        if self.len() < 2 {
            return;
        }
        let next = self.nodes[slot].next;
        self.unlink(slot);
        if next == HEAD {
            self.link_after(HEAD, slot);
        } else {
            self.link_after(next, slot);
        }
    }

    /// Move `value` one position toward the front. The first element wraps
    /// around to the back. Undoes [`shift`](Self::shift).
    pub fn unshift(&mut self, value: T) {
        let Some(&slot) = self.slots.get(&value) else {
            return;
        };
        if self.len() < 2 {
            return;
        }
        let prev = self.nodes[slot].prev;
        self.unlink(slot);
        if prev == HEAD {
            let last = self.nodes[HEAD].prev;
            self.link_after(last, slot);
        } else {
            let before = self.nodes[prev].prev;
            self.link_after(before, slot);
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
        }
    }

    pub fn position(&self, value: T) -> Option<usize> {
        self.iter().position(|v| v == value)
    }

    // ── Slot plumbing ────────────────────────────────────────────────

    fn insert_at(&mut self, after: usize, value: T) -> bool {
        if self.slots.contains_key(&value) {
            return false;
        }
        let node = Node {
            value: Some(value),
            prev: HEAD,
            next: HEAD,
        };
        let slot = if let Some(slot) = self.free.pop() {
            self.nodes[slot] = node;
            slot
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        };
        self.slots.insert(value, slot);
        self.link_after(after, slot);
        true
    }

    fn relink(&mut self, value: T, after: usize) -> bool {
        let Some(&slot) = self.slots.get(&value) else {
            return false;
        };
        if slot != after {
            self.unlink(slot);
            self.link_after(after, slot);
        }
        true
    }

    fn link_after(&mut self, after: usize, slot: usize) {
        let next = self.nodes[after].next;
        self.nodes[slot].prev = after;
        self.nodes[slot].next = next;
        self.nodes[next].prev = slot;
        self.nodes[after].next = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let Node { prev, next, .. } = self.nodes[slot];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }
}

pub struct Iter<'a, T> {
    list: &'a NodeList<T>,
    cursor: usize,
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.cursor == HEAD {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.value
    }
}

impl<'a, T: Copy + Eq + Hash> IntoIterator for &'a NodeList<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for NodeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}
