//! Insertion-order ledger.
//!
//! [`OrderedList`] is a doubly linked ring stored in a slot arena: links are
//! slot indexes into a `Vec`, slot 0 is a permanent sentinel whose neighbors
//! are the list's front and back, and freed slots are recycled through a
//! free list. Every structural operation is O(1) and nothing is ever
//! reallocated behind a caller's back, so a [`Handle`] stays valid until the
//! element it names is removed.
//!
//! Each list carries a random [`Uuid`]; handles embed it, and every
//! handle-taking operation checks it first, so a handle from one list can
//! never address a slot of another. Slots additionally carry a generation
//! stamp bumped on removal, so a handle whose slot gets recycled stays dead
//! instead of aliasing the new occupant.

use uuid::Uuid;

/// Stable reference to one element of an [`OrderedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    r#gen: u64,
    list: Uuid,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    r#gen: u64,
    prev: usize,
    next: usize,
}

/// Doubly linked list over a slot arena, preserving insertion order under
/// O(1) push, unlink, reposition, and neighbor insertion.
#[derive(Debug, Clone)]
pub struct OrderedList<T> {
    id: Uuid,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedList<T> {
    /// Creates an empty list. The sentinel occupies slot 0 and initially
    /// links to itself.
    pub fn new() -> Self {
        OrderedList {
            id: Uuid::new_v4(),
            slots: vec![Slot { value: None, r#gen: 0, prev: 0, next: 0 }],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `handle` was issued by this list and its element is
    /// still linked.
    pub fn contains(&self, handle: Handle) -> bool {
        handle.list == self.id
            && handle.slot != 0
            && self
                .slots
                .get(handle.slot)
                .is_some_and(|slot| slot.value.is_some() && slot.r#gen == handle.r#gen)
    }

    fn check(&self, handle: Handle) -> Option<usize> {
        if self.contains(handle) {
            Some(handle.slot)
        } else {
            None
        }
    }

    /// Grabs a slot for `value`, recycling a freed one when available.
    fn alloc(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx].value = Some(value);
                idx
            }
            None => {
                self.slots.push(Slot { value: Some(value), r#gen: 0, prev: 0, next: 0 });
                self.slots.len() - 1
            }
        }
    }

    /// Links `idx` between `prev` and its current successor.
    fn link_after(&mut self, idx: usize, prev: usize) {
        let next = self.slots[prev].next;
        self.slots[idx].prev = prev;
        self.slots[idx].next = next;
        self.slots[prev].next = idx;
        self.slots[next].prev = idx;
        self.len += 1;
    }

    /// Detaches `idx` from the ring without freeing it.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.len -= 1;
    }

    fn handle(&self, slot: usize) -> Handle {
        Handle {
            slot,
            r#gen: self.slots[slot].r#gen,
            list: self.id,
        }
    }

    /// Appends `value`, returning its handle.
    pub fn push_back(&mut self, value: T) -> Handle {
        let idx = self.alloc(value);
        let back = self.slots[0].prev;
        self.link_after(idx, back);
        self.handle(idx)
    }

    /// Prepends `value`, returning its handle.
    pub fn push_front(&mut self, value: T) -> Handle {
        let idx = self.alloc(value);
        self.link_after(idx, 0);
        self.handle(idx)
    }

    /// Inserts `value` directly after the element `at` names. Returns
    /// `None` when the handle is foreign or stale, leaving the list
    /// untouched.
    pub fn insert_after(&mut self, at: Handle, value: T) -> Option<Handle> {
        let prev = self.check(at)?;
        let idx = self.alloc(value);
        self.link_after(idx, prev);
        Some(self.handle(idx))
    }

    /// Inserts `value` directly before the element `at` names.
    pub fn insert_before(&mut self, at: Handle, value: T) -> Option<Handle> {
        let pos = self.check(at)?;
        let prev = self.slots[pos].prev;
        let idx = self.alloc(value);
        self.link_after(idx, prev);
        Some(self.handle(idx))
    }

    /// Unlinks the element `handle` names and returns its value. The slot
    /// goes on the free list with its generation bumped; the handle is dead
    /// from here on, even if the slot gets recycled.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let idx = self.check(handle)?;
        self.unlink(idx);
        self.slots[idx].r#gen += 1;
        self.free.push(idx);
        self.slots[idx].value.take()
    }

    /// Relinks the element `handle` names at the front, keeping the handle
    /// valid. No-op if it is already there.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        let Some(idx) = self.check(handle) else {
            return false;
        };
        if self.slots[0].next != idx {
            self.unlink(idx);
            self.link_after(idx, 0);
        }
        true
    }

    /// Relinks the element `handle` names at the back, keeping the handle
    /// valid. No-op if it is already there.
    pub fn move_to_back(&mut self, handle: Handle) -> bool {
        let Some(idx) = self.check(handle) else {
            return false;
        };
        if self.slots[0].prev != idx {
            self.unlink(idx);
            let back = self.slots[0].prev;
            self.link_after(idx, back);
        }
        true
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let idx = self.check(handle)?;
        self.slots[idx].value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let idx = self.check(handle)?;
        self.slots[idx].value.as_mut()
    }

    /// Front element, if any.
    pub fn front(&self) -> Option<&T> {
        let idx = self.slots[0].next;
        if idx == 0 {
            None
        } else {
            self.slots[idx].value.as_ref()
        }
    }

    /// Back element, if any.
    pub fn back(&self) -> Option<&T> {
        let idx = self.slots[0].prev;
        if idx == 0 {
            None
        } else {
            self.slots[idx].value.as_ref()
        }
    }

    /// Drops every element. The arena is released rather than recycled; all
    /// outstanding handles die with it.
    pub fn clear(&mut self) {
        self.id = Uuid::new_v4();
        self.slots.truncate(1);
        self.slots[0].prev = 0;
        self.slots[0].next = 0;
        self.free.clear();
        self.len = 0;
    }

    /// Front-to-back iteration in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.slots[0].next,
        }
    }

    /// Front-to-back iteration yielding `(Handle, &T)` pairs.
    pub fn iter_handles(&self) -> IterHandles<'_, T> {
        IterHandles {
            list: self,
            cursor: self.slots[0].next,
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a OrderedList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == 0 {
            return None;
        }
        let slot = &self.list.slots[self.cursor];
        self.cursor = slot.next;
        slot.value.as_ref()
    }
}

pub struct IterHandles<'a, T> {
    list: &'a OrderedList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for IterHandles<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<(Handle, &'a T)> {
        if self.cursor == 0 {
            return None;
        }
        let idx = self.cursor;
        let slot = &self.list.slots[idx];
        self.cursor = slot.next;
        slot.value.as_ref().map(|value| (self.list.handle(idx), value))
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = OrderedList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}
