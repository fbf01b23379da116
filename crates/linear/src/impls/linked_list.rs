use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr;

use tracing::trace;

use crate::error::{Error, Result};
use crate::traits::{Cursor, CursorMut, Sequence};

use super::next_owner;

const NIL: usize = usize::MAX;
const SENTINEL: usize = 0;

struct Node<T> {
    /// `None` for the sentinel and for vacant slots.
    value: Option<T>,
    prev: usize,
    /// For vacant slots: the next vacant slot.
    next: usize,
    generation: u64,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: NIL,
            next: NIL,
            generation: 0,
        }
    }

    fn new(value: T) -> Self {
        Self {
            value: Some(value),
            prev: NIL,
            next: NIL,
            generation: 0,
        }
    }
}

/// Doubly linked list with a permanent sentinel marking `end`.
///
/// Nodes live in an arena and link to each other by slot index. Slot 0 is
/// the sentinel: it never holds a value, is never counted, and its `next`
/// is always `NIL`. `head` is the first live node, or the sentinel when the
/// list is empty. Erased slots go on a free chain and are reused by later
/// inserts; each release bumps the 64-bit slot generation so old positions
/// are rejected instead of aliasing the new node. Positions also carry the
/// identity of the list that produced them, and no other list accepts them.
pub struct LinkedList<T> {
    nodes: Vec<Node<T>>,
    head: usize,
    free: usize,
    len: usize,
    owner: u64,
}

/// Handle to a node of a [`LinkedList`]: arena slot plus generation.
///
/// Valid until the node it names is erased. Erasing other nodes, including
/// its neighbours, does not affect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListPosition {
    owner: u64,
    index: usize,
    generation: u64,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            head: SENTINEL,
            free: NIL,
            len: 0,
            owner: next_owner(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<&T> {
        self.nodes[self.head].value.as_ref()
    }

    pub fn back(&self) -> Option<&T> {
        let last = self.nodes[SENTINEL].prev;
        self.nodes.get(last).and_then(|node| node.value.as_ref())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.nodes[SENTINEL].prev,
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.head,
            back: self.nodes[SENTINEL].prev,
            remaining: self.len,
            nodes: self.nodes.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    /// Erases every element. Slots are kept for reuse.
    pub fn clear(&mut self) {
        let mut index = self.head;
        while index != SENTINEL {
            let next = self.nodes[index].next;
            drop(self.release(index));
            index = next;
        }
        self.nodes[SENTINEL].prev = NIL;
        self.head = SENTINEL;
        self.len = 0;
    }

    fn position_of(&self, index: usize) -> ListPosition {
        ListPosition {
            owner: self.owner,
            index,
            generation: self.nodes[index].generation,
        }
    }

    fn resolve(&self, position: ListPosition) -> Result<usize> {
        if position.owner != self.owner {
            return Err(Error::OutOfRange);
        }
        match self.nodes.get(position.index) {
            Some(node)
                if node.generation == position.generation
                    && (position.index == SENTINEL || node.value.is_some()) =>
            {
                Ok(position.index)
            }
            _ => Err(Error::OutOfRange),
        }
    }

    fn next_of(&self, index: usize) -> Result<usize> {
        if index == SENTINEL {
            return Err(Error::OutOfRange);
        }
        Ok(self.nodes[index].next)
    }

    fn prev_of(&self, index: usize) -> Result<usize> {
        if index == self.head {
            return Err(Error::OutOfRange);
        }
        Ok(self.nodes[index].prev)
    }

    fn alloc(&mut self, value: T) -> usize {
        if self.free != NIL {
            let index = self.free;
            let node = &mut self.nodes[index];
            self.free = node.next;
            node.value = Some(value);
            node.prev = NIL;
            node.next = NIL;
            return index;
        }
        if self.nodes.len() == self.nodes.capacity() {
            trace!(slots = self.nodes.len(), "linked list arena full, growing");
        }
        self.nodes.push(Node::new(value));
        self.nodes.len() - 1
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let node = &mut self.nodes[index];
        let value = node.value.take();
        node.generation += 1;
        node.prev = NIL;
        node.next = self.free;
        self.free = index;
        value
    }

    /// Splices a new node in front of `at` and returns its slot.
    fn link_before(&mut self, at: usize, value: T) -> usize {
        let index = self.alloc(value);
        let prev = self.nodes[at].prev;
        self.nodes[index].prev = prev;
        self.nodes[index].next = at;
        self.nodes[at].prev = index;
        if prev == NIL {
            self.head = index;
        } else {
            self.nodes[prev].next = index;
        }
        self.len += 1;
        index
    }

    /// `index` must be a live node, never the sentinel.
    fn unlink(&mut self, index: usize) -> Option<T> {
        let prev = self.nodes[index].prev;
        let next = self.nodes[index].next;
        self.nodes[next].prev = prev;
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        self.len -= 1;
        self.release(index)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Sequence for LinkedList<T> {
    type Item = T;
    type Position = ListPosition;
    type Cursor<'a>
        = ListCursor<'a, T>
    where
        Self: 'a;
    type CursorMut<'a>
        = ListCursorMut<'a, T>
    where
        Self: 'a;

    fn new() -> Self {
        LinkedList::new()
    }

    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn append(&mut self, value: T) {
        self.link_before(SENTINEL, value);
    }

    fn prepend(&mut self, value: T) {
        self.link_before(self.head, value);
    }

    fn insert(&mut self, at: ListPosition, value: T) -> Result<ListPosition> {
        let at = self.resolve(at)?;
        let index = self.link_before(at, value);
        Ok(self.position_of(index))
    }

    fn erase(&mut self, at: ListPosition) -> Result<T> {
        let index = self.resolve(at)?;
        if index == SENTINEL {
            return Err(Error::OutOfRange);
        }
        self.unlink(index).ok_or(Error::OutOfRange)
    }

    fn erase_range(&mut self, first: ListPosition, last: ListPosition) -> Result<()> {
        let start = self.resolve(first)?;
        let stop = self.resolve(last)?;

        let mut count = 0;
        let mut index = start;
        while index != stop {
            index = self.next_of(index)?;
            count += 1;
        }

        let mut index = start;
        for _ in 0..count {
            let next = self.nodes[index].next;
            drop(self.unlink(index));
            index = next;
        }
        Ok(())
    }

    fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        self.unlink(self.head).ok_or(Error::Empty)
    }

    fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let last = self.nodes[SENTINEL].prev;
        self.unlink(last).ok_or(Error::Empty)
    }

    fn begin(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: self,
            index: self.head,
        }
    }

    fn end(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: self,
            index: SENTINEL,
        }
    }

    fn begin_mut(&mut self) -> ListCursorMut<'_, T> {
        let index = self.head;
        ListCursorMut { list: self, index }
    }

    fn end_mut(&mut self) -> ListCursorMut<'_, T> {
        ListCursorMut {
            list: self,
            index: SENTINEL,
        }
    }
}

/// Read-only cursor over a [`LinkedList`].
pub struct ListCursor<'a, T> {
    list: &'a LinkedList<T>,
    index: usize,
}

impl<T> Clone for ListCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListCursor<'_, T> {}

impl<T> PartialEq for ListCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.index == other.index
    }
}

impl<T> Eq for ListCursor<'_, T> {}

impl<T> fmt::Debug for ListCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor")
            .field("index", &self.index)
            .finish()
    }
}

impl<T> Cursor for ListCursor<'_, T> {
    type Item = T;
    type Position = ListPosition;

    fn position(&self) -> ListPosition {
        self.list.position_of(self.index)
    }

    fn is_begin(&self) -> bool {
        self.index == self.list.head
    }

    fn is_end(&self) -> bool {
        self.index == SENTINEL
    }

    fn get(&self) -> Result<&T> {
        self.list.nodes[self.index]
            .value
            .as_ref()
            .ok_or(Error::OutOfRange)
    }

    fn move_next(&mut self) -> Result<()> {
        self.index = self.list.next_of(self.index)?;
        Ok(())
    }

    fn move_prev(&mut self) -> Result<()> {
        self.index = self.list.prev_of(self.index)?;
        Ok(())
    }
}

/// Cursor over a [`LinkedList`] with write access to the element it points at.
pub struct ListCursorMut<'a, T> {
    list: &'a mut LinkedList<T>,
    index: usize,
}

impl<T> ListCursorMut<'_, T> {
    pub fn as_cursor(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: &*self.list,
            index: self.index,
        }
    }
}

impl<T> fmt::Debug for ListCursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursorMut")
            .field("index", &self.index)
            .finish()
    }
}

impl<T> Cursor for ListCursorMut<'_, T> {
    type Item = T;
    type Position = ListPosition;

    fn position(&self) -> ListPosition {
        self.list.position_of(self.index)
    }

    fn is_begin(&self) -> bool {
        self.index == self.list.head
    }

    fn is_end(&self) -> bool {
        self.index == SENTINEL
    }

    fn get(&self) -> Result<&T> {
        self.list.nodes[self.index]
            .value
            .as_ref()
            .ok_or(Error::OutOfRange)
    }

    fn move_next(&mut self) -> Result<()> {
        self.index = self.list.next_of(self.index)?;
        Ok(())
    }

    fn move_prev(&mut self) -> Result<()> {
        self.index = self.list.prev_of(self.index)?;
        Ok(())
    }
}

impl<T> CursorMut for ListCursorMut<'_, T> {
    fn get_mut(&mut self) -> Result<&mut T> {
        self.list.nodes[self.index]
            .value
            .as_mut()
            .ok_or(Error::OutOfRange)
    }
}

/// Front-to-back iterator over a [`LinkedList`]; also walks back-to-front.
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable counterpart of [`Iter`].
pub struct IterMut<'a, T> {
    nodes: *mut Node<T>,
    front: usize,
    back: usize,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: the links visit each live node once, and `remaining` stops
        // the front and back walks before they cross, so no node is handed
        // out twice.
        let node = unsafe { &mut *self.nodes.add(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: as in `next`; `remaining` keeps the back walk from reaching
        // a node the front walk already yielded.
        let node = unsafe { &mut *self.nodes.add(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_mut()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}
