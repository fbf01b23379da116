use std::fmt;
use std::mem::MaybeUninit;
use std::ptr;

use tracing::trace;

use crate::error::{Error, Result};
use crate::traits::{Cursor, CursorMut, Sequence};

use super::next_owner;

const DEFAULT_CAPACITY: usize = 4;

/// Contiguous, geometrically growing sequence.
///
/// The first `len` slots of `buf` are initialized; the rest are spare
/// capacity. When an insert finds the buffer full it reallocates to
/// `capacity + capacity / 2 + 1` and moves the live elements over.
pub struct Vector<T> {
    buf: Box<[MaybeUninit<T>]>,
    len: usize,
    owner: u64,
}

/// Slot offset from the front of a [`Vector`].
///
/// Stays meaningful across mutation: a position keeps naming the same slot,
/// and is rejected once the slot is past the live elements. Only the vector
/// that produced it accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorPosition {
    owner: u64,
    offset: usize,
}

impl VectorPosition {
    pub fn offset(self) -> usize {
        self.offset
    }
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Box::<[T]>::new_uninit_slice(capacity),
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

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are initialized.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[0, len)` are initialized.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Drops every element; the capacity is kept.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        // SAFETY: slots `[0, len)` were initialized, and `len` is already zero
        // so a panicking destructor cannot lead to a second drop.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), len));
        }
    }

    fn as_ptr(&self) -> *const T {
        self.buf.as_ptr().cast::<T>()
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr().cast::<T>()
    }

    fn position(&self, offset: usize) -> VectorPosition {
        VectorPosition {
            owner: self.owner,
            offset,
        }
    }

    fn offset_of(&self, position: VectorPosition) -> Result<usize> {
        if position.owner != self.owner {
            return Err(Error::OutOfRange);
        }
        Ok(position.offset)
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity + old_capacity / 2 + 1;
        let mut buf = Box::<[T]>::new_uninit_slice(new_capacity);
        // SAFETY: the new buffer is a fresh allocation of at least `len` slots,
        // and the first `len` slots of the old one are initialized.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), buf.as_mut_ptr(), self.len);
        }
        // The old slice holds `MaybeUninit`, so replacing it frees the memory
        // without dropping the elements that were just moved out.
        self.buf = buf;
        trace!(old_capacity, new_capacity, len = self.len, "vector reallocated");
    }

    fn insert_at(&mut self, index: usize, value: T) -> Result<usize> {
        if index > self.len {
            return Err(Error::OutOfRange);
        }
        self.shift_in(index, value);
        Ok(index)
    }

    /// Moves `[index, len)` one slot right and writes `value` at `index`.
    /// `index` must not exceed `len`.
    fn shift_in(&mut self, index: usize, value: T) {
        debug_assert!(index <= self.len);
        if self.len == self.capacity() {
            self.grow();
        }
        let tail = self.len - index;
        // SAFETY: `index <= len < capacity`, so both the shifted tail and the
        // written slot stay inside the buffer. `ptr::copy` allows the overlap.
        unsafe {
            let slot = self.as_mut_ptr().add(index);
            ptr::copy(slot, slot.add(1), tail);
            ptr::write(slot, value);
        }
        self.len += 1;
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::OutOfRange);
        }
        let tail = self.len - index - 1;
        // SAFETY: `index < len`, so the slot is initialized; after the read its
        // bits are overwritten by the shifted tail and never dropped twice.
        let value = unsafe {
            let slot = self.as_mut_ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, tail);
            value
        };
        self.len -= 1;
        Ok(value)
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len);
        for value in self.iter() {
            out.append(value.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(values: [T; N]) -> Self {
        let mut out = Self::with_capacity(N);
        out.extend(values);
        out
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        out.extend(iter);
        out
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Sequence for Vector<T> {
    type Item = T;
    type Position = VectorPosition;
    type Cursor<'a>
        = VectorCursor<'a, T>
    where
        Self: 'a;
    type CursorMut<'a>
        = VectorCursorMut<'a, T>
    where
        Self: 'a;

    fn new() -> Self {
        Vector::new()
    }

    fn len(&self) -> usize {
        Vector::len(self)
    }

    fn append(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        // SAFETY: `len < capacity` after the grow, and the slot at `len` is
        // uninitialized.
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    fn prepend(&mut self, value: T) {
        self.shift_in(0, value);
    }

    fn insert(&mut self, at: VectorPosition, value: T) -> Result<VectorPosition> {
        let index = self.insert_at(self.offset_of(at)?, value)?;
        Ok(self.position(index))
    }

    fn erase(&mut self, at: VectorPosition) -> Result<T> {
        self.remove_at(self.offset_of(at)?)
    }

    fn erase_range(&mut self, first: VectorPosition, last: VectorPosition) -> Result<()> {
        let (start, end) = (self.offset_of(first)?, self.offset_of(last)?);
        if start > end || end > self.len {
            return Err(Error::OutOfRange);
        }
        let len = self.len;
        // Shrink first so a panicking destructor leaks the tail instead of
        // exposing dropped slots.
        self.len = start;
        // SAFETY: `start <= end <= len`, so `[start, end)` is initialized and
        // the tail `[end, len)` fits when moved down to `start`.
        unsafe {
            let base = self.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), end - start));
            ptr::copy(base.add(end), base.add(start), len - end);
        }
        self.len = len - (end - start);
        Ok(())
    }

    fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        self.remove_at(0)
    }

    fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` is initialized and is no
        // longer counted, so ownership moves out exactly once.
        Ok(unsafe { ptr::read(self.as_ptr().add(self.len)) })
    }

    fn begin(&self) -> VectorCursor<'_, T> {
        VectorCursor {
            vector: self,
            index: 0,
        }
    }

    fn end(&self) -> VectorCursor<'_, T> {
        VectorCursor {
            vector: self,
            index: self.len,
        }
    }

    fn begin_mut(&mut self) -> VectorCursorMut<'_, T> {
        VectorCursorMut {
            vector: self,
            index: 0,
        }
    }

    fn end_mut(&mut self) -> VectorCursorMut<'_, T> {
        let index = self.len;
        VectorCursorMut {
            vector: self,
            index,
        }
    }
}

fn step_next(index: &mut usize, len: usize) -> Result<()> {
    if *index >= len {
        return Err(Error::OutOfRange);
    }
    *index += 1;
    Ok(())
}

fn step_prev(index: &mut usize) -> Result<()> {
    if *index == 0 {
        return Err(Error::OutOfRange);
    }
    *index -= 1;
    Ok(())
}

/// Read-only cursor over a [`Vector`].
pub struct VectorCursor<'a, T> {
    vector: &'a Vector<T>,
    index: usize,
}

impl<T> Clone for VectorCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorCursor<'_, T> {}

impl<T> PartialEq for VectorCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.vector, other.vector) && self.index == other.index
    }
}

impl<T> Eq for VectorCursor<'_, T> {}

impl<T> fmt::Debug for VectorCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorCursor")
            .field("index", &self.index)
            .field("len", &self.vector.len)
            .finish()
    }
}

impl<T> Cursor for VectorCursor<'_, T> {
    type Item = T;
    type Position = VectorPosition;

    fn position(&self) -> VectorPosition {
        self.vector.position(self.index)
    }

    fn is_begin(&self) -> bool {
        self.index == 0
    }

    fn is_end(&self) -> bool {
        self.index == self.vector.len
    }

    fn get(&self) -> Result<&T> {
        self.vector.as_slice().get(self.index).ok_or(Error::OutOfRange)
    }

    fn move_next(&mut self) -> Result<()> {
        step_next(&mut self.index, self.vector.len)
    }

    fn move_prev(&mut self) -> Result<()> {
        step_prev(&mut self.index)
    }
}

/// Cursor over a [`Vector`] with write access to the element it points at.
pub struct VectorCursorMut<'a, T> {
    vector: &'a mut Vector<T>,
    index: usize,
}

impl<T> VectorCursorMut<'_, T> {
    pub fn as_cursor(&self) -> VectorCursor<'_, T> {
        VectorCursor {
            vector: &*self.vector,
            index: self.index,
        }
    }
}

impl<T> fmt::Debug for VectorCursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorCursorMut")
            .field("index", &self.index)
            .field("len", &self.vector.len)
            .finish()
    }
}

impl<T> Cursor for VectorCursorMut<'_, T> {
    type Item = T;
    type Position = VectorPosition;

    fn position(&self) -> VectorPosition {
        self.vector.position(self.index)
    }

    fn is_begin(&self) -> bool {
        self.index == 0
    }

    fn is_end(&self) -> bool {
        self.index == self.vector.len
    }

    fn get(&self) -> Result<&T> {
        self.vector.as_slice().get(self.index).ok_or(Error::OutOfRange)
    }

    fn move_next(&mut self) -> Result<()> {
        step_next(&mut self.index, self.vector.len)
    }

    fn move_prev(&mut self) -> Result<()> {
        step_prev(&mut self.index)
    }
}

impl<T> CursorMut for VectorCursorMut<'_, T> {
    fn get_mut(&mut self) -> Result<&mut T> {
        let index = self.index;
        self.vector
            .as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange)
    }
}
