use crate::error::Result;

/// Operation surface shared by [`Vector`](crate::Vector) and
/// [`LinkedList`](crate::LinkedList).
///
/// - `append` / `prepend` never fail.
/// - `insert` places the value immediately before `at` and returns the
///   position of the new element.
/// - `erase` at the `end` position fails with `OutOfRange`.
/// - Every fallible operation checks its preconditions before touching the
///   container, so an `Err` leaves it unchanged.
pub trait Sequence: Default {
    type Item;
    type Position: Copy + Eq + std::fmt::Debug;
    type Cursor<'a>: Cursor<Item = Self::Item, Position = Self::Position> + Copy + PartialEq
    where
        Self: 'a;
    type CursorMut<'a>: CursorMut<Item = Self::Item, Position = Self::Position>
    where
        Self: 'a;

    fn new() -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&mut self, value: Self::Item);

    fn prepend(&mut self, value: Self::Item);

    fn insert(&mut self, at: Self::Position, value: Self::Item) -> Result<Self::Position>;

    fn erase(&mut self, at: Self::Position) -> Result<Self::Item>;

    /// Removes `[first, last)`. `last` must be reachable from `first`.
    fn erase_range(&mut self, first: Self::Position, last: Self::Position) -> Result<()>;

    fn pop_first(&mut self) -> Result<Self::Item>;

    fn pop_last(&mut self) -> Result<Self::Item>;

    fn begin(&self) -> Self::Cursor<'_>;

    fn end(&self) -> Self::Cursor<'_>;

    fn begin_mut(&mut self) -> Self::CursorMut<'_>;

    fn end_mut(&mut self) -> Self::CursorMut<'_>;

    fn append_all<I: IntoIterator<Item = Self::Item>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

/// A bidirectional position inside a [`Sequence`].
///
/// Stepping is checked: `move_next` fails at `end`, `move_prev` fails at
/// `begin`, and `get` fails at `end`. A failed step leaves the cursor where
/// it was.
pub trait Cursor: Sized {
    type Item;
    type Position: Copy + Eq;

    fn position(&self) -> Self::Position;

    fn is_begin(&self) -> bool;

    fn is_end(&self) -> bool;

    fn get(&self) -> Result<&Self::Item>;

    fn move_next(&mut self) -> Result<()>;

    fn move_prev(&mut self) -> Result<()>;

    /// Steps forward `count` times. O(count) for both containers.
    fn advance(mut self, count: usize) -> Result<Self> {
        for _ in 0..count {
            self.move_next()?;
        }
        Ok(self)
    }

    /// Steps backward `count` times.
    fn retreat(mut self, count: usize) -> Result<Self> {
        for _ in 0..count {
            self.move_prev()?;
        }
        Ok(self)
    }
}

pub trait CursorMut: Cursor {
    fn get_mut(&mut self) -> Result<&mut Self::Item>;
}
