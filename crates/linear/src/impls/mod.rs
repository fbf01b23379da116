use std::sync::atomic::{AtomicU64, Ordering};

pub mod linked_list;
pub mod vector;

pub use linked_list::{Iter, IterMut, LinkedList, ListCursor, ListCursorMut, ListPosition};
pub use vector::{Vector, VectorCursor, VectorCursorMut, VectorPosition};

/// Identity stamped into every position a container hands out, so a
/// position is only accepted by the container that produced it.
fn next_owner() -> u64 {
    static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}
