mod error;
mod traits;

pub mod impls;

pub use error::{Error, Result};
pub use impls::{LinkedList, ListCursor, ListCursorMut, ListPosition};
pub use impls::{Vector, VectorCursor, VectorCursorMut, VectorPosition};
pub use traits::{Cursor, CursorMut, Sequence};
