use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `pop_first` / `pop_last` on a container holding no elements.
    #[error("collection is empty")]
    Empty,
    /// Dereferencing or stepping past `end`, stepping before `begin`,
    /// erasing at `end`, or using a position that no longer names an element.
    #[error("position is out of range")]
    OutOfRange,
}

pub type Result<T> = std::result::Result<T, Error>;
