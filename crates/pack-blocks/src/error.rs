//! Error types for pack-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("begin marker for '{id}' on line {line} has no matching end marker")]
    UnterminatedBlock { id: String, line: usize },
}
