use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisjointSetError {
    #[error("Cannot create a universe of {requested} elements")]
    InvalidArgument { requested: i64 },

    #[error("Element {index} is out of range for a universe of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    // Only the structure checker produces this; seeing it means a bug in the forest code.
    #[error("Corrupt structure: {0}")]
    CorruptStructure(String),
}
