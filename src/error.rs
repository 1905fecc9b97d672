/// Errors reported while building an exact cover instance.
///
/// The solving routines themselves are infallible: an unsatisfiable
/// instance simply produces no solutions, and contract violations on the
/// search hot path are debug assertions rather than recoverable errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A matrix row's width differs from the first row's.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The first-secondary-column index points past the last column.
    #[error("first secondary column {index} is out of bounds for {cols} columns")]
    SecondaryOutOfBounds { index: usize, cols: usize },
}

/// Convenience result alias for this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
