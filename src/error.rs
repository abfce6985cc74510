//! Error types shared by the list and scalar stores

/// Errors returned by store operations.
///
/// A failed operation never leaves a partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Pop requested on an absent or empty list
    #[error("list is empty or does not exist")]
    EmptyOrMissing,
    /// Index outside `[-len, len)`, or the key does not exist
    #[error("index out of range")]
    IndexOutOfRange,
    /// Normalized pop window has `start > end`
    #[error("malformed window: start {start} is past end {end}")]
    MalformedWindow { start: i64, end: i64 },
    /// Count arguments could not be turned into a window
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("lock poisoned")]
    LockPoisoned,
}
