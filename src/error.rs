use thiserror::Error;

/// Errors that can occur when allocating from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  /// No gap between live blocks fits the request, and placing it after
  /// the last block would run past the end of the pool.
  #[error("pool exhausted: no gap fits {requested} bytes")]
  OutOfMemory {
    /// Payload size that was requested.
    requested: usize,
  },
}
