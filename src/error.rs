use std::collections::TryReserveError;
use thiserror::Error;

/// Storage could not be obtained for a bucket array or a chain node.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error("failed to allocate a bucket array of {capacity} buckets")]
    Buckets {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("node arena is full ({len} live nodes)")]
    ArenaFull { len: usize },
}
