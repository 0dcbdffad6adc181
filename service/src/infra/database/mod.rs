//! [`Database`] abstractions and their implementations.

#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Executor of database operations.
pub use common::Handler as Database;

/// Error of executing a [`Database`] operation.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}
