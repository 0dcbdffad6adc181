//! [`Handler`] abstractions.

use std::future::Future;

/// Handler of some execution, parametrized with its arguments.
///
/// Commands, queries, tasks and database operations are all expressed as
/// [`Handler`]s, differing only in the role they play.
pub trait Handler<Args = ()> {
    /// Type of a successful execution result.
    type Ok;

    /// Type of an execution error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
