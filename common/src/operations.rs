//! Abstract operations.

use std::marker::PhantomData;

use crate::Handler;

/// Operation of inserting the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation of updating the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation of deleting the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation of selecting the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation of locking the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Operation of starting the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation of performing the provided value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Operation of opening a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Result of a [`Transact`] operation.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Operation of committing a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of a `W` value by a `B` value.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value being selected.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector out of the provided value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps this [`By`] selector into the value it selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
