//! [`Deal`] read model definition.

#[cfg(doc)]
use crate::domain::Deal;

pub mod list {
    //! [`Deal`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::deal;
    #[cfg(doc)]
    use crate::domain::Deal;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = deal::Id;

    /// Cursor pointing to a specific [`Deal`] in a list.
    pub type Cursor = deal::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`deal::Name`] (or its part) to fuzzy search for.
        pub name: Option<deal::Name>,
    }

    /// Total count of [`Deal`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
