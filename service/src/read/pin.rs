//! Map [`Pin`] read model definition.

use crate::domain::{
    site_submit::{self, DisplayCoordinate},
    SiteSubmit,
};
#[cfg(doc)]
use crate::domain::Property;

/// Map pin of a [`SiteSubmit`] resolved against its [`Property`].
///
/// Only [`SiteSubmit`]s with a resolvable display coordinate become
/// [`Pin`]s: unresolvable ones are filtered out before any rendering or
/// export surface sees them.
#[derive(Clone, Copy, Debug)]
pub struct Pin {
    /// ID of the [`SiteSubmit`] this [`Pin`] renders.
    pub site_submit_id: site_submit::Id,

    /// Resolved [`DisplayCoordinate`] of the [`SiteSubmit`].
    pub coordinate: DisplayCoordinate,
}

pub mod list {
    //! Map [`Pin`]s list definitions.

    use common::define_pagination;

    use crate::domain::{deal, site_submit};

    use super::Pin;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = Pin;

    /// Cursor pointing to a specific [`Pin`] in a list.
    pub type Cursor = site_submit::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`deal::Deal`] to list [`Pin`]s for.
        ///
        /// [`deal::Deal`]: crate::domain::Deal
        pub deal_id: Option<deal::Id>,
    }
}
