//! [`Query`] collection related to [`Deal`]s listing.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Deal, Query};

use super::DatabaseQuery;

/// Queries a page of [`Deal`]s.
pub type List =
    DatabaseQuery<By<read::deal::list::Page, read::deal::list::Selector>>;

/// Queries the total count of [`Deal`]s.
pub type TotalCount = DatabaseQuery<By<read::deal::list::TotalCount, ()>>;
