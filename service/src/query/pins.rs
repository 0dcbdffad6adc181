//! [`Query`] collection related to map [`Pin`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::SiteSubmit, read::Pin, Query};

use super::DatabaseQuery;

/// Queries a page of map [`Pin`]s: [`SiteSubmit`]s with a resolvable
/// display coordinate, already filtered down to resolvable ones.
pub type List =
    DatabaseQuery<By<read::pin::list::Page, read::pin::list::Selector>>;
