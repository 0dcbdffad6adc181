//! [`Query`] collection related to a single [`SiteSubmit`].

use common::operations::By;

use crate::domain::{site_submit, SiteSubmit};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`SiteSubmit`] by its [`site_submit::Id`].
pub type ById = DatabaseQuery<By<Option<SiteSubmit>, site_submit::Id>>;
